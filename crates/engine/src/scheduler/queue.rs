// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Priority queue of spawn jobs with per-session and per-batch counters.

use super::SchedulerError;
use parking_lot::RwLock;
use serde::Serialize;
use shep_core::{elapsed_ms, Clock, JobId, JobPriority, JobType, SpawnJob, SystemClock};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Running statistics, updated on every mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueueStats {
    pub total_enqueued: u64,
    pub total_dequeued: u64,
    pub current_size: usize,
    pub max_size: usize,
    /// Queued jobs per priority
    pub by_priority: HashMap<JobPriority, usize>,
    /// Queued jobs per job type
    pub by_type: HashMap<JobType, usize>,
    pub avg_wait_ms: u64,
    pub max_wait_ms: u64,
}

struct Entry {
    job: SpawnJob,
    /// Enqueue order; breaks ties between equal timestamps
    seq: u64,
}

impl Entry {
    fn cmp_key(&self, other: &Entry) -> Ordering {
        self.job
            .priority
            .cmp(&other.job.priority)
            .then(self.job.created_at_ms.cmp(&other.job.created_at_ms))
            .then(self.seq.cmp(&other.seq))
    }
}

#[derive(Default)]
struct QueueInner {
    /// Binary min-heap keyed on (priority, created_at_ms, seq)
    heap: Vec<Entry>,
    ids: HashSet<JobId>,
    session_counts: HashMap<String, usize>,
    batch_counts: HashMap<String, usize>,
    stats: QueueStats,
    total_wait_ms: u64,
    next_seq: u64,
}

impl QueueInner {
    fn position(&self, id: &JobId) -> Option<usize> {
        self.heap.iter().position(|e| &e.job.id == id)
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.heap[i].cmp_key(&self.heap[parent]) != Ordering::Less {
                break;
            }
            self.heap.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut smallest = i;
            if left < len && self.heap[left].cmp_key(&self.heap[smallest]) == Ordering::Less {
                smallest = left;
            }
            if right < len && self.heap[right].cmp_key(&self.heap[smallest]) == Ordering::Less {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.heap.swap(i, smallest);
            i = smallest;
        }
    }

    /// Restore heap order after the entry at `i` changed.
    fn fix(&mut self, i: usize) {
        if i < self.heap.len() {
            self.sift_down(i);
            self.sift_up(i);
        }
    }

    fn push(&mut self, job: SpawnJob) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.track(&job);
        self.heap.push(Entry { job, seq });
        let last = self.heap.len() - 1;
        self.sift_up(last);

        self.stats.total_enqueued += 1;
        self.stats.current_size = self.heap.len();
        self.stats.max_size = self.stats.max_size.max(self.stats.current_size);
    }

    /// Replace a queued job in place, keeping its enqueue sequence.
    fn replace(&mut self, i: usize, job: SpawnJob) {
        let old = std::mem::replace(&mut self.heap[i].job, job);
        self.untrack(&old);
        let new = self.heap[i].job.clone();
        self.track(&new);
        self.fix(i);
    }

    /// Remove the entry at `i` and release its counters.
    fn remove_at(&mut self, i: usize) -> SpawnJob {
        let job = self.heap.swap_remove(i).job;
        self.fix(i);
        self.untrack(&job);
        self.stats.current_size = self.heap.len();
        job
    }

    /// Record a dequeue for wait-time statistics.
    fn record_wait(&mut self, job: &SpawnJob, now_ms: u64) {
        let wait = elapsed_ms(now_ms, job.created_at_ms);
        self.total_wait_ms += wait;
        self.stats.total_dequeued += 1;
        self.stats.max_wait_ms = self.stats.max_wait_ms.max(wait);
        self.stats.avg_wait_ms = self.total_wait_ms / self.stats.total_dequeued;
    }

    fn track(&mut self, job: &SpawnJob) {
        self.ids.insert(job.id.clone());
        *self.session_counts.entry(job.session_name.clone()).or_default() += 1;
        if let Some(batch) = &job.batch_id {
            *self.batch_counts.entry(batch.clone()).or_default() += 1;
        }
        *self.stats.by_priority.entry(job.priority).or_default() += 1;
        *self.stats.by_type.entry(job.job_type).or_default() += 1;
    }

    fn untrack(&mut self, job: &SpawnJob) {
        self.ids.remove(&job.id);
        decrement(&mut self.session_counts, &job.session_name);
        if let Some(batch) = &job.batch_id {
            decrement(&mut self.batch_counts, batch);
        }
        decrement(&mut self.stats.by_priority, &job.priority);
        decrement(&mut self.stats.by_type, &job.job_type);
    }

    /// Heap indices in dequeue order.
    fn ordered_indices(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.heap.len()).collect();
        order.sort_by(|&a, &b| self.heap[a].cmp_key(&self.heap[b]));
        order
    }

    fn collect_ordered(&self, filter: impl Fn(&SpawnJob) -> bool) -> Vec<SpawnJob> {
        self.ordered_indices()
            .into_iter()
            .map(|i| &self.heap[i].job)
            .filter(|job| filter(job))
            .cloned()
            .collect()
    }

    /// Cancel and remove every job matching `filter`, in dequeue order.
    fn cancel_where(&mut self, filter: impl Fn(&SpawnJob) -> bool) -> Vec<SpawnJob> {
        let (mut taken, kept): (Vec<Entry>, Vec<Entry>) =
            std::mem::take(&mut self.heap).into_iter().partition(|e| filter(&e.job));
        self.heap = kept;
        for i in (0..self.heap.len() / 2).rev() {
            self.sift_down(i);
        }
        taken.sort_by(|a, b| a.cmp_key(b));
        let cancelled: Vec<SpawnJob> = taken
            .into_iter()
            .map(|entry| {
                let mut job = entry.job;
                job.cancel();
                job
            })
            .collect();
        for job in &cancelled {
            self.untrack(job);
        }
        self.stats.current_size = self.heap.len();
        cancelled
    }
}

fn decrement<K, Q>(counts: &mut HashMap<K, usize>, key: &Q)
where
    K: std::borrow::Borrow<Q> + std::hash::Hash + Eq,
    Q: std::hash::Hash + Eq + ?Sized,
{
    if let Some(n) = counts.get_mut(key) {
        *n = n.saturating_sub(1);
        if *n == 0 {
            counts.remove(key);
        }
    }
}

/// Thread-safe priority queue of [`SpawnJob`]s.
///
/// Dequeue order is ascending priority, then ascending `created_at_ms`, then
/// enqueue order. A single read/write lock guards all state.
pub struct JobQueue<C: Clock = SystemClock> {
    inner: RwLock<QueueInner>,
    clock: C,
}

impl JobQueue<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for JobQueue<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> JobQueue<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { inner: RwLock::new(QueueInner::default()), clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Add a job. Re-enqueuing a queued ID updates that job in place.
    pub fn enqueue(&self, job: SpawnJob) -> Result<(), SchedulerError> {
        if job.id.is_empty() {
            return Err(SchedulerError::Validation("job id is empty".to_string()));
        }
        if job.session_name.trim().is_empty() {
            return Err(SchedulerError::Validation(format!("job {} has no session", job.id)));
        }

        let mut inner = self.inner.write();
        if inner.ids.contains(&job.id) {
            if let Some(i) = inner.position(&job.id) {
                tracing::debug!(job_id = %job.id, priority = %job.priority, "job updated in place");
                inner.replace(i, job);
                return Ok(());
            }
        }
        tracing::debug!(
            job_id = %job.id,
            session = %job.session_name,
            priority = %job.priority,
            "job enqueued"
        );
        inner.push(job);
        Ok(())
    }

    /// Pop the most urgent job, or `None` when empty.
    pub fn dequeue(&self) -> Option<SpawnJob> {
        self.dequeue_where(|_| true)
    }

    /// Pop the most urgent job accepted by `eligible`.
    ///
    /// Jobs are offered in dequeue order; the scan and the removal happen
    /// under one write lock.
    pub fn dequeue_where(&self, mut eligible: impl FnMut(&SpawnJob) -> bool) -> Option<SpawnJob> {
        let now_ms = self.clock.epoch_ms();
        let mut inner = self.inner.write();
        if inner.heap.is_empty() {
            return None;
        }
        // Fast path: the heap root is the global minimum
        let index = if eligible(&inner.heap[0].job) {
            Some(0)
        } else {
            inner.ordered_indices().into_iter().skip(1).find(|&i| eligible(&inner.heap[i].job))
        }?;
        let job = inner.remove_at(index);
        inner.record_wait(&job, now_ms);
        Some(job)
    }

    pub fn peek(&self) -> Option<SpawnJob> {
        self.inner.read().heap.first().map(|e| e.job.clone())
    }

    pub fn get(&self, id: &JobId) -> Option<SpawnJob> {
        let inner = self.inner.read();
        inner.position(id).map(|i| inner.heap[i].job.clone())
    }

    /// Remove a job without cancelling it. `None` if it is not queued.
    pub fn remove(&self, id: &JobId) -> Option<SpawnJob> {
        let mut inner = self.inner.write();
        let i = inner.position(id)?;
        Some(inner.remove_at(i))
    }

    /// Drop every queued job, returning them in dequeue order.
    pub fn clear(&self) -> Vec<SpawnJob> {
        let mut inner = self.inner.write();
        let removed = inner.collect_ordered(|_| true);
        inner.heap.clear();
        inner.ids.clear();
        inner.session_counts.clear();
        inner.batch_counts.clear();
        inner.stats.by_priority.clear();
        inner.stats.by_type.clear();
        inner.stats.current_size = 0;
        removed
    }

    /// Cancel and remove every job of `session`.
    pub fn cancel_session(&self, session: &str) -> Vec<SpawnJob> {
        let cancelled = self.inner.write().cancel_where(|job| job.session_name == session);
        if !cancelled.is_empty() {
            tracing::info!(session, count = cancelled.len(), "session jobs cancelled");
        }
        cancelled
    }

    /// Cancel and remove every job of `batch_id`.
    pub fn cancel_batch(&self, batch_id: &str) -> Vec<SpawnJob> {
        let cancelled = self.inner.write().cancel_where(|job| job.in_batch(batch_id));
        if !cancelled.is_empty() {
            tracing::info!(batch = batch_id, count = cancelled.len(), "batch jobs cancelled");
        }
        cancelled
    }

    /// All queued jobs in dequeue order.
    pub fn list_all(&self) -> Vec<SpawnJob> {
        self.inner.read().collect_ordered(|_| true)
    }

    pub fn list_by_session(&self, session: &str) -> Vec<SpawnJob> {
        self.inner.read().collect_ordered(|job| job.session_name == session)
    }

    pub fn list_by_batch(&self, batch_id: &str) -> Vec<SpawnJob> {
        self.inner.read().collect_ordered(|job| job.in_batch(batch_id))
    }

    pub fn count_by_session(&self, session: &str) -> usize {
        self.inner.read().session_counts.get(session).copied().unwrap_or(0)
    }

    pub fn count_by_batch(&self, batch_id: &str) -> usize {
        self.inner.read().batch_counts.get(batch_id).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.inner.read().heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the running statistics.
    pub fn stats(&self) -> QueueStats {
        self.inner.read().stats.clone()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
