// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admission control over the job queue.

use super::progress::{JobProgress, Progress, SessionProgress};
use super::{JobQueue, SchedulerError};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shep_core::{elapsed_ms, Clock, JobId, JobStatus, SpawnJob, SystemClock};
use std::collections::{BTreeMap, HashMap};

/// Concurrency caps. Zero disables a cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FairSchedulerConfig {
    pub max_per_session: usize,
    pub max_per_batch: usize,
}

impl Default for FairSchedulerConfig {
    fn default() -> Self {
        Self { max_per_session: 3, max_per_batch: 5 }
    }
}

struct RunningJob {
    job: SpawnJob,
    started_at_ms: u64,
}

#[derive(Default)]
struct Outcomes {
    completed: usize,
    failed: usize,
}

#[derive(Default)]
struct FairState {
    running_by_session: HashMap<String, usize>,
    running_by_batch: HashMap<String, usize>,
    running: HashMap<JobId, RunningJob>,
    outcomes: HashMap<String, Outcomes>,
}

impl FairState {
    fn admits(&self, config: &FairSchedulerConfig, job: &SpawnJob) -> bool {
        if config.max_per_session > 0 {
            let running = self.running_by_session.get(&job.session_name).copied().unwrap_or(0);
            if running >= config.max_per_session {
                tracing::debug!(job_id = %job.id, session = %job.session_name, running, "session at cap");
                return false;
            }
        }
        if let (true, Some(batch)) = (config.max_per_batch > 0, job.batch_id.as_deref()) {
            let running = self.running_by_batch.get(batch).copied().unwrap_or(0);
            if running >= config.max_per_batch {
                tracing::debug!(job_id = %job.id, batch, running, "batch at cap");
                return false;
            }
        }
        true
    }
}

fn release(counts: &mut HashMap<String, usize>, key: &str) {
    if let Some(n) = counts.get_mut(key) {
        *n = n.saturating_sub(1);
        if *n == 0 {
            counts.remove(key);
        }
    }
}

fn session_entry<'a>(
    map: &'a mut BTreeMap<String, SessionProgress>,
    name: &str,
) -> &'a mut SessionProgress {
    map.entry(name.to_string()).or_insert_with(|| SessionProgress::new(name))
}

/// Hands out queued jobs in priority order without letting any one session
/// or batch exceed its concurrency cap.
///
/// Dequeue is non-blocking: callers poll [`FairScheduler::try_dequeue`] and
/// report back with [`FairScheduler::mark_complete`].
pub struct FairScheduler<C: Clock = SystemClock> {
    queue: JobQueue<C>,
    config: FairSchedulerConfig,
    state: RwLock<FairState>,
}

impl FairScheduler<SystemClock> {
    pub fn new(config: FairSchedulerConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> FairScheduler<C> {
    pub fn with_clock(config: FairSchedulerConfig, clock: C) -> Self {
        Self { queue: JobQueue::with_clock(clock), config, state: RwLock::new(FairState::default()) }
    }

    pub fn config(&self) -> &FairSchedulerConfig {
        &self.config
    }

    /// The underlying queue, for listing and cancellation.
    pub fn queue(&self) -> &JobQueue<C> {
        &self.queue
    }

    pub fn enqueue(&self, job: SpawnJob) -> Result<(), SchedulerError> {
        self.queue.enqueue(job)
    }

    /// Take the most urgent job whose session and batch are under their caps.
    ///
    /// Returns `None` when nothing is eligible; there is no blocking variant.
    pub fn try_dequeue(&self) -> Option<SpawnJob> {
        let mut state = self.state.write();
        let config = self.config;
        let mut job = self.queue.dequeue_where(|job| state.admits(&config, job))?;

        job.status = JobStatus::Running;
        *state.running_by_session.entry(job.session_name.clone()).or_default() += 1;
        if let Some(batch) = &job.batch_id {
            *state.running_by_batch.entry(batch.clone()).or_default() += 1;
        }
        let started_at_ms = self.queue.clock().epoch_ms();
        state.running.insert(job.id.clone(), RunningJob { job: job.clone(), started_at_ms });

        tracing::info!(
            job_id = %job.id,
            session = %job.session_name,
            priority = %job.priority,
            "job dispatched"
        );
        Some(job)
    }

    /// Release the job's session and batch slots.
    ///
    /// A job whose status is `Failed` is counted as failed, anything else as
    /// completed. Completing a job that is not running here is a no-op.
    pub fn mark_complete(&self, job: &SpawnJob) {
        let mut state = self.state.write();
        let Some(running) = state.running.remove(&job.id) else {
            tracing::debug!(job_id = %job.id, "completing job not running here");
            return;
        };
        let (session, batch) = (running.job.session_name, running.job.batch_id);
        release(&mut state.running_by_session, &session);
        if let Some(batch) = &batch {
            release(&mut state.running_by_batch, batch);
        }

        let outcome = state.outcomes.entry(session.clone()).or_default();
        if job.status == JobStatus::Failed {
            outcome.failed += 1;
        } else {
            outcome.completed += 1;
        }
        tracing::info!(job_id = %job.id, session = %session, status = %job.status, "job finished");
    }

    /// Jobs currently dispatched for `session`.
    pub fn running_count(&self, session: &str) -> usize {
        self.state.read().running_by_session.get(session).copied().unwrap_or(0)
    }

    /// Jobs currently dispatched for `batch_id`.
    pub fn batch_running_count(&self, batch_id: &str) -> usize {
        self.state.read().running_by_batch.get(batch_id).copied().unwrap_or(0)
    }

    /// Point-in-time view for dashboards.
    pub fn progress(&self) -> Progress {
        let state = self.state.read();
        let now_ms = self.queue.clock().epoch_ms();
        let stats = self.queue.stats();
        let avg_wait_ms = (stats.total_dequeued > 0).then_some(stats.avg_wait_ms);
        let queued: Vec<JobProgress> = self
            .queue
            .list_all()
            .iter()
            .map(|job| JobProgress::queued(job, now_ms, avg_wait_ms))
            .collect();
        let mut running: Vec<JobProgress> = state
            .running
            .values()
            .map(|r| JobProgress::running(&r.job, elapsed_ms(now_ms, r.started_at_ms)))
            .collect();
        running.sort_by(|a, b| b.running_for_ms.cmp(&a.running_for_ms).then(a.id.cmp(&b.id)));

        let mut by_session: BTreeMap<String, SessionProgress> = BTreeMap::new();
        for job in &queued {
            session_entry(&mut by_session, &job.session_name).queued_count += 1;
        }
        for (name, count) in &state.running_by_session {
            session_entry(&mut by_session, name).running_count = *count;
        }
        for (name, outcome) in &state.outcomes {
            let entry = session_entry(&mut by_session, name);
            entry.completed_count = outcome.completed;
            entry.failed_count = outcome.failed;
        }
        for s in by_session.values_mut() {
            s.update_percent();
        }

        Progress {
            taken_at_ms: now_ms,
            queued_count: queued.len(),
            running_count: running.len(),
            completed_count: state.outcomes.values().map(|o| o.completed).sum(),
            failed_count: state.outcomes.values().map(|o| o.failed).sum(),
            estimated_eta_ms: queued.iter().filter_map(|job| job.eta_ms).max(),
            queued,
            running,
            by_session,
        }
    }
}

#[cfg(test)]
#[path = "fair_tests.rs"]
mod tests;
