// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Serializable scheduler snapshots for dashboards.

use serde::Serialize;
use shep_core::{elapsed_ms, AgentType, JobId, JobPriority, JobStatus, JobType, SpawnJob};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    pub taken_at_ms: u64,
    pub queued_count: usize,
    pub running_count: usize,
    pub completed_count: usize,
    pub failed_count: usize,
    /// Time until the last queued job is expected to start, from the
    /// average wait of jobs dispatched so far
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_eta_ms: Option<u64>,
    /// Queued jobs in dequeue order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub queued: Vec<JobProgress>,
    /// Dispatched jobs, longest-running first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub running: Vec<JobProgress>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub by_session: BTreeMap<String, SessionProgress>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobProgress {
    pub id: JobId,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub status: JobStatus,
    pub session_name: String,
    pub priority: JobPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_type: Option<AgentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pane_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queued_for_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running_for_ms: Option<u64>,
    /// Expected time until a queued job starts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta_ms: Option<u64>,
}

impl JobProgress {
    fn from_job(job: &SpawnJob) -> Self {
        Self {
            id: job.id.clone(),
            job_type: job.job_type,
            status: job.status,
            session_name: job.session_name.clone(),
            priority: job.priority,
            agent_type: job.agent_type,
            pane_index: job.pane_index,
            queued_for_ms: None,
            running_for_ms: None,
            eta_ms: None,
        }
    }

    /// A job still waiting. Without a known average wait there is no ETA;
    /// a job already waiting longer than average is due now.
    pub(crate) fn queued(job: &SpawnJob, now_ms: u64, avg_wait_ms: Option<u64>) -> Self {
        let queued_for = elapsed_ms(now_ms, job.created_at_ms);
        Self {
            queued_for_ms: Some(queued_for),
            eta_ms: avg_wait_ms.map(|avg| avg.saturating_sub(queued_for)),
            ..Self::from_job(job)
        }
    }

    pub(crate) fn running(job: &SpawnJob, running_for_ms: u64) -> Self {
        Self { running_for_ms: Some(running_for_ms), ..Self::from_job(job) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionProgress {
    pub session_name: String,
    pub queued_count: usize,
    pub running_count: usize,
    pub completed_count: usize,
    pub failed_count: usize,
    /// Finished jobs as a share of all jobs seen for the session
    pub progress_percent: f64,
}

impl SessionProgress {
    pub(crate) fn new(session_name: &str) -> Self {
        Self {
            session_name: session_name.to_string(),
            queued_count: 0,
            running_count: 0,
            completed_count: 0,
            failed_count: 0,
            progress_percent: 0.0,
        }
    }

    pub(crate) fn update_percent(&mut self) {
        let finished = self.completed_count + self.failed_count;
        let total = finished + self.queued_count + self.running_count;
        self.progress_percent =
            if total == 0 { 0.0 } else { finished as f64 * 100.0 / total as f64 };
    }
}
