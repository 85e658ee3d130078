// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spawn jobs: units of pane/agent creation work admitted by the scheduler.

use crate::agent::AgentType;
use crate::clock::Clock;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

crate::define_id! {
    /// Unique identifier for a spawn job.
    pub struct JobId("job-");
}

/// Scheduling priority. Lower ordinal = more urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPriority {
    Urgent = 0,
    High = 1,
    Normal = 2,
    Low = 3,
}

crate::simple_display! {
    JobPriority {
        Urgent => "urgent",
        High => "high",
        Normal => "normal",
        Low => "low",
    }
}

/// What a spawn job creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    /// Create a new multiplexer session
    Session,
    /// Split a pane inside an existing session
    PaneSplit,
    /// Launch an agent process inside a pane
    AgentLaunch,
}

crate::simple_display! {
    JobType {
        Session => "session",
        PaneSplit => "pane_split",
        AgentLaunch => "agent_launch",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Cancelled | JobStatus::Failed)
    }
}

crate::simple_display! {
    JobStatus {
        Pending => "pending",
        Running => "running",
        Completed => "completed",
        Cancelled => "cancelled",
        Failed => "failed",
    }
}

/// A unit of spawn work queued for a session (and optionally a batch).
///
/// Cancellation is cooperative: [`SpawnJob::cancel`] flips the status and
/// trips a token shared by every clone of the job, so a worker that already
/// holds a copy can observe it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnJob {
    pub id: JobId,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub priority: JobPriority,
    pub session_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_type: Option<AgentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pane_index: Option<u32>,
    pub created_at_ms: u64,
    pub status: JobStatus,
    #[serde(skip)]
    cancel_token: CancellationToken,
}

impl SpawnJob {
    pub fn new(
        job_type: JobType,
        session_name: impl Into<String>,
        priority: JobPriority,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: JobId::generate(),
            job_type,
            priority,
            session_name: session_name.into(),
            batch_id: None,
            agent_type: None,
            pane_index: None,
            created_at_ms: clock.epoch_ms(),
            status: JobStatus::Pending,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn with_batch(mut self, batch_id: impl Into<String>) -> Self {
        self.batch_id = Some(batch_id.into());
        self
    }

    pub fn with_agent(mut self, agent_type: AgentType, pane_index: u32) -> Self {
        self.agent_type = Some(agent_type);
        self.pane_index = Some(pane_index);
        self
    }

    /// Mark the job cancelled and signal anyone holding a clone.
    pub fn cancel(&mut self) {
        self.status = JobStatus::Cancelled;
        self.cancel_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == JobStatus::Cancelled || self.cancel_token.is_cancelled()
    }

    /// Token a worker can `select!` on while dispatching this job.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn in_batch(&self, batch_id: &str) -> bool {
        self.batch_id.as_deref() == Some(batch_id)
    }
}

crate::builder! {
    pub struct SpawnJobBuilder => SpawnJob {
        into {
            id: JobId = "job-test",
            session_name: String = "main",
        }
        set {
            job_type: JobType = JobType::AgentLaunch,
            priority: JobPriority = JobPriority::Normal,
            created_at_ms: u64 = 1_000_000,
            status: JobStatus = JobStatus::Pending,
        }
        option {
            batch_id: String = None,
            agent_type: AgentType = None,
            pane_index: u32 = None,
        }
        computed {
            cancel_token: CancellationToken = CancellationToken::new(),
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
