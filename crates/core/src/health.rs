// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Health snapshot types produced by the pane classifier.
//!
//! A snapshot is a pure function of one poll's inputs; nothing here carries
//! identity across polls.

use crate::agent::AgentType;
use serde::{Deserialize, Serialize};

/// Overall verdict for a pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Ok,
    Warning,
    Error,
}

crate::simple_display! {
    HealthStatus {
        Ok => "ok",
        Warning => "warning",
        Error => "error",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    Running,
    Exited,
}

crate::simple_display! {
    ProcessStatus {
        Running => "running",
        Exited => "exited",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Active,
    Idle,
    Stale,
    Unknown,
}

crate::simple_display! {
    Activity {
        Active => "active",
        Idle => "idle",
        Stale => "stale",
        Unknown => "unknown",
    }
}

/// Signal class of a detected problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    RateLimit,
    AuthError,
    Crash,
    NetworkError,
    Error,
}

crate::simple_display! {
    IssueKind {
        RateLimit => "rate_limit",
        AuthError => "auth_error",
        Crash => "crash",
        NetworkError => "network_error",
        Error => "error",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub message: String,
    /// Suggested back-off parsed from rate-limit text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

impl Issue {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), retry_after_secs: None }
    }
}

/// Health snapshot of one pane at one poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentHealth {
    pub status: HealthStatus,
    pub process_status: ProcessStatus,
    pub activity: Activity,
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell_pid: Option<u32>,
    pub agent_type: AgentType,
    /// How much the text heuristics trust their own reading, 0.0..=1.0
    pub confidence: f64,
    pub checked_at_ms: u64,
}

impl AgentHealth {
    pub fn has_issue(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }
}

/// Signals parsed from an agent's pane text, scored by the confidence
/// heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub agent_type: AgentType,
    /// Percentage of context window left, when the agent prints it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_remaining: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<i64>,
    #[serde(default)]
    pub work_indicators: Vec<String>,
    #[serde(default)]
    pub limit_indicators: Vec<String>,
    #[serde(default)]
    pub is_working: bool,
    #[serde(default)]
    pub is_idle: bool,
}

impl AgentState {
    pub fn new(agent_type: AgentType) -> Self {
        Self {
            agent_type,
            context_remaining: None,
            tokens_used: None,
            work_indicators: Vec::new(),
            limit_indicators: Vec::new(),
            is_working: false,
            is_idle: false,
        }
    }
}
