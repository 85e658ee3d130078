// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stateless health classification of agent panes.
//!
//! Every function here is pure over its inputs (plus a liveness lookup for
//! process status). An external poller calls [`classify`] once per pane per
//! cycle; nothing is remembered between calls.

mod activity;
mod confidence;
mod extract;
mod issues;
mod parser;
mod process;
mod status;

pub use activity::{detect_activity, has_idle_prompt, STALE_AFTER};
pub use confidence::{
    calculate_confidence, BASE_CONFIDENCE, CONFLICT_PENALTY, CONTEXT_BOOST, LIMIT_BOOST,
    MAX_WORK_INDICATORS, TOKENS_BOOST, UNKNOWN_TYPE_PENALTY, WORK_INDICATOR_BOOST,
};
pub use extract::{extract_float, extract_int};
pub use issues::{detect_errors, parse_wait_time};
pub use parser::parse_agent_state;
pub use process::{detect_process_status, looks_like_shell};
pub use status::calculate_status;

use shep_adapters::ProcessLiveness;
use shep_core::{AgentHealth, AgentType, HealthStatus};

/// One poll's worth of input for a pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneSample {
    pub agent_type: AgentType,
    /// Captured pane text, most recent output last
    pub text: String,
    /// Foreground command name reported by the multiplexer
    pub command: String,
    pub shell_pid: Option<u32>,
    /// When the pane last produced output; `None` if never observed
    pub last_activity_ms: Option<u64>,
}

impl PaneSample {
    pub fn new(agent_type: AgentType, text: impl Into<String>) -> Self {
        Self {
            agent_type,
            text: text.into(),
            command: String::new(),
            shell_pid: None,
            last_activity_ms: None,
        }
    }

    shep_core::setters! {
        into {
            command: String,
        }
        option {
            shell_pid: u32,
            last_activity_ms: u64,
        }
    }
}

/// Run every detector over `sample` and combine the results.
pub fn classify(
    sample: &PaneSample,
    liveness: &(impl ProcessLiveness + ?Sized),
    now_ms: u64,
) -> AgentHealth {
    let activity =
        detect_activity(&sample.text, sample.last_activity_ms, sample.agent_type, now_ms);
    let process_status =
        detect_process_status(&sample.text, &sample.command, sample.shell_pid, liveness);
    let issues = detect_errors(&sample.text);
    let confidence = calculate_confidence(&parse_agent_state(sample.agent_type, &sample.text));

    let mut health = AgentHealth {
        status: HealthStatus::Ok,
        process_status,
        activity,
        issues,
        shell_pid: sample.shell_pid,
        agent_type: sample.agent_type,
        confidence,
        checked_at_ms: now_ms,
    };
    health.status = calculate_status(&health);
    tracing::trace!(
        agent = %health.agent_type,
        status = %health.status,
        activity = %health.activity,
        issues = health.issues.len(),
        "pane classified"
    );
    health
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
