// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use shep_core::{Activity, AgentHealth, HealthStatus, IssueKind, ProcessStatus};

/// Overall verdict for a classified pane.
///
/// - `Error`: the agent crashed (exited with a crash signal) or cannot
///   authenticate.
/// - `Warning`: exited, rate limited, stale, or any other issue.
/// - `Ok`: running with no issues and not stale.
pub fn calculate_status(health: &AgentHealth) -> HealthStatus {
    let exited = health.process_status == ProcessStatus::Exited;
    if (exited && health.has_issue(IssueKind::Crash)) || health.has_issue(IssueKind::AuthError) {
        return HealthStatus::Error;
    }
    if exited
        || health.has_issue(IssueKind::RateLimit)
        || health.activity == Activity::Stale
        || !health.issues.is_empty()
    {
        return HealthStatus::Warning;
    }
    HealthStatus::Ok
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
