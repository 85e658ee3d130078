// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default lifetime of a pending approval.
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(60 * 60);

/// Approval engine settings, as read from the `[approval]` config table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalConfig {
    /// Lifetime of a request that names none; zero means [`DEFAULT_EXPIRY`]
    pub default_expiry_secs: u64,
    pub notify_on_request: bool,
    pub notify_on_decision: bool,
    /// Send SLB notifications for requests that require sign-off
    pub enable_slb: bool,
    /// Principals allowed to approve; empty means any non-requester
    pub approvers: Vec<String>,
    /// Command name used in SLB notification strings
    pub slb_tool: String,
    /// How often `wait_for_approval` re-reads the store
    pub wait_poll_ms: u64,
}

impl Default for ApprovalConfig {
    fn default() -> Self {
        Self {
            default_expiry_secs: DEFAULT_EXPIRY.as_secs(),
            notify_on_request: true,
            notify_on_decision: true,
            enable_slb: true,
            approvers: Vec::new(),
            slb_tool: "shep".to_string(),
            wait_poll_ms: 100,
        }
    }
}

impl ApprovalConfig {
    pub fn default_expiry(&self) -> Duration {
        match self.default_expiry_secs {
            0 => DEFAULT_EXPIRY,
            secs => Duration::from_secs(secs),
        }
    }

    pub fn wait_poll(&self) -> Duration {
        Duration::from_millis(self.wait_poll_ms.max(1))
    }
}
