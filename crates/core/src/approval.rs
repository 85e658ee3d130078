// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Approval records for dual-control gating of risky actions.

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for an approval request.
    pub struct ApprovalId("appr-");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Denied,
    Expired,
}

impl ApprovalStatus {
    /// Terminal states are final; nothing transitions out of them.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ApprovalStatus::Pending)
    }
}

crate::simple_display! {
    ApprovalStatus {
        Pending => "pending",
        Approved => "approved",
        Denied => "denied",
        Expired => "expired",
    }
}

/// A request to perform a gated action, awaiting (or resolved by) sign-off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub id: ApprovalId,
    pub action: String,
    #[serde(default)]
    pub resource: String,
    #[serde(default)]
    pub reason: String,
    pub requested_by: String,
    /// Separation of duties: the requester may never approve.
    #[serde(default)]
    pub requires_slb: bool,
    /// Principals allowed to approve; empty means any non-requester.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub approvers: Vec<String>,
    pub status: ApprovalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denied_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denied_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denied_at_ms: Option<u64>,
    pub created_at_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at_ms: Option<u64>,
    /// ID the sign-off service assigned when the request was submitted to it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slb_request_id: Option<String>,
}

impl Approval {
    pub fn is_pending(&self) -> bool {
        self.status == ApprovalStatus::Pending
    }

    /// Pending and past its deadline at `now_ms`. The deadline instant itself
    /// counts as expired.
    pub fn is_past_deadline(&self, now_ms: u64) -> bool {
        self.is_pending() && self.expires_at_ms.is_some_and(|deadline| now_ms >= deadline)
    }

    /// Whether `principal` is on the allowlist (an empty list allows anyone).
    pub fn allows_approver(&self, principal: &str) -> bool {
        self.approvers.is_empty() || self.approvers.iter().any(|a| a == principal)
    }
}

crate::builder! {
    pub struct ApprovalBuilder => Approval {
        into {
            id: ApprovalId = "appr-test",
            action: String = "force_release",
            resource: String = "",
            reason: String = "",
            requested_by: String = "alice",
        }
        set {
            requires_slb: bool = false,
            approvers: Vec<String> = Vec::new(),
            status: ApprovalStatus = ApprovalStatus::Pending,
            created_at_ms: u64 = 1_000_000,
        }
        option {
            approved_by: String = None,
            approved_at_ms: u64 = None,
            denied_by: String = None,
            denied_reason: String = None,
            denied_at_ms: u64 = None,
            expires_at_ms: u64 = None,
            slb_request_id: String = None,
        }
    }
}

#[cfg(test)]
#[path = "approval_tests.rs"]
mod tests;
