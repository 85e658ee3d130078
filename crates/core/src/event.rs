// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events published on the bus when approvals change state.

use crate::approval::{Approval, ApprovalId};
use serde::{Deserialize, Serialize};

/// Serializes with `{"type": "approval:requested", ...fields}` format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "approval:requested")]
    ApprovalRequested {
        id: ApprovalId,
        action: String,
        #[serde(default)]
        resource: String,
        requested_by: String,
        #[serde(default)]
        requires_slb: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expires_at_ms: Option<u64>,
    },

    #[serde(rename = "approval:approved")]
    ApprovalApproved { id: ApprovalId, approved_by: String, at_ms: u64 },

    #[serde(rename = "approval:denied")]
    ApprovalDenied {
        id: ApprovalId,
        denied_by: String,
        #[serde(default)]
        reason: String,
        at_ms: u64,
    },

    #[serde(rename = "approval:expired")]
    ApprovalExpired { id: ApprovalId, at_ms: u64 },
}

impl Event {
    /// The serialized `type` tag
    pub fn name(&self) -> &'static str {
        match self {
            Event::ApprovalRequested { .. } => "approval:requested",
            Event::ApprovalApproved { .. } => "approval:approved",
            Event::ApprovalDenied { .. } => "approval:denied",
            Event::ApprovalExpired { .. } => "approval:expired",
        }
    }

    pub fn approval_id(&self) -> &ApprovalId {
        match self {
            Event::ApprovalRequested { id, .. }
            | Event::ApprovalApproved { id, .. }
            | Event::ApprovalDenied { id, .. }
            | Event::ApprovalExpired { id, .. } => id,
        }
    }

    pub fn requested(approval: &Approval) -> Self {
        Event::ApprovalRequested {
            id: approval.id.clone(),
            action: approval.action.clone(),
            resource: approval.resource.clone(),
            requested_by: approval.requested_by.clone(),
            requires_slb: approval.requires_slb,
            expires_at_ms: approval.expires_at_ms,
        }
    }

    /// Event describing the terminal state `approval` has just entered.
    ///
    /// Returns `None` while the approval is still pending.
    pub fn resolved(approval: &Approval, at_ms: u64) -> Option<Self> {
        use crate::approval::ApprovalStatus;
        let id = approval.id.clone();
        match approval.status {
            ApprovalStatus::Pending => None,
            ApprovalStatus::Approved => Some(Event::ApprovalApproved {
                id,
                approved_by: approval.approved_by.clone().unwrap_or_default(),
                at_ms,
            }),
            ApprovalStatus::Denied => Some(Event::ApprovalDenied {
                id,
                denied_by: approval.denied_by.clone().unwrap_or_default(),
                reason: approval.denied_reason.clone().unwrap_or_default(),
                at_ms,
            }),
            ApprovalStatus::Expired => Some(Event::ApprovalExpired { id, at_ms }),
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
