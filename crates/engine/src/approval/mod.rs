// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dual-control approvals: request, sign-off with separation of duties,
//! and time-bounded expiry.

mod config;
mod engine;
mod slb;

pub use config::ApprovalConfig;
pub use engine::{ApprovalEngine, RequestParams};
pub use slb::build_slb_command;

use shep_adapters::NotifyError;
use shep_core::{ApprovalId, ApprovalStatus};
use shep_storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApprovalError {
    #[error("invalid approval request: {0}")]
    Validation(String),
    #[error("approval {0} not found")]
    NotFound(ApprovalId),
    #[error("approval {id} is already {status}")]
    StateConflict { id: ApprovalId, status: ApprovalStatus },
    #[error("{approver} may not approve {id}: {reason}")]
    Unauthorized { id: ApprovalId, approver: String, reason: &'static str },
    #[error("approval {0} has expired")]
    Expired(ApprovalId),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}
