// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! shep-engine: the control plane's decision logic
//!
//! - [`scheduler`]: priority job queue with fair per-session/per-batch
//!   admission
//! - [`approval`]: dual-control approval state machine
//! - [`health`]: heuristic pane health classification

pub mod approval;
pub mod health;
pub mod scheduler;

pub use approval::{ApprovalConfig, ApprovalEngine, ApprovalError, RequestParams};
pub use health::{classify, PaneSample};
pub use scheduler::{FairScheduler, FairSchedulerConfig, JobQueue, Progress, QueueStats, SchedulerError};
