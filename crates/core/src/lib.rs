// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! shep-core: shared types for the shepherd agent-fleet control plane

pub mod macros;

pub mod agent;
pub mod approval;
pub mod clock;
pub mod event;
pub mod health;
pub mod id;
pub mod job;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use agent::AgentType;
#[cfg(any(test, feature = "test-support"))]
pub use approval::ApprovalBuilder;
pub use approval::{Approval, ApprovalId, ApprovalStatus};
pub use clock::{elapsed_ms, Clock, FakeClock, SystemClock};
pub use event::Event;
pub use health::{Activity, AgentHealth, AgentState, HealthStatus, Issue, IssueKind, ProcessStatus};
pub use id::short;
#[cfg(any(test, feature = "test-support"))]
pub use job::SpawnJobBuilder;
pub use job::{JobId, JobPriority, JobStatus, JobType, SpawnJob};
