// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for the control plane's external boundaries
//!
//! Each boundary is a trait with one real implementation and a recording
//! fake (behind the `test-support` feature):
//! - [`ProcessLiveness`]: OS process predicates for pane shells
//! - [`EventBus`]: fire-and-forget publication of approval events
//! - [`SlbNotifier`]: delivery of sign-off requests to approvers

pub mod bus;
pub mod liveness;
pub mod notify;

pub use bus::{BroadcastBus, EventBus};
pub use liveness::{LivenessError, ProcLiveness, ProcessLiveness, ProcessState};
pub use notify::{parse_slb_request_id, DesktopSlbNotifier, NotifyError, SlbNotifier};

#[cfg(any(test, feature = "test-support"))]
pub use bus::FakeEventBus;
#[cfg(any(test, feature = "test-support"))]
pub use liveness::FakeLiveness;
#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeSlbNotifier;
