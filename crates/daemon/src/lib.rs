// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! shepherd daemon library
//!
//! Exposes the control plane so the `shepd` binary and integration tests
//! build it the same way.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod env;
pub mod lifecycle;
pub mod logging;

pub use config::{DaemonConfig, DaemonSettings};
pub use lifecycle::{startup, ControlPlane, DaemonApprovals, LifecycleError, Paths};
