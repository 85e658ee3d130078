// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! shep-storage: persistence boundary for approval records

mod approvals;

pub use approvals::{ApprovalStore, MemoryApprovalStore, StoreError};
