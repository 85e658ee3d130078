// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{JobPriority, SpawnJob};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for scheduler inputs.
pub mod strategies {
    use crate::job::{JobPriority, JobType};
    use proptest::prelude::*;

    pub fn arb_priority() -> impl Strategy<Value = JobPriority> {
        prop_oneof![
            Just(JobPriority::Urgent),
            Just(JobPriority::High),
            Just(JobPriority::Normal),
            Just(JobPriority::Low),
        ]
    }

    pub fn arb_job_type() -> impl Strategy<Value = JobType> {
        prop_oneof![Just(JobType::Session), Just(JobType::PaneSplit), Just(JobType::AgentLaunch)]
    }

    /// (priority, created_at_ms) pairs with deliberately colliding timestamps
    pub fn arb_queue_entries(max: usize) -> impl Strategy<Value = Vec<(JobPriority, u64)>> {
        prop::collection::vec((arb_priority(), 0u64..20), 0..max)
    }
}

// ── Job factory functions ───────────────────────────────────────────────

/// Pending job for `session` with the given id and priority.
pub fn job(id: &str, session: &str, priority: JobPriority) -> SpawnJob {
    SpawnJob::builder().id(id).session_name(session).priority(priority).build()
}

/// Pending job that belongs to `batch`.
pub fn batch_job(id: &str, session: &str, batch: &str) -> SpawnJob {
    SpawnJob::builder().id(id).session_name(session).batch_id(batch).build()
}
