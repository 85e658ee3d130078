// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic expiry of pending approvals.

use std::sync::Arc;
use std::time::Duration;

use shep_core::Clock;
use shep_engine::ApprovalEngine;
use shep_storage::ApprovalStore;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Call `expire_stale` every `every` until `cancel` fires.
///
/// The first sweep runs one full interval after start. Store failures are
/// logged and retried on the next tick.
pub async fn sweep<S: ApprovalStore, C: Clock>(
    engine: Arc<ApprovalEngine<S, C>>,
    every: Duration,
    cancel: CancellationToken,
) {
    let start = tokio::time::Instant::now() + every;
    let mut ticker = tokio::time::interval_at(start, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => match engine.expire_stale() {
                Ok(0) => {}
                Ok(count) => debug!(count, "sweep expired approvals"),
                Err(e) => warn!("expiry sweep failed: {}", e),
            },
        }
    }
    debug!("expiry sweeper stopped");
}

#[cfg(test)]
#[path = "sweeper_tests.rs"]
mod tests;
