// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Control plane construction.

use std::sync::Arc;
use std::time::Instant;

use shep_adapters::{BroadcastBus, DesktopSlbNotifier, EventBus, ProcLiveness};
use shep_engine::FairScheduler;
use shep_storage::MemoryApprovalStore;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{sweep, ControlPlane, DaemonApprovals};
use crate::config::DaemonConfig;

/// Capacity of the approval event channel
const BUS_CAPACITY: usize = 256;

/// Build every component and start the expiry sweeper.
///
/// Must be called from within a tokio runtime.
pub fn startup(config: DaemonConfig) -> ControlPlane {
    let bus = Arc::new(BroadcastBus::new(BUS_CAPACITY));
    let liveness = Arc::new(ProcLiveness::new());
    let scheduler = Arc::new(FairScheduler::new(config.scheduler));

    let mut approvals = DaemonApprovals::new(MemoryApprovalStore::new(), config.approval.clone())
        .with_bus(Arc::clone(&bus) as Arc<dyn EventBus>);
    if config.approval.enable_slb {
        approvals = approvals.with_notifier(Arc::new(DesktopSlbNotifier::new()));
    }
    let approvals = Arc::new(approvals);

    let cancel = CancellationToken::new();
    let interval = config.daemon.sweep_interval();
    let sweeper = tokio::spawn(sweep(Arc::clone(&approvals), interval, cancel.child_token()));

    info!(
        max_per_session = config.scheduler.max_per_session,
        max_per_batch = config.scheduler.max_per_batch,
        enable_slb = config.approval.enable_slb,
        sweep_interval_secs = interval.as_secs(),
        "control plane started"
    );

    ControlPlane {
        config,
        scheduler,
        approvals,
        bus,
        liveness,
        cancel,
        sweeper: Some(sweeper),
        start_time: Instant::now(),
    }
}
