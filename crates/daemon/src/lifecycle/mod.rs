// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, shutdown, expiry sweeping.

mod startup;
mod sweeper;
pub use startup::startup;
pub use sweeper::sweep;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use shep_adapters::{BroadcastBus, ProcLiveness};
use shep_core::{AgentHealth, Clock, SystemClock};
use shep_engine::{classify, ApprovalEngine, FairScheduler, PaneSample};
use shep_storage::MemoryApprovalStore;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::DaemonConfig;

/// Approval engine with the daemon's concrete store
pub type DaemonApprovals = ApprovalEngine<MemoryApprovalStore>;

/// Filesystem locations used by the daemon
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root state directory (e.g. ~/.local/state/shepherd)
    pub state_dir: PathBuf,
    /// Path to `config.toml`
    pub config_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
}

impl Paths {
    /// Resolve locations from the environment.
    pub fn load() -> Result<Self, LifecycleError> {
        let state_dir = crate::env::state_dir()?;
        Ok(Self::under(state_dir))
    }

    pub fn under(state_dir: PathBuf) -> Self {
        Self {
            config_path: crate::env::config_path(&state_dir),
            log_path: state_dir.join("daemon.log"),
            state_dir,
        }
    }
}

/// Owner of every long-lived component in the daemon.
///
/// Built once by [`startup`] and torn down by [`ControlPlane::shutdown`];
/// callers reach the scheduler and approval engine through it rather than
/// through globals.
pub struct ControlPlane {
    config: DaemonConfig,
    scheduler: Arc<FairScheduler>,
    approvals: Arc<DaemonApprovals>,
    bus: Arc<BroadcastBus>,
    liveness: Arc<ProcLiveness>,
    cancel: CancellationToken,
    sweeper: Option<JoinHandle<()>>,
    start_time: Instant,
}

impl ControlPlane {
    pub fn config(&self) -> &DaemonConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &Arc<FairScheduler> {
        &self.scheduler
    }

    pub fn approvals(&self) -> &Arc<DaemonApprovals> {
        &self.approvals
    }

    /// Bus carrying approval events; subscribe for a live feed.
    pub fn bus(&self) -> &Arc<BroadcastBus> {
        &self.bus
    }

    pub fn liveness(&self) -> &Arc<ProcLiveness> {
        &self.liveness
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Whether the expiry sweeper is still running.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Classify one pane sample against the live process table.
    pub fn classify(&self, sample: &PaneSample) -> AgentHealth {
        classify(sample, self.liveness.as_ref(), SystemClock.epoch_ms())
    }

    /// Stop the sweeper and run a final expiry pass.
    ///
    /// Queued jobs are not persisted: each is cancelled and dropped.
    pub async fn shutdown(mut self) -> Result<(), LifecycleError> {
        info!("Shutting down control plane...");

        self.cancel.cancel();
        if let Some(handle) = self.sweeper.take() {
            if let Err(e) = handle.await {
                warn!("expiry sweeper ended abnormally: {}", e);
            }
        }

        match self.approvals.expire_stale() {
            Ok(0) => {}
            Ok(count) => info!(count, "expired approvals on shutdown"),
            Err(e) => warn!("final expiry sweep failed: {}", e),
        }

        let dropped = self.scheduler.queue().clear();
        if !dropped.is_empty() {
            warn!(count = dropped.len(), "dropping queued jobs on shutdown");
        }
        for mut job in dropped {
            job.cancel();
        }

        info!(uptime_secs = self.uptime().as_secs(), "Control plane shutdown complete");
        Ok(())
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Invalid config at {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to initialize logging: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
