// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `config.toml` loading.
//!
//! Every table and field is optional; a missing file yields the defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shep_engine::{ApprovalConfig, FairSchedulerConfig};

use crate::lifecycle::LifecycleError;

/// Default interval between expiry sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub scheduler: FairSchedulerConfig,
    pub approval: ApprovalConfig,
    pub daemon: DaemonSettings,
}

/// The `[daemon]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonSettings {
    /// Seconds between `expire_stale` sweeps; zero means the default
    pub sweep_interval_secs: u64,
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self { sweep_interval_secs: DEFAULT_SWEEP_INTERVAL.as_secs() }
    }
}

impl DaemonSettings {
    pub fn sweep_interval(&self) -> Duration {
        match self.sweep_interval_secs {
            0 => DEFAULT_SWEEP_INTERVAL,
            secs => Duration::from_secs(secs),
        }
    }
}

impl DaemonConfig {
    /// Parse a config document.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load the config at `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, LifecycleError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(LifecycleError::Io(e)),
        };
        Self::parse(&content)
            .map_err(|source| LifecycleError::Config { path: path.to_path_buf(), source })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
