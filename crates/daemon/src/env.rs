// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::{Path, PathBuf};

use crate::lifecycle::LifecycleError;

/// Filter used when `SHEP_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Resolve state directory: SHEP_STATE_DIR > XDG_STATE_HOME/shepherd > ~/.local/state/shepherd
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Some(dir) = non_empty_var("SHEP_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Some(xdg) = non_empty_var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("shepherd"));
    }
    let home = dirs::home_dir().ok_or(LifecycleError::NoStateDir)?;
    Ok(home.join(".local/state/shepherd"))
}

/// Config file path: SHEP_CONFIG > `<state_dir>/config.toml`
pub fn config_path(state_dir: &Path) -> PathBuf {
    non_empty_var("SHEP_CONFIG").map(PathBuf::from).unwrap_or_else(|| state_dir.join("config.toml"))
}

/// Log filter directive from `SHEP_LOG` (e.g. `shep_engine=debug,info`)
pub fn log_filter() -> String {
    non_empty_var("SHEP_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
