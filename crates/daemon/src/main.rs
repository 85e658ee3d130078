// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! shepd: the shepherd control plane daemon.

use shep_daemon::{env, logging, startup, DaemonConfig, LifecycleError, Paths};
use tokio::signal::unix::{signal, SignalKind};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), LifecycleError> {
    let paths = Paths::load()?;
    std::fs::create_dir_all(&paths.state_dir)?;
    let _log_guard = logging::init(&paths.log_path, &env::log_filter())?;

    let config = DaemonConfig::load(&paths.config_path)?;
    info!(
        state_dir = %paths.state_dir.display(),
        config = %paths.config_path.display(),
        version = env!("CARGO_PKG_VERSION"),
        "shepd starting"
    );

    let plane = startup(config);
    println!("READY");

    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("received interrupt"),
        _ = sigterm.recv() => info!("received SIGTERM"),
    }

    plane.shutdown().await
}
