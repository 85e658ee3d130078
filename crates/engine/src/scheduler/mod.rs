// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fair spawn scheduling: a priority queue plus per-session and per-batch
//! admission caps.

mod fair;
mod progress;
mod queue;

pub use fair::{FairScheduler, FairSchedulerConfig};
pub use progress::{JobProgress, Progress, SessionProgress};
pub use queue::{JobQueue, QueueStats};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid job: {0}")]
    Validation(String),
}
