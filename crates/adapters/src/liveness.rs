// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PID-based process liveness checks for pane shells.

use nix::errno::Errno;
use nix::sys::signal::kill;
use nix::unistd::Pid;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from process inspection
#[derive(Debug, Error)]
pub enum LivenessError {
    #[error("invalid pid: {0}")]
    InvalidPid(u32),
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no State line in /proc/{0}/status")]
    MissingState(u32),
}

/// Scheduler state of a process as reported by `/proc/<pid>/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessState {
    Running,
    Sleeping,
    DiskSleep,
    Zombie,
    Stopped,
    TracingStop,
    Dead,
    Wakekill,
    Waking,
    Parked,
    Idle,
    Unknown,
}

impl ProcessState {
    /// Map a single-character state code (R, S, D, Z, ...).
    pub fn from_code(code: &str) -> Self {
        match code {
            "R" => ProcessState::Running,
            "S" => ProcessState::Sleeping,
            "D" => ProcessState::DiskSleep,
            "Z" => ProcessState::Zombie,
            "T" => ProcessState::Stopped,
            "t" => ProcessState::TracingStop,
            "X" | "x" => ProcessState::Dead,
            "K" => ProcessState::Wakekill,
            "W" => ProcessState::Waking,
            "P" => ProcessState::Parked,
            "I" => ProcessState::Idle,
            _ => ProcessState::Unknown,
        }
    }

    /// Zombies and dead entries still have a PID but no running program.
    pub fn is_defunct(&self) -> bool {
        matches!(self, ProcessState::Zombie | ProcessState::Dead)
    }
}

shep_core::simple_display! {
    ProcessState {
        Running => "running",
        Sleeping => "sleeping",
        DiskSleep => "disk sleep",
        Zombie => "zombie",
        Stopped => "stopped",
        TracingStop => "tracing stop",
        Dead => "dead",
        Wakekill => "wakekill",
        Waking => "waking",
        Parked => "parked",
        Idle => "idle",
        Unknown => "unknown",
    }
}

/// OS boundary consumed by the health classifier.
pub trait ProcessLiveness: Send + Sync + 'static {
    /// Whether a process with this PID exists. PID 0 is never alive.
    fn is_alive(&self, pid: u32) -> bool;

    /// First child of `parent`, if any.
    fn child_pid(&self, parent: u32) -> Option<u32>;

    /// State code and name for `pid`.
    fn process_state(&self, pid: u32) -> Result<ProcessState, LivenessError>;

    /// Whether the shell has at least one live child (the agent it launched).
    fn has_child_alive(&self, shell_pid: u32) -> bool {
        if shell_pid == 0 {
            return false;
        }
        self.child_pid(shell_pid).is_some_and(|child| self.is_alive(child))
    }
}

/// Liveness via `/proc` with a `kill(pid, 0)` fallback for non-Linux hosts.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcLiveness;

impl ProcLiveness {
    pub fn new() -> Self {
        Self
    }
}

fn to_pid(pid: u32) -> Option<Pid> {
    i32::try_from(pid).ok().filter(|p| *p > 0).map(Pid::from_raw)
}

impl ProcessLiveness for ProcLiveness {
    fn is_alive(&self, pid: u32) -> bool {
        let Some(raw) = to_pid(pid) else {
            return false;
        };
        if std::path::Path::new(&format!("/proc/{pid}/status")).exists() {
            return true;
        }
        // EPERM: the process exists but belongs to someone else
        matches!(kill(raw, None), Ok(()) | Err(Errno::EPERM))
    }

    fn child_pid(&self, parent: u32) -> Option<u32> {
        to_pid(parent)?;
        let path = format!("/proc/{parent}/task/{parent}/children");
        let data = std::fs::read_to_string(path).ok()?;
        data.split_whitespace().next()?.parse::<u32>().ok().filter(|pid| *pid > 0)
    }

    fn process_state(&self, pid: u32) -> Result<ProcessState, LivenessError> {
        if to_pid(pid).is_none() {
            return Err(LivenessError::InvalidPid(pid));
        }
        let path = PathBuf::from(format!("/proc/{pid}/status"));
        let data = std::fs::read_to_string(&path)
            .map_err(|source| LivenessError::Read { path: path.clone(), source })?;
        parse_status_state(&data).ok_or(LivenessError::MissingState(pid))
    }
}

/// Extract the state from the `State:` line of a `/proc/<pid>/status` file.
pub fn parse_status_state(status: &str) -> Option<ProcessState> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("State:"))
        .and_then(|rest| rest.split_whitespace().next())
        .map(ProcessState::from_code)
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{LivenessError, ProcessLiveness, ProcessState};
    use parking_lot::Mutex;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeLivenessState {
        alive: HashSet<u32>,
        children: HashMap<u32, u32>,
        states: HashMap<u32, ProcessState>,
    }

    /// Scriptable process table for tests
    #[derive(Clone, Default)]
    pub struct FakeLiveness {
        inner: Arc<Mutex<FakeLivenessState>>,
    }

    impl FakeLiveness {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_alive(&self, pid: u32) {
            self.inner.lock().alive.insert(pid);
        }

        pub fn kill(&self, pid: u32) {
            self.inner.lock().alive.remove(&pid);
        }

        /// Register a live child under `parent`
        pub fn spawn_child(&self, parent: u32, child: u32) {
            let mut inner = self.inner.lock();
            inner.alive.insert(parent);
            inner.alive.insert(child);
            inner.children.insert(parent, child);
        }

        pub fn set_state(&self, pid: u32, state: ProcessState) {
            self.inner.lock().states.insert(pid, state);
        }
    }

    impl ProcessLiveness for FakeLiveness {
        fn is_alive(&self, pid: u32) -> bool {
            self.inner.lock().alive.contains(&pid)
        }

        fn child_pid(&self, parent: u32) -> Option<u32> {
            self.inner.lock().children.get(&parent).copied()
        }

        fn process_state(&self, pid: u32) -> Result<ProcessState, LivenessError> {
            if pid == 0 {
                return Err(LivenessError::InvalidPid(pid));
            }
            self.inner
                .lock()
                .states
                .get(&pid)
                .copied()
                .ok_or(LivenessError::MissingState(pid))
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeLiveness;

#[cfg(test)]
#[path = "liveness_tests.rs"]
mod tests;
