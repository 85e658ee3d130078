// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use regex::Regex;
use shep_adapters::ProcessLiveness;
use shep_core::ProcessStatus;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static EXIT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)process exited|exited with|exit (?:status|code) -?\d+|session ended|\[process completed\]|terminated by signal|agent has exited",
    )
    .expect("constant regex pattern is valid")
});

/// Whether a foreground command name looks like an interactive shell.
pub fn looks_like_shell(command: &str) -> bool {
    let name = command.trim().rsplit('/').next().unwrap_or_default().to_ascii_lowercase();
    name.contains("sh")
}

/// Decide whether the pane's agent is still running.
///
/// With a shell PID, the process table decides: running iff the shell has
/// a live child. Without one, an exit phrase in the text means exited.
/// Anything else is assumed running, since missing exit evidence is not
/// evidence of exit.
pub fn detect_process_status(
    text: &str,
    command: &str,
    shell_pid: Option<u32>,
    liveness: &(impl ProcessLiveness + ?Sized),
) -> ProcessStatus {
    if let Some(pid) = shell_pid.filter(|pid| *pid > 0) {
        return if liveness.has_child_alive(pid) {
            ProcessStatus::Running
        } else {
            tracing::debug!(shell_pid = pid, "no live child under pane shell");
            ProcessStatus::Exited
        };
    }

    if EXIT_PATTERN.is_match(text) {
        return ProcessStatus::Exited;
    }
    if looks_like_shell(command) {
        tracing::trace!(command, "pane is at a shell");
    }
    ProcessStatus::Running
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
