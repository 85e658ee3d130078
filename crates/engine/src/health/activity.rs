// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use regex::Regex;
use shep_core::{elapsed_ms, Activity, AgentType};
use std::sync::LazyLock;
use std::time::Duration;

/// Output older than this marks a pane stale.
pub const STALE_AFTER: Duration = Duration::from_secs(5 * 60);

/// Bare `>` prompt used by most chat-style agents.
#[allow(clippy::expect_used)]
static CHAT_PROMPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*[>›❯]\s*$|\? for shortcuts|type your message")
        .expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static AIDER_PROMPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[\w./-]+\s*)?>\s*$").expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static OLLAMA_PROMPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*>>>(?:\s.*)?$").expect("constant regex pattern is valid")
});

/// Shell prompt ending in `$`, `%`, `#` or `>`.
#[allow(clippy::expect_used)]
static SHELL_PROMPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[$%#>]\s*$").expect("constant regex pattern is valid"));

fn idle_pattern(agent_type: AgentType) -> &'static Regex {
    match agent_type {
        AgentType::ClaudeCode
        | AgentType::Codex
        | AgentType::Gemini
        | AgentType::Cursor
        | AgentType::Windsurf => &CHAT_PROMPT,
        AgentType::Aider => &AIDER_PROMPT,
        AgentType::Ollama => &OLLAMA_PROMPT,
        AgentType::User | AgentType::Unknown => &SHELL_PROMPT,
    }
}

/// Whether the last non-blank line of `text` is the agent's idle prompt.
pub fn has_idle_prompt(text: &str, agent_type: AgentType) -> bool {
    text.lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .is_some_and(|line| idle_pattern(agent_type).is_match(line))
}

/// Classify what a pane is doing.
///
/// An idle prompt wins over timestamps. Otherwise the age of the last
/// output decides: under [`STALE_AFTER`] is active, at or over it is stale,
/// and no recorded activity at all is unknown.
pub fn detect_activity(
    text: &str,
    last_activity_ms: Option<u64>,
    agent_type: AgentType,
    now_ms: u64,
) -> Activity {
    if has_idle_prompt(text, agent_type) {
        return Activity::Idle;
    }
    let Some(last) = last_activity_ms.filter(|ms| *ms > 0) else {
        return Activity::Unknown;
    };
    if elapsed_ms(now_ms, last) >= STALE_AFTER.as_millis() as u64 {
        Activity::Stale
    } else {
        Activity::Active
    }
}

#[cfg(test)]
#[path = "activity_tests.rs"]
mod tests;
