// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent state parsed from pane text.

use super::activity::has_idle_prompt;
use super::extract::{extract_float, extract_int};
use regex::Regex;
use shep_core::{AgentState, AgentType};
use std::sync::LazyLock;

/// `37% context left`, `context: 37% remaining`, `Context left until
/// auto-compact: 12%`
#[allow(clippy::expect_used)]
static CONTEXT_REMAINING: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*%\s*(?:of\s+)?(?:context\s*)?(?:left|remaining)")
            .expect("constant regex pattern is valid"),
        Regex::new(r"(?i)context[^%\n]{0,40}?(?:left|remaining)[^%\d\n]{0,40}(\d+(?:\.\d+)?)\s*%")
            .expect("constant regex pattern is valid"),
    ]
});

#[allow(clippy::expect_used)]
static TOKENS_USED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d[\d,]*)\s*tokens?\b").expect("constant regex pattern is valid")
});

/// (indicator, pattern) pairs for "the agent is doing something".
#[allow(clippy::expect_used)]
static WORK_INDICATORS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("interruptible", r"(?i)esc to interrupt|ctrl\+c to (?:interrupt|cancel)"),
        ("thinking", r"(?i)\bthinking\b|\bpondering\b|\breasoning\b"),
        ("tool_use", r"(?i)running (?:tool|command)|⏺ (?:Bash|Read|Edit|Write|Grep|Glob)\("),
        ("editing", r"(?i)\b(?:editing|writing to|applied edit to|updating)\b"),
        ("searching", r"(?i)\b(?:searching|reading file|grepping)\b"),
        ("building", r"(?i)\b(?:compiling|building|running tests|installing)\b"),
        ("spinner", r"[⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏✻✶✳✢]"),
    ]
    .into_iter()
    .map(|(name, re)| (name, Regex::new(re).expect("constant regex pattern is valid")))
    .collect()
});

/// (indicator, pattern) pairs for rate and usage limits.
#[allow(clippy::expect_used)]
static LIMIT_INDICATORS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("rate_limit", r"(?i)rate[ _-]?limit|too many requests|\b429\b"),
        ("usage_limit", r"(?i)usage limit|quota (?:exceeded|reached)|limit reached"),
        ("context_full", r"(?i)context (?:window )?(?:is )?full|auto-compact|compacting conversation"),
    ]
    .into_iter()
    .map(|(name, re)| (name, Regex::new(re).expect("constant regex pattern is valid")))
    .collect()
});

fn matching(patterns: &[(&'static str, Regex)], text: &str) -> Vec<String> {
    patterns
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Parse what `text` says about the agent's state.
///
/// Numeric readings take the last occurrence in the text. Indicators are
/// distinct names, listed in a fixed order.
pub fn parse_agent_state(agent_type: AgentType, text: &str) -> AgentState {
    let context_remaining =
        CONTEXT_REMAINING.iter().find_map(|re| extract_float(re, text)).filter(|pct| *pct <= 100.0);
    let work_indicators = matching(&WORK_INDICATORS, text);
    let limit_indicators = matching(&LIMIT_INDICATORS, text);

    AgentState {
        agent_type,
        context_remaining,
        tokens_used: extract_int(&TOKENS_USED, text),
        is_working: !work_indicators.is_empty(),
        is_idle: has_idle_prompt(text, agent_type),
        work_indicators,
        limit_indicators,
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
