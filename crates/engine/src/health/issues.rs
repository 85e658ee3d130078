// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use regex::Regex;
use shep_core::{Issue, IssueKind};
use std::sync::LazyLock;

/// Longest message kept on an issue, in characters.
const MAX_MESSAGE_CHARS: usize = 200;

macro_rules! pattern {
    ($name:ident, $re:literal) => {
        #[allow(clippy::expect_used)]
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($re).expect("constant regex pattern is valid"));
    };
}

pattern!(
    RATE_LIMIT,
    r"(?i)rate[ _-]?limit|too many requests|\b429\b|quota exceeded|usage limit|overloaded_error"
);
pattern!(
    AUTH_ERROR,
    r"(?i)authentication (?:failed|error|required)|unauthorized|\b401\b|invalid (?:api|x-api)[ _-]?key|not (?:logged in|authenticated)|api key (?:is )?(?:invalid|missing|expired)"
);
pattern!(
    CRASH,
    r"(?i)panic:|panicked at|segmentation fault|fatal error|core dumped|traceback \(most recent call last\)|unhandled (?:exception|rejection)"
);
pattern!(
    NETWORK_ERROR,
    r"(?i)connection (?:refused|reset|timed out|closed)|network (?:error|is unreachable)|econnrefused|econnreset|etimedout|enotfound|could not resolve host|socket hang up"
);
pattern!(
    GENERIC_ERROR,
    r"(?im)npm ERR!|^\s*error(?:\[\w+\])?:|command failed|\bexception:"
);
pattern!(
    WAIT_TIME,
    r"(?i)(\d+)\s*(hours?|hrs?|h|minutes?|mins?|m|seconds?|secs?|s)\b"
);

/// Signal classes in reporting order.
fn classes() -> [(IssueKind, &'static Regex); 5] {
    [
        (IssueKind::RateLimit, &RATE_LIMIT),
        (IssueKind::AuthError, &AUTH_ERROR),
        (IssueKind::Crash, &CRASH),
        (IssueKind::NetworkError, &NETWORK_ERROR),
        (IssueKind::Error, &GENERIC_ERROR),
    ]
}

/// Scan pane text for problem signals.
///
/// Classes are independent: one output can raise several issues, at most
/// one per class. Each issue's message is the first line that matched. A
/// rate-limit wait hint is taken from that line, else from the whole text.
pub fn detect_errors(text: &str) -> Vec<Issue> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let mut issues = Vec::new();
    for (kind, pattern) in classes() {
        let Some(line) = text.lines().find(|line| pattern.is_match(line)) else {
            continue;
        };
        let mut issue = Issue::new(kind, line.trim().chars().take(MAX_MESSAGE_CHARS).collect::<String>());
        if kind == IssueKind::RateLimit {
            issue.retry_after_secs = parse_wait_time(line).or_else(|| parse_wait_time(text));
        }
        issues.push(issue);
    }
    issues
}

/// First time-qualified number in `text`, in seconds.
///
/// Understands `30s`, `45 seconds`, `5 minutes`, `2h` and similar. Bare
/// numbers are ignored, as is a zero wait.
pub fn parse_wait_time(text: &str) -> Option<u64> {
    let caps = WAIT_TIME.captures(text)?;
    let value: u64 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps.get(2)?.as_str().to_ascii_lowercase();
    let multiplier = match unit.chars().next() {
        Some('h') => 3600,
        Some('m') => 60,
        _ => 1,
    };
    Some(value.saturating_mul(multiplier)).filter(|secs| *secs > 0)
}

#[cfg(test)]
#[path = "issues_tests.rs"]
mod tests;
