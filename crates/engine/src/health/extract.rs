// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Numeric capture helpers for pane text.
//!
//! Both helpers read capture group 1 of the **last** match, since pane
//! text is a scrollback and the latest reading is the current one.

use regex::Regex;

fn last_capture<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    let caps = pattern.captures_iter(text).last()?;
    Some(caps.get(1)?.as_str())
}

/// Integer from the last match's first capture group, ignoring thousands
/// separators. `None` when there is no match, no group, or no number.
pub fn extract_int(pattern: &Regex, text: &str) -> Option<i64> {
    last_capture(pattern, text)?.replace(',', "").parse().ok()
}

/// Float counterpart of [`extract_int`].
pub fn extract_float(pattern: &Regex, text: &str) -> Option<f64> {
    last_capture(pattern, text)?.replace(',', "").parse().ok()
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
