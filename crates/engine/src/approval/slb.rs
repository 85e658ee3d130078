// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

/// Format the sign-off command sent to approvers:
/// `"<tool> approval: <action> <resource>"`.
///
/// Both fields are trimmed. The resource is omitted when blank; a blank
/// action yields an empty string, meaning nothing should be sent.
pub fn build_slb_command(tool: &str, action: &str, resource: &str) -> String {
    let action = action.trim();
    if action.is_empty() {
        return String::new();
    }
    match resource.trim() {
        "" => format!("{tool} approval: {action}"),
        resource => format!("{tool} approval: {action} {resource}"),
    }
}

#[cfg(test)]
#[path = "slb_tests.rs"]
mod tests;
