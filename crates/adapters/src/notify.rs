// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Delivery of separation-of-duties sign-off requests to approvers.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from notify operations
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Delivers a formatted SLB command (e.g. `shep approval: force_release
/// internal/auth/**`) to whoever must sign off.
///
/// Returns the request ID the sign-off service assigned, if it reported one.
#[async_trait]
pub trait SlbNotifier: Send + Sync + 'static {
    async fn submit(&self, command: &str) -> Result<Option<String>, NotifyError>;
}

/// Extract the request ID from a sign-off service reply like `{"id":"req-123"}`.
///
/// Empty, malformed, or ID-less replies yield `None`.
pub fn parse_slb_request_id(output: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(output).ok()?;
    value.get("id")?.as_str().filter(|id| !id.is_empty()).map(str::to_string)
}

/// Desktop notification notifier using notify-rust.
#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopSlbNotifier;

impl DesktopSlbNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SlbNotifier for DesktopSlbNotifier {
    async fn submit(&self, command: &str) -> Result<Option<String>, NotifyError> {
        let body = command.to_string();
        // Notification::show() is synchronous; run it on the blocking pool
        let shown = tokio::task::spawn_blocking(move || {
            notify_rust::Notification::new()
                .summary("Approval requested")
                .body(&body)
                .show()
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| NotifyError::SendFailed(e.to_string()))?;

        match shown {
            Ok(()) => {
                tracing::info!(%command, "slb notification sent");
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(%command, error = %e, "slb notification failed");
                Err(NotifyError::SendFailed(e))
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{parse_slb_request_id, NotifyError, SlbNotifier};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeSlbState {
        commands: Vec<String>,
        fail_with: Option<String>,
        reply: Option<String>,
    }

    /// Recording notifier for tests; can be told to fail
    #[derive(Clone, Default)]
    pub struct FakeSlbNotifier {
        inner: Arc<Mutex<FakeSlbState>>,
    }

    impl FakeSlbNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        /// Get all submitted commands
        pub fn commands(&self) -> Vec<String> {
            self.inner.lock().commands.clone()
        }

        /// Make every subsequent submit fail with `message`
        pub fn fail_with(&self, message: impl Into<String>) {
            self.inner.lock().fail_with = Some(message.into());
        }

        /// Answer every subsequent submit with the raw service `reply`
        pub fn reply_with(&self, reply: impl Into<String>) {
            self.inner.lock().reply = Some(reply.into());
        }
    }

    #[async_trait]
    impl SlbNotifier for FakeSlbNotifier {
        async fn submit(&self, command: &str) -> Result<Option<String>, NotifyError> {
            let mut inner = self.inner.lock();
            if let Some(msg) = &inner.fail_with {
                return Err(NotifyError::SendFailed(msg.clone()));
            }
            inner.commands.push(command.to_string());
            Ok(inner.reply.as_deref().and_then(parse_slb_request_id))
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeSlbNotifier;

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
