// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The approval state machine.
//!
//! Pending is the only non-terminal state. Every transition out of it
//! (approve, deny, expiry on read, expiry by sweep) runs under one
//! transition lock as a load-check-update against the store, so exactly one
//! of them can win for a given approval.

use super::{build_slb_command, ApprovalConfig, ApprovalError};
use parking_lot::Mutex;
use shep_adapters::{EventBus, SlbNotifier};
use shep_core::{Approval, ApprovalId, ApprovalStatus, Clock, Event, SystemClock};
use shep_storage::ApprovalStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Parameters for [`ApprovalEngine::request`].
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    pub action: String,
    pub resource: String,
    pub reason: String,
    pub requested_by: String,
    pub requires_slb: bool,
    /// Lifetime of the request; unset or zero uses the configured default
    pub expires_in: Option<Duration>,
}

impl RequestParams {
    pub fn new(action: impl Into<String>, requested_by: impl Into<String>) -> Self {
        Self { action: action.into(), requested_by: requested_by.into(), ..Self::default() }
    }

    shep_core::setters! {
        into {
            resource: String,
            reason: String,
        }
        set {
            requires_slb: bool,
        }
        option {
            expires_in: Duration,
        }
    }
}

/// Gatekeeper for risky actions.
pub struct ApprovalEngine<S: ApprovalStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
    config: ApprovalConfig,
    bus: Option<Arc<dyn EventBus>>,
    notifier: Option<Arc<dyn SlbNotifier>>,
    /// Serializes every transition out of Pending
    transitions: Mutex<()>,
    /// Wakes `wait_for_approval` callers after a transition
    resolved: Notify,
}

impl<S: ApprovalStore> ApprovalEngine<S, SystemClock> {
    pub fn new(store: S, config: ApprovalConfig) -> Self {
        Self::with_clock(store, config, SystemClock)
    }
}

impl<S: ApprovalStore, C: Clock> ApprovalEngine<S, C> {
    pub fn with_clock(store: S, mut config: ApprovalConfig, clock: C) -> Self {
        config.default_expiry_secs = config.default_expiry().as_secs();
        Self {
            store,
            clock,
            config,
            bus: None,
            notifier: None,
            transitions: Mutex::new(()),
            resolved: Notify::new(),
        }
    }

    /// Publish approval events on `bus`.
    pub fn with_bus(mut self, bus: Arc<dyn EventBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Deliver SLB sign-off requests through `notifier`.
    pub fn with_notifier(mut self, notifier: Arc<dyn SlbNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn config(&self) -> &ApprovalConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a pending approval.
    ///
    /// When the request requires sign-off and SLB is enabled, the notifier is
    /// called first; if delivery fails nothing is stored. A request ID
    /// reported by the sign-off service is kept on the approval.
    pub async fn request(&self, params: RequestParams) -> Result<Approval, ApprovalError> {
        let action = params.action.trim();
        if action.is_empty() {
            return Err(ApprovalError::Validation("action is required".to_string()));
        }
        let requested_by = params.requested_by.trim();
        if requested_by.is_empty() {
            return Err(ApprovalError::Validation("requester is required".to_string()));
        }

        let now_ms = self.clock.epoch_ms();
        let expires_in =
            params.expires_in.filter(|d| !d.is_zero()).unwrap_or_else(|| self.config.default_expiry());
        let mut approval = Approval {
            id: ApprovalId::generate(),
            action: action.to_string(),
            resource: params.resource.trim().to_string(),
            reason: params.reason,
            requested_by: requested_by.to_string(),
            requires_slb: params.requires_slb,
            approvers: self.config.approvers.clone(),
            status: ApprovalStatus::Pending,
            approved_by: None,
            approved_at_ms: None,
            denied_by: None,
            denied_reason: None,
            denied_at_ms: None,
            created_at_ms: now_ms,
            expires_at_ms: Some(now_ms.saturating_add(expires_in.as_millis() as u64)),
            slb_request_id: None,
        };

        if self.config.enable_slb && approval.requires_slb {
            if let Some(notifier) = &self.notifier {
                let command =
                    build_slb_command(&self.config.slb_tool, &approval.action, &approval.resource);
                if !command.is_empty() {
                    approval.slb_request_id = notifier.submit(&command).await?;
                }
            }
        }

        self.store.create(&approval)?;
        tracing::info!(
            approval_id = %approval.id,
            action = %approval.action,
            requested_by = %approval.requested_by,
            requires_slb = approval.requires_slb,
            slb_request_id = approval.slb_request_id.as_deref(),
            "approval requested"
        );
        if self.config.notify_on_request {
            self.publish(Event::requested(&approval));
        }
        Ok(approval)
    }

    /// Load an approval, expiring it first if its deadline has passed.
    ///
    /// `Ok(None)` when the ID is unknown.
    pub fn check(&self, id: &ApprovalId) -> Result<Option<Approval>, ApprovalError> {
        let _guard = self.transitions.lock();
        let Some(mut approval) = self.store.get(id)? else {
            return Ok(None);
        };
        if self.maybe_expire(&mut approval, self.clock.epoch_ms())? {
            self.resolved.notify_waiters();
        }
        Ok(Some(approval))
    }

    /// Sign off on a pending approval.
    pub fn approve(&self, id: &ApprovalId, approver: &str) -> Result<Approval, ApprovalError> {
        let approver = approver.trim();
        if approver.is_empty() {
            return Err(ApprovalError::Validation("approver is required".to_string()));
        }

        let approved = {
            let _guard = self.transitions.lock();
            let now_ms = self.clock.epoch_ms();
            let approval = self.load_pending(id, now_ms)?;

            if approval.requires_slb && approver == approval.requested_by {
                tracing::warn!(approval_id = %id, approver, "self-approval rejected");
                return Err(ApprovalError::Unauthorized {
                    id: id.clone(),
                    approver: approver.to_string(),
                    reason: "requester cannot approve their own request",
                });
            }
            if !approval.allows_approver(approver) {
                tracing::warn!(approval_id = %id, approver, "approver not on allowlist");
                return Err(ApprovalError::Unauthorized {
                    id: id.clone(),
                    approver: approver.to_string(),
                    reason: "not on the approver list",
                });
            }

            let mut approved = approval;
            approved.status = ApprovalStatus::Approved;
            approved.approved_by = Some(approver.to_string());
            approved.approved_at_ms = Some(now_ms);
            self.store.update(&approved)?;
            approved
        };

        tracing::info!(approval_id = %id, approver, "approval granted");
        self.decided(&approved);
        Ok(approved)
    }

    /// Reject a pending approval.
    pub fn deny(
        &self,
        id: &ApprovalId,
        approver: &str,
        reason: &str,
    ) -> Result<Approval, ApprovalError> {
        let approver = approver.trim();
        if approver.is_empty() {
            return Err(ApprovalError::Validation("approver is required".to_string()));
        }

        let denied = {
            let _guard = self.transitions.lock();
            let now_ms = self.clock.epoch_ms();
            let mut denied = self.load_pending(id, now_ms)?;
            denied.status = ApprovalStatus::Denied;
            denied.denied_by = Some(approver.to_string());
            denied.denied_reason = Some(reason.to_string());
            denied.denied_at_ms = Some(now_ms);
            self.store.update(&denied)?;
            denied
        };

        tracing::info!(approval_id = %id, approver, reason, "approval denied");
        self.decided(&denied);
        Ok(denied)
    }

    /// Expire every pending approval past its deadline. Returns how many
    /// were transitioned.
    ///
    /// A store failure stops the sweep; waiters on records already expired
    /// are still woken before the error is returned.
    pub fn expire_stale(&self) -> Result<usize, ApprovalError> {
        let (expired, failure) = {
            let _guard = self.transitions.lock();
            let now_ms = self.clock.epoch_ms();
            let mut expired = 0;
            let mut failure = None;
            for mut approval in self.store.list_by_status(ApprovalStatus::Pending)? {
                match self.maybe_expire(&mut approval, now_ms) {
                    Ok(true) => expired += 1,
                    Ok(false) => {}
                    Err(e) => {
                        failure = Some(e);
                        break;
                    }
                }
            }
            (expired, failure)
        };
        if expired > 0 {
            tracing::info!(count = expired, "stale approvals expired");
            self.resolved.notify_waiters();
        }
        match failure {
            Some(e) => {
                tracing::warn!(error = %e, expired, "approval sweep stopped early");
                Err(e)
            }
            None => Ok(expired),
        }
    }

    /// Pending approvals, oldest first. Entries past their deadline are
    /// included until [`ApprovalEngine::expire_stale`] or a read expires them.
    pub fn list_pending(&self) -> Result<Vec<Approval>, ApprovalError> {
        Ok(self.store.list_by_status(ApprovalStatus::Pending)?)
    }

    /// Wait until the approval leaves Pending or `timeout` elapses.
    ///
    /// A timeout is not an error: the still-pending approval is returned.
    /// Transitions made through this engine wake the waiter immediately;
    /// changes made elsewhere in the store are seen on the next poll.
    pub async fn wait_for_approval(
        &self,
        id: &ApprovalId,
        timeout: Duration,
    ) -> Result<Approval, ApprovalError> {
        let deadline = tokio::time::Instant::now() + timeout;
        let poll = self.config.wait_poll();
        loop {
            // Register before reading so a transition between the read and
            // the select is not missed
            let notified = self.resolved.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let approval = self.check(id)?.ok_or_else(|| ApprovalError::NotFound(id.clone()))?;
            let now = tokio::time::Instant::now();
            if !approval.is_pending() || now >= deadline {
                return Ok(approval);
            }

            let wake = (now + poll).min(deadline);
            tokio::select! {
                _ = &mut notified => {}
                _ = tokio::time::sleep_until(wake) => {}
            }
        }
    }

    /// Load `id` for a decision: it must exist and still be pending.
    ///
    /// A record past its deadline is expired here, and the decision fails.
    fn load_pending(&self, id: &ApprovalId, now_ms: u64) -> Result<Approval, ApprovalError> {
        let mut approval =
            self.store.get(id)?.ok_or_else(|| ApprovalError::NotFound(id.clone()))?;
        if self.maybe_expire(&mut approval, now_ms)? {
            self.resolved.notify_waiters();
            return Err(ApprovalError::Expired(id.clone()));
        }
        match approval.status {
            ApprovalStatus::Pending => Ok(approval),
            ApprovalStatus::Expired => Err(ApprovalError::Expired(id.clone())),
            status => Err(ApprovalError::StateConflict { id: id.clone(), status }),
        }
    }

    /// Transition `approval` to Expired if it is pending past its deadline.
    ///
    /// Shared by reads, decisions and the sweep. Caller holds the transition
    /// lock. `approval` is only modified once the store accepted the update.
    fn maybe_expire(&self, approval: &mut Approval, now_ms: u64) -> Result<bool, ApprovalError> {
        if !approval.is_past_deadline(now_ms) {
            return Ok(false);
        }
        let mut expired = approval.clone();
        expired.status = ApprovalStatus::Expired;
        self.store.update(&expired)?;
        *approval = expired;

        tracing::debug!(approval_id = %approval.id, "approval expired");
        if self.config.notify_on_decision {
            self.publish(Event::ApprovalExpired { id: approval.id.clone(), at_ms: now_ms });
        }
        Ok(true)
    }

    fn decided(&self, approval: &Approval) {
        self.resolved.notify_waiters();
        if self.config.notify_on_decision {
            if let Some(event) = Event::resolved(approval, self.clock.epoch_ms()) {
                self.publish(event);
            }
        }
    }

    fn publish(&self, event: Event) {
        if let Some(bus) = &self.bus {
            bus.publish(event);
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
