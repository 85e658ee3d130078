//! Dual-control approval specs
//!
//! Requests are gated behind sign-off by someone other than the requester,
//! within a deadline, by an allowlisted approver when one is configured.

use crate::prelude::*;

#[tokio::test]
async fn requester_cannot_approve_own_force_release() {
    let approvals = Approvals::default();
    let engine = &approvals.engine;

    let request = engine
        .request(
            RequestParams::new("force_release", "alice")
                .resource("internal/auth/**")
                .reason("stuck lock")
                .requires_slb(true),
        )
        .await
        .unwrap();
    assert!(!request.id.is_empty());
    assert_eq!(engine.check(&request.id).unwrap().unwrap().status, ApprovalStatus::Pending);
    assert_eq!(approvals.notifier.commands(), vec!["shep approval: force_release internal/auth/**"]);

    let err = engine.approve(&request.id, "alice").unwrap_err();
    assert!(matches!(err, ApprovalError::Unauthorized { .. }));

    let approved = engine.approve(&request.id, "bob").unwrap();
    assert_eq!(approved.status, ApprovalStatus::Approved);

    let checked = engine.check(&request.id).unwrap().unwrap();
    assert_eq!(checked.status, ApprovalStatus::Approved);
    assert_eq!(checked.approved_by.as_deref(), Some("bob"));
    assert_eq!(approvals.bus.names(), vec!["approval:requested", "approval:approved"]);
}

#[tokio::test]
async fn decisions_are_final() {
    let approvals = Approvals::default();
    let engine = &approvals.engine;

    let approved = engine.request(RequestParams::new("deploy", "alice")).await.unwrap();
    engine.approve(&approved.id, "bob").unwrap();
    let err = engine.deny(&approved.id, "carol", "too late").unwrap_err();
    assert!(matches!(err, ApprovalError::StateConflict { status: ApprovalStatus::Approved, .. }));

    let denied = engine.request(RequestParams::new("deploy", "alice")).await.unwrap();
    engine.deny(&denied.id, "bob", "not today").unwrap();
    let err = engine.approve(&denied.id, "carol").unwrap_err();
    assert!(matches!(err, ApprovalError::StateConflict { status: ApprovalStatus::Denied, .. }));

    let record = engine.check(&denied.id).unwrap().unwrap();
    assert_eq!(record.denied_by.as_deref(), Some("bob"));
    assert_eq!(record.denied_reason.as_deref(), Some("not today"));
}

#[tokio::test]
async fn decision_after_deadline_fails_as_expired() {
    let approvals = Approvals::default();
    let engine = &approvals.engine;

    let request = engine
        .request(RequestParams::new("drop_table", "alice").expires_in(Duration::from_secs(60)))
        .await
        .unwrap();
    approvals.clock.advance(Duration::from_secs(61));

    let err = engine.approve(&request.id, "bob").unwrap_err();
    assert!(matches!(err, ApprovalError::Expired(_)));
    assert_eq!(engine.check(&request.id).unwrap().unwrap().status, ApprovalStatus::Expired);
    assert!(matches!(engine.deny(&request.id, "bob", "no").unwrap_err(), ApprovalError::Expired(_)));
    assert_eq!(approvals.bus.names().last(), Some(&"approval:expired"));
}

#[tokio::test]
async fn sweep_expires_only_overdue_requests() {
    let approvals = Approvals::default();
    let engine = &approvals.engine;

    let short = engine
        .request(RequestParams::new("a", "alice").expires_in(Duration::from_secs(10)))
        .await
        .unwrap();
    let long = engine.request(RequestParams::new("b", "alice")).await.unwrap();
    approvals.clock.advance(Duration::from_secs(11));

    assert_eq!(engine.expire_stale().unwrap(), 1);
    assert_eq!(engine.expire_stale().unwrap(), 0);

    let pending: Vec<_> = engine.list_pending().unwrap().into_iter().map(|a| a.id).collect();
    assert_eq!(pending, vec![long.id]);
    assert_eq!(engine.check(&short.id).unwrap().unwrap().status, ApprovalStatus::Expired);
}

#[tokio::test]
async fn allowlist_limits_who_may_approve() {
    let config = ApprovalConfig { approvers: vec!["carol".to_string()], ..ApprovalConfig::default() };
    let approvals = Approvals::new(config);
    let engine = &approvals.engine;

    let request = engine.request(RequestParams::new("rotate_keys", "alice")).await.unwrap();
    let err = engine.approve(&request.id, "bob").unwrap_err();
    assert!(matches!(err, ApprovalError::Unauthorized { .. }));
    assert_eq!(engine.check(&request.id).unwrap().unwrap().status, ApprovalStatus::Pending);

    assert_eq!(engine.approve(&request.id, "carol").unwrap().status, ApprovalStatus::Approved);
}

#[tokio::test]
async fn failed_notification_leaves_no_record() {
    let approvals = Approvals::default();
    approvals.notifier.fail_with("approver channel down");

    let err = approvals
        .engine
        .request(RequestParams::new("force_release", "alice").requires_slb(true))
        .await
        .unwrap_err();
    assert!(matches!(err, ApprovalError::Notify(_)));
    assert!(approvals.engine.list_pending().unwrap().is_empty());
    assert!(approvals.bus.events().is_empty());
}

#[tokio::test]
async fn unknown_ids_are_absent_not_errors() {
    let approvals = Approvals::default();
    let missing = shep_core::ApprovalId::new("appr-missing");

    assert!(approvals.engine.check(&missing).unwrap().is_none());
    assert!(matches!(approvals.engine.approve(&missing, "bob"), Err(ApprovalError::NotFound(_))));
}
