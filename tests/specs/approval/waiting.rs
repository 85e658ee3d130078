//! Blocking-wait specs
//!
//! A caller parked on `wait_for_approval` wakes on the decision, or gets the
//! still-pending record back when its timeout runs out.

use crate::prelude::*;

#[tokio::test]
async fn waiter_wakes_when_peer_approves() {
    let approvals = Approvals::default();
    let engine = Arc::clone(&approvals.engine);
    let request = engine.request(RequestParams::new("deploy", "alice")).await.unwrap();

    let waiter = {
        let engine = Arc::clone(&engine);
        let id = request.id.clone();
        tokio::spawn(async move { engine.wait_for_approval(&id, Duration::from_secs(30)).await })
    };
    tokio::task::yield_now().await;
    engine.approve(&request.id, "bob").unwrap();

    let resolved = tokio::time::timeout(Duration::from_secs(5), waiter).await.unwrap().unwrap().unwrap();
    assert_eq!(resolved.status, ApprovalStatus::Approved);
    assert_eq!(resolved.approved_by.as_deref(), Some("bob"));
}

#[tokio::test(start_paused = true)]
async fn timeout_returns_pending_record() {
    let approvals = Approvals::default();
    let request = approvals.engine.request(RequestParams::new("deploy", "alice")).await.unwrap();

    let waited =
        approvals.engine.wait_for_approval(&request.id, Duration::from_millis(500)).await.unwrap();
    assert_eq!(waited.status, ApprovalStatus::Pending);
    assert_eq!(waited.id, request.id);
}

#[tokio::test]
async fn only_one_of_racing_decisions_wins() {
    let approvals = Approvals::default();
    let engine = Arc::clone(&approvals.engine);
    let request = engine.request(RequestParams::new("deploy", "alice")).await.unwrap();

    let mut racers = Vec::new();
    for i in 0..8 {
        let engine = Arc::clone(&engine);
        let id = request.id.clone();
        racers.push(tokio::spawn(async move {
            if i % 2 == 0 {
                engine.approve(&id, &format!("approver-{i}")).is_ok()
            } else {
                engine.deny(&id, &format!("approver-{i}"), "race").is_ok()
            }
        }));
    }

    let mut winners = 0;
    for racer in racers {
        if racer.await.unwrap() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
    assert!(!engine.check(&request.id).unwrap().unwrap().is_pending());
}
