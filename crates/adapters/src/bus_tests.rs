// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use shep_core::{Approval, ApprovalId};

fn expired(id: &str) -> Event {
    Event::ApprovalExpired { id: ApprovalId::new(id), at_ms: 1 }
}

#[tokio::test]
async fn subscribers_receive_published_events() {
    let bus = BroadcastBus::new(8);
    let mut rx = bus.subscribe();
    let approval = Approval::builder().id("appr-1").build();

    bus.publish(Event::requested(&approval));
    bus.publish(expired("appr-1"));

    assert_eq!(rx.recv().await.unwrap().name(), "approval:requested");
    assert_eq!(rx.recv().await.unwrap().name(), "approval:expired");
}

#[test]
fn publish_without_subscribers_is_silent() {
    let bus = BroadcastBus::default();
    assert_eq!(bus.subscriber_count(), 0);
    bus.publish(expired("appr-2"));
}

#[test]
fn fake_bus_records_in_order() {
    let bus = FakeEventBus::new();
    bus.publish(expired("appr-1"));
    bus.publish(expired("appr-2"));
    assert_eq!(bus.names(), vec!["approval:expired", "approval:expired"]);
    assert_eq!(bus.events()[1].approval_id(), &ApprovalId::new("appr-2"));
}
