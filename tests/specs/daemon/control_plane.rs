//! Control plane specs
//!
//! `shepd` builds one control plane from its config file, serves the
//! scheduler and approval engine from it, and tears it down on shutdown.

use crate::prelude::*;
use shep_core::Event;
use shep_daemon::{startup, DaemonConfig};

fn config_from(dir: &tempfile::TempDir, toml: &str) -> DaemonConfig {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, toml).unwrap();
    DaemonConfig::load(&path).unwrap()
}

#[tokio::test]
async fn config_file_shapes_the_control_plane() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_from(
        &dir,
        r#"
[scheduler]
max_per_session = 1

[approval]
enable_slb = false
approvers = ["bob"]
"#,
    );
    let plane = startup(config);

    let scheduler = plane.scheduler();
    for _ in 0..2 {
        let j = SpawnJob::new(JobType::Session, "alpha", JobPriority::Normal, &shep_core::SystemClock);
        scheduler.enqueue(j).unwrap();
    }
    assert!(scheduler.try_dequeue().is_some());
    assert!(scheduler.try_dequeue().is_none());

    let approvals = plane.approvals();
    let request = approvals.request(RequestParams::new("deploy", "alice")).await.unwrap();
    assert!(matches!(approvals.approve(&request.id, "carol"), Err(ApprovalError::Unauthorized { .. })));
    assert_eq!(approvals.approve(&request.id, "bob").unwrap().status, ApprovalStatus::Approved);

    plane.shutdown().await.unwrap();
}

#[tokio::test]
async fn dashboard_subscriber_sees_full_approval_history() {
    let dir = tempfile::tempdir().unwrap();
    let plane = startup(config_from(&dir, "[approval]\nenable_slb = false\n"));
    let mut feed = plane.bus().subscribe();

    let approvals = plane.approvals();
    let granted = approvals.request(RequestParams::new("deploy", "alice")).await.unwrap();
    let refused = approvals.request(RequestParams::new("drop_table", "alice")).await.unwrap();
    approvals.approve(&granted.id, "bob").unwrap();
    approvals.deny(&refused.id, "bob", "needs review").unwrap();

    let mut names = Vec::new();
    for _ in 0..4 {
        names.push(feed.recv().await.unwrap().name());
    }
    assert_eq!(
        names,
        vec!["approval:requested", "approval:requested", "approval:approved", "approval:denied"]
    );

    // wire shape of the bus payload
    let denied = Event::ApprovalDenied {
        id: refused.id.clone(),
        denied_by: "bob".to_string(),
        reason: "needs review".to_string(),
        at_ms: 1,
    };
    let json = serde_json::to_value(&denied).unwrap();
    assert_eq!(json["type"], "approval:denied");

    plane.shutdown().await.unwrap();
}
