// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use shep_core::test_support::{batch_job, job};
use shep_core::{FakeClock, JobPriority};
use std::time::Duration;

fn scheduler(max_per_session: usize, max_per_batch: usize) -> (FairScheduler<FakeClock>, FakeClock) {
    let clock = FakeClock::new();
    let config = FairSchedulerConfig { max_per_session, max_per_batch };
    (FairScheduler::with_clock(config, clock.clone()), clock)
}

#[test]
fn default_caps() {
    let config = FairSchedulerConfig::default();
    assert_eq!(config.max_per_session, 3);
    assert_eq!(config.max_per_batch, 5);
}

#[test]
fn try_dequeue_on_empty_is_none() {
    let (sched, _) = scheduler(3, 5);
    assert!(sched.try_dequeue().is_none());
}

#[test]
fn dispatched_job_is_running_and_counted() {
    let (sched, _) = scheduler(3, 5);
    sched.enqueue(job("j1", "alpha", JobPriority::Normal)).unwrap();

    let job = sched.try_dequeue().unwrap();
    assert_eq!(job.status, JobStatus::Running);
    assert_eq!(sched.running_count("alpha"), 1);
    assert!(sched.queue().is_empty());
}

#[test]
fn session_cap_skips_to_next_session() {
    let (sched, _) = scheduler(1, 0);
    sched.enqueue(job("a1", "alpha", JobPriority::Urgent)).unwrap();
    sched.enqueue(job("a2", "alpha", JobPriority::Urgent)).unwrap();
    sched.enqueue(job("b1", "beta", JobPriority::Low)).unwrap();

    assert_eq!(sched.try_dequeue().unwrap().id, "a1");
    // alpha is full, so the low-priority beta job goes next
    assert_eq!(sched.try_dequeue().unwrap().id, "b1");
    assert!(sched.try_dequeue().is_none());
    assert_eq!(sched.queue().len(), 1);
}

#[test]
fn never_exceeds_session_cap() {
    let (sched, _) = scheduler(2, 0);
    for i in 0..6 {
        sched.enqueue(job(&format!("j{i}"), "alpha", JobPriority::Normal)).unwrap();
    }
    let mut dispatched = Vec::new();
    while let Some(job) = sched.try_dequeue() {
        assert!(sched.running_count("alpha") <= 2);
        dispatched.push(job);
    }
    assert_eq!(dispatched.len(), 2);

    sched.mark_complete(&dispatched[0]);
    assert_eq!(sched.running_count("alpha"), 1);
    assert!(sched.try_dequeue().is_some());
    assert!(sched.try_dequeue().is_none());
}

#[test]
fn batch_cap_counts_dispatched_jobs() {
    let (sched, _) = scheduler(0, 2);
    for (i, session) in ["s1", "s2", "s3", "s4"].iter().enumerate() {
        sched.enqueue(batch_job(&format!("j{i}"), session, "wave")).unwrap();
    }

    let first = sched.try_dequeue().unwrap();
    sched.try_dequeue().unwrap();
    assert_eq!(sched.batch_running_count("wave"), 2);
    assert!(sched.try_dequeue().is_none());

    sched.mark_complete(&first);
    assert_eq!(sched.batch_running_count("wave"), 1);
    assert!(sched.try_dequeue().is_some());
}

#[test]
fn zero_caps_are_unlimited() {
    let (sched, _) = scheduler(0, 0);
    for i in 0..10 {
        sched.enqueue(batch_job(&format!("j{i}"), "alpha", "wave")).unwrap();
    }
    assert_eq!(std::iter::from_fn(|| sched.try_dequeue()).count(), 10);
    assert_eq!(sched.running_count("alpha"), 10);
}

#[test]
fn mark_complete_clears_counter_at_zero() {
    let (sched, _) = scheduler(3, 5);
    sched.enqueue(job("j1", "alpha", JobPriority::Normal)).unwrap();
    let job = sched.try_dequeue().unwrap();
    sched.mark_complete(&job);
    sched.mark_complete(&job);
    assert_eq!(sched.running_count("alpha"), 0);
    assert_eq!(sched.progress().completed_count, 1);
}

#[test]
fn repeated_completion_keeps_session_cap() {
    let (sched, _) = scheduler(2, 0);
    for id in ["a", "b", "c", "d"] {
        sched.enqueue(job(id, "alpha", JobPriority::Normal)).unwrap();
    }
    let first = sched.try_dequeue().unwrap();
    sched.try_dequeue().unwrap();

    sched.mark_complete(&first);
    sched.mark_complete(&first);

    assert!(sched.try_dequeue().is_some());
    assert!(sched.try_dequeue().is_none());
    assert_eq!(sched.running_count("alpha"), 2);
    let progress = sched.progress();
    assert_eq!(progress.running_count, 2);
    assert_eq!(progress.completed_count, 1);
}

#[test]
fn completing_unknown_job_is_ignored() {
    let (sched, _) = scheduler(1, 1);
    sched.enqueue(batch_job("j1", "alpha", "wave")).unwrap();
    sched.try_dequeue().unwrap();

    sched.mark_complete(&batch_job("stray", "alpha", "wave"));

    assert_eq!(sched.running_count("alpha"), 1);
    assert_eq!(sched.batch_running_count("wave"), 1);
    let progress = sched.progress();
    assert_eq!((progress.completed_count, progress.failed_count), (0, 0));
}

#[test]
fn unbatched_jobs_ignore_batch_cap() {
    let (sched, _) = scheduler(0, 1);
    sched.enqueue(job("j1", "alpha", JobPriority::Normal)).unwrap();
    sched.enqueue(job("j2", "alpha", JobPriority::Normal)).unwrap();
    assert!(sched.try_dequeue().is_some());
    assert!(sched.try_dequeue().is_some());
}

#[test]
fn concurrent_workers_respect_cap() {
    let (sched, _) = scheduler(2, 0);
    let sched = std::sync::Arc::new(sched);
    for i in 0..40 {
        sched.enqueue(job(&format!("j{i}"), "alpha", JobPriority::Normal)).unwrap();
    }
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let sched = sched.clone();
            std::thread::spawn(move || {
                let mut done = 0;
                while done < 10 {
                    if let Some(job) = sched.try_dequeue() {
                        assert!(sched.running_count("alpha") <= 2);
                        sched.mark_complete(&job);
                        done += 1;
                    } else {
                        std::thread::yield_now();
                    }
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert!(sched.queue().is_empty());
    assert_eq!(sched.progress().completed_count, 40);
}

#[test]
fn progress_snapshot() {
    let (sched, clock) = scheduler(1, 0);
    let created = clock.epoch_ms();
    for (id, session) in [("a1", "alpha"), ("a2", "alpha"), ("b1", "beta")] {
        sched
            .enqueue(SpawnJob::builder().id(id).session_name(session).created_at_ms(created).build())
            .unwrap();
    }
    let a1 = sched.try_dequeue().unwrap();
    let mut b1 = sched.try_dequeue().unwrap();
    clock.advance(Duration::from_secs(2));
    b1.status = JobStatus::Failed;
    sched.mark_complete(&b1);

    let progress = sched.progress();
    assert_eq!(progress.queued_count, 1);
    assert_eq!(progress.running_count, 1);
    assert_eq!(progress.completed_count, 0);
    assert_eq!(progress.failed_count, 1);
    assert_eq!(progress.queued[0].id, "a2");
    assert_eq!(progress.queued[0].queued_for_ms, Some(2_000));
    assert_eq!(progress.running[0].id, a1.id);
    assert_eq!(progress.running[0].running_for_ms, Some(2_000));

    let alpha = &progress.by_session["alpha"];
    assert_eq!((alpha.queued_count, alpha.running_count), (1, 1));
    assert_eq!(alpha.progress_percent, 0.0);
    let beta = &progress.by_session["beta"];
    assert_eq!(beta.failed_count, 1);
    assert_eq!(beta.progress_percent, 100.0);
}

#[test]
fn queued_eta_follows_average_wait() {
    let (sched, clock) = scheduler(1, 0);
    let enqueue = |id: &str| {
        let job = SpawnJob::builder().id(id).session_name("alpha").created_at_ms(clock.epoch_ms()).build();
        sched.enqueue(job).unwrap();
    };
    enqueue("a1");
    enqueue("a2");
    assert_eq!(sched.progress().estimated_eta_ms, None);

    clock.advance(Duration::from_secs(4));
    sched.try_dequeue().unwrap();
    enqueue("a3");
    clock.advance(Duration::from_secs(1));

    let progress = sched.progress();
    let etas: Vec<_> = progress.queued.iter().map(|j| (j.id.as_str(), j.eta_ms)).collect();
    assert_eq!(etas, vec![("a2", Some(0)), ("a3", Some(3_000))]);
    assert_eq!(progress.estimated_eta_ms, Some(3_000));
    assert!(progress.running.iter().all(|j| j.eta_ms.is_none()));
}

#[test]
fn empty_queue_has_no_eta() {
    let (sched, clock) = scheduler(1, 0);
    sched.enqueue(job("j1", "alpha", JobPriority::Normal)).unwrap();
    clock.advance(Duration::from_secs(1));
    sched.try_dequeue().unwrap();
    assert_eq!(sched.progress().estimated_eta_ms, None);
}

#[test]
fn progress_serializes_for_dashboards() {
    let (sched, _) = scheduler(3, 5);
    sched.enqueue(job("j1", "alpha", JobPriority::High)).unwrap();
    let json = serde_json::to_value(sched.progress()).unwrap();
    assert_eq!(json["queued_count"], 1);
    assert_eq!(json["queued"][0]["type"], "agent_launch");
    assert_eq!(json["queued"][0]["priority"], "high");
    assert!(json.get("running").is_none());
}

#[test]
fn cancelling_through_queue_view() {
    let (sched, _) = scheduler(3, 5);
    sched.enqueue(job("j1", "alpha", JobPriority::Normal)).unwrap();
    sched.enqueue(job("j2", "beta", JobPriority::Normal)).unwrap();
    assert_eq!(sched.queue().cancel_session("alpha").len(), 1);
    assert_eq!(sched.try_dequeue().unwrap().id, "j2");
}
