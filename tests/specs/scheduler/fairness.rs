//! Fair scheduling specs
//!
//! Global priority order holds except where a session or batch is at its cap.

use crate::prelude::*;

#[test]
fn busy_session_does_not_starve_lower_priority_work() {
    let scheduler = scheduler(1, 0);
    let a1 = job(&scheduler, "alpha", JobPriority::Urgent);
    let a2 = job(&scheduler, "alpha", JobPriority::Urgent);
    let b1 = job(&scheduler, "beta", JobPriority::Low);
    let (a1_id, a2_id, b1_id) = (a1.id.clone(), a2.id.clone(), b1.id.clone());
    for j in [a1, a2, b1] {
        scheduler.enqueue(j).unwrap();
    }

    let first = scheduler.try_dequeue().unwrap();
    assert_eq!(first.id, a1_id);
    assert_eq!(first.status, JobStatus::Running);

    // alpha is at its cap, so beta's low-priority job goes next
    assert_eq!(scheduler.try_dequeue().unwrap().id, b1_id);
    assert!(scheduler.try_dequeue().is_none());
    assert_eq!(scheduler.queue().len(), 1);

    scheduler.mark_complete(&first);
    assert_eq!(scheduler.try_dequeue().unwrap().id, a2_id);
}

#[test]
fn batch_cap_spans_sessions() {
    let scheduler = scheduler(0, 2);
    for session in ["s1", "s2", "s3"] {
        let j = job(&scheduler, session, JobPriority::Normal).with_batch("wave-1");
        scheduler.enqueue(j).unwrap();
    }
    let outsider = job(&scheduler, "s4", JobPriority::Low);
    let outsider_id = outsider.id.clone();
    scheduler.enqueue(outsider).unwrap();

    let first = scheduler.try_dequeue().unwrap();
    let _second = scheduler.try_dequeue().unwrap();
    assert_eq!(scheduler.batch_running_count("wave-1"), 2);

    // third batch member is held back; the unbatched job is not
    assert_eq!(scheduler.try_dequeue().unwrap().id, outsider_id);
    assert!(scheduler.try_dequeue().is_none());

    scheduler.mark_complete(&first);
    let third = scheduler.try_dequeue().unwrap();
    assert_eq!(third.batch_id.as_deref(), Some("wave-1"));
    assert_eq!(third.session_name, "s3");
}

#[test]
fn cancelling_a_session_signals_queued_jobs() {
    let scheduler = scheduler(3, 5);
    let doomed = job(&scheduler, "alpha", JobPriority::Normal);
    let token = doomed.cancellation_token();
    scheduler.enqueue(doomed).unwrap();
    scheduler.enqueue(job(&scheduler, "beta", JobPriority::Normal)).unwrap();

    let cancelled = scheduler.queue().cancel_session("alpha");
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].status, JobStatus::Cancelled);
    assert!(token.is_cancelled());
    assert_eq!(scheduler.queue().count_by_session("alpha"), 0);
    assert_eq!(scheduler.try_dequeue().unwrap().session_name, "beta");
}

#[test]
fn progress_tracks_a_full_run() {
    let scheduler = scheduler(2, 0);
    for priority in [JobPriority::High, JobPriority::Normal, JobPriority::Low] {
        scheduler.enqueue(job(&scheduler, "alpha", priority)).unwrap();
    }

    let mut ok = scheduler.try_dequeue().unwrap();
    let mut bad = scheduler.try_dequeue().unwrap();
    scheduler.queue().clock().advance(Duration::from_secs(3));

    let progress = scheduler.progress();
    assert_eq!(progress.queued_count, 1);
    assert_eq!(progress.running_count, 2);
    assert_eq!(progress.queued[0].priority, JobPriority::Low);
    assert_eq!(progress.queued[0].queued_for_ms, Some(3000));

    ok.status = JobStatus::Completed;
    bad.status = JobStatus::Failed;
    scheduler.mark_complete(&ok);
    scheduler.mark_complete(&bad);

    let progress = scheduler.progress();
    assert_eq!(progress.running_count, 0);
    assert_eq!(progress.completed_count, 1);
    assert_eq!(progress.failed_count, 1);

    let stats = scheduler.queue().stats();
    assert_eq!(stats.total_enqueued, 3);
    assert_eq!(stats.total_dequeued, 2);
    assert_eq!(stats.current_size, 1);
}
