//! Worker pool specs
//!
//! Many workers polling one scheduler never exceed a cap and never lose or
//! duplicate a job.

use crate::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn worker_pool_drains_queue_within_caps() {
    let scheduler = Arc::new(FairScheduler::new(FairSchedulerConfig {
        max_per_session: 2,
        max_per_batch: 0,
    }));
    let sessions = ["alpha", "beta", "gamma", "delta"];
    let mut expected = HashSet::new();
    for i in 0..40 {
        let session = sessions[i % sessions.len()];
        let j = SpawnJob::new(JobType::AgentLaunch, session, JobPriority::Normal, &shep_core::SystemClock);
        expected.insert(j.id.clone());
        scheduler.enqueue(j).unwrap();
    }

    let over_cap = Arc::new(AtomicBool::new(false));
    let mut workers = Vec::new();
    for _ in 0..8 {
        let scheduler = Arc::clone(&scheduler);
        let over_cap = Arc::clone(&over_cap);
        workers.push(tokio::spawn(async move {
            let mut seen = Vec::new();
            loop {
                let Some(mut running) = scheduler.try_dequeue() else {
                    if scheduler.queue().is_empty() {
                        break;
                    }
                    tokio::task::yield_now().await;
                    continue;
                };
                if scheduler.running_count(&running.session_name) > 2 {
                    over_cap.store(true, Ordering::SeqCst);
                }
                tokio::task::yield_now().await;
                running.status = JobStatus::Completed;
                scheduler.mark_complete(&running);
                seen.push(running.id);
            }
            seen
        }));
    }

    let mut dispatched = Vec::new();
    for worker in workers {
        dispatched.extend(worker.await.unwrap());
    }

    assert!(!over_cap.load(Ordering::SeqCst));
    assert_eq!(dispatched.len(), 40);
    let unique: HashSet<_> = dispatched.into_iter().collect();
    assert_eq!(unique, expected);

    let progress = scheduler.progress();
    assert_eq!(progress.completed_count, 40);
    assert_eq!(progress.running_count, 0);
}
