//! Liveness under queue saturation.
//!
//! The bounded queue holds far fewer items than these tests submit, so the
//! submitting thread has to ride the backoff loop while workers drain.

use framejob::{queue, JobSystem};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_execute_beyond_queue_capacity() {
    let system = JobSystem::new(4);
    let hits = Arc::new(AtomicUsize::new(0));

    let num_jobs = queue::CAPACITY * 4;
    for _ in 0..num_jobs {
        let hits_clone = hits.clone();
        system.execute(move || {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });
    }
    system.wait();

    assert_eq!(hits.load(Ordering::SeqCst), num_jobs);
    assert!(!system.is_busy());
    system.shutdown().expect("shutdown failed");
}

#[test]
fn test_dispatch_beyond_queue_capacity() {
    let system = JobSystem::new(4);
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_clone = hits.clone();

    // Group size 1 turns every index into its own queued unit, several
    // multiples of the queue capacity.
    let job_count = (queue::CAPACITY * 4) as u32;
    system.dispatch(job_count, 1, move |_| {
        hits_clone.fetch_add(1, Ordering::SeqCst);
    });
    system.wait();

    assert_eq!(hits.load(Ordering::SeqCst), job_count as usize);
    system.shutdown().expect("shutdown failed");
}

#[test]
fn test_single_worker_drains_saturated_queue() {
    // Liveness needs only one live worker making progress.
    let system = JobSystem::new(1);
    let hits = Arc::new(AtomicUsize::new(0));

    let num_jobs = queue::CAPACITY * 2;
    for _ in 0..num_jobs {
        let hits_clone = hits.clone();
        system.execute(move || {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });
    }
    system.wait();

    assert_eq!(hits.load(Ordering::SeqCst), num_jobs);
    system.shutdown().expect("shutdown failed");
}

#[test]
fn test_repeated_wait_cycles() {
    // Wait must return promptly on an idle pool and stay correct across
    // many submit/drain cycles, as in a frame loop.
    let system = JobSystem::new(4);
    let total = Arc::new(AtomicUsize::new(0));

    for _ in 0..50 {
        for _ in 0..20 {
            let total_clone = total.clone();
            system.execute(move || {
                total_clone.fetch_add(1, Ordering::SeqCst);
            });
        }
        system.wait();
        assert!(!system.is_busy());
    }

    assert_eq!(total.load(Ordering::SeqCst), 1000);
    system.shutdown().expect("shutdown failed");
}
