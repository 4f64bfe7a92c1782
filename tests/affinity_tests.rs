//! Pinning strategies must construct and execute work on any host.
//!
//! Actual placement cannot be asserted portably; a restricted affinity mask
//! (CI containers) downgrades pinning to a logged no-op by design.

use framejob::{JobSystem, JobSystemConfig, PinningStrategy};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn run_jobs_with_strategy(pinning: PinningStrategy) {
    let system = JobSystem::with_config(JobSystemConfig {
        num_threads: Some(2),
        pinning,
    });
    assert_eq!(system.num_workers(), 2);

    let executed = Arc::new(AtomicUsize::new(0));
    for _ in 0..100 {
        let executed_clone = executed.clone();
        system.execute(move || {
            executed_clone.fetch_add(1, Ordering::SeqCst);
        });
    }
    system.wait();

    assert_eq!(executed.load(Ordering::SeqCst), 100);
    system.shutdown().expect("shutdown failed");
}

#[test]
fn test_none_strategy() {
    run_jobs_with_strategy(PinningStrategy::None);
}

#[test]
fn test_linear_strategy() {
    run_jobs_with_strategy(PinningStrategy::Linear);
}

#[test]
fn test_avoid_smt_strategy() {
    run_jobs_with_strategy(PinningStrategy::AvoidSmt);
}

#[test]
fn test_more_workers_than_cpus() {
    // Workers past the last logical CPU stay unpinned but still run work.
    let system = JobSystem::with_config(JobSystemConfig {
        num_threads: Some(64),
        pinning: PinningStrategy::Linear,
    });
    assert_eq!(system.num_workers(), 64);

    let executed = Arc::new(AtomicUsize::new(0));
    for _ in 0..200 {
        let executed_clone = executed.clone();
        system.execute(move || {
            executed_clone.fetch_add(1, Ordering::SeqCst);
        });
    }
    system.wait();

    assert_eq!(executed.load(Ordering::SeqCst), 200);
    system.shutdown().expect("shutdown failed");
}
