//! End-to-end coverage of the process-global surface.
//!
//! The global pool can only be initialized once per process, so every test
//! funnels through the same `Once`. The tests also share the pool's
//! counters, so they serialize on a lock; otherwise one test's submissions
//! would show up in another's busyness checks.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

static POOL_LOCK: Mutex<()> = Mutex::new(());

fn ensure_initialized() {
    static ONCE: Once = Once::new();
    ONCE.call_once(framejob::initialize);
}

#[test]
fn test_global_execute_and_wait() {
    let _serial = POOL_LOCK.lock().unwrap();
    ensure_initialized();
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_clone = hits.clone();

    framejob::execute(move || {
        hits_clone.fetch_add(1, Ordering::SeqCst);
    });
    framejob::wait();

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(!framejob::is_busy());
}

#[test]
fn test_global_dispatch() {
    let _serial = POOL_LOCK.lock().unwrap();
    ensure_initialized();
    let sum = Arc::new(AtomicUsize::new(0));
    let sum_clone = sum.clone();

    framejob::dispatch(100, 10, move |args| {
        sum_clone.fetch_add(args.job_index as usize, Ordering::SeqCst);
    });
    framejob::wait();

    let expected: usize = (0..100).sum();
    assert_eq!(sum.load(Ordering::SeqCst), expected);
}

#[test]
fn test_global_pool_size() {
    let _serial = POOL_LOCK.lock().unwrap();
    ensure_initialized();
    assert!(framejob::global::num_workers() >= 1);
}
