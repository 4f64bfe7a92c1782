use framejob::queue;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

fn main() {
    println!("framejob - Fixed-Size Worker-Thread Pool with Grouped Dispatch\n");

    framejob::initialize();
    println!(
        "Initialized global pool with {} worker threads\n",
        framejob::global::num_workers()
    );

    // Example 1: Simple asynchronous job
    println!("Example 1: Simple job execution");
    framejob::execute(|| {
        println!("  Hello from a worker thread!");
    });
    framejob::wait();
    println!("  Job completed\n");

    // Example 2: Grouped dispatch over a range
    println!("Example 2: Grouped dispatch");
    let job_count = 1_000_000u32;
    let group_size = 1_000u32;
    let checksum = Arc::new(AtomicUsize::new(0));
    let checksum_clone = checksum.clone();

    let start = Instant::now();
    framejob::dispatch(job_count, group_size, move |args| {
        // Simulate some per-item work
        let mut local = 0usize;
        for _ in 0..10 {
            local += args.job_index as usize % 7;
        }
        checksum_clone.fetch_add(local, Ordering::Relaxed);
    });
    framejob::wait();

    let duration = start.elapsed();
    println!(
        "  Dispatched {} items in {} groups in {:?}",
        job_count,
        job_count.div_ceil(group_size),
        duration
    );
    println!("  Checksum: {}\n", checksum.load(Ordering::Relaxed));

    // Example 3: Saturating the bounded queue
    println!("Example 3: Queue saturation");
    let num_jobs = queue::CAPACITY * 8;
    let hits = Arc::new(AtomicUsize::new(0));

    let start = Instant::now();
    for _ in 0..num_jobs {
        let hits_clone = hits.clone();
        framejob::execute(move || {
            hits_clone.fetch_add(1, Ordering::Relaxed);
        });
    }
    framejob::wait();

    let duration = start.elapsed();
    let jobs_per_second = num_jobs as f64 / duration.as_secs_f64();
    println!(
        "  Executed {} jobs through a {}-slot queue in {:?}",
        num_jobs,
        queue::CAPACITY,
        duration
    );
    println!("  Throughput: {:.2} jobs/second\n", jobs_per_second);

    println!("Done! ({} of {} jobs observed)", hits.load(Ordering::Relaxed), num_jobs);
}
