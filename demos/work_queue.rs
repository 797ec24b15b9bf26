use monitor_queue::{BoundedQueue, GetError};
use std::thread;
use std::time::Duration;

enum Job {
    Run(String),
    Stop,
}

fn main() {
    println!("Work Queue Example\n");

    const NUM_WORKERS: usize = 4;
    const NUM_JOBS: usize = 20;

    // Small job queue so the producer feels backpressure
    let jobs = BoundedQueue::<Job>::with_live_capacity(4).unwrap();
    let results = BoundedQueue::<String>::with_live_capacity(NUM_JOBS).unwrap();

    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..NUM_JOBS {
                let job = format!("Job-{:02}", i);
                println!("Enqueuing: {}", job);
                jobs.put(Job::Run(job));
            }
            // One stop marker per worker
            for _ in 0..NUM_WORKERS {
                jobs.put(Job::Stop);
            }
            println!("All jobs enqueued!");
        });

        let workers: Vec<_> = (0..NUM_WORKERS)
            .map(|worker_id| {
                let (jobs, results) = (&jobs, &results);
                s.spawn(move || {
                    let mut processed = 0;
                    while let Job::Run(job) = jobs.get() {
                        println!("Worker {} processing: {}", worker_id, job);
                        thread::sleep(Duration::from_millis(50));
                        results.put(format!("{} -> completed by worker {}", job, worker_id));
                        processed += 1;
                    }
                    println!("Worker {} finished ({} jobs)", worker_id, processed);
                })
            })
            .collect();

        s.spawn(|| {
            let mut collected = 0;
            loop {
                match results.get_timeout(Duration::from_secs(5)) {
                    Ok(result) => {
                        println!("Result: {}", result);
                        collected += 1;
                    }
                    Err(GetError::Closed) => break,
                    Err(err) => {
                        println!("Collector stopped: {}", err);
                        break;
                    }
                }
            }
            println!("Collected {} results", collected);
        });

        for worker in workers {
            worker.join().unwrap();
        }
        results.close();
    });

    println!("\nWork queue example completed!");
}
