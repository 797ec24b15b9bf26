use monitor_queue::BoundedQueue;
use std::thread;
use std::time::Instant;

const MESSAGES: usize = 1_000_000;
const BUFFER_SIZE: usize = 1024;

fn main() {
    println!("monitor_queue Performance Test");
    println!("==============================\n");

    for (producers, consumers) in [(1, 1), (4, 1), (1, 4), (4, 4)] {
        println!(
            "{} Producer(s), {} Consumer(s) ({} messages):",
            producers, consumers, MESSAGES
        );
        let start = Instant::now();
        run(producers, consumers);
        let elapsed = start.elapsed();
        let throughput = MESSAGES as f64 / elapsed.as_secs_f64();
        println!("  Time: {:?}", elapsed);
        println!("  Throughput: {:.2} msgs/sec", throughput);
        println!("  Latency: {:.0} ns/op\n", elapsed.as_nanos() as f64 / MESSAGES as f64);
    }
}

fn run(producers: usize, consumers: usize) {
    let queue = BoundedQueue::<usize>::with_live_capacity(BUFFER_SIZE).unwrap();
    let per_producer = MESSAGES / producers;
    let per_consumer = MESSAGES / consumers;

    thread::scope(|s| {
        for p in 0..producers {
            let q = &queue;
            s.spawn(move || {
                for i in 0..per_producer {
                    q.put(p * per_producer + i);
                }
            });
        }

        for _ in 0..consumers {
            s.spawn(|| {
                for _ in 0..per_consumer {
                    queue.get();
                }
            });
        }
    });
}
