//! Producers put integers through a `BoundedQueue`, consumers read them
//! back until they see the end-of-queue sentinel.
//!
//! Every integer in `0..items` is logged twice: once left of the arrow
//! when it is put, once right of it when it is taken.

use std::thread;

use clap::Parser;
use monitor_queue::BoundedQueue;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Options {
    /// number of slots in the queue (one stays free)
    #[clap(short, long)]
    #[clap(default_value_t = 16)]
    capacity: usize,

    /// integers to push through the queue
    #[clap(short, long)]
    #[clap(default_value_t = 10000)]
    items: i64,

    /// producer threads
    #[clap(short, long)]
    #[clap(default_value_t = 1)]
    producers: usize,

    /// consumer threads, each stopped by its own sentinel
    #[clap(short = 'C', long)]
    #[clap(default_value_t = 1)]
    consumers: usize,

    /// end-of-queue marker, must lie outside 0..items
    #[clap(short, long, allow_hyphen_values = true)]
    #[clap(default_value_t = -1)]
    sentinel: i64,

    /// do not log every item
    #[clap(short, long)]
    quiet: bool,
}

#[derive(Debug, Default)]
struct ConsumerReport {
    received: usize,
    get_calls: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Items are reported at info level, so show it unless RUST_LOG says otherwise.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let options = Options::parse();
    if options.producers == 0 || options.consumers == 0 {
        return Err("need at least one producer and one consumer".into());
    }
    if (0..options.items).contains(&options.sentinel) {
        return Err(format!("sentinel {} is a valid item", options.sentinel).into());
    }

    let queue = BoundedQueue::new(options.capacity).map_err(|err| {
        error!("cannot create queue: {}", err);
        err
    })?;
    info!(
        "capacity {} items {} producers {} consumers {}",
        options.capacity, options.items, options.producers, options.consumers
    );

    let reports = run(&queue, &options);

    let mut total = 0;
    for (id, report) in reports.iter().enumerate() {
        info!(
            "consumer {} received {} items in {} get calls",
            id, report.received, report.get_calls
        );
        total += report.received;
    }
    info!("received {} of {} items", total, options.items);

    if total as i64 != options.items.max(0) {
        return Err(format!("lost {} items", options.items - total as i64).into());
    }
    Ok(())
}

fn run(queue: &BoundedQueue<i64>, options: &Options) -> Vec<ConsumerReport> {
    thread::scope(|s| {
        let consumers: Vec<_> = (0..options.consumers)
            .map(|id| s.spawn(move || consume(id, queue, options)))
            .collect();

        let producers: Vec<_> = (0..options.producers)
            .map(|id| s.spawn(move || produce(id, queue, options)))
            .collect();
        for producer in producers {
            if producer.join().is_err() {
                error!("producer thread panicked");
            }
        }

        // A sentinel is taken by exactly one get, so each consumer needs its own.
        for _ in 0..options.consumers {
            queue.put(options.sentinel);
        }

        consumers
            .into_iter()
            .map(|consumer| {
                consumer.join().unwrap_or_else(|_| {
                    error!("consumer thread panicked");
                    ConsumerReport::default()
                })
            })
            .collect()
    })
}

fn produce(id: usize, queue: &BoundedQueue<i64>, options: &Options) {
    // Producer `id` owns every `producers`-th integer, in ascending order.
    let step = options.producers as i64;
    let mut n = id as i64;
    while n < options.items {
        if !options.quiet {
            info!("{} --->", n);
        }
        queue.put(n);
        n += step;
    }
}

fn consume(id: usize, queue: &BoundedQueue<i64>, options: &Options) -> ConsumerReport {
    let mut report = ConsumerReport::default();
    loop {
        let n = queue.get();
        report.get_calls += 1;
        if n == options.sentinel {
            break;
        }
        if !options.quiet {
            info!("---> {}", n);
        }
        report.received += 1;
    }
    info!("consumer {} saw the end of the queue", id);
    report
}
