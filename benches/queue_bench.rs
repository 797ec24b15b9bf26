use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::thread;

use crossbeam_channel::bounded;
use flume::bounded as flume_bounded;
use monitor_queue::BoundedQueue;
use std::sync::mpsc::sync_channel;

const MESSAGES: usize = 100_000;
const BUFFER_SIZE: usize = 1024;

/// (producers, consumers) pairs measured by every contender.
const SHAPES: [(usize, usize); 4] = [(1, 1), (4, 1), (1, 4), (4, 4)];

fn run_monitor_queue(producers: usize, consumers: usize, slots: usize) {
    let queue = BoundedQueue::<usize>::new(slots).unwrap();
    let per_producer = MESSAGES / producers;
    let per_consumer = MESSAGES / consumers;

    thread::scope(|s| {
        for p in 0..producers {
            let q = &queue;
            s.spawn(move || {
                for i in 0..per_producer {
                    q.put(black_box(p * per_producer + i));
                }
            });
        }
        for _ in 0..consumers {
            s.spawn(|| {
                for _ in 0..per_consumer {
                    black_box(queue.get());
                }
            });
        }
    });
}

fn run_crossbeam(producers: usize, consumers: usize, slots: usize) {
    let (tx, rx) = bounded::<usize>(slots);
    let per_producer = MESSAGES / producers;
    let per_consumer = MESSAGES / consumers;

    thread::scope(|s| {
        for p in 0..producers {
            let tx = tx.clone();
            s.spawn(move || {
                for i in 0..per_producer {
                    tx.send(black_box(p * per_producer + i)).unwrap();
                }
            });
        }
        for _ in 0..consumers {
            let rx = rx.clone();
            s.spawn(move || {
                for _ in 0..per_consumer {
                    black_box(rx.recv().unwrap());
                }
            });
        }
    });
}

fn run_flume(producers: usize, consumers: usize, slots: usize) {
    let (tx, rx) = flume_bounded::<usize>(slots);
    let per_producer = MESSAGES / producers;
    let per_consumer = MESSAGES / consumers;

    thread::scope(|s| {
        for p in 0..producers {
            let tx = tx.clone();
            s.spawn(move || {
                for i in 0..per_producer {
                    tx.send(black_box(p * per_producer + i)).unwrap();
                }
            });
        }
        for _ in 0..consumers {
            let rx = rx.clone();
            s.spawn(move || {
                for _ in 0..per_consumer {
                    black_box(rx.recv().unwrap());
                }
            });
        }
    });
}

// std's receiver cannot be shared, so it only runs the single-consumer shapes.
fn run_std_mpsc(producers: usize, slots: usize) {
    let (tx, rx) = sync_channel::<usize>(slots);
    let per_producer = MESSAGES / producers;

    thread::scope(|s| {
        for p in 0..producers {
            let tx = tx.clone();
            s.spawn(move || {
                for i in 0..per_producer {
                    tx.send(black_box(p * per_producer + i)).unwrap();
                }
            });
        }
        s.spawn(move || {
            for _ in 0..MESSAGES {
                black_box(rx.recv().unwrap());
            }
        });
    });
}

fn bench_shapes(c: &mut Criterion) {
    for (producers, consumers) in SHAPES {
        let mut group = c.benchmark_group(format!("{}p_{}c", producers, consumers));
        group.throughput(Throughput::Elements(MESSAGES as u64));
        group.sample_size(20);

        group.bench_function("monitor_queue", |b| {
            b.iter(|| run_monitor_queue(producers, consumers, BUFFER_SIZE + 1));
        });
        group.bench_function("crossbeam_channel", |b| {
            b.iter(|| run_crossbeam(producers, consumers, BUFFER_SIZE));
        });
        group.bench_function("flume", |b| {
            b.iter(|| run_flume(producers, consumers, BUFFER_SIZE));
        });
        if consumers == 1 {
            group.bench_function("std_mpsc", |b| {
                b.iter(|| run_std_mpsc(producers, BUFFER_SIZE));
            });
        }

        group.finish();
    }
}

fn bench_buffer_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("1p_1c_by_slots");
    group.throughput(Throughput::Elements(MESSAGES as u64));
    group.sample_size(20);

    for slots in [2, 16, 256, 4096] {
        group.bench_with_input(BenchmarkId::new("monitor_queue", slots), &slots, |b, &slots| {
            b.iter(|| run_monitor_queue(1, 1, slots));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_shapes, bench_buffer_size);
criterion_main!(benches);
