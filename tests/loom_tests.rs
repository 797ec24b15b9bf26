#![cfg(loom)]

use loom::sync::Arc;
use loom::thread;
use monitor_queue::{BoundedQueue, GetError};

#[test]
fn loom_spsc_minimum_capacity() {
    loom::model(|| {
        let queue = Arc::new(BoundedQueue::new(2).unwrap());
        let q_put = queue.clone();

        let producer = thread::spawn(move || {
            for i in 0..2 {
                q_put.put(i);
            }
        });

        assert_eq!(queue.get(), 0);
        assert_eq!(queue.get(), 1);
        producer.join().unwrap();
    });
}

#[test]
fn loom_mpsc() {
    loom::model(|| {
        let queue = Arc::new(BoundedQueue::new(2).unwrap());
        let mut handles = vec![];

        // Two producers
        for i in 0..2 {
            let q = queue.clone();
            handles.push(thread::spawn(move || {
                q.put(i * 10);
            }));
        }

        let mut received = vec![queue.get(), queue.get()];
        received.sort_unstable();
        assert_eq!(received, vec![0, 10]);

        for h in handles {
            h.join().unwrap();
        }
    });
}

#[test]
fn loom_two_sentinels_two_consumers() {
    loom::model(|| {
        let queue = Arc::new(BoundedQueue::new(3).unwrap());
        let mut handles = vec![];

        // Two consumers
        for _ in 0..2 {
            let q = queue.clone();
            handles.push(thread::spawn(move || q.get()));
        }

        queue.put(-1);
        queue.put(-1);

        for h in handles {
            assert_eq!(h.join().unwrap(), -1);
        }
    });
}

#[test]
fn loom_blocked_producers_released_by_gets() {
    loom::model(|| {
        let queue = Arc::new(BoundedQueue::new(2).unwrap());
        queue.put(0);
        let mut handles = vec![];

        for i in 1..3 {
            let q = queue.clone();
            handles.push(thread::spawn(move || q.put(i)));
        }

        let mut received = vec![queue.get(), queue.get(), queue.get()];
        assert_eq!(received[0], 0);
        received.sort_unstable();
        assert_eq!(received, vec![0, 1, 2]);

        for h in handles {
            h.join().unwrap();
        }
    });
}

#[test]
fn loom_close_releases_receivers() {
    loom::model(|| {
        let queue = Arc::new(BoundedQueue::<i32>::new(2).unwrap());
        let mut handles = vec![];

        for _ in 0..2 {
            let q = queue.clone();
            handles.push(thread::spawn(move || q.recv()));
        }

        queue.put(7);
        queue.close();

        let mut results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        results.sort_by_key(|r| r.is_err());
        assert_eq!(results, vec![Ok(7), Err(GetError::Closed)]);
    });
}
