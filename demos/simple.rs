//! Simple usage example

use monitor_queue::BoundedQueue;
use std::sync::Arc;
use std::thread;

fn main() {
    println!("monitor_queue - Simple Example\n");

    // 16 slots, so up to 15 messages can be in flight
    let queue = Arc::new(BoundedQueue::<String>::new(16).unwrap());

    // Clone handles for different threads
    let producer_queue = queue.clone();
    let consumer_queue = queue.clone();

    let producer = thread::spawn(move || {
        for i in 0..10 {
            let message = format!("Message {}", i);
            println!("Putting: {}", message);

            // Blocks while the queue is full
            producer_queue.put(message);

            // Small delay to make output readable
            thread::sleep(std::time::Duration::from_millis(100));
        }
        producer_queue.close();
        println!("Producer finished!");
    });

    let consumer = thread::spawn(move || {
        // Ends once the producer has closed the queue and it is drained
        for message in consumer_queue.iter() {
            println!("Got: {}", message);
        }
        println!("Consumer finished!");
    });

    producer.join().unwrap();
    consumer.join().unwrap();

    println!("\nExample completed successfully!");
}
