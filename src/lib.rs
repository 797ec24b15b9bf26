//! monitor_queue - fixed-capacity blocking FIFO queue built as a monitor
//!
//! A [`BoundedQueue`] hands values from producer threads to consumer threads
//! through a circular buffer guarded by one mutex and two condition
//! variables. `put` waits for room, `get` waits for data; `try_*`,
//! `*_timeout` and `close` cover the cases where waiting forever is not an
//! option.
//!
//! Loom model tests run with:
//!
//! ```bash
//! RUSTFLAGS="--cfg loom" cargo test --test loom_tests --release
//! ```
#![warn(missing_docs)]

mod error;
mod queue;
mod ring;
mod sync;

pub use error::{CapacityError, GetError, PutError};
pub use queue::{BoundedQueue, Iter};
