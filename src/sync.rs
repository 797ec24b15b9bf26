//! Lock and condition variable used by the queue.
//!
//! Built with `RUSTFLAGS="--cfg loom"` these come from `loom::sync` so the
//! model checker can explore every interleaving of `put`/`get`; otherwise
//! they are the `std::sync` types.

#[cfg(loom)]
pub(crate) use loom::sync::{Condvar, Mutex, MutexGuard};

#[cfg(not(loom))]
pub(crate) use std::sync::{Condvar, Mutex, MutexGuard};
