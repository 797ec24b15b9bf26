use std::fmt;
use std::sync::PoisonError;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::error::{CapacityError, GetError, PutError};
use crate::ring::Ring;
use crate::sync::{Condvar, Mutex, MutexGuard};

/// Everything the lock protects.
struct State<T> {
    ring: Ring<T>,
    closed: bool,
    // Threads currently parked on `not_empty` / `not_full`.
    waiting_getters: usize,
    waiting_putters: usize,
}

/// Fixed-capacity blocking FIFO queue shared by producer and consumer threads.
///
/// The queue is a monitor: a [`Mutex`](std::sync::Mutex) around a circular
/// buffer plus two condition variables, `not_empty` and `not_full`.
/// [`put`](Self::put) blocks while the buffer is full and [`get`](Self::get)
/// blocks while it is empty. One slot is kept as a guard, so a queue built
/// with `capacity` slots holds at most `capacity - 1` values.
///
/// Share it by reference inside [`std::thread::scope`] or wrap it in an
/// [`Arc`](std::sync::Arc).
///
/// # Shutdown
///
/// The queue has no end-of-stream marker of its own. Either enqueue a
/// sentinel value per consumer, or call [`close`](Self::close) and have
/// producers and consumers use [`send`](Self::send) and
/// [`recv`](Self::recv), which report closure instead of blocking forever.
///
/// # Blocking
///
/// `put` and `get` wait without a timeout and cannot be cancelled. A parked
/// `put` is released only by a `get` (and a parked `get` only by a `put`),
/// or by [`close`](Self::close), which makes them panic. Callers that need a
/// bound use [`put_timeout`](Self::put_timeout) and
/// [`get_timeout`](Self::get_timeout).
///
/// The queue must outlive every thread blocked in it. Waiters hold a borrow
/// of the queue (directly or through an `Arc`), so the compiler rejects
/// dropping it while any call is still in progress.
///
/// # Example
///
/// ```
/// use monitor_queue::BoundedQueue;
/// use std::thread;
///
/// let queue = BoundedQueue::new(16).unwrap();
/// thread::scope(|s| {
///     s.spawn(|| {
///         for n in 0..100 {
///             queue.put(n);
///         }
///         queue.put(-1);
///     });
///     s.spawn(|| {
///         let mut expected = 0;
///         loop {
///             let n = queue.get();
///             if n == -1 {
///                 break;
///             }
///             assert_eq!(n, expected);
///             expected += 1;
///         }
///     });
/// });
/// ```
pub struct BoundedQueue<T> {
    state: Mutex<State<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Creates a queue backed by `capacity` slots.
    ///
    /// Fails with [`CapacityError::TooSmall`] when `capacity < 2` and with
    /// [`CapacityError::Alloc`] when the slots cannot be allocated.
    pub fn new(capacity: usize) -> Result<Self, CapacityError> {
        if capacity < 2 {
            return Err(CapacityError::TooSmall { capacity });
        }
        let ring = Ring::new(capacity)?;
        debug!(capacity, "creating bounded queue");
        Ok(BoundedQueue {
            state: Mutex::new(State {
                ring,
                closed: false,
                waiting_getters: 0,
                waiting_putters: 0,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
        })
    }

    /// Creates a queue that can hold `live` values at once (`live + 1` slots).
    pub fn with_live_capacity(live: usize) -> Result<Self, CapacityError> {
        let slots = live.checked_add(1).ok_or(CapacityError::Overflow)?;
        Self::new(slots)
    }

    /// Number of slots, including the guard slot.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Largest number of values the queue can hold.
    pub fn live_capacity(&self) -> usize {
        self.capacity - 1
    }

    /// Inserts `value`, blocking while the queue is full.
    ///
    /// # Panics
    ///
    /// Panics if the queue is closed, including when it is closed while this
    /// call is waiting for space. Use [`send`](Self::send) on queues that
    /// get closed.
    pub fn put(&self, value: T) {
        if self.send(value).is_err() {
            panic!("put on a closed BoundedQueue");
        }
    }

    /// Removes the oldest value, blocking while the queue is empty.
    ///
    /// # Panics
    ///
    /// Panics if the queue is closed and has nothing left to hand out. Use
    /// [`recv`](Self::recv) on queues that get closed.
    pub fn get(&self) -> T {
        match self.recv() {
            Ok(value) => value,
            Err(_) => panic!("get on a closed and drained BoundedQueue"),
        }
    }

    /// Blocking insert that returns the value instead of panicking once the
    /// queue is closed.
    pub fn send(&self, value: T) -> Result<(), PutError<T>> {
        let mut state = self.lock();
        while state.ring.is_full() && !state.closed {
            state = self.park_putter(state, None);
        }
        if state.closed {
            return Err(PutError::Closed(value));
        }
        self.store(&mut state, value);
        Ok(())
    }

    /// Blocking remove. After [`close`](Self::close) the remaining values are
    /// still handed out; then every caller gets [`GetError::Closed`].
    pub fn recv(&self) -> Result<T, GetError> {
        let mut state = self.lock();
        while state.ring.is_empty() && !state.closed {
            state = self.park_getter(state, None);
        }
        self.take(&mut state).ok_or(GetError::Closed)
    }

    /// Inserts `value` only if a slot is free right now.
    pub fn try_put(&self, value: T) -> Result<(), PutError<T>> {
        let mut state = self.lock();
        if state.closed {
            return Err(PutError::Closed(value));
        }
        if state.ring.is_full() {
            return Err(PutError::Full(value));
        }
        self.store(&mut state, value);
        Ok(())
    }

    /// Removes the oldest value only if one is available right now.
    pub fn try_get(&self) -> Result<T, GetError> {
        let mut state = self.lock();
        match self.take(&mut state) {
            Some(value) => Ok(value),
            None if state.closed => Err(GetError::Closed),
            None => Err(GetError::Empty),
        }
    }

    /// Like [`send`](Self::send) but gives up with [`PutError::Timeout`] once
    /// `timeout` has elapsed without a free slot.
    pub fn put_timeout(&self, value: T, timeout: Duration) -> Result<(), PutError<T>> {
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.lock();
        while state.ring.is_full() && !state.closed {
            let remaining = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                None => {
                    state = self.park_putter(state, None);
                    continue;
                }
            };
            if remaining.is_zero() {
                return Err(PutError::Timeout(value));
            }
            state = self.park_putter(state, Some(remaining));
        }
        if state.closed {
            return Err(PutError::Closed(value));
        }
        self.store(&mut state, value);
        Ok(())
    }

    /// Like [`recv`](Self::recv) but gives up with [`GetError::Timeout`] once
    /// `timeout` has elapsed without a value.
    pub fn get_timeout(&self, timeout: Duration) -> Result<T, GetError> {
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.lock();
        while state.ring.is_empty() && !state.closed {
            let remaining = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                None => {
                    state = self.park_getter(state, None);
                    continue;
                }
            };
            if remaining.is_zero() {
                return Err(GetError::Timeout);
            }
            state = self.park_getter(state, Some(remaining));
        }
        self.take(&mut state).ok_or(GetError::Closed)
    }

    /// Closes the queue and wakes every parked thread.
    ///
    /// Later inserts are rejected; values already queued can still be
    /// received. Returns `false` if the queue was already closed.
    pub fn close(&self) -> bool {
        let mut state = self.lock();
        if state.closed {
            return false;
        }
        state.closed = true;
        debug!(
            len = state.ring.len(),
            waiting_getters = state.waiting_getters,
            waiting_putters = state.waiting_putters,
            "closing bounded queue"
        );
        self.not_empty.notify_all();
        self.not_full.notify_all();
        true
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Number of values currently queued. Stale as soon as it is returned.
    pub fn len(&self) -> usize {
        self.lock().ring.len()
    }

    /// Whether no value is queued.
    pub fn is_empty(&self) -> bool {
        self.lock().ring.is_empty()
    }

    /// Whether a `put` would block right now.
    pub fn is_full(&self) -> bool {
        self.lock().ring.is_full()
    }

    /// Blocking iterator that yields values until the queue is closed and drained.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { queue: self }
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn park_putter<'a>(
        &self,
        mut state: MutexGuard<'a, State<T>>,
        timeout: Option<Duration>,
    ) -> MutexGuard<'a, State<T>> {
        state.waiting_putters += 1;
        trace!(waiting = state.waiting_putters, "put waiting on not_full");
        let mut state = wait(&self.not_full, state, timeout);
        state.waiting_putters -= 1;
        state
    }

    fn park_getter<'a>(
        &self,
        mut state: MutexGuard<'a, State<T>>,
        timeout: Option<Duration>,
    ) -> MutexGuard<'a, State<T>> {
        state.waiting_getters += 1;
        trace!(waiting = state.waiting_getters, "get waiting on not_empty");
        let mut state = wait(&self.not_empty, state, timeout);
        state.waiting_getters -= 1;
        state
    }

    // Caller holds the lock and has checked that the ring is not full.
    fn store(&self, state: &mut State<T>, value: T) {
        let was_empty = state.ring.is_empty();
        state.ring.push(value);
        if was_empty {
            self.not_empty.notify_one();
        }
        // A slot freed by `take` wakes one putter only; hand the wakeup on
        // while room is left.
        if state.waiting_putters > 0 && !state.ring.is_full() {
            self.not_full.notify_one();
        }
    }

    fn take(&self, state: &mut State<T>) -> Option<T> {
        let was_full = state.ring.is_full();
        let value = state.ring.pop()?;
        if was_full {
            self.not_full.notify_one();
        }
        // Several values may have landed behind a single empty -> non-empty
        // signal; wake the next getter while any are left.
        if state.waiting_getters > 0 && !state.ring.is_empty() {
            self.not_empty.notify_one();
        }
        Some(value)
    }
}

fn wait<'a, S>(
    condvar: &Condvar,
    guard: MutexGuard<'a, S>,
    timeout: Option<Duration>,
) -> MutexGuard<'a, S> {
    match timeout {
        None => condvar.wait(guard).unwrap_or_else(PoisonError::into_inner),
        Some(timeout) => match condvar.wait_timeout(guard, timeout) {
            Ok((guard, _)) => guard,
            Err(poisoned) => poisoned.into_inner().0,
        },
    }
}

impl<T> fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("BoundedQueue")
            .field("capacity", &state.ring.slots())
            .field("len", &state.ring.len())
            .field("closed", &state.closed)
            .finish()
    }
}

/// Iterator returned by [`BoundedQueue::iter`].
pub struct Iter<'a, T> {
    queue: &'a BoundedQueue<T>,
}

impl<T> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.queue.recv().ok()
    }
}

impl<'a, T> IntoIterator for &'a BoundedQueue<T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
