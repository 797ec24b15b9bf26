use thiserror::Error;

/// Returned by the constructors when the requested size cannot back a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CapacityError {
    /// One slot is reserved as a guard, so at least two are needed.
    #[error("capacity must be at least 2 slots, got {capacity}")]
    TooSmall {
        /// The rejected slot count.
        capacity: usize,
    },
    /// The allocator could not provide the requested slots.
    #[error("cannot allocate {capacity} slots")]
    Alloc {
        /// The slot count that could not be allocated.
        capacity: usize,
    },
    /// `with_live_capacity(usize::MAX)` cannot add the guard slot.
    #[error("capacity overflows usize once the guard slot is added")]
    Overflow,
}

/// Failure of a non-panicking insert. The rejected value is always handed back.
#[derive(Clone, Copy, PartialEq, Eq, Error)]
pub enum PutError<T> {
    /// The queue had no free slot (`try_put`).
    #[error("queue is full")]
    Full(T),
    /// No slot freed up before the deadline (`put_timeout`).
    #[error("timed out waiting for a free slot")]
    Timeout(T),
    /// The queue was closed before the value could be stored.
    #[error("queue is closed")]
    Closed(T),
}

impl<T> PutError<T> {
    /// Gives back the value that was not enqueued.
    pub fn into_inner(self) -> T {
        match self {
            PutError::Full(value) | PutError::Timeout(value) | PutError::Closed(value) => value,
        }
    }

    /// `true` for [`PutError::Full`].
    pub fn is_full(&self) -> bool {
        matches!(self, PutError::Full(_))
    }

    /// `true` for [`PutError::Timeout`].
    pub fn is_timeout(&self) -> bool {
        matches!(self, PutError::Timeout(_))
    }

    /// `true` for [`PutError::Closed`].
    pub fn is_closed(&self) -> bool {
        matches!(self, PutError::Closed(_))
    }
}

// Hand-written so that payloads without `Debug` can still be unwrapped.
impl<T> std::fmt::Debug for PutError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PutError::Full(_) => f.write_str("Full(..)"),
            PutError::Timeout(_) => f.write_str("Timeout(..)"),
            PutError::Closed(_) => f.write_str("Closed(..)"),
        }
    }
}

/// Failure of a non-panicking remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GetError {
    /// The queue held nothing (`try_get`).
    #[error("queue is empty")]
    Empty,
    /// Nothing arrived before the deadline (`get_timeout`).
    #[error("timed out waiting for a value")]
    Timeout,
    /// The queue is closed and every remaining value has been taken.
    #[error("queue is closed and drained")]
    Closed,
}

impl GetError {
    /// `true` for [`GetError::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, GetError::Empty)
    }

    /// `true` for [`GetError::Timeout`].
    pub fn is_timeout(&self) -> bool {
        matches!(self, GetError::Timeout)
    }

    /// `true` for [`GetError::Closed`].
    pub fn is_closed(&self) -> bool {
        matches!(self, GetError::Closed)
    }
}
