//! Circular buffer with one guard slot.
//!
//! `Ring` is not synchronized: `BoundedQueue` only touches it while holding
//! its lock. Empty and full are told apart by keeping one slot free, so a
//! ring with `n` slots holds at most `n - 1` values.

use crate::error::CapacityError;

pub(crate) struct Ring<T> {
    slots: Box<[Option<T>]>,
    read: usize,
    write: usize,
}

impl<T> Ring<T> {
    /// `slots` must be at least 2; the queue validates this before calling.
    /// Fails instead of aborting when the buffer cannot be allocated.
    pub(crate) fn new(slots: usize) -> Result<Self, CapacityError> {
        debug_assert!(slots >= 2);
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(slots)
            .map_err(|_| CapacityError::Alloc { capacity: slots })?;
        buffer.resize_with(slots, || None);
        Ok(Ring {
            slots: buffer.into_boxed_slice(),
            read: 0,
            write: 0,
        })
    }

    #[inline]
    pub(crate) fn slots(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    fn advance(&self, index: usize) -> usize {
        let next = index + 1;
        if next == self.slots.len() {
            0
        } else {
            next
        }
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.read == self.write
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.advance(self.write) == self.read
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        let n = self.slots.len();
        (self.write + n - self.read) % n
    }

    /// Stores `value` at the write position. The caller checks `is_full` first.
    pub(crate) fn push(&mut self, value: T) {
        debug_assert!(!self.is_full());
        let slot = &mut self.slots[self.write];
        debug_assert!(slot.is_none(), "write slot {} occupied", self.write);
        *slot = Some(value);
        self.write = self.advance(self.write);
    }

    /// Removes the oldest value, or `None` if the ring is empty.
    pub(crate) fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let value = self.slots[self.read].take();
        debug_assert!(value.is_some(), "read slot {} vacant", self.read);
        self.read = self.advance(self.read);
        value
    }

    #[cfg(test)]
    fn indices(&self) -> (usize, usize) {
        (self.read, self.write)
    }
}
