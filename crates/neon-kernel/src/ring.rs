//! Fixed-capacity circular storage.
//!
//! `RingBuffer` owns every slot up front and never grows. Slots are addressed
//! through a logical index that is offset by a movable start pointer, so the
//! oldest entry can be rotated to the back without moving any data:
//!
//! ```text
//! physical:  [ C | D | A | B ]      start = 2, len = 4
//! logical:     2   3   0   1
//! ```

use neon_common::PoolError;

/// Circular array with a movable start pointer and a live-entry count.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    slots: Box<[T]>,
    start: usize,
    len: usize,
}

impl<T> RingBuffer<T> {
    /// Creates a ring of `capacity` slots, each built by `fill` from its
    /// physical index. No entry counts as live yet.
    pub fn new(capacity: usize, fill: impl FnMut(usize) -> T) -> Result<Self, PoolError> {
        if capacity == 0 {
            return Err(PoolError::ZeroCapacity);
        }

        Ok(Self {
            slots: (0..capacity).map(fill).collect(),
            start: 0,
            len: 0,
        })
    }

    /// Total slot count.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether no entry is live.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether every slot is live.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Physical index of logical entry 0. Not usually 0.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Physical slot backing logical index `logical`.
    #[must_use]
    pub fn physical(&self, logical: usize) -> usize {
        (self.start + logical) % self.capacity()
    }

    /// Moves the start pointer forward by `steps` slots, wrapping around.
    pub fn advance_start(&mut self, steps: usize) {
        self.start = (self.start + steps) % self.capacity();
    }

    /// Sets the live-entry count.
    pub fn set_len(&mut self, len: usize) {
        debug_assert!(len <= self.capacity(), "ring length exceeds capacity");
        self.len = len.min(self.capacity());
    }

    /// Slot at logical index `logical`, live or not. Wraps past capacity.
    #[must_use]
    pub fn slot(&self, logical: usize) -> &T {
        &self.slots[self.physical(logical)]
    }

    /// Mutable slot at logical index `logical`, live or not.
    pub fn slot_mut(&mut self, logical: usize) -> &mut T {
        let index = self.physical(logical);
        &mut self.slots[index]
    }

    /// Live entry at logical index `logical`.
    #[must_use]
    pub fn get(&self, logical: usize) -> Option<&T> {
        (logical < self.len).then(|| self.slot(logical))
    }

    /// Mutable live entry at logical index `logical`.
    pub fn get_mut(&mut self, logical: usize) -> Option<&mut T> {
        if logical < self.len {
            Some(self.slot_mut(logical))
        } else {
            None
        }
    }

    /// Swaps the slots behind two logical indices.
    pub fn swap(&mut self, a: usize, b: usize) {
        let (a, b) = (self.physical(a), self.physical(b));
        self.slots.swap(a, b);
    }

    /// Live entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.len).map(move |i| self.slot(i))
    }

    /// Every slot in physical order, live or not.
    #[must_use]
    pub fn raw_slots(&self) -> &[T] {
        &self.slots
    }
}
