#![forbid(unsafe_code)]

//! Vertical display-slot allocation.
//!
//! Slots rank live sources on screen. Allocation always hands out the
//! smallest integer not currently in use, freed slots are recycled by later
//! acquisitions, and releasing one slot never moves another: a source keeps
//! its rank for its whole lifetime, however its neighbors come and go.

use std::collections::BTreeSet;
use std::fmt;

/// A vertical display rank. Slot 0 sits on the anchor row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(pub u16);

impl Slot {
    #[must_use]
    pub fn index(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Smallest-free-integer slot allocator.
#[derive(Debug, Default)]
pub struct SlotPool {
    free: BTreeSet<u16>,
    next: u16,
}

impl SlotPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the smallest slot not currently in use.
    pub fn acquire(&mut self) -> Slot {
        if let Some(&slot) = self.free.iter().next() {
            self.free.remove(&slot);
            return Slot(slot);
        }
        let slot = self.next;
        debug_assert!(slot < u16::MAX, "slot pool exhausted");
        self.next = self.next.saturating_add(1);
        Slot(slot)
    }

    /// Returns a slot to the pool.
    ///
    /// Releasing a slot that is not currently held is a caller bug; debug
    /// builds assert, release builds ignore it.
    pub fn release(&mut self, slot: Slot) {
        debug_assert!(
            slot.0 < self.next && !self.free.contains(&slot.0),
            "slot {slot} is not held"
        );
        if slot.0 < self.next {
            self.free.insert(slot.0);
        }
    }

    /// Number of slots currently held.
    #[must_use]
    pub fn in_use(&self) -> usize {
        self.next as usize - self.free.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.in_use() == 0
    }
}
