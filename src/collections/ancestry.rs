//! `AncestryTable` - a fixed-capacity, open-addressed node map.
//!
//! Keys and values are parity-tagged node keys (see [`crate::graph::Side`]).
//! Each slot is one 64-bit word:
//!
//! ```text
//!  63     62     61 ........ 31   30 ......... 0
//! TWICE  ONCE        key              value
//! ```
//!
//! A zero word is an empty slot. Every occupied slot has `ONCE` set, so node
//! key `0` with value `0` is still distinguishable from empty.
//!
//! Inserting probes linearly from `key % capacity` to the first slot that is
//! empty or holds the key:
//! - empty slot: compare-and-swap the association in; exactly one racer wins,
//!   a loser re-examines the slot it lost on;
//! - same key, same value: a genuine re-insertion, `TWICE` is set;
//! - same key, other value: the value is overwritten in place and the slot
//!   drops back to `ONCE`;
//! - other key: keep probing.
//!
//! A key owns at most one slot, so occupancy counts keys. There are no
//! deletions short of [`AncestryTable::clear`], which keeps probe runs stable
//! under concurrent inserts.

use crate::concurrency::atomic::{Atomic, GhostWord, Sharing};
use crate::concurrency::CachePadded;

/// Largest node key a slot can hold.
pub const MAX_NODE_KEY: u32 = (1 << NODE_KEY_BITS) - 1;

/// Width of one node key inside a slot.
pub const NODE_KEY_BITS: u32 = 31;

/// Occupancy percentage at which the table reports itself overloaded.
pub const OVERLOAD_PERCENT: u64 = 90;

const NODE_MASK: u64 = (1 << NODE_KEY_BITS) - 1;
const ONCE: u64 = 1 << 62;
pub(super) const TWICE: u64 = 1 << 63;

/// Decoded view of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Never written since the last clear.
    Empty,
    /// One key/value association.
    Occupied {
        /// Node key the association is filed under.
        key: u32,
        /// Node key paired with it.
        value: u32,
        /// Whether this association was inserted again since it was written.
        twice: bool,
    },
}

impl Slot {
    /// Decodes a raw slot word.
    #[inline(always)]
    pub const fn decode(raw: u64) -> Self {
        if raw == 0 {
            Slot::Empty
        } else {
            Slot::Occupied {
                key: ((raw >> NODE_KEY_BITS) & NODE_MASK) as u32,
                value: (raw & NODE_MASK) as u32,
                twice: raw & TWICE != 0,
            }
        }
    }

    /// Encodes the slot as a raw word.
    #[inline(always)]
    pub const fn encode(self) -> u64 {
        match self {
            Slot::Empty => 0,
            Slot::Occupied { key, value, twice } => {
                let tag = if twice { ONCE | TWICE } else { ONCE };
                tag | ((key as u64 & NODE_MASK) << NODE_KEY_BITS) | (value as u64 & NODE_MASK)
            }
        }
    }
}

/// Result of [`AncestryTable::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The key was new and now occupies a slot.
    Inserted,
    /// The key was present with another value, which has been overwritten.
    Replaced,
    /// The same association was already present; it is now marked as seen twice.
    Duplicate,
    /// Every slot was probed without finding room.
    Full,
}

/// A branded, concurrent open-addressed map from a node key to the node it
/// was most recently paired with.
pub struct AncestryTable<'brand, S: Sharing<'brand> = Atomic> {
    slots: Box<[S::Word64]>,
    stored: CachePadded<S::Word32>,
}

impl<'brand, S: Sharing<'brand>> AncestryTable<'brand, S> {
    /// Creates an empty table with `capacity` slots.
    ///
    /// # Panics
    /// Panics if `capacity == 0` or `capacity > u32::MAX`.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity != 0, "ancestry table needs at least one slot");
        assert!(u32::try_from(capacity).is_ok(), "ancestry table capacity exceeds u32");
        let slots = (0..capacity).map(|_| S::Word64::zeroed()).collect();
        Self {
            slots,
            stored: CachePadded::new(S::Word32::zeroed()),
        }
    }

    /// Number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.stored.load() as usize
    }

    /// Returns `true` if no slot is occupied.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Occupancy in whole percent.
    #[inline]
    pub fn load(&self) -> u32 {
        (self.len() as u64 * 100 / self.capacity() as u64) as u32
    }

    /// Returns `true` once occupancy reaches the high-water mark.
    #[inline]
    pub fn overloaded(&self) -> bool {
        self.len() as u64 * 100 >= self.capacity() as u64 * OVERLOAD_PERCENT
    }

    /// Records `key -> value`, overwriting any other value held for `key`.
    ///
    /// # Panics
    /// Panics in debug builds if either node key exceeds [`MAX_NODE_KEY`].
    pub fn insert(&self, key: u32, value: u32) -> InsertOutcome {
        debug_assert!(key <= MAX_NODE_KEY && value <= MAX_NODE_KEY);
        let fresh = Slot::Occupied { key, value, twice: false }.encode();

        let cap = self.capacity();
        let mut index = self.home(key);
        for _ in 0..cap {
            let slot = &self.slots[index];
            let mut current = slot.load();
            loop {
                match Slot::decode(current) {
                    Slot::Empty => match slot.compare_exchange(0, fresh) {
                        Ok(_) => {
                            self.stored.fetch_add(1);
                            return InsertOutcome::Inserted;
                        }
                        // Lost the race for this slot; look at what won.
                        Err(actual) => current = actual,
                    },
                    Slot::Occupied { key: k, value: v, twice } if k == key => {
                        // CAS rather than OR: the value may be overwritten under us.
                        let next = if v != value {
                            fresh
                        } else if twice {
                            return InsertOutcome::Duplicate;
                        } else {
                            current | TWICE
                        };
                        match slot.compare_exchange(current, next) {
                            Ok(_) if v == value => return InsertOutcome::Duplicate,
                            Ok(_) => return InsertOutcome::Replaced,
                            Err(actual) => current = actual,
                        }
                    }
                    Slot::Occupied { .. } => break,
                }
            }
            index = self.next(index);
        }
        InsertOutcome::Full
    }

    /// Returns the value most recently recorded for `key`.
    pub fn lookup(&self, key: u32) -> Option<u32> {
        match self.find(key) {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Empty => None,
        }
    }

    /// How many times `key -> value` was inserted since `key` last took that
    /// value: 0, 1, or 2 for "at least twice".
    pub fn multiplicity(&self, key: u32, value: u32) -> u8 {
        match self.find(key) {
            Slot::Occupied { value: v, twice, .. } if v == value => {
                if twice {
                    2
                } else {
                    1
                }
            }
            _ => 0,
        }
    }

    /// Empties every slot and zeroes the counter.
    pub fn clear(&self) {
        for slot in self.slots.iter() {
            slot.store(0);
        }
        self.stored.store(0);
    }

    /// The slot holding `key`, or `Slot::Empty`.
    fn find(&self, key: u32) -> Slot {
        let mut index = self.home(key);
        for _ in 0..self.capacity() {
            match Slot::decode(self.slots[index].load()) {
                Slot::Empty => return Slot::Empty,
                found @ Slot::Occupied { key: k, .. } if k == key => return found,
                Slot::Occupied { .. } => index = self.next(index),
            }
        }
        Slot::Empty
    }

    #[inline(always)]
    fn home(&self, key: u32) -> usize {
        key as usize % self.capacity()
    }

    #[inline(always)]
    fn next(&self, index: usize) -> usize {
        if index + 1 == self.capacity() {
            0
        } else {
            index + 1
        }
    }
}
