//! `AdjacencyTable` - every association of a partition, not just the latest.
//!
//! Same slot layout as [`AncestryTable`](super::AncestryTable), but a key may
//! own many slots: one per distinct value. Inserting probes past slots of the
//! same key holding other values, so nothing is overwritten and the final
//! contents after a round do not depend on the order workers arrived in. The
//! sweep reads it to count repeated edges and to walk paths for proofs longer
//! than two.
//!
//! Occupancy counts distinct associations, so capacity is configured
//! separately from the ancestry table.

use crate::concurrency::atomic::{Atomic, GhostWord, Sharing};
use crate::concurrency::CachePadded;

use super::ancestry::{InsertOutcome, Slot, MAX_NODE_KEY, OVERLOAD_PERCENT, TWICE};

/// A branded, concurrent open-addressed multimap over node keys.
pub struct AdjacencyTable<'brand, S: Sharing<'brand> = Atomic> {
    slots: Box<[S::Word64]>,
    stored: CachePadded<S::Word32>,
}

impl<'brand, S: Sharing<'brand>> AdjacencyTable<'brand, S> {
    /// Creates an empty table with `capacity` slots.
    ///
    /// # Panics
    /// Panics if `capacity == 0` or `capacity > u32::MAX`.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity != 0, "adjacency table needs at least one slot");
        assert!(u32::try_from(capacity).is_ok(), "adjacency table capacity exceeds u32");
        Self {
            slots: (0..capacity).map(|_| S::Word64::zeroed()).collect(),
            stored: CachePadded::new(S::Word32::zeroed()),
        }
    }

    /// Number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of distinct associations stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.stored.load() as usize
    }

    /// Returns `true` if nothing is stored.
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

    /// Adds `key -> value`. Never returns [`InsertOutcome::Replaced`].
    ///
    /// # Panics
    /// Panics in debug builds if either node key exceeds [`MAX_NODE_KEY`].
    pub fn insert(&self, key: u32, value: u32) -> InsertOutcome {
        debug_assert!(key <= MAX_NODE_KEY && value <= MAX_NODE_KEY);
        let fresh = Slot::Occupied { key, value, twice: false }.encode();

        let mut index = self.home(key);
        for _ in 0..self.capacity() {
            let slot = &self.slots[index];
            let mut current = slot.load();
            loop {
                match Slot::decode(current) {
                    Slot::Empty => match slot.compare_exchange(0, fresh) {
                        Ok(_) => {
                            self.stored.fetch_add(1);
                            return InsertOutcome::Inserted;
                        }
                        Err(actual) => current = actual,
                    },
                    Slot::Occupied { key: k, value: v, .. } if k == key && v == value => {
                        slot.fetch_or(TWICE);
                        return InsertOutcome::Duplicate;
                    }
                    Slot::Occupied { .. } => break,
                }
            }
            index = self.next(index);
        }
        InsertOutcome::Full
    }

    /// Iterates every value stored for `key`, in probe order.
    pub fn values(&self, key: u32) -> Values<'_, 'brand, S> {
        Values {
            table: self,
            key,
            index: self.home(key),
            remaining: self.capacity(),
        }
    }

    /// How many times `key -> value` was inserted: 0, 1, or 2 for "at least twice".
    pub fn multiplicity(&self, key: u32, value: u32) -> u8 {
        let mut index = self.home(key);
        for _ in 0..self.capacity() {
            match Slot::decode(self.slots[index].load()) {
                Slot::Empty => return 0,
                Slot::Occupied { key: k, value: v, twice } if k == key && v == value => {
                    return if twice { 2 } else { 1 };
                }
                Slot::Occupied { .. } => index = self.next(index),
            }
        }
        0
    }

    /// Empties every slot and zeroes the counter.
    pub fn clear(&self) {
        for slot in self.slots.iter() {
            slot.store(0);
        }
        self.stored.store(0);
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

/// Iterator over the values of one key, see [`AdjacencyTable::values`].
pub struct Values<'a, 'brand, S: Sharing<'brand>> {
    table: &'a AdjacencyTable<'brand, S>,
    key: u32,
    index: usize,
    remaining: usize,
}

impl<'a, 'brand, S: Sharing<'brand>> Iterator for Values<'a, 'brand, S> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        while self.remaining != 0 {
            let raw = self.table.slots[self.index].load();
            self.remaining -= 1;
            self.index = self.table.next(self.index);
            match Slot::decode(raw) {
                Slot::Empty => {
                    self.remaining = 0;
                    return None;
                }
                Slot::Occupied { key, value, .. } if key == self.key => return Some(value),
                Slot::Occupied { .. } => {}
            }
        }
        None
    }
}
