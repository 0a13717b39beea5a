//! `TwiceSet` - two bits per node, saturating at "seen twice".
//!
//! Each 32-bit word packs 16 nodes. Bit `2k` of word `w` records a first
//! sighting of node `16w + k`, bit `2k + 1` a second one. Marking ORs in the
//! low bit and, when that bit was already set, ORs in the high bit. Two racing
//! first sightings therefore always leave the high bit set: whichever `fetch_or`
//! lands second observes the low bit.
//!
//! The set is sized for one partition of the u-side, not for the whole node
//! space.

use crate::concurrency::atomic::{Atomic, GhostWord, Sharing};

/// Number of nodes packed into one word.
pub const NODES_PER_WORD: usize = 16;

const LOW_BITS: u32 = 0x5555_5555;
const HIGH_BITS: u32 = 0xAAAA_AAAA;

/// A branded occupancy bitmap answering "has this node been seen twice?".
pub struct TwiceSet<'brand, S: Sharing<'brand> = Atomic> {
    nodes: usize,
    words: Box<[S::Word32]>,
}

impl<'brand, S: Sharing<'brand>> TwiceSet<'brand, S> {
    /// Creates a set tracking `nodes` nodes, all unseen.
    pub fn new(nodes: usize) -> Self {
        let words = (0..nodes.div_ceil(NODES_PER_WORD))
            .map(|_| S::Word32::zeroed())
            .collect();
        Self { nodes, words }
    }

    /// Number of nodes tracked.
    #[inline]
    pub fn len_nodes(&self) -> usize {
        self.nodes
    }

    /// Records one more sighting of `node`.
    ///
    /// # Panics
    /// Panics if `node >= len_nodes()`.
    #[inline]
    pub fn mark(&self, node: usize) {
        assert!(node < self.nodes, "node {node} outside bitmap of {} nodes", self.nodes);
        let (word, once) = word_bit(node);
        let w = &self.words[word];
        if w.fetch_or(once) & once != 0 {
            w.fetch_or(once << 1);
        }
    }

    /// Returns `true` once `node` has been marked at least twice.
    ///
    /// # Panics
    /// Panics if `node >= len_nodes()`.
    #[inline]
    pub fn is_nonleaf(&self, node: usize) -> bool {
        self.sightings(node) == 2
    }

    /// Returns 0, 1 or 2: the saturated number of sightings of `node`.
    ///
    /// # Panics
    /// Panics if `node >= len_nodes()`.
    #[inline]
    pub fn sightings(&self, node: usize) -> u8 {
        assert!(node < self.nodes, "node {node} outside bitmap of {} nodes", self.nodes);
        let (word, once) = word_bit(node);
        let bits = self.words[word].load();
        if bits & (once << 1) != 0 {
            2
        } else {
            u8::from(bits & once != 0)
        }
    }

    /// Number of nodes seen at least twice.
    pub fn count_nonleaf(&self) -> usize {
        self.words
            .iter()
            .map(|w| (w.load() & HIGH_BITS).count_ones() as usize)
            .sum()
    }

    /// Number of nodes seen at least once.
    pub fn count_seen(&self) -> usize {
        self.words
            .iter()
            .map(|w| {
                let bits = w.load();
                ((bits | (bits >> 1)) & LOW_BITS).count_ones() as usize
            })
            .sum()
    }

    /// Clears every node back to unseen.
    pub fn reset(&self) {
        for w in self.words.iter() {
            w.store(0);
        }
    }
}

#[inline(always)]
fn word_bit(node: usize) -> (usize, u32) {
    (node / NODES_PER_WORD, 1u32 << (2 * (node % NODES_PER_WORD)))
}
