//! SipHash-2-4 edge generator.
//!
//! Keys come from the first 16 bytes of SHA-256 over the header. A node is
//! `siphash24(2 * nonce + side) & (HALFSIZE - 1)`, the single-word SipHash
//! variant of the classical cuckoo miner (no length byte is mixed in).

use sha2::{Digest, Sha256};

use super::edge::{Edge, EdgeGenerator};

/// The two 64-bit SipHash keys derived from a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SipKeys {
    /// First key word.
    pub k0: u64,
    /// Second key word.
    pub k1: u64,
}

impl SipKeys {
    /// Derives keys from arbitrary header bytes.
    pub fn from_header(header: &[u8]) -> Self {
        let digest = Sha256::digest(header);
        let mut k0 = [0u8; 8];
        let mut k1 = [0u8; 8];
        k0.copy_from_slice(&digest[..8]);
        k1.copy_from_slice(&digest[8..16]);
        Self {
            k0: u64::from_le_bytes(k0),
            k1: u64::from_le_bytes(k1),
        }
    }

    /// SipHash-2-4 of a single 64-bit word.
    #[inline]
    pub fn siphash24(&self, word: u64) -> u64 {
        let mut s = SipState {
            v0: self.k0 ^ 0x736f_6d65_7073_6575,
            v1: self.k1 ^ 0x646f_7261_6e64_6f6d,
            v2: self.k0 ^ 0x6c79_6765_6e65_7261,
            v3: self.k1 ^ 0x7465_6462_7974_6573 ^ word,
        };
        s.round();
        s.round();
        s.v0 ^= word;
        s.v2 ^= 0xff;
        s.round();
        s.round();
        s.round();
        s.round();
        s.v0 ^ s.v1 ^ s.v2 ^ s.v3
    }
}

struct SipState {
    v0: u64,
    v1: u64,
    v2: u64,
    v3: u64,
}

impl SipState {
    #[inline(always)]
    fn round(&mut self) {
        self.v0 = self.v0.wrapping_add(self.v1);
        self.v2 = self.v2.wrapping_add(self.v3);
        self.v1 = self.v1.rotate_left(13);
        self.v3 = self.v3.rotate_left(16);
        self.v1 ^= self.v0;
        self.v3 ^= self.v2;
        self.v0 = self.v0.rotate_left(32);
        self.v2 = self.v2.wrapping_add(self.v1);
        self.v0 = self.v0.wrapping_add(self.v3);
        self.v1 = self.v1.rotate_left(17);
        self.v3 = self.v3.rotate_left(21);
        self.v1 ^= self.v2;
        self.v3 ^= self.v0;
        self.v2 = self.v2.rotate_left(32);
    }
}

/// Header-keyed edge generator over `2^edge_bits` edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SipEdges {
    keys: SipKeys,
    edge_bits: u32,
}

impl SipEdges {
    /// Creates a generator from explicit keys.
    ///
    /// # Panics
    /// Panics if `edge_bits` is not in `1..=31`.
    pub fn new(keys: SipKeys, edge_bits: u32) -> Self {
        assert!((1..=31).contains(&edge_bits), "edge bits {edge_bits} out of range");
        Self { keys, edge_bits }
    }

    /// Creates a generator keyed by `header`.
    ///
    /// # Panics
    /// Panics if `edge_bits` is not in `1..=31`.
    pub fn from_header(header: &[u8], edge_bits: u32) -> Self {
        Self::new(SipKeys::from_header(header), edge_bits)
    }

    /// The generator's keys.
    pub fn keys(&self) -> SipKeys {
        self.keys
    }

    #[inline(always)]
    fn node(&self, nonce: u32, side: u64) -> u32 {
        let mask = (1u64 << self.edge_bits) - 1;
        (self.keys.siphash24(2 * u64::from(nonce) + side) & mask) as u32
    }
}

impl EdgeGenerator for SipEdges {
    #[inline]
    fn edge_bits(&self) -> u32 {
        self.edge_bits
    }

    #[inline]
    fn edge(&self, nonce: u32) -> Edge {
        Edge::new(self.node(nonce, 0), self.node(nonce, 1))
    }

    #[inline]
    fn u_node(&self, nonce: u32) -> u32 {
        self.node(nonce, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_deterministic_and_in_range() {
        let a = SipEdges::from_header(b"deterministic", 12);
        let b = SipEdges::from_header(b"deterministic", 12);
        for nonce in 0..a.half_size() {
            let e = a.edge(nonce);
            assert_eq!(e, b.edge(nonce));
            assert_eq!(e.u, a.u_node(nonce));
            assert!(e.u < 1 << 12 && e.v < 1 << 12);
        }
    }

    #[test]
    fn headers_key_distinct_graphs() {
        let a = SipEdges::from_header(b"header-a", 16);
        let b = SipEdges::from_header(b"header-b", 16);
        assert_ne!(a.keys(), b.keys());
        let differing = (0..64).filter(|&n| a.edge(n) != b.edge(n)).count();
        assert!(differing > 60);
    }

    #[test]
    fn siphash_mixes_every_input_bit() {
        let keys = SipKeys { k0: 0x0706_0504_0302_0100, k1: 0x0f0e_0d0c_0b0a_0908 };
        let base = keys.siphash24(0);
        for bit in 0..64 {
            let flipped = keys.siphash24(1 << bit);
            // A single flipped input bit changes roughly half the output bits.
            let changed = (base ^ flipped).count_ones();
            assert!((8..=56).contains(&changed), "bit {bit} changed {changed} output bits");
        }
    }
}
