//! Edges, node sides, and the edge generator contract.

use serde::{Deserialize, Serialize};

/// One edge of the bipartite graph: a u-node and a v-node index, both in
/// `[0, HALFSIZE)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Left-side endpoint.
    pub u: u32,
    /// Right-side endpoint.
    pub v: u32,
}

impl Edge {
    /// Creates an edge.
    #[inline(always)]
    pub const fn new(u: u32, v: u32) -> Self {
        Self { u, v }
    }

    /// Parity-tagged key of the u endpoint.
    #[inline(always)]
    pub const fn u_key(self) -> u32 {
        node_key(Side::U, self.u)
    }

    /// Parity-tagged key of the v endpoint.
    #[inline(always)]
    pub const fn v_key(self) -> u32 {
        node_key(Side::V, self.v)
    }

    /// Rebuilds an edge from two node keys on opposite sides, in either order.
    ///
    /// Returns `None` if both keys are on the same side.
    pub const fn from_keys(a: u32, b: u32) -> Option<Self> {
        match (split_key(a), split_key(b)) {
            ((Side::U, u), (Side::V, v)) | ((Side::V, v), (Side::U, u)) => Some(Self { u, v }),
            _ => None,
        }
    }
}

/// Which half of the bipartite graph a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Left half; keys are even.
    U,
    /// Right half; keys are odd.
    V,
}

/// Encodes a node index as a key unique across both sides.
#[inline(always)]
pub const fn node_key(side: Side, index: u32) -> u32 {
    match side {
        Side::U => index << 1,
        Side::V => (index << 1) | 1,
    }
}

/// Splits a node key back into side and index.
#[inline(always)]
pub const fn split_key(key: u32) -> (Side, u32) {
    let side = if key & 1 == 0 { Side::U } else { Side::V };
    (side, key >> 1)
}

/// A keyed, deterministic map from nonce to edge.
///
/// Implementations must be pure: the same generator and nonce always yield the
/// same edge, so a verifier can replay any proof independently of the solver.
/// Every worker of an attempt calls the same generator concurrently.
pub trait EdgeGenerator: Sync {
    /// Binary logarithm of the number of edges (and of nodes per side).
    fn edge_bits(&self) -> u32;

    /// The edge produced by `nonce`, for `nonce < half_size()`.
    fn edge(&self, nonce: u32) -> Edge;

    /// Only the u endpoint of `nonce`'s edge.
    ///
    /// Override when the u endpoint is cheaper than the whole edge.
    #[inline]
    fn u_node(&self, nonce: u32) -> u32 {
        self.edge(nonce).u
    }

    /// Number of edges, and of nodes on each side.
    #[inline]
    fn half_size(&self) -> u32 {
        1 << self.edge_bits()
    }
}

impl<G: EdgeGenerator + ?Sized> EdgeGenerator for &G {
    #[inline]
    fn edge_bits(&self) -> u32 {
        (**self).edge_bits()
    }

    #[inline]
    fn edge(&self, nonce: u32) -> Edge {
        (**self).edge(nonce)
    }

    #[inline]
    fn u_node(&self, nonce: u32) -> u32 {
        (**self).u_node(nonce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_separate_sides() {
        let e = Edge::new(7, 7);
        assert_ne!(e.u_key(), e.v_key());
        assert_eq!(split_key(e.u_key()), (Side::U, 7));
        assert_eq!(split_key(e.v_key()), (Side::V, 7));
        assert_eq!(Edge::from_keys(e.v_key(), e.u_key()), Some(e));
        assert_eq!(Edge::from_keys(e.u_key(), e.u_key()), None);
        assert_eq!(Edge::new(0, 0).u_key(), 0);
    }
}
