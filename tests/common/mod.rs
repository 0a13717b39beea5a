#![allow(dead_code)]

use cuckoo::{Edge, EdgeGenerator};

/// Table-driven edges, for planting cycles at known nonces.
pub struct TableEdges {
    edge_bits: u32,
    edges: Vec<Edge>,
}

impl TableEdges {
    /// Every nonce `n` maps to `f(n)`.
    pub fn new(edge_bits: u32, f: impl Fn(u32) -> Edge) -> Self {
        let edges = (0..1u32 << edge_bits).map(f).collect();
        Self { edge_bits, edges }
    }

    /// Nonce `n` maps to `(n, n)`: every node is a leaf.
    pub fn identity(edge_bits: u32) -> Self {
        Self::new(edge_bits, |n| Edge::new(n, n))
    }

    pub fn set(&mut self, nonce: u32, edge: Edge) -> &mut Self {
        self.edges[nonce as usize] = edge;
        self
    }
}

impl EdgeGenerator for TableEdges {
    fn edge_bits(&self) -> u32 {
        self.edge_bits
    }

    fn edge(&self, nonce: u32) -> Edge {
        self.edges[nonce as usize]
    }
}

/// The graph of 2^10 identity edges with one planted 2-cycle at nonces 100
/// and 700, plus a busy non-leaf u-node 5 that closes no cycle.
pub fn planted_two_cycle() -> TableEdges {
    let mut g = TableEdges::identity(10);
    g.set(700, Edge::new(100, 100));
    for n in 200..300 {
        g.set(n, Edge::new(5, n));
    }
    g
}
