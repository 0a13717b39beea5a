//! Recovering a cycle from the adjacency table.
//!
//! For proofs longer than two the adjacency table holds both directions of
//! every surviving edge. A cycle through `(u, v)` is a simple path of
//! `proof_size - 1` edges from `v` back to `u`. Neighbours are tried in
//! ascending key order, so the path found for a given table content does not
//! depend on slot layout. Each search visits at most `budget` nodes.

use serde::{Deserialize, Serialize};

use crate::collections::AdjacencyTable;
use crate::concurrency::atomic::Sharing;
use crate::graph::Edge;

/// A closed walk, as the edge pairs it is made of.
///
/// A 2-cycle is the same edge twice: two nonces generating one edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    /// The cycle's edges, closing edge last.
    pub edges: Vec<Edge>,
}

impl Cycle {
    /// The 2-cycle formed by two copies of `edge`.
    pub fn doubled(edge: Edge) -> Self {
        Self { edges: vec![edge, edge] }
    }

    /// Builds the cycle made of `path` (node keys from `closing.v` round to
    /// `closing.u`) and the closing edge.
    ///
    /// Returns `None` if two consecutive keys sit on the same side.
    pub fn from_path(path: &[u32], closing: Edge) -> Option<Self> {
        let mut edges = path
            .windows(2)
            .map(|pair| Edge::from_keys(pair[0], pair[1]))
            .collect::<Option<Vec<_>>>()?;
        edges.push(closing);
        Some(Self { edges })
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the cycle has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Restricts the first hop of a search to u-nodes `u` with
/// `u % count == index`, splitting one search across several rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    /// Which slice this search covers.
    pub index: usize,
    /// Total number of slices.
    pub count: usize,
}

impl Slice {
    #[inline]
    fn admits(self, key: u32) -> bool {
        (key >> 1) as usize % self.count == self.index
    }
}

/// Finds a simple path of `proof_size - 1` edges from `edge.v` to `edge.u`,
/// visiting at most `budget` nodes.
///
/// Returns the node keys along the path, both ends included.
pub fn closing_path<'brand, S: Sharing<'brand>>(
    table: &AdjacencyTable<'brand, S>,
    edge: Edge,
    proof_size: usize,
    slice: Option<Slice>,
    budget: usize,
) -> Option<Vec<u32>> {
    if proof_size < 2 {
        return None;
    }
    let mut path = Vec::with_capacity(proof_size);
    path.push(edge.v_key());
    let mut budget = budget;
    extend(table, &mut path, edge.u_key(), proof_size - 1, slice, &mut budget).then_some(path)
}

fn extend<'brand, S: Sharing<'brand>>(
    table: &AdjacencyTable<'brand, S>,
    path: &mut Vec<u32>,
    target: u32,
    remaining: usize,
    slice: Option<Slice>,
    budget: &mut usize,
) -> bool {
    if *budget == 0 {
        return false;
    }
    *budget -= 1;
    let Some(&here) = path.last() else {
        return false;
    };
    let mut neighbours: Vec<u32> = table.values(here).collect();
    neighbours.sort_unstable();
    neighbours.dedup();

    for next in neighbours {
        if remaining == 1 {
            if next == target {
                path.push(next);
                return true;
            }
            continue;
        }
        if next == target || path.contains(&next) {
            continue;
        }
        if path.len() == 1 && slice.is_some_and(|s| !s.admits(next)) {
            continue;
        }
        path.push(next);
        if extend(table, path, target, remaining - 1, None, budget) {
            return true;
        }
        path.pop();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concurrency::atomic::Plain;

    fn both_ways(table: &AdjacencyTable<'_, Plain>, edges: &[Edge]) {
        for e in edges {
            table.insert(e.u_key(), e.v_key());
            table.insert(e.v_key(), e.u_key());
        }
    }

    #[test]
    fn finds_square_through_each_edge() {
        let table = AdjacencyTable::<Plain>::new(64);
        let square = [Edge::new(1, 1), Edge::new(2, 1), Edge::new(2, 2), Edge::new(1, 2)];
        both_ways(&table, &square);
        both_ways(&table, &[Edge::new(9, 2)]);

        let closing = Edge::new(1, 2);
        let path = closing_path(&table, closing, 4, None, usize::MAX).unwrap();
        assert_eq!(path, vec![closing.v_key(), Edge::new(2, 2).u_key(), Edge::new(2, 1).v_key(), closing.u_key()]);

        let cycle = Cycle::from_path(&path, closing).unwrap();
        let mut edges = cycle.edges.clone();
        edges.sort();
        let mut expected = square.to_vec();
        expected.sort();
        assert_eq!(edges, expected);
        assert!(closing_path(&table, closing, 6, None, usize::MAX).is_none());
    }

    #[test]
    fn slices_partition_first_hops() {
        let table = AdjacencyTable::<Plain>::new(64);
        both_ways(&table, &[Edge::new(1, 1), Edge::new(2, 1), Edge::new(2, 2), Edge::new(1, 2)]);
        let closing = Edge::new(1, 2);
        // The only first hop is u-node 2.
        let hits: Vec<usize> = (0..3)
            .filter(|&index| {
                closing_path(&table, closing, 4, Some(Slice { index, count: 3 }), usize::MAX).is_some()
            })
            .collect();
        assert_eq!(hits, vec![2]);
    }

    #[test]
    fn dangling_path_is_not_a_cycle() {
        let table = AdjacencyTable::<Plain>::new(64);
        both_ways(&table, &[Edge::new(1, 1), Edge::new(2, 1), Edge::new(2, 2)]);
        assert!(closing_path(&table, Edge::new(1, 1), 4, None, usize::MAX).is_none());
        assert_eq!(Cycle::from_path(&[2, 4], Edge::new(0, 0)), None);
    }

    #[test]
    fn budget_bounds_the_search() {
        let table = AdjacencyTable::<Plain>::new(64);
        let square = [Edge::new(1, 1), Edge::new(2, 1), Edge::new(2, 2), Edge::new(1, 2)];
        both_ways(&table, &square);
        let closing = Edge::new(1, 2);
        // Expands v2, u2 and v1 before reaching u1.
        assert!(closing_path(&table, closing, 4, None, 2).is_none());
        assert!(closing_path(&table, closing, 4, None, 3).is_some());
    }
}
