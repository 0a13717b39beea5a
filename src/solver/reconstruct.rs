//! Matching a cycle's edges back to the nonces that generate them.
//!
//! The table only stores endpoints, so the proof comes from a full rescan of
//! the nonce range: every nonce whose edge is still owed by the cycle is taken,
//! in ascending order, until the cycle is paid off.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CuckooError, Result};
use crate::graph::{Edge, EdgeGenerator};

use super::cycle::Cycle;

/// A solution: ascending nonces whose edges form a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Proof {
    /// Edge indices, strictly ascending.
    pub nonces: Vec<u32>,
}

impl fmt::Display for Proof {
    /// Hex nonces separated by single spaces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, nonce) in self.nonces.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{nonce:x}")?;
        }
        Ok(())
    }
}

/// Scans every nonce for the edges of `cycle`.
///
/// Each edge is owed as many times as it occurs in the cycle.
pub fn recover<G: EdgeGenerator + ?Sized>(generator: &G, cycle: &Cycle) -> Result<Proof> {
    let mut owed: HashMap<Edge, usize> = HashMap::with_capacity(cycle.len());
    for &edge in &cycle.edges {
        *owed.entry(edge).or_insert(0) += 1;
    }
    let wanted: HashSet<Edge> = owed.keys().copied().collect();
    let expected = cycle.len();
    let mut nonces = Vec::with_capacity(expected);

    for nonce in matching_nonces(generator, &wanted) {
        let edge = generator.edge(nonce);
        if let Some(count) = owed.get_mut(&edge).filter(|c| **c > 0) {
            *count -= 1;
            nonces.push(nonce);
            if nonces.len() == expected {
                return Ok(Proof { nonces });
            }
        }
    }
    Err(CuckooError::Reconstruction { found: nonces.len(), expected })
}

#[cfg(not(feature = "parallel"))]
fn matching_nonces<'a, G: EdgeGenerator + ?Sized>(
    generator: &'a G,
    wanted: &'a HashSet<Edge>,
) -> impl Iterator<Item = u32> + 'a {
    (0..generator.half_size()).filter(move |&nonce| wanted.contains(&generator.edge(nonce)))
}

#[cfg(feature = "parallel")]
fn matching_nonces<G: EdgeGenerator + ?Sized>(
    generator: &G,
    wanted: &HashSet<Edge>,
) -> impl Iterator<Item = u32> {
    use rayon::prelude::*;

    // Indexed collect keeps ascending nonce order.
    let hits: Vec<u32> = (0..generator.half_size())
        .into_par_iter()
        .filter(|&nonce| wanted.contains(&generator.edge(nonce)))
        .collect();
    hits.into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Listed(Vec<Edge>);

    impl EdgeGenerator for Listed {
        fn edge_bits(&self) -> u32 {
            3
        }

        fn edge(&self, nonce: u32) -> Edge {
            self.0[nonce as usize]
        }
    }

    fn graph() -> Listed {
        Listed(vec![
            Edge::new(0, 0),
            Edge::new(4, 4),
            Edge::new(1, 1),
            Edge::new(4, 4),
            Edge::new(2, 1),
            Edge::new(4, 4),
            Edge::new(2, 0),
            Edge::new(1, 0),
        ])
    }

    #[test]
    fn takes_lowest_nonces_for_repeated_edges() {
        let proof = recover(&graph(), &Cycle::doubled(Edge::new(4, 4))).unwrap();
        assert_eq!(proof.nonces, vec![1, 3]);
        assert_eq!(proof.to_string(), "1 3");
    }

    #[test]
    fn recovers_distinct_edges_in_nonce_order() {
        let cycle = Cycle {
            edges: vec![Edge::new(1, 0), Edge::new(2, 0), Edge::new(2, 1), Edge::new(1, 1)],
        };
        let proof = recover(&graph(), &cycle).unwrap();
        assert_eq!(proof.nonces, vec![2, 4, 6, 7]);
    }

    #[test]
    fn missing_edge_is_a_reconstruction_error() {
        let cycle = Cycle { edges: vec![Edge::new(0, 0), Edge::new(7, 7)] };
        match recover(&graph(), &cycle) {
            Err(CuckooError::Reconstruction { found: 1, expected: 2 }) => {}
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn displays_hex() {
        let proof = Proof { nonces: vec![10, 255, 4096] };
        assert_eq!(proof.to_string(), "a ff 1000");
    }
}
