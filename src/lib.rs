//! # `cuckoo` - a memory-hard Cuckoo Cycle solver
//!
//! A header keys a SipHash-2-4 edge generator that defines a pseudo-random
//! bipartite graph with `2^edge_bits` edges. A proof of work is a short cycle
//! in that graph, given as the ascending list of nonces (edge indices) that
//! generate its edges. Finding one needs memory proportional to the graph;
//! checking one replays a handful of hashes.
//!
//! ## Search
//!
//! The u-side of the graph is split into power-of-two partitions. For each
//! partition every worker thread:
//!
//! 1. marks u-nodes in a 2-bit [`TwiceSet`], discarding leaves (nodes with one
//!    edge, which cannot lie on a cycle);
//! 2. records the surviving edges in the open-addressed [`AncestryTable`]
//!    (latest v-node per u-node) and [`AdjacencyTable`] (every edge), and
//!    looks for a cycle closing through them;
//! 3. clears the structures before the next partition.
//!
//! Phases are separated by a [`GhostBarrier`]. The shared state of one attempt
//! lives in a [`SearchContext`] branded by a [`GhostToken`], so structures of
//! different attempts can never be mixed up.
//!
//! ## Example
//!
//! ```rust
//! use cuckoo::{solve, verify, Outcome, SipEdges, SolverConfig};
//!
//! let config = SolverConfig { edge_bits: 12, threads: 2, partitions: 4, ..SolverConfig::default() };
//! let generator = SipEdges::from_header(b"example header", config.edge_bits);
//!
//! match solve(generator, config).unwrap() {
//!     Outcome::Solved(proof) => {
//!         assert!(verify(&proof.nonces, config.proof_size, &generator).is_ok());
//!     }
//!     Outcome::NoSolution => {}
//! }
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]

pub mod collections;
pub mod concurrency;
pub mod error;
pub mod graph;
pub mod solver;
pub mod token;

pub use collections::{AdjacencyTable, AncestryTable, InsertOutcome, TwiceSet};
pub use concurrency::atomic::{Atomic, Plain, Sharing};
pub use concurrency::sync::{BarrierPoisoned, GhostBarrier};
pub use error::{ConfigError, CuckooError, Result, VerifyError};
pub use graph::{verify, Edge, EdgeGenerator, SipEdges, SipKeys};
pub use solver::{solve, solve_serial, Outcome, Proof, SearchContext, SolverConfig};
pub use token::GhostToken;

// Compile-time assertions for memory layout
const _: () = {
    use core::mem;

    use crate::concurrency::atomic::{GhostAtomicU32, GhostAtomicU64, GhostPlainCell};

    // Tokens are ZSTs.
    assert!(mem::size_of::<GhostToken<'static>>() == 0);

    // Branded words are exactly as wide as the integers they hold.
    assert!(mem::size_of::<GhostAtomicU32<'static>>() == mem::size_of::<u32>());
    assert!(mem::size_of::<GhostAtomicU64<'static>>() == mem::size_of::<u64>());
    assert!(mem::size_of::<GhostPlainCell<'static, u64>>() == mem::size_of::<u64>());

    // A table slot is one machine word.
    assert!(mem::size_of::<<Atomic as Sharing<'static>>::Word64>() == 8);
};
