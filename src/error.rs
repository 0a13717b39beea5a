//! Error types.
//!
//! Failure classes that surface from the library:
//! - [`ConfigError`]: rejected before any worker starts;
//! - [`CuckooError::EdgeOutOfRange`]: the edge generator broke its contract;
//! - [`CuckooError::Reconstruction`]: a detected cycle whose nonces could not be
//!   recovered, which means a logic bug rather than bad luck;
//! - [`VerifyError`]: a proof that does not describe a cycle.
//!
//! "No solution" is not an error; see [`crate::solver::Outcome`].

use thiserror::Error;

use crate::concurrency::sync::BarrierPoisoned;
use crate::graph::Edge;

/// Invalid solver parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `threads == 0`.
    #[error("thread count must be at least 1")]
    ZeroThreads,
    /// Partition count is zero or not a power of two.
    #[error("partition count {0} must be a non-zero power of two")]
    Partitions(u32),
    /// More partitions than nodes on one side.
    #[error("{partitions} partitions exceed the {half_size} nodes per side")]
    TooManyPartitions {
        /// Requested partition count.
        partitions: u32,
        /// Nodes per side.
        half_size: u32,
    },
    /// Graph size outside what a table slot can encode.
    #[error("edge bits {0} outside 1..=30")]
    EdgeBits(u32),
    /// Proof length is odd or below two.
    #[error("proof size {0} must be even and at least 2")]
    ProofSize(usize),
    /// Ancestry table capacity is zero or exceeds `u32::MAX`.
    #[error("ancestry table capacity {0} outside 1..=u32::MAX")]
    TableCapacity(usize),
    /// Adjacency table capacity is zero or exceeds `u32::MAX`.
    #[error("adjacency table capacity {0} outside 1..=u32::MAX")]
    AdjacencyCapacity(usize),
    /// A closing-path search may not visit any node.
    #[error("path budget must be at least 1")]
    PathBudget,
    /// The edge generator and the configuration disagree on graph size.
    #[error("edge generator has {generator} edge bits but the configuration expects {config}")]
    EdgeBitsMismatch {
        /// Edge bits reported by the generator.
        generator: u32,
        /// Edge bits in the configuration.
        config: u32,
    },
    /// A serial solve was asked for more than one worker.
    #[error("serial solving runs one worker, {0} threads requested")]
    SerialThreads(usize),
}

/// Reasons a proof fails verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// Proof has the wrong number of nonces.
    #[error("proof has {found} nonces, expected {expected}")]
    WrongLength {
        /// Nonces supplied.
        found: usize,
        /// Proof length required.
        expected: usize,
    },
    /// A nonce lies outside the edge range.
    #[error("nonce {nonce:#x} is outside the {half_size} edges of the graph")]
    NonceTooBig {
        /// Offending nonce.
        nonce: u32,
        /// Number of edges.
        half_size: u32,
    },
    /// Nonces are not strictly ascending.
    #[error("nonce at position {index} is not above its predecessor")]
    NotAscending {
        /// Position of the offending nonce.
        index: usize,
    },
    /// A node is touched by more than two proof edges.
    #[error("proof edges branch at a node")]
    Branch,
    /// A node is touched by only one proof edge.
    #[error("proof edges dead-end at a node")]
    DeadEnd,
    /// The edges close a cycle shorter than the proof.
    #[error("proof edges close a cycle of length {length}")]
    ShortCycle {
        /// Length of the cycle through the first edge.
        length: usize,
    },
}

/// Errors returned by the solver.
#[derive(Debug, Error)]
pub enum CuckooError {
    /// Rejected configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A detected cycle could not be matched back to its nonces.
    #[error("cycle reconstruction recovered {found} of {expected} nonces")]
    Reconstruction {
        /// Nonces recovered by the full scan.
        found: usize,
        /// Proof length required.
        expected: usize,
    },
    /// A reconstructed proof failed independent verification.
    #[error("reconstructed proof does not verify: {0}")]
    Verify(#[from] VerifyError),
    /// The generator produced an endpoint outside `[0, half_size)`.
    #[error("nonce {nonce:#x} produced edge ({}, {}) outside {half_size} nodes per side", .edge.u, .edge.v)]
    EdgeOutOfRange {
        /// Smallest offending nonce.
        nonce: u32,
        /// The edge it produced.
        edge: Edge,
        /// Nodes per side.
        half_size: u32,
    },
    /// The worker pool stopped at a poisoned barrier.
    #[error(transparent)]
    Aborted(#[from] BarrierPoisoned),
}

/// Result alias for solver operations.
pub type Result<T, E = CuckooError> = core::result::Result<T, E>;
