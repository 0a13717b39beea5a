//! `SearchContext` - the state one solving attempt shares between its workers.
//!
//! Fixed for the run: the edge generator, the configuration, the partition
//! geometry and the barrier. Reset every partition: the occupancy bitmap, the
//! ancestry table and the adjacency table. Set once a cycle is found: the
//! candidate slot, which also tells every worker to stop. Set once the
//! generator misbehaves: the fault slot, which ends the attempt.

use crate::collections::{AdjacencyTable, AncestryTable, TwiceSet};
use crate::concurrency::atomic::{Atomic, GhostWord, Sharing};
use crate::concurrency::sync::GhostBarrier;
use crate::concurrency::CachePadded;
use crate::error::ConfigError;
use crate::graph::{Edge, EdgeGenerator};
use crate::GhostToken;

use super::config::SolverConfig;

const NO_CANDIDATE: u64 = u64::MAX;
const NO_FAULT: u64 = u64::MAX;

/// How u-nodes map onto partitions: the low bits pick the partition, the
/// remaining bits index into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partitioning {
    bits: u32,
    mask: u32,
}

impl Partitioning {
    /// Geometry for `partitions` partitions, a power of two.
    pub const fn new(partitions: u32) -> Self {
        Self {
            bits: partitions.trailing_zeros(),
            mask: partitions.wrapping_sub(1),
        }
    }

    /// Partition holding u-node `u`.
    #[inline(always)]
    pub const fn of(self, u: u32) -> u32 {
        u & self.mask
    }

    /// Index of `u` inside its partition.
    #[inline(always)]
    pub const fn local(self, u: u32) -> usize {
        (u >> self.bits) as usize
    }
}

/// Shared state of one solving attempt, branded by `'brand`.
///
/// Workers hold `&SearchContext`; every mutation goes through the atomic (or,
/// for single-threaded runs, plain) words of the bitmap, the tables and the
/// candidate and fault slots.
pub struct SearchContext<'brand, G, S: Sharing<'brand> = Atomic> {
    generator: G,
    config: SolverConfig,
    partitioning: Partitioning,
    pub(crate) nonleaf: TwiceSet<'brand, S>,
    pub(crate) ancestry: AncestryTable<'brand, S>,
    pub(crate) adjacency: AdjacencyTable<'brand, S>,
    pub(crate) barrier: GhostBarrier<'brand>,
    candidate: CachePadded<S::Word64>,
    fault: CachePadded<S::Word64>,
}

impl<'brand, G: EdgeGenerator, S: Sharing<'brand>> SearchContext<'brand, G, S> {
    /// Validates `config` against itself and the generator, then allocates
    /// the bitmap and the tables.
    pub fn new(
        generator: G,
        config: SolverConfig,
        _token: &GhostToken<'brand>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if generator.edge_bits() != config.edge_bits {
            return Err(ConfigError::EdgeBitsMismatch {
                generator: generator.edge_bits(),
                config: config.edge_bits,
            });
        }
        let candidate = S::Word64::zeroed();
        candidate.store(NO_CANDIDATE);
        let fault = S::Word64::zeroed();
        fault.store(NO_FAULT);
        Ok(Self {
            generator,
            config,
            partitioning: Partitioning::new(config.partitions),
            nonleaf: TwiceSet::new(config.partition_size()),
            ancestry: AncestryTable::new(config.table_capacity),
            adjacency: AdjacencyTable::new(config.adjacency_capacity),
            barrier: GhostBarrier::new(config.threads),
            candidate: CachePadded::new(candidate),
            fault: CachePadded::new(fault),
        })
    }

    /// The edge generator.
    #[inline]
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// The validated configuration.
    #[inline]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Partition geometry.
    #[inline]
    pub fn partitioning(&self) -> Partitioning {
        self.partitioning
    }

    /// The ancestry table, for inspection between runs.
    #[inline]
    pub fn ancestry(&self) -> &AncestryTable<'brand, S> {
        &self.ancestry
    }

    /// The adjacency table, for inspection between runs.
    #[inline]
    pub fn adjacency(&self) -> &AdjacencyTable<'brand, S> {
        &self.adjacency
    }

    /// The occupancy bitmap, for inspection between runs.
    #[inline]
    pub fn nonleaf(&self) -> &TwiceSet<'brand, S> {
        &self.nonleaf
    }

    /// The closing edge of the cycle found so far, if any.
    #[inline]
    pub fn candidate(&self) -> Option<Edge> {
        match self.candidate.load() {
            NO_CANDIDATE => None,
            packed => Some(Edge::new((packed >> 32) as u32, packed as u32)),
        }
    }

    /// The smallest nonce whose edge fell outside the graph, if any.
    #[inline]
    pub fn fault(&self) -> Option<u32> {
        match self.fault.load() {
            NO_FAULT => None,
            nonce => Some(nonce as u32),
        }
    }

    /// Whether either table has passed its high-water mark.
    #[inline]
    pub fn overloaded(&self) -> bool {
        self.ancestry.overloaded() || self.adjacency.overloaded()
    }

    /// Records that `nonce` produced an edge outside the graph.
    pub(crate) fn report_fault(&self, nonce: u32) {
        self.fault.fetch_min(u64::from(nonce));
    }

    /// Offers `edge` as the closing edge of a cycle. The smallest offer wins,
    /// whatever order the workers arrive in.
    pub(crate) fn offer(&self, edge: Edge) {
        self.candidate.fetch_min((u64::from(edge.u) << 32) | u64::from(edge.v));
    }

    /// Withdraws any offered cycle.
    pub(crate) fn withdraw(&self) {
        self.candidate.store(NO_CANDIDATE);
    }

    /// Empties the bitmap and the tables for the next partition.
    pub(crate) fn reset_partition(&self) {
        self.ancestry.clear();
        self.adjacency.clear();
        self.nonleaf.reset();
        self.withdraw();
    }
}
