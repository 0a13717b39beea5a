//! Solver parameters.
//!
//! Everything here is fixed for the lifetime of one solving attempt and is
//! validated before any worker starts.

use serde::{Deserialize, Serialize};

use crate::collections::ancestry::MAX_NODE_KEY;
use crate::error::ConfigError;

/// Default proof length: the smallest cycle a bipartite graph admits.
pub const PROOFSIZE: usize = 2;

/// Default binary logarithm of the edge count.
pub const EDGEBITS: u32 = 20;

/// Default ancestry table capacity, in slots.
pub const CUCKOO_SIZE: usize = 5 << 16;

/// Default adjacency table capacity, in slots.
pub const ADJACENCY_SIZE: usize = 5 << 18;

/// Default number of nodes one closing-path search may visit.
pub const PATH_BUDGET: usize = 1 << 10;

/// Largest supported `edge_bits`: a parity-tagged node key must fit a table slot.
pub const MAX_EDGE_BITS: u32 = MAX_NODE_KEY.count_ones() - 1;

/// Parameters of one solving attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// The graph has `2^edge_bits` edges and as many nodes per side.
    pub edge_bits: u32,
    /// Worker threads sweeping each partition together.
    pub threads: usize,
    /// Number of u-node partitions; a power of two.
    pub partitions: u32,
    /// Cycle length to search for; even, at least 2.
    ///
    /// Beyond 2 every surviving edge runs a depth-first search whose cost
    /// grows as the mean degree to the power `proof_size - 1`. `path_budget`
    /// caps each search, so once that power exceeds the budget some cycles
    /// are no longer found.
    pub proof_size: usize,
    /// Run only `proof_size / 2` construction rounds per partition.
    pub minimal_bfs: bool,
    /// Ancestry table slots.
    pub table_capacity: usize,
    /// Adjacency table slots.
    pub adjacency_capacity: usize,
    /// Nodes one closing-path search may visit before giving up on that edge.
    pub path_budget: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            edge_bits: EDGEBITS,
            threads: 1,
            partitions: 1,
            proof_size: PROOFSIZE,
            minimal_bfs: false,
            table_capacity: CUCKOO_SIZE,
            adjacency_capacity: ADJACENCY_SIZE,
            path_budget: PATH_BUDGET,
        }
    }
}

impl SolverConfig {
    /// Rejects parameter combinations the sweep cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        if !(1..=MAX_EDGE_BITS).contains(&self.edge_bits) {
            return Err(ConfigError::EdgeBits(self.edge_bits));
        }
        if self.proof_size < 2 || self.proof_size % 2 != 0 {
            return Err(ConfigError::ProofSize(self.proof_size));
        }
        if !self.partitions.is_power_of_two() {
            return Err(ConfigError::Partitions(self.partitions));
        }
        if self.partitions > self.half_size() {
            return Err(ConfigError::TooManyPartitions {
                partitions: self.partitions,
                half_size: self.half_size(),
            });
        }
        if self.table_capacity == 0 || u32::try_from(self.table_capacity).is_err() {
            return Err(ConfigError::TableCapacity(self.table_capacity));
        }
        if self.adjacency_capacity == 0 || u32::try_from(self.adjacency_capacity).is_err() {
            return Err(ConfigError::AdjacencyCapacity(self.adjacency_capacity));
        }
        if self.path_budget == 0 {
            return Err(ConfigError::PathBudget);
        }
        Ok(())
    }

    /// Number of edges, and of nodes per side.
    #[inline]
    pub fn half_size(&self) -> u32 {
        1 << self.edge_bits
    }

    /// `log2(partitions)`.
    #[inline]
    pub fn partition_bits(&self) -> u32 {
        self.partitions.trailing_zeros()
    }

    /// u-nodes per partition.
    #[inline]
    pub fn partition_size(&self) -> usize {
        (self.half_size() >> self.partition_bits()) as usize
    }

    /// Construction rounds per partition.
    #[inline]
    pub fn rounds(&self) -> usize {
        if self.minimal_bfs {
            self.proof_size / 2
        } else {
            self.proof_size
        }
    }
}
