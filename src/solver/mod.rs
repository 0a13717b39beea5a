//! The partitioned cycle search.
//!
//! [`solve`] builds a [`SearchContext`] under a fresh brand, runs the sweep on
//! `threads` scoped workers, and turns the cycle they agreed on into a
//! verified [`Proof`]. [`solve_serial`] does the same on the calling thread,
//! over either sharing policy.

pub mod config;
pub mod context;
pub mod cycle;
pub mod reconstruct;
mod worker;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::concurrency::atomic::{Atomic, Sharing};
use crate::concurrency::scoped::spawn_workers;
use crate::error::{ConfigError, CuckooError, Result};
use crate::graph::{verify, EdgeGenerator};
use crate::GhostToken;

pub use config::{SolverConfig, ADJACENCY_SIZE, CUCKOO_SIZE, EDGEBITS, PATH_BUDGET, PROOFSIZE};
pub use context::{Partitioning, SearchContext};
pub use cycle::{closing_path, Cycle, Slice};
pub use reconstruct::{recover, Proof};

/// Result of one solving attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// A verified cycle.
    Solved(Proof),
    /// Every partition was swept without finding a cycle. Retry with another key.
    NoSolution,
}

impl Outcome {
    /// Whether a proof was found.
    pub fn is_solved(&self) -> bool {
        matches!(self, Outcome::Solved(_))
    }

    /// The proof, if one was found.
    pub fn proof(&self) -> Option<&Proof> {
        match self {
            Outcome::Solved(proof) => Some(proof),
            Outcome::NoSolution => None,
        }
    }
}

/// Searches the graph of `generator` for a cycle with `config.threads` workers.
pub fn solve<G: EdgeGenerator>(generator: G, config: SolverConfig) -> Result<Outcome> {
    GhostToken::new(|token| {
        let ctx = SearchContext::<G, Atomic>::new(generator, config, &token)?;
        run(&ctx, &token)
    })
}

/// Runs the sweep over an existing atomic context and finishes it.
pub fn run<'brand, G: EdgeGenerator>(
    ctx: &SearchContext<'brand, G, Atomic>,
    token: &GhostToken<'brand>,
) -> Result<Outcome> {
    let threads = ctx.config().threads;
    debug!(threads, partitions = ctx.config().partitions, "starting sweep");
    spawn_workers(token, threads, |t, id| worker::sweep(ctx, t, id))
        .into_iter()
        .collect::<core::result::Result<Vec<()>, _>>()?;
    finish(ctx)
}

/// Searches on the calling thread, over sharing policy `S`.
///
/// `config.threads` must be 1.
pub fn solve_serial<S, G>(generator: G, config: SolverConfig) -> Result<Outcome>
where
    S: for<'brand> Sharing<'brand>,
    G: EdgeGenerator,
{
    if config.threads != 1 {
        return Err(ConfigError::SerialThreads(config.threads).into());
    }
    GhostToken::new(|token| {
        let ctx = SearchContext::<G, S>::new(generator, config, &token)?;
        worker::sweep(&ctx, &token, 0)?;
        finish(&ctx)
    })
}

/// Turns the candidate left by a finished sweep into a verified proof.
///
/// Must run after every worker has returned.
///
/// # Errors
/// [`CuckooError::EdgeOutOfRange`] if the generator strayed outside the
/// graph, otherwise any failure to recover or verify the detected cycle.
pub fn finish<'brand, G, S>(ctx: &SearchContext<'brand, G, S>) -> Result<Outcome>
where
    G: EdgeGenerator,
    S: Sharing<'brand>,
{
    if let Some(nonce) = ctx.fault() {
        return Err(CuckooError::EdgeOutOfRange {
            nonce,
            edge: ctx.generator().edge(nonce),
            half_size: ctx.generator().half_size(),
        });
    }
    let Some(edge) = ctx.candidate() else {
        info!("no cycle found");
        return Ok(Outcome::NoSolution);
    };
    let proof_size = ctx.config().proof_size;
    let cycle = if proof_size == 2 {
        Cycle::doubled(edge)
    } else {
        closing_path(ctx.adjacency(), edge, proof_size, None, usize::MAX)
            .and_then(|path| Cycle::from_path(&path, edge))
            .ok_or(CuckooError::Reconstruction { found: 0, expected: proof_size })?
    };
    let proof = recover(ctx.generator(), &cycle)?;
    verify(&proof.nonces, proof_size, ctx.generator())?;
    info!(%proof, "solution");
    Ok(Outcome::Solved(proof))
}
