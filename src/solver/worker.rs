//! The partitioned worker sweep.
//!
//! Every worker runs [`sweep`] with its own id; nonces are striped across
//! workers (`id, id + threads, ...`) so all of them cooperate on each
//! partition. Per partition:
//!
//! 1. mark every u-node of the partition once per incident edge;
//! 2. run the construction rounds over edges whose u-node is a non-leaf,
//!    inserting in round 0 and searching for cycles in every round;
//! 3. clear the bitmap and the tables.
//!
//! Round 0 records each surviving edge in the ancestry table, which keeps the
//! latest v-node per u-node and spots a repeated edge when its two nonces
//! arrive back to back, and in the adjacency table, which keeps every edge and
//! so finds the repeats and paths the ancestry table has overwritten.
//!
//! Each phase and each round ends at the barrier. After a round every worker
//! reads the same verdict from the quiescent tables, so they all stop, abandon
//! the partition, or carry on together. A worker that panics poisons the
//! barrier, which sends its peers home instead of leaving them waiting.

use tracing::{debug, error, info, warn};

use crate::collections::InsertOutcome;
use crate::concurrency::atomic::Sharing;
use crate::concurrency::sync::BarrierPoisoned;
use crate::graph::{Edge, EdgeGenerator};
use crate::GhostToken;

use super::context::SearchContext;
use super::cycle::{closing_path, Slice};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Continue,
    Found,
    Overloaded,
    Faulted,
}

/// Runs worker `id` over every partition until a cycle is found, the
/// generator misbehaves, or the partitions run out.
///
/// # Errors
/// [`BarrierPoisoned`] if a peer worker panicked.
pub(crate) fn sweep<'brand, G, S>(
    ctx: &SearchContext<'brand, G, S>,
    token: &GhostToken<'brand>,
    id: usize,
) -> Result<(), BarrierPoisoned>
where
    G: EdgeGenerator,
    S: Sharing<'brand>,
{
    let _poison = ctx.barrier.poison_on_unwind();
    let config = *ctx.config();
    let leader = id == 0;

    for part in 0..config.partitions {
        mark_nonleaves(ctx, id, part);
        ctx.barrier.wait(token)?;
        if leader {
            debug!(partition = part, nonleaf = ctx.nonleaf.count_nonleaf(), "leaves marked");
        }

        for round in 0..config.rounds() {
            construct(ctx, id, part, round);
            ctx.barrier.wait(token)?;
            let verdict = if ctx.fault().is_some() {
                Verdict::Faulted
            } else if ctx.overloaded() {
                Verdict::Overloaded
            } else if ctx.candidate().is_some() {
                Verdict::Found
            } else {
                Verdict::Continue
            };
            ctx.barrier.wait(token)?;

            match verdict {
                Verdict::Continue => {
                    if leader {
                        debug!(
                            partition = part,
                            round,
                            load = ctx.ancestry.load(),
                            adjacency_load = ctx.adjacency.load(),
                            "round done"
                        );
                    }
                }
                Verdict::Found => {
                    if leader {
                        info!(partition = part, round, edge = ?ctx.candidate(), "cycle found");
                    }
                    return Ok(());
                }
                Verdict::Overloaded => {
                    if leader {
                        warn!(
                            partition = part,
                            round,
                            load = ctx.ancestry.load(),
                            adjacency_load = ctx.adjacency.load(),
                            "table overloaded, abandoning partition; use more partitions"
                        );
                    }
                    break;
                }
                Verdict::Faulted => {
                    if leader {
                        error!(partition = part, nonce = ?ctx.fault(), "edge outside the graph, stopping");
                    }
                    return Ok(());
                }
            }
        }

        if leader {
            info!(partition = part, load = ctx.ancestry.load(), "partition swept");
            ctx.reset_partition();
        }
        ctx.barrier.wait(token)?;
    }
    Ok(())
}

fn stripe(threads: usize, half_size: u32, id: usize) -> impl Iterator<Item = u32> {
    (id as u32..half_size).step_by(threads)
}

fn mark_nonleaves<'brand, G, S>(ctx: &SearchContext<'brand, G, S>, id: usize, part: u32)
where
    G: EdgeGenerator,
    S: Sharing<'brand>,
{
    let partitioning = ctx.partitioning();
    let generator = ctx.generator();
    let half_size = generator.half_size();
    for nonce in stripe(ctx.config().threads, half_size, id) {
        let u = generator.u_node(nonce);
        if u >= half_size {
            ctx.report_fault(nonce);
        } else if partitioning.of(u) == part {
            ctx.nonleaf.mark(partitioning.local(u));
        }
    }
}

fn construct<'brand, G, S>(ctx: &SearchContext<'brand, G, S>, id: usize, part: u32, round: usize)
where
    G: EdgeGenerator,
    S: Sharing<'brand>,
{
    let partitioning = ctx.partitioning();
    let generator = ctx.generator();
    let half_size = generator.half_size();
    let config = ctx.config();
    let proof_size = config.proof_size;
    let slices = config.rounds().saturating_sub(1);

    for nonce in stripe(config.threads, half_size, id) {
        let u = generator.u_node(nonce);
        if u >= half_size
            || partitioning.of(u) != part
            || !ctx.nonleaf.is_nonleaf(partitioning.local(u))
        {
            continue;
        }
        let edge = generator.edge(nonce);
        if edge.v >= half_size {
            ctx.report_fault(nonce);
            continue;
        }
        if round == 0 {
            insert(ctx, edge, proof_size);
        } else if proof_size == 2 {
            if ctx.adjacency.multiplicity(edge.u_key(), edge.v_key()) >= 2 {
                ctx.offer(edge);
            }
        } else {
            let slice = Slice { index: round - 1, count: slices };
            let path = closing_path(&ctx.adjacency, edge, proof_size, Some(slice), config.path_budget);
            if path.is_some() {
                ctx.offer(edge);
            }
        }
    }
}

fn insert<'brand, G, S>(ctx: &SearchContext<'brand, G, S>, edge: Edge, proof_size: usize)
where
    G: EdgeGenerator,
    S: Sharing<'brand>,
{
    // u's current ancestry already pairs it with v: a second nonce produced
    // the same edge.
    let ancestry = ctx.ancestry.insert(edge.u_key(), edge.v_key());
    if ancestry == InsertOutcome::Duplicate && proof_size == 2 {
        ctx.offer(edge);
    }
    match ctx.adjacency.insert(edge.u_key(), edge.v_key()) {
        InsertOutcome::Duplicate if proof_size == 2 => ctx.offer(edge),
        // Overload is picked up at the end of the round.
        InsertOutcome::Full => return,
        _ => {}
    }
    if proof_size > 2 {
        ctx.adjacency.insert(edge.v_key(), edge.u_key());
    }
}
