use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cuckoo::{solve, verify, Outcome, SipEdges, SolverConfig};

#[derive(Parser)]
#[command(name = "cuckoo")]
#[command(about = "Cuckoo Cycle proof-of-work solver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for a cycle, retrying successive nonces on failure
    Solve {
        #[command(flatten)]
        graph: GraphArgs,

        /// Worker threads
        #[arg(short, long, env = "CUCKOO_THREADS", default_value_t = 1)]
        threads: usize,

        /// Node partitions (power of two); more partitions use less table space
        #[arg(short, long, env = "CUCKOO_PARTS", default_value_t = 1)]
        partitions: u32,

        /// Run half as many construction rounds
        #[arg(short, long, env = "CUCKOO_MINIMAL", default_value_t = false)]
        minimal: bool,

        /// Ancestry table slots
        #[arg(long, env = "CUCKOO_TABLE_CAPACITY", default_value_t = cuckoo::solver::CUCKOO_SIZE)]
        table_capacity: usize,

        /// Adjacency table slots
        #[arg(long, env = "CUCKOO_ADJACENCY_CAPACITY", default_value_t = cuckoo::solver::ADJACENCY_SIZE)]
        adjacency_capacity: usize,

        /// Nodes one closing-path search may visit (proofs longer than 2)
        #[arg(long, env = "CUCKOO_PATH_BUDGET", default_value_t = cuckoo::solver::PATH_BUDGET)]
        path_budget: usize,

        /// Number of successive nonces to try
        #[arg(short, long, env = "CUCKOO_ATTEMPTS", default_value_t = 1)]
        attempts: u64,

        /// Print outcomes as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Check a proof
    Verify {
        #[command(flatten)]
        graph: GraphArgs,

        /// Proof nonces in hex
        #[arg(required = true)]
        nonces: Vec<String>,
    },
}

#[derive(Args)]
struct GraphArgs {
    /// Header bytes keying the graph
    #[arg(long, env = "CUCKOO_HEADER", default_value = "")]
    header: String,

    /// Nonce appended to the header in decimal; solving starts here
    #[arg(short, long, env = "CUCKOO_NONCE", default_value_t = 0)]
    nonce: u64,

    /// The graph has 2^edge_bits edges
    #[arg(short, long, env = "CUCKOO_EDGE_BITS", default_value_t = cuckoo::solver::EDGEBITS)]
    edge_bits: u32,

    /// Cycle length
    #[arg(short = 'l', long, env = "CUCKOO_PROOF_SIZE", default_value_t = cuckoo::solver::PROOFSIZE)]
    proof_size: usize,
}

impl GraphArgs {
    fn generator(&self, nonce: u64) -> Result<SipEdges> {
        if !(1..=cuckoo::solver::config::MAX_EDGE_BITS).contains(&self.edge_bits) {
            bail!("edge bits {} outside 1..={}", self.edge_bits, cuckoo::solver::config::MAX_EDGE_BITS);
        }
        let keyed = format!("{}{}", self.header, nonce);
        Ok(SipEdges::from_header(keyed.as_bytes(), self.edge_bits))
    }
}

#[derive(Serialize)]
struct Report {
    header: String,
    nonce: u64,
    #[serde(flatten)]
    outcome: Outcome,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Solve {
            graph,
            threads,
            partitions,
            minimal,
            table_capacity,
            adjacency_capacity,
            path_budget,
            attempts,
            json,
        } => {
            let config = SolverConfig {
                edge_bits: graph.edge_bits,
                threads,
                partitions,
                proof_size: graph.proof_size,
                minimal_bfs: minimal,
                table_capacity,
                adjacency_capacity,
                path_budget,
            };
            config.validate().context("invalid solver configuration")?;
            run_solve(&graph, config, attempts, json)
        }
        Commands::Verify { graph, nonces } => run_verify(&graph, &nonces),
    }
}

fn run_solve(graph: &GraphArgs, config: SolverConfig, attempts: u64, json: bool) -> Result<()> {
    info!(
        header = %graph.header,
        edge_bits = config.edge_bits,
        proof_size = config.proof_size,
        threads = config.threads,
        partitions = config.partitions,
        "looking for {}-cycles",
        config.proof_size
    );
    for nonce in graph.nonce..graph.nonce.saturating_add(attempts) {
        let generator = graph.generator(nonce)?;
        let outcome = solve(generator, config).with_context(|| format!("solving nonce {nonce}"))?;
        if json {
            let report = Report { header: graph.header.clone(), nonce, outcome: outcome.clone() };
            println!("{}", serde_json::to_string(&report)?);
        } else {
            match &outcome {
                Outcome::Solved(proof) => println!("Solution at nonce {nonce}: {proof}"),
                Outcome::NoSolution => println!("No solution at nonce {nonce}"),
            }
        }
        if outcome.is_solved() {
            return Ok(());
        }
    }
    Ok(())
}

fn run_verify(graph: &GraphArgs, nonces: &[String]) -> Result<()> {
    let nonces = nonces
        .iter()
        .map(|n| {
            u32::from_str_radix(n.trim_start_matches("0x"), 16)
                .with_context(|| format!("nonce {n:?} is not hex"))
        })
        .collect::<Result<Vec<_>>>()?;
    let generator = graph.generator(graph.nonce)?;
    verify(&nonces, graph.proof_size, &generator).context("proof rejected")?;
    println!("Verified {}-cycle", graph.proof_size);
    Ok(())
}
