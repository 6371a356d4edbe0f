//! Command line interface of the simulator.

use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use chord_sim_core::consts;
use chord_sim_core::dht::IdSpace;
use chord_sim_core::dht::SpaceKind;
use chord_sim_core::inspect::write_sif;
use chord_sim_core::Simulator;
use clap::Parser;
use clap::ValueEnum;
use rand::SeedableRng;
use rand_hc::Hc128Rng;

use crate::logging::LogLevel;

#[derive(Parser, Debug)]
#[command(about, version, author)]
pub struct Cli {
    /// Number of bits of the node identifiers.
    #[arg(long, short = 'm', default_value_t = consts::DEFAULT_BIT_LENGTH, env)]
    pub bit_length: u32,

    /// Number of nodes in the network.
    #[arg(long, short = 'n', default_value_t = 10_000, env)]
    pub num_nodes: u64,

    /// Number of queries to run.
    #[arg(long, short = 'q', default_value_t = 10_000, env)]
    pub num_queries: u64,

    /// How node identifiers are derived.
    #[arg(long, value_enum, default_value_t = IdSpaceKind::UniformRandom, env)]
    pub id_space: IdSpaceKind,

    /// Cap on concurrently executing queries.
    #[arg(long, default_value_t = consts::DEFAULT_CONCURRENCY_CAP, env)]
    pub concurrency: usize,

    /// Seed for a reproducible run. Uses OS entropy when absent.
    #[arg(long, env)]
    pub seed: Option<u64>,

    /// Write the finger-graph topology to this file in SIF form.
    #[arg(long, env)]
    pub sif: Option<PathBuf>,

    /// Write the aggregated statistics to this file as JSON.
    #[arg(long, env)]
    pub stats: Option<PathBuf>,

    #[arg(long, default_value_t = LogLevel::Info, value_enum, env)]
    pub log_level: LogLevel,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[clap(rename_all = "kebab-case")]
pub enum IdSpaceKind {
    UniformRandom,
    HashOfEndpoint,
}

impl fmt::Display for IdSpaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdSpaceKind::UniformRandom => write!(f, "uniform-random"),
            IdSpaceKind::HashOfEndpoint => write!(f, "hash-of-endpoint"),
        }
    }
}

impl From<IdSpaceKind> for SpaceKind {
    fn from(kind: IdSpaceKind) -> Self {
        match kind {
            IdSpaceKind::UniformRandom => SpaceKind::UniformRandom,
            IdSpaceKind::HashOfEndpoint => SpaceKind::HashOfEndpoint,
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let kind: SpaceKind = cli.id_space.into();
    let space = match cli.seed {
        Some(seed) => IdSpace::new_seeded(kind, cli.bit_length, seed)?,
        None => IdSpace::new(kind, cli.bit_length)?,
    };

    tracing::info!(
        bit_length = cli.bit_length,
        num_nodes = cli.num_nodes,
        "bootstrapping network"
    );
    let sim = Arc::new(Simulator::new(cli.num_nodes, space)?);
    println!("Network bootstrap complete.");

    if let Some(path) = &cli.sif {
        let mut out = BufWriter::new(File::create(path)?);
        write_sif(&sim, &mut out)?;
        out.flush()?;
        tracing::info!(path = %path.display(), "wrote topology export");
    }

    let queries = match cli.seed {
        Some(seed) => sim.plan_queries(cli.num_queries, &mut Hc128Rng::seed_from_u64(seed)),
        None => sim.plan_queries(cli.num_queries, &mut rand::thread_rng()),
    };

    println!("Running simulation...");
    let stats = sim
        .clone()
        .run_queries(queries, cli.concurrency, |fraction| {
            print!("\x1b[2K\r{:.2}%/100%", fraction * 100.0);
            let _ = std::io::stdout().flush();
        })
        .await;
    println!();

    let topology = sim.topological_stats();

    println!("Average hop count: {:.2}", stats.avg_hop_count);
    println!(
        "Average queries received per node: {:.2}",
        stats.avg_queries_received
    );
    println!("Average in-degree: {:.2}", topology.avg_in_degree);
    println!("Average out-degree: {:.2}", topology.avg_out_degree);

    if let Some(path) = &cli.stats {
        let report = serde_json::json!({
            "simulation": stats,
            "topology": topology,
        });
        serde_json::to_writer_pretty(File::create(path)?, &report)?;
        tracing::info!(path = %path.display(), "wrote statistics report");
    }

    Ok(())
}
