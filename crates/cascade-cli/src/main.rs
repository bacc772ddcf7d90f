//! Meme Cascade Simulator
//!
//! Builds a follow-graph (uniform random, fitness-grown or imported from an
//! edge list), seeds it with believers and optional fact-checking
//! disbelievers, and runs the cascade for a configured number of timesteps,
//! writing the believer-fraction time series as JSON.

use clap::Parser;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

mod config;

use cascade_core::growth::GrowthError;
use cascade_core::network::{NetworkError, SeedError};
use cascade_core::output::{self, OutputError, StatsCollector};
use cascade_core::{analysis, FitnessGrowthModel, Network};

use config::{Config, ModelKind, DEFAULT_TUNING_PATH};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "meme_cascade")]
#[command(about = "Simulates meme and fact-check spread through a social network")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Path to the tuning file
    #[arg(long, default_value = DEFAULT_TUNING_PATH)]
    config: PathBuf,

    /// Where to write the run statistics JSON
    #[arg(long, default_value = "output/run_stats.json")]
    output: PathBuf,

    /// Override the number of timesteps from the tuning file
    #[arg(long)]
    timesteps: Option<u64>,
}

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Growth(#[from] GrowthError),
    #[error(transparent)]
    Seed(#[from] SeedError),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error("edge-list model selected but no edge_list_path configured")]
    MissingEdgeListPath,
    #[error("could not read edge list {path}: {reason}")]
    BadEdgeList { path: String, reason: String },
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), RunError> {
    let mut config = Config::load_or_default(&args.config);
    if let Some(timesteps) = args.timesteps {
        config.simulation.timesteps = timesteps;
    }

    println!("Meme Cascade Simulator");
    println!("======================");
    println!("Seed: {}", args.seed);
    println!("Agents: {}", config.simulation.num_people);
    println!("Timesteps: {}", config.simulation.timesteps);
    println!();

    let mut rng = SmallRng::seed_from_u64(args.seed);

    let mut network = build_network(&config, &mut rng)?;
    tracing::info!(
        agents = network.agent_count(),
        edges = network.edge_count(),
        "network constructed"
    );

    if config.model.sparsify_fraction > 0.0 {
        let before = network.edge_count();
        network.make_sparse(config.model.sparsify_fraction, &mut rng);
        tracing::info!(
            removed = before - network.edge_count(),
            "sparsified the follow-graph"
        );
    }

    seed_network(&mut network, &config, &mut rng)?;

    let mut collector = StatsCollector::new();
    collector.record(0, &network);

    let mut steps_run = 0;
    for step in 1..=config.simulation.timesteps {
        network.evolve_step(&mut rng);
        steps_run = step;

        if step % config.simulation.timesteps_per_checkpoint.max(1) == 0 {
            collector.record(step, &network);
        }
        if network.pending_events() == 0 {
            tracing::info!(step, "cascade reached a fixed point, stopping early");
            break;
        }
    }

    println!(
        "At most {:.2}% of the network have believed in the meme.",
        network.max_fraction_believers() * 100.0
    );
    println!(
        "Currently, {:.2}% of the network believe in the meme.",
        network.fraction_believers() * 100.0
    );

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).unwrap_or_else(|e| {
                eprintln!("Warning: could not create output directory: {}", e);
            });
        }
    }
    let stats = collector.into_stats(args.seed, steps_run, &network);
    output::write_stats(&stats, &args.output)?;
    println!("Stats written to {}", args.output.display());

    Ok(())
}

/// Build the follow-graph the configuration asks for.
fn build_network(config: &Config, rng: &mut SmallRng) -> Result<Network, RunError> {
    let params = config.spread_params();
    let network = match config.model.kind {
        ModelKind::Random => Network::random(
            config.simulation.num_people,
            config.model.follow_probability,
            params,
            rng,
        ),
        ModelKind::Fitness => {
            let model = FitnessGrowthModel::generate(
                config.simulation.num_people,
                config.model.edges_per_node,
                rng,
            )?;
            Network::from_fitness_model(&model, params)
        }
        ModelKind::EdgeList => {
            let path = config
                .model
                .edge_list_path
                .as_deref()
                .ok_or(RunError::MissingEdgeListPath)?;
            let (node_count, edges) = load_edge_list(path)?;
            Network::from_edges(node_count, edges, params)?
        }
    };
    Ok(network)
}

/// Seed believers and disbelievers, optionally placing the disbelievers at
/// hub nodes picked by centrality.
fn seed_network(
    network: &mut Network,
    config: &Config,
    rng: &mut SmallRng,
) -> Result<(), RunError> {
    let num_believers = config.simulation.num_initial_believers;
    let num_disbelievers = config.simulation.num_initial_disbelievers;

    if !config.seeding.target_hubs {
        network.seed(num_believers, num_disbelievers, rng)?;
        return Ok(());
    }

    let hubs = analysis::hub_nodes(network, config.seeding.hub_percentile);
    if hubs.len() < num_disbelievers {
        tracing::warn!(
            hubs = hubs.len(),
            requested = num_disbelievers,
            "fewer hubs than requested disbelievers, using all hubs"
        );
    }
    let disbeliever_seeds: Vec<usize> = hubs
        .iter()
        .take(num_disbelievers)
        .map(|&(id, _)| id)
        .collect();

    let non_hubs: Vec<usize> = {
        let mut is_hub = vec![false; network.agent_count()];
        for &id in &disbeliever_seeds {
            is_hub[id] = true;
        }
        (0..network.agent_count()).filter(|&id| !is_hub[id]).collect()
    };
    let believer_seeds: Vec<usize> = non_hubs
        .choose_multiple(rng, num_believers)
        .copied()
        .collect();

    tracing::info!(
        disbelievers = disbeliever_seeds.len(),
        believers = believer_seeds.len(),
        "hub-targeted seeding"
    );
    network.seed_explicit(&believer_seeds, &disbeliever_seeds)?;
    Ok(())
}

/// Read an edge list: first line is the node count, each further line is a
/// `source target` pair meaning "target follows source". Blank lines and
/// `#` comments are skipped.
fn load_edge_list(path: impl AsRef<Path>) -> Result<(usize, Vec<(usize, usize)>), RunError> {
    let path_str = path.as_ref().display().to_string();
    let bad = |reason: String| RunError::BadEdgeList {
        path: path_str.clone(),
        reason,
    };

    let content = fs::read_to_string(path.as_ref()).map_err(|e| bad(e.to_string()))?;
    let mut lines = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'));

    let node_count: usize = lines
        .next()
        .ok_or_else(|| bad("empty file".to_string()))?
        .parse()
        .map_err(|e| bad(format!("bad node count: {}", e)))?;

    let mut edges = Vec::new();
    for line in lines {
        let mut parts = line.split_whitespace();
        let source: usize = parts
            .next()
            .ok_or_else(|| bad(format!("malformed edge line: {:?}", line)))?
            .parse()
            .map_err(|e| bad(format!("bad source in {:?}: {}", line, e)))?;
        let target: usize = parts
            .next()
            .ok_or_else(|| bad(format!("malformed edge line: {:?}", line)))?
            .parse()
            .map_err(|e| bad(format!("bad target in {:?}: {}", line, e)))?;
        edges.push((source, target));
    }
    Ok((node_count, edges))
}
