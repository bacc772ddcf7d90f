//! Statistics Output
//!
//! Collects the believer-fraction time series during a run and writes a
//! summary for external plotting or analysis. The engine itself never
//! formats or plots anything.

use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::network::Network;

/// Believer fraction observed after a given timestep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Checkpoint {
    pub timestep: u64,
    pub fraction_believers: f64,
}

/// Final summary of one simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub seed: u64,
    pub num_agents: usize,
    pub num_edges: usize,
    pub timesteps_run: u64,
    pub final_fraction_believers: f64,
    pub max_fraction_believers: f64,
    pub checkpoints: Vec<Checkpoint>,
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("could not write stats to {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("could not serialize stats: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Accumulates checkpoints by polling the network after evolve steps.
#[derive(Debug, Default)]
pub struct StatsCollector {
    checkpoints: Vec<Checkpoint>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the believer fraction after `timestep`.
    pub fn record(&mut self, timestep: u64, network: &Network) {
        self.checkpoints.push(Checkpoint {
            timestep,
            fraction_believers: network.fraction_believers(),
        });
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    /// Fold the collected series into a final summary.
    pub fn into_stats(self, seed: u64, timesteps_run: u64, network: &Network) -> RunStats {
        RunStats {
            seed,
            num_agents: network.agent_count(),
            num_edges: network.edge_count(),
            timesteps_run,
            final_fraction_believers: network.fraction_believers(),
            max_fraction_believers: network.max_fraction_believers(),
            checkpoints: self.checkpoints,
        }
    }
}

/// Write the run summary as pretty-printed JSON.
pub fn write_stats(stats: &RunStats, path: impl AsRef<Path>) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(stats)?;
    fs::write(path.as_ref(), json).map_err(|source| OutputError::Io {
        path: path.as_ref().display().to_string(),
        source,
    })
}
