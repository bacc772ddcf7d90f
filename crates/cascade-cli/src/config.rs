//! Configuration System
//!
//! Loads simulation parameters from tuning.toml so experiments can be
//! adjusted without recompiling.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use cascade_core::adoption::{
    DEFAULT_ALPHA, DEFAULT_FACT_CHECK_PROBABILITY, DEFAULT_GAMMA, DEFAULT_OMEGA,
};
use cascade_core::{AdoptionCurve, SpreadParams};

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "tuning.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub model: ModelConfig,
    pub adoption: AdoptionConfig,
    pub seeding: SeedingConfig,
}

/// Run sizing and cadence
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub num_people: usize,
    pub num_initial_believers: usize,
    pub num_initial_disbelievers: usize,
    pub timesteps: u64,
    pub timesteps_per_checkpoint: u64,
}

/// Which graph to run the cascade on
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub kind: ModelKind,
    /// Follow probability for the uniform random model
    pub follow_probability: f64,
    /// Edges added per new node (and seed clique size) for the fitness model
    pub edges_per_node: usize,
    /// Edge-list file for the imported model
    pub edge_list_path: Option<String>,
    /// Fraction of edges to drop before simulating (0 disables)
    pub sparsify_fraction: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    Random,
    Fitness,
    EdgeList,
}

/// Adoption curve shape and fact-check chance
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdoptionConfig {
    pub alpha: f64,
    pub gamma: f64,
    pub omega: f64,
    pub fact_check_probability: f64,
}

/// Seed placement policy
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeedingConfig {
    /// Place initial disbelievers at hub nodes instead of at random
    pub target_hubs: bool,
    /// Percentile threshold for hub membership, as a fraction in [0, 1]
    pub hub_percentile: f64,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from the given path, or fall back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path.as_ref()).unwrap_or_else(|e| {
            tracing::warn!("could not load {}: {}. Using defaults", path.as_ref().display(), e);
            Self::default()
        })
    }

    /// The agent-psychology parameters the engine needs
    pub fn spread_params(&self) -> SpreadParams {
        SpreadParams {
            adoption: AdoptionCurve::new(
                self.adoption.alpha,
                self.adoption.gamma,
                self.adoption.omega,
            ),
            fact_check_probability: self.adoption.fact_check_probability,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            model: ModelConfig::default(),
            adoption: AdoptionConfig::default(),
            seeding: SeedingConfig::default(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_people: 1000,
            num_initial_believers: 10,
            num_initial_disbelievers: 0,
            timesteps: 100,
            timesteps_per_checkpoint: 1,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            kind: ModelKind::Fitness,
            follow_probability: 0.1,
            edges_per_node: 2,
            edge_list_path: None,
            sparsify_fraction: 0.0,
        }
    }
}

impl Default for AdoptionConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            gamma: DEFAULT_GAMMA,
            omega: DEFAULT_OMEGA,
            fact_check_probability: DEFAULT_FACT_CHECK_PROBABILITY,
        }
    }
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            target_hubs: false,
            hub_percentile: 0.9,
        }
    }
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}
