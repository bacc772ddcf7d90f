//! Core cascade logic: agents, adoption curve, follow-graph, growth models.
//!
//! Simulates how a meme and a competing fact-check spread through a directed
//! follow-graph. The engine is single-threaded and fully deterministic given
//! the random generator the caller threads through it.

pub mod adoption;
pub mod agent;
pub mod analysis;
pub mod growth;
pub mod network;
pub mod output;

pub use adoption::{AdoptionCurve, SpreadParams};
pub use agent::{Agent, Attitude, Stimulus};
pub use growth::FitnessGrowthModel;
pub use network::Network;
