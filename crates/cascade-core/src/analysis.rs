//! Hub Analysis
//!
//! Read-only centrality analysis over a network, used by seeding policy to
//! place fact-checkers at well-connected accounts. Never touches attitudes
//! or the event queue.

use crate::network::Network;

/// Relative weight of each centrality metric in the composite score.
/// Degree centrality is the baseline; more metrics slot in here as they are
/// added.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CentralityWeights {
    pub degree: f64,
}

impl Default for CentralityWeights {
    fn default() -> Self {
        Self { degree: 1.0 }
    }
}

impl CentralityWeights {
    fn total(&self) -> f64 {
        self.degree
    }
}

/// Degree centrality per agent: total degree (in plus out) over `n - 1`.
pub fn degree_centrality(network: &Network) -> Vec<f64> {
    let n = network.agent_count();
    if n < 2 {
        return vec![0.0; n];
    }
    let norm = (n - 1) as f64;
    network
        .degrees()
        .into_iter()
        .map(|d| d as f64 / norm)
        .collect()
}

/// Composite centrality score per agent: the weighted average of every
/// metric under `weights`.
pub fn composite_scores(network: &Network, weights: &CentralityWeights) -> Vec<f64> {
    let total = weights.total();
    if total <= 0.0 {
        return vec![0.0; network.agent_count()];
    }
    degree_centrality(network)
        .into_iter()
        .map(|degree| degree * weights.degree / total)
        .collect()
}

/// Agents whose composite score is at or above the given percentile of the
/// score distribution, as `(agent id, score)` in descending score order.
///
/// `percentile_threshold` is a fraction in `[0, 1]`; 0.9 keeps roughly the
/// top decile. An empty network yields an empty list.
pub fn hub_nodes(network: &Network, percentile_threshold: f64) -> Vec<(usize, f64)> {
    let scores = composite_scores(network, &CentralityWeights::default());
    if scores.is_empty() {
        return Vec::new();
    }

    let mut sorted = scores.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let cutoff = percentile(&sorted, percentile_threshold);

    let mut hubs: Vec<(usize, f64)> = scores
        .into_iter()
        .enumerate()
        .filter(|&(_, score)| score >= cutoff)
        .collect();
    hubs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    hubs
}

/// Linearly interpolated percentile of an ascending-sorted slice, `q` in
/// `[0, 1]`.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let q = q.clamp(0.0, 1.0);
    let rank = q * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let weight = rank - lo as f64;
    sorted[lo] * (1.0 - weight) + sorted[hi] * weight
}
