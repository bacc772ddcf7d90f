//! Fitness-Weighted Preferential Attachment
//!
//! Grows a scale-free-like graph in which newcomers attach preferentially to
//! nodes that are both well connected and fit (Bianconi-Barabasi style). The
//! attachment weight of a node is `degree * fitness`; the model keeps every
//! per-node weight and the running total consistent with the graph by
//! applying deltas on each inserted edge, never by rescanning the node set.
//! (The naive alternative recomputes all weights per step and is O(N) per
//! node added; the delta form is O(1) per edge.)

use rand::Rng;
use thiserror::Error;

/// Fitness values are drawn from `Uniform(0.01, 1.0)` so no node is ever
/// completely unattractive once it has a degree.
const FITNESS_MIN: f64 = 0.01;
const FITNESS_MAX: f64 = 1.0;

/// Rejected growth parameters. Raised before any node is created.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrowthError {
    #[error("growth needs at least one edge per node, got m = 0")]
    NoEdgesPerNode,
    #[error("seed clique of {m} nodes cannot fit a network of {n} nodes")]
    SeedLargerThanNetwork { n: usize, m: usize },
}

/// A fully grown fitness model: the undirected attachment graph plus the
/// bookkeeping that produced it.
#[derive(Debug, Clone)]
pub struct FitnessGrowthModel {
    m: usize,
    fitness: Vec<f64>,
    degree: Vec<usize>,
    attractiveness: Vec<f64>,
    total_attractiveness: f64,
    /// Every undirected edge as `(earlier, later)` by birth order: the seed
    /// clique pairs and one entry per growth attachment.
    edges: Vec<(usize, usize)>,
}

impl FitnessGrowthModel {
    /// Grow a network of `n` nodes, starting from a complete seed clique of
    /// `m` nodes and attaching each later node to `m` distinct existing
    /// nodes.
    pub fn generate<R: Rng>(n: usize, m: usize, rng: &mut R) -> Result<Self, GrowthError> {
        if m < 1 {
            return Err(GrowthError::NoEdgesPerNode);
        }
        if m >= n {
            return Err(GrowthError::SeedLargerThanNetwork { n, m });
        }

        let mut model = Self {
            m,
            fitness: Vec::with_capacity(n),
            degree: Vec::with_capacity(n),
            attractiveness: Vec::with_capacity(n),
            total_attractiveness: 0.0,
            edges: Vec::with_capacity(m * (m - 1) / 2 + m * (n - m)),
        };

        model.initialize_seed_clique(rng);
        for new_node in m..n {
            model.attach_new_node(new_node, rng);
        }
        Ok(model)
    }

    /// Create the complete graph over the first `m` nodes and derive the
    /// initial weights from it.
    fn initialize_seed_clique<R: Rng>(&mut self, rng: &mut R) {
        for _ in 0..self.m {
            self.fitness.push(draw_fitness(rng));
            // Every clique member is connected to the m - 1 others.
            self.degree.push(self.m - 1);
        }
        for node in 0..self.m {
            let weight = self.degree[node] as f64 * self.fitness[node];
            self.attractiveness.push(weight);
            self.total_attractiveness += weight;
        }
        for i in 0..self.m {
            for j in (i + 1)..self.m {
                self.edges.push((i, j));
            }
        }
    }

    /// Add one node, wire it to `m` sampled targets and apply the weight
    /// deltas for exactly the nodes the new edges touch.
    fn attach_new_node<R: Rng>(&mut self, new_node: usize, rng: &mut R) {
        let targets = self.sample_targets(rng);

        let eta = draw_fitness(rng);
        self.fitness.push(eta);
        self.degree.push(self.m);
        let new_weight = self.m as f64 * eta;
        self.attractiveness.push(new_weight);
        self.total_attractiveness += new_weight;

        for target in targets {
            self.degree[target] += 1;
            let updated = self.degree[target] as f64 * self.fitness[target];
            self.total_attractiveness += updated - self.attractiveness[target];
            self.attractiveness[target] = updated;
            self.edges.push((target, new_node));
        }
    }

    /// Sample `m` distinct existing nodes, each draw proportional to the
    /// remaining attractiveness mass. Falls back to uniform selection when
    /// that mass is zero (degenerate bootstrap, e.g. an m = 1 seed whose
    /// single node still has degree zero).
    fn sample_targets<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
        let existing = self.fitness.len();
        let mut chosen = vec![false; existing];
        let mut targets = Vec::with_capacity(self.m);
        let mut remaining_mass = self.total_attractiveness;
        let mut remaining_nodes = existing;

        for _ in 0..self.m {
            let pick = if remaining_mass > 0.0 {
                weighted_pick(&self.attractiveness, &chosen, remaining_mass, rng)
            } else {
                uniform_pick(&chosen, remaining_nodes, rng)
            };
            chosen[pick] = true;
            remaining_mass -= self.attractiveness[pick];
            remaining_nodes -= 1;
            targets.push(pick);
        }
        targets
    }

    pub fn node_count(&self) -> usize {
        self.fitness.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn degree(&self, node: usize) -> usize {
        self.degree[node]
    }

    pub fn fitness(&self, node: usize) -> f64 {
        self.fitness[node]
    }

    pub fn total_attractiveness(&self) -> f64 {
        self.total_attractiveness
    }

    /// The undirected edges converted to follow direction: the earlier node
    /// is followed by the later one, so each pair comes out as
    /// `(followed, follower)` ready for `Network::from_edges`.
    pub fn follow_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges.iter().copied()
    }
}

fn draw_fitness<R: Rng>(rng: &mut R) -> f64 {
    rng.gen_range(FITNESS_MIN..FITNESS_MAX)
}

/// Roulette-wheel selection over the unchosen nodes.
fn weighted_pick<R: Rng>(
    attractiveness: &[f64],
    chosen: &[bool],
    remaining_mass: f64,
    rng: &mut R,
) -> usize {
    let mut roll = rng.gen::<f64>() * remaining_mass;
    for (node, &weight) in attractiveness.iter().enumerate() {
        if chosen[node] {
            continue;
        }
        roll -= weight;
        if roll <= 0.0 {
            return node;
        }
    }
    // Floating-point drift can leave a sliver of roll; take the last
    // unchosen node.
    (0..attractiveness.len())
        .rev()
        .find(|&node| !chosen[node])
        .unwrap_or(0)
}

/// Uniform selection over the unchosen nodes.
fn uniform_pick<R: Rng>(chosen: &[bool], remaining_nodes: usize, rng: &mut R) -> usize {
    let skip = rng.gen_range(0..remaining_nodes);
    let mut seen = 0;
    for (node, &taken) in chosen.iter().enumerate() {
        if taken {
            continue;
        }
        if seen == skip {
            return node;
        }
        seen += 1;
    }
    chosen.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    #[test]
    fn test_rejects_zero_edges_per_node() {
        let err = FitnessGrowthModel::generate(10, 0, &mut rng()).unwrap_err();
        assert_eq!(err, GrowthError::NoEdgesPerNode);
    }

    #[test]
    fn test_rejects_seed_at_least_network_size() {
        let err = FitnessGrowthModel::generate(5, 5, &mut rng()).unwrap_err();
        assert_eq!(err, GrowthError::SeedLargerThanNetwork { n: 5, m: 5 });
        assert!(FitnessGrowthModel::generate(0, 1, &mut rng()).is_err());
    }

    #[test]
    fn test_edge_count_matches_closed_form() {
        // m*(m-1)/2 seed edges plus m edges per grown node.
        let model = FitnessGrowthModel::generate(10, 2, &mut rng()).unwrap();
        assert_eq!(model.edge_count(), 1 + 2 * (10 - 2));

        let model = FitnessGrowthModel::generate(50, 4, &mut rng()).unwrap();
        assert_eq!(model.edge_count(), 6 + 4 * (50 - 4));
    }

    #[test]
    fn test_every_node_has_degree_at_least_m() {
        let model = FitnessGrowthModel::generate(60, 3, &mut rng()).unwrap();
        for node in 0..model.node_count() {
            assert!(
                model.degree(node) >= 3,
                "node {} has degree {}",
                node,
                model.degree(node)
            );
        }
    }

    #[test]
    fn test_degrees_are_consistent_with_edges() {
        let model = FitnessGrowthModel::generate(40, 2, &mut rng()).unwrap();
        let mut recounted = vec![0usize; model.node_count()];
        for (a, b) in model.follow_edges() {
            recounted[a] += 1;
            recounted[b] += 1;
        }
        for node in 0..model.node_count() {
            assert_eq!(recounted[node], model.degree(node));
        }
    }

    #[test]
    fn test_incremental_total_matches_full_recomputation() {
        let model = FitnessGrowthModel::generate(200, 3, &mut rng()).unwrap();
        let recomputed: f64 = (0..model.node_count())
            .map(|node| model.degree(node) as f64 * model.fitness(node))
            .sum();
        let drift = (model.total_attractiveness() - recomputed).abs();
        assert!(
            drift < 1e-6,
            "incremental total drifted by {} from {}",
            drift,
            recomputed
        );
    }

    #[test]
    fn test_single_seed_node_bootstraps_via_uniform_fallback() {
        // With m = 1 the lone seed node has degree zero, so the first
        // attachment has zero total attractiveness and must fall back to
        // uniform sampling.
        let model = FitnessGrowthModel::generate(6, 1, &mut rng()).unwrap();
        assert_eq!(model.edge_count(), 5);
        for node in 0..model.node_count() {
            assert!(model.degree(node) >= 1);
        }
    }

    #[test]
    fn test_attachment_targets_are_distinct() {
        // Degree never jumps by more than one per grown node, which would
        // happen if the same target were sampled twice for one newcomer.
        let model = FitnessGrowthModel::generate(30, 5, &mut rng()).unwrap();
        let mut by_newcomer = std::collections::HashMap::new();
        for (earlier, later) in model.follow_edges() {
            if later >= 5 {
                let targets: &mut Vec<usize> = by_newcomer.entry(later).or_default();
                assert!(
                    !targets.contains(&earlier),
                    "node {} attached to {} twice",
                    later,
                    earlier
                );
                targets.push(earlier);
            }
        }
        for (_, targets) in by_newcomer {
            assert_eq!(targets.len(), 5);
        }
    }

    #[test]
    fn test_follow_edges_point_from_earlier_to_later() {
        let model = FitnessGrowthModel::generate(25, 3, &mut rng()).unwrap();
        for (earlier, later) in model.follow_edges() {
            assert!(earlier < later);
        }
    }

    #[test]
    fn test_fitness_values_are_in_range() {
        let model = FitnessGrowthModel::generate(100, 2, &mut rng()).unwrap();
        for node in 0..model.node_count() {
            let eta = model.fitness(node);
            assert!((FITNESS_MIN..=FITNESS_MAX).contains(&eta));
        }
    }
}
