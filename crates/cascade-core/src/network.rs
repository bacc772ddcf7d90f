//! Social Network and Cascade Scheduler
//!
//! Owns the directed follow-graph, the agent population and the spreading
//! event queue. Agents live in a dense arena indexed by id; the graph is a
//! per-agent adjacency list of follower indices. A follow edge `a -> b`
//! means "b follows a", so a's broadcasts reach b.
//!
//! Evolution is event-driven: seeding and re-shares enqueue spreading
//! events, and `evolve_step` drains exactly the events that were queued when
//! the step began. Events appended while a step runs belong to the next
//! step, which keeps the cascade step-indexed instead of recursing to
//! exhaustion within a single step.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::adoption::SpreadParams;
use crate::agent::{Agent, Attitude, Stimulus};
use crate::growth::FitnessGrowthModel;

/// One pending exposure: show `stimulus` to agent `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpreadingEvent {
    pub target: usize,
    pub stimulus: Stimulus,
}

/// Rejected seed request. Raised before any agent is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeedError {
    #[error("requested {requested} seed agents but the network only has {available}")]
    TooManySeeds { requested: usize, available: usize },
    #[error("agent {id} appears in both the believer and disbeliever seed sets")]
    OverlappingSeeds { id: usize },
    #[error("agent {id} appears twice in the same seed set")]
    DuplicateSeed { id: usize },
    #[error("seed agent {id} does not exist in a network of {available} agents")]
    UnknownAgent { id: usize, available: usize },
}

/// Rejected graph import.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetworkError {
    #[error("edge ({src}, {target}) references a node outside the population of {available}")]
    EdgeOutOfRange {
        src: usize,
        target: usize,
        available: usize,
    },
}

/// A population of agents wired together by follow edges, plus the queue of
/// in-flight exposures.
#[derive(Debug, Clone)]
pub struct Network {
    agents: Vec<Agent>,
    /// `followers[i]` holds the agents that follow agent `i`.
    followers: Vec<Vec<usize>>,
    queue: VecDeque<SpreadingEvent>,
    params: SpreadParams,
    max_fraction_believers: f64,
}

impl Network {
    /// An edgeless network of `num_agents` unaware agents.
    pub fn new(num_agents: usize, params: SpreadParams) -> Self {
        Self {
            agents: (0..num_agents).map(Agent::new).collect(),
            followers: vec![Vec::new(); num_agents],
            queue: VecDeque::new(),
            params,
            max_fraction_believers: 0.0,
        }
    }

    /// Build a network from an abstract edge list, e.g. an imported graph.
    ///
    /// Each `(source, target)` pair becomes the follow edge "target follows
    /// source". Edges referencing unknown nodes are rejected.
    pub fn from_edges(
        num_agents: usize,
        edges: impl IntoIterator<Item = (usize, usize)>,
        params: SpreadParams,
    ) -> Result<Self, NetworkError> {
        let mut network = Self::new(num_agents, params);
        for (source, target) in edges {
            if source >= num_agents || target >= num_agents {
                return Err(NetworkError::EdgeOutOfRange {
                    src: source,
                    target,
                    available: num_agents,
                });
            }
            network.add_follow_edge(source, target);
        }
        Ok(network)
    }

    /// Build a uniform random (Erdos-Renyi style) network: every directed
    /// follow edge between distinct agents exists independently with
    /// probability `follow_probability`.
    pub fn random<R: Rng>(
        num_agents: usize,
        follow_probability: f64,
        params: SpreadParams,
        rng: &mut R,
    ) -> Self {
        let mut network = Self::new(num_agents, params);
        for source in 0..num_agents {
            for follower in 0..num_agents {
                if source != follower && rng.gen::<f64>() < follow_probability {
                    network.add_follow_edge(source, follower);
                }
            }
        }
        network
    }

    /// Build a network from a grown fitness model. Each undirected
    /// attachment edge becomes the follow edge "later node follows earlier
    /// node": newcomers follow the established accounts they attached to.
    pub fn from_fitness_model(model: &FitnessGrowthModel, params: SpreadParams) -> Self {
        let mut network = Self::new(model.node_count(), params);
        for (earlier, later) in model.follow_edges() {
            network.add_follow_edge(earlier, later);
        }
        network
    }

    fn add_follow_edge(&mut self, source: usize, follower: usize) {
        self.followers[source].push(follower);
    }

    //---Seeding----------------------------------------------------------

    /// Seed the cascade with randomly chosen believers and disbelievers,
    /// sampled without replacement and disjointly from the population.
    pub fn seed<R: Rng>(
        &mut self,
        num_believers: usize,
        num_disbelievers: usize,
        rng: &mut R,
    ) -> Result<(), SeedError> {
        let requested = num_believers + num_disbelievers;
        if requested > self.agents.len() {
            return Err(SeedError::TooManySeeds {
                requested,
                available: self.agents.len(),
            });
        }

        let picks = rand::seq::index::sample(rng, self.agents.len(), requested).into_vec();
        let (disbelievers, believers) = picks.split_at(num_disbelievers);
        self.seed_explicit(believers, disbelievers)
    }

    /// Seed the cascade with explicit agent sets, e.g. hub-targeted
    /// disbelievers chosen by centrality analysis.
    ///
    /// Validates the whole request before mutating anything: on error the
    /// network is untouched.
    pub fn seed_explicit(
        &mut self,
        believer_seeds: &[usize],
        disbeliever_seeds: &[usize],
    ) -> Result<(), SeedError> {
        self.validate_seed_request(believer_seeds, disbeliever_seeds)?;

        for &id in disbeliever_seeds {
            self.agents[id].attitude = Attitude::Disbeliever;
            self.enqueue_broadcast(id, Stimulus::FactCheck);
        }
        for &id in believer_seeds {
            self.agents[id].attitude = Attitude::Believer;
            self.enqueue_broadcast(id, Stimulus::Meme);
        }

        self.update_max_fraction();
        Ok(())
    }

    fn validate_seed_request(
        &self,
        believer_seeds: &[usize],
        disbeliever_seeds: &[usize],
    ) -> Result<(), SeedError> {
        let requested = believer_seeds.len() + disbeliever_seeds.len();
        if requested > self.agents.len() {
            return Err(SeedError::TooManySeeds {
                requested,
                available: self.agents.len(),
            });
        }

        let mut seen = vec![false; self.agents.len()];
        for set in [believer_seeds, disbeliever_seeds] {
            for &id in set {
                if id >= self.agents.len() {
                    return Err(SeedError::UnknownAgent {
                        id,
                        available: self.agents.len(),
                    });
                }
                if seen[id] {
                    // Within one set it is a duplicate, across sets an overlap.
                    if believer_seeds.contains(&id) && disbeliever_seeds.contains(&id) {
                        return Err(SeedError::OverlappingSeeds { id });
                    }
                    return Err(SeedError::DuplicateSeed { id });
                }
                seen[id] = true;
            }
        }
        Ok(())
    }

    /// Queue one exposure of `stimulus` for every follower of `source`.
    fn enqueue_broadcast(&mut self, source: usize, stimulus: Stimulus) {
        for &follower in &self.followers[source] {
            self.queue.push_back(SpreadingEvent {
                target: follower,
                stimulus,
            });
        }
    }

    //---Evolution--------------------------------------------------------

    /// Advance the cascade by one synchronous wave.
    ///
    /// Drains exactly the events queued when the step began; re-shares
    /// triggered during the step are appended behind them and handled in the
    /// next step. Calling this on an empty queue is a no-op.
    pub fn evolve_step<R: Rng>(&mut self, rng: &mut R) {
        let wavefront = self.queue.len();
        tracing::debug!(events = wavefront, "processing spreading wavefront");

        for _ in 0..wavefront {
            let Some(event) = self.queue.pop_front() else {
                break;
            };
            let reshare = self.agents[event.target].observe(event.stimulus, &self.params, rng);
            if let Some(stimulus) = reshare {
                self.enqueue_broadcast(event.target, stimulus);
            }
        }

        self.update_max_fraction();
    }

    fn update_max_fraction(&mut self) {
        let fraction = self.fraction_believers();
        if fraction > self.max_fraction_believers {
            self.max_fraction_believers = fraction;
        }
    }

    //---Structure--------------------------------------------------------

    /// Remove a random `fraction` of the follow edges, uniformly without
    /// replacement. Intended as a pre-simulation perturbation; never call it
    /// mid-cascade.
    pub fn make_sparse<R: Rng>(&mut self, fraction: f64, rng: &mut R) {
        let mut edges: Vec<(usize, usize)> = self
            .followers
            .iter()
            .enumerate()
            .flat_map(|(source, fs)| fs.iter().map(move |&f| (source, f)))
            .collect();

        let to_remove = (edges.len() as f64 * fraction.clamp(0.0, 1.0)) as usize;
        edges.partial_shuffle(rng, to_remove);

        for followers in &mut self.followers {
            followers.clear();
        }
        for &(source, follower) in &edges[to_remove..] {
            self.followers[source].push(follower);
        }
    }

    //---Results----------------------------------------------------------

    /// Fraction of agents currently believing the meme. 0.0 for an empty
    /// network.
    pub fn fraction_believers(&self) -> f64 {
        if self.agents.is_empty() {
            return 0.0;
        }
        let believers = self
            .agents
            .iter()
            .filter(|a| a.attitude == Attitude::Believer)
            .count();
        believers as f64 / self.agents.len() as f64
    }

    /// High-water mark of `fraction_believers` across every seed and evolve
    /// call since this network was created. Non-decreasing.
    pub fn max_fraction_believers(&self) -> f64 {
        self.max_fraction_believers
    }

    /// Number of exposures still waiting in the queue. Zero means the
    /// cascade has reached a fixed point and further steps are no-ops.
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn edge_count(&self) -> usize {
        self.followers.iter().map(Vec::len).sum()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: usize) -> Option<&Agent> {
        self.agents.get(id)
    }

    /// Followers of `id`: the agents its broadcasts reach.
    pub fn followers_of(&self, id: usize) -> &[usize] {
        &self.followers[id]
    }

    /// Total degree (in plus out) of every agent, in id order.
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees: Vec<usize> = self.followers.iter().map(Vec::len).collect();
        for followers in &self.followers {
            for &f in followers {
                degrees[f] += 1;
            }
        }
        degrees
    }
}
