//! Determinism verification tests
//!
//! A run is fully reproducible given the seed of the generator threaded
//! through growth, seeding and exposure rolls; independent generators do not
//! interfere.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use cascade_core::{Attitude, FitnessGrowthModel, Network, SpreadParams};

/// Run a full fitness-model simulation and return the checkpoint series.
fn run_simulation(seed: u64, steps: u64) -> Vec<f64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let params = SpreadParams::default();

    let model = FitnessGrowthModel::generate(200, 3, &mut rng).expect("valid growth parameters");
    let mut network = Network::from_fitness_model(&model, params);
    network.seed(10, 2, &mut rng).expect("valid seed request");

    let mut series = Vec::new();
    for _ in 0..steps {
        network.evolve_step(&mut rng);
        series.push(network.fraction_believers());
    }
    series
}

#[test]
fn test_same_seed_reproduces_the_run() {
    let first = run_simulation(42, 30);
    let second = run_simulation(42, 30);
    assert_eq!(first, second, "identical seeds must produce identical runs");
}

#[test]
fn test_different_seeds_diverge() {
    let first = run_simulation(42, 30);
    let second = run_simulation(43, 30);
    assert_ne!(first, second, "different seeds should produce different runs");
}

#[test]
fn test_same_seed_reproduces_the_grown_graph() {
    let mut rng1 = SmallRng::seed_from_u64(7);
    let mut rng2 = SmallRng::seed_from_u64(7);

    let model1 = FitnessGrowthModel::generate(100, 2, &mut rng1).unwrap();
    let model2 = FitnessGrowthModel::generate(100, 2, &mut rng2).unwrap();

    let edges1: Vec<_> = model1.follow_edges().collect();
    let edges2: Vec<_> = model2.follow_edges().collect();
    assert_eq!(edges1, edges2);
    assert_eq!(
        model1.total_attractiveness(),
        model2.total_attractiveness()
    );
}

#[test]
fn test_independent_generators_do_not_interfere() {
    // Interleaving a second simulation must not change the first one's
    // outcome, which is the point of threading the generator explicitly.
    let mut rng_a = SmallRng::seed_from_u64(1);
    let mut rng_b = SmallRng::seed_from_u64(2);
    let params = SpreadParams::default();

    let mut net_a = Network::random(80, 0.05, params, &mut rng_a);
    let mut net_b = Network::random(80, 0.05, params, &mut rng_b);
    net_a.seed(5, 0, &mut rng_a).unwrap();
    net_b.seed(5, 0, &mut rng_b).unwrap();

    let mut interleaved = Vec::new();
    for _ in 0..20 {
        net_a.evolve_step(&mut rng_a);
        net_b.evolve_step(&mut rng_b);
        interleaved.push(net_a.fraction_believers());
    }

    // Replay run A alone with the same seed.
    let mut rng_a2 = SmallRng::seed_from_u64(1);
    let mut net_a2 = Network::random(80, 0.05, params, &mut rng_a2);
    net_a2.seed(5, 0, &mut rng_a2).unwrap();
    let mut alone = Vec::new();
    for _ in 0..20 {
        net_a2.evolve_step(&mut rng_a2);
        alone.push(net_a2.fraction_believers());
    }

    assert_eq!(interleaved, alone);
}

#[test]
fn test_absorption_holds_over_a_long_random_run() {
    let mut rng = SmallRng::seed_from_u64(99);
    let params = SpreadParams {
        fact_check_probability: 0.2,
        ..SpreadParams::default()
    };
    let mut network = Network::random(100, 0.08, params, &mut rng);
    network.seed(10, 5, &mut rng).unwrap();

    let mut known_disbelievers = vec![false; network.agent_count()];
    for _ in 0..50 {
        network.evolve_step(&mut rng);
        for agent in network.agents() {
            if known_disbelievers[agent.id] {
                assert_eq!(agent.attitude, Attitude::Disbeliever);
            } else if agent.attitude == Attitude::Disbeliever {
                known_disbelievers[agent.id] = true;
            }
        }
    }
}
