use evoneat::{Population, PopulationConfig};
use evoneat_cppn::genomics::{CppnGenome, GeneticConfig};
use evoneat_cppn::networks::FunctionSampler;

use std::num::NonZeroUsize;

fn genetic_config() -> GeneticConfig {
    GeneticConfig {
        expand_chance: 0.3,
        activation_mutation_chance: 0.1,
        ..GeneticConfig::cppn(NonZeroUsize::new(3).unwrap(), NonZeroUsize::new(1).unwrap())
    }
}

fn population_config(seed: u64) -> PopulationConfig {
    PopulationConfig {
        size: NonZeroUsize::new(10).unwrap(),
        seed,
        mutation_rate: 0.3,
        crossover_chance: 0.5,
        interspecies_mating_chance: 0.05,
        death_rate: 0.25,
        young_age: 2,
        young_bonus: 1.2,
        stagnation_window: 3,
        stagnation_penalty: 0.5,
        initial_threshold: 0.5,
        threshold_step: 0.05,
        target_species: 3,
        threshold_warmup: 1,
    }
}

/// Rewards outputs close to 1 at the point (1, 1, 1).
fn evaluate(genome: &CppnGenome) -> f32 {
    let mut sampler = FunctionSampler::<16>::from(genome);
    -(sampler.sample(&[1.0, 1.0, 1.0])[0] - 1.0).abs()
}

fn new_population(seed: u64) -> Population<GeneticConfig, CppnGenome> {
    let genetic_config = genetic_config();
    let prototype = CppnGenome::new(&genetic_config);
    Population::new(population_config(seed), genetic_config, prototype, evaluate).unwrap()
}

#[test]
fn short_run_keeps_invariants() {
    let mut population = new_population(42);
    let mut best = population.top_fitness();
    assert!(best.is_finite());

    for generation in 1..=5 {
        population.evolve(evaluate);

        assert_eq!(population.generation(), generation);
        assert!(population.top_fitness() >= best);
        best = population.top_fitness();

        assert!((1..=10).contains(&population.num_species()));
        assert_eq!(population.size(), 10);
        assert!(population.organisms().all(|o| !o.is_dead()));
        let members: usize = population.species().map(|s| s.len()).sum();
        assert_eq!(members, 10);
    }
    assert_eq!(evaluate(population.champion()), population.top_fitness());
}

#[test]
fn parallel_run_matches_sequential() {
    let mut sequential = new_population(7);
    let genetic_config = genetic_config();
    let prototype = CppnGenome::new(&genetic_config);
    let mut parallel =
        Population::par_new(population_config(7), genetic_config, prototype, evaluate).unwrap();

    for _ in 0..5 {
        sequential.evolve(evaluate);
        parallel.par_evolve(evaluate);
    }
    assert_eq!(sequential.champion(), parallel.champion());
    assert_eq!(sequential.top_fitness(), parallel.top_fitness());
    assert_eq!(sequential.num_species(), parallel.num_species());
    assert!(sequential
        .organisms()
        .zip(parallel.organisms())
        .all(|(a, b)| a.genome() == b.genome() && a.fitness() == b.fitness()));
}

#[test]
fn different_seeds_diverge() {
    let mut a = new_population(1);
    let mut b = new_population(2);
    for _ in 0..3 {
        a.evolve(evaluate);
        b.evolve(evaluate);
    }
    assert!(a
        .organisms()
        .zip(b.organisms())
        .any(|(a, b)| a.genome() != b.genome()));
}

#[test]
fn negative_and_nan_fitness_are_tolerated() {
    let mut population = new_population(5);
    // Scores every genome either negatively or not at all.
    let harsh = |genome: &CppnGenome| {
        let fitness = evaluate(genome) - 100.0;
        if genome.enabled_edge_count() % 2 == 0 {
            f32::NAN
        } else {
            fitness
        }
    };
    for _ in 0..5 {
        population.evolve(harsh);
        assert!(!population.top_fitness().is_nan());
        assert!(population.organisms().all(|o| !o.is_dead()));
    }
}
