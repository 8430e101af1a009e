//! A Population is a fixed-size collection of organisms.
//! These are grouped into species, which are evolved
//! using a genome evaluation function as the source
//! of selective pressure.
mod config;
mod errors;
mod evaluation;
pub mod logging;
mod newborns;
mod organism;
mod species;

use crate::Genome;
pub use config::PopulationConfig;
pub use errors::PopulationError;
use evaluation::{Evaluator, Parallel, Sequential};
use newborns::NewbornQueue;
use organism::fitness_rank;
pub use organism::Organism;
pub use species::{Species, SpeciesID};

use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// A population of organisms.
///
/// The population owns every organism, the species list,
/// and the random number generator driving evolution.
/// Organisms never change slot: dead slots are collected
/// into a pool and refilled with offspring each generation.
///
/// # Fitness
/// Fitness may be any real number, higher being better.
/// Non-negative scores are shared as they are. If any living
/// organism scores below zero, every score is shifted up by
/// the lowest one, so negative scores need no special treatment.
/// `NaN` ranks below every real fitness, and is never
/// recorded as the champion's.
pub struct Population<C, G> {
    organisms: Vec<Organism<G>>,
    species: Vec<Species>,
    newborns: NewbornQueue,
    dead: Vec<usize>,
    scratch: G,
    champion: G,
    top_fitness: f32,
    threshold: f32,
    generation: usize,
    rng: ChaCha8Rng,
    population_config: PopulationConfig,
    genetic_config: C,
}

impl<C, G> Population<C, G>
where
    G: Genome<Config = C>,
{
    /// Creates a new population of randomized copies of `prototype`,
    /// scores them with `evaluator` and sorts them into species.
    ///
    /// The type of `genetic_config` depends on the implementation
    /// of [`Genome`], and is effectively opaque to the population.
    ///
    /// # Errors
    /// Returns an error if `population_config` fails [validation].
    ///
    /// [`Genome`]: crate::Genome
    /// [validation]: PopulationConfig::validate
    ///
    /// # Examples
    /// ```
    /// use evoneat::{ParameterConfig, ParameterVector, Population, PopulationConfig};
    /// use std::num::NonZeroUsize;
    ///
    /// let genetic_config = ParameterConfig { length: 4, initial_std: 1.0, mutation_power: 0.2 };
    /// let prototype = ParameterVector::new(&genetic_config);
    ///
    /// let population = Population::new(
    ///     PopulationConfig {
    ///         size: NonZeroUsize::new(30).unwrap(),
    ///         ..PopulationConfig::default()
    ///     },
    ///     genetic_config,
    ///     prototype,
    ///     |g: &ParameterVector| -g.values().iter().map(|v| v.abs()).sum::<f32>(),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(population.size(), 30);
    /// assert!(population.num_species() >= 1);
    /// ```
    pub fn new<F>(
        population_config: PopulationConfig,
        genetic_config: C,
        prototype: G,
        evaluator: F,
    ) -> Result<Population<C, G>, PopulationError>
    where
        F: FnMut(&G) -> f32,
    {
        Population::build(
            population_config,
            genetic_config,
            prototype,
            &mut Sequential(evaluator),
        )
    }

    /// Same as [`new`], but scores the initial organisms
    /// in parallel. The resulting population is identical.
    ///
    /// [`new`]: Population::new
    pub fn par_new<F>(
        population_config: PopulationConfig,
        genetic_config: C,
        prototype: G,
        evaluator: F,
    ) -> Result<Population<C, G>, PopulationError>
    where
        G: Sync,
        F: Fn(&G) -> f32 + Sync,
    {
        Population::build(
            population_config,
            genetic_config,
            prototype,
            &mut Parallel(evaluator),
        )
    }

    fn build<E: Evaluator<G>>(
        population_config: PopulationConfig,
        genetic_config: C,
        prototype: G,
        evaluator: &mut E,
    ) -> Result<Population<C, G>, PopulationError> {
        population_config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(population_config.seed);
        let organisms = (0..population_config.size.get())
            .map(|i| {
                let mut genome = prototype.clone();
                genome.randomize(&mut rng, &genetic_config);
                Organism::new(i, genome)
            })
            .collect();

        let mut population = Population {
            organisms,
            species: vec![],
            newborns: NewbornQueue::default(),
            dead: vec![],
            scratch: prototype.clone(),
            champion: prototype,
            top_fitness: f32::NEG_INFINITY,
            threshold: population_config.initial_threshold,
            generation: 0,
            rng,
            population_config,
            genetic_config,
        };

        let slots: Vec<usize> = (0..population.organisms.len()).collect();
        population.welcome_newborns(evaluator, &slots);
        population.speciate();
        Ok(population)
    }

    /// Advances the population by one generation.
    ///
    /// Species are re-evaluated and culled, the freed
    /// slots are refilled with offspring of the survivors,
    /// and the offspring are scored with `evaluator`
    /// and assigned to species.
    ///
    /// Fitness sharing uses each organism's raw fitness, shifted
    /// up by the lowest finite fitness in the population when that
    /// is negative (`NaN` counting as no fitness at all), so that
    /// any real-valued evaluator can be used.
    ///
    /// All offspring are bred before any of them is scored. Slots
    /// left over after species reproduction are therefore refilled
    /// from the champion as of the end of the previous generation.
    ///
    /// # Examples
    /// ```
    /// use evoneat::{ParameterConfig, ParameterVector, Population, PopulationConfig};
    ///
    /// let genetic_config = ParameterConfig { length: 2, initial_std: 1.0, mutation_power: 0.2 };
    /// let prototype = ParameterVector::new(&genetic_config);
    /// let fitness = |g: &ParameterVector| -g.values().iter().map(|v| (v - 1.0).abs()).sum::<f32>();
    ///
    /// let mut population =
    ///     Population::new(PopulationConfig::default(), genetic_config, prototype, fitness).unwrap();
    ///
    /// let before = population.top_fitness();
    /// for _ in 0..5 {
    ///     population.evolve(fitness);
    /// }
    /// assert_eq!(population.generation(), 5);
    /// assert!(population.top_fitness() >= before);
    /// ```
    pub fn evolve<F>(&mut self, evaluator: F)
    where
        F: FnMut(&G) -> f32,
    {
        self.step(&mut Sequential(evaluator));
    }

    /// Same as [`evolve`], but scores offspring in parallel
    /// on rayon's thread pool. For a pure evaluator the
    /// resulting population is identical.
    ///
    /// [`evolve`]: Population::evolve
    pub fn par_evolve<F>(&mut self, evaluator: F)
    where
        G: Sync,
        F: Fn(&G) -> f32 + Sync,
    {
        self.step(&mut Parallel(evaluator));
    }

    fn step<E: Evaluator<G>>(&mut self, evaluator: &mut E) {
        self.generation += 1;
        self.update_fitness();
        self.eliminate_species();
        self.calculate_children();
        let reborn = self.create_offspring();
        self.welcome_newborns(evaluator, &reborn);
        self.speciate();
        self.adjust_threshold();
        debug!(
            generation = self.generation,
            species = self.species.len(),
            reborn = reborn.len(),
            top_fitness = self.top_fitness,
            "generation complete"
        );
    }

    /// Ages organisms, refreshes species statistics,
    /// shares fitness and culls every species.
    fn update_fitness(&mut self) {
        for organism in self.organisms.iter_mut().filter(|o| !o.dead) {
            organism.age += 1;
        }
        let floor = self.fitness_floor();

        for species in &mut self.species {
            species.update_fitness(&self.organisms);
        }
        self.species.sort_by(|a, b| {
            fitness_rank(b.average_fitness).total_cmp(&fitness_rank(a.average_fitness))
        });

        let mut carry = 0.0;
        for species in &mut self.species {
            species.share_fitness(&mut self.organisms, &self.population_config, floor);
            carry = species.decay(
                &mut self.organisms,
                &mut self.dead,
                self.population_config.death_rate,
                carry,
            );
        }
    }

    /// Lowest finite fitness among living organisms,
    /// or 0 if none is negative.
    fn fitness_floor(&self) -> f32 {
        self.organisms
            .iter()
            .filter(|o| !o.dead && o.fitness.is_finite())
            .map(|o| o.fitness)
            .fold(0.0, f32::min)
    }

    /// Removes extinct species after killing their members.
    fn eliminate_species(&mut self) {
        let mut extinct = vec![];
        for (i, species) in self.species.iter_mut().enumerate() {
            if species.extinction(&mut self.organisms, &mut self.dead, &self.population_config) {
                debug!(
                    species = ?species.id(),
                    generation = self.generation,
                    "species went extinct"
                );
                extinct.push(i);
            }
        }
        for i in extinct.into_iter().rev() {
            self.species.remove(i);
        }
    }

    /// Distributes the dead slots among living organisms
    /// proportionally to shared fitness, then converts the
    /// fractional quotas into whole children per species.
    fn calculate_children(&mut self) {
        let vacancies = self.dead.len() as f32;
        let alive = self.organisms.len() - self.dead.len();

        let total: f32 = self
            .organisms
            .iter()
            .filter(|o| !o.dead)
            .map(|o| o.shared_fitness)
            .sum();
        let uniform = if alive > 0 {
            vacancies / alive as f32
        } else {
            0.0
        };
        let aug = if total > 0.0 && total.is_finite() {
            Some(vacancies / total)
        } else {
            None
        };

        for organism in &mut self.organisms {
            organism.children = match (organism.dead, aug) {
                (true, _) => 0.0,
                (false, Some(aug)) => organism.shared_fitness * aug,
                (false, None) => uniform,
            };
        }

        let mut carry = 0.0;
        for species in &mut self.species {
            carry = species.count_offspring(&self.organisms, carry);
        }
    }

    /// Refills every dead slot, returning the slots reborn.
    ///
    /// Species breed into the pool up to their quota; slots
    /// left over are filled with randomized copies of the champion.
    /// Nothing is scored here, so that champion is the one
    /// recorded before this generation.
    fn create_offspring(&mut self) -> Vec<usize> {
        let mut reborn = Vec::with_capacity(self.dead.len());
        for s in 0..self.species.len() {
            if self.species[s].is_empty() {
                continue;
            }
            for _ in 0..self.species[s].children {
                match self.dead.pop() {
                    Some(slot) => {
                        self.procreate(s, slot);
                        reborn.push(slot);
                    }
                    None => break,
                }
            }
        }

        while let Some(slot) = self.dead.pop() {
            self.scratch.overwrite(&self.champion);
            self.scratch.randomize(&mut self.rng, &self.genetic_config);
            self.organisms[slot].update(&self.scratch, f32::NAN);
            reborn.push(slot);
        }
        reborn
    }

    /// Breeds a child of species `species` into `slot`.
    fn procreate(&mut self, species: usize, slot: usize) {
        let mom = match self.species[species].random_member(&mut self.rng) {
            Some(mom) => mom,
            None => return,
        };
        let config = &self.population_config;

        if self.rng.gen::<f32>() < config.crossover_chance {
            let foreign = if self.rng.gen::<f32>() < config.interspecies_mating_chance {
                foreign_prototype(&self.species, species, &mut self.rng)
            } else {
                None
            };
            let dad = match foreign {
                Some(dad) => dad,
                None => self.species[species]
                    .random_member(&mut self.rng)
                    .unwrap_or(mom),
            };

            let (dominant, recessive) = if fitness_rank(self.organisms[dad].fitness)
                > fitness_rank(self.organisms[mom].fitness)
            {
                (dad, mom)
            } else {
                (mom, dad)
            };
            self.scratch.overwrite(&self.organisms[dominant].genome);
            self.scratch.crossover(
                &mut self.rng,
                &self.organisms[recessive].genome,
                &self.genetic_config,
            );
        } else {
            self.scratch.overwrite(&self.organisms[mom].genome);
        }

        self.scratch
            .mutate(&mut self.rng, config.mutation_rate, &self.genetic_config);
        self.organisms[slot].update(&self.scratch, f32::NAN);
    }

    /// Scores the organisms in `slots`, records any new
    /// champion and queues them for speciation.
    fn welcome_newborns<E: Evaluator<G>>(&mut self, evaluator: &mut E, slots: &[usize]) {
        let scores = evaluator.score(&self.organisms, slots);
        for (&slot, fitness) in slots.iter().zip(scores) {
            let organism = &mut self.organisms[slot];
            organism.fitness = fitness;
            organism.dead = false;
            if fitness_rank(fitness) > self.top_fitness {
                self.top_fitness = fitness;
                self.champion.overwrite(&organism.genome);
            }
            self.newborns.push(slot, fitness);
        }
    }

    /// Assigns queued newborns to species, best first.
    fn speciate(&mut self) {
        let mut founded = 0;
        while let Some(newborn) = self.newborns.pop() {
            let genome = &self.organisms[newborn.index].genome;
            let compatible = self.species.iter().position(|s| {
                genome.compare(&self.organisms[s.prototype].genome, &self.genetic_config)
                    < self.threshold
            });
            match compatible {
                Some(s) => self.species[s].add_genome(newborn.index, newborn.fitness),
                None => {
                    let id = SpeciesID(self.generation, founded);
                    founded += 1;
                    debug!(
                        species = ?id,
                        pending = self.newborns.len(),
                        "founded species"
                    );
                    self.species
                        .push(Species::new(id, newborn.index, newborn.fitness));
                }
            }
        }
    }

    /// Steers the compatibility threshold
    /// towards the target species count.
    fn adjust_threshold(&mut self) {
        let config = &self.population_config;
        if self.generation < config.threshold_warmup {
            return;
        }
        let count = self.species.len();
        if count > config.target_species {
            self.threshold += config.threshold_step;
        } else if count < config.target_species {
            self.threshold = (self.threshold - config.threshold_step).max(0.0);
        } else {
            return;
        }
        debug!(
            threshold = self.threshold,
            species = count,
            "adjusted compatibility threshold"
        );
    }

    /// Returns the best genome ever evaluated.
    ///
    /// Before any organism has received a real fitness,
    /// this is the prototype the population was created with.
    pub fn champion(&self) -> &G {
        &self.champion
    }

    /// Returns the champion's fitness, or negative
    /// infinity if no real fitness has been seen.
    pub fn top_fitness(&self) -> f32 {
        self.top_fitness
    }

    /// Returns the current generation number.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns the current compatibility threshold.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Returns an iterator over all current species.
    ///
    /// # Examples
    /// ```
    /// use evoneat::{ParameterConfig, ParameterVector, Population, PopulationConfig};
    ///
    /// let genetic_config = ParameterConfig { length: 2, initial_std: 1.0, mutation_power: 0.2 };
    /// let prototype = ParameterVector::new(&genetic_config);
    /// let population =
    ///     Population::new(PopulationConfig::default(), genetic_config, prototype, |_| 1.0).unwrap();
    ///
    /// for species in population.species() {
    ///     println!("Species {:?} has {} members", species.id(), species.len());
    /// }
    /// ```
    pub fn species(&self) -> impl Iterator<Item = &Species> {
        self.species.iter()
    }

    /// Returns the number of species in the population.
    pub fn num_species(&self) -> usize {
        self.species.len()
    }

    /// Returns an iterator over all organisms, in slot order.
    pub fn organisms(&self) -> impl Iterator<Item = &Organism<G>> {
        self.organisms.iter()
    }

    /// Returns the organism in slot `index`, if any.
    pub fn organism(&self, index: usize) -> Option<&Organism<G>> {
        self.organisms.get(index)
    }

    /// Returns the number of organisms in the population.
    pub fn size(&self) -> usize {
        self.organisms.len()
    }

    pub fn population_config(&self) -> &PopulationConfig {
        &self.population_config
    }

    pub fn genetic_config(&self) -> &C {
        &self.genetic_config
    }
}

/// Picks the prototype of a random non-empty species
/// other than `own`.
fn foreign_prototype<R: Rng + ?Sized>(
    species: &[Species],
    own: usize,
    rng: &mut R,
) -> Option<usize> {
    species
        .iter()
        .enumerate()
        .filter(|(i, s)| *i != own && !s.is_empty())
        .map(|(_, s)| s.prototype)
        .choose(rng)
}
