use crate::Genome;

use serde::{Deserialize, Serialize};

use std::cmp::Ordering;

/// A member of a population: a genome together
/// with its fitness and reproductive bookkeeping.
///
/// Organisms occupy a fixed slot in the population
/// for its entire lifetime. When an organism dies,
/// its slot is later reused for a newborn through
/// [`update`], without moving or reallocating it.
///
/// [`update`]: Organism::update
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Organism<G> {
    pub(super) index: usize,
    pub(super) genome: G,
    pub(super) fitness: f32,
    pub(super) shared_fitness: f32,
    pub(super) children: f32,
    pub(super) age: usize,
    pub(super) dead: bool,
}

impl<G> Organism<G> {
    /// Wraps a genome into an unscored organism
    /// occupying slot `index`.
    pub(super) fn new(index: usize, genome: G) -> Organism<G> {
        Organism {
            index,
            genome,
            fitness: f32::NAN,
            shared_fitness: 0.0,
            children: 0.0,
            age: 0,
            dead: false,
        }
    }

    /// Replaces the organism's genome with a copy of `genome`
    /// and resets its bookkeeping. The slot is alive afterwards.
    pub(super) fn update(&mut self, genome: &G, fitness: f32)
    where
        G: Genome,
    {
        self.genome.overwrite(genome);
        self.fitness = fitness;
        self.shared_fitness = 0.0;
        self.children = 0.0;
        self.age = 0;
        self.dead = false;
    }

    /// Orders organisms by decreasing shared fitness,
    /// falling back to increasing slot index.
    pub(super) fn cmp_by_fitness(&self, other: &Organism<G>) -> Ordering {
        fitness_rank(other.shared_fitness)
            .total_cmp(&fitness_rank(self.shared_fitness))
            .then_with(|| self.index.cmp(&other.index))
    }

    /// Returns the organism's slot in the population.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the organism's genome.
    pub fn genome(&self) -> &G {
        &self.genome
    }

    /// Returns the raw fitness assigned by the evaluator.
    /// `NaN` until the organism has been scored.
    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    /// Returns the fitness used for selection, after sharing
    /// with the rest of the organism's species.
    pub fn shared_fitness(&self) -> f32 {
        self.shared_fitness
    }

    /// Returns the organism's fractional offspring quota.
    pub fn children(&self) -> f32 {
        self.children
    }

    /// Returns the number of generations the organism has survived.
    pub fn age(&self) -> usize {
        self.age
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }
}

/// Maps a fitness to a totally ordered value,
/// sending `NaN` below every real fitness.
pub(crate) fn fitness_rank(fitness: f32) -> f32 {
    if fitness.is_nan() {
        f32::NEG_INFINITY
    } else {
        fitness
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParameterVector;

    #[test]
    fn update_resets_bookkeeping() {
        let mut organism = Organism::new(3, ParameterVector::from(vec![0.0; 2]));
        organism.shared_fitness = 4.0;
        organism.children = 1.5;
        organism.age = 7;
        organism.dead = true;

        organism.update(&ParameterVector::from(vec![1.0, 2.0]), 9.0);

        assert_eq!(organism.genome().values(), &[1.0, 2.0]);
        assert_eq!(organism.fitness(), 9.0);
        assert_eq!(organism.shared_fitness(), 0.0);
        assert_eq!(organism.children(), 0.0);
        assert_eq!(organism.age(), 0);
        assert!(!organism.is_dead());
        assert_eq!(organism.index(), 3);
    }

    #[test]
    fn ordering_is_descending_by_shared_fitness() {
        let mut organisms: Vec<_> = [1.0, f32::NAN, 3.0, 1.0]
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let mut o = Organism::new(i, ParameterVector::from(vec![]));
                o.shared_fitness = *f;
                o
            })
            .collect();
        organisms.sort_by(Organism::cmp_by_fitness);
        let order: Vec<usize> = organisms.iter().map(Organism::index).collect();
        assert_eq!(order, [2, 0, 3, 1]);
    }

    #[test]
    fn nan_ranks_last() {
        assert!(fitness_rank(f32::NAN) < fitness_rank(f32::MIN));
        assert_eq!(fitness_rank(-2.5), -2.5);
    }
}
