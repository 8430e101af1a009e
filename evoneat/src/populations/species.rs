use super::organism::fitness_rank;
use super::{Organism, PopulationConfig};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Species identifier. Specifies
/// the generation in which the species
/// was born, and the count of other species
/// founded in the _same generation_ before
/// the one identified (i.e, if it was the
/// third species born in generation 5, it
/// will be species [5, 2]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpeciesID(pub usize, pub usize);

/// Species are collections of reproductively
/// compatible (within a certain [genetic distance])
/// organisms. Membership is determined by calculating
/// the genetic distance to a _prototype_, the best
/// member seen since the species was founded.
///
/// Species hold the indices of their members in the
/// population, not the members themselves.
///
/// Species will stagnate after [`stagnation_window`]
/// generations without improving their best fitness,
/// and will thereafter be penalized during reproduction
/// and become liable to extinction.
///
/// [genetic distance]: PopulationConfig::initial_threshold
/// [`stagnation_window`]: PopulationConfig::stagnation_window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Species {
    pub(super) id: SpeciesID,
    pub(super) members: Vec<usize>,
    pub(super) prototype: usize,
    pub(super) max_fitness: f32,
    pub(super) average_fitness: f32,
    pub(super) best_fitness: f32,
    pub(super) age: usize,
    pub(super) last_improvement: usize,
    pub(super) children: usize,
    pub(super) active: bool,
}

impl Species {
    /// Founds a species with a single member,
    /// which becomes its prototype.
    pub(super) fn new(id: SpeciesID, founder: usize, fitness: f32) -> Species {
        Species {
            id,
            members: vec![founder],
            prototype: founder,
            max_fitness: fitness,
            average_fitness: fitness,
            best_fitness: fitness_rank(fitness),
            age: 0,
            last_improvement: 0,
            children: 0,
            active: true,
        }
    }

    /// Adds an organism to the species. The organism
    /// becomes the prototype if it outperforms every
    /// current member.
    pub(super) fn add_genome(&mut self, index: usize, fitness: f32) {
        self.members.push(index);
        if fitness_rank(fitness) > fitness_rank(self.max_fitness) {
            self.prototype = index;
            self.max_fitness = fitness;
        }
    }

    /// Returns a uniformly chosen member, if any.
    pub(super) fn random_member<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        self.members.choose(rng).copied()
    }

    /// Recomputes maximum and average fitness, ages the
    /// species and records whether it improved.
    pub(super) fn update_fitness<G>(&mut self, organisms: &[Organism<G>]) {
        let mut max = f32::NEG_INFINITY;
        let mut sum = 0.0;
        let mut scored = 0;
        for &m in &self.members {
            let fitness = fitness_rank(organisms[m].fitness);
            max = max.max(fitness);
            if fitness.is_finite() {
                sum += fitness;
                scored += 1;
            }
        }
        self.max_fitness = max;
        self.average_fitness = if scored > 0 {
            sum / scored as f32
        } else {
            max
        };
        self.age += 1;
        if self.max_fitness > self.best_fitness {
            self.best_fitness = self.max_fitness;
            self.last_improvement = self.age;
        }
    }

    /// Assigns each member's shared fitness: its fitness above
    /// `floor` (0 unless some fitness is negative) divided by
    /// the species' size, boosted while the species is young
    /// and penalized while it is stagnated.
    pub(super) fn share_fitness<G>(
        &self,
        organisms: &mut [Organism<G>],
        config: &PopulationConfig,
        floor: f32,
    ) {
        let mut factor = 1.0 / self.members.len() as f32;
        if self.age < config.young_age {
            factor *= config.young_bonus;
        }
        if self.time_stagnated() > config.stagnation_window {
            factor *= config.stagnation_penalty;
        }
        for &m in &self.members {
            // f32::max discards NaN.
            let baseline = (organisms[m].fitness - floor).max(0.0);
            organisms[m].shared_fitness = baseline * factor;
        }
    }

    /// Culls the worst members of the species. `carry` is the
    /// fractional death quota left over by previous species;
    /// the fraction left over by this one is returned.
    pub(super) fn decay<G>(
        &mut self,
        organisms: &mut [Organism<G>],
        dead: &mut Vec<usize>,
        death_rate: f32,
        carry: f32,
    ) -> f32 {
        self.members
            .sort_by(|&a, &b| organisms[a].cmp_by_fitness(&organisms[b]));

        let quota = death_rate * self.members.len() as f32 + carry;
        let kills = (quota.floor() as usize).min(self.members.len());
        for _ in 0..kills {
            if let Some(m) = self.members.pop() {
                organisms[m].dead = true;
                dead.push(m);
            }
        }

        if organisms[self.prototype].dead {
            if let Some(&best) = self.members.first() {
                self.prototype = best;
                self.max_fitness = organisms[best].fitness;
            }
        }

        quota - quota.floor()
    }

    /// Converts the members' fractional quotas into a whole number
    /// of children, returning the fraction left for the next species.
    pub(super) fn count_offspring<G>(&mut self, organisms: &[Organism<G>], carry: f32) -> f32 {
        let sum = self
            .members
            .iter()
            .map(|&m| organisms[m].children)
            .sum::<f32>()
            + carry;
        let whole = sum.floor();
        self.children = whole as usize;
        sum - whole
    }

    /// Checks whether the species dies out this generation.
    ///
    /// Young and improving species are protected. Otherwise,
    /// a species without offspring (or without members) has all
    /// of its members killed and is deactivated.
    pub(super) fn extinction<G>(
        &mut self,
        organisms: &mut [Organism<G>],
        dead: &mut Vec<usize>,
        config: &PopulationConfig,
    ) -> bool {
        if self.members.is_empty() {
            self.active = false;
            return true;
        }
        if self.age < config.young_age || self.time_stagnated() <= config.stagnation_window {
            return false;
        }
        if self.children > 0 {
            return false;
        }
        for m in self.members.drain(..) {
            organisms[m].dead = true;
            dead.push(m);
        }
        self.active = false;
        true
    }

    /// Returns the species' ID.
    pub fn id(&self) -> SpeciesID {
        self.id
    }

    /// Returns the population indices of the species' members.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Returns the population index of the species' prototype.
    pub fn prototype(&self) -> usize {
        self.prototype
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns whether the species has no members left.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns the species' current maximum raw fitness.
    pub fn max_fitness(&self) -> f32 {
        self.max_fitness
    }

    /// Returns the average raw fitness of the species'
    /// scored members.
    pub fn average_fitness(&self) -> f32 {
        self.average_fitness
    }

    /// Returns the species' age in generations.
    pub fn age(&self) -> usize {
        self.age
    }

    /// Returns the number of generations since
    /// the species last improved its best fitness.
    pub fn time_stagnated(&self) -> usize {
        self.age - self.last_improvement
    }

    /// Returns the number of children assigned
    /// to the species this generation.
    pub fn children(&self) -> usize {
        self.children
    }

    /// Returns whether the species has died out.
    pub fn is_extinct(&self) -> bool {
        !self.active
    }
}
