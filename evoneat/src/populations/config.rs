use super::PopulationError;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for population generation
/// and evolution.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0]. This is
/// checked by [`validate`] when the population
/// is created.
///
/// [`validate`]: PopulationConfig::validate
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Size of the population. Every generation
    /// ends with exactly this many living organisms.
    pub size: NonZeroUsize,
    /// Seed of the population's random number generator.
    /// Runs with equal seeds, configurations and evaluators
    /// are identical.
    pub seed: u64,
    /// Per-parameter mutation probability passed to
    /// [`Genome::mutate`] for every offspring.
    ///
    /// [`Genome::mutate`]: crate::Genome::mutate
    pub mutation_rate: f32,
    /// Chance that offspring will be the result
    /// of crossover (as opposed to mutation only).
    pub crossover_chance: f32,
    /// Chance that the second parent is taken
    /// from a different species.
    pub interspecies_mating_chance: f32,
    /// Fraction of each species culled every generation.
    pub death_rate: f32,
    /// Species younger than this (in generations) get
    /// the [`young_bonus`] and are protected from extinction.
    ///
    /// [`young_bonus`]: PopulationConfig::young_bonus
    pub young_age: usize,
    /// Shared fitness multiplier for young species.
    pub young_bonus: f32,
    /// Number of generations without a fitness increase
    /// before a species is considered _stagnated_.
    pub stagnation_window: usize,
    /// Shared fitness multiplier for stagnated species.
    pub stagnation_penalty: f32,
    /// Initial genetic distance threshold, beyond which
    /// genomes are considered as belonging to
    /// different species.
    pub initial_threshold: f32,
    /// Amount by which the threshold is moved each generation.
    pub threshold_step: f32,
    /// Desired amount of species in the population.
    pub target_species: usize,
    /// Number of generations during which the
    /// threshold is held constant.
    pub threshold_warmup: usize,
}

impl PopulationConfig {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0, or in the case of
    /// `NonZeroUsize`s, 1.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to abbreviate configuration
    /// instantiation, or to fill in unused values.
    ///
    /// # Examples
    /// ```
    /// use evoneat::PopulationConfig;
    ///
    /// let cfg1 = PopulationConfig::zero();
    ///
    /// let cfg2 = PopulationConfig {
    ///     // Specify some values here...
    ///     death_rate: 0.5,
    ///     // Default the rest...
    ///     ..PopulationConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> PopulationConfig {
        PopulationConfig {
            size: NonZeroUsize::MIN,
            seed: 0,
            mutation_rate: 0.0,
            crossover_chance: 0.0,
            interspecies_mating_chance: 0.0,
            death_rate: 0.0,
            young_age: 0,
            young_bonus: 1.0,
            stagnation_window: 0,
            stagnation_penalty: 1.0,
            initial_threshold: 0.0,
            threshold_step: 0.0,
            target_species: 0,
            threshold_warmup: 0,
        }
    }

    /// Checks that all rates and probabilities are within range.
    ///
    /// # Errors
    /// Returns [`PopulationError::InvalidConfig`] naming
    /// the first offending field.
    ///
    /// # Examples
    /// ```
    /// use evoneat::PopulationConfig;
    ///
    /// assert!(PopulationConfig::default().validate().is_ok());
    ///
    /// let config = PopulationConfig {
    ///     death_rate: 1.5,
    ///     ..PopulationConfig::default()
    /// };
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), PopulationError> {
        let probabilities = [
            ("mutation_rate", self.mutation_rate),
            ("crossover_chance", self.crossover_chance),
            ("interspecies_mating_chance", self.interspecies_mating_chance),
            ("death_rate", self.death_rate),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(PopulationError::InvalidConfig(field));
            }
        }

        let non_negatives = [
            ("young_bonus", self.young_bonus),
            ("stagnation_penalty", self.stagnation_penalty),
            ("initial_threshold", self.initial_threshold),
            ("threshold_step", self.threshold_step),
        ];
        for (field, value) in non_negatives {
            if !value.is_finite() || value < 0.0 {
                return Err(PopulationError::InvalidConfig(field));
            }
        }

        Ok(())
    }
}

impl Default for PopulationConfig {
    fn default() -> PopulationConfig {
        PopulationConfig {
            size: NonZeroUsize::new(150).unwrap_or(NonZeroUsize::MIN),
            seed: 0,
            mutation_rate: 0.2,
            crossover_chance: 0.6,
            interspecies_mating_chance: 0.02,
            death_rate: 0.25,
            young_age: 10,
            young_bonus: 1.2,
            stagnation_window: 15,
            stagnation_penalty: 0.5,
            initial_threshold: 1.0,
            threshold_step: 0.05,
            target_species: 8,
            threshold_warmup: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_valid() {
        assert!(PopulationConfig::zero().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let config = PopulationConfig {
            crossover_chance: -0.1,
            ..PopulationConfig::default()
        };
        match config.validate() {
            Err(PopulationError::InvalidConfig(field)) => assert_eq!(field, "crossover_chance"),
            other => panic!("unexpected validation result {:?}", other),
        }
    }

    #[test]
    fn rejects_nan_threshold() {
        let config = PopulationConfig {
            initial_threshold: f32::NAN,
            ..PopulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn loads_from_json() {
        let config: PopulationConfig = serde_json::from_str(
            r#"{
                "size": 10,
                "seed": 42,
                "mutation_rate": 0.3,
                "crossover_chance": 0.5,
                "interspecies_mating_chance": 0.01,
                "death_rate": 0.25,
                "young_age": 5,
                "young_bonus": 1.5,
                "stagnation_window": 10,
                "stagnation_penalty": 0.5,
                "initial_threshold": 0.8,
                "threshold_step": 0.1,
                "target_species": 3,
                "threshold_warmup": 2
            }"#,
        )
        .unwrap();
        assert_eq!(config.size.get(), 10);
        assert_eq!(config.seed, 42);
        assert!(config.validate().is_ok());
    }
}
