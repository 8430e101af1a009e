//! A speciating evolutionary engine in the style of
//! NeuroEvolution of Augmenting Topologies (NEAT).
//!
//! The engine is generic over the evolved representation through the
//! [`Genome`] trait. Organisms are grouped into species by genetic distance,
//! share fitness within their species, and are culled and replaced in place
//! every generation. A compositional pattern-producing network genome is
//! supplied by the `evoneat-cppn` crate; a plain [`ParameterVector`] genome is
//! included here for simple parameter searches.
//!
//! Evolution is fully determined by [`PopulationConfig::seed`]: two runs with
//! the same configuration and a pure fitness function produce the same
//! population, whether offspring are scored sequentially or in parallel.
//!
//! # Example usage: minimizing distance to a target vector
//! ```
//! use evoneat::{ParameterConfig, ParameterVector, Population, PopulationConfig};
//! use std::num::NonZeroUsize;
//!
//! const TARGET: [f32; 3] = [0.5, -1.0, 2.0];
//!
//! fn evaluate(genome: &ParameterVector) -> f32 {
//!     -genome
//!         .values()
//!         .iter()
//!         .zip(TARGET)
//!         .map(|(v, t)| (v - t).powi(2))
//!         .sum::<f32>()
//! }
//!
//! fn main() {
//!     let genetic_config = ParameterConfig {
//!         length: TARGET.len(),
//!         initial_std: 1.0,
//!         mutation_power: 0.25,
//!     };
//!     let population_config = PopulationConfig {
//!         size: NonZeroUsize::new(60).unwrap(),
//!         seed: 2021,
//!         ..PopulationConfig::default()
//!     };
//!     let prototype = ParameterVector::new(&genetic_config);
//!
//!     let mut population =
//!         Population::new(population_config, genetic_config, prototype, evaluate).unwrap();
//!     for _ in 0..30 {
//!         if population.top_fitness() > -0.01 {
//!             println!("Solution found!: {:?}", population.champion().values());
//!             break;
//!         }
//!         population.evolve(evaluate);
//!     }
//! }
//! ```

mod genome;
mod populations;

pub use genome::*;
pub use populations::*;
