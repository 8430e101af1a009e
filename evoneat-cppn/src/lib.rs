//! # evoneat-cppn
//! A compositional pattern-producing network (CPPN) implementation of the
//! [`evoneat`] crate's `Genome` trait.
//!
//! Provides a [`CppnGenome`] type usable in `evoneat` `Population`s: a
//! directed graph of nodes with continuous activation functions and weighted
//! edges, grown by structural mutation. Genomes are also directly runnable as
//! networks; for repeated sampling they can be compiled into:
//! - [`RealTimeNetwork`]: flat arrays with the same step semantics as the genome.
//! - [`FunctionSampler`]: evaluates a network as a function of its inputs,
//!   running a fixed number of steps per sample.
//!
//! [`CppnGenome`]: crate::genomics::CppnGenome
//! [`RealTimeNetwork`]: crate::networks::RealTimeNetwork
//! [`FunctionSampler`]: crate::networks::FunctionSampler
//!
//! # Example usage: evolving a pattern with a bright centre
//! ```
//! use evoneat::{Population, PopulationConfig};
//! use evoneat_cppn::{
//!     genomics::{CppnGenome, GeneticConfig},
//!     networks::FunctionSampler,
//! };
//! use std::num::NonZeroUsize;
//!
//! // Rewards genomes whose output is 1 at the origin and 0 at the corners.
//! fn evaluate(genome: &CppnGenome) -> f32 {
//!     let mut sampler = FunctionSampler::<16>::from(genome);
//!     let centre = sampler.sample(&[0.0, 0.0, 1.0])[0];
//!     let corner = sampler.sample(&[1.0, 1.0, 1.0])[0];
//!     -(centre - 1.0).abs() - corner.abs()
//! }
//!
//! fn main() {
//!     let genetic_config = GeneticConfig::cppn(
//!         NonZeroUsize::new(3).unwrap(),
//!         NonZeroUsize::new(1).unwrap(),
//!     );
//!     let population_config = PopulationConfig {
//!         size: NonZeroUsize::new(50).unwrap(),
//!         seed: 7,
//!         ..PopulationConfig::default()
//!     };
//!     let prototype = CppnGenome::new(&genetic_config);
//!
//!     let mut population =
//!         Population::new(population_config, genetic_config, prototype, evaluate).unwrap();
//!     for _ in 0..10 {
//!         population.evolve(evaluate);
//!     }
//!     println!(
//!         "Best pattern ({}): {}",
//!         population.top_fitness(),
//!         serde_json::to_string(population.champion()).unwrap()
//!     );
//! }
//! ```

pub mod genomics;
pub mod networks;

/// Identifier of a node within a genome.
pub type NodeId = u32;

/// Identifier of an edge within a genome, derived
/// from its endpoints. See [`edge_id`].
///
/// [`edge_id`]: crate::genomics::edge_id
pub type EdgeId = u64;
