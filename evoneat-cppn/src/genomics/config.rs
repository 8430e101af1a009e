use crate::genomics::ActivationType;
use crate::NodeId;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for genome generation
/// and inter-genome operations.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0]. Using
/// values that are not in this bound may result
/// in odd behaviours and/or incorrect programs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneticConfig {
    /// Number of inputs in a genome.
    pub input_count: NonZeroUsize,
    /// Number of outputs in a genome.
    pub output_count: NonZeroUsize,
    /// Possible activation types for hidden nodes
    /// and activation mutations. If an empty vector
    /// is given, all [continuous] types are used.
    ///
    /// [continuous]: ActivationType::CONTINUOUS
    pub activation_types: Vec<ActivationType>,
    /// Activation type of output nodes in a new genome.
    pub output_activation: ActivationType,
    /// Highest usable node ID. Output nodes take the
    /// topmost IDs, so it must be at least
    /// `input_count + output_count - 1`.
    pub node_id_ceiling: NodeId,
    /// Maximum number of random IDs tried when
    /// allocating a new node before giving up.
    pub max_node_id_attempts: usize,
    /// Standard deviation of new edge weights.
    pub new_edge_std: f32,
    /// Standard deviation of weight perturbations.
    pub weight_mutation_power: f32,
    /// Chance of a structural expansion during mutation.
    pub expand_chance: f32,
    /// Chance of a node's activation type being
    /// replaced during mutation.
    pub activation_mutation_chance: f32,
    /// Chance that common edge weights are averaged during mating,
    /// instead of copying the weight from a randomly chosen parent.
    pub mate_by_averaging_chance: f32,
    /// Chance an edge is enabled in the offspring if it was
    /// disabled in either parent.
    pub reenable_chance: f32,
    /// Weight of non-matching edges in genetic distance.
    pub disjoint_coefficient: f32,
    /// Weight of the common edge weight difference in genetic distance.
    pub weight_coefficient: f32,
    /// Number of edges subtracted from the larger genome's
    /// size when normalizing the non-matching edge count.
    pub size_offset: usize,
}

impl GeneticConfig {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0, empty, or in the case of
    /// `NonZeroUsize`s, 1. Node IDs span the whole
    /// `u32` range and output nodes are sigmoidal.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to fill in unused values during
    /// configuration instantiation.
    ///
    /// # Examples
    /// ```
    /// use evoneat_cppn::genomics::GeneticConfig;
    ///
    /// let cfg1 = GeneticConfig::zero();
    ///
    /// let cfg2 = GeneticConfig {
    ///     // Specify some values here...
    ///     expand_chance: 1.0,
    ///     max_node_id_attempts: 8,
    ///     // Default the rest...
    ///     ..GeneticConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> GeneticConfig {
        GeneticConfig {
            input_count: NonZeroUsize::MIN,
            output_count: NonZeroUsize::MIN,
            activation_types: vec![],
            output_activation: ActivationType::Sigmoid,
            node_id_ceiling: NodeId::MAX,
            max_node_id_attempts: 0,
            new_edge_std: 0.0,
            weight_mutation_power: 0.0,
            expand_chance: 0.0,
            activation_mutation_chance: 0.0,
            mate_by_averaging_chance: 0.0,
            reenable_chance: 0.0,
            disjoint_coefficient: 0.0,
            weight_coefficient: 0.0,
            size_offset: 0,
        }
    }

    /// Returns a configuration suited to evolving pattern
    /// producers with the given interface.
    ///
    /// # Examples
    /// ```
    /// use evoneat_cppn::genomics::GeneticConfig;
    /// use std::num::NonZeroUsize;
    ///
    /// // (x, y, bias) -> (r, g, b)
    /// let config = GeneticConfig::cppn(
    ///     NonZeroUsize::new(3).unwrap(),
    ///     NonZeroUsize::new(3).unwrap(),
    /// );
    /// assert!(config.activation_types.is_empty());
    /// ```
    pub fn cppn(input_count: NonZeroUsize, output_count: NonZeroUsize) -> GeneticConfig {
        GeneticConfig {
            input_count,
            output_count,
            max_node_id_attempts: 32,
            new_edge_std: 1.0,
            weight_mutation_power: 0.5,
            expand_chance: 0.1,
            activation_mutation_chance: 0.05,
            mate_by_averaging_chance: 0.4,
            reenable_chance: 0.25,
            disjoint_coefficient: 1.0,
            weight_coefficient: 0.4,
            size_offset: 10,
            ..GeneticConfig::zero()
        }
    }

    /// Returns the activation types available to non-input nodes.
    pub fn hidden_activations(&self) -> &[ActivationType] {
        if self.activation_types.is_empty() {
            &ActivationType::CONTINUOUS
        } else {
            &self.activation_types
        }
    }
}
