//! Genomes are the focus of evolution.
//! A [`CppnGenome`] is a directed graph of nodes and weighted edges
//! that is instantiated as a compositional pattern-producing network.
//! Genomes grow by structural mutation, adding edges and splitting
//! existing edges with new nodes.

mod config;
mod edges;
mod errors;
mod nodes;

pub use config::GeneticConfig;
pub use edges::{edge_endpoints, edge_id, Edge};
pub use errors::GenomeError;
pub use nodes::{ActivationType, Node};

use crate::networks::Network;
use crate::{EdgeId, NodeId};

use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal, StandardNormal};
use serde::{Deserialize, Serialize};
use tracing::trace;

use std::collections::BTreeMap;
use std::fmt;

/// The outcome of a structural expansion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expansion {
    /// A new edge was inserted.
    Added(EdgeId),
    /// A disabled edge was enabled again.
    Reenabled(EdgeId),
    /// An enabled edge was split by a new node.
    Split { edge: EdgeId, node: NodeId },
    /// An enabled edge was to be split, but no free node ID was found.
    Abandoned(EdgeId),
}

/// A mutable graph of nodes and edges.
///
/// Nodes and edges are kept in ordered tables,
/// so every traversal (and therefore every random
/// draw made during one) happens in ID order.
///
/// Suports Serde for convenient genome saving and loading.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CppnGenome {
    nodes: BTreeMap<NodeId, Node>,
    edges: BTreeMap<EdgeId, Edge>,
    inputs: Box<[NodeId]>,
    outputs: Box<[NodeId]>,
}

impl CppnGenome {
    /// Create a new, unconnected genome with the specified configuration.
    ///
    /// Input nodes take the IDs `0..input_count`, and output node `i`
    /// takes the ID `node_id_ceiling - i`.
    ///
    /// # Panics
    /// Panics if input and output IDs overlap, i.e. if
    /// `node_id_ceiling` is too small for the interface.
    ///
    /// # Examples
    /// ```
    /// use evoneat_cppn::genomics::{CppnGenome, GeneticConfig};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig::cppn(
    ///     NonZeroUsize::new(3).unwrap(),
    ///     NonZeroUsize::new(2).unwrap(),
    /// );
    /// let genome = CppnGenome::new(&config);
    ///
    /// assert_eq!(genome.nodes().count(), 3 + 2);
    /// assert_eq!(genome.inputs(), &[0, 1, 2]);
    /// assert_eq!(genome.outputs(), &[u32::MAX, u32::MAX - 1]);
    /// assert_eq!(genome.edges().count(), 0);
    /// ```
    pub fn new(config: &GeneticConfig) -> CppnGenome {
        let inputs: Box<[NodeId]> = (0..config.input_count.get())
            .map(|i| i as NodeId)
            .collect();
        let outputs: Box<[NodeId]> = (0..config.output_count.get())
            .map(|i| config.node_id_ceiling.wrapping_sub(i as NodeId))
            .collect();

        let mut genome = CppnGenome {
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            inputs,
            outputs,
        };
        for i in 0..genome.inputs.len() {
            genome
                .add_node(genome.inputs[i], ActivationType::Input)
                .unwrap_or_else(|e| panic!("{}", e));
        }
        for i in 0..genome.outputs.len() {
            genome
                .add_node(genome.outputs[i], config.output_activation)
                .unwrap_or_else(|e| panic!("{}", e));
        }
        genome
    }

    /// Connects every input to every output with a new random weight.
    /// Existing input-output edges are replaced, so initializing
    /// twice is the same as initializing once.
    ///
    /// # Examples
    /// ```
    /// use evoneat_cppn::genomics::{CppnGenome, GeneticConfig};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig::cppn(
    ///     NonZeroUsize::new(3).unwrap(),
    ///     NonZeroUsize::new(2).unwrap(),
    /// );
    /// let mut rng = ChaCha8Rng::seed_from_u64(0);
    /// let mut genome = CppnGenome::new(&config);
    ///
    /// genome.initialize(&mut rng, &config);
    /// genome.initialize(&mut rng, &config);
    /// assert_eq!(genome.edges().count(), 3 * 2);
    /// assert!(genome.edges().all(|e| e.enabled()));
    /// ```
    pub fn initialize<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &GeneticConfig) {
        for i in 0..self.inputs.len() {
            for o in 0..self.outputs.len() {
                let (source, target) = (self.inputs[i], self.outputs[o]);
                let weight = random_weight(rng, config);
                self.edges
                    .insert(edge_id(source, target), Edge::new(source, target, weight));
            }
        }
    }

    /// Adds a hidden node with the specified ID and activation type.
    ///
    /// # Errors
    /// Returns an error if a node with the same ID already exists.
    ///
    /// # Examples
    /// ```
    /// use evoneat_cppn::genomics::{ActivationType, CppnGenome, GeneticConfig};
    ///
    /// let mut genome = CppnGenome::new(&GeneticConfig::zero());
    /// genome.add_node(7, ActivationType::Sine).unwrap();
    ///
    /// assert!(genome.add_node(7, ActivationType::Cosine).is_err());
    /// ```
    pub fn add_node(
        &mut self,
        id: NodeId,
        activation_type: ActivationType,
    ) -> Result<&mut Node, GenomeError> {
        if self.nodes.contains_key(&id) {
            return Err(GenomeError::DuplicateNode(id));
        }
        Ok(self
            .nodes
            .entry(id)
            .or_insert_with(|| Node::new(id, activation_type)))
    }

    /// Adds an enabled edge between two existing nodes.
    ///
    /// # Errors
    /// Returns an error if either endpoint does not exist,
    /// or if the edge is already present.
    ///
    /// # Examples
    /// ```
    /// use evoneat_cppn::genomics::{ActivationType, CppnGenome, GeneticConfig};
    ///
    /// let mut genome = CppnGenome::new(&GeneticConfig::zero());
    /// let output = genome.outputs()[0];
    /// genome.add_edge(0, output, 0.5).unwrap();
    ///
    /// assert!(genome.add_edge(0, output, 1.0).is_err());
    /// assert!(genome.add_edge(0, 42, 1.0).is_err());
    /// ```
    pub fn add_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        weight: f32,
    ) -> Result<&mut Edge, GenomeError> {
        if !self.nodes.contains_key(&source) || !self.nodes.contains_key(&target) {
            return Err(GenomeError::NonexistantEndpoints(source, target));
        }
        let id = edge_id(source, target);
        if self.edges.contains_key(&id) {
            return Err(GenomeError::DuplicateEdge(source, target));
        }
        Ok(self
            .edges
            .entry(id)
            .or_insert_with(|| Edge::new(source, target, weight)))
    }

    /// Attempts to add structure to the genome.
    ///
    /// Two nodes are drawn at random (the second being moved to
    /// the source position if it is an input and the first is not).
    /// If they are unconnected, a new edge is added between them; if
    /// their edge is disabled, it is enabled with a new weight; and if
    /// it is enabled, it is [split].
    ///
    /// [split]: CppnGenome::split_edge
    pub fn expand<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &GeneticConfig) -> Expansion {
        let mut source = self.random_node(rng);
        let mut target = self.random_node(rng);
        if self.is_input(target) && !self.is_input(source) {
            std::mem::swap(&mut source, &mut target);
        }
        let id = edge_id(source, target);
        let weight = random_weight(rng, config);

        match self.edges.get(&id).map(Edge::enabled) {
            None => {
                self.edges.insert(id, Edge::new(source, target, weight));
                Expansion::Added(id)
            }
            Some(false) => {
                if let Some(edge) = self.edges.get_mut(&id) {
                    edge.enabled = true;
                    edge.weight = weight;
                }
                Expansion::Reenabled(id)
            }
            Some(true) => match self.split_edge(rng, id, config) {
                Some(node) => Expansion::Split { edge: id, node },
                None => Expansion::Abandoned(id),
            },
        }
    }

    /// Splits an edge by inserting a new node in its middle.
    ///
    /// The original edge is disabled, and replaced by an edge from its
    /// source to the new node, carrying the original weight, and an
    /// edge from the new node to its target, with weight 1.
    ///
    /// Returns the new node's ID, or `None` if the edge does not
    /// exist or no free ID was found within
    /// [`max_node_id_attempts`] tries.
    ///
    /// [`max_node_id_attempts`]: GeneticConfig::max_node_id_attempts
    ///
    /// # Examples
    /// ```
    /// use evoneat_cppn::genomics::{edge_id, CppnGenome, GeneticConfig};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let config = GeneticConfig {
    ///     max_node_id_attempts: 16,
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut rng = ChaCha8Rng::seed_from_u64(3);
    /// let mut genome = CppnGenome::new(&config);
    /// let output = genome.outputs()[0];
    /// genome.add_edge(0, output, 2.0).unwrap();
    ///
    /// let node = genome.split_edge(&mut rng, edge_id(0, output), &config).unwrap();
    ///
    /// assert!(!genome.edge(edge_id(0, output)).unwrap().enabled());
    /// assert_eq!(genome.edge(edge_id(0, node)).unwrap().weight(), 2.0);
    /// assert_eq!(genome.edge(edge_id(node, output)).unwrap().weight(), 1.0);
    /// ```
    pub fn split_edge<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        edge: EdgeId,
        config: &GeneticConfig,
    ) -> Option<NodeId> {
        let (source, target, weight) = match self.edges.get(&edge) {
            Some(e) => (e.source(), e.target(), e.weight),
            None => return None,
        };
        let node = match self.allocate_node_id(rng, config) {
            Some(node) => node,
            None => {
                trace!(
                    source,
                    target,
                    attempts = config.max_node_id_attempts,
                    "no free node id, split abandoned"
                );
                return None;
            }
        };
        let activation_type = random_activation(rng, config);

        self.nodes.insert(node, Node::new(node, activation_type));
        if let Some(e) = self.edges.get_mut(&edge) {
            e.enabled = false;
        }
        self.edges
            .insert(edge_id(source, node), Edge::new(source, node, weight));
        self.edges
            .insert(edge_id(node, target), Edge::new(node, target, 1.0));
        Some(node)
    }

    /// Probes random IDs in `0..=node_id_ceiling` for one not in use.
    fn allocate_node_id<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        config: &GeneticConfig,
    ) -> Option<NodeId> {
        (0..config.max_node_id_attempts)
            .map(|_| rng.gen_range(0..=config.node_id_ceiling))
            .find(|id| !self.nodes.contains_key(id))
    }

    /// Perturbs enabled edge weights and re-enables disabled edges,
    /// each edge being selected with probability `rate`.
    fn mutate_weights<R: Rng + ?Sized>(&mut self, rng: &mut R, rate: f32, config: &GeneticConfig) {
        for edge in self.edges.values_mut() {
            if rng.gen::<f32>() < rate {
                if edge.enabled {
                    let z: f32 = StandardNormal.sample(rng);
                    edge.weight += z * config.weight_mutation_power;
                } else {
                    edge.enabled = true;
                    edge.weight = random_weight(rng, config);
                }
            }
        }
    }

    /// Gives a random non-input node a random continuous activation type.
    fn mutate_activation<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &GeneticConfig) {
        let candidates: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|n| !n.is_input())
            .map(Node::id)
            .collect();
        if let Some(id) = candidates.choose(rng) {
            let activation_type = random_activation(rng, config);
            if let Some(node) = self.nodes.get_mut(id) {
                node.set_activation_type(activation_type);
            }
        }
    }

    /// Makes the genome an exact copy of `other`.
    ///
    /// # Errors
    /// Returns an error, leaving the genome untouched,
    /// if the genomes' interfaces differ.
    pub fn try_overwrite(&mut self, other: &CppnGenome) -> Result<(), GenomeError> {
        self.check_interface(other)?;
        self.nodes.clear();
        self.nodes
            .extend(other.nodes.iter().map(|(id, node)| (*id, node.clone())));
        self.edges.clear();
        self.edges
            .extend(other.edges.iter().map(|(id, edge)| (*id, edge.clone())));
        Ok(())
    }

    /// Makes the genome an exact copy of `other`, updating
    /// shared nodes and edges in place and only inserting or
    /// removing those that differ. The result is the same as
    /// with [`try_overwrite`].
    ///
    /// # Errors
    /// Returns an error, leaving the genome untouched,
    /// if the genomes' interfaces differ.
    ///
    /// [`try_overwrite`]: CppnGenome::try_overwrite
    pub fn merge_from(&mut self, other: &CppnGenome) -> Result<(), GenomeError> {
        self.check_interface(other)?;
        self.nodes.retain(|id, _| other.nodes.contains_key(id));
        for (id, node) in &other.nodes {
            match self.nodes.get_mut(id) {
                Some(own) => own.clone_from(node),
                None => {
                    self.nodes.insert(*id, node.clone());
                }
            }
        }
        self.edges.retain(|id, _| other.edges.contains_key(id));
        for (id, edge) in &other.edges {
            match self.edges.get_mut(id) {
                Some(own) => own.clone_from(edge),
                None => {
                    self.edges.insert(*id, edge.clone());
                }
            }
        }
        Ok(())
    }

    /// Returns the genetic distance between two genomes.
    ///
    /// Edges present in only one genome count as non-matching,
    /// and are normalized by the larger genome's edge count (minus
    /// [`size_offset`], and at least 1). Matching edges contribute
    /// their average absolute weight difference.
    ///
    /// # Errors
    /// Returns an error if the genomes' interfaces differ.
    ///
    /// [`size_offset`]: GeneticConfig::size_offset
    ///
    /// # Examples
    /// ```
    /// use evoneat_cppn::genomics::{CppnGenome, GeneticConfig};
    ///
    /// let config = GeneticConfig {
    ///     disjoint_coefficient: 1.0,
    ///     weight_coefficient: 0.5,
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut a = CppnGenome::new(&config);
    /// let output = a.outputs()[0];
    /// a.add_edge(0, output, 1.0).unwrap();
    ///
    /// let mut b = a.clone();
    /// b.add_edge(output, output, 1.0).unwrap();
    ///
    /// assert_eq!(a.try_compare(&a.clone(), &config).unwrap(), 0.0);
    /// // One non-matching edge over a size of two edges.
    /// assert_eq!(a.try_compare(&b, &config).unwrap(), 0.5);
    /// ```
    pub fn try_compare(&self, other: &CppnGenome, config: &GeneticConfig) -> Result<f32, GenomeError> {
        self.check_interface(other)?;

        let mut matching = 0;
        let mut weight_difference = 0.0;
        for (id, edge) in &self.edges {
            if let Some(theirs) = other.edges.get(id) {
                matching += 1;
                weight_difference += (edge.weight - theirs.weight).abs();
            }
        }

        let disjoint = self.edges.len() + other.edges.len() - 2 * matching;
        let size = self
            .edges
            .len()
            .max(other.edges.len())
            .saturating_sub(config.size_offset)
            .max(1);
        let average_weight_difference = if matching > 0 {
            weight_difference / matching as f32
        } else {
            0.0
        };

        Ok(config.disjoint_coefficient * disjoint as f32 / size as f32
            + config.weight_coefficient * average_weight_difference)
    }

    /// Recombines the genome with `other`, assuming the genome
    /// is a copy of the dominant parent. Only edges present in
    /// both parents are affected; the structure is the dominant
    /// parent's.
    ///
    /// # Errors
    /// Returns an error, leaving the genome untouched,
    /// if the genomes' interfaces differ.
    pub fn try_crossover<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        other: &CppnGenome,
        config: &GeneticConfig,
    ) -> Result<(), GenomeError> {
        self.check_interface(other)?;
        for (id, edge) in self.edges.iter_mut() {
            let theirs = match other.edges.get(id) {
                Some(theirs) => theirs,
                None => continue,
            };
            if rng.gen::<f32>() < config.mate_by_averaging_chance {
                edge.weight = (edge.weight + theirs.weight) / 2.0;
            } else if rng.gen::<bool>() {
                edge.weight = theirs.weight;
            }
            if !edge.enabled || !theirs.enabled {
                edge.enabled = rng.gen::<f32>() < config.reenable_chance;
            }
        }
        Ok(())
    }

    fn check_interface(&self, other: &CppnGenome) -> Result<(), GenomeError> {
        if self.inputs == other.inputs && self.outputs == other.outputs {
            Ok(())
        } else {
            Err(GenomeError::IncompatibleInterface {
                expected: (self.inputs.len(), self.outputs.len()),
                found: (other.inputs.len(), other.outputs.len()),
            })
        }
    }

    fn random_node<R: Rng + ?Sized>(&self, rng: &mut R) -> NodeId {
        // Genomes always hold their interface nodes.
        let index = rng.gen_range(0..self.nodes.len());
        self.nodes.keys().nth(index).copied().unwrap_or(self.inputs[0])
    }

    fn is_input(&self, id: NodeId) -> bool {
        self.nodes.get(&id).map_or(false, Node::is_input)
    }

    /// Returns an iterator over the genome's nodes, in ID order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Returns an iterator over the genome's edges, in ID order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Returns the IDs of the input nodes, in input order.
    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    /// Returns the IDs of the output nodes, in output order.
    pub fn outputs(&self) -> &[NodeId] {
        &self.outputs
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Returns the number of nodes that are neither inputs nor outputs.
    pub fn hidden_count(&self) -> usize {
        self.nodes.len() - self.inputs.len() - self.outputs.len()
    }

    pub fn enabled_edge_count(&self) -> usize {
        self.edges.values().filter(|e| e.enabled).count()
    }
}

impl evoneat::Genome for CppnGenome {
    type Config = GeneticConfig;

    fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &GeneticConfig) {
        self.initialize(rng, config);
    }

    fn overwrite(&mut self, other: &CppnGenome) {
        self.try_overwrite(other)
            .unwrap_or_else(|e| panic!("{}", e));
    }

    fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R, rate: f32, config: &GeneticConfig) {
        if rng.gen::<f32>() < config.expand_chance {
            self.expand(rng, config);
        }
        if rng.gen::<f32>() < config.activation_mutation_chance {
            self.mutate_activation(rng, config);
        }
        self.mutate_weights(rng, rate.clamp(0.0, 1.0), config);
    }

    fn crossover<R: Rng + ?Sized>(&mut self, rng: &mut R, other: &CppnGenome, config: &GeneticConfig) {
        self.try_crossover(rng, other, config)
            .unwrap_or_else(|e| panic!("{}", e));
    }

    fn compare(&self, other: &CppnGenome, config: &GeneticConfig) -> f32 {
        self.try_compare(other, config)
            .unwrap_or_else(|e| panic!("{}", e))
    }
}

impl Network for CppnGenome {
    /// Writes the current and previous value of each input node.
    ///
    /// # Panics
    /// Panics if `values` does not hold exactly one value per input.
    fn set_input(&mut self, values: &[f32]) {
        if values.len() != self.inputs.len() {
            panic!(
                "{}",
                GenomeError::InputLength {
                    expected: self.inputs.len(),
                    found: values.len(),
                }
            );
        }
        for (id, value) in self.inputs.iter().zip(values) {
            if let Some(node) = self.nodes.get_mut(id) {
                node.value = *value;
                node.previous = *value;
            }
        }
    }

    fn propagate(&mut self) {
        for node in self.nodes.values_mut().filter(|n| !n.is_input()) {
            node.previous = node.value;
            node.value = 0.0;
        }
        for edge in self.edges.values().filter(|e| e.enabled) {
            let signal = match self.nodes.get(&edge.source()) {
                Some(source) => source.previous * edge.weight,
                None => continue,
            };
            if let Some(target) = self.nodes.get_mut(&edge.target()) {
                target.value += signal;
            }
        }
        for node in self.nodes.values_mut() {
            node.value = node.activation_type().apply(node.value);
        }
    }

    fn read_output(&self) -> Vec<f32> {
        self.outputs
            .iter()
            .map(|id| self.nodes.get(id).map_or(0.0, Node::value))
            .collect()
    }

    fn reset(&mut self) {
        for node in self.nodes.values_mut() {
            node.value = 0.0;
            node.previous = 0.0;
        }
    }
}

impl fmt::Display for CppnGenome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CppnGenome {{")?;
        for node in self.nodes.values() {
            writeln!(f, "\tnode {}: {:?}", node.id(), node.activation_type())?;
        }
        for edge in self.edges.values() {
            writeln!(f, "\tedge {}", edge)?;
        }
        write!(f, "}}")
    }
}

fn random_weight<R: Rng + ?Sized>(rng: &mut R, config: &GeneticConfig) -> f32 {
    match Normal::new(0.0, config.new_edge_std) {
        Ok(normal) => normal.sample(rng),
        Err(_) => 0.0,
    }
}

fn random_activation<R: Rng + ?Sized>(rng: &mut R, config: &GeneticConfig) -> ActivationType {
    config
        .hidden_activations()
        .choose(rng)
        .copied()
        .unwrap_or(ActivationType::Identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::networks::sample;
    use evoneat::Genome;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::num::NonZeroUsize;

    fn config(inputs: usize, outputs: usize) -> GeneticConfig {
        GeneticConfig::cppn(
            NonZeroUsize::new(inputs).unwrap(),
            NonZeroUsize::new(outputs).unwrap(),
        )
    }

    fn initialized(config: &GeneticConfig, seed: u64) -> CppnGenome {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut genome = CppnGenome::new(config);
        genome.initialize(&mut rng, config);
        genome
    }

    #[test]
    fn small_ceiling_reserves_top_ids() {
        let config = GeneticConfig {
            node_id_ceiling: 9,
            output_count: NonZeroUsize::new(3).unwrap(),
            ..GeneticConfig::zero()
        };
        let genome = CppnGenome::new(&config);
        assert_eq!(genome.outputs(), &[9, 8, 7]);
        assert!(genome
            .outputs()
            .iter()
            .all(|id| genome.node(*id).unwrap().activation_type() == ActivationType::Sigmoid));
    }

    #[test]
    #[should_panic]
    fn overlapping_interface_panics() {
        CppnGenome::new(&GeneticConfig {
            node_id_ceiling: 1,
            input_count: NonZeroUsize::new(2).unwrap(),
            ..GeneticConfig::zero()
        });
    }

    #[test]
    fn expand_adds_then_splits() {
        let config = GeneticConfig {
            max_node_id_attempts: 8,
            new_edge_std: 1.0,
            ..GeneticConfig::zero()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut genome = CppnGenome::new(&config);

        let mut seen_split = false;
        for _ in 0..200 {
            match genome.expand(&mut rng, &config) {
                Expansion::Added(id) => assert!(genome.edge(id).unwrap().enabled()),
                Expansion::Reenabled(id) => assert!(genome.edge(id).unwrap().enabled()),
                Expansion::Split { edge, node } => {
                    seen_split = true;
                    assert!(!genome.edge(edge).unwrap().enabled());
                    let (source, target) = edge_endpoints(edge);
                    assert!(genome.edge(edge_id(source, node)).is_some());
                    assert!(genome.edge(edge_id(node, target)).is_some());
                }
                Expansion::Abandoned(_) => panic!("free ids are plentiful"),
            }
        }
        assert!(seen_split);
        assert_eq!(genome.input_count(), 1);
        assert_eq!(genome.output_count(), 1);
        for edge in genome.edges() {
            assert!(genome.node(edge.source()).is_some());
            assert!(genome.node(edge.target()).is_some());
        }
    }

    #[test]
    fn inputs_are_moved_to_source() {
        let config = GeneticConfig {
            new_edge_std: 1.0,
            ..GeneticConfig::zero()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        for _ in 0..50 {
            let mut genome = CppnGenome::new(&config);
            if let Expansion::Added(id) = genome.expand(&mut rng, &config) {
                let (source, target) = edge_endpoints(id);
                // Only input -> input edges may target an input.
                assert!(target != 0 || source == 0);
            }
        }
    }

    #[test]
    fn exhausted_ids_abandon_split() {
        let config = GeneticConfig {
            node_id_ceiling: 1,
            max_node_id_attempts: 64,
            ..GeneticConfig::zero()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut genome = CppnGenome::new(&config);
        genome.add_edge(0, 1, 1.0).unwrap();
        let before = genome.clone();

        assert_eq!(genome.split_edge(&mut rng, edge_id(0, 1), &config), None);
        assert_eq!(genome, before);
    }

    #[test]
    fn split_preserves_output() {
        let config = GeneticConfig {
            activation_types: vec![ActivationType::Identity],
            output_activation: ActivationType::Sigmoid,
            max_node_id_attempts: 16,
            ..GeneticConfig::zero()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut genome = CppnGenome::new(&config);
        let output = genome.outputs()[0];
        genome.add_edge(0, output, -1.3).unwrap();

        let before = sample(&mut genome, &[0.7], 16);
        genome.split_edge(&mut rng, edge_id(0, output), &config).unwrap();
        let after = sample(&mut genome, &[0.7], 16);
        assert_eq!(before, after);
    }

    #[test]
    fn propagation_steps() {
        let mut genome = CppnGenome::new(&GeneticConfig {
            output_activation: ActivationType::Identity,
            ..GeneticConfig::zero()
        });
        let output = genome.outputs()[0];
        genome.add_node(5, ActivationType::Identity).unwrap();
        genome.add_edge(0, 5, 2.0).unwrap();
        genome.add_edge(5, output, 3.0).unwrap();
        genome.add_edge(0, output, 1.0).unwrap().enabled = false;

        genome.set_input(&[1.0]);
        genome.propagate();
        assert_eq!(genome.read_output(), [0.0]);
        assert_eq!(genome.node(5).unwrap().value(), 2.0);
        genome.propagate();
        assert_eq!(genome.read_output(), [6.0]);

        genome.reset();
        assert!(genome.nodes().all(|n| n.value() == 0.0 && n.previous() == 0.0));
    }

    #[test]
    #[should_panic]
    fn wrong_input_length_panics() {
        let mut genome = CppnGenome::new(&config(3, 1));
        genome.set_input(&[1.0, 2.0]);
    }

    #[test]
    fn mutation_preserves_interface() {
        let config = GeneticConfig {
            expand_chance: 0.8,
            activation_mutation_chance: 0.5,
            ..config(3, 2)
        };
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut genome = initialized(&config, 2);
        for _ in 0..100 {
            genome.mutate(&mut rng, 0.3, &config);
        }
        assert_eq!(genome.inputs(), &[0, 1, 2]);
        assert_eq!(genome.outputs().len(), 2);
        for id in genome.inputs() {
            assert_eq!(genome.node(*id).unwrap().activation_type(), ActivationType::Input);
        }
        assert!(genome.hidden_count() > 0);
        genome.set_input(&[0.1, 0.2, 0.3]);
        genome.propagate();
        assert_eq!(genome.read_output().len(), 2);
    }

    #[test]
    fn zero_rate_keeps_weights() {
        let config = config(2, 2);
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut genome = initialized(&config, 6);
        let before = genome.clone();
        let config = GeneticConfig {
            expand_chance: 0.0,
            activation_mutation_chance: 0.0,
            ..config
        };
        genome.mutate(&mut rng, -3.0, &config);
        assert_eq!(genome, before);
    }

    #[test]
    fn full_rate_reenables_edges() {
        let config = GeneticConfig {
            expand_chance: 0.0,
            activation_mutation_chance: 0.0,
            ..config(2, 1)
        };
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut genome = initialized(&config, 6);
        for edge in genome.edges.values_mut() {
            edge.enabled = false;
        }
        genome.mutate(&mut rng, 1.0, &config);
        assert_eq!(genome.enabled_edge_count(), 2);
    }

    #[test]
    fn distance_ignores_insertion_order() {
        let config = config(2, 1);
        let output = CppnGenome::new(&config).outputs()[0];

        let mut a = CppnGenome::new(&config);
        a.add_node(10, ActivationType::Sine).unwrap();
        a.add_edge(0, 10, 0.5).unwrap();
        a.add_edge(10, output, -0.5).unwrap();
        a.add_edge(1, output, 2.0).unwrap();

        let mut b = CppnGenome::new(&config);
        b.add_node(10, ActivationType::Sine).unwrap();
        b.add_edge(1, output, 2.0).unwrap();
        b.add_edge(10, output, -0.5).unwrap();
        b.add_edge(0, 10, 0.5).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.compare(&b, &config), 0.0);
        assert_eq!(b.compare(&a, &config), 0.0);

        let mut c = initialized(&config, 1);
        c.add_node(10, ActivationType::Sine).unwrap();
        c.add_edge(0, 10, 0.5).unwrap();
        assert_eq!(a.compare(&c, &config), c.compare(&a, &config));
    }

    #[test]
    fn distance_formula() {
        let config = GeneticConfig {
            disjoint_coefficient: 2.0,
            weight_coefficient: 0.5,
            size_offset: 1,
            ..GeneticConfig::zero()
        };
        let output = CppnGenome::new(&config).outputs()[0];
        let mut a = CppnGenome::new(&config);
        a.add_edge(0, output, 1.0).unwrap();
        a.add_edge(output, output, 1.0).unwrap();
        a.add_edge(output, 0, 1.0).unwrap();
        let mut b = CppnGenome::new(&config);
        b.add_edge(0, output, 3.0).unwrap();

        // 2 disjoint over max(3 - 1, 1) = 2, plus 0.5 * |1 - 3|.
        assert_eq!(a.compare(&b, &config), 2.0 * 2.0 / 2.0 + 0.5 * 2.0);
    }

    #[test]
    fn interface_mismatch_is_rejected_untouched() {
        let mut a = initialized(&config(2, 1), 0);
        let b = initialized(&config(3, 1), 0);
        let before = a.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        assert!(matches!(
            a.try_overwrite(&b),
            Err(GenomeError::IncompatibleInterface { expected: (2, 1), found: (3, 1) })
        ));
        assert!(a.merge_from(&b).is_err());
        assert!(a.try_crossover(&mut rng, &b, &config(2, 1)).is_err());
        assert!(a.try_compare(&b, &config(2, 1)).is_err());
        assert_eq!(a, before);
    }

    #[test]
    #[should_panic]
    fn trait_overwrite_panics_on_mismatch() {
        let mut a = CppnGenome::new(&config(2, 1));
        a.overwrite(&CppnGenome::new(&config(2, 2)));
    }

    #[test]
    fn merge_matches_overwrite() {
        let config = GeneticConfig {
            expand_chance: 1.0,
            max_node_id_attempts: 8,
            ..config(2, 1)
        };
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let mut a = initialized(&config, 1);
        let mut b = initialized(&config, 2);
        for _ in 0..20 {
            a.mutate(&mut rng, 0.5, &config);
            b.mutate(&mut rng, 0.5, &config);
        }

        let mut merged = a.clone();
        merged.merge_from(&b).unwrap();
        let mut overwritten = a.clone();
        overwritten.try_overwrite(&b).unwrap();
        assert_eq!(merged, b);
        assert_eq!(overwritten, b);
    }

    #[test]
    fn crossover_keeps_dominant_structure() {
        let config = GeneticConfig {
            expand_chance: 1.0,
            max_node_id_attempts: 8,
            mate_by_averaging_chance: 0.5,
            reenable_chance: 0.5,
            ..config(2, 1)
        };
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut mom = initialized(&config, 1);
        let mut dad = initialized(&config, 2);
        for _ in 0..10 {
            mom.mutate(&mut rng, 0.2, &config);
            dad.mutate(&mut rng, 0.2, &config);
        }

        let mut child = mom.clone();
        child.crossover(&mut rng, &dad, &config);
        let ids = |g: &CppnGenome| g.edges().map(Edge::id).collect::<Vec<_>>();
        assert_eq!(ids(&child), ids(&mom));
        assert_eq!(child.nodes().count(), mom.nodes().count());
        for edge in child.edges() {
            let own = mom.edge(edge.id()).unwrap().weight();
            match dad.edge(edge.id()) {
                None => assert_eq!(edge.weight(), own),
                Some(theirs) => {
                    let w = edge.weight();
                    assert!(
                        w == own || w == theirs.weight() || w == (own + theirs.weight()) / 2.0
                    );
                }
            }
        }
    }

    #[test]
    fn serde_round_trip_preserves_behaviour() {
        let config = GeneticConfig {
            expand_chance: 1.0,
            max_node_id_attempts: 8,
            ..config(3, 1)
        };
        let mut rng = ChaCha8Rng::seed_from_u64(30);
        let mut genome = initialized(&config, 30);
        for _ in 0..10 {
            genome.mutate(&mut rng, 0.2, &config);
        }
        let json = serde_json::to_string(&genome).unwrap();
        let mut loaded: CppnGenome = serde_json::from_str(&json).unwrap();
        assert_eq!(
            sample(&mut genome, &[0.5, -0.5, 1.0], 16),
            sample(&mut loaded, &[0.5, -0.5, 1.0], 16)
        );
    }
}
