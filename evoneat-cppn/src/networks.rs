//! A Network is a runnable graph of nodes, stepped
//! synchronously: every node reads its sources' values
//! from the previous step, so signals advance one edge
//! per [`propagate`] call, and cycles are allowed.
//!
//! Genomes are networks themselves. The `RealTimeNetwork`
//! type is a compiled copy of a genome for fast repeated
//! stepping, and the `FunctionSampler` type wraps one to
//! evaluate it as a function of its inputs.
//!
//! [`propagate`]: Network::propagate
mod connection;
mod function_sampler;

pub use function_sampler::FunctionSampler;

use crate::genomics::{ActivationType, CppnGenome, GenomeError};
use crate::NodeId;
use connection::Connection;

use ahash::RandomState;

use std::collections::HashMap;
use std::fmt;

/// Number of propagation steps per sample
/// used unless stated otherwise.
pub const DEFAULT_DEPTH: usize = 16;

/// The evaluation interface shared by genomes
/// and compiled networks.
pub trait Network {
    /// Sets the current and previous value of every
    /// input node, in input order.
    ///
    /// Implementations panic if `values` does not hold
    /// exactly one value per input.
    fn set_input(&mut self, values: &[f32]);

    /// Advances the network by one step.
    fn propagate(&mut self);

    /// Returns the current output values, in output order.
    fn read_output(&self) -> Vec<f32>;

    /// Zeroes the state of every node.
    fn reset(&mut self);
}

/// Resets `network`, sets its inputs, propagates
/// `depth` times and returns its outputs.
///
/// # Examples
/// ```
/// use evoneat_cppn::genomics::{ActivationType, CppnGenome, GeneticConfig};
/// use evoneat_cppn::networks::{sample, DEFAULT_DEPTH};
///
/// let mut genome = CppnGenome::new(&GeneticConfig {
///     output_activation: ActivationType::Identity,
///     ..GeneticConfig::zero()
/// });
/// let output = genome.outputs()[0];
/// genome.add_edge(0, output, -2.0).unwrap();
///
/// assert_eq!(sample(&mut genome, &[1.5], DEFAULT_DEPTH), [-3.0]);
/// ```
pub fn sample<N: Network + ?Sized>(network: &mut N, inputs: &[f32], depth: usize) -> Vec<f32> {
    network.reset();
    network.set_input(inputs);
    for _ in 0..depth {
        network.propagate();
    }
    network.read_output()
}

/// An arbitrarily-structured network compiled
/// from a genome into flat arrays.
///
/// Stepping a compiled network produces exactly
/// the same values as stepping its genome.
#[derive(Clone, Debug)]
pub struct RealTimeNetwork {
    node_ids: Box<[NodeId]>,
    inputs: Box<[usize]>,
    outputs: Box<[usize]>,
    values: Box<[f32]>,
    previous: Box<[f32]>,
    activation_functions: Box<[ActivationType]>,
    connections: Box<[Box<[Connection]>]>,
}

impl From<&CppnGenome> for RealTimeNetwork {
    /// Compiles the passed genome, including its current node state.
    /// Disabled edges are left out.
    ///
    /// # Examples
    /// ```
    /// use evoneat_cppn::genomics::{CppnGenome, GeneticConfig};
    /// use evoneat_cppn::networks::RealTimeNetwork;
    /// use std::num::NonZeroUsize;
    ///
    /// let genome = CppnGenome::new(&GeneticConfig::cppn(
    ///     NonZeroUsize::new(3).unwrap(),
    ///     NonZeroUsize::new(2).unwrap(),
    /// ));
    ///
    /// let network = RealTimeNetwork::from(&genome);
    /// assert_eq!(network.input_count(), 3);
    /// ```
    fn from(genome: &CppnGenome) -> RealTimeNetwork {
        // Node order is ID order, as in the genome.
        let node_ids: Vec<NodeId> = genome.nodes().map(|n| n.id()).collect();
        let node_index_from_id: HashMap<_, _, RandomState> = node_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect();

        let mut connections = vec![vec![]; node_ids.len()];
        for edge in genome.edges().filter(|e| e.enabled()) {
            let source = node_index_from_id[&edge.source()];
            let target = node_index_from_id[&edge.target()];
            connections[source].push(Connection::new(target, edge.weight()));
        }

        RealTimeNetwork {
            inputs: genome
                .inputs()
                .iter()
                .map(|id| node_index_from_id[id])
                .collect(),
            outputs: genome
                .outputs()
                .iter()
                .map(|id| node_index_from_id[id])
                .collect(),
            values: genome.nodes().map(|n| n.value()).collect(),
            previous: genome.nodes().map(|n| n.previous()).collect(),
            activation_functions: genome.nodes().map(|n| n.activation_type()).collect(),
            connections: connections.into_iter().map(|v| v.into()).collect(),
            node_ids: node_ids.into(),
        }
    }
}

impl RealTimeNetwork {
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Returns the genome ID of every node, in network order.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }
}

impl Network for RealTimeNetwork {
    /// # Panics
    /// Panics if `values` does not hold exactly one value per input.
    ///
    /// # Examples
    /// ```
    /// use evoneat_cppn::genomics::{CppnGenome, GeneticConfig};
    /// use evoneat_cppn::networks::{Network, RealTimeNetwork};
    ///
    /// let genome = CppnGenome::new(&GeneticConfig::zero());
    /// let mut network = RealTimeNetwork::from(&genome);
    /// network.set_input(&[1.0]);
    /// ```
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
        for (&i, value) in self.inputs.iter().zip(values) {
            self.values[i] = *value;
            self.previous[i] = *value;
        }
    }

    fn propagate(&mut self) {
        for ((value, previous), activation) in self
            .values
            .iter_mut()
            .zip(self.previous.iter_mut())
            .zip(self.activation_functions.iter())
        {
            if *activation != ActivationType::Input {
                *previous = *value;
                *value = 0.0;
            }
        }

        for (source, outgoing) in self.connections.iter().enumerate() {
            for connection in outgoing.iter() {
                self.values[connection.target] += self.previous[source] * connection.weight;
            }
        }

        for (value, activation) in self
            .values
            .iter_mut()
            .zip(self.activation_functions.iter())
        {
            *value = activation.apply(*value);
        }
    }

    fn read_output(&self) -> Vec<f32> {
        self.outputs.iter().map(|&i| self.values[i]).collect()
    }

    fn reset(&mut self) {
        for (value, previous) in self.values.iter_mut().zip(self.previous.iter_mut()) {
            *value = 0.0;
            *previous = 0.0;
        }
    }
}

impl fmt::Display for RealTimeNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self as &dyn fmt::Debug).fmt(f)
    }
}
