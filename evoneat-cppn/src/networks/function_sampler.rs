use crate::genomics::CppnGenome;
use crate::networks::{sample, RealTimeNetwork};

/// A network evaluated as a function of its inputs.
///
/// Each sample starts from a cleared state and runs
/// `DEPTH` propagation steps, so signals can cross
/// paths of up to `DEPTH` edges before the outputs
/// are read.
///
/// # Generic parameters
/// `DEPTH`: the number of steps per sample. Values between
/// 8 and 32 suit most evolved patterns; see [`DEFAULT_DEPTH`].
///
/// [`DEFAULT_DEPTH`]: crate::networks::DEFAULT_DEPTH
#[derive(Clone, Debug)]
pub struct FunctionSampler<const DEPTH: usize = 16> {
    network: RealTimeNetwork,
}

impl<const DEPTH: usize> From<&CppnGenome> for FunctionSampler<DEPTH> {
    fn from(genome: &CppnGenome) -> FunctionSampler<DEPTH> {
        FunctionSampler {
            network: RealTimeNetwork::from(genome),
        }
    }
}

impl<const DEPTH: usize> FunctionSampler<DEPTH> {
    /// Returns the sampled function's value
    /// at the point given by `inputs`.
    ///
    /// # Panics
    /// Panics if `inputs` does not hold exactly one
    /// value per network input.
    ///
    /// # Examples
    /// ```
    /// use evoneat_cppn::genomics::{ActivationType, CppnGenome, GeneticConfig};
    /// use evoneat_cppn::networks::FunctionSampler;
    ///
    /// // Create a network with two chained sine nodes.
    /// let mut genome = CppnGenome::new(&GeneticConfig {
    ///     output_activation: ActivationType::Sine,
    ///     ..GeneticConfig::zero()
    /// });
    /// let output = genome.outputs()[0];
    /// genome.add_node(2, ActivationType::Sine).unwrap();
    /// genome.add_edge(0, 2, 1.0).unwrap();
    /// genome.add_edge(2, output, 1.0).unwrap();
    /// let mut sampler = FunctionSampler::<16>::from(&genome);
    ///
    /// // The result is identical to double application of the sine function.
    /// for input in -20..=20 {
    ///     let input = input as f32 / 10.0;
    ///     assert_eq!(sampler.sample(&[input])[0], input.sin().sin());
    /// }
    /// ```
    pub fn sample(&mut self, inputs: &[f32]) -> Vec<f32> {
        sample(&mut self.network, inputs, DEPTH)
    }

    /// Returns the underlying compiled network.
    pub fn network(&self) -> &RealTimeNetwork {
        &self.network
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::genomics::{ActivationType, GeneticConfig};

    fn chain() -> CppnGenome {
        let mut genome = CppnGenome::new(&GeneticConfig {
            output_activation: ActivationType::Identity,
            ..GeneticConfig::zero()
        });
        let output = genome.outputs()[0];
        genome.add_node(2, ActivationType::Identity).unwrap();
        genome.add_edge(0, 2, 2.0).unwrap();
        genome.add_edge(2, output, 3.0).unwrap();
        genome
    }

    #[test]
    fn depth_limits_path_length() {
        assert_eq!(FunctionSampler::<0>::from(&chain()).sample(&[1.0]), [0.0]);
        assert_eq!(FunctionSampler::<1>::from(&chain()).sample(&[1.0]), [0.0]);
        assert_eq!(FunctionSampler::<2>::from(&chain()).sample(&[1.0]), [6.0]);
    }

    #[test]
    fn samples_are_independent() {
        let mut sampler = FunctionSampler::<16>::from(&chain());
        let first = sampler.sample(&[0.5]);
        sampler.sample(&[-4.0]);
        assert_eq!(sampler.sample(&[0.5]), first);
    }

    #[test]
    fn default_depth() {
        let sampler: FunctionSampler = FunctionSampler::from(&chain());
        assert_eq!(sampler.network().output_count(), 1);
    }
}
