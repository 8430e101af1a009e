use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

/// An interface for genomes that can be evolved by a [`Population`].
///
/// Every operation receives the implementor's own configuration type,
/// which is opaque to the population. Cloning is provided by [`Clone`],
/// and disposal by ordinary drop.
///
/// Genomes with different interfaces (e.g. a different number of inputs)
/// are not expected to be compared, crossed or overwritten with one another;
/// implementors should reject such calls before modifying any data.
///
/// [`Population`]: crate::Population
pub trait Genome: Clone {
    type Config;

    /// Re-randomizes the genome's parameters in place.
    fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &Self::Config);

    /// Makes the genome an exact copy of `other`,
    /// discarding all of its previous contents.
    fn overwrite(&mut self, other: &Self);

    /// Mutates the genome. `rate` is the per-parameter
    /// mutation probability, and is clamped to `[0, 1]`.
    fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R, rate: f32, config: &Self::Config);

    /// Recombines the genome with `other`. The genome
    /// is assumed to be a copy of the dominant parent.
    fn crossover<R: Rng + ?Sized>(&mut self, rng: &mut R, other: &Self, config: &Self::Config);

    /// Returns the genetic distance between two genomes.
    /// A genome's distance to a copy of itself must be 0.
    fn compare(&self, other: &Self, config: &Self::Config) -> f32;
}

/// Configuration for [`ParameterVector`] genomes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterConfig {
    /// Number of parameters in each genome.
    pub length: usize,
    /// Standard deviation of randomized parameters.
    pub initial_std: f32,
    /// Standard deviation of parameter perturbations.
    pub mutation_power: f32,
}

/// A fixed-length vector of real parameters.
///
/// The simplest useful [`Genome`]: mutation perturbs each parameter
/// with Gaussian noise, crossover picks each parameter from either parent,
/// and distance is the mean absolute difference between parameters.
///
/// # Examples
/// ```
/// use evoneat::{Genome, ParameterConfig, ParameterVector};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let config = ParameterConfig { length: 4, initial_std: 1.0, mutation_power: 0.1 };
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
///
/// let mut genome = ParameterVector::new(&config);
/// genome.randomize(&mut rng, &config);
///
/// assert_eq!(genome.compare(&genome.clone(), &config), 0.0);
/// ```
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ParameterVector {
    values: Vec<f32>,
}

impl ParameterVector {
    /// Returns an all-zero vector of the configured length.
    pub fn new(config: &ParameterConfig) -> ParameterVector {
        ParameterVector {
            values: vec![0.0; config.length],
        }
    }

    /// Returns the vector's parameters.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    fn check_length(&self, other: &ParameterVector) {
        assert_eq!(
            self.values.len(),
            other.values.len(),
            "parameter vectors of different lengths"
        );
    }
}

impl From<Vec<f32>> for ParameterVector {
    fn from(values: Vec<f32>) -> ParameterVector {
        ParameterVector { values }
    }
}

impl Genome for ParameterVector {
    type Config = ParameterConfig;

    fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &ParameterConfig) {
        for value in &mut self.values {
            let z: f32 = StandardNormal.sample(rng);
            *value = z * config.initial_std;
        }
    }

    fn overwrite(&mut self, other: &ParameterVector) {
        self.check_length(other);
        self.values.copy_from_slice(&other.values);
    }

    fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R, rate: f32, config: &ParameterConfig) {
        let rate = rate.clamp(0.0, 1.0);
        for value in &mut self.values {
            if rng.gen::<f32>() < rate {
                let z: f32 = StandardNormal.sample(rng);
                *value += z * config.mutation_power;
            }
        }
    }

    fn crossover<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        other: &ParameterVector,
        _config: &ParameterConfig,
    ) {
        self.check_length(other);
        for (own, theirs) in self.values.iter_mut().zip(&other.values) {
            if rng.gen::<bool>() {
                *own = *theirs;
            }
        }
    }

    fn compare(&self, other: &ParameterVector, _config: &ParameterConfig) -> f32 {
        self.check_length(other);
        if self.values.is_empty() {
            return 0.0;
        }
        self.values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| (a - b).abs())
            .sum::<f32>()
            / self.values.len() as f32
    }
}
