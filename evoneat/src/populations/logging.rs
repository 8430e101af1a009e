use super::{Organism, Population, SpeciesID};

use crate::Genome;

use std::fmt;

/// Defines different possible reporting levels for logging.
#[derive(Clone, Copy, Debug)]
pub enum ReportingLevel {
    /// Clones the entire population.
    AllGenomes,
    /// Clones every species' prototype.
    SpeciesPrototypes,
    /// Clones only the population champion.
    PopulationChampion,
    /// Clones no genomes.
    NoGenomes,
}

/// A snapshot of a population.
#[derive(Clone, Debug)]
pub struct Log<G> {
    pub generation: usize,
    pub species_count: usize,
    pub threshold: f32,
    pub top_fitness: f32,
    pub generation_sample: GenerationMemberRecord<G>,
    pub genome_stats: Vec<(String, Stats)>,
}

impl<G> fmt::Display for Log<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Log {{")?;
        writeln!(f, "\tgeneration: {}", self.generation)?;
        writeln!(f, "\tspecies_count: {}", self.species_count)?;
        writeln!(f, "\tthreshold: {}", self.threshold)?;
        writeln!(f, "\ttop_fitness: {}", self.top_fitness)?;
        for (name, stats) in &self.genome_stats {
            writeln!(f, "\t{}: {:?}", name, stats)?;
        }
        write!(f, "}}")
    }
}

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub maximum: f32,
    pub minimum: f32,
    pub mean: f32,
    pub median: f32,
}

impl Stats {
    /// Returns statistics about numbers in a sequence.
    /// `NaN`s are ignored; if nothing else remains,
    /// every statistic is `NaN`.
    ///
    /// # Examples
    /// ```
    /// use evoneat::logging::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied());
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    /// ```
    pub fn from(data: impl Iterator<Item = f32>) -> Stats {
        let mut data: Vec<f32> = data.filter(|d| !d.is_nan()).collect();
        if data.is_empty() {
            return Stats {
                maximum: f32::NAN,
                minimum: f32::NAN,
                mean: f32::NAN,
                median: f32::NAN,
            };
        }
        data.sort_unstable_by(f32::total_cmp);

        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Stats {
            maximum: data[data.len() - 1],
            minimum: data[0],
            mean: data.iter().sum::<f32>() / data.len() as f32,
            median,
        }
    }
}

/// A reporting-level dependant store
/// of genomes from a population.
#[derive(Clone, Debug)]
pub enum GenerationMemberRecord<G> {
    /// Species IDs, member genomes and time stagnated.
    Species(Vec<(SpeciesID, Vec<G>, usize)>),
    /// Only species IDs, species prototypes and time stagnated.
    SpeciesPrototypes(Vec<(SpeciesID, G, usize)>),
    /// Only population champion.
    PopulationChampion(G),
    /// Empty.
    None,
}

/// A log of the evolution of a population over time.
#[derive(Clone, Debug)]
pub struct EvolutionLogger<G> {
    reporting_level: ReportingLevel,
    logs: Vec<Log<G>>,
}

impl<G: Genome> EvolutionLogger<G> {
    /// Returns a logger with the appropiate reporting level.
    ///
    /// # Examples
    /// ```
    /// use evoneat::ParameterVector;
    /// use evoneat::logging::{EvolutionLogger, ReportingLevel};
    ///
    /// let logger = EvolutionLogger::<ParameterVector>::new(ReportingLevel::NoGenomes);
    /// assert_eq!(logger.iter().count(), 0);
    /// ```
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger<G> {
        EvolutionLogger {
            reporting_level,
            logs: vec![],
        }
    }

    /// Store a snapshot of a population.
    ///
    /// The `organism_stat_extractor` provides a way of
    /// obtaining arbitrary statistics on the population,
    /// where each statistic is named by `stat_names`.
    ///
    /// # Examples
    /// ```
    /// use evoneat::{ParameterConfig, ParameterVector, Population, PopulationConfig};
    /// use evoneat::logging::{EvolutionLogger, ReportingLevel};
    /// use std::num::NonZeroUsize;
    ///
    /// let genetic_config = ParameterConfig { length: 3, initial_std: 1.0, mutation_power: 0.3 };
    /// let prototype = ParameterVector::new(&genetic_config);
    /// let population = Population::new(
    ///     PopulationConfig {
    ///         size: NonZeroUsize::new(10).unwrap(),
    ///         ..PopulationConfig::default()
    ///     },
    ///     genetic_config,
    ///     prototype,
    ///     |g: &ParameterVector| g.values()[0],
    /// )
    /// .unwrap();
    ///
    /// let mut logger = EvolutionLogger::new(ReportingLevel::PopulationChampion);
    /// logger.log(&population, &|o| [o.fitness(), o.genome().values()[1]], ["fitness", "second"]);
    ///
    /// let log = logger.iter().next().unwrap();
    /// assert_eq!(log.genome_stats[0].1.maximum, population.top_fitness());
    /// ```
    pub fn log<C, OSE, const N: usize>(
        &mut self,
        population: &Population<C, G>,
        organism_stat_extractor: &OSE,
        stat_names: [&str; N],
    ) where
        G: Genome<Config = C>,
        OSE: Fn(&Organism<G>) -> [f32; N],
    {
        let stats: Vec<[f32; N]> = population
            .organisms()
            .map(organism_stat_extractor)
            .collect();
        let genome_stats = stat_names
            .iter()
            .map(|name| name.to_string())
            .zip(unzip_n_vecs(stats.into_iter()))
            .map(|(name, data)| (name, Stats::from(data.into_iter())))
            .collect();
        let genome_of = |index: usize| population.organism(index).map(|o| o.genome().clone());
        self.logs.push(Log {
            generation: population.generation(),
            species_count: population.num_species(),
            threshold: population.threshold(),
            top_fitness: population.top_fitness(),
            generation_sample: match self.reporting_level {
                ReportingLevel::AllGenomes => GenerationMemberRecord::Species(
                    population
                        .species()
                        .map(|s| {
                            let genomes = s.members().iter().filter_map(|&m| genome_of(m));
                            (s.id(), genomes.collect(), s.time_stagnated())
                        })
                        .collect(),
                ),
                ReportingLevel::SpeciesPrototypes => GenerationMemberRecord::SpeciesPrototypes(
                    population
                        .species()
                        .filter_map(|s| {
                            genome_of(s.prototype()).map(|g| (s.id(), g, s.time_stagnated()))
                        })
                        .collect(),
                ),
                ReportingLevel::PopulationChampion => {
                    GenerationMemberRecord::PopulationChampion(population.champion().clone())
                }
                ReportingLevel::NoGenomes => GenerationMemberRecord::None,
            },
            genome_stats,
        })
    }

    /// Iterate over all logged snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &Log<G>> {
        self.logs.iter()
    }
}

fn unzip_n_vecs<T: Clone, const N: usize>(iter: impl Iterator<Item = [T; N]>) -> Vec<Vec<T>> {
    let mut vecs = vec![Vec::default(); N];
    for items in iter {
        for (vec, item) in vecs.iter_mut().zip(items) {
            vec.push(item);
        }
    }
    vecs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_median_is_midpoint() {
        let stats = Stats::from([4.0, 1.0, 3.0, 2.0].iter().copied());
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.mean, 2.5);
    }

    #[test]
    fn nan_is_ignored() {
        let stats = Stats::from([f32::NAN, 1.0, 3.0].iter().copied());
        assert_eq!(stats.maximum, 3.0);
        assert_eq!(stats.minimum, 1.0);
        assert_eq!(stats.median, 2.0);
    }

    #[test]
    fn empty_stats_are_nan() {
        let stats = Stats::from(std::iter::empty());
        assert!(stats.maximum.is_nan() && stats.median.is_nan());
    }

    #[test]
    fn unzip() {
        let columns = unzip_n_vecs(vec![[1, 2], [3, 4], [5, 6]].into_iter());
        assert_eq!(columns, vec![vec![1, 3, 5], vec![2, 4, 6]]);
    }
}
