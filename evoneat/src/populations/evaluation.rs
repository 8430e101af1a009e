use super::Organism;

use rayon::prelude::*;

/// Scores newborn organisms. Scoring never touches the
/// population's random number generator, so every
/// implementor yields the same evolution for a pure
/// fitness function.
pub(super) trait Evaluator<G> {
    /// Returns the fitness of the organism in each slot, in order.
    fn score(&mut self, organisms: &[Organism<G>], slots: &[usize]) -> Vec<f32>;
}

/// Scores organisms one after another on the calling thread.
pub(super) struct Sequential<F>(pub F);

impl<G, F> Evaluator<G> for Sequential<F>
where
    F: FnMut(&G) -> f32,
{
    fn score(&mut self, organisms: &[Organism<G>], slots: &[usize]) -> Vec<f32> {
        slots
            .iter()
            .map(|&slot| (self.0)(&organisms[slot].genome))
            .collect()
    }
}

/// Scores organisms on rayon's global thread pool.
pub(super) struct Parallel<F>(pub F);

impl<G, F> Evaluator<G> for Parallel<F>
where
    G: Sync,
    F: Fn(&G) -> f32 + Sync,
{
    fn score(&mut self, organisms: &[Organism<G>], slots: &[usize]) -> Vec<f32> {
        let evaluator = &self.0;
        slots
            .par_iter()
            .map(|&slot| evaluator(&organisms[slot].genome))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParameterVector;

    #[test]
    fn parallel_scores_match_sequential() {
        let organisms: Vec<_> = (0..64)
            .map(|i| Organism::new(i, ParameterVector::from(vec![i as f32, 1.0])))
            .collect();
        let slots: Vec<usize> = (0..64).rev().step_by(3).collect();
        let fitness = |g: &ParameterVector| g.values().iter().map(|v| v * v).sum::<f32>();

        let sequential = Sequential(fitness).score(&organisms, &slots);
        let parallel = Parallel(fitness).score(&organisms, &slots);
        assert_eq!(sequential, parallel);
        assert_eq!(sequential[0], 63.0 * 63.0 + 1.0);
    }
}
