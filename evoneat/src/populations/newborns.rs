use super::organism::fitness_rank;

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// An organism awaiting speciation.
#[derive(Clone, Copy, Debug)]
pub(super) struct Newborn {
    pub fitness: f32,
    pub index: usize,
}

impl PartialEq for Newborn {
    fn eq(&self, other: &Newborn) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Newborn {}

impl PartialOrd for Newborn {
    fn partial_cmp(&self, other: &Newborn) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Fitter first, lower slot first among equals.
impl Ord for Newborn {
    fn cmp(&self, other: &Newborn) -> Ordering {
        fitness_rank(self.fitness)
            .total_cmp(&fitness_rank(other.fitness))
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// Max-priority queue of newborns keyed by fitness.
#[derive(Clone, Debug, Default)]
pub(super) struct NewbornQueue {
    heap: BinaryHeap<Newborn>,
}

impl NewbornQueue {
    pub fn push(&mut self, index: usize, fitness: f32) {
        self.heap.push(Newborn { fitness, index });
    }

    pub fn pop(&mut self) -> Option<Newborn> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_best_first() {
        let mut queue = NewbornQueue::default();
        for (index, fitness) in [(0, 1.0), (1, f32::NAN), (2, 3.0), (3, -4.0), (4, 3.0)] {
            queue.push(index, fitness);
        }
        assert_eq!(queue.len(), 5);
        let order: Vec<usize> = std::iter::from_fn(|| queue.pop()).map(|n| n.index).collect();
        assert_eq!(order, [2, 4, 0, 3, 1]);
    }
}
