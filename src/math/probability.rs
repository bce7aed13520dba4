//! Seeded random selection used by queue building and placement search

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use std::ops::Range;

/// Seeded random selector for reproducible stochastic choices
///
/// Every random decision in a generation run goes through one selector, so a
/// run is fully determined by its seed.
#[derive(Debug, Clone)]
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform sample from `[0, 1)`
    pub fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Bernoulli trial: true iff a uniform draw is below `probability`
    pub fn chance(&mut self, probability: f64) -> bool {
        self.unit() < probability
    }

    /// Uniform index into a collection of `len` items
    pub fn index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.rng.random_range(0..len))
    }

    /// Uniform integer from a half-open range, or `range.start` when it is empty
    pub fn range(&mut self, range: Range<usize>) -> usize {
        if range.is_empty() {
            range.start
        } else {
            self.rng.random_range(range)
        }
    }

    /// Uniformly choose one element of a slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.index(items.len()).and_then(|i| items.get(i))
    }

    /// Shuffle a slice in place with a uniform permutation
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    /// Generic weighted random selection
    ///
    /// Returns an index into `weights` using the cumulative distribution.
    /// Negative and NaN weights count as zero; `None` when nothing has weight.
    pub fn weighted_choice(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().copied().map(sanitize_weight).sum();
        if total <= 0.0 {
            return None;
        }

        let mut rand_val = self.unit() * total;
        let mut last_positive = None;
        for (i, &weight) in weights.iter().enumerate() {
            let weight = sanitize_weight(weight);
            if weight <= 0.0 {
                continue;
            }
            last_positive = Some(i);
            rand_val -= weight;
            if rand_val < 0.0 {
                return Some(i);
            }
        }

        // Floating point drift can leave a sliver past the final bucket
        last_positive
    }

    /// Weighted pick over explicit `(item, weight)` pairs
    pub fn weighted_pick<'a, T>(&mut self, candidates: &'a [(T, f64)]) -> Option<&'a T> {
        let weights: Vec<f64> = candidates.iter().map(|(_, weight)| *weight).collect();
        self.weighted_choice(&weights)
            .and_then(|i| candidates.get(i))
            .map(|(item, _)| item)
    }
}

fn sanitize_weight(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}
