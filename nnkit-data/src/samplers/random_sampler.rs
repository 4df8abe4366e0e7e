use log::trace;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::traits::Sampler;

/// Visits every index once per epoch, in a fresh random permutation.
#[derive(Debug, Clone)]
pub struct RandomSampler {
    rng: StdRng,
}

impl RandomSampler {
    /// Creates a sampler seeded from system entropy.
    pub fn new() -> Self {
        RandomSampler {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a sampler whose permutations are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        RandomSampler {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler for RandomSampler {
    fn iter(&mut self, dataset_len: usize) -> Box<dyn Iterator<Item = usize>> {
        let mut indices: Vec<usize> = (0..dataset_len).collect();
        indices.shuffle(&mut self.rng);
        trace!("RandomSampler: drew a permutation of {} indices", dataset_len);
        Box::new(indices.into_iter())
    }
}

#[cfg(test)]
#[path = "random_sampler_test.rs"]
mod tests;
