//! # MiniBatchLoader
//!
//! Groups the samples of a [`Dataset`] into mini batches, in the order given
//! by a [`Sampler`].
//!
//! ```
//! use nnkit_core::Tensor;
//! use nnkit_data::{mini_batches, BatchSpec};
//!
//! let x = Tensor::new((0..10).map(|v| v as f32).collect(), vec![5, 2]).unwrap();
//! let t = Tensor::new(vec![0.0, 1.0, 0.0, 1.0, 0.0], vec![5, 1]).unwrap();
//! let mut loader = mini_batches(x, t, BatchSpec::Size(2)).unwrap();
//!
//! let starts: Vec<usize> = loader.iter().map(|b| b.unwrap().2).collect();
//! assert_eq!(starts, vec![0, 2, 4]);
//! ```

use log::debug;
use nnkit_core::{NnKitError, Tensor};

use crate::datasets::{Dataset, TensorDataset};
use crate::samplers::{Sampler, SequentialSampler};

/// How to split a dataset into batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchSpec {
    /// Batches of `n` samples; the last one may be smaller.
    Size(usize),
    /// Batches sized `⌈len / k⌉`, so that at most `k` batches are produced.
    Count(usize),
}

impl BatchSpec {
    /// Resolves the batch size for a dataset of `len` samples.
    ///
    /// # Errors
    /// `ConfigurationError` for a zero size or count.
    pub fn batch_size(&self, len: usize) -> Result<usize, NnKitError> {
        match *self {
            BatchSpec::Size(0) | BatchSpec::Count(0) => Err(NnKitError::ConfigurationError(format!(
                "{:?} must be greater than zero",
                self
            ))),
            BatchSpec::Size(n) => Ok(n),
            BatchSpec::Count(k) => Ok(len.div_ceil(k).max(1)),
        }
    }
}

/// Mini-batch iterator factory over a dataset.
///
/// Each call to [`iter`](MiniBatchLoader::iter) starts a new epoch: the
/// sampler is asked for a fresh ordering and batches are cut from it.
#[derive(Debug)]
pub struct MiniBatchLoader<D: Dataset, S: Sampler> {
    dataset: D,
    sampler: S,
    batch_size: usize,
}

impl<D: Dataset, S: Sampler> MiniBatchLoader<D, S> {
    pub fn new(dataset: D, spec: BatchSpec, sampler: S) -> Result<Self, NnKitError> {
        let batch_size = spec.batch_size(dataset.len())?;
        debug!(
            "MiniBatchLoader: {} samples, batch size {} ({:?})",
            dataset.len(),
            batch_size,
            spec
        );
        Ok(MiniBatchLoader {
            dataset,
            sampler,
            batch_size,
        })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of batches one epoch produces.
    pub fn num_batches(&self) -> usize {
        self.sampler.len(self.dataset.len()).div_ceil(self.batch_size)
    }

    pub fn dataset(&self) -> &D {
        &self.dataset
    }

    /// Starts a new epoch.
    pub fn iter(&mut self) -> Batches<'_, D> {
        let indices = self.sampler.iter(self.dataset.len()).collect();
        Batches {
            dataset: &self.dataset,
            indices,
            batch_size: self.batch_size,
            position: 0,
        }
    }
}

/// One epoch of batches.
///
/// Yields `(inputs, targets, start)` where `start` is the position of the
/// batch's first sample in the epoch's ordering. For a sequential sampler this
/// is the index of that sample in the dataset.
#[derive(Debug)]
pub struct Batches<'a, D: Dataset> {
    dataset: &'a D,
    indices: Vec<usize>,
    batch_size: usize,
    position: usize,
}

impl<D: Dataset<Item = (Tensor, Tensor)>> Iterator for Batches<'_, D> {
    type Item = Result<(Tensor, Tensor, usize), NnKitError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.indices.len() {
            return None;
        }
        let start = self.position;
        let end = (start + self.batch_size).min(self.indices.len());
        self.position = end;
        Some(
            self.dataset
                .get_batch(&self.indices[start..end])
                .map(|(inputs, targets)| (inputs, targets, start)),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.indices.len() - self.position).div_ceil(self.batch_size);
        (remaining, Some(remaining))
    }
}

/// Sequential mini batches over `(inputs, targets)`.
pub fn mini_batches(
    inputs: Tensor,
    targets: Tensor,
    spec: BatchSpec,
) -> Result<MiniBatchLoader<TensorDataset, SequentialSampler>, NnKitError> {
    MiniBatchLoader::new(TensorDataset::new(inputs, targets)?, spec, SequentialSampler::new())
}

#[cfg(test)]
#[path = "dataloader_test.rs"]
mod tests;
