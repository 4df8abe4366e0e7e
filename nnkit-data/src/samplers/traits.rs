use std::fmt::Debug;

/// Decides the order in which a [`MiniBatchLoader`](crate::MiniBatchLoader)
/// visits the samples of a dataset.
pub trait Sampler: Debug {
    /// Returns an iterator over the indices of a dataset of `dataset_len`
    /// samples. Called once per epoch.
    fn iter(&mut self, dataset_len: usize) -> Box<dyn Iterator<Item = usize>>;

    /// Number of indices [`iter`](Sampler::iter) yields.
    fn len(&self, dataset_len: usize) -> usize {
        dataset_len
    }
}
