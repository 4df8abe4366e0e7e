use nnkit_core::NnKitError;

/// Indexed collection of samples.
pub trait Dataset {
    /// What a single sample, or a batch of samples, looks like.
    type Item;

    /// Returns the sample at `index`.
    ///
    /// # Errors
    /// `InvalidArgument` if `index` is out of bounds.
    fn get(&self, index: usize) -> Result<Self::Item, NnKitError>;

    /// Gathers the samples at `indices`, in order, into one item.
    fn get_batch(&self, indices: &[usize]) -> Result<Self::Item, NnKitError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
