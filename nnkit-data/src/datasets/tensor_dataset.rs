use nnkit_core::{NnKitError, Tensor};

use super::traits::Dataset;

/// Inputs and targets stored as two tensors whose first dimension indexes
/// samples.
///
/// Items are `(inputs, targets)` pairs sliced along axis 0; the remaining
/// dimensions are kept, so a single sample of a `[n, 3]` input tensor comes
/// back as `[1, 3]`.
#[derive(Debug, Clone)]
pub struct TensorDataset {
    inputs: Tensor,
    targets: Tensor,
}

impl TensorDataset {
    /// # Errors
    /// `ShapeMismatch` if the two tensors hold a different number of samples.
    pub fn new(inputs: Tensor, targets: Tensor) -> Result<Self, NnKitError> {
        if inputs.shape()[0] != targets.shape()[0] {
            return Err(NnKitError::ShapeMismatch {
                expected: vec![inputs.shape()[0]],
                actual: vec![targets.shape()[0]],
                operation: "TensorDataset::new".to_string(),
            });
        }
        Ok(TensorDataset { inputs, targets })
    }

    pub fn inputs(&self) -> &Tensor {
        &self.inputs
    }

    pub fn targets(&self) -> &Tensor {
        &self.targets
    }
}

impl Dataset for TensorDataset {
    type Item = (Tensor, Tensor);

    fn get(&self, index: usize) -> Result<Self::Item, NnKitError> {
        Ok((
            self.inputs.rows(index, index + 1)?,
            self.targets.rows(index, index + 1)?,
        ))
    }

    fn get_batch(&self, indices: &[usize]) -> Result<Self::Item, NnKitError> {
        Ok((self.inputs.select_rows(indices)?, self.targets.select_rows(indices)?))
    }

    fn len(&self) -> usize {
        self.inputs.shape()[0]
    }
}

#[cfg(test)]
#[path = "tensor_dataset_test.rs"]
mod tests;
