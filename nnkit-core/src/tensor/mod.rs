// src/tensor/mod.rs

use std::fmt;

use crate::error::NnKitError;
use utils::{calculate_strides, canonical_shape};

pub mod create;
pub mod ops;
pub mod utils;

/// Dense, row-major `f32` buffer with a shape of rank two or more.
///
/// Every value and gradient flowing through a [`Graph`](crate::autograd::Graph)
/// is a `Tensor`. Shapes of rank 0 or 1 are promoted on construction by
/// prepending singleton dimensions, so a scalar is stored as `[1, 1]` and a
/// vector of length `n` as `[1, n]`.
#[derive(Clone, PartialEq)]
pub struct Tensor {
    pub(crate) data: Vec<f32>,
    pub(crate) shape: Vec<usize>,
}

impl Tensor {
    /// Creates a new tensor from flattened row-major data.
    ///
    /// # Arguments
    /// * `data`: The elements, in row-major order.
    /// * `shape`: The desired shape. Ranks below two are promoted.
    ///
    /// # Errors
    /// Returns `NnKitError::TensorCreationError` if the length of `data` does not
    /// match the number of elements described by `shape`.
    pub fn new(data: Vec<f32>, shape: Vec<usize>) -> Result<Self, NnKitError> {
        let numel: usize = shape.iter().product();
        if data.len() != numel {
            return Err(NnKitError::TensorCreationError {
                data_len: data.len(),
                shape,
            });
        }
        Ok(Tensor {
            data,
            shape: canonical_shape(shape),
        })
    }

    /// Creates a `[1, 1]` tensor holding a single value.
    pub fn scalar(value: f32) -> Self {
        Tensor {
            data: vec![value],
            shape: vec![1, 1],
        }
    }

    /// Builds a 2-D tensor from a list of equally sized rows.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self, NnKitError> {
        let cols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(NnKitError::ShapeMismatch {
                    expected: vec![cols],
                    actual: vec![row.len()],
                    operation: "Tensor::from_rows".to_string(),
                });
            }
            data.extend_from_slice(row);
        }
        Tensor::new(data, vec![rows.len(), cols])
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }

    pub fn strides(&self) -> Vec<usize> {
        calculate_strides(&self.shape)
    }

    /// Size of the leading (batch) dimension.
    pub fn batch_size(&self) -> usize {
        self.shape[0]
    }

    /// Returns the single element of a one-element tensor.
    ///
    /// # Errors
    /// Returns `NnKitError::ShapeMismatch` if the tensor holds more than one element.
    pub fn item(&self) -> Result<f32, NnKitError> {
        if self.data.len() != 1 {
            return Err(NnKitError::ShapeMismatch {
                expected: vec![1, 1],
                actual: self.shape.clone(),
                operation: "item".to_string(),
            });
        }
        Ok(self.data[0])
    }

    /// Reads one element by its full coordinate.
    pub fn get(&self, coord: &[usize]) -> Option<f32> {
        if coord.len() != self.shape.len() || coord.iter().zip(&self.shape).any(|(c, d)| c >= d) {
            return None;
        }
        let offset: usize = coord
            .iter()
            .zip(self.strides())
            .map(|(c, s)| c * s)
            .sum();
        self.data.get(offset).copied()
    }

    /// Returns a tensor sharing no storage with `self` but laid out with a new shape.
    pub fn reshape(&self, shape: Vec<usize>) -> Result<Self, NnKitError> {
        let numel: usize = shape.iter().product();
        if numel != self.numel() {
            return Err(NnKitError::ShapeMismatch {
                expected: self.shape.clone(),
                actual: shape,
                operation: "reshape".to_string(),
            });
        }
        Tensor::new(self.data.clone(), shape)
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape)
            .field("data", &self.data)
            .finish()
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only matrices get the row layout; higher ranks fall back to flat data.
        if self.rank() == 2 {
            let cols = self.shape[1];
            write!(f, "[")?;
            for (i, row) in self.data.chunks(cols.max(1)).enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:?}", row)?;
            }
            write!(f, "]")
        } else {
            write!(f, "Tensor{:?}{:?}", self.shape, self.data)
        }
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
