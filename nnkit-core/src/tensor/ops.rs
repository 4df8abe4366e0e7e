// src/tensor/ops.rs
//
// Eager numeric kernels on `Tensor`. Nothing here records graph structure;
// operator nodes in `crate::ops` build their forward and backward passes on
// top of these.

use crate::error::NnKitError;
use crate::tensor::utils::{broadcast_shapes, calculate_strides, coord_to_index_broadcasted, index_to_coord};
use crate::tensor::Tensor;

impl Tensor {
    /// Applies `f` to every element.
    pub fn map<F: Fn(f32) -> f32>(&self, f: F) -> Tensor {
        Tensor {
            data: self.data.iter().map(|&x| f(x)).collect(),
            shape: self.shape.clone(),
        }
    }

    /// Combines two tensors of identical shape element by element.
    pub fn zip_map<F: Fn(f32, f32) -> f32>(
        &self,
        other: &Tensor,
        operation: &str,
        f: F,
    ) -> Result<Tensor, NnKitError> {
        self.expect_same_shape(other, operation)?;
        Ok(Tensor {
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
            shape: self.shape.clone(),
        })
    }

    /// Combines two tensors element by element after NumPy-style broadcasting.
    pub fn broadcast_zip<F: Fn(f32, f32) -> f32>(&self, other: &Tensor, f: F) -> Result<Tensor, NnKitError> {
        if self.shape == other.shape {
            return self.zip_map(other, "broadcast_zip", f);
        }
        let out_shape = broadcast_shapes(&self.shape, &other.shape)?;
        let numel: usize = out_shape.iter().product();
        let a_strides = calculate_strides(&self.shape);
        let b_strides = calculate_strides(&other.shape);
        let mut data = Vec::with_capacity(numel);
        for i in 0..numel {
            let coord = index_to_coord(i, &out_shape);
            let a = self.data[coord_to_index_broadcasted(&coord, &self.shape, &a_strides)];
            let b = other.data[coord_to_index_broadcasted(&coord, &other.shape, &b_strides)];
            data.push(f(a, b));
        }
        Tensor::new(data, out_shape)
    }

    pub fn add(&self, other: &Tensor) -> Result<Tensor, NnKitError> {
        self.broadcast_zip(other, |a, b| a + b)
    }

    pub fn sub(&self, other: &Tensor) -> Result<Tensor, NnKitError> {
        self.broadcast_zip(other, |a, b| a - b)
    }

    pub fn mul(&self, other: &Tensor) -> Result<Tensor, NnKitError> {
        self.broadcast_zip(other, |a, b| a * b)
    }

    pub fn div(&self, other: &Tensor) -> Result<Tensor, NnKitError> {
        self.broadcast_zip(other, |a, b| a / b)
    }

    /// Multiplies every element by `factor`.
    pub fn scale(&self, factor: f32) -> Tensor {
        self.map(|x| x * factor)
    }

    /// In-place `self += other`; shapes must match exactly.
    pub fn add_assign(&mut self, other: &Tensor) -> Result<(), NnKitError> {
        self.expect_same_shape(other, "add_assign")?;
        self.data.iter_mut().zip(&other.data).for_each(|(a, &b)| *a += b);
        Ok(())
    }

    /// In-place `self -= other`; shapes must match exactly.
    pub fn sub_assign(&mut self, other: &Tensor) -> Result<(), NnKitError> {
        self.expect_same_shape(other, "sub_assign")?;
        self.data.iter_mut().zip(&other.data).for_each(|(a, &b)| *a -= b);
        Ok(())
    }

    /// Matrix product of two 2-D tensors: `[m, k] x [k, n] -> [m, n]`.
    ///
    /// # Errors
    /// `InvalidArgument` if either operand is not 2-D. `ShapeMismatch` if the
    /// inner dimensions differ, with the left operand's column count as
    /// `expected` and the right operand's row count as `actual`.
    pub fn matmul(&self, other: &Tensor) -> Result<Tensor, NnKitError> {
        if self.rank() != 2 || other.rank() != 2 {
            return Err(NnKitError::InvalidArgument(format!(
                "matmul expects 2-D operands, got {:?} x {:?}",
                self.shape, other.shape
            )));
        }
        if self.shape[1] != other.shape[0] {
            return Err(NnKitError::ShapeMismatch {
                expected: vec![self.shape[1]],
                actual: vec![other.shape[0]],
                operation: format!("matmul inner dimension of {:?} x {:?}", self.shape, other.shape),
            });
        }
        let (m, k, n) = (self.shape[0], self.shape[1], other.shape[1]);
        let mut out = vec![0.0f32; m * n];
        for i in 0..m {
            for l in 0..k {
                let a = self.data[i * k + l];
                let b_row = &other.data[l * n..(l + 1) * n];
                let out_row = &mut out[i * n..(i + 1) * n];
                for (o, &b) in out_row.iter_mut().zip(b_row) {
                    *o += a * b;
                }
            }
        }
        Tensor::new(out, vec![m, n])
    }

    /// Transpose of a 2-D tensor.
    pub fn transpose(&self) -> Result<Tensor, NnKitError> {
        if self.rank() != 2 {
            return Err(NnKitError::InvalidArgument(format!(
                "transpose expects a 2-D tensor, got shape {:?}",
                self.shape
            )));
        }
        let (rows, cols) = (self.shape[0], self.shape[1]);
        let mut data = vec![0.0f32; rows * cols];
        for r in 0..rows {
            for c in 0..cols {
                data[c * rows + r] = self.data[r * cols + c];
            }
        }
        Tensor::new(data, vec![cols, rows])
    }

    /// Sum of all elements.
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }

    /// Squared Frobenius norm, `Σ x²`.
    pub fn frobenius_sq(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum()
    }

    /// Sums along `axis`, keeping it as a dimension of size one.
    pub fn sum_axis(&self, axis: usize) -> Result<Tensor, NnKitError> {
        self.reduce_axis(axis, 0.0, |acc, x| acc + x)
    }

    /// Maximum along `axis`, keeping it as a dimension of size one.
    pub fn max_axis(&self, axis: usize) -> Result<Tensor, NnKitError> {
        self.reduce_axis(axis, f32::NEG_INFINITY, f32::max)
    }

    fn reduce_axis<F: Fn(f32, f32) -> f32>(&self, axis: usize, init: f32, f: F) -> Result<Tensor, NnKitError> {
        if axis >= self.rank() {
            return Err(NnKitError::InvalidArgument(format!(
                "axis {} out of range for shape {:?}",
                axis, self.shape
            )));
        }
        let outer: usize = self.shape[..axis].iter().product();
        let dim = self.shape[axis];
        let inner: usize = self.shape[axis + 1..].iter().product();
        let mut out = vec![init; outer * inner];
        for o in 0..outer {
            for d in 0..dim {
                let base = (o * dim + d) * inner;
                for i in 0..inner {
                    let slot = &mut out[o * inner + i];
                    *slot = f(*slot, self.data[base + i]);
                }
            }
        }
        let mut shape = self.shape.clone();
        shape[axis] = 1;
        Tensor::new(out, shape)
    }

    /// Sums a broadcast gradient back down to `target`, the shape it was
    /// broadcast from.
    pub fn reduce_to_shape(&self, target: &[usize]) -> Result<Tensor, NnKitError> {
        if self.shape == target {
            return Ok(self.clone());
        }
        let mismatch = || NnKitError::ShapeMismatch {
            expected: target.to_vec(),
            actual: self.shape.clone(),
            operation: "reduce_to_shape".to_string(),
        };
        if target.len() > self.rank() {
            return Err(mismatch());
        }
        let mut padded = vec![1; self.rank() - target.len()];
        padded.extend_from_slice(target);

        let mut reduced = self.clone();
        for (axis, (&want, &have)) in padded.iter().zip(&self.shape).enumerate() {
            if want == have {
                continue;
            }
            if want != 1 {
                return Err(mismatch());
            }
            reduced = reduced.sum_axis(axis)?;
        }
        reduced.reshape(target.to_vec())
    }

    /// Copies rows `start..end` along axis 0, keeping the remaining dimensions.
    pub fn rows(&self, start: usize, end: usize) -> Result<Tensor, NnKitError> {
        if start > end || end > self.shape[0] {
            return Err(NnKitError::InvalidArgument(format!(
                "row range {}..{} out of bounds for {} rows",
                start, end, self.shape[0]
            )));
        }
        let row_len = self.row_len();
        let mut shape = self.shape.clone();
        shape[0] = end - start;
        Tensor::new(self.data[start * row_len..end * row_len].to_vec(), shape)
    }

    /// Gathers the listed rows along axis 0, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Result<Tensor, NnKitError> {
        let row_len = self.row_len();
        let mut data = Vec::with_capacity(indices.len() * row_len);
        for &idx in indices {
            if idx >= self.shape[0] {
                return Err(NnKitError::InvalidArgument(format!(
                    "row index {} out of bounds for {} rows",
                    idx, self.shape[0]
                )));
            }
            data.extend_from_slice(&self.data[idx * row_len..(idx + 1) * row_len]);
        }
        let mut shape = self.shape.clone();
        shape[0] = indices.len();
        Tensor::new(data, shape)
    }

    fn row_len(&self) -> usize {
        self.shape[1..].iter().product()
    }

    pub(crate) fn expect_same_shape(&self, other: &Tensor, operation: &str) -> Result<(), NnKitError> {
        if self.shape != other.shape {
            return Err(NnKitError::ShapeMismatch {
                expected: self.shape.clone(),
                actual: other.shape.clone(),
                operation: operation.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "ops_test.rs"]
mod tests;
