// src/tensor/create.rs

use rand::Rng;
use rand_distr::{Distribution, StandardNormal, Uniform};

use crate::error::NnKitError;
use crate::tensor::Tensor;

/// Creates a new tensor filled with zeros with the specified shape.
pub fn zeros(shape: &[usize]) -> Result<Tensor, NnKitError> {
    full(shape, 0.0)
}

/// Creates a new tensor filled with ones with the specified shape.
pub fn ones(shape: &[usize]) -> Result<Tensor, NnKitError> {
    full(shape, 1.0)
}

/// Creates a new tensor filled with a specific value with the specified shape.
pub fn full(shape: &[usize], value: f32) -> Result<Tensor, NnKitError> {
    let numel = shape.iter().product();
    Tensor::new(vec![value; numel], shape.to_vec())
}

/// Creates a tensor of zeros with the same shape as `tensor`.
pub fn zeros_like(tensor: &Tensor) -> Tensor {
    Tensor {
        data: vec![0.0; tensor.numel()],
        shape: tensor.shape.clone(),
    }
}

/// Creates a tensor of ones with the same shape as `tensor`.
pub fn ones_like(tensor: &Tensor) -> Tensor {
    Tensor {
        data: vec![1.0; tensor.numel()],
        shape: tensor.shape.clone(),
    }
}

/// Samples every element from the standard normal distribution N(0, 1).
pub fn randn<R: Rng + ?Sized>(shape: &[usize], rng: &mut R) -> Result<Tensor, NnKitError> {
    let numel: usize = shape.iter().product();
    let data: Vec<f32> = (0..numel).map(|_| StandardNormal.sample(rng)).collect();
    Tensor::new(data, shape.to_vec())
}

/// Samples every element uniformly from `[low, high)`.
///
/// # Errors
/// `ConfigurationError` if `low >= high` or either bound is not finite.
pub fn rand_uniform<R: Rng + ?Sized>(
    shape: &[usize],
    low: f32,
    high: f32,
    rng: &mut R,
) -> Result<Tensor, NnKitError> {
    if low >= high || !low.is_finite() || !high.is_finite() {
        return Err(NnKitError::ConfigurationError(format!(
            "rand_uniform requires low < high, got [{}, {})",
            low, high
        )));
    }
    let dist = Uniform::new(low, high);
    let numel: usize = shape.iter().product();
    let data: Vec<f32> = (0..numel).map(|_| dist.sample(rng)).collect();
    Tensor::new(data, shape.to_vec())
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;
