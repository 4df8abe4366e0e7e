//! Parameter initialization.
//!
//! Every function creates a new variable node in the given [`Graph`] and
//! returns its handle. Random initializers draw from the caller's RNG so that
//! runs can be reproduced with a seeded generator.

use rand::Rng;

use crate::autograd::{Graph, NodeId};
use crate::error::NnKitError;
use crate::tensor::create::{full, rand_uniform, randn};
use crate::EPSILON;

/// Scale applied by [`rand1`] when none is given.
pub const DEFAULT_RAND1_SCALE: f32 = 0.01;

fn check_dims(dims: &[usize], operation: &str) -> Result<(), NnKitError> {
    if dims.is_empty() || dims.contains(&0) {
        return Err(NnKitError::InvalidArgument(format!(
            "{} requires non-empty, non-zero dimensions, got {:?}",
            operation, dims
        )));
    }
    Ok(())
}

/// Normal(0, 1) samples scaled by `√(n/dims[0] + ε)`.
///
/// With `n = 1` this is Xavier initialization for a weight matrix with
/// `dims[0]` inputs; `n = 2` gives He initialization.
pub fn xavier<R: Rng + ?Sized>(graph: &mut Graph, dims: &[usize], n: f32, rng: &mut R) -> Result<NodeId, NnKitError> {
    check_dims(dims, "xavier")?;
    let scale = (n / dims[0] as f32 + EPSILON).sqrt();
    let value = randn(dims, rng)?.scale(scale);
    Ok(graph.var(Some(value)))
}

/// Normal(0, 1) samples scaled by `scale`.
pub fn rand1<R: Rng + ?Sized>(graph: &mut Graph, dims: &[usize], scale: f32, rng: &mut R) -> Result<NodeId, NnKitError> {
    check_dims(dims, "rand1")?;
    let value = randn(dims, rng)?.scale(scale);
    Ok(graph.var(Some(value)))
}

/// Uniform samples in `(-l, l)` with `l = √(3/(mean(dims) + ε))`.
pub fn rand2<R: Rng + ?Sized>(graph: &mut Graph, dims: &[usize], rng: &mut R) -> Result<NodeId, NnKitError> {
    check_dims(dims, "rand2")?;
    let mean = dims.iter().sum::<usize>() as f32 / dims.len() as f32;
    let limit = (3.0 / (mean + EPSILON)).sqrt();
    let value = rand_uniform(dims, -limit, limit, rng)?;
    Ok(graph.var(Some(value)))
}

/// All zeros, e.g. for biases and batch-norm shifts.
pub fn zero(graph: &mut Graph, dims: &[usize]) -> Result<NodeId, NnKitError> {
    check_dims(dims, "zero")?;
    Ok(graph.var(Some(full(dims, 0.0)?)))
}

/// All ones, e.g. for batch-norm scales and running variances.
pub fn one(graph: &mut Graph, dims: &[usize]) -> Result<NodeId, NnKitError> {
    check_dims(dims, "one")?;
    Ok(graph.var(Some(full(dims, 1.0)?)))
}

#[cfg(test)]
#[path = "init_test.rs"]
mod tests;
