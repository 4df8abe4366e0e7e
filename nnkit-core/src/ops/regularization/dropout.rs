use log::debug;
use rand::Rng;

use crate::autograd::{BackwardOp, Graph, NodeId};
use crate::error::NnKitError;
use crate::ops::{input_value, Op};
use crate::tensor::Tensor;

/// Probability of keeping a unit when none is given.
pub const DEFAULT_KEEP_PROB: f32 = 0.8;

/// Backward pass of dropout: `x.grad += g·mask`.
///
/// The mask holds 1.0 for kept units and 0.0 for dropped ones.
#[derive(Debug, Clone)]
pub struct DropoutBackward {
    x: NodeId,
    mask: Tensor,
    keep_prob: f32,
}

impl DropoutBackward {
    pub fn mask(&self) -> &Tensor {
        &self.mask
    }

    pub fn keep_prob(&self) -> f32 {
        self.keep_prob
    }
}

impl BackwardOp for DropoutBackward {
    fn backward(&self, _graph: &Graph, _output: &Tensor, grad_output: &Tensor) -> Result<Vec<Tensor>, NnKitError> {
        Ok(vec![grad_output.zip_map(&self.mask, "Dropout backward", |g, m| g * m)?])
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.x]
    }
}

fn check_keep_prob(keep_prob: f32) -> Result<(), NnKitError> {
    if keep_prob > 0.0 && keep_prob <= 1.0 {
        Ok(())
    } else {
        Err(NnKitError::ConfigurationError(format!(
            "Dropout keep probability must be in (0, 1], got {}",
            keep_prob
        )))
    }
}

/// Dropout with a fresh Bernoulli(`keep_prob`) mask drawn from `rng`:
/// `y = x·mask/keep_prob`.
pub fn dropout_op<R: Rng + ?Sized>(
    graph: &mut Graph,
    x: NodeId,
    keep_prob: f32,
    rng: &mut R,
) -> Result<NodeId, NnKitError> {
    check_keep_prob(keep_prob)?;
    let shape = input_value(graph, x, "Dropout")?.shape().to_vec();
    let numel = shape.iter().product();
    let mask_data: Vec<f32> = (0..numel)
        .map(|_| if rng.gen::<f32>() < keep_prob { 1.0 } else { 0.0 })
        .collect();
    let mask = Tensor::new(mask_data, shape)?;
    dropout_with_mask_op(graph, x, keep_prob, mask)
}

/// Dropout with a caller-supplied mask, shaped like `x`.
pub fn dropout_with_mask_op(graph: &mut Graph, x: NodeId, keep_prob: f32, mask: Tensor) -> Result<NodeId, NnKitError> {
    check_keep_prob(keep_prob)?;
    let value = input_value(graph, x, "Dropout")?
        .zip_map(&mask, "Dropout", |v, m| v * m / keep_prob)?;
    debug!("Dropout forward: {:?}, keep_prob {}", value.shape(), keep_prob);
    graph.push_op(value, Op::Dropout(DropoutBackward { x, mask, keep_prob }))
}

#[cfg(test)]
#[path = "dropout_test.rs"]
mod tests;
