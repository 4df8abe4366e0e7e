use log::debug;

use crate::autograd::{BackwardOp, Graph, NodeId};
use crate::error::NnKitError;
use crate::ops::{input_value, Op};
use crate::tensor::Tensor;

/// Backward pass of [`softmax_op`].
///
/// Uses the diagonal of the softmax Jacobian only: `x.grad += g·y·(1 - y)`.
/// That is not the derivative of softmax on its own. It is meant to be
/// followed by [`ce_loss_op`](crate::ops::ce_loss_op), whose prediction
/// gradient `(p - t)/B` already is the combined softmax + cross-entropy
/// gradient with respect to the logits.
#[derive(Debug, Clone)]
pub struct SoftmaxBackward {
    x: NodeId,
}

impl BackwardOp for SoftmaxBackward {
    fn backward(&self, _graph: &Graph, output: &Tensor, grad_output: &Tensor) -> Result<Vec<Tensor>, NnKitError> {
        let grad = grad_output.zip_map(output, "SoftMax backward", |g, y| g * y * (1.0 - y))?;
        Ok(vec![grad])
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.x]
    }
}

/// Row-wise softmax over the last axis, shifted by the row maximum.
pub fn softmax_op(graph: &mut Graph, x: NodeId) -> Result<NodeId, NnKitError> {
    let x_value = input_value(graph, x, "SoftMax")?;
    let last = x_value.rank() - 1;
    let shifted = x_value.sub(&x_value.max_axis(last)?)?;
    let exp = shifted.map(f32::exp);
    let value = exp.div(&exp.sum_axis(last)?)?;
    debug!("SoftMax forward: {:?}", value.shape());
    graph.push_op(value, Op::SoftMax(SoftmaxBackward { x }))
}

#[cfg(test)]
#[path = "softmax_test.rs"]
mod tests;
