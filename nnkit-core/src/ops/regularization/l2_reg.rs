use log::debug;

use crate::autograd::{BackwardOp, Graph, NodeId};
use crate::error::NnKitError;
use crate::ops::{input_value, Op};
use crate::tensor::Tensor;

/// Backward pass of the L2 weight penalty.
///
/// Parents are the loss followed by every penalized parameter. The batch
/// size is captured at construction.
#[derive(Debug, Clone)]
pub struct L2RegBackward {
    loss: NodeId,
    params: Vec<NodeId>,
    rate: f32,
    batch_size: usize,
}

impl L2RegBackward {
    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}

impl BackwardOp for L2RegBackward {
    fn backward(&self, graph: &Graph, _output: &Tensor, grad_output: &Tensor) -> Result<Vec<Tensor>, NnKitError> {
        // The penalty is added to every element of the loss value.
        let factor = grad_output.sum() * self.rate / self.batch_size as f32;
        let mut grads = Vec::with_capacity(1 + self.params.len());
        grads.push(grad_output.clone());
        for &param in &self.params {
            grads.push(input_value(graph, param, "L2Reg")?.scale(factor));
        }
        Ok(grads)
    }

    fn inputs(&self) -> Vec<NodeId> {
        let mut inputs = Vec::with_capacity(1 + self.params.len());
        inputs.push(self.loss);
        inputs.extend_from_slice(&self.params);
        inputs
    }
}

/// Adds `rate/(2B)·Σ‖p‖²` to `loss`, where `B` is the batch size of `target`.
///
/// `target` only supplies the batch size and does not become a parent.
///
/// # Errors
/// `ConfigurationError` if `rate` is negative or not finite.
pub fn l2_reg_op(
    graph: &mut Graph,
    loss: NodeId,
    params: &[NodeId],
    rate: f32,
    target: NodeId,
) -> Result<NodeId, NnKitError> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(NnKitError::ConfigurationError(format!(
            "L2Reg rate must be a non-negative number, got {}",
            rate
        )));
    }
    let batch_size = input_value(graph, target, "L2Reg")?.batch_size();
    if batch_size == 0 {
        return Err(NnKitError::InvalidArgument("L2Reg target has an empty batch".to_string()));
    }
    let mut norm_sq = 0.0;
    for &param in params {
        norm_sq += input_value(graph, param, "L2Reg")?.frobenius_sq();
    }
    let penalty = rate / (2.0 * batch_size as f32) * norm_sq;
    let value = input_value(graph, loss, "L2Reg")?.map(|l| l + penalty);
    debug!(
        "L2Reg forward: {} params, rate {}, penalty {}",
        params.len(),
        rate,
        penalty
    );
    let op = L2RegBackward {
        loss,
        params: params.to_vec(),
        rate,
        batch_size,
    };
    graph.push_op(value, Op::L2Reg(op))
}

#[cfg(test)]
#[path = "l2_reg_test.rs"]
mod tests;
