use log::debug;

use crate::autograd::{BackwardOp, Graph, NodeId};
use crate::error::NnKitError;
use crate::ops::loss::{loss_inputs, symmetric_grads};
use crate::ops::{input_value, Op};
use crate::tensor::Tensor;

/// Backward pass of the squared-error loss: `p.grad += g·(p - t)/B`, `t.grad -= same`.
#[derive(Debug, Clone)]
pub struct L2LossBackward {
    p: NodeId,
    t: NodeId,
    batch_size: usize,
}

impl BackwardOp for L2LossBackward {
    fn backward(&self, graph: &Graph, _output: &Tensor, grad_output: &Tensor) -> Result<Vec<Tensor>, NnKitError> {
        let p = input_value(graph, self.p, "L2Loss")?;
        let t = input_value(graph, self.t, "L2Loss")?;
        symmetric_grads(p.sub(t)?, grad_output, self.batch_size)
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.p, self.t]
    }
}

/// `½·Σ(p - t)² / B`.
pub fn l2_loss_op(graph: &mut Graph, p: NodeId, t: NodeId) -> Result<NodeId, NnKitError> {
    let (p_value, t_value, batch_size) = loss_inputs(graph, p, t, "L2Loss")?;
    let total = p_value.zip_map(t_value, "L2Loss", |p, t| (p - t) * (p - t))?.sum();
    let value = Tensor::scalar(0.5 * total / batch_size as f32);
    debug!("L2Loss forward: batch {}, loss {}", batch_size, value.data()[0]);
    graph.push_op(value, Op::L2Loss(L2LossBackward { p, t, batch_size }))
}

#[cfg(test)]
#[path = "l2_test.rs"]
mod tests;
