use log::debug;

use crate::autograd::{BackwardOp, Graph, NodeId};
use crate::error::NnKitError;
use crate::ops::loss::{loss_inputs, sign, symmetric_grads};
use crate::ops::{input_value, Op};
use crate::tensor::Tensor;

#[derive(Debug, Clone)]
pub struct L1LossBackward {
    p: NodeId,
    t: NodeId,
    batch_size: usize,
}

impl BackwardOp for L1LossBackward {
    fn backward(&self, graph: &Graph, _output: &Tensor, grad_output: &Tensor) -> Result<Vec<Tensor>, NnKitError> {
        let p = input_value(graph, self.p, "L1Loss")?;
        let t = input_value(graph, self.t, "L1Loss")?;
        let local = p.zip_map(t, "L1Loss backward", |p, t| sign(p - t))?;
        symmetric_grads(local, grad_output, self.batch_size)
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.p, self.t]
    }
}

/// `Σ|p - t| / B`.
pub fn l1_loss_op(graph: &mut Graph, p: NodeId, t: NodeId) -> Result<NodeId, NnKitError> {
    let (p_value, t_value, batch_size) = loss_inputs(graph, p, t, "L1Loss")?;
    let total = p_value.zip_map(t_value, "L1Loss", |p, t| (p - t).abs())?.sum();
    let value = Tensor::scalar(total / batch_size as f32);
    debug!("L1Loss forward: batch {}, loss {}", batch_size, value.data()[0]);
    graph.push_op(value, Op::L1Loss(L1LossBackward { p, t, batch_size }))
}

#[cfg(test)]
#[path = "l1_test.rs"]
mod tests;
