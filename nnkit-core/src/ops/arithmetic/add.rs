use log::debug;

use crate::autograd::{BackwardOp, Graph, NodeId};
use crate::error::NnKitError;
use crate::ops::{input_value, Op};
use crate::tensor::Tensor;

/// Backward pass of the broadcasting add `y = x + b`.
///
/// Each input receives the upstream gradient summed over the axes it was
/// broadcast along, so a `[1, n]` bias collects the column sums of `g`.
#[derive(Debug, Clone)]
pub struct AddBackward {
    x: NodeId,
    b: NodeId,
    x_shape: Vec<usize>,
    b_shape: Vec<usize>,
}

impl BackwardOp for AddBackward {
    fn backward(&self, _graph: &Graph, _output: &Tensor, grad_output: &Tensor) -> Result<Vec<Tensor>, NnKitError> {
        Ok(vec![
            grad_output.reduce_to_shape(&self.x_shape)?,
            grad_output.reduce_to_shape(&self.b_shape)?,
        ])
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.x, self.b]
    }
}

/// Adds `b` to `x`, broadcasting `b` over the batch dimension.
pub fn add_op(graph: &mut Graph, x: NodeId, b: NodeId) -> Result<NodeId, NnKitError> {
    let x_value = input_value(graph, x, "Add")?;
    let b_value = input_value(graph, b, "Add")?;
    let value = x_value.add(b_value)?;
    debug!("Add forward: {:?} + {:?}", x_value.shape(), b_value.shape());
    let op = AddBackward {
        x,
        b,
        x_shape: x_value.shape().to_vec(),
        b_shape: b_value.shape().to_vec(),
    };
    graph.push_op(value, Op::Add(op))
}

#[cfg(test)]
#[path = "add_test.rs"]
mod tests;
