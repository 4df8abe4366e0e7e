use log::debug;

use crate::autograd::{BackwardOp, Graph, NodeId};
use crate::error::NnKitError;
use crate::ops::{input_value, Op};
use crate::tensor::Tensor;

/// Backward pass of `y = x·w`.
#[derive(Debug, Clone)]
pub struct MatMulBackward {
    x: NodeId,
    w: NodeId,
}

impl BackwardOp for MatMulBackward {
    fn backward(&self, graph: &Graph, _output: &Tensor, grad_output: &Tensor) -> Result<Vec<Tensor>, NnKitError> {
        let x = input_value(graph, self.x, "MatMul")?;
        let w = input_value(graph, self.w, "MatMul")?;
        // dL/dx = g·wᵗ, dL/dw = xᵗ·g
        let grad_x = grad_output.matmul(&w.transpose()?)?;
        let grad_w = x.transpose()?.matmul(grad_output)?;
        Ok(vec![grad_x, grad_w])
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.x, self.w]
    }
}

/// Matrix product node `x·w` for `x: [batch, in]` and `w: [in, out]`.
///
/// # Errors
/// `ShapeMismatch` when the inner dimensions differ.
pub fn matmul_op(graph: &mut Graph, x: NodeId, w: NodeId) -> Result<NodeId, NnKitError> {
    let x_value = input_value(graph, x, "MatMul")?;
    let w_value = input_value(graph, w, "MatMul")?;
    let value = x_value.matmul(w_value)?;
    debug!(
        "MatMul forward: {:?} x {:?} -> {:?}",
        x_value.shape(),
        w_value.shape(),
        value.shape()
    );
    graph.push_op(value, Op::MatMul(MatMulBackward { x, w }))
}

#[cfg(test)]
#[path = "matmul_test.rs"]
mod tests;
