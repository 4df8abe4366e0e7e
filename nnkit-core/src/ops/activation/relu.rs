use log::debug;

use crate::autograd::{BackwardOp, Graph, NodeId};
use crate::error::NnKitError;
use crate::ops::{input_value, Op};
use crate::tensor::Tensor;

#[derive(Debug, Clone)]
pub struct ReluBackward {
    x: NodeId,
}

impl BackwardOp for ReluBackward {
    fn backward(&self, _graph: &Graph, output: &Tensor, grad_output: &Tensor) -> Result<Vec<Tensor>, NnKitError> {
        // y > 0 exactly where x > 0
        let grad = grad_output.zip_map(output, "ReLU backward", |g, y| if y > 0.0 { g } else { 0.0 })?;
        Ok(vec![grad])
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.x]
    }
}

/// Rectified linear unit, `max(0, x)`.
pub fn relu_op(graph: &mut Graph, x: NodeId) -> Result<NodeId, NnKitError> {
    let value = input_value(graph, x, "ReLU")?.map(|v| v.max(0.0));
    debug!("ReLU forward: {:?}", value.shape());
    graph.push_op(value, Op::ReLU(ReluBackward { x }))
}

#[cfg(test)]
#[path = "relu_test.rs"]
mod tests;
