use log::debug;

use crate::autograd::{BackwardOp, Graph, NodeId};
use crate::error::NnKitError;
use crate::ops::{input_value, Op};
use crate::tensor::Tensor;

#[derive(Debug, Clone)]
pub struct TanhBackward {
    x: NodeId,
}

impl BackwardOp for TanhBackward {
    fn backward(&self, _graph: &Graph, output: &Tensor, grad_output: &Tensor) -> Result<Vec<Tensor>, NnKitError> {
        let grad = grad_output.zip_map(output, "Tanh backward", |g, y| g * (1.0 - y * y))?;
        Ok(vec![grad])
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.x]
    }
}

pub fn tanh_op(graph: &mut Graph, x: NodeId) -> Result<NodeId, NnKitError> {
    let value = input_value(graph, x, "Tanh")?.map(f32::tanh);
    debug!("Tanh forward: {:?}", value.shape());
    graph.push_op(value, Op::Tanh(TanhBackward { x }))
}

#[cfg(test)]
#[path = "tanh_test.rs"]
mod tests;
