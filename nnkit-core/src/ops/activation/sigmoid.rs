use log::debug;

use crate::autograd::{BackwardOp, Graph, NodeId};
use crate::error::NnKitError;
use crate::ops::{input_value, Op};
use crate::tensor::Tensor;

#[derive(Debug, Clone)]
pub struct SigmoidBackward {
    x: NodeId,
}

impl BackwardOp for SigmoidBackward {
    fn backward(&self, _graph: &Graph, output: &Tensor, grad_output: &Tensor) -> Result<Vec<Tensor>, NnKitError> {
        let grad = grad_output.zip_map(output, "Sigmoid backward", |g, y| g * y * (1.0 - y))?;
        Ok(vec![grad])
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.x]
    }
}

/// Logistic function. Evaluated in a form that never exponentiates a large
/// positive number.
pub(crate) fn logistic(x: f32) -> f32 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

pub fn sigmoid_op(graph: &mut Graph, x: NodeId) -> Result<NodeId, NnKitError> {
    let value = input_value(graph, x, "Sigmoid")?.map(logistic);
    debug!("Sigmoid forward: {:?}", value.shape());
    graph.push_op(value, Op::Sigmoid(SigmoidBackward { x }))
}

#[cfg(test)]
#[path = "sigmoid_test.rs"]
mod tests;
