use log::{debug, warn};

use crate::autograd::{BackwardOp, Graph, NodeId};
use crate::error::NnKitError;
use crate::ops::loss::loss_inputs;
use crate::ops::{input_value, Op};
use crate::tensor::Tensor;
use crate::EPSILON;

/// Backward pass of cross-entropy.
///
/// The prediction gradient is `g·(p - t)/B`, the gradient of cross-entropy
/// with respect to the logits of a preceding softmax, not with respect to
/// `p` itself. A preceding [`softmax_op`](crate::ops::softmax_op) node still
/// multiplies this by its own diagonal factor `p(1 - p)` on the way back.
/// The target gradient is `g·(-ln p)/B`, with `p` clamped to `EPSILON`.
#[derive(Debug, Clone)]
pub struct CrossEntropyBackward {
    p: NodeId,
    t: NodeId,
    batch_size: usize,
}

fn clamped_ln(p: f32) -> f32 {
    p.max(EPSILON).ln()
}

impl BackwardOp for CrossEntropyBackward {
    fn backward(&self, graph: &Graph, _output: &Tensor, grad_output: &Tensor) -> Result<Vec<Tensor>, NnKitError> {
        let p = input_value(graph, self.p, "CELoss")?;
        let t = input_value(graph, self.t, "CELoss")?;
        let factor = grad_output.item()? / self.batch_size as f32;
        let grad_p = p.sub(t)?.scale(factor);
        let grad_t = p.map(|p| -clamped_ln(p) * factor);
        Ok(vec![grad_p, grad_t])
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.p, self.t]
    }
}

/// `-Σ t·ln(p) / B`, with `p` clamped to `EPSILON` inside the logarithm.
pub fn ce_loss_op(graph: &mut Graph, p: NodeId, t: NodeId) -> Result<NodeId, NnKitError> {
    let (p_value, t_value, batch_size) = loss_inputs(graph, p, t, "CELoss")?;
    if p_value.data().iter().any(|&v| v < EPSILON) {
        warn!("CELoss prediction below {}, clamping inside ln", EPSILON);
    }
    let total = t_value.zip_map(p_value, "CELoss", |t, p| t * clamped_ln(p))?.sum();
    let value = Tensor::scalar(-total / batch_size as f32);
    debug!("CELoss forward: batch {}, loss {}", batch_size, value.data()[0]);
    graph.push_op(value, Op::CELoss(CrossEntropyBackward { p, t, batch_size }))
}

#[cfg(test)]
#[path = "cross_entropy_test.rs"]
mod tests;
