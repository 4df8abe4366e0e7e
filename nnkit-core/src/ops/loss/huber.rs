use log::debug;

use crate::autograd::{BackwardOp, Graph, NodeId};
use crate::error::NnKitError;
use crate::ops::loss::{loss_inputs, symmetric_grads};
use crate::ops::{input_value, Op};
use crate::tensor::Tensor;

/// Threshold between the quadratic and linear regions when none is given.
pub const DEFAULT_DELTA: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct HuberLossBackward {
    p: NodeId,
    t: NodeId,
    delta: f32,
    batch_size: usize,
}

impl HuberLossBackward {
    pub fn delta(&self) -> f32 {
        self.delta
    }
}

impl BackwardOp for HuberLossBackward {
    fn backward(&self, graph: &Graph, _output: &Tensor, grad_output: &Tensor) -> Result<Vec<Tensor>, NnKitError> {
        let p = input_value(graph, self.p, "HuberLoss")?;
        let t = input_value(graph, self.t, "HuberLoss")?;
        let delta = self.delta;
        let local = p.zip_map(t, "HuberLoss backward", |p, t| (p - t).clamp(-delta, delta))?;
        symmetric_grads(local, grad_output, self.batch_size)
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.p, self.t]
    }
}

fn huber(diff: f32, delta: f32) -> f32 {
    let abs = diff.abs();
    if abs <= delta {
        0.5 * diff * diff
    } else {
        delta * abs - 0.5 * delta * delta
    }
}

/// Huber loss summed over elements and divided by the batch size:
/// quadratic for `|p - t| <= delta`, linear beyond.
///
/// # Errors
/// `ConfigurationError` if `delta` is not a positive number.
pub fn huber_loss_op(graph: &mut Graph, p: NodeId, t: NodeId, delta: f32) -> Result<NodeId, NnKitError> {
    if !(delta.is_finite() && delta > 0.0) {
        return Err(NnKitError::ConfigurationError(format!(
            "HuberLoss delta must be positive, got {}",
            delta
        )));
    }
    let (p_value, t_value, batch_size) = loss_inputs(graph, p, t, "HuberLoss")?;
    let total = p_value.zip_map(t_value, "HuberLoss", |p, t| huber(p - t, delta))?.sum();
    let value = Tensor::scalar(total / batch_size as f32);
    debug!("HuberLoss forward: batch {}, delta {}, loss {}", batch_size, delta, value.data()[0]);
    let op = HuberLossBackward {
        p,
        t,
        delta,
        batch_size,
    };
    graph.push_op(value, Op::HuberLoss(op))
}

#[cfg(test)]
#[path = "huber_test.rs"]
mod tests;
