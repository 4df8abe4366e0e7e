use log::debug;

use crate::autograd::{BackwardOp, Graph, NodeId};
use crate::error::NnKitError;
use crate::ops::{input_value, Op};
use crate::tensor::Tensor;

/// Slope applied to negative inputs when none is given.
pub const DEFAULT_SLOPE: f32 = 0.01;

#[derive(Debug, Clone)]
pub struct LeakyReluBackward {
    x: NodeId,
    slope: f32,
}

impl LeakyReluBackward {
    pub fn slope(&self) -> f32 {
        self.slope
    }
}

impl BackwardOp for LeakyReluBackward {
    fn backward(&self, graph: &Graph, _output: &Tensor, grad_output: &Tensor) -> Result<Vec<Tensor>, NnKitError> {
        let x = input_value(graph, self.x, "LeakyReLU")?;
        let slope = self.slope;
        // Derivative of whichever branch of the max is taken; the slope wins ties.
        let grad = grad_output.zip_map(x, "LeakyReLU backward", |g, x| {
            if x > slope * x {
                g
            } else {
                slope * g
            }
        })?;
        Ok(vec![grad])
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.x]
    }
}

/// Leaky rectified linear unit, `max(slope·x, x)`.
///
/// Any finite slope is accepted. For `slope > 1` the slope applies to
/// positive inputs instead of negative ones.
///
/// # Errors
/// `ConfigurationError` for a NaN or infinite slope.
pub fn leaky_relu_op(graph: &mut Graph, x: NodeId, slope: f32) -> Result<NodeId, NnKitError> {
    if !slope.is_finite() {
        return Err(NnKitError::ConfigurationError(format!(
            "LeakyReLU slope must be finite, got {}",
            slope
        )));
    }
    let value = input_value(graph, x, "LeakyReLU")?.map(|v| v.max(slope * v));
    debug!("LeakyReLU forward: {:?}, slope {}", value.shape(), slope);
    graph.push_op(value, Op::LeakyReLU(LeakyReluBackward { x, slope }))
}

#[cfg(test)]
#[path = "leaky_relu_test.rs"]
mod tests;
