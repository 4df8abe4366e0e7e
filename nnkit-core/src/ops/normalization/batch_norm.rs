use log::debug;

use crate::autograd::{BackwardOp, Graph, NodeId};
use crate::error::NnKitError;
use crate::ops::{input_value, Op};
use crate::tensor::Tensor;
use crate::EPSILON;

/// Weight of the previous running statistic when blending in a new batch.
pub const RUNNING_DECAY: f32 = 0.9;

/// Backward pass of batch normalization.
///
/// Caches the variance used for normalization, the centered input `x - μ` and
/// the normalized input `x̂`. Only `x`, `γ` and `β` are parents; the running
/// statistics are updated as a side effect of the forward pass and never
/// receive a gradient.
#[derive(Debug, Clone)]
pub struct BatchNormBackward {
    x: NodeId,
    gamma: NodeId,
    beta: NodeId,
    var: Tensor,
    x_centered: Tensor,
    x_norm: Tensor,
    use_running: bool,
}

impl BackwardOp for BatchNormBackward {
    fn backward(&self, graph: &Graph, _output: &Tensor, grad_output: &Tensor) -> Result<Vec<Tensor>, NnKitError> {
        let gamma = input_value(graph, self.gamma, "BatchNorm")?;
        let beta = input_value(graph, self.beta, "BatchNorm")?;
        let g = grad_output;

        let grad_gamma = g.mul(&self.x_norm)?.reduce_to_shape(gamma.shape())?;
        let grad_beta = g.reduce_to_shape(beta.shape())?;

        let inv_std = self.var.map(|v| 1.0 / (v + EPSILON).sqrt());
        let grad_x = if self.use_running {
            // mean and variance are constants here
            g.mul(gamma)?.mul(&inv_std)?
        } else {
            let b = g.batch_size() as f32;
            let t1 = gamma.mul(&inv_std)?.scale(1.0 / b);
            let t2 = g.scale(b);
            let t3 = g.sum_axis(0)?;
            let t4 = self
                .x_centered
                .mul(&inv_std.map(|s| s * s))?
                .mul(&g.mul(&self.x_centered)?.sum_axis(0)?)?;
            t2.sub(&t3)?.sub(&t4)?.mul(&t1)?
        };
        Ok(vec![grad_x, grad_gamma, grad_beta])
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.x, self.gamma, self.beta]
    }
}

/// Batch normalization over axis 0: `y = (x - μ)/√(σ² + ε)·γ + β`.
///
/// With `use_running == false`, `μ` and `σ²` are the batch statistics and the
/// running statistics are blended towards them
/// (`running = 0.9·running + 0.1·batch`). With `use_running == true`, the
/// running statistics are used as they are and left untouched.
///
/// `gamma`, `beta`, `running_var` and `running_mean` are typically `[1, features]`.
pub fn batch_norm_op(
    graph: &mut Graph,
    x: NodeId,
    gamma: NodeId,
    beta: NodeId,
    running_var: NodeId,
    running_mean: NodeId,
    use_running: bool,
) -> Result<NodeId, NnKitError> {
    let x_value = input_value(graph, x, "BatchNorm")?;
    let running_mean_value = input_value(graph, running_mean, "BatchNorm")?;
    let running_var_value = input_value(graph, running_var, "BatchNorm")?;

    let (mean, x_centered, var) = if use_running {
        let x_centered = x_value.sub(running_mean_value)?;
        (running_mean_value.clone(), x_centered, running_var_value.clone())
    } else {
        let b = x_value.batch_size() as f32;
        let mean = x_value.sum_axis(0)?.scale(1.0 / b);
        let x_centered = x_value.sub(&mean)?;
        let var = x_centered.map(|v| v * v).sum_axis(0)?.scale(1.0 / b);
        (mean, x_centered, var)
    };

    let x_norm = x_centered.div(&var.map(|v| (v + EPSILON).sqrt()))?;
    let value = x_norm
        .mul(input_value(graph, gamma, "BatchNorm")?)?
        .add(input_value(graph, beta, "BatchNorm")?)?;

    let running_update = if use_running {
        None
    } else {
        let blend = |old: f32, new: f32| RUNNING_DECAY * old + (1.0 - RUNNING_DECAY) * new;
        Some((
            running_mean_value.zip_map(&mean, "BatchNorm running mean", blend)?,
            running_var_value.zip_map(&var, "BatchNorm running var", blend)?,
        ))
    };
    debug!(
        "BatchNorm forward: {:?}, use_running {}",
        value.shape(),
        use_running
    );

    let op = BatchNormBackward {
        x,
        gamma,
        beta,
        var,
        x_centered,
        x_norm,
        use_running,
    };
    let id = graph.push_op(value, Op::BatchNorm(op))?;
    if let Some((new_mean, new_var)) = running_update {
        graph.set_value(running_mean, Some(new_mean))?;
        graph.set_value(running_var, Some(new_var))?;
    }
    Ok(id)
}

#[cfg(test)]
#[path = "batch_norm_test.rs"]
mod tests;
