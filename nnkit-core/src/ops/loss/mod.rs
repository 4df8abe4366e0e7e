// src/ops/loss/mod.rs

//! # Loss Functions
//!
//! Every loss compares a prediction `p` with a target `t` of the same shape and
//! produces a `[1, 1]` value normalized by the batch size `B = p.shape[0]`.
//! `B` is captured when the node is built. Both `p` and `t` are parents and
//! receive gradients.

use num_traits::Float;

use crate::autograd::{Graph, NodeId};
use crate::error::NnKitError;
use crate::ops::input_value;
use crate::tensor::Tensor;

pub mod cross_entropy;
pub mod huber;
pub mod l1;
pub mod l2;

pub use cross_entropy::ce_loss_op;
pub use huber::huber_loss_op;
pub use l1::l1_loss_op;
pub use l2::l2_loss_op;

/// -1, 0 or 1 according to the sign of `x`; zero maps to zero.
pub(crate) fn sign<T: Float>(x: T) -> T {
    if x > T::zero() {
        T::one()
    } else if x < T::zero() {
        -T::one()
    } else {
        T::zero()
    }
}

/// Reads the prediction and target values, checking they agree in shape.
pub(crate) fn loss_inputs<'a>(
    graph: &'a Graph,
    p: NodeId,
    t: NodeId,
    operation: &str,
) -> Result<(&'a Tensor, &'a Tensor, usize), NnKitError> {
    let p_value = input_value(graph, p, operation)?;
    let t_value = input_value(graph, t, operation)?;
    p_value.expect_same_shape(t_value, operation)?;
    let batch_size = p_value.batch_size();
    if batch_size == 0 {
        return Err(NnKitError::InvalidArgument(format!("{} on an empty batch", operation)));
    }
    Ok((p_value, t_value, batch_size))
}

/// Scales a per-element prediction gradient by `g/B` and returns it with its
/// negation for the target.
pub(crate) fn symmetric_grads(local: Tensor, grad_output: &Tensor, batch_size: usize) -> Result<Vec<Tensor>, NnKitError> {
    let grad_p = local.scale(grad_output.item()? / batch_size as f32);
    let grad_t = grad_p.scale(-1.0);
    Ok(vec![grad_p, grad_t])
}
