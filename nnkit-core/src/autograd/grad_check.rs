use thiserror::Error;

use crate::autograd::{Graph, NodeId};
use crate::error::NnKitError;
use crate::tensor::Tensor;

/// Perturbation used by the tests when none is specified.
pub const DEFAULT_EPSILON: f64 = 1e-3;
/// Mixed absolute/relative tolerance used by the tests when none is specified.
pub const DEFAULT_TOLERANCE: f64 = 1e-3;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for input {input_index}, element {element_index}: analytical {analytical_grad:?} != numerical {numerical_grad:?} (difference {difference:?})")]
    GradientMismatch {
        input_index: usize,
        element_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
        difference: f64,
    },
    #[error("Forward function execution failed during gradient check: {0}")]
    ForwardPassError(NnKitError),
    #[error("Backward pass execution failed during gradient check: {0}")]
    BackwardPassError(NnKitError),
    #[error("Numerical gradient is NaN or infinite for input {input_index}, element {element_index}. Loss+: {loss_plus:?}, Loss-: {loss_minus:?}")]
    NumericalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },
    #[error("Tensor error during gradient check: {0}")]
    TensorError(NnKitError),
}

impl From<NnKitError> for GradCheckError {
    fn from(err: NnKitError) -> Self {
        GradCheckError::TensorError(err)
    }
}

/// Compares the gradients computed by [`Graph::backward`] against central
/// finite differences.
///
/// `func` builds a computation on a fresh graph from variable nodes holding
/// `inputs` and returns its output node. The scalar being differentiated is
/// the sum of that output's elements, which is what seeding the output
/// gradient with ones differentiates. Every element of every input is
/// perturbed by `±epsilon`; the check fails when
/// `|analytical - numerical| > tolerance·(1 + |numerical|)`.
pub fn check_grad<F>(func: F, inputs: &[Tensor], epsilon: f64, tolerance: f64) -> Result<(), GradCheckError>
where
    F: Fn(&mut Graph, &[NodeId]) -> Result<NodeId, NnKitError>,
{
    // --- Analytical gradients ---
    let mut graph = Graph::new();
    let ids: Vec<NodeId> = inputs.iter().map(|t| graph.var(Some(t.clone()))).collect();
    let output = func(&mut graph, &ids).map_err(GradCheckError::ForwardPassError)?;
    graph.backward(output).map_err(GradCheckError::BackwardPassError)?;
    let analytical: Vec<Tensor> = ids
        .iter()
        .map(|&id| graph.grad(id).cloned())
        .collect::<Result<_, _>>()?;

    // --- Numerical gradients ---
    for (input_index, input) in inputs.iter().enumerate() {
        for element_index in 0..input.numel() {
            let (x_plus, loss_plus) = perturbed_loss(&func, inputs, input_index, element_index, epsilon)?;
            let (x_minus, loss_minus) = perturbed_loss(&func, inputs, input_index, element_index, -epsilon)?;
            // Divide by the step actually taken after rounding to f32.
            let numerical_grad = (loss_plus - loss_minus) / (x_plus - x_minus);
            if !numerical_grad.is_finite() {
                return Err(GradCheckError::NumericalGradNaNOrInfinite {
                    input_index,
                    element_index,
                    loss_plus,
                    loss_minus,
                });
            }
            let analytical_grad = analytical[input_index].data()[element_index] as f64;
            let difference = (analytical_grad - numerical_grad).abs();
            if !grads_agree(analytical_grad, numerical_grad, tolerance) {
                return Err(GradCheckError::GradientMismatch {
                    input_index,
                    element_index,
                    analytical_grad,
                    numerical_grad,
                    difference,
                });
            }
        }
    }
    Ok(())
}

/// Mixed absolute/relative comparison: `|a - n| <= tolerance·(1 + |n|)`.
pub(crate) fn grads_agree(analytical: f64, numerical: f64, tolerance: f64) -> bool {
    (analytical - numerical).abs() <= tolerance * (1.0 + numerical.abs())
}

/// Returns the perturbed element as stored and the summed output.
fn perturbed_loss<F>(
    func: &F,
    inputs: &[Tensor],
    input_index: usize,
    element_index: usize,
    delta: f64,
) -> Result<(f64, f64), GradCheckError>
where
    F: Fn(&mut Graph, &[NodeId]) -> Result<NodeId, NnKitError>,
{
    let mut graph = Graph::new();
    let mut perturbed = 0.0;
    let ids: Vec<NodeId> = inputs
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let mut t = t.clone();
            if i == input_index {
                let x = &mut t.data_mut()[element_index];
                *x = (*x as f64 + delta) as f32;
                perturbed = *x as f64;
            }
            graph.var(Some(t))
        })
        .collect();
    let output = func(&mut graph, &ids).map_err(GradCheckError::ForwardPassError)?;
    let loss = graph.value(output)?.data().iter().map(|&v| v as f64).sum();
    Ok((perturbed, loss))
}

#[cfg(test)]
#[path = "grad_check_test.rs"]
mod tests;
