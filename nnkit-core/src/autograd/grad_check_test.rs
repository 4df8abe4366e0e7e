use super::*;
use crate::ops::{l2_loss_op, matmul_op, softmax_op, tanh_op};

fn t(data: Vec<f32>, shape: Vec<usize>) -> Tensor {
    Tensor::new(data, shape).unwrap()
}

#[test]
fn test_check_grad_accepts_correct_gradients() {
    let inputs = vec![
        t(vec![0.2, -0.4, 0.9, 0.1, 0.5, -0.3], vec![2, 3]),
        t(vec![0.3, -0.7, 0.6, 0.8, -0.2, 0.4], vec![3, 2]),
        t(vec![0.1, 0.0, -0.5, 0.2], vec![2, 2]),
    ];
    let func = |graph: &mut Graph, ids: &[NodeId]| {
        let h = matmul_op(graph, ids[0], ids[1])?;
        let h = tanh_op(graph, h)?;
        l2_loss_op(graph, h, ids[2])
    };
    check_grad(func, &inputs, DEFAULT_EPSILON, DEFAULT_TOLERANCE).unwrap();
}

#[test]
fn test_check_grad_reports_mismatch() {
    // The outputs of a softmax row always sum to one, so the true gradient of
    // their sum is zero; the diagonal approximation is not.
    let inputs = vec![t(vec![0.5, -1.0, 2.0], vec![1, 3])];
    let result = check_grad(
        |graph: &mut Graph, ids: &[NodeId]| softmax_op(graph, ids[0]),
        &inputs,
        DEFAULT_EPSILON,
        DEFAULT_TOLERANCE,
    );
    assert!(matches!(result, Err(GradCheckError::GradientMismatch { input_index: 0, .. })));
}

#[test]
fn test_check_grad_propagates_forward_errors() {
    let inputs = vec![t(vec![1.0, 2.0], vec![1, 2]), t(vec![1.0, 2.0], vec![1, 2])];
    let result = check_grad(
        |graph: &mut Graph, ids: &[NodeId]| matmul_op(graph, ids[0], ids[1]),
        &inputs,
        DEFAULT_EPSILON,
        DEFAULT_TOLERANCE,
    );
    assert!(matches!(
        result,
        Err(GradCheckError::ForwardPassError(NnKitError::ShapeMismatch { .. }))
    ));
}

#[test]
fn test_default_tolerance_rejects_half_percent_error() {
    assert!(!grads_agree(2.015, 2.0, DEFAULT_TOLERANCE));
    assert!(!grads_agree(0.0, 0.002, DEFAULT_TOLERANCE));
    assert!(grads_agree(2.001, 2.0, DEFAULT_TOLERANCE));
    assert!(grads_agree(1e-4, 0.0, DEFAULT_TOLERANCE));
}
