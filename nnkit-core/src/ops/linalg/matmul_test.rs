use super::*;
use crate::autograd::grad_check::{check_grad, DEFAULT_EPSILON, DEFAULT_TOLERANCE};
use crate::ops::l2_loss_op;

fn t(data: Vec<f32>, shape: Vec<usize>) -> Tensor {
    Tensor::new(data, shape).unwrap()
}

#[test]
fn test_matmul_forward_backward_row_times_column() {
    let mut graph = Graph::new();
    let x = graph.var(Some(t(vec![1.0, 2.0], vec![1, 2])));
    let w = graph.var(Some(t(vec![1.0, 1.0], vec![2, 1])));
    let y = matmul_op(&mut graph, x, w).unwrap();
    assert_eq!(graph.value(y).unwrap(), &t(vec![3.0], vec![1, 1]));

    graph.backward(y).unwrap();
    assert_eq!(graph.grad(x).unwrap(), &t(vec![1.0, 1.0], vec![1, 2]));
    assert_eq!(graph.grad(w).unwrap(), &t(vec![1.0, 2.0], vec![2, 1]));
}

#[test]
fn test_matmul_inner_dimension_mismatch() {
    let mut graph = Graph::new();
    let x = graph.var(Some(t(vec![1.0, 2.0, 3.0], vec![1, 3])));
    let w = graph.var(Some(t(vec![1.0, 1.0], vec![2, 1])));
    assert!(matches!(
        matmul_op(&mut graph, x, w),
        Err(NnKitError::ShapeMismatch { .. })
    ));
    // Nothing was stored.
    assert_eq!(graph.len(), 2);
}

#[test]
fn test_matmul_uninitialized_input() {
    let mut graph = Graph::new();
    let x = graph.var(None);
    let w = graph.var(Some(t(vec![1.0, 1.0], vec![2, 1])));
    assert_eq!(
        matmul_op(&mut graph, x, w).unwrap_err(),
        NnKitError::UninitializedValue {
            node: x,
            operation: "MatMul".to_string()
        }
    );
}

#[test]
fn test_matmul_grad_check() {
    let inputs = vec![
        t(vec![0.5, -1.0, 1.5, 2.0, 0.3, -0.7], vec![2, 3]),
        t(vec![0.2, -0.4, 0.6, 0.1, -0.3, 0.9], vec![3, 2]),
        t(vec![0.1, 0.2, 0.3, 0.4], vec![2, 2]),
    ];
    let func = |graph: &mut Graph, ids: &[NodeId]| {
        let y = matmul_op(graph, ids[0], ids[1])?;
        l2_loss_op(graph, y, ids[2])
    };
    check_grad(func, &inputs, DEFAULT_EPSILON, DEFAULT_TOLERANCE).unwrap();
}
