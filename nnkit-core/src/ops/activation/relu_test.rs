use super::*;
use crate::autograd::grad_check::{check_grad, DEFAULT_EPSILON, DEFAULT_TOLERANCE};

#[test]
fn test_relu_forward_backward() {
    let mut graph = Graph::new();
    let x = graph.var(Some(Tensor::new(vec![-2.0, -1.0, 0.5, 1.0, 2.0], vec![1, 5]).unwrap()));
    let y = relu_op(&mut graph, x).unwrap();
    assert_eq!(graph.value(y).unwrap().data(), &[0.0, 0.0, 0.5, 1.0, 2.0]);

    graph.backward(y).unwrap();
    assert_eq!(graph.grad(x).unwrap().data(), &[0.0, 0.0, 1.0, 1.0, 1.0]);
}

#[test]
fn test_relu_grad_check_away_from_zero() {
    let inputs = vec![Tensor::new(vec![-1.5, -0.2, 0.3, 0.8, 2.0, -0.6], vec![2, 3]).unwrap()];
    check_grad(
        |graph: &mut Graph, ids: &[NodeId]| relu_op(graph, ids[0]),
        &inputs,
        DEFAULT_EPSILON,
        DEFAULT_TOLERANCE,
    )
    .unwrap();
}
