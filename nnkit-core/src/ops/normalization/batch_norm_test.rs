use super::*;
use crate::autograd::grad_check::{check_grad, DEFAULT_EPSILON, DEFAULT_TOLERANCE};
use crate::ops::l2_loss_op;
use approx::assert_relative_eq;

fn t(data: Vec<f32>, shape: Vec<usize>) -> Tensor {
    Tensor::new(data, shape).unwrap()
}

struct Params {
    gamma: NodeId,
    beta: NodeId,
    running_var: NodeId,
    running_mean: NodeId,
}

fn params(graph: &mut Graph, features: usize) -> Params {
    Params {
        gamma: graph.var(Some(t(vec![1.0; features], vec![1, features]))),
        beta: graph.var(Some(t(vec![0.0; features], vec![1, features]))),
        running_var: graph.var(Some(t(vec![1.0; features], vec![1, features]))),
        running_mean: graph.var(Some(t(vec![0.0; features], vec![1, features]))),
    }
}

#[test]
fn test_batch_norm_training_normalizes_and_updates_running_stats() {
    let mut graph = Graph::new();
    let x = graph.var(Some(t(vec![1.0, 2.0, 3.0, 6.0], vec![2, 2])));
    let p = params(&mut graph, 2);
    let y = batch_norm_op(&mut graph, x, p.gamma, p.beta, p.running_var, p.running_mean, false).unwrap();

    let expected = [-1.0, -1.0, 1.0, 1.0];
    for (v, e) in graph.value(y).unwrap().data().iter().zip(expected) {
        assert_relative_eq!(*v, e, epsilon = 1e-5);
    }
    // batch mean [2, 4], batch variance [1, 4]
    let running_mean = graph.value(p.running_mean).unwrap();
    assert_relative_eq!(running_mean.data()[0], 0.2, epsilon = 1e-6);
    assert_relative_eq!(running_mean.data()[1], 0.4, epsilon = 1e-6);
    let running_var = graph.value(p.running_var).unwrap();
    assert_relative_eq!(running_var.data()[0], 1.0, epsilon = 1e-6);
    assert_relative_eq!(running_var.data()[1], 1.3, epsilon = 1e-6);
    assert_eq!(graph.parents(y).unwrap(), vec![x, p.gamma, p.beta]);
}

#[test]
fn test_batch_norm_running_mode_leaves_stats_alone() {
    let mut graph = Graph::new();
    let x = graph.var(Some(t(vec![1.0, 2.0], vec![1, 2])));
    let p = params(&mut graph, 2);
    let y = batch_norm_op(&mut graph, x, p.gamma, p.beta, p.running_var, p.running_mean, true).unwrap();
    let value = graph.value(y).unwrap();
    assert_relative_eq!(value.data()[0], 1.0, epsilon = 1e-6);
    assert_relative_eq!(value.data()[1], 2.0, epsilon = 1e-6);
    assert_eq!(graph.value(p.running_mean).unwrap().data(), &[0.0, 0.0]);
    assert_eq!(graph.value(p.running_var).unwrap().data(), &[1.0, 1.0]);

    graph.backward(y).unwrap();
    for g in graph.grad(x).unwrap().data() {
        assert_relative_eq!(*g, 1.0, epsilon = 1e-6);
    }
    let grad_gamma = graph.grad(p.gamma).unwrap();
    assert_relative_eq!(grad_gamma.data()[0], 1.0, epsilon = 1e-6);
    assert_relative_eq!(grad_gamma.data()[1], 2.0, epsilon = 1e-6);
    assert_eq!(graph.grad(p.beta).unwrap().data(), &[1.0, 1.0]);
}

#[test]
fn test_batch_norm_requires_running_stats() {
    let mut graph = Graph::new();
    let x = graph.var(Some(t(vec![1.0, 2.0], vec![1, 2])));
    let p = params(&mut graph, 2);
    graph.set_value(p.running_var, None).unwrap();
    assert!(matches!(
        batch_norm_op(&mut graph, x, p.gamma, p.beta, p.running_var, p.running_mean, false),
        Err(NnKitError::UninitializedValue { .. })
    ));
}

fn batch_norm_loss(use_running: bool) -> impl Fn(&mut Graph, &[NodeId]) -> Result<NodeId, NnKitError> {
    move |graph: &mut Graph, ids: &[NodeId]| {
        let running_var = graph.var(Some(t(vec![0.5, 2.0, 1.5], vec![1, 3])));
        let running_mean = graph.var(Some(t(vec![0.1, -0.2, 0.3], vec![1, 3])));
        let y = batch_norm_op(graph, ids[0], ids[1], ids[2], running_var, running_mean, use_running)?;
        l2_loss_op(graph, y, ids[3])
    }
}

fn batch_norm_inputs() -> Vec<Tensor> {
    vec![
        t(
            vec![0.5, -1.2, 2.0, 1.3, 0.4, -0.8, -0.7, 1.1, 0.6, 0.2, -0.3, 1.7],
            vec![4, 3],
        ),
        t(vec![1.2, 0.8, -0.5], vec![1, 3]),
        t(vec![0.1, -0.3, 0.2], vec![1, 3]),
        t(
            vec![0.3, 0.0, -0.4, 1.0, 0.5, 0.2, -0.6, 0.9, 0.1, 0.0, -1.0, 0.7],
            vec![4, 3],
        ),
    ]
}

#[test]
fn test_batch_norm_training_grad_check() {
    check_grad(batch_norm_loss(false), &batch_norm_inputs(), DEFAULT_EPSILON, DEFAULT_TOLERANCE).unwrap();
}

#[test]
fn test_batch_norm_running_grad_check() {
    check_grad(batch_norm_loss(true), &batch_norm_inputs(), DEFAULT_EPSILON, DEFAULT_TOLERANCE).unwrap();
}
