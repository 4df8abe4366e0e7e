use super::*;
use approx::assert_relative_eq;

fn t(data: Vec<f32>, shape: Vec<usize>) -> Tensor {
    Tensor::new(data, shape).unwrap()
}

#[test]
fn test_ce_loss_forward_backward() {
    let mut graph = Graph::new();
    let p = graph.var(Some(t(vec![0.25, 0.75], vec![1, 2])));
    let target = graph.var(Some(t(vec![0.0, 1.0], vec![1, 2])));
    let loss = ce_loss_op(&mut graph, p, target).unwrap();
    assert_relative_eq!(graph.value(loss).unwrap().item().unwrap(), 0.287_682_1, epsilon = 1e-6);

    graph.backward(loss).unwrap();
    assert_eq!(graph.grad(p).unwrap().data(), &[0.25, -0.25]);
    let grad_t = graph.grad(target).unwrap();
    assert_relative_eq!(grad_t.data()[0], 1.386_294_4, epsilon = 1e-6);
    assert_relative_eq!(grad_t.data()[1], 0.287_682_1, epsilon = 1e-6);
}

#[test]
fn test_ce_loss_clamps_zero_probability() {
    let mut graph = Graph::new();
    let p = graph.var(Some(t(vec![0.0, 1.0, 0.5, 0.5], vec![2, 2])));
    let target = graph.var(Some(t(vec![1.0, 0.0, 1.0, 0.0], vec![2, 2])));
    let loss = ce_loss_op(&mut graph, p, target).unwrap();
    // (-ln(1e-8) - ln(0.5)) / 2
    assert_relative_eq!(
        graph.value(loss).unwrap().item().unwrap(),
        (18.420_681 + 0.693_147_2) / 2.0,
        epsilon = 1e-4
    );

    graph.backward(loss).unwrap();
    assert!(graph.grad(target).unwrap().is_finite());
    assert_eq!(graph.grad(p).unwrap().data(), &[-0.5, 0.5, -0.25, 0.25]);
}
