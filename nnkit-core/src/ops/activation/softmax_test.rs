use super::*;
use approx::assert_relative_eq;

#[test]
fn test_softmax_rows_sum_to_one() {
    let mut graph = Graph::new();
    let x = graph.var(Some(Tensor::new(vec![1.0, 2.0, 3.0, 1.0, 1.0, 1.0], vec![2, 3]).unwrap()));
    let y = softmax_op(&mut graph, x).unwrap();
    let value = graph.value(y).unwrap();
    let expected = [0.090_030_57, 0.244_728_47, 0.665_240_96, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0];
    for (v, e) in value.data().iter().zip(expected) {
        assert_relative_eq!(*v, e, epsilon = 1e-6);
    }
    for row in value.data().chunks(3) {
        assert_relative_eq!(row.iter().sum::<f32>(), 1.0, epsilon = 1e-6);
    }
}

#[test]
fn test_softmax_is_shift_stable() {
    let mut graph = Graph::new();
    let x = graph.var(Some(Tensor::new(vec![1000.0, 1000.0], vec![1, 2]).unwrap()));
    let y = softmax_op(&mut graph, x).unwrap();
    assert_eq!(graph.value(y).unwrap().data(), &[0.5, 0.5]);
}

#[test]
fn test_softmax_backward_uses_diagonal_term() {
    let mut graph = Graph::new();
    let x = graph.var(Some(Tensor::new(vec![0.0, 0.0, 0.0], vec![1, 3]).unwrap()));
    let y = softmax_op(&mut graph, x).unwrap();
    graph.backward(y).unwrap();
    // y = 1/3 everywhere, so g·y·(1 - y) = 2/9
    for g in graph.grad(x).unwrap().data() {
        assert_relative_eq!(*g, 2.0 / 9.0, epsilon = 1e-6);
    }
}
