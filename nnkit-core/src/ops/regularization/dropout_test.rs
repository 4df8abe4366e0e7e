use super::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn t(data: Vec<f32>, shape: Vec<usize>) -> Tensor {
    Tensor::new(data, shape).unwrap()
}

#[test]
fn test_dropout_fixed_mask_is_deterministic() {
    let mut graph = Graph::new();
    let x_value = t(vec![1.0, 2.0, 3.0, 4.0], vec![1, 4]);
    let mask = t(vec![1.0, 0.0, 1.0, 1.0], vec![1, 4]);
    let x = graph.var(Some(x_value.clone()));
    let y = dropout_with_mask_op(&mut graph, x, 0.5, mask.clone()).unwrap();

    let expected: Vec<f32> = x_value
        .data()
        .iter()
        .zip(mask.data())
        .map(|(x, m)| x * m / 0.5)
        .collect();
    assert_eq!(graph.value(y).unwrap().data(), expected.as_slice());

    graph.backward(y).unwrap();
    // upstream ones times the mask, no 1/keep_prob factor
    assert_eq!(graph.grad(x).unwrap(), &mask);
}

#[test]
fn test_dropout_random_mask_is_binary_and_cached() {
    let mut graph = Graph::new();
    let mut rng = StdRng::seed_from_u64(42);
    let x = graph.var(Some(t(vec![1.0; 100], vec![10, 10])));
    let y = dropout_op(&mut graph, x, 0.8, &mut rng).unwrap();

    let mask = match graph.op(y).unwrap() {
        Some(Op::Dropout(op)) => op.mask().clone(),
        other => panic!("unexpected op {:?}", other),
    };
    assert!(mask.data().iter().all(|&m| m == 0.0 || m == 1.0));
    let kept = mask.sum();
    assert!(kept > 50.0 && kept < 100.0);

    graph.backward(y).unwrap();
    assert_eq!(graph.grad(x).unwrap(), &mask);
}

#[test]
fn test_dropout_keep_all() {
    let mut graph = Graph::new();
    let mut rng = StdRng::seed_from_u64(0);
    let x = graph.var(Some(t(vec![1.0, -2.0, 3.0], vec![1, 3])));
    let y = dropout_op(&mut graph, x, 1.0, &mut rng).unwrap();
    assert_eq!(graph.value(y).unwrap(), graph.value(x).unwrap());
}

#[test]
fn test_dropout_validates_arguments() {
    let mut graph = Graph::new();
    let mut rng = StdRng::seed_from_u64(0);
    let x = graph.var(Some(t(vec![1.0, 2.0], vec![1, 2])));
    assert!(matches!(
        dropout_op(&mut graph, x, 0.0, &mut rng),
        Err(NnKitError::ConfigurationError(_))
    ));
    assert!(dropout_op(&mut graph, x, 1.5, &mut rng).is_err());
    let bad_mask = t(vec![1.0, 0.0, 1.0], vec![1, 3]);
    assert!(matches!(
        dropout_with_mask_op(&mut graph, x, 0.5, bad_mask),
        Err(NnKitError::ShapeMismatch { .. })
    ));
}
