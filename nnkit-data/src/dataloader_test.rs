use super::*;
use crate::samplers::RandomSampler;
use std::collections::HashSet;

fn data(n: usize) -> (Tensor, Tensor) {
    let x = Tensor::new((0..2 * n).map(|v| v as f32).collect(), vec![n, 2]).unwrap();
    let t = Tensor::new((0..n).map(|v| v as f32).collect(), vec![n, 1]).unwrap();
    (x, t)
}

#[test]
fn test_batch_spec_resolution() {
    assert_eq!(BatchSpec::Size(4).batch_size(10).unwrap(), 4);
    assert_eq!(BatchSpec::Count(3).batch_size(10).unwrap(), 4);
    assert_eq!(BatchSpec::Count(5).batch_size(10).unwrap(), 2);
    assert_eq!(BatchSpec::Count(20).batch_size(10).unwrap(), 1);
    assert!(matches!(
        BatchSpec::Size(0).batch_size(10),
        Err(NnKitError::ConfigurationError(_))
    ));
    assert!(matches!(
        BatchSpec::Count(0).batch_size(10),
        Err(NnKitError::ConfigurationError(_))
    ));
}

#[test]
fn test_size_mode_last_batch_is_smaller() {
    let (x, t) = data(7);
    let mut loader = mini_batches(x, t, BatchSpec::Size(3)).unwrap();
    assert_eq!(loader.num_batches(), 3);

    let batches: Vec<_> = loader.iter().map(|b| b.unwrap()).collect();
    assert_eq!(batches.len(), 3);
    let (x0, t0, s0) = &batches[0];
    assert_eq!(x0.shape(), &[3, 2]);
    assert_eq!(t0.data(), &[0.0, 1.0, 2.0]);
    assert_eq!(*s0, 0);
    let (x2, t2, s2) = &batches[2];
    assert_eq!(x2.shape(), &[1, 2]);
    assert_eq!(x2.data(), &[12.0, 13.0]);
    assert_eq!(t2.data(), &[6.0]);
    assert_eq!(*s2, 6);
}

#[test]
fn test_count_mode() {
    let (x, t) = data(10);
    let mut loader = mini_batches(x, t, BatchSpec::Count(3)).unwrap();
    assert_eq!(loader.batch_size(), 4);
    let sizes: Vec<usize> = loader.iter().map(|b| b.unwrap().0.shape()[0]).collect();
    assert_eq!(sizes, vec![4, 4, 2]);
}

#[test]
fn test_random_sampler_covers_every_row_once() {
    let (x, t) = data(9);
    let dataset = TensorDataset::new(x, t).unwrap();
    let mut loader = MiniBatchLoader::new(dataset, BatchSpec::Size(4), RandomSampler::with_seed(5)).unwrap();

    let mut seen = HashSet::new();
    let mut starts = Vec::new();
    for batch in loader.iter() {
        let (inputs, targets, start) = batch.unwrap();
        starts.push(start);
        for (row, &target) in targets.data().iter().enumerate() {
            // Inputs and targets stay paired.
            assert_eq!(inputs.data()[2 * row], 2.0 * target);
            assert!(seen.insert(target as usize));
        }
    }
    assert_eq!(seen.len(), 9);
    assert_eq!(starts, vec![0, 4, 8]);
}

#[test]
fn test_iter_size_hint_and_epochs() {
    let (x, t) = data(5);
    let mut loader = mini_batches(x, t, BatchSpec::Size(2)).unwrap();
    let batches = loader.iter();
    assert_eq!(batches.size_hint(), (3, Some(3)));
    assert_eq!(batches.count(), 3);
    // A second epoch starts from the beginning again.
    assert_eq!(loader.iter().count(), 3);
}

#[test]
fn test_empty_dataset_yields_nothing() {
    let x = Tensor::new(vec![], vec![0, 2]).unwrap();
    let t = Tensor::new(vec![], vec![0, 1]).unwrap();
    let mut loader = mini_batches(x, t, BatchSpec::Count(4)).unwrap();
    assert_eq!(loader.num_batches(), 0);
    assert!(loader.iter().next().is_none());
}

#[test]
fn test_mismatched_rows_rejected() {
    let (x, _) = data(4);
    let (_, t) = data(3);
    assert!(matches!(
        mini_batches(x, t, BatchSpec::Size(2)),
        Err(NnKitError::ShapeMismatch { .. })
    ));
}
