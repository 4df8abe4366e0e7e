use super::*;

#[test]
fn test_sequential_sampler_iter() {
    let mut sampler = SequentialSampler::new();
    let indices: Vec<usize> = sampler.iter(5).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    assert_eq!(sampler.len(5), 5);
}

#[test]
fn test_sequential_sampler_empty() {
    let mut sampler = SequentialSampler::new();
    assert_eq!(sampler.iter(0).count(), 0);
}
