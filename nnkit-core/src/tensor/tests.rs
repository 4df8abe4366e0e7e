use super::*;

#[test]
fn test_new_validates_length() {
    let err = Tensor::new(vec![1.0, 2.0, 3.0], vec![2, 2]).unwrap_err();
    assert_eq!(
        err,
        NnKitError::TensorCreationError {
            data_len: 3,
            shape: vec![2, 2]
        }
    );
}

#[test]
fn test_new_promotes_low_rank() {
    let v = Tensor::new(vec![1.0, 2.0, 3.0], vec![3]).unwrap();
    assert_eq!(v.shape(), &[1, 3]);
    let s = Tensor::new(vec![4.0], vec![]).unwrap();
    assert_eq!(s.shape(), &[1, 1]);
    assert_eq!(Tensor::scalar(4.0), s);
}

#[test]
fn test_from_rows() {
    let m = Tensor::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
    assert_eq!(m.shape(), &[3, 2]);
    assert_eq!(m.get(&[2, 1]), Some(6.0));
    assert_eq!(m.get(&[3, 0]), None);
    assert!(Tensor::from_rows(&[vec![1.0], vec![1.0, 2.0]]).is_err());
}

#[test]
fn test_item() {
    assert_eq!(Tensor::scalar(2.5).item().unwrap(), 2.5);
    let m = Tensor::new(vec![1.0, 2.0], vec![1, 2]).unwrap();
    assert!(matches!(m.item(), Err(NnKitError::ShapeMismatch { .. })));
}

#[test]
fn test_reshape_and_strides() {
    let m = Tensor::new((0..6).map(|x| x as f32).collect(), vec![2, 3]).unwrap();
    assert_eq!(m.strides(), vec![3, 1]);
    let r = m.reshape(vec![3, 2]).unwrap();
    assert_eq!(r.shape(), &[3, 2]);
    assert_eq!(r.data(), m.data());
    assert!(m.reshape(vec![4, 2]).is_err());
}

#[test]
fn test_is_finite() {
    assert!(Tensor::scalar(1.0).is_finite());
    assert!(!Tensor::scalar(f32::NAN).is_finite());
    assert!(!Tensor::scalar(f32::INFINITY).is_finite());
}

#[test]
fn test_display_matrix() {
    let m = Tensor::new(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]).unwrap();
    assert_eq!(format!("{}", m), "[[1.0, 2.0], [3.0, 4.0]]");
}
