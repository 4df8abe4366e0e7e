use super::*;
use approx::assert_relative_eq;

#[test]
fn test_decay_is_linear_then_clamped() {
    let bounds = (0.1, 1.0);
    assert_relative_eq!(decay(0, 9, bounds).unwrap(), 1.0);
    assert_relative_eq!(decay(3, 9, bounds).unwrap(), 0.7, epsilon = 1e-6);
    assert_relative_eq!(decay(9, 9, bounds).unwrap(), 0.1, epsilon = 1e-6);
    assert_eq!(decay(100, 9, bounds).unwrap(), 0.1);
}

#[test]
fn test_decay_rejects_zero_steps() {
    assert!(matches!(
        decay(1, 0, (0.0, 1.0)),
        Err(NnKitError::ConfigurationError(_))
    ));
}
