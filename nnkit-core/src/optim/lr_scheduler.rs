use crate::error::NnKitError;

/// Linearly decays a value from `max` to `min` over `total_steps`, then holds
/// it at `min`.
///
/// Typically used for learn-rate decay:
///
/// ```
/// use nnkit_core::optim::decay;
///
/// assert_eq!(decay(0, 10, (0.01, 0.1)).unwrap(), 0.1);
/// assert!((decay(5, 10, (0.01, 0.1)).unwrap() - 0.055).abs() < 1e-6);
/// assert_eq!(decay(20, 10, (0.01, 0.1)).unwrap(), 0.01);
/// ```
///
/// # Errors
/// `ConfigurationError` if `total_steps` is zero.
pub fn decay(step: usize, total_steps: usize, (min, max): (f32, f32)) -> Result<f32, NnKitError> {
    if total_steps == 0 {
        return Err(NnKitError::ConfigurationError(
            "decay requires at least one step".to_string(),
        ));
    }
    let slope = (min - max) / total_steps as f32;
    Ok((slope * step as f32 + max).max(min))
}

#[cfg(test)]
#[path = "lr_scheduler_test.rs"]
mod tests;
