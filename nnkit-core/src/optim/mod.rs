//! Optimizers for training networks built in a [`Graph`](crate::autograd::Graph).
//!
//! An optimizer owns a list of parameter node ids. Each [`Optimizer::step`]
//! reads every parameter's accumulated gradient, updates its value in place
//! and resets the gradient, ready for the next backward pass.

pub mod adam;
pub mod gd;
pub mod lr_scheduler;
pub mod optimizer_trait;

pub use adam::Adam;
pub use gd::GD;
pub use lr_scheduler::decay;
pub use optimizer_trait::Optimizer;

use crate::error::NnKitError;

fn check_unit_interval(name: &str, value: f32) -> Result<(), NnKitError> {
    if !(0.0..1.0).contains(&value) {
        return Err(NnKitError::ConfigurationError(format!(
            "{} must be in [0, 1), got {}",
            name, value
        )));
    }
    Ok(())
}

fn check_learn_rate(learn_rate: f32) -> Result<(), NnKitError> {
    if !learn_rate.is_finite() || learn_rate < 0.0 {
        return Err(NnKitError::ConfigurationError(format!(
            "learn rate must be finite and non-negative, got {}",
            learn_rate
        )));
    }
    Ok(())
}
