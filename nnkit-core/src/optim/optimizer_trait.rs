use crate::autograd::{Graph, NodeId};
use crate::error::NnKitError;

/// Common interface of all optimizers.
pub trait Optimizer {
    /// Updates every parameter from its accumulated gradient, then resets
    /// the gradient.
    ///
    /// # Errors
    /// `UnknownNode` for a released parameter, `UninitializedValue` for a
    /// parameter without a value or gradient.
    fn step(&mut self, graph: &mut Graph) -> Result<(), NnKitError>;

    /// Parameters updated by [`step`](Optimizer::step), in update order.
    fn params(&self) -> &[NodeId];

    fn learn_rate(&self) -> f32;

    /// Changes the learn rate used by subsequent steps.
    ///
    /// # Errors
    /// `ConfigurationError` for a negative or non-finite rate.
    fn set_learn_rate(&mut self, learn_rate: f32) -> Result<(), NnKitError>;
}
