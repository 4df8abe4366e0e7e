use std::fmt::Debug;

use crate::autograd::{Graph, NodeId};
use crate::error::NnKitError;
use crate::tensor::Tensor;

/// Local backward step of a differentiable operation.
///
/// Every operator node stores a value implementing this trait. During
/// [`Graph::backward`] the driver hands it the node's own value and the
/// gradient accumulated on it so far, and adds the returned contributions into
/// the gradients of the parents.
pub trait BackwardOp: Debug {
    /// Computes dL/dInput for each input given dL/dOutput (`grad_output`).
    ///
    /// # Arguments
    /// * `graph`: Read access to parent values.
    /// * `output`: This operator's forward value.
    /// * `grad_output`: Gradient accumulated on this operator's node. Same shape as `output`.
    ///
    /// # Returns
    /// One contribution per entry of [`inputs`](BackwardOp::inputs), in the same
    /// order, each shaped exactly like the corresponding parent's value. The
    /// driver adds them; implementations never write to the graph.
    fn backward(&self, graph: &Graph, output: &Tensor, grad_output: &Tensor) -> Result<Vec<Tensor>, NnKitError>;

    /// Parents of this operator, in forward argument order.
    fn inputs(&self) -> Vec<NodeId>;
}
