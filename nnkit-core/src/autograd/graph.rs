use log::{trace, warn};

use crate::error::NnKitError;
use crate::ops::Op;
use crate::tensor::create::zeros_like;
use crate::tensor::Tensor;

/// Handle to a node stored in a [`Graph`].
///
/// The generation counter makes handles to released nodes detectable: once a
/// slot is reused, old handles no longer resolve and yield
/// [`NnKitError::UnknownNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    pub fn index(&self) -> usize {
        self.index
    }
}

/// A value, its gradient and, for operator nodes, the operation that produced it.
#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) value: Option<Tensor>,
    pub(crate) grad: Option<Tensor>,
    pub(crate) op: Option<Op>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena owning every variable and operator node of a computation.
///
/// Operators refer to their parents by [`NodeId`], so a node consumed by
/// several operators has a single gradient buffer that all of them add into.
#[derive(Debug, Default)]
pub struct Graph {
    slots: Vec<Slot>,
    free: Vec<usize>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a variable (leaf) node. Its gradient starts as zeros shaped
    /// like `value`, or absent when `value` is `None`.
    pub fn var(&mut self, value: Option<Tensor>) -> NodeId {
        let grad = value.as_ref().map(zeros_like);
        self.insert(Node { value, grad, op: None })
    }

    /// Stores an operator node whose `value` was computed from its parents.
    ///
    /// # Errors
    /// `NonFiniteValue` if the forward result contains NaN or infinity.
    pub fn push_op(&mut self, value: Tensor, op: Op) -> Result<NodeId, NnKitError> {
        if !value.is_finite() {
            warn!("{} forward produced a non-finite value", op.name());
            return Err(NnKitError::NonFiniteValue {
                operation: format!("{} forward", op.name()),
            });
        }
        for parent in op.inputs() {
            self.node(parent)?;
        }
        let grad = Some(zeros_like(&value));
        Ok(self.insert(Node {
            value: Some(value),
            grad,
            op: Some(op),
        }))
    }

    fn insert(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index: self.slots.len() - 1,
                generation: 0,
            }
        }
    }

    /// Removes a node. Its handle, and every copy of it, becomes invalid.
    pub fn release(&mut self, id: NodeId) -> Result<(), NnKitError> {
        self.node(id)?;
        let slot = &mut self.slots[id.index];
        slot.node = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        trace!("released node {:?}", id);
        Ok(())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node, NnKitError> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or(NnKitError::UnknownNode(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, NnKitError> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(NnKitError::UnknownNode(id))
    }

    /// Current value of a node.
    ///
    /// # Errors
    /// `UninitializedValue` if the node holds no value.
    pub fn value(&self, id: NodeId) -> Result<&Tensor, NnKitError> {
        self.node(id)?
            .value
            .as_ref()
            .ok_or_else(|| NnKitError::UninitializedValue {
                node: id,
                operation: "value".to_string(),
            })
    }

    pub fn has_value(&self, id: NodeId) -> Result<bool, NnKitError> {
        Ok(self.node(id)?.value.is_some())
    }

    /// Accumulated gradient of a node.
    pub fn grad(&self, id: NodeId) -> Result<&Tensor, NnKitError> {
        self.node(id)?
            .grad
            .as_ref()
            .ok_or_else(|| NnKitError::UninitializedValue {
                node: id,
                operation: "grad".to_string(),
            })
    }

    /// Replaces the value of a variable node and resets its gradient.
    ///
    /// # Errors
    /// `InvalidArgument` for operator nodes, whose value is fixed at construction.
    pub fn set_value(&mut self, id: NodeId, value: Option<Tensor>) -> Result<(), NnKitError> {
        let node = self.node_mut(id)?;
        if node.op.is_some() {
            return Err(NnKitError::InvalidArgument(format!(
                "cannot set the value of operator node {:?}",
                id
            )));
        }
        node.grad = value.as_ref().map(zeros_like);
        node.value = value;
        Ok(())
    }

    /// Mutable access to a variable node's elements, for in-place parameter
    /// updates. The shape is fixed, so the gradient keeps matching it and is
    /// left untouched. Use [`Graph::set_value`] to change the shape.
    pub fn value_mut(&mut self, id: NodeId) -> Result<&mut [f32], NnKitError> {
        let node = self.node_mut(id)?;
        if node.op.is_some() {
            return Err(NnKitError::InvalidArgument(format!(
                "cannot mutate the value of operator node {:?}",
                id
            )));
        }
        node.value
            .as_mut()
            .map(Tensor::data_mut)
            .ok_or_else(|| NnKitError::UninitializedValue {
                node: id,
                operation: "value_mut".to_string(),
            })
    }

    /// Subtracts `delta` from a variable node's value in place.
    ///
    /// # Errors
    /// `ShapeMismatch` when `delta` is not shaped like the value.
    pub fn sub_value(&mut self, id: NodeId, delta: &Tensor) -> Result<(), NnKitError> {
        self.value(id)?.expect_same_shape(delta, "sub_value")?;
        self.value_mut(id)?
            .iter_mut()
            .zip(delta.data())
            .for_each(|(v, &d)| *v -= d);
        Ok(())
    }

    /// Sets the gradient to zeros shaped like the value, or to absent.
    pub fn reset(&mut self, id: NodeId) -> Result<(), NnKitError> {
        let node = self.node_mut(id)?;
        node.grad = node.value.as_ref().map(zeros_like);
        Ok(())
    }

    /// Ordered parents of an operator node; empty for variable nodes.
    pub fn parents(&self, id: NodeId) -> Result<Vec<NodeId>, NnKitError> {
        Ok(self.node(id)?.op.as_ref().map(Op::inputs).unwrap_or_default())
    }

    pub fn is_op(&self, id: NodeId) -> Result<bool, NnKitError> {
        Ok(self.node(id)?.op.is_some())
    }

    /// The operator that produced a node, if any.
    pub fn op(&self, id: NodeId) -> Result<Option<&Op>, NnKitError> {
        Ok(self.node(id)?.op.as_ref())
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
