// Reverse sweep over a Graph.

use std::collections::HashSet;

use log::{debug, trace, warn};

use crate::autograd::{Graph, NodeId};
use crate::error::NnKitError;
use crate::tensor::create::{ones_like, zeros_like};
use crate::tensor::Tensor;

impl Graph {
    /// Back-propagates from `root`.
    ///
    /// The gradient of `root` is seeded with ones. Operator nodes reachable
    /// from `root` are visited in reverse topological order, so each one runs
    /// its local backward step exactly once, after every consumer has added
    /// its contribution. Gradients of intermediate operator nodes are zeroed
    /// before the sweep; gradients of variable nodes keep accumulating until
    /// the owner resets them.
    ///
    /// # Errors
    /// Fails on the first shape mismatch, missing value or non-finite
    /// contribution. Gradients are then partially accumulated and should be
    /// reset before retrying.
    pub fn backward(&mut self, root: NodeId) -> Result<(), NnKitError> {
        let seed = ones_like(self.node(root)?.value.as_ref().ok_or(
            NnKitError::UninitializedValue {
                node: root,
                operation: "backward".to_string(),
            },
        )?);

        let order = self.topological_order(root)?;
        debug!("backward from {:?} over {} nodes", root, order.len());

        for &id in &order {
            let node = self.node_mut(id)?;
            if node.op.is_some() {
                node.grad = node.value.as_ref().map(zeros_like);
            }
        }
        self.node_mut(root)?.grad = Some(seed);

        for &id in order.iter().rev() {
            let (name, inputs, contributions) = {
                let node = self.node(id)?;
                let op = match node.op.as_ref() {
                    Some(op) => op,
                    None => continue,
                };
                let missing = |operation: &str| NnKitError::UninitializedValue {
                    node: id,
                    operation: operation.to_string(),
                };
                let output = node.value.as_ref().ok_or_else(|| missing(op.name()))?;
                let grad_output = node.grad.as_ref().ok_or_else(|| missing(op.name()))?;
                trace!("local backward of {} at {:?}", op.name(), id);
                let contributions = op.as_backward().backward(self, output, grad_output)?;
                (op.name(), op.inputs(), contributions)
            };
            if inputs.len() != contributions.len() {
                return Err(NnKitError::InternalError(format!(
                    "{} returned {} gradients for {} inputs",
                    name,
                    contributions.len(),
                    inputs.len()
                )));
            }
            for (parent, contribution) in inputs.into_iter().zip(contributions) {
                self.accumulate_grad(parent, &contribution, name)?;
            }
        }
        debug!("backward from {:?} finished", root);
        Ok(())
    }

    /// Zeroes the gradient of every node reachable from `root`, `root` included.
    pub fn reset_all(&mut self, root: NodeId) -> Result<(), NnKitError> {
        for id in self.topological_order(root)? {
            self.reset(id)?;
        }
        Ok(())
    }

    /// Nodes reachable from `root`, each listed after all of its parents.
    pub fn topological_order(&self, root: NodeId) -> Result<Vec<NodeId>, NnKitError> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![(root, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            if !visited.insert(id) {
                continue;
            }
            stack.push((id, true));
            for parent in self.parents(id)?.into_iter().rev() {
                if !visited.contains(&parent) {
                    stack.push((parent, false));
                }
            }
        }
        Ok(order)
    }

    /// Adds `contribution` into the gradient of `id`.
    pub(crate) fn accumulate_grad(
        &mut self,
        id: NodeId,
        contribution: &Tensor,
        operation: &str,
    ) -> Result<(), NnKitError> {
        if !contribution.is_finite() {
            warn!("{} backward produced a non-finite gradient for {:?}", operation, id);
            return Err(NnKitError::NonFiniteValue {
                operation: format!("{} backward", operation),
            });
        }
        let node = self.node_mut(id)?;
        match node.grad.as_mut() {
            Some(grad) => grad.add_assign(contribution),
            None => Err(NnKitError::UninitializedValue {
                node: id,
                operation: format!("{} backward", operation),
            }),
        }
    }
}

#[cfg(test)]
#[path = "backward_test.rs"]
mod tests;
