use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::autograd::{Graph, NodeId};
use crate::error::NnKitError;
use crate::nn::layer::Layer;
use crate::tensor::Tensor;

/// Feed-forward network assembled from a sequential topology.
///
/// Every call to [`forward`](FFN::forward) rebuilds the operator chain from
/// `topology`: the first layer consumes the input node, every later layer
/// consumes the previous layer's output. The operator nodes of the previous
/// pass are released from the graph first, so handles to them become stale.
/// `topology` is public and may be edited between passes, e.g. to drop the
/// loss and dropout layers for inference.
#[derive(Debug)]
pub struct FFN {
    pub topology: Vec<Layer>,
    layers: Vec<NodeId>,
    rng: StdRng,
}

impl FFN {
    pub fn new(topology: Vec<Layer>) -> Self {
        FFN {
            topology,
            layers: Vec::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Like [`new`](FFN::new), with a fixed seed for the dropout masks.
    pub fn with_seed(topology: Vec<Layer>, seed: u64) -> Self {
        FFN {
            topology,
            layers: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Operator nodes built by the last forward pass, one per layer.
    pub fn layers(&self) -> &[NodeId] {
        &self.layers
    }

    /// Runs the forward pass on `x` and returns the value of the last layer.
    pub fn forward(&mut self, graph: &mut Graph, x: NodeId) -> Result<Tensor, NnKitError> {
        for id in self.layers.drain(..) {
            if graph.contains(id) {
                graph.release(id)?;
            }
        }
        let mut current = x;
        for layer in &self.topology {
            current = layer.apply(graph, current, &mut self.rng)?;
            self.layers.push(current);
        }
        debug!("FFN forward built {} layers", self.layers.len());
        Ok(graph.value(current)?.clone())
    }

    /// Back-propagates from the last layer of the previous forward pass.
    ///
    /// With `reset`, the gradients of every variable referenced by the
    /// topology are zeroed first; otherwise they accumulate on top of earlier
    /// passes.
    pub fn back(&self, graph: &mut Graph, reset: bool) -> Result<(), NnKitError> {
        let last = *self
            .layers
            .last()
            .ok_or_else(|| NnKitError::InvalidArgument("FFN::back called before forward".to_string()))?;
        if reset {
            self.reset(graph)?;
        }
        graph.backward(last)
    }

    /// Distinct variable nodes referenced by the topology, in order of first use.
    pub fn vars(&self) -> Vec<NodeId> {
        let mut vars: Vec<NodeId> = Vec::new();
        for id in self.topology.iter().flat_map(Layer::vars) {
            if !vars.contains(&id) {
                vars.push(id);
            }
        }
        vars
    }

    /// Zeroes the gradients of every variable referenced by the topology.
    pub fn reset(&self, graph: &mut Graph) -> Result<(), NnKitError> {
        for id in self.vars() {
            graph.reset(id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "ffn_test.rs"]
mod tests;
