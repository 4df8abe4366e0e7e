use log::debug;

use crate::autograd::{Graph, NodeId};
use crate::error::NnKitError;
use crate::optim::optimizer_trait::Optimizer;
use crate::optim::{check_learn_rate, check_unit_interval};
use crate::tensor::Tensor;

/// Gradient descent with momentum.
///
/// For each parameter `p` with gradient `g`:
///
/// ```text
/// m = β·m + (1 − β)·g
/// p = p − α·m
/// ```
///
/// `β = 0` disables momentum.
#[derive(Debug, Clone)]
pub struct GD {
    params: Vec<NodeId>,
    learn_rate: f32,
    momentum: f32,
    velocity: Vec<Option<Tensor>>,
}

impl GD {
    pub const DEFAULT_LEARN_RATE: f32 = 0.1;
    pub const DEFAULT_MOMENTUM: f32 = 0.9;

    /// Creates an optimizer with the default learn rate and momentum.
    pub fn new(params: Vec<NodeId>) -> Self {
        let velocity = vec![None; params.len()];
        GD {
            params,
            learn_rate: Self::DEFAULT_LEARN_RATE,
            momentum: Self::DEFAULT_MOMENTUM,
            velocity,
        }
    }

    /// # Errors
    /// `ConfigurationError` if `learn_rate` is negative or `momentum` is outside `[0, 1)`.
    pub fn with_config(params: Vec<NodeId>, learn_rate: f32, momentum: f32) -> Result<Self, NnKitError> {
        check_learn_rate(learn_rate)?;
        check_unit_interval("momentum", momentum)?;
        let mut gd = GD::new(params);
        gd.learn_rate = learn_rate;
        gd.momentum = momentum;
        Ok(gd)
    }

    pub fn momentum(&self) -> f32 {
        self.momentum
    }
}

/// Blends `g` into the running average `avg` with weight `1 − beta`,
/// starting from zeros.
pub(crate) fn moving_average(avg: &mut Option<Tensor>, g: &Tensor, beta: f32) -> Result<(), NnKitError> {
    let next = match avg.take() {
        Some(prev) => prev.zip_map(g, "moving_average", |m, g| beta * m + (1.0 - beta) * g)?,
        None => g.scale(1.0 - beta),
    };
    *avg = Some(next);
    Ok(())
}

impl Optimizer for GD {
    fn step(&mut self, graph: &mut Graph) -> Result<(), NnKitError> {
        debug!("GD step over {} parameters, lr {}", self.params.len(), self.learn_rate);
        for (&p, m) in self.params.iter().zip(self.velocity.iter_mut()) {
            let g = graph.grad(p)?.clone();
            moving_average(m, &g, self.momentum)?;
            if let Some(m) = m {
                graph.sub_value(p, &m.scale(self.learn_rate))?;
            }
            graph.reset(p)?;
        }
        Ok(())
    }

    fn params(&self) -> &[NodeId] {
        &self.params
    }

    fn learn_rate(&self) -> f32 {
        self.learn_rate
    }

    fn set_learn_rate(&mut self, learn_rate: f32) -> Result<(), NnKitError> {
        check_learn_rate(learn_rate)?;
        self.learn_rate = learn_rate;
        Ok(())
    }
}

#[cfg(test)]
#[path = "gd_test.rs"]
mod tests;
