use log::debug;

use crate::autograd::{Graph, NodeId};
use crate::error::NnKitError;
use crate::optim::gd::moving_average;
use crate::optim::optimizer_trait::Optimizer;
use crate::optim::{check_learn_rate, check_unit_interval};
use crate::tensor::Tensor;
use crate::EPSILON;

/// Adaptive moment estimation, without bias correction.
///
/// For each parameter `p` with gradient `g`:
///
/// ```text
/// m = β1·m + (1 − β1)·g
/// r = β2·r + (1 − β2)·g²
/// p = p − α·m/√(r + ε)
/// ```
///
/// Setting the momentum to 0 gives RMSProp.
#[derive(Debug, Clone)]
pub struct Adam {
    params: Vec<NodeId>,
    learn_rate: f32,
    momentum: f32,
    rms: f32,
    m: Vec<Option<Tensor>>,
    r: Vec<Option<Tensor>>,
}

impl Adam {
    pub const DEFAULT_LEARN_RATE: f32 = 0.1;
    pub const DEFAULT_MOMENTUM: f32 = 0.9;
    pub const DEFAULT_RMS: f32 = 0.999;

    pub fn new(params: Vec<NodeId>) -> Self {
        let n = params.len();
        Adam {
            params,
            learn_rate: Self::DEFAULT_LEARN_RATE,
            momentum: Self::DEFAULT_MOMENTUM,
            rms: Self::DEFAULT_RMS,
            m: vec![None; n],
            r: vec![None; n],
        }
    }

    /// # Errors
    /// `ConfigurationError` if `learn_rate` is negative, or `momentum` or
    /// `rms` is outside `[0, 1)`.
    pub fn with_config(params: Vec<NodeId>, learn_rate: f32, momentum: f32, rms: f32) -> Result<Self, NnKitError> {
        check_learn_rate(learn_rate)?;
        check_unit_interval("momentum", momentum)?;
        check_unit_interval("rms", rms)?;
        let mut adam = Adam::new(params);
        adam.learn_rate = learn_rate;
        adam.momentum = momentum;
        adam.rms = rms;
        Ok(adam)
    }

    pub fn momentum(&self) -> f32 {
        self.momentum
    }

    pub fn rms(&self) -> f32 {
        self.rms
    }
}

impl Optimizer for Adam {
    fn step(&mut self, graph: &mut Graph) -> Result<(), NnKitError> {
        debug!("Adam step over {} parameters, lr {}", self.params.len(), self.learn_rate);
        let iter = self.params.iter().zip(self.m.iter_mut().zip(self.r.iter_mut()));
        for (&p, (m, r)) in iter {
            let g = graph.grad(p)?.clone();
            moving_average(m, &g, self.momentum)?;
            moving_average(r, &g.map(|x| x * x), self.rms)?;
            if let (Some(m), Some(r)) = (m.as_ref(), r.as_ref()) {
                let lr = self.learn_rate;
                let update = m.zip_map(r, "adam", |m, r| lr * m / (r + EPSILON).sqrt())?;
                graph.sub_value(p, &update)?;
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
#[path = "adam_test.rs"]
mod tests;
