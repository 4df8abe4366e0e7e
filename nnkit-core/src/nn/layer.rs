use rand::Rng;

use crate::autograd::{Graph, NodeId};
use crate::error::NnKitError;
use crate::ops::{
    add_op, batch_norm_op, ce_loss_op, dropout_op, huber_loss_op, l1_loss_op, l2_loss_op, l2_reg_op,
    leaky_relu_op, matmul_op, relu_op, sigmoid_op, softmax_op, tanh_op,
};

/// One entry of a network topology: an operator kind plus every argument it
/// takes besides the output of the previous layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    MatMul { w: NodeId },
    Add { b: NodeId },
    ReLU,
    LeakyReLU { slope: f32 },
    Sigmoid,
    Tanh,
    SoftMax,
    BatchNorm {
        gamma: NodeId,
        beta: NodeId,
        running_var: NodeId,
        running_mean: NodeId,
        use_running: bool,
    },
    Dropout { keep_prob: f32 },
    L1Loss { target: NodeId },
    L2Loss { target: NodeId },
    CELoss { target: NodeId },
    HuberLoss { target: NodeId, delta: f32 },
    L2Reg { params: Vec<NodeId>, rate: f32, target: NodeId },
}

impl Layer {
    /// Operator name, as used in serialized topologies.
    pub fn name(&self) -> &'static str {
        match self {
            Layer::MatMul { .. } => "MatMul",
            Layer::Add { .. } => "Add",
            Layer::ReLU => "ReLU",
            Layer::LeakyReLU { .. } => "LeakyReLU",
            Layer::Sigmoid => "Sigmoid",
            Layer::Tanh => "Tanh",
            Layer::SoftMax => "SoftMax",
            Layer::BatchNorm { .. } => "BatchNorm",
            Layer::Dropout { .. } => "Dropout",
            Layer::L1Loss { .. } => "L1Loss",
            Layer::L2Loss { .. } => "L2Loss",
            Layer::CELoss { .. } => "CELoss",
            Layer::HuberLoss { .. } => "HuberLoss",
            Layer::L2Reg { .. } => "L2Reg",
        }
    }

    /// Builds this layer's operator node on top of `input`.
    pub fn apply<R: Rng + ?Sized>(&self, graph: &mut Graph, input: NodeId, rng: &mut R) -> Result<NodeId, NnKitError> {
        match self {
            Layer::MatMul { w } => matmul_op(graph, input, *w),
            Layer::Add { b } => add_op(graph, input, *b),
            Layer::ReLU => relu_op(graph, input),
            Layer::LeakyReLU { slope } => leaky_relu_op(graph, input, *slope),
            Layer::Sigmoid => sigmoid_op(graph, input),
            Layer::Tanh => tanh_op(graph, input),
            Layer::SoftMax => softmax_op(graph, input),
            Layer::BatchNorm {
                gamma,
                beta,
                running_var,
                running_mean,
                use_running,
            } => batch_norm_op(graph, input, *gamma, *beta, *running_var, *running_mean, *use_running),
            Layer::Dropout { keep_prob } => dropout_op(graph, input, *keep_prob, rng),
            Layer::L1Loss { target } => l1_loss_op(graph, input, *target),
            Layer::L2Loss { target } => l2_loss_op(graph, input, *target),
            Layer::CELoss { target } => ce_loss_op(graph, input, *target),
            Layer::HuberLoss { target, delta } => huber_loss_op(graph, input, *target, *delta),
            Layer::L2Reg { params, rate, target } => l2_reg_op(graph, input, params, *rate, *target),
        }
    }

    /// Variable nodes referenced by this layer, in argument order.
    pub fn vars(&self) -> Vec<NodeId> {
        match self {
            Layer::MatMul { w } => vec![*w],
            Layer::Add { b } => vec![*b],
            Layer::BatchNorm {
                gamma,
                beta,
                running_var,
                running_mean,
                ..
            } => vec![*gamma, *beta, *running_var, *running_mean],
            Layer::L1Loss { target } | Layer::L2Loss { target } | Layer::CELoss { target } => vec![*target],
            Layer::HuberLoss { target, .. } => vec![*target],
            Layer::L2Reg { params, target, .. } => {
                let mut vars = params.clone();
                vars.push(*target);
                vars
            }
            Layer::ReLU
            | Layer::LeakyReLU { .. }
            | Layer::Sigmoid
            | Layer::Tanh
            | Layer::SoftMax
            | Layer::Dropout { .. } => Vec::new(),
        }
    }
}
