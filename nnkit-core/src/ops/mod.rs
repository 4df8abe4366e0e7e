//! Operator library.
//!
//! Each operator has a `*_op` constructor that reads its parents' values,
//! computes the forward result eagerly and stores a new operator node in the
//! [`Graph`]. The node carries one of the [`Op`] variants below, which holds
//! whatever the local backward step needs.

use crate::autograd::{BackwardOp, Graph, NodeId};
use crate::error::NnKitError;
use crate::tensor::Tensor;

pub mod activation;
pub mod arithmetic;
pub mod linalg;
pub mod loss;
pub mod normalization;
pub mod regularization;

pub use activation::leaky_relu::{leaky_relu_op, LeakyReluBackward, DEFAULT_SLOPE};
pub use activation::relu::{relu_op, ReluBackward};
pub use activation::sigmoid::{sigmoid_op, SigmoidBackward};
pub use activation::softmax::{softmax_op, SoftmaxBackward};
pub use activation::tanh::{tanh_op, TanhBackward};
pub use arithmetic::add::{add_op, AddBackward};
pub use linalg::matmul::{matmul_op, MatMulBackward};
pub use loss::cross_entropy::{ce_loss_op, CrossEntropyBackward};
pub use loss::huber::{huber_loss_op, HuberLossBackward, DEFAULT_DELTA};
pub use loss::l1::{l1_loss_op, L1LossBackward};
pub use loss::l2::{l2_loss_op, L2LossBackward};
pub use normalization::batch_norm::{batch_norm_op, BatchNormBackward, RUNNING_DECAY};
pub use regularization::dropout::{dropout_op, dropout_with_mask_op, DropoutBackward, DEFAULT_KEEP_PROB};
pub use regularization::l2_reg::{l2_reg_op, L2RegBackward};

/// Closed set of operators an operator node can hold.
#[derive(Debug, Clone)]
pub enum Op {
    MatMul(MatMulBackward),
    Add(AddBackward),
    ReLU(ReluBackward),
    LeakyReLU(LeakyReluBackward),
    Sigmoid(SigmoidBackward),
    Tanh(TanhBackward),
    SoftMax(SoftmaxBackward),
    BatchNorm(BatchNormBackward),
    L2Reg(L2RegBackward),
    Dropout(DropoutBackward),
    L1Loss(L1LossBackward),
    L2Loss(L2LossBackward),
    CELoss(CrossEntropyBackward),
    HuberLoss(HuberLossBackward),
}

impl Op {
    pub fn name(&self) -> &'static str {
        match self {
            Op::MatMul(_) => "MatMul",
            Op::Add(_) => "Add",
            Op::ReLU(_) => "ReLU",
            Op::LeakyReLU(_) => "LeakyReLU",
            Op::Sigmoid(_) => "Sigmoid",
            Op::Tanh(_) => "Tanh",
            Op::SoftMax(_) => "SoftMax",
            Op::BatchNorm(_) => "BatchNorm",
            Op::L2Reg(_) => "L2Reg",
            Op::Dropout(_) => "Dropout",
            Op::L1Loss(_) => "L1Loss",
            Op::L2Loss(_) => "L2Loss",
            Op::CELoss(_) => "CELoss",
            Op::HuberLoss(_) => "HuberLoss",
        }
    }

    pub fn as_backward(&self) -> &dyn BackwardOp {
        match self {
            Op::MatMul(op) => op,
            Op::Add(op) => op,
            Op::ReLU(op) => op,
            Op::LeakyReLU(op) => op,
            Op::Sigmoid(op) => op,
            Op::Tanh(op) => op,
            Op::SoftMax(op) => op,
            Op::BatchNorm(op) => op,
            Op::L2Reg(op) => op,
            Op::Dropout(op) => op,
            Op::L1Loss(op) => op,
            Op::L2Loss(op) => op,
            Op::CELoss(op) => op,
            Op::HuberLoss(op) => op,
        }
    }

    pub fn inputs(&self) -> Vec<NodeId> {
        self.as_backward().inputs()
    }
}

/// Value of a parent node, reporting `operation` if it is missing.
pub(crate) fn input_value<'a>(graph: &'a Graph, id: NodeId, operation: &str) -> Result<&'a Tensor, NnKitError> {
    graph.value(id).map_err(|err| match err {
        NnKitError::UninitializedValue { node, .. } => NnKitError::UninitializedValue {
            node,
            operation: operation.to_string(),
        },
        other => other,
    })
}
