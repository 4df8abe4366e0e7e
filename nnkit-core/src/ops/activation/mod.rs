// src/ops/activation/mod.rs

//! # Activation Functions
//!
//! Element-wise non-linearities, plus the row-wise [`softmax`](softmax::softmax_op).

pub mod leaky_relu;
pub mod relu;
pub mod sigmoid;
pub mod softmax;
pub mod tanh;

pub use leaky_relu::leaky_relu_op;
pub use relu::relu_op;
pub use sigmoid::sigmoid_op;
pub use softmax::softmax_op;
pub use tanh::tanh_op;
