// src/ops/regularization/mod.rs

pub mod dropout;
pub mod l2_reg;

pub use dropout::{dropout_op, dropout_with_mask_op};
pub use l2_reg::l2_reg_op;
