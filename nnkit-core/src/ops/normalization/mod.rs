// src/ops/normalization/mod.rs

pub mod batch_norm;

pub use batch_norm::batch_norm_op;
