// src/ops/arithmetic/mod.rs

pub mod add;

pub use add::add_op;
