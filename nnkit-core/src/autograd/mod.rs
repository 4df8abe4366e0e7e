//! Node storage and reverse-mode differentiation.
//!
//! A [`Graph`] owns every node. Variable nodes are leaves holding a value and
//! a gradient; operator nodes additionally carry an [`Op`](crate::ops::Op)
//! that knows its parents and how to compute their gradient contributions.

pub mod backward;
pub mod backward_op;
pub mod grad_check;
pub mod graph;

pub use backward_op::BackwardOp;
pub use graph::{Graph, NodeId};
