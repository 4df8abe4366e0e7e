//! # nnkit-core
//!
//! A small reverse-mode automatic differentiation engine for feed-forward
//! computation graphs.
//!
//! Values live in a [`Graph`](autograd::Graph) arena. Variable nodes hold a
//! tensor and a gradient of the same shape; operator nodes additionally know
//! their parents and how to push a gradient back to them. Operators compute
//! their value eagerly when they are constructed, and
//! [`Graph::backward`](autograd::Graph::backward) walks the graph from the
//! terminal node back to the leaves, accumulating gradients along the way.
//!
//! ```
//! use nnkit_core::autograd::Graph;
//! use nnkit_core::ops::{matmul_op, l2_loss_op};
//! use nnkit_core::Tensor;
//!
//! let mut graph = Graph::new();
//! let x = graph.var(Some(Tensor::new(vec![1.0, 2.0], vec![1, 2]).unwrap()));
//! let w = graph.var(Some(Tensor::new(vec![1.0, 1.0], vec![2, 1]).unwrap()));
//! let t = graph.var(Some(Tensor::new(vec![0.0], vec![1, 1]).unwrap()));
//!
//! let y = matmul_op(&mut graph, x, w).unwrap();
//! let loss = l2_loss_op(&mut graph, y, t).unwrap();
//! graph.backward(loss).unwrap();
//!
//! assert_eq!(graph.grad(w).unwrap().data(), &[3.0, 6.0]);
//! ```

pub mod autograd;
pub mod error;
pub mod nn;
pub mod ops;
pub mod optim;
pub mod tensor;

pub use autograd::{Graph, NodeId};
pub use error::NnKitError;
pub use tensor::Tensor;

/// Small additive constant guarding divisions, square roots and logarithms.
pub const EPSILON: f32 = 1e-8;
