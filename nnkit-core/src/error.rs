use crate::autograd::NodeId;
use thiserror::Error;

/// Custom error type for the nnkit framework.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum NnKitError {
    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Cannot broadcast shapes: {shape1:?} and {shape2:?}")]
    BroadcastError {
        shape1: Vec<usize>,
        shape2: Vec<usize>,
    },

    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Node {node:?} has no value (required by {operation})")]
    UninitializedValue { node: NodeId, operation: String },

    #[error("Node {0:?} does not exist in this graph or was released")]
    UnknownNode(NodeId),

    #[error("Non-finite value produced during {operation}")]
    NonFiniteValue { operation: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<serde_json::Error> for NnKitError {
    fn from(err: serde_json::Error) -> Self {
        NnKitError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for NnKitError {
    fn from(err: std::io::Error) -> Self {
        NnKitError::Io(err.to_string())
    }
}
