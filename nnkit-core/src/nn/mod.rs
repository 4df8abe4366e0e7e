// src/nn/mod.rs
// Network assembly, parameter initialization and topology persistence.

pub mod ffn;
pub mod init;
pub mod layer;
pub mod serialization;

pub use ffn::FFN;
pub use layer::Layer;
