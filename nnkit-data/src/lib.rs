//! # nnkit-data
//!
//! Mini-batch iteration over paired input and target tensors.
//!
//! A [`Dataset`] hands out samples by index, a [`Sampler`] decides the order
//! in which indices are visited, and [`MiniBatchLoader`] groups that order into
//! batches of whole rows.

pub mod dataloader;
pub mod datasets;
pub mod samplers;

pub use dataloader::{mini_batches, BatchSpec, Batches, MiniBatchLoader};
pub use datasets::{Dataset, TensorDataset};
pub use samplers::{RandomSampler, Sampler, SequentialSampler};
