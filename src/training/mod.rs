//! # Propagation & Training
//!
//! A training run moves through these stages:
//!
//! 1. **Preparing**: every sample is flattened, transformed and oriented to
//!    match the network's [`NodeOrientation`](crate::config::NodeOrientation)
//!    ([`prepare_dataset`]).
//! 2. **Forward pass**: each sample is propagated through the layers
//!    ([`forward_propagate`]).
//! 3. **Batch accumulation**: the SSR gradient of a batch is summed
//!    ([`crate::loss::loss_gradient`]).
//! 4. **Update**: the gradient, scaled by the learning rate, is subtracted
//!    according to the network's [`UpdateRule`](crate::config::UpdateRule)
//!    ([`train_batch`]), then the next batch or epoch starts ([`train`]).
//!
//! [`evaluate`] measures classification accuracy with arg-max decoding.

pub mod propagation;
pub mod trainer;

pub use propagation::{decode, forward_propagate, one_hot, predict, prepare_dataset, prepare_sample};
pub use trainer::{evaluate, train, train_batch};
