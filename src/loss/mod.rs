//! Loss functions for training.
//!
//! The network is trained on the sum of squared residuals (SSR) between the
//! observed output and the one-hot target.

pub mod functions;

pub use functions::{loss_gradient, Loss, SumSquaredResiduals};
