//! # digitnet - Feed-Forward Networks for Fixed-Size Digit Images
//!
//! digitnet builds, trains and evaluates fully connected feed-forward neural
//! networks on 28x28 grayscale digit images. It is made of three tightly
//! coupled parts:
//!
//! - a dense [`matrix`] engine with explicit valid/zero shapes
//! - a position-addressable [`network`] of [`layers`] that re-initializes
//!   the neighbour of every structural edit
//! - forward propagation and mini-batch [`training`] on a
//!   sum-of-squared-residuals loss
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use digitnet::activations::Activation;
//! use digitnet::config::{NetworkOptions, TransformKind};
//! use digitnet::data::{read_image_set, ImageSetMetadata};
//! use digitnet::layers::{DistributionStrategy, LayerRole, LayerSpec};
//! use digitnet::network::Network;
//! use digitnet::training;
//!
//! let options = NetworkOptions::new(DistributionStrategy::HeXavier, 1.0)
//!     .with_learning_rate(0.1)
//!     .with_seed(42);
//! let mut network = Network::new(options, &[
//!     LayerSpec::new(784, LayerRole::Input),
//!     LayerSpec::new(30, LayerRole::Hidden),
//!     LayerSpec::new(10, LayerRole::Output),
//! ]).unwrap();
//!
//! let mut samples = read_image_set(&ImageSetMetadata::train_default()).unwrap();
//! let orientation = network.options().node_orientation;
//! training::prepare_dataset(&mut samples, orientation, TransformKind::Standardize.transform()).unwrap();
//!
//! training::train(&mut network, Activation::Sigmoid, 5, 32, &samples).unwrap();
//! let accuracy = training::evaluate(&network, Activation::Sigmoid, &samples).unwrap();
//! println!("accuracy: {:.2}%", accuracy * 100.0);
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Sigmoid, ReLU and Tanh with their derivatives
//! - [`config`] - Network options and JSON run configuration
//! - [`data`] - Labeled samples and the CSV image-set loader
//! - [`error`] - Error types and result handling
//! - [`layers`] - Layer records and weight initialization
//! - [`loss`] - Sum-of-squared-residuals loss and gradient
//! - [`matrix`] - Dense 2-D matrix engine
//! - [`network`] - Layer store, traversal and persistence
//! - [`stats`] - Flat-array statistics and normalization
//! - [`training`] - Sample preparation, propagation, training and evaluation

#[macro_use]
pub mod macros;

pub mod activations;
pub mod config;
pub mod data;
pub mod error;
pub mod layers;
pub mod loss;
pub mod matrix;
pub mod network;
pub mod stats;
pub mod training;

#[cfg(test)]
mod tests;
