//! # Activation Functions Module
//!
//! Activation functions applied to every node after a layer's affine step.
//! All of them are pure scalar functions; [`Activation`] lifts them to whole
//! matrices.
//!
//! ## Available Activations
//!
//! - **Sigmoid**: `1 / (1 + e^(-x))` - Outputs between 0 and 1
//! - **ReLU** (Rectified Linear Unit): `max(0, x)`
//! - **Tanh**: Hyperbolic tangent - Outputs between -1 and 1
//!
//! Each one comes with its derivative (`sigmoid_prime`, `relu_prime`,
//! `tanh_prime`), taken with respect to the pre-activation value. The
//! derivatives are only needed by [`UpdateRule::Backpropagation`]; the
//! default output-bias rule never evaluates them.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use digitnet::activations::{Activation, sigmoid};
//! use digitnet::matrix::Matrix;
//!
//! assert_eq!(sigmoid(0.0), 0.5);
//!
//! let mut m = Matrix::from_shape_vec(1, 3, vec![-1.0, 0.0, 1.0]).unwrap();
//! Activation::Relu.apply_matrix(&mut m);
//! ```
//!
//! [`UpdateRule::Backpropagation`]: crate::config::UpdateRule::Backpropagation

pub mod functions;

pub use functions::{relu, relu_prime, sigmoid, sigmoid_prime, tanh, tanh_prime, Activation};
