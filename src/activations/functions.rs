use serde::{Deserialize, Serialize};

use crate::matrix::Matrix;

/// `1 / (1 + e^(-x))`, evaluated without overflowing `exp` for large `|x|`.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// `max(0, x)`
pub fn relu(x: f64) -> f64 {
    x.max(0.0)
}

pub fn tanh(x: f64) -> f64 {
    x.tanh()
}

pub fn sigmoid_prime(x: f64) -> f64 {
    let s = sigmoid(x);
    s * (1.0 - s)
}

/// Subgradient 0 at the origin.
pub fn relu_prime(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else {
        0.0
    }
}

pub fn tanh_prime(x: f64) -> f64 {
    let t = x.tanh();
    1.0 - t * t
}

/// An enumeration of the activation functions a network can be propagated with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[default]
    Sigmoid,
    Relu,
    Tanh,
}

impl Activation {
    /// Apply the activation function to a single value.
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => sigmoid(x),
            Activation::Relu => relu(x),
            Activation::Tanh => tanh(x),
        }
    }

    /// Derivative of the activation function at the pre-activation value `x`.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => sigmoid_prime(x),
            Activation::Relu => relu_prime(x),
            Activation::Tanh => tanh_prime(x),
        }
    }

    /// Apply the activation function to every entry in place.
    pub fn apply_matrix(&self, m: &mut Matrix) {
        let activation = *self;
        m.map_inplace(|v| activation.apply(v));
    }

    /// Derivative evaluated entrywise on a matrix of pre-activations.
    pub fn derivative_matrix(&self, pre_activation: &Matrix) -> Matrix {
        let activation = *self;
        let mut deriv = pre_activation.clone();
        deriv.map_inplace(|v| activation.derivative(v));
        deriv
    }
}
