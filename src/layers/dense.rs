use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activations::Activation;
use crate::config::{NetworkOptions, NodeOrientation};
use crate::error::{DigitNetError, Result};
use crate::matrix::Matrix;

use super::initialization::{initialize_bias, initialize_weights, weight_counts};

/// Position class of a layer within a network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerRole {
    Input,
    Hidden,
    Output,
}

/// Node count and role of a layer to be built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub node_count: usize,
    pub role: LayerRole,
}

impl LayerSpec {
    pub fn new(node_count: usize, role: LayerRole) -> Self {
        LayerSpec { node_count, role }
    }
}

/// A fully connected layer: an affine transform over the previous layer's
/// nodes followed by an activation.
///
/// Input layers, and layers whose predecessor has no nodes, own the zero
/// matrix for both weights and bias and are passed through unchanged by
/// forward propagation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    node_count: usize,
    role: LayerRole,
    weights: Matrix,
    bias: Matrix,
}

impl Layer {
    /// Create a layer and initialize its weights and bias against a
    /// predecessor of `prev_count` nodes.
    pub fn activate<R: Rng + ?Sized>(
        node_count: usize,
        role: LayerRole,
        prev_count: usize,
        options: &NetworkOptions,
        rng: &mut R,
    ) -> Result<Self> {
        if node_count == 0 {
            return Err(DigitNetError::InvalidShape(
                "layer node count should be a positive integer".to_string(),
            ));
        }

        let (weights, bias) = Self::parameters(node_count, role, prev_count, options, rng)?;
        Ok(Layer {
            node_count,
            role,
            weights,
            bias,
        })
    }

    /// Replace the weights and bias with freshly initialized ones for a
    /// predecessor of `prev_count` nodes. On error the layer is unchanged.
    pub fn reactivate<R: Rng + ?Sized>(
        &mut self,
        prev_count: usize,
        options: &NetworkOptions,
        rng: &mut R,
    ) -> Result<()> {
        let (weights, bias) = Self::parameters(self.node_count, self.role, prev_count, options, rng)?;
        self.weights = weights;
        self.bias = bias;
        Ok(())
    }

    fn parameters<R: Rng + ?Sized>(
        node_count: usize,
        role: LayerRole,
        prev_count: usize,
        options: &NetworkOptions,
        rng: &mut R,
    ) -> Result<(Matrix, Matrix)> {
        if role == LayerRole::Input || prev_count == 0 {
            return Ok((Matrix::zero(), Matrix::zero()));
        }

        let orientation = options.node_orientation;
        let (w_rows, w_cols) = orientation.weight_shape(node_count, prev_count);
        let (b_rows, b_cols) = orientation.vector_shape(node_count);

        let mut weights = Matrix::new(w_rows, w_cols)?;
        let mut bias = Matrix::new(b_rows, b_cols)?;
        initialize_weights(&mut weights, options, rng)?;
        initialize_bias(&mut bias, options)?;
        Ok((weights, bias))
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn role(&self) -> LayerRole {
        self.role
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn bias(&self) -> &Matrix {
        &self.bias
    }

    /// Whether the layer owns weights, i.e. takes part in propagation.
    pub fn is_trainable(&self) -> bool {
        self.weights.is_valid()
    }

    /// Node count of the predecessor the weights were shaped for; 0 when
    /// the layer owns no weights.
    pub fn predecessor_count(&self, orientation: NodeOrientation) -> usize {
        if self.weights.is_zero() {
            0
        } else {
            weight_counts(&self.weights, orientation).1
        }
    }

    /// Replace the weights with `weights`, which must keep the current shape.
    pub fn set_weights(&mut self, weights: Matrix) -> Result<()> {
        if !self.weights.same_shape(&weights) {
            return Err(DigitNetError::dimension_mismatch(
                format!("weights of shape {:?}", self.weights.shape()),
                format!("{:?}", weights.shape()),
            ));
        }
        self.weights = weights;
        Ok(())
    }

    /// Replace the bias with `bias`, which must keep the current shape.
    pub fn set_bias(&mut self, bias: Matrix) -> Result<()> {
        if !self.bias.same_shape(&bias) {
            return Err(DigitNetError::dimension_mismatch(
                format!("bias of shape {:?}", self.bias.shape()),
                format!("{:?}", bias.shape()),
            ));
        }
        self.bias = bias;
        Ok(())
    }

    /// `weights -= step`
    pub fn descend_weights(&mut self, step: &Matrix) -> Result<()> {
        self.weights = self.weights.sub(step)?;
        Ok(())
    }

    /// `bias -= step`
    pub fn descend_bias(&mut self, step: &Matrix) -> Result<()> {
        self.bias = self.bias.sub(step)?;
        Ok(())
    }

    /// The pre-activation output `W·x + b` (column nodes) or `x·W + b`
    /// (row nodes).
    pub fn affine(&self, input: &Matrix, orientation: NodeOrientation) -> Result<Matrix> {
        let weighted = match orientation {
            NodeOrientation::ColumnMajorNodes => self.weights.dot(input)?,
            NodeOrientation::RowMajorNodes => input.dot(&self.weights)?,
        };
        weighted.add(&self.bias)
    }

    /// `activation(affine(input))`
    pub fn forward(
        &self,
        input: &Matrix,
        orientation: NodeOrientation,
        activation: Activation,
    ) -> Result<Matrix> {
        let mut output = self.affine(input, orientation)?;
        activation.apply_matrix(&mut output);
        Ok(output)
    }

    /// Release both matrices.
    pub fn free(&mut self) {
        self.weights.free();
        self.bias.free();
    }
}
