//! Configuration for network construction, training and the driver.
//!
//! [`NetworkOptions`] is fixed when a [`Network`](crate::network::Network) is
//! created and re-applied every time a layer is (re-)initialized.
//! [`RunConfig`] bundles everything a training run needs and can be read
//! from a JSON file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::activations::Activation;
use crate::data::ImageSetMetadata;
use crate::error::{DigitNetError, Result};
use crate::layers::{DistributionStrategy, LayerRole, LayerSpec};
use crate::matrix::Axis;
use crate::stats::{self, Transform};

/// Whether node values are laid out as a single row or a single column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NodeOrientation {
    /// Samples are `1 x n`, weights `prev x nodes`, biases `1 x nodes`
    RowMajorNodes,
    /// Samples are `n x 1`, weights `nodes x prev`, biases `nodes x 1`
    #[default]
    ColumnMajorNodes,
}

impl NodeOrientation {
    /// The flatten axis matching this orientation.
    pub fn axis(&self) -> Axis {
        match self {
            NodeOrientation::RowMajorNodes => Axis::Row,
            NodeOrientation::ColumnMajorNodes => Axis::Col,
        }
    }

    /// Shape of a `(nodes, prev)` weight matrix in this orientation.
    pub fn weight_shape(&self, nodes: usize, prev: usize) -> (usize, usize) {
        match self {
            NodeOrientation::RowMajorNodes => (prev, nodes),
            NodeOrientation::ColumnMajorNodes => (nodes, prev),
        }
    }

    /// Shape of a node vector (bias, activations, targets).
    pub fn vector_shape(&self, nodes: usize) -> (usize, usize) {
        match self {
            NodeOrientation::RowMajorNodes => (1, nodes),
            NodeOrientation::ColumnMajorNodes => (nodes, 1),
        }
    }
}

/// How a training batch updates the network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UpdateRule {
    /// Subtract the scaled batch SSR gradient from the output layer's bias only
    #[default]
    OutputBias,
    /// Propagate the SSR gradient through every trainable layer and update
    /// all weights and biases
    Backpropagation,
}

/// Weight initialization and training options of a network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkOptions {
    pub distribution_strategy: DistributionStrategy,
    /// Width of the uniform initialization range, must be >= 0
    pub distribution_spread: f64,
    /// Constant every bias entry starts at
    pub initial_bias: f64,
    /// Step size of a batch update, must be >= 0
    pub learning_rate: f64,
    pub node_orientation: NodeOrientation,
    pub update_rule: UpdateRule,
    /// Seed for the network's PRNG; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for NetworkOptions {
    /// Neutral options: zero weights, zero bias, no learning.
    fn default() -> Self {
        NetworkOptions {
            distribution_strategy: DistributionStrategy::Zero,
            distribution_spread: 0.0,
            initial_bias: 0.0,
            learning_rate: 0.0,
            node_orientation: NodeOrientation::ColumnMajorNodes,
            update_rule: UpdateRule::OutputBias,
            seed: None,
        }
    }
}

impl NetworkOptions {
    pub fn new(distribution_strategy: DistributionStrategy, distribution_spread: f64) -> Self {
        NetworkOptions {
            distribution_strategy,
            distribution_spread,
            ..Default::default()
        }
    }

    pub fn with_initial_bias(mut self, initial_bias: f64) -> Self {
        self.initial_bias = initial_bias;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_orientation(mut self, node_orientation: NodeOrientation) -> Self {
        self.node_orientation = node_orientation;
        self
    }

    pub fn with_update_rule(mut self, update_rule: UpdateRule) -> Self {
        self.update_rule = update_rule;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the numeric invariants. The enum-typed fields are valid by
    /// construction.
    pub fn validate(&self) -> Result<()> {
        if !self.distribution_spread.is_finite() || self.distribution_spread < 0.0 {
            return Err(DigitNetError::invalid_options(format!(
                "distribution_spread should be a finite value >= 0, got {}",
                self.distribution_spread
            )));
        }
        if !self.learning_rate.is_finite() || self.learning_rate < 0.0 {
            return Err(DigitNetError::invalid_options(format!(
                "learning_rate should be a finite value >= 0, got {}",
                self.learning_rate
            )));
        }
        if !self.initial_bias.is_finite() {
            return Err(DigitNetError::invalid_options(format!(
                "initial_bias should be finite, got {}",
                self.initial_bias
            )));
        }
        Ok(())
    }
}

/// Elementwise transform applied to a flattened sample before training.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    /// Rescale to `[0, 1]`
    Normalize,
    /// Zero mean, unit variance
    #[default]
    Standardize,
}

impl TransformKind {
    pub fn transform(&self) -> Transform {
        match self {
            TransformKind::Normalize => stats::normalize as Transform,
            TransformKind::Standardize => stats::standardize as Transform,
        }
    }
}

/// Everything a training run needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub network: NetworkOptions,
    pub layers: Vec<LayerSpec>,
    pub activation: Activation,
    pub transform: TransformKind,
    pub epochs: usize,
    pub batch_size: usize,
    pub train: ImageSetMetadata,
    pub test: ImageSetMetadata,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            network: NetworkOptions::new(DistributionStrategy::HeXavier, 1.0)
                .with_learning_rate(0.1)
                .with_seed(42),
            layers: vec![
                LayerSpec::new(784, LayerRole::Input),
                LayerSpec::new(30, LayerRole::Hidden),
                LayerSpec::new(10, LayerRole::Output),
            ],
            activation: Activation::Sigmoid,
            transform: TransformKind::Standardize,
            epochs: 10,
            batch_size: 32,
            train: ImageSetMetadata::train_default(),
            test: ImageSetMetadata::test_default(),
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        self.network.validate()?;
        if self.layers.is_empty() {
            return Err(DigitNetError::invalid_argument("layers", "at least one layer is required"));
        }
        if self.epochs == 0 {
            return Err(DigitNetError::invalid_argument("epochs", "should be a positive integer"));
        }
        if self.batch_size == 0 {
            return Err(DigitNetError::invalid_argument("batch_size", "should be a positive integer"));
        }
        self.train.validate()?;
        self.test.validate()?;
        Ok(())
    }

    /// Read and validate a run configuration from a JSON file.
    /// Missing fields take their default value.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let config: RunConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        fs::write(path, serialized)?;
        Ok(())
    }
}
