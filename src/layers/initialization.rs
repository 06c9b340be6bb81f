use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{NetworkOptions, NodeOrientation};
use crate::error::Result;
use crate::matrix::Matrix;

/// Weight initialization strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DistributionStrategy {
    /// Uniform in the spread-derived bounds, unscaled
    Random,

    /// All zeros
    #[default]
    Zero,

    /// Scaled by `sqrt(2 / nodes)`
    He,

    /// Scaled by `sqrt(2 / prev)`
    Xavier,

    /// Scaled by `sqrt(2 / (nodes + prev))`
    HeXavier,
}

impl DistributionStrategy {
    /// Multiplier applied to every uniform draw. `None` for `Zero`, which
    /// performs no random fill at all.
    pub fn multiplier(&self, node_count: usize, prev_count: usize) -> Option<f64> {
        match self {
            DistributionStrategy::He => Some((2.0 / node_count as f64).sqrt()),
            DistributionStrategy::Xavier => Some((2.0 / prev_count as f64).sqrt()),
            DistributionStrategy::HeXavier => Some((2.0 / (node_count + prev_count) as f64).sqrt()),
            DistributionStrategy::Random => Some(1.0),
            DistributionStrategy::Zero => None,
        }
    }
}

/// Half-width of the uniform range before the strategy multiplier:
/// `spread / sqrt(nodes * prev)`.
pub fn distribution_bound(spread: f64, node_count: usize, prev_count: usize) -> f64 {
    spread / ((node_count * prev_count) as f64).sqrt()
}

/// `(nodes, prev)` read back from a weight matrix laid out for `orientation`.
pub fn weight_counts(weights: &Matrix, orientation: NodeOrientation) -> (usize, usize) {
    match orientation {
        NodeOrientation::ColumnMajorNodes => (weights.rows(), weights.cols()),
        NodeOrientation::RowMajorNodes => (weights.cols(), weights.rows()),
    }
}

/// Fill a valid weight matrix according to `options.distribution_strategy`.
///
/// Every entry is `uniform(-bound, bound) * multiplier` with
/// `bound = spread / sqrt(nodes * prev)`, except for `Zero` which fills with
/// `0.0` and draws nothing from `rng`.
pub fn initialize_weights<R: Rng + ?Sized>(
    weights: &mut Matrix,
    options: &NetworkOptions,
    rng: &mut R,
) -> Result<()> {
    let (node_count, prev_count) = weight_counts(weights, options.node_orientation);
    match options.distribution_strategy.multiplier(node_count, prev_count) {
        None => weights.fill(0.0),
        Some(multiplier) => {
            let bound = distribution_bound(options.distribution_spread, node_count, prev_count);
            weights.fill_random_bounded_using(rng, -bound, bound, multiplier)
        }
    }
}

/// Fill a valid bias matrix with `options.initial_bias`.
pub fn initialize_bias(bias: &mut Matrix, options: &NetworkOptions) -> Result<()> {
    bias.fill(options.initial_bias)
}
