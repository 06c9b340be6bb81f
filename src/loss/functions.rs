use crate::error::{DigitNetError, Result};
use crate::matrix::Matrix;

/// Trait defining the interface for loss functions
pub trait Loss: Send + Sync {
    /// Compute the loss for a single observation and target
    fn compute(&self, observed: &Matrix, expected: &Matrix) -> Result<f64>;

    /// Gradient of the loss with respect to the observation
    fn gradient(&self, observed: &Matrix, expected: &Matrix) -> Result<Matrix>;

    /// Gradient summed over a batch of equally shaped observations
    fn gradient_batch(&self, observed: &[Matrix], expected: &[Matrix]) -> Result<Matrix>;
}

/// Sum of squared residuals: `sum((expected - observed)^2)`
pub struct SumSquaredResiduals;

impl Loss for SumSquaredResiduals {
    fn compute(&self, observed: &Matrix, expected: &Matrix) -> Result<f64> {
        let residuals = expected.sub(observed)?;
        Ok(residuals.iter().map(|r| r * r).sum())
    }

    /// `-2 * (expected - observed)`
    fn gradient(&self, observed: &Matrix, expected: &Matrix) -> Result<Matrix> {
        expected.sub(observed)?.scale(-2.0)
    }

    /// `-2 * sum_i(expected[i] - observed[i])`
    fn gradient_batch(&self, observed: &[Matrix], expected: &[Matrix]) -> Result<Matrix> {
        if observed.len() != expected.len() {
            return Err(DigitNetError::dimension_mismatch(
                format!("{} expected matrices", observed.len()),
                format!("{}", expected.len()),
            ));
        }
        if observed.is_empty() {
            return Err(DigitNetError::invalid_argument("batch", "should not be empty"));
        }

        let mut residual_sum = expected[0].sub(&observed[0])?;
        for (obs, exp) in observed.iter().zip(expected).skip(1) {
            residual_sum = residual_sum.add(&exp.sub(obs)?)?;
        }
        residual_sum.scale(-2.0)
    }
}

/// SSR gradient of a batch; see [`SumSquaredResiduals::gradient_batch`].
pub fn loss_gradient(observed: &[Matrix], expected: &[Matrix]) -> Result<Matrix> {
    SumSquaredResiduals.gradient_batch(observed, expected)
}
