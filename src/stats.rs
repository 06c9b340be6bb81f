//! One-dimensional statistics over flat `f64` slices, and the in-place
//! `normalize`/`standardize` transforms used to prepare samples.

use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::error::{DigitNetError, Result};

/// In-place elementwise transform over a flattened sample.
pub type Transform = fn(&mut [f64]) -> Result<()>;

fn ensure_non_empty(values: &[f64]) -> Result<()> {
    if values.is_empty() {
        Err(DigitNetError::invalid_argument("size", "should be a positive integer"))
    } else {
        Ok(())
    }
}

/// Equal within `f64::EPSILON`.
pub fn approx_eq(x: f64, y: f64) -> bool {
    (x - y).abs() <= f64::EPSILON
}

pub fn min(values: &[f64]) -> Result<f64> {
    ensure_non_empty(values)?;
    Ok(values.iter().copied().fold(values[0], f64::min))
}

pub fn max(values: &[f64]) -> Result<f64> {
    ensure_non_empty(values)?;
    Ok(values.iter().copied().fold(values[0], f64::max))
}

pub fn mean(values: &[f64]) -> Result<f64> {
    ensure_non_empty(values)?;
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> Result<f64> {
    let mean = mean(values)?;
    let sum_of_squares: f64 = values.iter().map(|&v| (v - mean) * (v - mean)).sum();
    Ok((sum_of_squares / values.len() as f64).sqrt())
}

/// A value drawn uniformly from `[low, high]`.
pub fn random_uniform<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> Result<f64> {
    if !(low.is_finite() && high.is_finite()) || low > high {
        return Err(DigitNetError::invalid_argument(
            "bounds".to_string(),
            format!("expected finite low <= high, got [{}, {}]", low, high),
        ));
    }
    Ok(Uniform::new_inclusive(low, high).sample(rng))
}

/// Rescale to `[0, 1]` via `(x - min) / (max - min)`.
///
/// Leaves the values untouched when the range is zero.
pub fn normalize(values: &mut [f64]) -> Result<()> {
    let minimum = min(values)?;
    let range = max(values)? - minimum;
    if approx_eq(range, 0.0) {
        log::trace!("normalize: zero range over {} values, skipped", values.len());
        return Ok(());
    }

    for v in values.iter_mut() {
        *v = (*v - minimum) / range;
    }
    Ok(())
}

/// Shift to zero mean and scale to unit variance.
///
/// Leaves the values untouched when the standard deviation is zero.
pub fn standardize(values: &mut [f64]) -> Result<()> {
    let mean = mean(values)?;
    let sdev = std_dev(values)?;
    if approx_eq(sdev, 0.0) {
        log::trace!("standardize: zero deviation over {} values, skipped", values.len());
        return Ok(());
    }

    for v in values.iter_mut() {
        *v = (*v - mean) / sdev;
    }
    Ok(())
}
