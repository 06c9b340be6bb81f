//! # Matrix Engine
//!
//! A dense, row-major matrix of `f64` backed by [`ndarray::Array2`].
//!
//! A [`Matrix`] is always in one of two states:
//!
//! - **valid**: `rows > 0 && cols > 0`, with `rows * cols` live entries
//! - **zero**: the canonical `0x0` matrix, which owns no storage
//!
//! No other shape can be constructed. Operations that change the shape of a
//! matrix (`transpose`, `flatten`) take `&mut self` and replace the backing
//! array in a single assignment, so the caller never observes a half-built
//! matrix. Binary operations (`add`, `scale`, `dot`, ...) borrow their
//! operands and return a freshly owned result.

use std::fmt;
use std::iter;
use std::ops::Index;

use ndarray::{s, Array2};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::Uniform;
use serde::{Deserialize, Serialize};

use crate::error::{DigitNetError, Result};

/// Axis used when flattening a matrix into a vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// A single row, `1 x n`
    Row,
    /// A single column, `n x 1`
    Col,
}

/// A 2-D grid of `f64` values in row-major order.
///
/// Deserialization goes through [`Matrix::from_array`], so a stored array
/// with one empty axis is rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Array2<f64>", into = "Array2<f64>")]
pub struct Matrix {
    entries: Array2<f64>,
}

impl Matrix {
    /// Create a valid `rows x cols` matrix.
    ///
    /// Entries start at `0.0`. Fails with `InvalidDimension` if either
    /// dimension is zero and with `AllocationFailure` if the backing buffer
    /// cannot be reserved.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(DigitNetError::InvalidDimension { rows, cols });
        }

        let len = rows
            .checked_mul(cols)
            .ok_or(DigitNetError::AllocationFailure { requested: usize::MAX })?;
        let mut buffer: Vec<f64> = Vec::new();
        buffer
            .try_reserve_exact(len)
            .map_err(|_| DigitNetError::AllocationFailure { requested: len })?;
        buffer.resize(len, 0.0);

        let entries = Array2::from_shape_vec((rows, cols), buffer)
            .map_err(|e| DigitNetError::invalid_matrix(e.to_string()))?;
        Ok(Matrix { entries })
    }

    /// The canonical `0x0` matrix. Never allocates.
    pub fn zero() -> Self {
        Matrix {
            entries: Array2::zeros((0, 0)),
        }
    }

    /// Create a valid matrix from row-major values.
    pub fn from_shape_vec(rows: usize, cols: usize, values: Vec<f64>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(DigitNetError::InvalidDimension { rows, cols });
        }
        if values.len() != rows * cols {
            return Err(DigitNetError::dimension_mismatch(
                format!("{} values for a {}x{} matrix", rows * cols, rows, cols),
                format!("{} values", values.len()),
            ));
        }

        let entries = Array2::from_shape_vec((rows, cols), values)
            .map_err(|e| DigitNetError::invalid_matrix(e.to_string()))?;
        Ok(Matrix { entries })
    }

    /// Wrap an existing array. A `0x0` array becomes the zero matrix; any
    /// other shape with an empty axis is rejected.
    pub fn from_array(entries: Array2<f64>) -> Result<Self> {
        let (rows, cols) = entries.dim();
        match (rows, cols) {
            (0, 0) => Ok(Matrix::zero()),
            (0, _) | (_, 0) => Err(DigitNetError::InvalidDimension { rows, cols }),
            _ => Ok(Matrix { entries }),
        }
    }

    pub fn rows(&self) -> usize {
        self.entries.nrows()
    }

    pub fn cols(&self) -> usize {
        self.entries.ncols()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.entries.dim()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.entries.get((row, col)).copied()
    }

    /// Entries in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.entries.iter()
    }

    /// Row-major linearization of the entries.
    pub fn to_vec(&self) -> Vec<f64> {
        self.entries.iter().copied().collect()
    }

    pub fn is_valid(&self) -> bool {
        self.rows() > 0 && self.cols() > 0
    }

    pub fn is_zero(&self) -> bool {
        self.rows() == 0 && self.cols() == 0
    }

    /// `1 x n` with `n > 1`. A `1x1` matrix is not a row vector.
    pub fn is_row_vector(&self) -> bool {
        self.rows() == 1 && self.cols() > 1
    }

    /// `n x 1` with `n > 1`. A `1x1` matrix is not a column vector.
    pub fn is_column_vector(&self) -> bool {
        self.cols() == 1 && self.rows() > 1
    }

    pub fn same_shape(&self, other: &Matrix) -> bool {
        self.shape() == other.shape()
    }

    fn ensure_valid(&self, operation: &str) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(DigitNetError::invalid_matrix(format!(
                "{} requires a valid matrix, got {}x{}",
                operation,
                self.rows(),
                self.cols()
            )))
        }
    }

    fn ensure_same_shape(&self, other: &Matrix, operation: &str) -> Result<()> {
        if self.same_shape(other) {
            Ok(())
        } else {
            Err(DigitNetError::dimension_mismatch(
                format!("{} operand of shape {}x{}", operation, self.rows(), self.cols()),
                format!("{}x{}", other.rows(), other.cols()),
            ))
        }
    }

    /// Overwrite every entry with `value`.
    pub fn fill(&mut self, value: f64) -> Result<()> {
        self.ensure_valid("fill")?;
        self.entries.fill(value);
        Ok(())
    }

    /// Fill with `uniform(low, high) * multiplier` using the thread-local RNG.
    pub fn fill_random_bounded(&mut self, low: f64, high: f64, multiplier: f64) -> Result<()> {
        self.fill_random_bounded_using(&mut rand::thread_rng(), low, high, multiplier)
    }

    /// Fill with `uniform(low, high) * multiplier` drawn from `rng`.
    ///
    /// The bounds are inclusive so that `low == high` is accepted.
    pub fn fill_random_bounded_using<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        low: f64,
        high: f64,
        multiplier: f64,
    ) -> Result<()> {
        self.ensure_valid("fill_random_bounded")?;
        if !(low.is_finite() && high.is_finite()) || low > high {
            return Err(DigitNetError::invalid_argument(
                "bounds".to_string(),
                format!("expected finite low <= high, got [{}, {}]", low, high),
            ));
        }

        let random = Array2::random_using(self.shape(), Uniform::new_inclusive(low, high), rng);
        self.entries = random.mapv(|v| v * multiplier);
        Ok(())
    }

    /// Release the backing storage and become the zero matrix.
    /// Calling this on the zero matrix is a no-op.
    pub fn free(&mut self) {
        if !self.is_zero() {
            self.entries = Array2::zeros((0, 0));
        }
    }

    /// Apply `f` to every entry in place.
    pub fn map_inplace<F: FnMut(f64) -> f64>(&mut self, mut f: F) {
        self.entries.mapv_inplace(|v| f(v));
    }

    /// Entrywise sum.
    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        self.ensure_valid("add")?;
        other.ensure_valid("add")?;
        self.ensure_same_shape(other, "add")?;
        Ok(Matrix {
            entries: &self.entries + &other.entries,
        })
    }

    /// Entrywise difference `self - other`.
    pub fn sub(&self, other: &Matrix) -> Result<Matrix> {
        self.ensure_valid("sub")?;
        other.ensure_valid("sub")?;
        self.ensure_same_shape(other, "sub")?;
        Ok(Matrix {
            entries: &self.entries - &other.entries,
        })
    }

    /// Entrywise product.
    pub fn hadamard(&self, other: &Matrix) -> Result<Matrix> {
        self.ensure_valid("hadamard")?;
        other.ensure_valid("hadamard")?;
        self.ensure_same_shape(other, "hadamard")?;
        Ok(Matrix {
            entries: &self.entries * &other.entries,
        })
    }

    /// Every entry multiplied by `factor`.
    pub fn scale(&self, factor: f64) -> Result<Matrix> {
        self.ensure_valid("scale")?;
        Ok(Matrix {
            entries: &self.entries * factor,
        })
    }

    /// Matrix product `self · other`.
    ///
    /// Strict: fails with `DimensionMismatch` unless `self.cols == other.rows`.
    /// Operands are never swapped; see [`Matrix::dot_auto_orient`] for that.
    pub fn dot(&self, other: &Matrix) -> Result<Matrix> {
        self.ensure_valid("dot")?;
        other.ensure_valid("dot")?;
        if self.cols() != other.rows() {
            return Err(DigitNetError::dimension_mismatch(
                format!("right operand with {} rows", self.cols()),
                format!("{}x{}", other.rows(), other.cols()),
            ));
        }

        Ok(Matrix {
            entries: self.entries.dot(&other.entries),
        })
    }

    /// Matrix product that reorders its operands when only the reversed
    /// product is defined.
    ///
    /// - `self.cols == other.rows`: returns `self · other`
    /// - otherwise, `other.cols == self.rows`: returns `other · self`
    /// - otherwise: `DimensionMismatch`
    ///
    /// The swap changes which operand is on the left, so the result is in
    /// general not `self · other` transposed. Training never calls this.
    pub fn dot_auto_orient(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols() == other.rows() {
            self.dot(other)
        } else if other.cols() == self.rows() {
            log::trace!(
                "dot_auto_orient: swapping {}x{} and {}x{}",
                self.rows(),
                self.cols(),
                other.rows(),
                other.cols()
            );
            other.dot(self)
        } else {
            self.dot(other)
        }
    }

    /// Replace `self` with its transpose. The zero matrix stays zero.
    pub fn transpose(&mut self) {
        let transposed = self.transposed();
        *self = transposed;
    }

    /// A transposed copy of `self`.
    pub fn transposed(&self) -> Matrix {
        Matrix {
            entries: self.entries.t().as_standard_layout().into_owned(),
        }
    }

    /// Replace `self` with a single row or column holding its entries in
    /// row-major order.
    pub fn flatten(&mut self, axis: Axis) -> Result<()> {
        self.ensure_valid("flatten")?;
        let len = self.len();
        let shape = match axis {
            Axis::Row => (1, len),
            Axis::Col => (len, 1),
        };

        let entries = Array2::from_shape_vec(shape, self.to_vec())
            .map_err(|e| DigitNetError::invalid_matrix(e.to_string()))?;
        self.entries = entries;
        Ok(())
    }

    /// Copy `self` into the top-left corner of `dest`, zeroing every other
    /// cell of `dest`.
    ///
    /// Fails with `DimensionMismatch` if `dest` is smaller than `self` in
    /// either dimension.
    pub fn copy_bounded(&self, dest: &mut Matrix) -> Result<()> {
        self.ensure_valid("copy_bounded")?;
        dest.ensure_valid("copy_bounded")?;
        let (rows, cols) = self.shape();
        if dest.rows() < rows || dest.cols() < cols {
            return Err(DigitNetError::dimension_mismatch(
                format!("destination of at least {}x{}", rows, cols),
                format!("{}x{}", dest.rows(), dest.cols()),
            ));
        }

        dest.entries.fill(0.0);
        dest.entries.slice_mut(s![..rows, ..cols]).assign(&self.entries);
        Ok(())
    }

    /// Fill `self` from `src` in row-major order. A short `src` leaves the
    /// remaining cells at zero; a long one is truncated.
    pub fn copy_from_slice(&mut self, src: &[f64]) -> Result<()> {
        self.ensure_valid("copy_from_slice")?;
        let padded = src.iter().copied().chain(iter::repeat(0.0));
        for (cell, value) in self.entries.iter_mut().zip(padded) {
            *cell = value;
        }
        Ok(())
    }

    /// Write the row-major linearization of `self` into `dest`, zero-padding
    /// or truncating to `dest.len()`.
    pub fn copy_to_slice(&self, dest: &mut [f64]) -> Result<()> {
        self.ensure_valid("copy_to_slice")?;
        let padded = self.entries.iter().copied().chain(iter::repeat(0.0));
        for (slot, value) in dest.iter_mut().zip(padded) {
            *slot = value;
        }
        Ok(())
    }

    /// Row-major linear index of the largest entry. Ties resolve to the
    /// first occurrence.
    pub fn argmax(&self) -> Result<usize> {
        self.ensure_valid("argmax")?;
        let mut max_idx = 0;
        let mut max_val = f64::NEG_INFINITY;
        for (idx, &val) in self.entries.iter().enumerate() {
            if val > max_val {
                max_val = val;
                max_idx = idx;
            }
        }
        Ok(max_idx)
    }

    pub fn sum(&self) -> f64 {
        self.entries.sum()
    }
}

impl TryFrom<Array2<f64>> for Matrix {
    type Error = DigitNetError;

    fn try_from(entries: Array2<f64>) -> Result<Self> {
        Matrix::from_array(entries)
    }
}

impl From<Matrix> for Array2<f64> {
    fn from(matrix: Matrix) -> Self {
        matrix.entries
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix::zero()
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.entries[index]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.entries.rows() {
            for value in row.iter() {
                write!(f, "{:5.2} ", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
