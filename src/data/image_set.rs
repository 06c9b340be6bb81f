use std::path::PathBuf;

use csv::StringRecord;
use serde::{Deserialize, Serialize};

use crate::error::{DigitNetError, Result};
use crate::matrix::Matrix;
use crate::stats::Transform;

use super::loader::read_csv_records;
use super::Sample;

pub const IMG_HEIGHT: usize = 28;
pub const IMG_WIDTH: usize = 28;
pub const IMG_SIZE: usize = IMG_HEIGHT * IMG_WIDTH;

/// Where an image set lives and how many records to read from it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSetMetadata {
    pub path: PathBuf,
    pub size: usize,
    #[serde(default)]
    pub has_headers: bool,
}

impl ImageSetMetadata {
    pub fn new<P: Into<PathBuf>>(path: P, size: usize) -> Self {
        ImageSetMetadata {
            path: path.into(),
            size,
            has_headers: false,
        }
    }

    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    pub fn train_default() -> Self {
        Self::new("dataset/mnist_train.csv", 60000)
    }

    pub fn test_default() -> Self {
        Self::new("dataset/mnist_test.csv", 10000)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(DigitNetError::invalid_argument(
                "size".to_string(),
                format!("{} should list a positive number of records", self.path.display()),
            ));
        }
        Ok(())
    }
}

impl Default for ImageSetMetadata {
    fn default() -> Self {
        Self::train_default()
    }
}

/// Parse `label, p0, ..., p783` into a `28x28` sample.
pub fn parse_mnist_record(record: &StringRecord, line: usize) -> Result<Sample> {
    if record.len() != IMG_SIZE + 1 {
        return Err(DigitNetError::ParseError {
            line,
            reason: format!("expected {} fields, found {}", IMG_SIZE + 1, record.len()),
        });
    }

    let label = record[0].trim();
    let expected_value = label.parse::<usize>().map_err(|e| DigitNetError::ParseError {
        line,
        reason: format!("label '{}': {}", label, e),
    })?;

    let pixels = record
        .iter()
        .skip(1)
        .map(|field| {
            let field = field.trim();
            field.parse::<f64>().map_err(|e| DigitNetError::ParseError {
                line,
                reason: format!("pixel '{}': {}", field, e),
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    let input_values = Matrix::from_shape_vec(IMG_HEIGHT, IMG_WIDTH, pixels)?;
    Ok(Sample::new(expected_value, input_values))
}

/// Load an MNIST-style CSV image set.
pub fn read_image_set(meta: &ImageSetMetadata) -> Result<Vec<Sample>> {
    meta.validate()?;
    let samples = read_csv_records(&meta.path, meta.size, meta.has_headers, parse_mnist_record)?;
    log::info!("loaded {} samples from {}", samples.len(), meta.path.display());
    Ok(samples)
}

/// Apply `transform` to a sample's pixels, keeping its shape.
pub fn transform_image(sample: &mut Sample, transform: Transform) -> Result<()> {
    let mut values = sample.input_values.to_vec();
    transform(&mut values)?;
    sample.input_values.copy_from_slice(&values)
}

pub fn transform_image_set(samples: &mut [Sample], transform: Transform) -> Result<()> {
    if samples.is_empty() {
        return Err(DigitNetError::invalid_argument("samples", "should not be empty"));
    }
    for sample in samples.iter_mut() {
        transform_image(sample, transform)?;
    }
    Ok(())
}
