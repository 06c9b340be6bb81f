//! Labeled samples and the CSV dataset loader.

pub mod image_set;
pub mod loader;

use serde::{Deserialize, Serialize};

use crate::matrix::Matrix;

pub use image_set::{
    parse_mnist_record, read_image_set, transform_image, transform_image_set, ImageSetMetadata,
    IMG_HEIGHT, IMG_SIZE, IMG_WIDTH,
};
pub use loader::read_csv_records;

/// One labeled example.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Class label
    pub expected_value: usize,
    /// Raw or prepared features
    pub input_values: Matrix,
}

impl Sample {
    pub fn new(expected_value: usize, input_values: Matrix) -> Self {
        Sample {
            expected_value,
            input_values,
        }
    }
}
