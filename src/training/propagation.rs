use crate::activations::Activation;
use crate::config::NodeOrientation;
use crate::data::Sample;
use crate::error::{DigitNetError, Result};
use crate::matrix::{Axis, Matrix};
use crate::network::{Direction, Network};
use crate::stats::Transform;

fn prepared_input(raw: &Matrix, orientation: NodeOrientation, transform: Transform) -> Result<Matrix> {
    let mut input = raw.clone();
    input.flatten(Axis::Row)?;

    let mut values = input.to_vec();
    transform(&mut values)?;
    input.copy_from_slice(&values)?;

    if orientation == NodeOrientation::ColumnMajorNodes {
        input.transpose();
    }
    Ok(input)
}

/// Flatten a sample to a single row, apply `transform` to it, then turn it
/// into a column if the network uses column-major nodes.
///
/// The sample is only replaced once every step has succeeded.
pub fn prepare_sample(sample: &mut Sample, orientation: NodeOrientation, transform: Transform) -> Result<()> {
    sample.input_values = prepared_input(&sample.input_values, orientation, transform)?;
    Ok(())
}

/// [`prepare_sample`] over a whole dataset. On error no sample is modified.
pub fn prepare_dataset(samples: &mut [Sample], orientation: NodeOrientation, transform: Transform) -> Result<()> {
    if samples.is_empty() {
        return Err(DigitNetError::invalid_argument("samples", "should not be empty"));
    }

    let prepared = samples
        .iter()
        .map(|sample| prepared_input(&sample.input_values, orientation, transform))
        .collect::<Result<Vec<_>>>()?;
    for (sample, input) in samples.iter_mut().zip(prepared) {
        sample.input_values = input;
    }
    Ok(())
}

/// Propagate a prepared input through every layer that owns weights and
/// return the last layer's activated output.
///
/// The input is only borrowed; intermediate outputs are dropped as soon as
/// the next layer has consumed them.
pub fn predict(network: &Network, input: &Matrix, activation: Activation) -> Result<Matrix> {
    let orientation = network.options().node_orientation;
    let mut current: Option<Matrix> = None;

    for layer in network.traverse(Direction::Forward) {
        if !layer.is_trainable() {
            continue;
        }
        let next = layer.forward(current.as_ref().unwrap_or(input), orientation, activation)?;
        current = Some(next);
    }

    Ok(current.unwrap_or_else(|| input.clone()))
}

pub fn forward_propagate(sample: &Sample, network: &Network, activation: Activation) -> Result<Matrix> {
    predict(network, &sample.input_values, activation)
}

/// Target vector for `label`: `1.0` at the label's node, `0.0` elsewhere,
/// shaped as a node vector of `orientation`.
pub fn one_hot(label: usize, node_count: usize, orientation: NodeOrientation) -> Result<Matrix> {
    if label >= node_count {
        return Err(DigitNetError::invalid_argument(
            "label".to_string(),
            format!("{} is outside an output of {} nodes", label, node_count),
        ));
    }

    let (rows, cols) = orientation.vector_shape(node_count);
    let mut values = vec![0.0; node_count];
    values[label] = 1.0;
    Matrix::from_shape_vec(rows, cols, values)
}

/// Predicted class: the row-major index of the largest output entry.
pub fn decode(output: &Matrix) -> Result<usize> {
    output.argmax()
}
