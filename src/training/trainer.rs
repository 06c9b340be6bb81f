use crate::activations::Activation;
use crate::config::{NodeOrientation, UpdateRule};
use crate::data::Sample;
use crate::error::{DigitNetError, Result};
use crate::loss::{loss_gradient, Loss, SumSquaredResiduals};
use crate::matrix::Matrix;
use crate::network::Network;

use super::propagation::{decode, forward_propagate, one_hot};

/// Input and pre-activation output of one trainable layer, recorded during a
/// forward pass for backpropagation.
struct LayerTrace {
    position: usize,
    input: Matrix,
    pre_activation: Matrix,
}

fn trainable_output(network: &Network) -> Result<usize> {
    match network.layers().last() {
        Some(layer) if layer.is_trainable() => Ok(layer.node_count()),
        _ => Err(DigitNetError::InvalidShape(
            "network has no trainable output layer".to_string(),
        )),
    }
}

fn targets(batch: &[Sample], output_nodes: usize, orientation: NodeOrientation) -> Result<Vec<Matrix>> {
    batch
        .iter()
        .map(|sample| one_hot(sample.expected_value, output_nodes, orientation))
        .collect()
}

/// Train on `samples` once, `batch_size` samples per update.
///
/// Returns the mean SSR loss per sample, measured before each batch's update.
pub fn train_batch(
    network: &mut Network,
    activation: Activation,
    batch_size: usize,
    samples: &[Sample],
) -> Result<f64> {
    if batch_size == 0 {
        return Err(DigitNetError::invalid_argument("batch_size", "should be a positive integer"));
    }
    if samples.is_empty() {
        return Err(DigitNetError::invalid_argument("samples", "should not be empty"));
    }
    let output_nodes = trainable_output(network)?;

    let mut total_loss = 0.0;
    for (batch_idx, batch) in samples.chunks(batch_size).enumerate() {
        let batch_loss = match network.options().update_rule {
            UpdateRule::OutputBias => output_bias_step(network, activation, output_nodes, batch)?,
            UpdateRule::Backpropagation => backpropagation_step(network, activation, output_nodes, batch)?,
        };
        log::trace!("batch {}: SSR loss {:.6}", batch_idx, batch_loss);
        total_loss += batch_loss;
    }

    Ok(total_loss / samples.len() as f64)
}

/// Subtract `learning_rate * loss_gradient(batch)` from the output layer's
/// bias. Weights and hidden layers are left untouched.
fn output_bias_step(
    network: &mut Network,
    activation: Activation,
    output_nodes: usize,
    batch: &[Sample],
) -> Result<f64> {
    let orientation = network.options().node_orientation;
    let learning_rate = network.options().learning_rate;

    let net: &Network = network;
    let observed = batch
        .iter()
        .map(|sample| forward_propagate(sample, net, activation))
        .collect::<Result<Vec<_>>>()?;
    let expected = targets(batch, output_nodes, orientation)?;

    let mut loss = 0.0;
    for (obs, exp) in observed.iter().zip(&expected) {
        loss += SumSquaredResiduals.compute(obs, exp)?;
    }

    let step = loss_gradient(&observed, &expected)?.scale(learning_rate)?;
    let position = network.len();
    network.layer_mut(position)?.descend_bias(&step)?;
    Ok(loss)
}

fn forward_trace(network: &Network, input: &Matrix, activation: Activation) -> Result<Vec<LayerTrace>> {
    let orientation = network.options().node_orientation;
    let mut traces = Vec::with_capacity(network.len());
    let mut current = input.clone();

    for (index, layer) in network.layers().iter().enumerate() {
        if !layer.is_trainable() {
            continue;
        }
        let pre_activation = layer.affine(&current, orientation)?;
        let mut output = pre_activation.clone();
        activation.apply_matrix(&mut output);
        traces.push(LayerTrace {
            position: index + 1,
            input: current,
            pre_activation,
        });
        current = output;
    }

    Ok(traces)
}

fn accumulate(slot: &mut Option<(Matrix, Matrix)>, weight_grad: Matrix, bias_grad: Matrix) -> Result<()> {
    match slot {
        None => *slot = Some((weight_grad, bias_grad)),
        Some((weights, bias)) => {
            *weights = weights.add(&weight_grad)?;
            *bias = bias.add(&bias_grad)?;
        }
    }
    Ok(())
}

/// Propagate the SSR gradient back through every trainable layer and
/// descend all weights and biases by the batch-summed gradients.
fn backpropagation_step(
    network: &mut Network,
    activation: Activation,
    output_nodes: usize,
    batch: &[Sample],
) -> Result<f64> {
    let orientation = network.options().node_orientation;
    let learning_rate = network.options().learning_rate;
    let mut gradients: Vec<Option<(Matrix, Matrix)>> = vec![None; network.len()];
    let mut loss = 0.0;

    let net: &Network = network;
    for sample in batch {
        let traces = forward_trace(net, &sample.input_values, activation)?;
        let last = traces.last().ok_or_else(|| {
            DigitNetError::InvalidShape("network has no trainable layer".to_string())
        })?;

        let mut output = last.pre_activation.clone();
        activation.apply_matrix(&mut output);
        let expected = one_hot(sample.expected_value, output_nodes, orientation)?;
        loss += SumSquaredResiduals.compute(&output, &expected)?;

        let mut delta = SumSquaredResiduals
            .gradient(&output, &expected)?
            .hadamard(&activation.derivative_matrix(&last.pre_activation))?;

        for (i, trace) in traces.iter().enumerate().rev() {
            let weight_grad = match orientation {
                NodeOrientation::ColumnMajorNodes => delta.dot(&trace.input.transposed())?,
                NodeOrientation::RowMajorNodes => trace.input.transposed().dot(&delta)?,
            };
            accumulate(&mut gradients[trace.position - 1], weight_grad, delta.clone())?;

            if i > 0 {
                let weights = net.layer(trace.position)?.weights();
                let propagated = match orientation {
                    NodeOrientation::ColumnMajorNodes => weights.transposed().dot(&delta)?,
                    NodeOrientation::RowMajorNodes => delta.dot(&weights.transposed())?,
                };
                delta = propagated.hadamard(&activation.derivative_matrix(&traces[i - 1].pre_activation))?;
            }
        }
    }

    for (index, grads) in gradients.into_iter().enumerate() {
        if let Some((weight_grad, bias_grad)) = grads {
            let layer = network.layer_mut(index + 1)?;
            layer.descend_weights(&weight_grad.scale(learning_rate)?)?;
            layer.descend_bias(&bias_grad.scale(learning_rate)?)?;
        }
    }

    Ok(loss)
}

/// Run `epochs` passes of [`train_batch`] and return each epoch's mean loss.
pub fn train(
    network: &mut Network,
    activation: Activation,
    epochs: usize,
    batch_size: usize,
    samples: &[Sample],
) -> Result<Vec<f64>> {
    if epochs == 0 {
        return Err(DigitNetError::invalid_argument("epochs", "should be a positive integer"));
    }

    let mut losses = Vec::with_capacity(epochs);
    for epoch in 1..=epochs {
        let loss = train_batch(network, activation, batch_size, samples)?;
        log::info!("epoch {}/{}: mean SSR loss {:.6}", epoch, epochs, loss);
        losses.push(loss);
    }
    Ok(losses)
}

/// Fraction of `samples` whose arg-max decoded output equals the label.
pub fn evaluate(network: &Network, activation: Activation, samples: &[Sample]) -> Result<f64> {
    if samples.is_empty() {
        return Err(DigitNetError::invalid_argument("samples", "should not be empty"));
    }

    let mut correct = 0usize;
    for sample in samples {
        let output = forward_propagate(sample, network, activation)?;
        if decode(&output)? == sample.expected_value {
            correct += 1;
        }
    }

    let accuracy = correct as f64 / samples.len() as f64;
    log::debug!("evaluated {} samples: {}/{} correct", samples.len(), correct, samples.len());
    Ok(accuracy)
}
