use crate::activations::Activation;
use crate::config::{NetworkOptions, NodeOrientation, TransformKind, UpdateRule};
use crate::data::Sample;
use crate::error::DigitNetError;
use crate::layers::{DistributionStrategy, LayerRole, LayerSpec};
use crate::loss::{loss_gradient, Loss, SumSquaredResiduals};
use crate::matrix::Matrix;
use crate::network::Network;
use crate::training::*;

fn vector(values: &[f64], orientation: NodeOrientation) -> Matrix {
    let (rows, cols) = orientation.vector_shape(values.len());
    Matrix::from_shape_vec(rows, cols, values.to_vec()).unwrap()
}

fn two_layer_network(options: NetworkOptions) -> Network {
    Network::new(
        options,
        &[LayerSpec::new(2, LayerRole::Input), LayerSpec::new(2, LayerRole::Output)],
    )
    .unwrap()
}

fn separable_samples(orientation: NodeOrientation) -> Vec<Sample> {
    vec![
        Sample::new(0, vector(&[1.0, 0.0], orientation)),
        Sample::new(1, vector(&[0.0, 1.0], orientation)),
    ]
}

#[test]
fn test_prepare_sample_orientation() {
    let raw = Matrix::from_shape_vec(2, 2, vec![0.0, 2.0, 4.0, 6.0]).unwrap();

    let mut column = Sample::new(3, raw.clone());
    prepare_sample(&mut column, NodeOrientation::ColumnMajorNodes, TransformKind::Normalize.transform()).unwrap();
    assert_eq!(column.input_values.shape(), (4, 1));
    assert_eq!(column.input_values[(3, 0)], 1.0);
    assert_eq!(column.input_values[(0, 0)], 0.0);

    let mut row = Sample::new(3, raw);
    prepare_sample(&mut row, NodeOrientation::RowMajorNodes, TransformKind::Normalize.transform()).unwrap();
    assert_eq!(row.input_values.shape(), (1, 4));
    assert_eq!(row.expected_value, 3);
}

#[test]
fn test_prepare_dataset_rejects_empty() {
    let mut samples: Vec<Sample> = Vec::new();
    let result = prepare_dataset(&mut samples, NodeOrientation::ColumnMajorNodes, TransformKind::Standardize.transform());
    assert!(matches!(result, Err(DigitNetError::InvalidArgument { .. })));
}

#[test]
fn test_forward_propagate_zero_network() {
    let network = Network::new(
        NetworkOptions::default(),
        &[
            LayerSpec::new(4, LayerRole::Input),
            LayerSpec::new(3, LayerRole::Hidden),
            LayerSpec::new(2, LayerRole::Output),
        ],
    )
    .unwrap();

    let mut ones = Matrix::new(4, 1).unwrap();
    ones.fill(1.0).unwrap();
    let sample = Sample::new(0, ones);

    let output = forward_propagate(&sample, &network, Activation::Sigmoid).unwrap();
    assert_eq!(output.shape(), (2, 1));
    assert!(output.iter().all(|&v| v == 0.5));
    assert!(sample.input_values.iter().all(|&v| v == 1.0));
}

#[test]
fn test_forward_propagate_shape_mismatch() {
    let network = two_layer_network(NetworkOptions::default());
    let sample = Sample::new(0, Matrix::new(3, 1).unwrap());
    let result = forward_propagate(&sample, &network, Activation::Sigmoid);
    assert!(matches!(result, Err(DigitNetError::DimensionMismatch { .. })));
}

#[test]
fn test_predict_without_trainable_layers() {
    let network = Network::new(NetworkOptions::default(), &[LayerSpec::new(2, LayerRole::Input)]).unwrap();
    let input = vector(&[0.3, 0.7], NodeOrientation::ColumnMajorNodes);
    assert_eq!(predict(&network, &input, Activation::Relu).unwrap(), input);
}

#[test]
fn test_one_hot_and_decode() {
    let column = one_hot(2, 4, NodeOrientation::ColumnMajorNodes).unwrap();
    assert_eq!(column.shape(), (4, 1));
    assert_eq!(column.to_vec(), vec![0.0, 0.0, 1.0, 0.0]);
    assert_eq!(decode(&column).unwrap(), 2);

    let row = one_hot(0, 3, NodeOrientation::RowMajorNodes).unwrap();
    assert_eq!(row.shape(), (1, 3));

    assert!(matches!(
        one_hot(4, 4, NodeOrientation::ColumnMajorNodes),
        Err(DigitNetError::InvalidArgument { .. })
    ));
}

#[test]
fn test_loss_and_gradient() {
    let orientation = NodeOrientation::ColumnMajorNodes;
    let observed = vector(&[0.5, 0.5], orientation);
    let expected = vector(&[1.0, 0.0], orientation);

    assert_eq!(SumSquaredResiduals.compute(&observed, &expected).unwrap(), 0.5);
    assert_eq!(
        SumSquaredResiduals.gradient(&observed, &expected).unwrap().to_vec(),
        vec![-1.0, 1.0]
    );

    let batch = loss_gradient(&[observed.clone(), observed.clone()], &[expected.clone(), expected]).unwrap();
    assert_eq!(batch.to_vec(), vec![-2.0, 2.0]);

    assert!(matches!(
        loss_gradient(&[observed], &[]),
        Err(DigitNetError::DimensionMismatch { .. })
    ));
    assert!(loss_gradient(&[], &[]).is_err());
}

#[test]
fn test_output_bias_step() {
    let options = NetworkOptions::default().with_learning_rate(0.1);
    let mut network = two_layer_network(options);

    let orientation = NodeOrientation::ColumnMajorNodes;
    let samples = vec![
        Sample::new(1, vector(&[0.2, 0.4], orientation)),
        Sample::new(1, vector(&[0.6, 0.1], orientation)),
        Sample::new(1, vector(&[0.9, 0.3], orientation)),
        Sample::new(0, vector(&[0.5, 0.5], orientation)),
    ];

    let loss = train_batch(&mut network, Activation::Sigmoid, 4, &samples).unwrap();
    assert!((loss - 0.5).abs() < 1e-12);

    let output = network.layer(2).unwrap();
    let bias = output.bias().to_vec();
    assert!((bias[0] + 0.2).abs() < 1e-12);
    assert!((bias[1] - 0.2).abs() < 1e-12);
    assert!(output.weights().iter().all(|&w| w == 0.0));

    let accuracy = evaluate(&network, Activation::Sigmoid, &samples).unwrap();
    assert_eq!(accuracy, 0.75);
}

#[test]
fn test_backpropagation_learns_separable_classes() {
    for orientation in [NodeOrientation::ColumnMajorNodes, NodeOrientation::RowMajorNodes] {
        let options = NetworkOptions::default()
            .with_learning_rate(0.5)
            .with_orientation(orientation)
            .with_update_rule(UpdateRule::Backpropagation);
        let mut network = two_layer_network(options);
        let samples = separable_samples(orientation);

        let losses = train(&mut network, Activation::Sigmoid, 50, 1, &samples).unwrap();
        assert_eq!(losses.len(), 50);
        assert!(losses[49] < losses[0]);
        assert_eq!(evaluate(&network, Activation::Sigmoid, &samples).unwrap(), 1.0);
        network.check_structure().unwrap();
    }
}

#[test]
fn test_backpropagation_through_hidden_layer() {
    let orientation = NodeOrientation::ColumnMajorNodes;
    let options = NetworkOptions::new(DistributionStrategy::HeXavier, 1.0)
        .with_learning_rate(0.5)
        .with_update_rule(UpdateRule::Backpropagation)
        .with_seed(5);
    let mut network = Network::new(
        options,
        &[
            LayerSpec::new(2, LayerRole::Input),
            LayerSpec::new(4, LayerRole::Hidden),
            LayerSpec::new(2, LayerRole::Output),
        ],
    )
    .unwrap();
    let hidden_before = network.layer(2).unwrap().weights().clone();

    let samples = separable_samples(orientation);
    let losses = train(&mut network, Activation::Sigmoid, 200, 2, &samples).unwrap();

    assert_ne!(network.layer(2).unwrap().weights(), &hidden_before);
    assert!(losses[199] < losses[0]);
    network.check_structure().unwrap();
}

#[test]
fn test_zero_learning_rate_changes_nothing() {
    let mut network = two_layer_network(NetworkOptions::default());
    let before = network.layers().to_vec();
    let samples = separable_samples(NodeOrientation::ColumnMajorNodes);

    train_batch(&mut network, Activation::Sigmoid, 2, &samples).unwrap();
    assert_eq!(network.layers(), &before[..]);
}

#[test]
fn test_training_argument_errors() {
    let mut network = two_layer_network(NetworkOptions::default());
    let samples = separable_samples(NodeOrientation::ColumnMajorNodes);

    assert!(matches!(
        train_batch(&mut network, Activation::Sigmoid, 0, &samples),
        Err(DigitNetError::InvalidArgument { .. })
    ));
    assert!(train_batch(&mut network, Activation::Sigmoid, 1, &[]).is_err());
    assert!(train(&mut network, Activation::Sigmoid, 0, 1, &samples).is_err());
    assert!(evaluate(&network, Activation::Sigmoid, &[]).is_err());

    let mut input_only = Network::new(NetworkOptions::default(), &[LayerSpec::new(2, LayerRole::Input)]).unwrap();
    assert!(matches!(
        train_batch(&mut input_only, Activation::Sigmoid, 1, &samples),
        Err(DigitNetError::InvalidShape(_))
    ));
}

#[test]
fn test_label_outside_output_is_rejected() {
    let mut network = two_layer_network(NetworkOptions::default().with_learning_rate(0.1));
    let samples = vec![Sample::new(5, vector(&[1.0, 0.0], NodeOrientation::ColumnMajorNodes))];
    assert!(matches!(
        train_batch(&mut network, Activation::Sigmoid, 1, &samples),
        Err(DigitNetError::InvalidArgument { .. })
    ));
}

#[test]
fn test_evaluate_bounds() {
    let network = two_layer_network(NetworkOptions::default());
    let samples = separable_samples(NodeOrientation::ColumnMajorNodes);
    let accuracy = evaluate(&network, Activation::Tanh, &samples).unwrap();
    // all-zero outputs decode to class 0
    assert_eq!(accuracy, 0.5);
}

fn reject_transform(values: &mut [f64]) -> crate::error::Result<()> {
    values[0] = 99.0;
    Err(DigitNetError::invalid_argument("values", "rejected"))
}

fn reject_ones(values: &mut [f64]) -> crate::error::Result<()> {
    if values.iter().all(|&v| v == 1.0) {
        return Err(DigitNetError::invalid_argument("values", "constant"));
    }
    Ok(())
}

#[test]
fn test_failed_transform_leaves_sample_untouched() {
    let raw = Matrix::from_shape_vec(2, 2, vec![0.0, 2.0, 4.0, 6.0]).unwrap();
    let mut sample = Sample::new(1, raw.clone());

    let result = prepare_sample(&mut sample, NodeOrientation::ColumnMajorNodes, reject_transform);
    assert!(result.is_err());
    assert_eq!(sample.input_values, raw);
}

#[test]
fn test_failed_dataset_preparation_leaves_samples_untouched() {
    let first = Matrix::from_shape_vec(2, 2, vec![0.0, 2.0, 4.0, 6.0]).unwrap();
    let second = Matrix::from_shape_vec(2, 2, vec![1.0; 4]).unwrap();
    let mut samples = vec![Sample::new(0, first.clone()), Sample::new(1, second.clone())];

    assert!(prepare_dataset(&mut samples, NodeOrientation::RowMajorNodes, reject_ones).is_err());
    assert_eq!(samples[0].input_values, first);
    assert_eq!(samples[1].input_values, second);
}
