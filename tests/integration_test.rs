use digitnet::{
    activations::Activation,
    config::{NetworkOptions, NodeOrientation, RunConfig, TransformKind, UpdateRule},
    create_network,
    data::{read_image_set, ImageSetMetadata, Sample, IMG_SIZE},
    layers::{DistributionStrategy, LayerRole},
    matrix::Matrix,
    network::{Direction, Network},
    training::{decode, evaluate, forward_propagate, prepare_dataset, train},
};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

/// Two synthetic "digits": bright top half or bright bottom half.
fn write_synthetic_set(path: &Path, count: usize) {
    let mut file = File::create(path).unwrap();
    for i in 0..count {
        let label = i % 2;
        let pixels: Vec<String> = (0..IMG_SIZE)
            .map(|p| {
                let top = p < IMG_SIZE / 2;
                let bright = (label == 0) == top;
                let value = if bright { 200 + (i + p) % 50 } else { (i * 7 + p) % 30 };
                value.to_string()
            })
            .collect();
        writeln!(file, "{},{}", label, pixels.join(",")).unwrap();
    }
}

#[test]
fn test_end_to_end_training() {
    let dir = tempdir().unwrap();
    let train_path = dir.path().join("train.csv");
    let test_path = dir.path().join("test.csv");
    write_synthetic_set(&train_path, 40);
    write_synthetic_set(&test_path, 10);

    let mut config = RunConfig::default();
    config.layers[2].node_count = 2;
    config.network = NetworkOptions::new(DistributionStrategy::HeXavier, 1.0)
        .with_learning_rate(0.05)
        .with_update_rule(UpdateRule::Backpropagation)
        .with_seed(42);
    config.transform = TransformKind::Standardize;
    config.epochs = 30;
    config.batch_size = 4;
    config.train = ImageSetMetadata::new(&train_path, 40);
    config.test = ImageSetMetadata::new(&test_path, 10);
    config.validate().unwrap();

    let orientation = config.network.node_orientation;
    let mut train_set = read_image_set(&config.train).unwrap();
    let mut test_set = read_image_set(&config.test).unwrap();
    prepare_dataset(&mut train_set, orientation, config.transform.transform()).unwrap();
    prepare_dataset(&mut test_set, orientation, config.transform.transform()).unwrap();
    assert_eq!(train_set[0].input_values.shape(), (IMG_SIZE, 1));

    let mut network = Network::new(config.network.clone(), &config.layers).unwrap();
    let losses = train(&mut network, config.activation, config.epochs, config.batch_size, &train_set).unwrap();
    assert_eq!(losses.len(), config.epochs);
    assert!(losses.last().unwrap() < losses.first().unwrap());

    let accuracy = evaluate(&network, config.activation, &test_set).unwrap();
    assert!(accuracy >= 0.9, "accuracy {} too low", accuracy);
}

#[test]
fn test_output_bias_training_on_row_nodes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("train.csv");
    write_synthetic_set(&path, 12);

    let options = NetworkOptions::new(DistributionStrategy::He, 1.0)
        .with_learning_rate(0.01)
        .with_orientation(NodeOrientation::RowMajorNodes)
        .with_seed(3);
    let mut network = create_network!(options, (IMG_SIZE, Input), (16, Hidden), (2, Output)).unwrap();
    let weights_before: Vec<Matrix> = network.layers().iter().map(|l| l.weights().clone()).collect();

    let mut samples = read_image_set(&ImageSetMetadata::new(&path, 12)).unwrap();
    prepare_dataset(&mut samples, NodeOrientation::RowMajorNodes, TransformKind::Normalize.transform()).unwrap();
    assert_eq!(samples[0].input_values.shape(), (1, IMG_SIZE));

    train(&mut network, Activation::Relu, 3, 5, &samples).unwrap();

    let weights_after: Vec<Matrix> = network.layers().iter().map(|l| l.weights().clone()).collect();
    assert_eq!(weights_before, weights_after);
    let accuracy = evaluate(&network, Activation::Relu, &samples).unwrap();
    assert!((0.0..=1.0).contains(&accuracy));
}

#[test]
fn test_structural_edits_keep_network_usable() {
    let options = NetworkOptions::new(DistributionStrategy::Xavier, 2.0).with_seed(9);
    let mut network = create_network!(options, (6, Input), (3, Output)).unwrap();

    network.insert_layer(2, 5, LayerRole::Hidden).unwrap();
    network.insert_layer(3, 4, LayerRole::Hidden).unwrap();
    network.delete_layer(2).unwrap();
    network.append_layer(2, LayerRole::Output).unwrap();
    network.check_structure().unwrap();

    let counts: Vec<usize> = network.traverse(Direction::Forward).map(|l| l.node_count()).collect();
    assert_eq!(counts, vec![6, 4, 3, 2]);

    let sample = Sample::new(1, Matrix::from_shape_vec(6, 1, vec![0.5; 6]).unwrap());
    let output = forward_propagate(&sample, &network, Activation::Sigmoid).unwrap();
    assert_eq!(output.shape(), (2, 1));
    assert!(decode(&output).unwrap() < 2);
}

#[test]
fn test_save_and_reload_trained_network() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.bin");

    let options = NetworkOptions::new(DistributionStrategy::HeXavier, 1.0)
        .with_learning_rate(0.5)
        .with_update_rule(UpdateRule::Backpropagation)
        .with_seed(1);
    let mut network = create_network!(options, (2, Input), (3, Hidden), (2, Output)).unwrap();
    let samples = vec![
        Sample::new(0, Matrix::from_shape_vec(2, 1, vec![1.0, 0.0]).unwrap()),
        Sample::new(1, Matrix::from_shape_vec(2, 1, vec![0.0, 1.0]).unwrap()),
    ];
    train(&mut network, Activation::Sigmoid, 10, 2, &samples).unwrap();
    network.save(&path).unwrap();

    let restored = Network::load(&path).unwrap();
    for sample in &samples {
        assert_eq!(
            forward_propagate(sample, &restored, Activation::Sigmoid).unwrap(),
            forward_propagate(sample, &network, Activation::Sigmoid).unwrap()
        );
    }
}
