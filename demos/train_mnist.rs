//! Train and evaluate a digit classifier on MNIST CSV files.
//!
//! ```text
//! cargo run --release --example train_mnist [run-config.json]
//! ```
//!
//! Without a config file the defaults are used: a 784-30-10 sigmoid network
//! read from `dataset/mnist_train.csv` and `dataset/mnist_test.csv`.
//! Per-epoch losses are logged at `info`; set `RUST_LOG` to change the filter.

use std::env;
use std::time::Instant;

use digitnet::config::RunConfig;
use digitnet::data::read_image_set;
use digitnet::network::Network;
use digitnet::training::{evaluate, prepare_dataset, train};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::default()
        .parse_env(env_logger::Env::default().filter_or("RUST_LOG", "info"))
        .init();

    let config = match env::args().nth(1) {
        Some(path) => RunConfig::from_json_file(path)?,
        None => RunConfig::default(),
    };
    config.validate()?;

    let orientation = config.network.node_orientation;
    let transform = config.transform.transform();

    let mut train_set = read_image_set(&config.train)?;
    let mut test_set = read_image_set(&config.test)?;
    prepare_dataset(&mut train_set, orientation, transform)?;
    prepare_dataset(&mut test_set, orientation, transform)?;

    let mut network = Network::new(config.network.clone(), &config.layers)?;
    println!(
        "Training {:?} for {} epochs (batch size {})",
        network.node_counts(),
        config.epochs,
        config.batch_size
    );

    let start = Instant::now();
    let losses = train(&mut network, config.activation, config.epochs, config.batch_size, &train_set)?;
    println!("Training took {:.2}s", start.elapsed().as_secs_f64());
    if let Some(loss) = losses.last() {
        println!("Final mean SSR loss: {:.4}", loss);
    }

    let accuracy = evaluate(&network, config.activation, &test_set)?;
    println!("Accuracy: {:.2}%", accuracy * 100.0);
    Ok(())
}
