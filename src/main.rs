// Trains the XOR network and logs the result.
//
// Usage:
//   axon-nn [learning-config.json]
//
// Log verbosity follows RUST_LOG (default "info"); use RUST_LOG=debug to see
// every epoch.
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use axon_nn::{DataSet, LearningConfig, NetworkSpec, SupervisedLearning, TransferFunction};

const SEED: u64 = 42;

fn xor_data() -> axon_nn::Result<DataSet> {
    DataSet::from_rows(
        &[vec![0.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]],
        &[vec![0.0], vec![1.0], vec![1.0], vec![0.0]],
    )
}

fn run(config_path: Option<&str>) -> axon_nn::Result<()> {
    let config = match config_path {
        Some(path) => LearningConfig::load_json(path)?,
        None => LearningConfig::new(0.5, 0.01).with_max_iterations(100_000),
    };
    info!(?config, "learning configuration");

    let data = xor_data()?;
    let mut network = NetworkSpec::perceptron(TransferFunction::Sigmoid, &[2, 3, 1]).build_with_seed(SEED)?;
    network.set_learning_rule(SupervisedLearning::new(config)?);
    let outcome = network.learn(&data)?;
    info!(
        state = ?outcome.state,
        iterations = outcome.iterations,
        total_error = outcome.total_error,
        "xor training complete"
    );

    for row in data.rows() {
        let output = network.predict(&row.input)?;
        info!(input = ?row.input, desired = ?row.desired_output, output = ?output, "prediction");
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::args().nth(1);
    match run(config_path.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "training failed");
            ExitCode::FAILURE
        }
    }
}
