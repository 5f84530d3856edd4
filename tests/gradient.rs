use approx::assert_abs_diff_eq;

use axon_nn::optim::{BackPropagation, WeightUpdateRule};
use axon_nn::{DataSet, LearningConfig, NetworkSpec, NeuralNetwork, SupervisedLearning, TransferFunction};

const EPS: f64 = 1e-5;

/// Single-pattern MSE as reported by the error function: `Σ(d - y)² / 2`.
fn pattern_error(network: &mut NeuralNetwork, weights: &[f64], input: &[f64], desired: &[f64]) -> f64 {
    network.set_weights(weights).unwrap();
    let output = network.predict(input).unwrap();
    output.iter().zip(desired).map(|(y, d)| (d - y) * (d - y)).sum::<f64>() / 2.0
}

/// Pending changes after one backpropagation pass, in `weights()` order.
fn pending_changes(network: &mut NeuralNetwork, input: &[f64], desired: &[f64], learning_rate: f64) -> Vec<f64> {
    let output = network.predict(input).unwrap();
    let error: Vec<f64> = output.iter().zip(desired).map(|(y, d)| d - y).collect();
    BackPropagation::new().calculate_weight_changes(network, &error, learning_rate);
    network
        .connection_ids()
        .map(|id| network.connection(id).unwrap().weight.pending_change)
        .collect()
}

fn check_gradient(spec: NetworkSpec, seed: u64, input: &[f64], desired: &[f64]) {
    let learning_rate = 0.3;
    let mut network = spec.build_with_seed(seed).unwrap();
    let weights = network.weights();
    let pending = pending_changes(&mut network, input, desired, learning_rate);
    assert_eq!(pending.len(), weights.len());

    for k in 0..weights.len() {
        let mut lower = weights.clone();
        lower[k] -= EPS;
        let mut upper = weights.clone();
        upper[k] += EPS;
        let numeric = (pattern_error(&mut network, &lower, input, desired)
            - pattern_error(&mut network, &upper, input, desired))
            / (2.0 * EPS);
        assert_abs_diff_eq!(pending[k] / learning_rate, numeric, epsilon = 1e-7);
    }
}

#[test]
fn sigmoid_backprop_matches_finite_differences() {
    let spec = NetworkSpec::perceptron(TransferFunction::Sigmoid, &[2, 3, 1]);
    check_gradient(spec, 3, &[0.3, 0.9], &[0.2]);
}

#[test]
fn tanh_backprop_matches_finite_differences() {
    let spec = NetworkSpec::perceptron(TransferFunction::Tanh, &[3, 4, 2, 2]);
    check_gradient(spec, 21, &[-0.5, 0.1, 0.8], &[0.7, -0.4]);
}

#[test]
fn one_batch_epoch_applies_the_pending_change() {
    let spec = NetworkSpec::perceptron(TransferFunction::Sigmoid, &[2, 3, 1]);
    let input = [0.6, -0.2];
    let desired = [0.9];

    let mut reference = spec.build_with_seed(13).unwrap();
    let before = reference.weights();
    let expected_error = pattern_error(&mut reference, &before, &input, &desired);
    let pending = pending_changes(&mut reference, &input, &desired, 0.4);

    let mut network = spec.build_with_seed(13).unwrap();
    let data = DataSet::from_rows(&[input.to_vec()], &[desired.to_vec()]).unwrap();
    let config = LearningConfig::new(0.4, 0.0).with_max_iterations(1).with_batch_mode(true);
    network.set_learning_rule(SupervisedLearning::new(config).unwrap());
    let outcome = network.learn(&data).unwrap();

    assert_abs_diff_eq!(outcome.total_error, expected_error, epsilon = 1e-15);
    for ((after, before), change) in network.weights().iter().zip(&before).zip(&pending) {
        assert_abs_diff_eq!(after - before, *change, epsilon = 1e-12);
    }
}
