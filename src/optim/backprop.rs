use crate::graph::{Connection, ConnectionId, Neuron, NeuronId, NeuronKind};
use crate::network::NeuralNetwork;
use crate::optim::rule::WeightUpdateRule;

/// Plain error backpropagation: `pending += learning_rate · δ(to) · output(from)`.
#[derive(Debug, Clone, Default)]
pub struct BackPropagation;

impl BackPropagation {
    pub fn new() -> BackPropagation {
        BackPropagation
    }
}

impl WeightUpdateRule for BackPropagation {
    fn name(&self) -> &'static str {
        "backpropagation"
    }

    fn calculate_weight_changes(&mut self, network: &mut NeuralNetwork, output_error: &[f64], learning_rate: f64) {
        calculate_deltas(network, output_error);
        accumulate_gradients(network, |_, gradient| learning_rate * gradient);
    }
}

/// Output deltas first, then hidden layers from the output side inwards.
pub fn calculate_deltas(network: &mut NeuralNetwork, output_error: &[f64]) {
    calculate_output_deltas(network, output_error);
    calculate_hidden_deltas(network);
}

/// `δ = error[i] · f'(net)` for each output neuron.
pub fn calculate_output_deltas(network: &mut NeuralNetwork, output_error: &[f64]) {
    let parts = network.parts_mut();
    for (&id, &error) in parts.outputs.iter().zip(output_error) {
        let neuron = &mut parts.neurons[id.0];
        neuron.delta = error * neuron.transfer_function.derivative(neuron.net_input());
    }
}

/// `δ = f'(net) · Σ w · δ(downstream)` for every processing neuron of the
/// hidden layers, visiting layers in reverse so downstream deltas are final.
pub fn calculate_hidden_deltas(network: &mut NeuralNetwork) {
    let parts = network.parts_mut();
    let hidden = parts.layers.len().saturating_sub(1);
    for layer in parts.layers.iter().take(hidden).skip(1).rev() {
        for &id in layer.neurons() {
            if parts.neurons[id.0].kind != NeuronKind::Processing || parts.outputs.contains(&id) {
                continue;
            }
            let delta = hidden_delta(parts.neurons, parts.connections, id);
            parts.neurons[id.0].delta = delta;
        }
    }
}

/// A neuron without output connections gets 0.
fn hidden_delta(neurons: &[Neuron], connections: &[Option<Connection>], id: NeuronId) -> f64 {
    let neuron = &neurons[id.0];
    let weighted: f64 = neuron
        .output_connections()
        .iter()
        .filter_map(|c| connections[c.0].as_ref())
        .map(|c| c.weight.value * neurons[c.to().0].delta)
        .sum();
    neuron.transfer_function.derivative(neuron.net_input()) * weighted
}

/// Visits every input connection of every processing neuron (output layer
/// first) and adds `change(id, δ(to) · output(from))` to its pending change.
pub fn accumulate_gradients<F>(network: &mut NeuralNetwork, mut change: F)
where
    F: FnMut(ConnectionId, f64) -> f64,
{
    let parts = network.parts_mut();
    let neurons: &[Neuron] = parts.neurons;
    for layer in parts.layers.iter().skip(1).rev() {
        for &id in layer.neurons() {
            let neuron = &neurons[id.0];
            if neuron.kind != NeuronKind::Processing {
                continue;
            }
            for &cid in neuron.input_connections() {
                if let Some(conn) = parts.connections[cid.0].as_mut() {
                    let gradient = neuron.delta * neurons[conn.from().0].output();
                    conn.weight.accumulate(change(cid, gradient));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NeuronKind;
    use crate::transfer::TransferFunction;
    use approx::assert_relative_eq;

    /// input -> hidden (linear) -> output (linear), weights 3 and 2.
    fn chain() -> (NeuralNetwork, NeuronId, NeuronId, NeuronId) {
        let mut nn = NeuralNetwork::new();
        let l0 = nn.add_layer();
        let l1 = nn.add_layer();
        let l2 = nn.add_layer();
        let i = nn.add_neuron(l0, NeuronKind::Input, TransferFunction::Linear).unwrap();
        let h = nn.add_neuron(l1, NeuronKind::Processing, TransferFunction::Linear).unwrap();
        let o = nn.add_neuron(l2, NeuronKind::Processing, TransferFunction::Linear).unwrap();
        nn.connect(i, h, 3.0).unwrap();
        nn.connect(h, o, 2.0).unwrap();
        (nn, i, h, o)
    }

    #[test]
    fn output_delta_is_error_times_derivative() {
        let (mut nn, _, _, o) = chain();
        calculate_output_deltas(&mut nn, &[0.0]);
        assert_eq!(nn.neuron(o).unwrap().delta, 0.0);
        calculate_output_deltas(&mut nn, &[0.5]);
        assert_eq!(nn.neuron(o).unwrap().delta, 0.5);
    }

    #[test]
    fn hidden_delta_uses_downstream_weights() {
        let (mut nn, _, h, o) = chain();
        nn.neuron_mut(o).unwrap().delta = 0.5;
        calculate_hidden_deltas(&mut nn);
        let expected = 0.5 * 2.0 * TransferFunction::Linear.derivative(0.0);
        assert_eq!(nn.neuron(h).unwrap().delta, expected);
    }

    #[test]
    fn backprop_accumulates_learning_rate_delta_output() {
        let (mut nn, _, _, _) = chain();
        nn.predict(&[1.0]).unwrap();
        // output = 6, target 7 -> error 1
        let mut rule = BackPropagation::new();
        rule.calculate_weight_changes(&mut nn, &[1.0], 0.1);
        let pending: Vec<f64> = nn
            .connection_ids()
            .map(|c| nn.connection(c).unwrap().weight.pending_change)
            .collect();
        // hidden delta = 1 * 2 = 2; w(i->h) change = 0.1 * 2 * 1; w(h->o) change = 0.1 * 1 * 3
        assert_relative_eq!(pending[0], 0.2, epsilon = 1e-12);
        assert_relative_eq!(pending[1], 0.3, epsilon = 1e-12);
        // weights are not touched until the update is applied
        assert_eq!(nn.weights(), vec![3.0, 2.0]);
    }

    #[test]
    fn sigmoid_output_delta() {
        let mut nn = crate::network::NetworkSpec::perceptron(TransferFunction::Sigmoid, &[1, 1])
            .with_bias(false)
            .build_with_weight(0.0)
            .unwrap();
        nn.predict(&[1.0]).unwrap();
        calculate_output_deltas(&mut nn, &[1.0]);
        let out = nn.output_neurons()[0];
        assert_relative_eq!(nn.neuron(out).unwrap().delta, 0.25);
    }
}
