use crate::graph::{ConnectionId, Weight};
use crate::network::NeuralNetwork;
use crate::optim::backprop::{accumulate_gradients, calculate_deltas};
use crate::optim::rule::WeightUpdateRule;

/// Backpropagation with momentum:
/// `pending += learning_rate · δ · o + momentum · previous applied change`.
#[derive(Debug, Clone)]
pub struct MomentumBackpropagation {
    momentum: f64,
    previous_change: Vec<f64>,
}

impl MomentumBackpropagation {
    pub fn new(momentum: f64) -> MomentumBackpropagation {
        MomentumBackpropagation { momentum, previous_change: Vec::new() }
    }

    pub fn momentum(&self) -> f64 {
        self.momentum
    }
}

impl WeightUpdateRule for MomentumBackpropagation {
    fn name(&self) -> &'static str {
        "momentum backpropagation"
    }

    fn on_start(&mut self, connection_capacity: usize) {
        self.previous_change.clear();
        self.previous_change.resize(connection_capacity, 0.0);
    }

    fn calculate_weight_changes(&mut self, network: &mut NeuralNetwork, output_error: &[f64], learning_rate: f64) {
        if self.previous_change.len() < network.connection_capacity() {
            self.previous_change.resize(network.connection_capacity(), 0.0);
        }
        calculate_deltas(network, output_error);
        let momentum = self.momentum;
        let previous = &self.previous_change;
        accumulate_gradients(network, |cid, gradient| {
            learning_rate * gradient + momentum * previous[cid.0]
        });
    }

    fn apply_update(&mut self, id: ConnectionId, weight: &mut Weight, scale: f64) {
        let applied = weight.apply_pending(scale);
        if let Some(previous) = self.previous_change.get_mut(id.0) {
            *previous = applied;
        }
    }
}
