use std::fmt::Debug;

use crate::graph::{ConnectionId, Weight};
use crate::network::NeuralNetwork;

/// Gradient and update math for one supervised learning strategy.
///
/// The training loop owns epoch and pattern iteration; a rule only turns an
/// output error into pending weight changes and later folds those pending
/// changes into the weights.
pub trait WeightUpdateRule: Debug {
    fn name(&self) -> &'static str;

    /// Called once before the first epoch. `connection_capacity` bounds every
    /// `ConnectionId` the rule will see.
    fn on_start(&mut self, _connection_capacity: usize) {}

    /// Computes neuron deltas for the pattern just propagated and accumulates
    /// each connection's change into its weight's `pending_change`.
    fn calculate_weight_changes(&mut self, network: &mut NeuralNetwork, output_error: &[f64], learning_rate: f64);

    /// Folds the pending change into `weight` and zeroes it. `scale` is 1 in
    /// online mode and `1 / training set size` in batch mode.
    fn apply_update(&mut self, id: ConnectionId, weight: &mut Weight, scale: f64) {
        let _ = id;
        weight.apply_pending(scale);
    }

    /// Rules that only work on whole-epoch gradients force batch mode.
    fn requires_batch(&self) -> bool {
        false
    }
}

/// Applies every connection's pending change exactly once, walking layers
/// from output towards input.
pub fn apply_weight_changes(network: &mut NeuralNetwork, rule: &mut dyn WeightUpdateRule, scale: f64) {
    let parts = network.parts_mut();
    for layer in parts.layers.iter().skip(1).rev() {
        for id in layer.neurons() {
            for &cid in parts.neurons[id.0].input_connections() {
                if let Some(conn) = parts.connections[cid.0].as_mut() {
                    rule.apply_update(cid, &mut conn.weight, scale);
                }
            }
        }
    }
}
