use serde::{Deserialize, Serialize};

use crate::graph::{ConnectionId, Weight};
use crate::network::NeuralNetwork;
use crate::optim::backprop::{accumulate_gradients, calculate_deltas};
use crate::optim::rule::WeightUpdateRule;

/// Step-size parameters for resilient propagation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResilientSettings {
    pub increase_factor: f64,
    pub decrease_factor: f64,
    pub initial_delta: f64,
    pub max_delta: f64,
    pub min_delta: f64,
}

impl Default for ResilientSettings {
    fn default() -> Self {
        ResilientSettings {
            increase_factor: 1.2,
            decrease_factor: 0.5,
            initial_delta: 0.1,
            max_delta: 1.0,
            min_delta: 1e-6,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct StepState {
    previous_gradient: f64,
    step: f64,
}

/// Resilient propagation (iRprop-).
///
/// Only the sign of each connection's epoch gradient is used; every weight
/// keeps its own step size, grown while the sign holds and shrunk when it
/// flips. Needs whole-epoch gradients, so it always runs in batch mode and
/// ignores the learning rate.
#[derive(Debug, Clone)]
pub struct ResilientPropagation {
    settings: ResilientSettings,
    states: Vec<StepState>,
}

impl ResilientPropagation {
    pub fn new(settings: ResilientSettings) -> ResilientPropagation {
        ResilientPropagation { settings, states: Vec::new() }
    }

    fn fresh_state(&self) -> StepState {
        StepState { previous_gradient: 0.0, step: self.settings.initial_delta }
    }
}

impl WeightUpdateRule for ResilientPropagation {
    fn name(&self) -> &'static str {
        "resilient propagation"
    }

    fn on_start(&mut self, connection_capacity: usize) {
        let fresh = self.fresh_state();
        self.states.clear();
        self.states.resize(connection_capacity, fresh);
    }

    fn calculate_weight_changes(&mut self, network: &mut NeuralNetwork, output_error: &[f64], _learning_rate: f64) {
        calculate_deltas(network, output_error);
        accumulate_gradients(network, |_, gradient| gradient);
    }

    fn apply_update(&mut self, id: ConnectionId, weight: &mut Weight, scale: f64) {
        if self.states.len() <= id.0 {
            let fresh = self.fresh_state();
            self.states.resize(id.0 + 1, fresh);
        }
        let s = self.settings;
        let state = &mut self.states[id.0];
        let gradient = weight.take_pending() * scale;
        let product = state.previous_gradient * gradient;

        if product > 0.0 {
            state.step = (state.step * s.increase_factor).min(s.max_delta);
            weight.value += gradient.signum() * state.step;
            state.previous_gradient = gradient;
        } else if product < 0.0 {
            state.step = (state.step * s.decrease_factor).max(s.min_delta);
            state.previous_gradient = 0.0;
        } else {
            if gradient != 0.0 {
                weight.value += gradient.signum() * state.step;
            }
            state.previous_gradient = gradient;
        }
    }

    fn requires_batch(&self) -> bool {
        true
    }
}
