use std::fmt;

use serde::{Deserialize, Serialize};

use crate::graph::connection::ConnectionId;
use crate::transfer::{InputFunction, TransferFunction};

/// Index of a neuron in the network's neuron arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NeuronId(pub usize);

impl fmt::Display for NeuronId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// How a neuron obtains its net input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeuronKind {
    /// Entry point: the externally set input passes straight through.
    Input,
    /// Constant output of 1.0; never receives connections.
    Bias,
    /// Combines its input connections and applies the transfer function.
    Processing,
}

#[derive(Debug, Clone)]
pub struct Neuron {
    id: NeuronId,
    layer: usize,
    pub kind: NeuronKind,
    pub(crate) inputs: Vec<ConnectionId>,
    pub(crate) outputs: Vec<ConnectionId>,
    input: f64,
    net_input: f64,
    output: f64,
    pub delta: f64,
    pub transfer_function: TransferFunction,
    pub input_function: InputFunction,
}

impl Neuron {
    pub(crate) fn new(id: NeuronId, layer: usize, kind: NeuronKind, transfer_function: TransferFunction) -> Neuron {
        let mut neuron = Neuron {
            id,
            layer,
            kind,
            inputs: Vec::new(),
            outputs: Vec::new(),
            input: 0.0,
            net_input: 0.0,
            output: 0.0,
            delta: 0.0,
            transfer_function,
            input_function: InputFunction::default(),
        };
        neuron.reset();
        neuron
    }

    pub fn id(&self) -> NeuronId {
        self.id
    }

    /// Index of the layer this neuron belongs to.
    pub fn layer(&self) -> usize {
        self.layer
    }

    pub fn input_connections(&self) -> &[ConnectionId] {
        &self.inputs
    }

    pub fn output_connections(&self) -> &[ConnectionId] {
        &self.outputs
    }

    pub fn has_input_connections(&self) -> bool {
        !self.inputs.is_empty()
    }

    pub fn net_input(&self) -> f64 {
        self.net_input
    }

    pub fn output(&self) -> f64 {
        self.output
    }

    /// Sets the external input read by `Input` neurons on the next calculation.
    pub fn set_input(&mut self, input: f64) {
        self.input = input;
    }

    /// Overrides the output directly, e.g. to drive a neuron in isolation.
    pub fn set_output(&mut self, output: f64) {
        self.output = output;
    }

    /// Updates `net_input` and `output`.
    ///
    /// `combined_input` is the input function applied over the weighted
    /// input connections; only `Processing` neurons use it.
    pub fn calculate(&mut self, combined_input: f64) {
        match self.kind {
            NeuronKind::Input => {
                self.net_input = self.input;
                self.output = self.input;
            }
            NeuronKind::Bias => {
                self.net_input = 1.0;
                self.output = 1.0;
            }
            NeuronKind::Processing => {
                self.net_input = combined_input;
                self.output = self.transfer_function.value(combined_input);
            }
        }
    }

    /// Clears transient state; topology and weights are untouched.
    pub fn reset(&mut self) {
        self.input = 0.0;
        self.net_input = 0.0;
        self.delta = 0.0;
        self.output = if self.kind == NeuronKind::Bias { 1.0 } else { 0.0 };
    }
}
