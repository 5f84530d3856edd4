use std::fmt;

use serde::{Deserialize, Serialize};

use crate::graph::{neuron::NeuronId, weight::Weight};

/// Index of a connection in the network's connection arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(pub usize);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Directed edge `from -> to` owning one weight.
///
/// Endpoints never change after the connection is created; only
/// `weight` mutates during training.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    from: NeuronId,
    to: NeuronId,
    pub weight: Weight,
}

impl Connection {
    pub fn new(from: NeuronId, to: NeuronId, weight: f64) -> Connection {
        Connection { from, to, weight: Weight::new(weight) }
    }

    pub fn from(&self) -> NeuronId {
        self.from
    }

    pub fn to(&self) -> NeuronId {
        self.to
    }

    /// `weight * source_output`.
    pub fn weighted_input(&self, source_output: f64) -> f64 {
        self.weight.value * source_output
    }
}
