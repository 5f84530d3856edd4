pub mod connection;
pub mod neuron;
pub mod weight;

pub use connection::{Connection, ConnectionId};
pub use neuron::{Neuron, NeuronId, NeuronKind};
pub use weight::Weight;
