//! A layered feedforward neural network engine.
//!
//! Networks are graphs of neurons arranged in layers and joined by weighted
//! connections that always point to a later layer. Supervised learning rules
//! (plain backpropagation, momentum, resilient propagation) train them over a
//! `DataSet` until a stop condition holds.

pub mod data;
pub mod error;
pub mod graph;
pub mod layers;
pub mod loss;
pub mod network;
pub mod optim;
pub mod train;
pub mod transfer;

// Convenience re-exports
pub use data::{DataSet, DataSetRow};
pub use error::{NetworkError, Result};
pub use graph::{Connection, ConnectionId, Neuron, NeuronId, NeuronKind, Weight};
pub use layers::Layer;
pub use loss::{ErrorFunction, ErrorFunctionType};
pub use network::{LayerSpec, NetworkSpec, NeuralNetwork, WeightsRandomizer};
pub use optim::{ResilientSettings, UpdateRuleType, WeightUpdateRule};
pub use train::{
    LearningConfig, LearningEvent, LearningOutcome, LearningState, StopCondition, StopHandle, StopReason,
    SupervisedLearning,
};
pub use transfer::{InputFunction, TransferFunction};
