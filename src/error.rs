//! Error types for the network engine.

use thiserror::Error;

use crate::graph::NeuronId;

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// A vector did not match the size the network expects.
    #[error("{what}: expected {expected} values, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Invalid learning or network configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Neuron {0} does not belong to this network")]
    NeuronNotFound(NeuronId),

    #[error("Neuron {to} has no input connection from {from}")]
    ConnectionNotFound { from: NeuronId, to: NeuronId },

    #[error("Neuron {to} already has an input connection from {from}")]
    DuplicateConnection { from: NeuronId, to: NeuronId },

    /// Malformed topology: backward or intra-layer edge, self loop, empty network.
    #[error("Invalid topology: {0}")]
    Topology(String),

    #[error("Training set is empty")]
    EmptyDataSet,

    #[error("No learning rule attached to the network")]
    NoLearningRule,

    /// Total error became NaN or infinite.
    #[error("Training diverged at iteration {iteration}: total error is not finite")]
    TrainingDiverged { iteration: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NetworkError {
    pub(crate) fn dimension(what: &'static str, expected: usize, actual: usize) -> Self {
        NetworkError::DimensionMismatch { what, expected, actual }
    }
}
