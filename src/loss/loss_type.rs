use serde::{Serialize, Deserialize};

use crate::loss::{ErrorFunction, MeanAbsoluteError, MeanSquaredError, SumSquaredError};

/// Selects which error function a learning rule accumulates.
///
/// - `Mse` — mean squared error (halved); pair with Sigmoid, Tanh or Linear output.
/// - `Mae` — mean absolute error; trains on the sign of the error only.
/// - `Sse` — sum squared error; the total grows with the training set size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorFunctionType {
    #[default]
    Mse,
    Mae,
    Sse,
}

impl ErrorFunctionType {
    pub fn build(self) -> Box<dyn ErrorFunction> {
        match self {
            ErrorFunctionType::Mse => Box::new(MeanSquaredError::new()),
            ErrorFunctionType::Mae => Box::new(MeanAbsoluteError::new()),
            ErrorFunctionType::Sse => Box::new(SumSquaredError::new()),
        }
    }
}
