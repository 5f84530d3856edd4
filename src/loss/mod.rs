pub mod error_function;
pub mod loss_type;
pub mod mae;
pub mod mse;
pub mod sse;

pub use error_function::ErrorFunction;
pub use loss_type::ErrorFunctionType;
pub use mae::MeanAbsoluteError;
pub use mse::MeanSquaredError;
pub use sse::SumSquaredError;
