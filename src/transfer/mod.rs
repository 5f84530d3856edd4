pub mod input_function;
pub mod transfer_function;

pub use input_function::InputFunction;
pub use transfer_function::TransferFunction;
