pub mod network;
pub mod randomizer;
pub mod spec;

pub use network::NeuralNetwork;
pub use randomizer::WeightsRandomizer;
pub use spec::{LayerSpec, NetworkSpec};
