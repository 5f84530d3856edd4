use serde::{Serialize, Deserialize};

use crate::error::{NetworkError, Result};
use crate::graph::NeuronKind;
use crate::network::network::NeuralNetwork;
use crate::network::randomizer::{seeded_rng, WeightsRandomizer};
use crate::transfer::TransferFunction;

/// Describes one processing layer in a network specification.
///
/// Fields:
/// - `size`              — number of processing neurons in this layer
/// - `transfer_function` — activation applied to each neuron's net input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub transfer_function: TransferFunction,
}

/// A serializable description of a fully connected multilayer perceptron.
///
/// The input layer holds `input_size` input neurons; every entry of `layers`
/// adds a processing layer fully connected to the previous one. With
/// `use_bias` each non-output layer also gets one bias neuron, appended
/// after its regular neurons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub input_size: usize,
    /// Ordered processing layers (hidden → output).
    pub layers: Vec<LayerSpec>,
    #[serde(default = "default_use_bias")]
    pub use_bias: bool,
    #[serde(default)]
    pub randomizer: WeightsRandomizer,
}

fn default_use_bias() -> bool {
    true
}

impl NetworkSpec {
    /// `sizes[0]` inputs followed by one layer per remaining size, all using
    /// `transfer_function`.
    pub fn perceptron(transfer_function: TransferFunction, sizes: &[usize]) -> NetworkSpec {
        let (input_size, rest) = sizes.split_first().map_or((0, &[][..]), |(first, rest)| (*first, rest));
        NetworkSpec {
            input_size,
            layers: rest
                .iter()
                .map(|&size| LayerSpec { size, transfer_function })
                .collect(),
            use_bias: true,
            randomizer: WeightsRandomizer::default(),
        }
    }

    pub fn with_bias(mut self, use_bias: bool) -> NetworkSpec {
        self.use_bias = use_bias;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_size == 0 {
            return Err(NetworkError::InvalidConfig("input_size must be > 0".to_owned()));
        }
        if self.layers.is_empty() {
            return Err(NetworkError::InvalidConfig("at least one processing layer is required".to_owned()));
        }
        if let Some(i) = self.layers.iter().position(|l| l.size == 0) {
            return Err(NetworkError::InvalidConfig(format!("layer {} has size 0", i + 1)));
        }
        Ok(())
    }

    /// Builds the network with all weights set to `weight`.
    pub fn build_with_weight(&self, weight: f64) -> Result<NeuralNetwork> {
        self.validate()?;
        let mut network = NeuralNetwork::new();

        let input_layer = network.add_layer();
        for _ in 0..self.input_size {
            network.add_neuron(input_layer, NeuronKind::Input, TransferFunction::Linear)?;
        }
        if self.use_bias {
            network.add_neuron(input_layer, NeuronKind::Bias, TransferFunction::Linear)?;
        }

        for (i, spec) in self.layers.iter().enumerate() {
            let layer = network.add_layer();
            for _ in 0..spec.size {
                network.add_neuron(layer, NeuronKind::Processing, spec.transfer_function)?;
            }
            let is_output = i + 1 == self.layers.len();
            if self.use_bias && !is_output {
                network.add_neuron(layer, NeuronKind::Bias, TransferFunction::Linear)?;
            }
            network.connect_layers(layer - 1, layer, weight)?;
        }
        Ok(network)
    }

    /// Builds the network with weights drawn from `randomizer` using a
    /// thread-local RNG.
    pub fn build(&self) -> Result<NeuralNetwork> {
        let mut network = self.build_with_weight(0.0)?;
        network.randomize_weights(&self.randomizer, &mut rand::thread_rng());
        Ok(network)
    }

    /// Like `build`, but reproducible for a given `seed`.
    pub fn build_with_seed(&self, seed: u64) -> Result<NeuralNetwork> {
        let mut network = self.build_with_weight(0.0)?;
        network.randomize_weights(&self.randomizer, &mut seeded_rng(seed));
        Ok(network)
    }

    pub fn from_json_str(json: &str) -> Result<NetworkSpec> {
        let spec: NetworkSpec = serde_json::from_str(json)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let spec: NetworkSpec = serde_json::from_reader(reader)?;
        spec.validate()?;
        Ok(spec)
    }
}
