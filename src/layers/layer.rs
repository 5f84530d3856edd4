use crate::graph::NeuronId;

/// One processing stage: an ordered list of neurons owned by the network's
/// arena.
///
/// Neuron order inside a layer is the order neurons are calculated and the
/// order their weights appear in `NeuralNetwork::weights()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layer {
    neurons: Vec<NeuronId>,
}

impl Layer {
    pub fn new() -> Layer {
        Layer { neurons: Vec::new() }
    }

    pub fn neurons(&self) -> &[NeuronId] {
        &self.neurons
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    pub fn contains(&self, id: NeuronId) -> bool {
        self.neurons.contains(&id)
    }

    pub(crate) fn push(&mut self, id: NeuronId) {
        self.neurons.push(id);
    }
}
