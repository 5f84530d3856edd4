use rand::Rng;

use crate::data::DataSet;
use crate::error::{NetworkError, Result};
use crate::graph::{Connection, ConnectionId, Neuron, NeuronId, NeuronKind};
use crate::layers::Layer;
use crate::network::randomizer::WeightsRandomizer;
use crate::train::{LearningOutcome, SupervisedLearning};
use crate::transfer::TransferFunction;

/// A layered feedforward network stored as two arenas.
///
/// Neurons and connections refer to each other by index, so the graph can be
/// walked forwards (input connections) and backwards (output connections)
/// without shared ownership. Connections only ever run from a lower layer
/// index to a higher one; `connect` rejects anything else, which is what
/// makes a single layer-ordered sweep a valid forward pass.
#[derive(Debug, Default)]
pub struct NeuralNetwork {
    layers: Vec<Layer>,
    neurons: Vec<Neuron>,
    connections: Vec<Option<Connection>>,
    input_neurons: Vec<NeuronId>,
    output_neurons: Vec<NeuronId>,
    explicit_inputs: bool,
    explicit_outputs: bool,
    learning_rule: Option<SupervisedLearning>,
}

impl NeuralNetwork {
    pub fn new() -> NeuralNetwork {
        NeuralNetwork::default()
    }

    // -----------------------------------------------------------------------
    // Topology
    // -----------------------------------------------------------------------

    /// Appends an empty layer and returns its index.
    pub fn add_layer(&mut self) -> usize {
        self.layers.push(Layer::new());
        self.refresh_default_io();
        self.layers.len() - 1
    }

    pub fn add_neuron(
        &mut self,
        layer: usize,
        kind: NeuronKind,
        transfer_function: TransferFunction,
    ) -> Result<NeuronId> {
        let layer_count = self.layers.len();
        let target = self.layers.get_mut(layer).ok_or_else(|| {
            NetworkError::Topology(format!("layer {layer} does not exist ({layer_count} layers)"))
        })?;
        let id = NeuronId(self.neurons.len());
        target.push(id);
        self.neurons.push(Neuron::new(id, layer, kind, transfer_function));
        self.refresh_default_io();
        Ok(id)
    }

    /// Adds a connection `from -> to` and registers it on both endpoints.
    ///
    /// Fails unless both neurons exist, `from` sits in an earlier layer than
    /// `to`, `to` is a processing neuron and no `from -> to` connection exists.
    pub fn connect(&mut self, from: NeuronId, to: NeuronId, weight: f64) -> Result<ConnectionId> {
        let source = self.neuron(from).ok_or(NetworkError::NeuronNotFound(from))?;
        let target = self.neuron(to).ok_or(NetworkError::NeuronNotFound(to))?;
        if from == to {
            return Err(NetworkError::Topology(format!("self connection on {from}")));
        }
        if source.layer() >= target.layer() {
            return Err(NetworkError::Topology(format!(
                "connection {from} (layer {}) -> {to} (layer {}) does not point forward",
                source.layer(),
                target.layer()
            )));
        }
        if target.kind != NeuronKind::Processing {
            return Err(NetworkError::Topology(format!(
                "{to} is a {:?} neuron and cannot receive connections",
                target.kind
            )));
        }
        if self.connection_from(to, from).is_some() {
            return Err(NetworkError::DuplicateConnection { from, to });
        }

        let id = ConnectionId(self.connections.len());
        self.connections.push(Some(Connection::new(from, to, weight)));
        self.neurons[to.0].inputs.push(id);
        self.neurons[from.0].outputs.push(id);
        Ok(id)
    }

    /// Connects every neuron of `from_layer` to every processing neuron of
    /// `to_layer`, in layer order.
    pub fn connect_layers(&mut self, from_layer: usize, to_layer: usize, weight: f64) -> Result<()> {
        let sources = self.layer(from_layer)?.neurons().to_vec();
        let targets = self.layer(to_layer)?.neurons().to_vec();
        for &to in &targets {
            if self.neurons[to.0].kind != NeuronKind::Processing {
                continue;
            }
            for &from in &sources {
                self.connect(from, to, weight)?;
            }
        }
        Ok(())
    }

    /// The input connection of `to` whose source is `from`, if any.
    pub fn connection_from(&self, to: NeuronId, from: NeuronId) -> Option<ConnectionId> {
        self.neuron(to)?
            .input_connections()
            .iter()
            .copied()
            .find(|&c| self.connection(c).is_some_and(|conn| conn.from() == from))
    }

    /// Removes the `from -> to` connection from both endpoints and returns it.
    pub fn remove_connection_from(&mut self, to: NeuronId, from: NeuronId) -> Result<Connection> {
        self.neuron(to).ok_or(NetworkError::NeuronNotFound(to))?;
        self.neuron(from).ok_or(NetworkError::NeuronNotFound(from))?;
        let id = self
            .connection_from(to, from)
            .ok_or(NetworkError::ConnectionNotFound { from, to })?;

        self.neurons[to.0].inputs.retain(|&c| c != id);
        self.neurons[from.0].outputs.retain(|&c| c != id);
        self.connections[id.0]
            .take()
            .ok_or(NetworkError::ConnectionNotFound { from, to })
    }

    /// Overrides which neurons receive `set_input` values, in order.
    pub fn set_input_neurons(&mut self, ids: Vec<NeuronId>) -> Result<()> {
        for &id in &ids {
            let neuron = self.neuron(id).ok_or(NetworkError::NeuronNotFound(id))?;
            if neuron.kind != NeuronKind::Input {
                return Err(NetworkError::Topology(format!("{id} is not an input neuron")));
            }
        }
        self.input_neurons = ids;
        self.explicit_inputs = true;
        Ok(())
    }

    /// Overrides which neurons `output` reads, in order.
    pub fn set_output_neurons(&mut self, ids: Vec<NeuronId>) -> Result<()> {
        for &id in &ids {
            self.neuron(id).ok_or(NetworkError::NeuronNotFound(id))?;
        }
        self.output_neurons = ids;
        self.explicit_outputs = true;
        Ok(())
    }

    /// Without explicit designation the inputs are the first layer's input
    /// neurons and the outputs are the last layer's non-bias neurons.
    fn refresh_default_io(&mut self) {
        if !self.explicit_inputs {
            self.input_neurons = self.layers.first().map_or_else(Vec::new, |layer| {
                layer
                    .neurons()
                    .iter()
                    .copied()
                    .filter(|id| self.neurons[id.0].kind == NeuronKind::Input)
                    .collect()
            });
        }
        if !self.explicit_outputs {
            self.output_neurons = self.layers.last().map_or_else(Vec::new, |layer| {
                layer
                    .neurons()
                    .iter()
                    .copied()
                    .filter(|id| self.neurons[id.0].kind != NeuronKind::Bias)
                    .collect()
            });
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Result<&Layer> {
        self.layers
            .get(index)
            .ok_or_else(|| NetworkError::Topology(format!("layer {index} does not exist")))
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn neuron(&self, id: NeuronId) -> Option<&Neuron> {
        self.neurons.get(id.0)
    }

    pub fn neuron_mut(&mut self, id: NeuronId) -> Option<&mut Neuron> {
        self.neurons.get_mut(id.0)
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(id.0).and_then(Option::as_ref)
    }

    pub fn connection_mut(&mut self, id: ConnectionId) -> Option<&mut Connection> {
        self.connections.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.connections.iter().flatten().count()
    }

    /// Size of the connection arena, removed slots included. Per-connection
    /// state indexed by `ConnectionId` must be at least this long.
    pub fn connection_capacity(&self) -> usize {
        self.connections.len()
    }

    pub fn input_neurons(&self) -> &[NeuronId] {
        &self.input_neurons
    }

    pub fn output_neurons(&self) -> &[NeuronId] {
        &self.output_neurons
    }

    /// Connection ids in (layer, neuron, input connection) order.
    pub fn connection_ids(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.layers
            .iter()
            .flat_map(|layer| layer.neurons().iter())
            .flat_map(|id| self.neurons[id.0].input_connections().iter().copied())
    }

    // -----------------------------------------------------------------------
    // Signal propagation
    // -----------------------------------------------------------------------

    /// Assigns `input` positionally to the input neurons.
    pub fn set_input(&mut self, input: &[f64]) -> Result<()> {
        if input.len() != self.input_neurons.len() {
            return Err(NetworkError::dimension("network input", self.input_neurons.len(), input.len()));
        }
        for (&id, &value) in self.input_neurons.iter().zip(input) {
            self.neurons[id.0].set_input(value);
        }
        Ok(())
    }

    /// Forward pass: every neuron of a layer is calculated before the next
    /// layer starts.
    pub fn calculate(&mut self) {
        for layer in &self.layers {
            for &id in layer.neurons() {
                let combined = combined_input(&self.neurons, &self.connections, id);
                self.neurons[id.0].calculate(combined);
            }
        }
    }

    /// Recalculates one neuron from the current outputs of its sources.
    pub fn calculate_neuron(&mut self, id: NeuronId) -> Result<f64> {
        self.neuron(id).ok_or(NetworkError::NeuronNotFound(id))?;
        let combined = combined_input(&self.neurons, &self.connections, id);
        let neuron = &mut self.neurons[id.0];
        neuron.calculate(combined);
        Ok(neuron.output())
    }

    /// Output neuron outputs, positionally.
    pub fn output(&self) -> Vec<f64> {
        self.output_neurons.iter().map(|id| self.neurons[id.0].output()).collect()
    }

    /// `set_input`, `calculate`, `output` in one call.
    pub fn predict(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        self.set_input(input)?;
        self.calculate();
        Ok(self.output())
    }

    /// Clears every neuron's transient state. Weights are kept.
    pub fn reset(&mut self) {
        for neuron in &mut self.neurons {
            neuron.reset();
        }
    }

    // -----------------------------------------------------------------------
    // Weights
    // -----------------------------------------------------------------------

    /// Weight values in `connection_ids` order.
    pub fn weights(&self) -> Vec<f64> {
        self.connection_ids()
            .filter_map(|id| self.connection(id))
            .map(|c| c.weight.value)
            .collect()
    }

    /// Sets weight values in `connection_ids` order and clears pending changes.
    pub fn set_weights(&mut self, weights: &[f64]) -> Result<()> {
        let ids: Vec<ConnectionId> = self.connection_ids().collect();
        if ids.len() != weights.len() {
            return Err(NetworkError::dimension("weights", ids.len(), weights.len()));
        }
        for (id, &value) in ids.into_iter().zip(weights) {
            if let Some(conn) = self.connection_mut(id) {
                conn.weight.value = value;
                conn.weight.pending_change = 0.0;
            }
        }
        Ok(())
    }

    pub fn randomize_weights<R: Rng + ?Sized>(&mut self, randomizer: &WeightsRandomizer, rng: &mut R) {
        for conn in self.connections.iter_mut().flatten() {
            conn.weight.value = randomizer.sample(rng);
            conn.weight.pending_change = 0.0;
        }
    }

    /// Uniform [-1, 1] weights drawn from a `StdRng` seeded with `seed`.
    pub fn randomize_weights_seeded(&mut self, seed: u64) {
        let mut rng = crate::network::randomizer::seeded_rng(seed);
        self.randomize_weights(&WeightsRandomizer::default(), &mut rng);
    }

    // -----------------------------------------------------------------------
    // Learning
    // -----------------------------------------------------------------------

    /// Attaches `rule`, returning the previously attached rule.
    pub fn set_learning_rule(&mut self, rule: SupervisedLearning) -> Option<SupervisedLearning> {
        self.learning_rule.replace(rule)
    }

    pub fn take_learning_rule(&mut self) -> Option<SupervisedLearning> {
        self.learning_rule.take()
    }

    pub fn learning_rule(&self) -> Option<&SupervisedLearning> {
        self.learning_rule.as_ref()
    }

    pub fn learning_rule_mut(&mut self) -> Option<&mut SupervisedLearning> {
        self.learning_rule.as_mut()
    }

    /// Trains with the attached learning rule.
    ///
    /// The rule is detached for the duration of the run, so nothing else can
    /// drive this network's weights meanwhile.
    pub fn learn(&mut self, training_set: &DataSet) -> Result<LearningOutcome> {
        let mut rule = self.learning_rule.take().ok_or(NetworkError::NoLearningRule)?;
        let outcome = rule.learn(self, training_set);
        self.learning_rule = Some(rule);
        outcome
    }

    // -----------------------------------------------------------------------
    // Crate-internal access for the learning rules
    // -----------------------------------------------------------------------

    pub(crate) fn parts_mut(&mut self) -> GraphParts<'_> {
        GraphParts {
            layers: &self.layers,
            outputs: &self.output_neurons,
            neurons: &mut self.neurons,
            connections: &mut self.connections,
        }
    }
}

/// Disjoint borrows of the arenas, for passes that read one part while
/// writing another.
pub(crate) struct GraphParts<'a> {
    pub layers: &'a [Layer],
    pub outputs: &'a [NeuronId],
    pub neurons: &'a mut [Neuron],
    pub connections: &'a mut [Option<Connection>],
}

fn combined_input(neurons: &[Neuron], connections: &[Option<Connection>], id: NeuronId) -> f64 {
    let neuron = &neurons[id.0];
    if neuron.kind != NeuronKind::Processing {
        return 0.0;
    }
    neuron.input_function.combine(
        neuron
            .input_connections()
            .iter()
            .filter_map(|c| connections[c.0].as_ref())
            .map(|c| c.weighted_input(neurons[c.from().0].output())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Two inputs fully connected to two processing neurons.
    fn two_by_two(transfer: TransferFunction) -> (NeuralNetwork, [NeuronId; 4]) {
        let mut nn = NeuralNetwork::new();
        let l0 = nn.add_layer();
        let l1 = nn.add_layer();
        let i1 = nn.add_neuron(l0, NeuronKind::Input, TransferFunction::Linear).unwrap();
        let i2 = nn.add_neuron(l0, NeuronKind::Input, TransferFunction::Linear).unwrap();
        let n3 = nn.add_neuron(l1, NeuronKind::Processing, transfer).unwrap();
        let n4 = nn.add_neuron(l1, NeuronKind::Processing, transfer).unwrap();
        nn.connect(i1, n3, 0.9).unwrap();
        nn.connect(i1, n4, 0.6).unwrap();
        nn.connect(i2, n3, 0.7).unwrap();
        nn.connect(i2, n4, 0.8).unwrap();
        (nn, [i1, i2, n3, n4])
    }

    #[test]
    fn weighted_sum_through_transfer_function() {
        let (mut nn, [_, _, n3, n4]) = two_by_two(TransferFunction::Sigmoid);
        let out = nn.predict(&[0.6, 0.8]).unwrap();
        let net3 = 0.6 * 0.9 + 0.8 * 0.7;
        let net4 = 0.6 * 0.6 + 0.8 * 0.8;
        assert_relative_eq!(nn.neuron(n3).unwrap().net_input(), net3, epsilon = 1e-12);
        assert_relative_eq!(nn.neuron(n4).unwrap().net_input(), net4, epsilon = 1e-12);
        assert_relative_eq!(out[0], 1.0 / (1.0 + (-net3).exp()), epsilon = 1e-12);
        assert_relative_eq!(out[1], 1.0 / (1.0 + (-net4).exp()), epsilon = 1e-12);
    }

    #[test]
    fn default_step_neuron_fires_on_positive_sum() {
        let (mut nn, _) = two_by_two(TransferFunction::default());
        assert_eq!(nn.predict(&[0.6, 0.8]).unwrap(), vec![1.0, 1.0]);
    }

    #[test]
    fn input_connections_keep_insertion_order() {
        let (nn, [i1, i2, n3, _]) = two_by_two(TransferFunction::Linear);
        let inputs = nn.neuron(n3).unwrap().input_connections();
        assert_eq!(nn.connection(inputs[0]).unwrap().from(), i1);
        assert_eq!(nn.connection(inputs[1]).unwrap().from(), i2);
        assert!(nn.neuron(n3).unwrap().has_input_connections());
        assert!(!nn.neuron(i1).unwrap().has_input_connections());
        assert_eq!(nn.weights(), vec![0.9, 0.7, 0.6, 0.8]);
    }

    #[test]
    fn connection_from_finds_the_source() {
        let (nn, [i1, i2, n3, n4]) = two_by_two(TransferFunction::Linear);
        let c = nn.connection_from(n3, i2).unwrap();
        assert_eq!(nn.connection(c).unwrap().weight.value, 0.7);
        assert_eq!(nn.connection(nn.connection_from(n4, i1).unwrap()).unwrap().weight.value, 0.6);
        assert!(nn.connection_from(i1, n3).is_none());
    }

    #[test]
    fn removing_a_connection_detaches_both_sides() {
        let (mut nn, [i1, i2, n3, _]) = two_by_two(TransferFunction::Linear);
        let removed = nn.remove_connection_from(n3, i1).unwrap();
        assert_eq!(removed.weight.value, 0.9);
        assert!(nn.connection_from(n3, i1).is_none());
        assert!(nn.connection_from(n3, i2).is_some());
        assert_eq!(nn.neuron(i1).unwrap().output_connections().len(), 1);
        assert_eq!(nn.connection_count(), 3);
        assert_eq!(nn.connection_capacity(), 4);

        let out = nn.predict(&[1.0, 1.0]).unwrap();
        assert_relative_eq!(out[0], 0.7);

        assert!(matches!(
            nn.remove_connection_from(n3, i1),
            Err(NetworkError::ConnectionNotFound { .. })
        ));
    }

    #[test]
    fn malformed_connections_are_rejected() {
        let (mut nn, [i1, i2, n3, n4]) = two_by_two(TransferFunction::Linear);
        assert!(matches!(nn.connect(i1, n3, 1.0), Err(NetworkError::DuplicateConnection { .. })));
        assert!(matches!(nn.connect(n3, n4, 1.0), Err(NetworkError::Topology(_))));
        assert!(matches!(nn.connect(n3, i1, 1.0), Err(NetworkError::Topology(_))));
        assert!(matches!(nn.connect(i1, i2, 1.0), Err(NetworkError::Topology(_))));
        assert!(matches!(nn.connect(i1, NeuronId(99), 1.0), Err(NetworkError::NeuronNotFound(_))));
        assert!(nn.add_neuron(7, NeuronKind::Processing, TransferFunction::Linear).is_err());
    }

    #[test]
    fn input_length_must_match() {
        let (mut nn, _) = two_by_two(TransferFunction::Linear);
        assert!(matches!(
            nn.set_input(&[1.0]),
            Err(NetworkError::DimensionMismatch { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn set_weights_round_trip_and_length_check() {
        let (mut nn, _) = two_by_two(TransferFunction::Linear);
        nn.set_weights(&[0.1, 0.2, 0.3, 0.4]).unwrap();
        assert_eq!(nn.weights(), vec![0.1, 0.2, 0.3, 0.4]);
        assert!(nn.set_weights(&[0.1]).is_err());
    }

    #[test]
    fn seeded_randomization_is_reproducible() {
        let (mut a, _) = two_by_two(TransferFunction::Linear);
        let (mut b, _) = two_by_two(TransferFunction::Linear);
        a.randomize_weights_seeded(42);
        b.randomize_weights_seeded(42);
        assert_eq!(a.weights(), b.weights());
        assert!(a.weights().iter().all(|w| (-1.0..=1.0).contains(w)));
    }

    #[test]
    fn reset_clears_outputs_but_keeps_weights() {
        let (mut nn, _) = two_by_two(TransferFunction::Linear);
        nn.predict(&[1.0, 1.0]).unwrap();
        nn.reset();
        assert_eq!(nn.output(), vec![0.0, 0.0]);
        assert_eq!(nn.weights(), vec![0.9, 0.7, 0.6, 0.8]);
    }

    #[test]
    fn explicit_output_designation() {
        let (mut nn, [_, _, n3, n4]) = two_by_two(TransferFunction::Linear);
        nn.set_output_neurons(vec![n4]).unwrap();
        assert_eq!(nn.output_neurons(), &[n4]);
        assert!(nn.set_input_neurons(vec![n3]).is_err());
        nn.add_layer();
        assert_eq!(nn.output_neurons(), &[n4]);
    }

    #[test]
    fn learn_without_rule_fails() {
        let (mut nn, _) = two_by_two(TransferFunction::Linear);
        let data = DataSet::new(2, 2);
        assert!(matches!(nn.learn(&data), Err(NetworkError::NoLearningRule)));
    }
}
