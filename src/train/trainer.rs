use std::sync::mpsc;

use tracing::{debug, warn};

use crate::data::{DataSet, DataSetRow};
use crate::error::{NetworkError, Result};
use crate::loss::ErrorFunction;
use crate::network::NeuralNetwork;
use crate::optim::{apply_weight_changes, WeightUpdateRule};
use crate::train::epoch_stats::LearningEvent;
use crate::train::loop_fn::{
    IterativeLearning, LearningEpoch, LearningOutcome, LearningState, ListenerId, StopHandle,
};
use crate::train::stop_condition::StopCondition;
use crate::train::train_config::LearningConfig;

/// Per-pattern supervised training: forward pass, error accumulation,
/// gradient rule, and online or batch weight application.
#[derive(Debug)]
pub struct SupervisedTrainer {
    learning_rate: f64,
    batch_mode: bool,
    min_error_change: f64,
    error_function: Box<dyn ErrorFunction>,
    rule: Box<dyn WeightUpdateRule>,
    previous_epoch_error: f64,
    small_change_count: usize,
}

impl SupervisedTrainer {
    fn from_config(config: &LearningConfig) -> SupervisedTrainer {
        let rule = config.update_rule.build();
        let batch_mode = config.batch_mode || rule.requires_batch();
        if batch_mode && !config.batch_mode {
            warn!(rule = rule.name(), "update rule requires batch mode; enabling it");
        }
        SupervisedTrainer {
            learning_rate: config.learning_rate,
            batch_mode,
            min_error_change: config.min_error_change.unwrap_or(f64::INFINITY),
            error_function: config.error_function.build(),
            rule,
            previous_epoch_error: 0.0,
            small_change_count: 0,
        }
    }

    fn learn_pattern(&mut self, network: &mut NeuralNetwork, row: &DataSetRow) -> Result<()> {
        network.set_input(&row.input)?;
        network.calculate();
        let output = network.output();
        let pattern_error = self.error_function.add_pattern_error(&output, &row.desired_output);
        self.rule.calculate_weight_changes(network, &pattern_error, self.learning_rate);
        if !self.batch_mode {
            apply_weight_changes(network, self.rule.as_mut(), 1.0);
        }
        Ok(())
    }
}

impl LearningEpoch for SupervisedTrainer {
    fn on_start(&mut self, network: &mut NeuralNetwork, training_set: &DataSet) -> Result<()> {
        if training_set.is_empty() {
            return Err(NetworkError::EmptyDataSet);
        }
        let inputs = network.input_neurons().len();
        let outputs = network.output_neurons().len();
        if training_set.input_size() != inputs {
            return Err(NetworkError::dimension("training set input", inputs, training_set.input_size()));
        }
        if training_set.output_size() != outputs {
            return Err(NetworkError::dimension("training set output", outputs, training_set.output_size()));
        }
        if outputs == 0 {
            return Err(NetworkError::Topology("network has no output neurons".to_owned()));
        }

        self.previous_epoch_error = 0.0;
        self.small_change_count = 0;
        self.error_function.reset();
        self.rule.on_start(network.connection_capacity());
        debug!(rule = self.rule.name(), batch_mode = self.batch_mode, "supervised learning configured");
        Ok(())
    }

    fn before_epoch(&mut self) {
        self.previous_epoch_error = self.error_function.total_error();
        self.error_function.reset();
    }

    fn do_learning_epoch(
        &mut self,
        network: &mut NeuralNetwork,
        training_set: &DataSet,
        stop: &StopHandle,
    ) -> Result<()> {
        for row in training_set.rows() {
            if stop.is_stopped() {
                break;
            }
            self.learn_pattern(network, row)?;
        }
        Ok(())
    }

    fn after_epoch(&mut self, network: &mut NeuralNetwork, training_set: &DataSet) {
        let change = (self.previous_epoch_error - self.error_function.total_error()).abs();
        if change <= self.min_error_change {
            self.small_change_count += 1;
        } else {
            self.small_change_count = 0;
        }

        if self.batch_mode {
            // Divides by the full set size even when the epoch was cut short.
            let scale = 1.0 / training_set.len() as f64;
            apply_weight_changes(network, self.rule.as_mut(), scale);
        }
    }

    fn total_error(&self) -> f64 {
        self.error_function.total_error()
    }

    fn small_change_count(&self) -> usize {
        self.small_change_count
    }
}

/// A supervised learning rule: the epoch loop plus the per-pattern trainer
/// built from a `LearningConfig`.
///
/// Attach it to a network with `NeuralNetwork::set_learning_rule` and call
/// `NeuralNetwork::learn`, or drive it directly with `learn`.
#[derive(Debug)]
pub struct SupervisedLearning {
    config: LearningConfig,
    driver: IterativeLearning,
    trainer: SupervisedTrainer,
}

impl SupervisedLearning {
    /// Validates `config` and builds the rule it describes.
    pub fn new(config: LearningConfig) -> Result<SupervisedLearning> {
        config.validate()?;
        Ok(SupervisedLearning {
            driver: IterativeLearning::new(config.stop_conditions()),
            trainer: SupervisedTrainer::from_config(&config),
            config,
        })
    }

    /// Runs training until a stop condition holds.
    pub fn learn(&mut self, network: &mut NeuralNetwork, training_set: &DataSet) -> Result<LearningOutcome> {
        self.driver.learn(&mut self.trainer, network, training_set)
    }

    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    pub fn state(&self) -> LearningState {
        self.driver.state()
    }

    pub fn current_iteration(&self) -> usize {
        self.driver.current_iteration()
    }

    /// Total error of the last completed epoch.
    pub fn total_network_error(&self) -> f64 {
        self.trainer.total_error()
    }

    pub fn previous_epoch_error(&self) -> f64 {
        self.trainer.previous_epoch_error
    }

    pub fn small_change_count(&self) -> usize {
        self.trainer.small_change_count
    }

    /// Whether updates are applied once per epoch. Rules that need whole-epoch
    /// gradients turn this on regardless of the config.
    pub fn is_batch_mode(&self) -> bool {
        self.trainer.batch_mode
    }

    pub fn set_error_function(&mut self, error_function: Box<dyn ErrorFunction>) {
        self.trainer.error_function = error_function;
    }

    /// Adds a condition on top of the ones derived from the config.
    pub fn add_stop_condition(&mut self, condition: StopCondition) {
        self.driver.add_stop_condition(condition);
    }

    pub fn stop_conditions(&self) -> &[StopCondition] {
        self.driver.stop_conditions()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.driver.stop_handle()
    }

    pub fn stop(&self) {
        self.driver.stop();
    }

    pub fn add_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&LearningEvent) + 'static,
    {
        self.driver.add_listener(listener)
    }

    pub fn add_channel_listener(&mut self, tx: mpsc::Sender<LearningEvent>) -> ListenerId {
        self.driver.add_channel_listener(tx)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.driver.remove_listener(id)
    }
}
