use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::data::DataSet;
use crate::error::{NetworkError, Result};
use crate::network::NeuralNetwork;
use crate::train::epoch_stats::LearningEvent;
use crate::train::stop_condition::{EpochProgress, StopCondition, StopReason};

/// Lifecycle of a training run: `Ready -> Running -> (Stopped | Converged)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningState {
    Ready,
    Running,
    Stopped,
    /// Ended because the total error reached the configured maximum.
    Converged,
}

/// Result of a finished training run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearningOutcome {
    pub state: LearningState,
    pub iterations: usize,
    pub total_error: f64,
    pub reason: StopReason,
}

/// Cooperative cancellation flag shared with whoever may want to stop a run.
///
/// Checked at the start of every training pattern and after every epoch.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

type Listener = Box<dyn FnMut(&LearningEvent)>;

/// One epoch of some learning algorithm, as driven by `IterativeLearning`.
pub trait LearningEpoch {
    /// Validates the run and resets per-run state. An error here leaves the
    /// driver in `Ready`.
    fn on_start(&mut self, network: &mut NeuralNetwork, training_set: &DataSet) -> Result<()>;

    fn before_epoch(&mut self) {}

    fn do_learning_epoch(
        &mut self,
        network: &mut NeuralNetwork,
        training_set: &DataSet,
        stop: &StopHandle,
    ) -> Result<()>;

    fn after_epoch(&mut self, _network: &mut NeuralNetwork, _training_set: &DataSet) {}

    fn total_error(&self) -> f64;

    fn small_change_count(&self) -> usize {
        0
    }
}

/// Epoch-driven training loop: runs epochs until a stop condition holds or
/// the run is cancelled, notifying listeners after every epoch.
pub struct IterativeLearning {
    state: LearningState,
    current_iteration: usize,
    stop_conditions: Vec<StopCondition>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: usize,
    stop_handle: StopHandle,
}

impl fmt::Debug for IterativeLearning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterativeLearning")
            .field("state", &self.state)
            .field("current_iteration", &self.current_iteration)
            .field("stop_conditions", &self.stop_conditions)
            .field("listeners", &self.listeners.len())
            .field("stopped", &self.stop_handle.is_stopped())
            .finish()
    }
}

impl IterativeLearning {
    pub fn new(stop_conditions: Vec<StopCondition>) -> IterativeLearning {
        IterativeLearning {
            state: LearningState::Ready,
            current_iteration: 0,
            stop_conditions,
            listeners: Vec::new(),
            next_listener: 0,
            stop_handle: StopHandle::default(),
        }
    }

    pub fn state(&self) -> LearningState {
        self.state
    }

    pub fn current_iteration(&self) -> usize {
        self.current_iteration
    }

    pub fn stop_conditions(&self) -> &[StopCondition] {
        &self.stop_conditions
    }

    pub fn add_stop_condition(&mut self, condition: StopCondition) {
        self.stop_conditions.push(condition);
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop_handle.clone()
    }

    /// Requests cancellation; the run ends before its next pattern.
    pub fn stop(&self) {
        self.stop_handle.stop();
    }

    pub fn add_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&LearningEvent) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Forwards every event to `tx`. Dropping the receiver cancels the run.
    pub fn add_channel_listener(&mut self, tx: mpsc::Sender<LearningEvent>) -> ListenerId {
        let handle = self.stop_handle.clone();
        self.add_listener(move |event| {
            if tx.send(*event).is_err() {
                handle.stop();
            }
        })
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Runs `epoch` until a stop condition holds or the run is cancelled.
    ///
    /// A non-finite total error ends the run with `TrainingDiverged`; weight
    /// changes applied up to that point are kept. A run cancelled mid-epoch
    /// keeps the changes that epoch already applied, but the outcome reports
    /// only completed epochs and the error of the last one.
    pub fn learn<E>(
        &mut self,
        epoch: &mut E,
        network: &mut NeuralNetwork,
        training_set: &DataSet,
    ) -> Result<LearningOutcome>
    where
        E: LearningEpoch + ?Sized,
    {
        epoch.on_start(network, training_set)?;
        self.current_iteration = 0;
        self.stop_handle.clear();
        self.state = LearningState::Running;

        let started = Instant::now();
        info!(
            patterns = training_set.len(),
            conditions = ?self.stop_conditions,
            "training started"
        );

        let mut last_error = epoch.total_error();
        let reason = loop {
            if self.stop_handle.is_stopped() {
                break StopReason::Cancelled;
            }

            epoch.before_epoch();
            epoch.do_learning_epoch(network, training_set, &self.stop_handle)?;
            epoch.after_epoch(network, training_set);
            if self.stop_handle.is_stopped() {
                // Cut short: the partial error is neither counted nor checked.
                debug!(iteration = self.current_iteration + 1, "epoch cancelled");
                break StopReason::Cancelled;
            }
            self.current_iteration += 1;

            let total_error = epoch.total_error();
            debug!(iteration = self.current_iteration, total_error, "epoch finished");

            if !total_error.is_finite() {
                self.state = LearningState::Stopped;
                warn!(iteration = self.current_iteration, total_error, "training diverged");
                return Err(NetworkError::TrainingDiverged { iteration: self.current_iteration });
            }
            last_error = total_error;

            let progress = EpochProgress {
                iteration: self.current_iteration,
                total_error,
                small_change_count: epoch.small_change_count(),
            };
            let reached = self.stop_conditions.iter().find_map(|c| c.check(&progress));

            let event = LearningEvent { iteration: self.current_iteration, total_error };
            for (_, listener) in &mut self.listeners {
                listener(&event);
            }

            if let Some(reason) = reached {
                break reason;
            }
        };

        self.state = if reason == StopReason::MaxError {
            LearningState::Converged
        } else {
            LearningState::Stopped
        };
        let outcome = LearningOutcome {
            state: self.state,
            iterations: self.current_iteration,
            total_error: last_error,
            reason,
        };
        info!(
            iterations = outcome.iterations,
            total_error = outcome.total_error,
            reason = ?outcome.reason,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "training finished"
        );
        Ok(outcome)
    }
}
