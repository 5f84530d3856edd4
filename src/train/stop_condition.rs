use serde::{Deserialize, Serialize};

/// Snapshot of training progress handed to the stop conditions after each epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochProgress {
    /// Number of completed epochs (1-based after the first epoch).
    pub iteration: usize,
    pub total_error: f64,
    /// Consecutive epochs whose error changed by no more than the configured
    /// minimum.
    pub small_change_count: usize,
}

/// Why a training run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    MaxIterations,
    MaxError,
    SmallErrorChange,
    Cancelled,
}

/// Predicate evaluated after every epoch; the first one that holds ends training.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopCondition {
    /// Stop once this many epochs have completed.
    MaxIterations(usize),
    /// Stop once the total error is at or below the threshold.
    MaxError(f64),
    /// Stop after `iterations_limit` consecutive small error changes.
    SmallErrorChange { iterations_limit: usize },
}

impl StopCondition {
    pub fn check(&self, progress: &EpochProgress) -> Option<StopReason> {
        let reached = match *self {
            StopCondition::MaxIterations(max) => progress.iteration >= max,
            StopCondition::MaxError(max) => progress.total_error <= max,
            StopCondition::SmallErrorChange { iterations_limit } => {
                progress.small_change_count >= iterations_limit
            }
        };
        reached.then_some(self.reason())
    }

    pub fn reason(&self) -> StopReason {
        match self {
            StopCondition::MaxIterations(_) => StopReason::MaxIterations,
            StopCondition::MaxError(_) => StopReason::MaxError,
            StopCondition::SmallErrorChange { .. } => StopReason::SmallErrorChange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(iteration: usize, total_error: f64, small_change_count: usize) -> EpochProgress {
        EpochProgress { iteration, total_error, small_change_count }
    }

    #[test]
    fn max_iterations_is_inclusive() {
        let c = StopCondition::MaxIterations(3);
        assert_eq!(c.check(&progress(2, 1.0, 0)), None);
        assert_eq!(c.check(&progress(3, 1.0, 0)), Some(StopReason::MaxIterations));
    }

    #[test]
    fn max_error_holds_at_equality() {
        let c = StopCondition::MaxError(0.25);
        assert_eq!(c.check(&progress(1, 0.25, 0)), Some(StopReason::MaxError));
        assert_eq!(c.check(&progress(1, 0.2500001, 0)), None);
        assert_eq!(c.check(&progress(1, f64::NAN, 0)), None);
    }

    #[test]
    fn small_error_change_counts_consecutive_epochs() {
        let c = StopCondition::SmallErrorChange { iterations_limit: 5 };
        assert_eq!(c.check(&progress(9, 0.3, 4)), None);
        assert_eq!(c.check(&progress(10, 0.3, 5)), Some(StopReason::SmallErrorChange));
    }
}
