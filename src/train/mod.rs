pub mod epoch_stats;
pub mod loop_fn;
pub mod stop_condition;
pub mod train_config;
pub mod trainer;

pub use epoch_stats::LearningEvent;
pub use loop_fn::{IterativeLearning, LearningEpoch, LearningOutcome, LearningState, ListenerId, StopHandle};
pub use stop_condition::{EpochProgress, StopCondition, StopReason};
pub use train_config::LearningConfig;
pub use trainer::{SupervisedLearning, SupervisedTrainer};
