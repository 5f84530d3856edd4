use serde::{Serialize, Deserialize};

/// Notification emitted once per completed epoch.
///
/// Listeners registered on a learning rule receive one `LearningEvent` at
/// the end of every epoch, synchronously, before the next epoch starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearningEvent {
    /// 1-based epoch number.
    pub iteration: usize,
    /// Total network error reported by the error function for this epoch.
    pub total_error: f64,
}
