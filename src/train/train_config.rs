use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};
use crate::loss::ErrorFunctionType;
use crate::optim::UpdateRuleType;
use crate::train::stop_condition::StopCondition;

/// Configuration for a supervised learning run.
///
/// # Fields
/// - `learning_rate`   — step size; must be finite and > 0
/// - `max_error`       — training stops once the total error is at or below it
/// - `max_iterations`  — optional epoch cap
/// - `min_error_change` / `min_error_change_iterations_limit`
///                     — plateau detection: stop after `limit` consecutive
///                       epochs whose error changed by at most `min_error_change`.
///                       Both must be set together.
/// - `batch_mode`      — accumulate changes over the epoch and apply their
///                       average once, instead of applying after every pattern
/// - `error_function`  — how pattern errors are accumulated
/// - `update_rule`     — gradient strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    pub learning_rate: f64,
    pub max_error: f64,
    pub max_iterations: Option<usize>,
    pub min_error_change: Option<f64>,
    pub min_error_change_iterations_limit: Option<usize>,
    pub batch_mode: bool,
    pub error_function: ErrorFunctionType,
    pub update_rule: UpdateRuleType,
}

impl Default for LearningConfig {
    fn default() -> Self {
        LearningConfig {
            learning_rate: 0.1,
            max_error: 0.01,
            max_iterations: None,
            min_error_change: None,
            min_error_change_iterations_limit: None,
            batch_mode: false,
            error_function: ErrorFunctionType::Mse,
            update_rule: UpdateRuleType::BackPropagation,
        }
    }
}

impl LearningConfig {
    pub fn new(learning_rate: f64, max_error: f64) -> Self {
        LearningConfig { learning_rate, max_error, ..LearningConfig::default() }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    pub fn with_min_error_change(mut self, min_error_change: f64, iterations_limit: usize) -> Self {
        self.min_error_change = Some(min_error_change);
        self.min_error_change_iterations_limit = Some(iterations_limit);
        self
    }

    pub fn with_batch_mode(mut self, batch_mode: bool) -> Self {
        self.batch_mode = batch_mode;
        self
    }

    pub fn with_error_function(mut self, error_function: ErrorFunctionType) -> Self {
        self.error_function = error_function;
        self
    }

    pub fn with_update_rule(mut self, update_rule: UpdateRuleType) -> Self {
        self.update_rule = update_rule;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(NetworkError::InvalidConfig(format!(
                "learning_rate must be finite and > 0, got {}",
                self.learning_rate
            )));
        }
        if !(self.max_error >= 0.0) {
            return Err(NetworkError::InvalidConfig(format!(
                "max_error must be >= 0, got {}",
                self.max_error
            )));
        }
        if self.max_iterations == Some(0) {
            return Err(NetworkError::InvalidConfig("max_iterations must be > 0".to_owned()));
        }
        match (self.min_error_change, self.min_error_change_iterations_limit) {
            (None, None) => {}
            (Some(change), Some(limit)) => {
                if !(change >= 0.0) {
                    return Err(NetworkError::InvalidConfig(format!(
                        "min_error_change must be >= 0, got {change}"
                    )));
                }
                if limit == 0 {
                    return Err(NetworkError::InvalidConfig(
                        "min_error_change_iterations_limit must be > 0".to_owned(),
                    ));
                }
            }
            _ => {
                return Err(NetworkError::InvalidConfig(
                    "min_error_change and min_error_change_iterations_limit must be set together".to_owned(),
                ))
            }
        }
        self.update_rule.validate()
    }

    /// Stop conditions in evaluation order. `MaxError` is always present.
    pub fn stop_conditions(&self) -> Vec<StopCondition> {
        let mut conditions = vec![StopCondition::MaxError(self.max_error)];
        if let Some(max) = self.max_iterations {
            conditions.push(StopCondition::MaxIterations(max));
        }
        if let Some(limit) = self.min_error_change_iterations_limit {
            conditions.push(StopCondition::SmallErrorChange { iterations_limit: limit });
        }
        conditions
    }

    pub fn from_json_str(json: &str) -> Result<LearningConfig> {
        let config: LearningConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Deserializes and validates a `LearningConfig` from a JSON file.
    pub fn load_json(path: &str) -> Result<LearningConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: LearningConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = LearningConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.stop_conditions(), vec![StopCondition::MaxError(0.01)]);
    }

    #[test]
    fn rejects_bad_learning_rate() {
        for lr in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                LearningConfig::new(lr, 0.01).validate(),
                Err(NetworkError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn rejects_unreachable_thresholds() {
        assert!(LearningConfig::new(0.1, -0.5).validate().is_err());
        assert!(LearningConfig::new(0.1, f64::NAN).validate().is_err());
        assert!(LearningConfig::default().with_max_iterations(0).validate().is_err());
        assert!(LearningConfig::default().with_min_error_change(0.001, 0).validate().is_err());
        assert!(LearningConfig::default().with_min_error_change(-1.0, 3).validate().is_err());

        let half = LearningConfig { min_error_change: Some(0.001), ..LearningConfig::default() };
        assert!(half.validate().is_err());
    }

    #[test]
    fn stop_conditions_follow_config() {
        let config = LearningConfig::new(0.5, 0.02)
            .with_max_iterations(100)
            .with_min_error_change(1e-6, 10);
        assert_eq!(
            config.stop_conditions(),
            vec![
                StopCondition::MaxError(0.02),
                StopCondition::MaxIterations(100),
                StopCondition::SmallErrorChange { iterations_limit: 10 },
            ]
        );
    }

    #[test]
    fn parses_json_with_defaults() {
        let config = LearningConfig::from_json_str(
            r#"{
                "learning_rate": 0.5,
                "max_iterations": 2000,
                "batch_mode": true,
                "error_function": "mae",
                "update_rule": { "type": "momentum", "momentum": 0.7 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.learning_rate, 0.5);
        assert_eq!(config.max_error, 0.01);
        assert_eq!(config.max_iterations, Some(2000));
        assert!(config.batch_mode);
        assert_eq!(config.error_function, ErrorFunctionType::Mae);
        assert_eq!(config.update_rule, UpdateRuleType::Momentum { momentum: 0.7 });

        assert!(LearningConfig::from_json_str(r#"{ "learning_rate": -1 }"#).is_err());
        assert!(matches!(LearningConfig::from_json_str("{"), Err(NetworkError::Json(_))));
    }
}
