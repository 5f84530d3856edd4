use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};
use crate::optim::{BackPropagation, MomentumBackpropagation, ResilientPropagation, ResilientSettings, WeightUpdateRule};

/// Selects the weight update strategy a supervised learning run uses.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum UpdateRuleType {
    #[default]
    BackPropagation,
    Momentum { momentum: f64 },
    Resilient(ResilientSettings),
}

impl UpdateRuleType {
    pub fn validate(&self) -> Result<()> {
        match *self {
            UpdateRuleType::BackPropagation => Ok(()),
            UpdateRuleType::Momentum { momentum } => {
                if (0.0..1.0).contains(&momentum) {
                    Ok(())
                } else {
                    Err(NetworkError::InvalidConfig(format!("momentum must be in [0, 1), got {momentum}")))
                }
            }
            UpdateRuleType::Resilient(s) => {
                if !(s.increase_factor > 1.0 && s.increase_factor.is_finite()) {
                    return Err(NetworkError::InvalidConfig("rprop increase_factor must be > 1".to_owned()));
                }
                if !(s.decrease_factor > 0.0 && s.decrease_factor < 1.0) {
                    return Err(NetworkError::InvalidConfig("rprop decrease_factor must be in (0, 1)".to_owned()));
                }
                if !(s.min_delta > 0.0 && s.min_delta <= s.initial_delta && s.initial_delta <= s.max_delta) {
                    return Err(NetworkError::InvalidConfig(
                        "rprop deltas must satisfy 0 < min_delta <= initial_delta <= max_delta".to_owned(),
                    ));
                }
                if !s.max_delta.is_finite() {
                    return Err(NetworkError::InvalidConfig("rprop max_delta must be finite".to_owned()));
                }
                Ok(())
            }
        }
    }

    pub fn build(self) -> Box<dyn WeightUpdateRule> {
        match self {
            UpdateRuleType::BackPropagation => Box::new(BackPropagation::new()),
            UpdateRuleType::Momentum { momentum } => Box::new(MomentumBackpropagation::new(momentum)),
            UpdateRuleType::Resilient(settings) => Box::new(ResilientPropagation::new(settings)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_bounds() {
        assert!(UpdateRuleType::Momentum { momentum: 0.7 }.validate().is_ok());
        assert!(UpdateRuleType::Momentum { momentum: 1.0 }.validate().is_err());
        assert!(UpdateRuleType::Momentum { momentum: f64::NAN }.validate().is_err());
        assert!(UpdateRuleType::Resilient(ResilientSettings::default()).validate().is_ok());
        let bad = ResilientSettings { decrease_factor: 1.5, ..ResilientSettings::default() };
        assert!(UpdateRuleType::Resilient(bad).validate().is_err());
    }

    #[test]
    fn deserializes_tagged_variants() {
        let rule: UpdateRuleType = serde_json::from_str(r#"{ "type": "momentum", "momentum": 0.9 }"#).unwrap();
        assert_eq!(rule, UpdateRuleType::Momentum { momentum: 0.9 });
        let rule: UpdateRuleType = serde_json::from_str(r#"{ "type": "resilient", "max_delta": 2.0 }"#).unwrap();
        assert_eq!(
            rule,
            UpdateRuleType::Resilient(ResilientSettings { max_delta: 2.0, ..ResilientSettings::default() })
        );
        assert_eq!(rule.build().name(), "resilient propagation");
    }
}
