pub mod backprop;
pub mod momentum;
pub mod rprop;
pub mod rule;
pub mod rule_type;

pub use backprop::BackPropagation;
pub use momentum::MomentumBackpropagation;
pub use rprop::{ResilientPropagation, ResilientSettings};
pub use rule::{apply_weight_changes, WeightUpdateRule};
pub use rule_type::UpdateRuleType;
