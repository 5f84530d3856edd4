use serde::{Deserialize, Serialize};

/// Combines a neuron's weighted inputs (`weight * source_output`) into its
/// net input.
///
/// The gradient rules assume `WeightedSum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFunction {
    #[default]
    WeightedSum,
    /// Sum of squared weighted inputs.
    SumSqr,
    Max,
    Min,
}

impl InputFunction {
    /// An empty input set combines to 0.
    pub fn combine<I>(&self, weighted_inputs: I) -> f64
    where
        I: IntoIterator<Item = f64>,
    {
        let mut iter = weighted_inputs.into_iter();
        match self {
            InputFunction::WeightedSum => iter.sum(),
            InputFunction::SumSqr => iter.map(|x| x * x).sum(),
            InputFunction::Max => iter.next().map_or(0.0, |first| iter.fold(first, f64::max)),
            InputFunction::Min => iter.next().map_or(0.0, |first| iter.fold(first, f64::min)),
        }
    }
}
