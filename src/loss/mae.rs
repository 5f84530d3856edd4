use crate::loss::error_function::ErrorFunction;

/// Mean absolute error: `Σ|d - y| / patterns`.
///
/// The returned signal is the subgradient `sign(d - y)` (0 when equal).
#[derive(Debug, Clone, Default)]
pub struct MeanAbsoluteError {
    total_error: f64,
    pattern_count: usize,
}

impl MeanAbsoluteError {
    pub fn new() -> MeanAbsoluteError {
        MeanAbsoluteError::default()
    }
}

impl ErrorFunction for MeanAbsoluteError {
    fn add_pattern_error(&mut self, actual: &[f64], desired: &[f64]) -> Vec<f64> {
        let mut signal = Vec::with_capacity(actual.len());
        for (y, d) in actual.iter().zip(desired) {
            let diff = d - y;
            self.total_error += diff.abs();
            signal.push(if diff > 0.0 { 1.0 } else if diff < 0.0 { -1.0 } else { 0.0 });
        }
        self.pattern_count += 1;
        signal
    }

    fn total_error(&self) -> f64 {
        if self.pattern_count == 0 {
            return 0.0;
        }
        self.total_error / self.pattern_count as f64
    }

    fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    fn reset(&mut self) {
        self.total_error = 0.0;
        self.pattern_count = 0;
    }
}
