use crate::loss::error_function::ErrorFunction;

/// Sum squared error: `½ Σ(d - y)²` over all patterns, not averaged.
#[derive(Debug, Clone, Default)]
pub struct SumSquaredError {
    total_error: f64,
    pattern_count: usize,
}

impl SumSquaredError {
    pub fn new() -> SumSquaredError {
        SumSquaredError::default()
    }
}

impl ErrorFunction for SumSquaredError {
    fn add_pattern_error(&mut self, actual: &[f64], desired: &[f64]) -> Vec<f64> {
        let pattern_error: Vec<f64> = actual.iter().zip(desired).map(|(y, d)| d - y).collect();
        self.total_error += 0.5 * pattern_error.iter().map(|e| e * e).sum::<f64>();
        self.pattern_count += 1;
        pattern_error
    }

    fn total_error(&self) -> f64 {
        self.total_error
    }

    fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    fn reset(&mut self) {
        self.total_error = 0.0;
        self.pattern_count = 0;
    }
}
