use crate::loss::error_function::ErrorFunction;

/// Mean squared error: `Σ(d - y)² / (2 · patterns)`.
///
/// The factor ½ makes `learning_rate · δ · o` exactly the negative gradient
/// of the reported total for a single pattern.
#[derive(Debug, Clone, Default)]
pub struct MeanSquaredError {
    total_error: f64,
    pattern_count: usize,
}

impl MeanSquaredError {
    pub fn new() -> MeanSquaredError {
        MeanSquaredError::default()
    }
}

impl ErrorFunction for MeanSquaredError {
    fn add_pattern_error(&mut self, actual: &[f64], desired: &[f64]) -> Vec<f64> {
        let pattern_error: Vec<f64> = actual.iter().zip(desired).map(|(y, d)| d - y).collect();
        self.total_error += pattern_error.iter().map(|e| e * e).sum::<f64>();
        self.pattern_count += 1;
        pattern_error
    }

    fn total_error(&self) -> f64 {
        if self.pattern_count == 0 {
            return 0.0;
        }
        self.total_error / (2.0 * self.pattern_count as f64)
    }

    fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    fn reset(&mut self) {
        self.total_error = 0.0;
        self.pattern_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn returns_desired_minus_actual() {
        let mut mse = MeanSquaredError::new();
        assert_eq!(mse.add_pattern_error(&[0.25, 1.0], &[1.0, 0.5]), vec![0.75, -0.5]);
    }

    #[test]
    fn averages_over_patterns() {
        let mut mse = MeanSquaredError::new();
        mse.add_pattern_error(&[0.0], &[1.0]);
        mse.add_pattern_error(&[0.5], &[0.0]);
        assert_eq!(mse.pattern_count(), 2);
        assert_relative_eq!(mse.total_error(), (1.0 + 0.25) / 4.0);
    }

    #[test]
    fn accumulation_never_decreases_and_reset_zeroes() {
        let mut mse = MeanSquaredError::new();
        let patterns = [([0.1], [0.9]), ([0.7], [0.7]), ([0.4], [0.0]), ([1.0], [0.2])];
        let mut previous = 0.0;
        for (actual, desired) in patterns {
            mse.add_pattern_error(&actual, &desired);
            let raw = mse.total_error() * 2.0 * mse.pattern_count() as f64;
            assert!(raw >= previous);
            previous = raw;
        }
        mse.reset();
        assert_eq!(mse.total_error(), 0.0);
        assert_eq!(mse.pattern_count(), 0);
    }
}
