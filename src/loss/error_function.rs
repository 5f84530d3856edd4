use std::fmt::Debug;

/// Accumulates per-pattern errors over one epoch.
///
/// `add_pattern_error` returns the error signal handed to the gradient rule;
/// its sign convention is `desired - actual`, so a positive component means
/// the output should grow.
pub trait ErrorFunction: Debug {
    fn add_pattern_error(&mut self, actual: &[f64], desired: &[f64]) -> Vec<f64>;

    /// Accumulated error, normalized as the kind requires. 0 before any pattern.
    fn total_error(&self) -> f64;

    fn pattern_count(&self) -> usize;

    /// Zeroes the accumulator and pattern count.
    fn reset(&mut self);
}
