use serde::{Deserialize, Serialize};

/// A trainable scalar plus the change accumulated for it but not yet applied.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Weight {
    pub value: f64,
    pub pending_change: f64,
}

impl Weight {
    pub fn new(value: f64) -> Weight {
        Weight { value, pending_change: 0.0 }
    }

    /// Adds `change` to the pending accumulator.
    pub fn accumulate(&mut self, change: f64) {
        self.pending_change += change;
    }

    /// Adds `pending_change * scale` to the value, zeroes the accumulator and
    /// returns the change actually applied.
    pub fn apply_pending(&mut self, scale: f64) -> f64 {
        let applied = self.pending_change * scale;
        self.value += applied;
        self.pending_change = 0.0;
        applied
    }

    /// Takes the pending change, leaving zero behind.
    pub fn take_pending(&mut self) -> f64 {
        std::mem::take(&mut self.pending_change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_pending_scales_and_clears() {
        let mut w = Weight::new(0.5);
        w.accumulate(0.2);
        w.accumulate(0.2);
        let applied = w.apply_pending(0.5);
        assert!((applied - 0.2).abs() < 1e-12);
        assert!((w.value - 0.7).abs() < 1e-12);
        assert_eq!(w.pending_change, 0.0);
    }

    #[test]
    fn take_pending_leaves_value_untouched() {
        let mut w = Weight::new(1.0);
        w.accumulate(-0.3);
        assert_eq!(w.take_pending(), -0.3);
        assert_eq!(w.pending_change, 0.0);
        assert_eq!(w.value, 1.0);
    }
}
