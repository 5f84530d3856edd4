use serde::{Serialize, Deserialize};
use std::f64::consts::{E, PI};

/// Net inputs beyond this magnitude saturate the sigmoid outright.
const SIGMOID_SATURATION: f64 = 100.0;

/// Scalar activation applied by a processing neuron to its net input.
///
/// Stateless and `Copy`: neurons share a transfer function by value and
/// nothing ever mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum TransferFunction {
    Linear,
    /// 1 for positive input, 0 otherwise.
    #[default]
    Step,
    /// 1 for positive input, -1 otherwise.
    Sgn,
    /// Linear on [0, 1], clamped outside it.
    Ramp,
    Sigmoid,
    Tanh,
    Gaussian { sigma: f64 },
    Sin,
    #[serde(rename = "relu")]
    ReLU,
    #[serde(rename = "leaky_relu")]
    LeakyReLU { alpha: f64 },
    SoftPlus,
    Elu { alpha: f64 },
    Gelu,
    Swish,
}

impl TransferFunction {
    pub fn value(&self, x: f64) -> f64 {
        match self {
            TransferFunction::Linear => x,
            TransferFunction::Step => if x > 0.0 { 1.0 } else { 0.0 },
            TransferFunction::Sgn => if x > 0.0 { 1.0 } else { -1.0 },
            TransferFunction::Ramp => x.clamp(0.0, 1.0),
            TransferFunction::Sigmoid => sigmoid(x),
            TransferFunction::Tanh => x.tanh(),
            TransferFunction::Gaussian { sigma } => (-(x * x) / (2.0 * sigma * sigma)).exp(),
            TransferFunction::Sin => x.sin(),
            TransferFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            TransferFunction::LeakyReLU { alpha } => if x > 0.0 { x } else { alpha * x },
            TransferFunction::SoftPlus => x.max(0.0) + (1.0 + (-x.abs()).exp()).ln(),
            TransferFunction::Elu { alpha } => {
                if x > 0.0 { x } else { alpha * (E.powf(x) - 1.0) }
            }
            TransferFunction::Gelu => {
                let c = (2.0_f64 / PI).sqrt();
                0.5 * x * (1.0 + (c * (x + 0.044715 * x.powi(3))).tanh())
            }
            TransferFunction::Swish => x * sigmoid(x),
        }
    }

    /// Derivative with respect to the net input.
    ///
    /// `Step` and `Sgn` are not differentiable; they report 1.0 so that
    /// delta-rule training passes the output error through unchanged.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            TransferFunction::Linear => 1.0,
            TransferFunction::Step | TransferFunction::Sgn => 1.0,
            TransferFunction::Ramp => if x > 0.0 && x < 1.0 { 1.0 } else { 0.0 },
            TransferFunction::Sigmoid => {
                let fx = sigmoid(x);
                fx * (1.0 - fx)
            }
            TransferFunction::Tanh => {
                let t = x.tanh();
                1.0 - t * t
            }
            TransferFunction::Gaussian { sigma } => -x / (sigma * sigma) * self.value(x),
            TransferFunction::Sin => x.cos(),
            TransferFunction::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
            TransferFunction::LeakyReLU { alpha } => if x > 0.0 { 1.0 } else { *alpha },
            TransferFunction::SoftPlus => sigmoid(x),
            TransferFunction::Elu { alpha } => {
                if x > 0.0 { 1.0 } else { alpha * E.powf(x) }
            }
            TransferFunction::Gelu => {
                let c = (2.0_f64 / PI).sqrt();
                let inner = c * (x + 0.044715 * x.powi(3));
                let tanh_inner = inner.tanh();
                let sech2 = 1.0 - tanh_inner * tanh_inner;
                let d_inner = c * (1.0 + 3.0 * 0.044715 * x.powi(2));
                0.5 * tanh_inner + 0.5 * x * sech2 * d_inner + 0.5
            }
            TransferFunction::Swish => {
                let sig = sigmoid(x);
                sig + x * sig * (1.0 - sig)
            }
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    if x > SIGMOID_SATURATION {
        1.0
    } else if x < -SIGMOID_SATURATION {
        0.0
    } else {
        1.0 / (1.0 + (-x).exp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn numeric_derivative(f: TransferFunction, x: f64) -> f64 {
        let h = 1e-6;
        (f.value(x + h) - f.value(x - h)) / (2.0 * h)
    }

    #[test]
    fn sigmoid_matches_closed_form() {
        for x in [-3.0, -0.5, 0.0, 0.7, 4.2] {
            assert_abs_diff_eq!(TransferFunction::Sigmoid.value(x), 1.0 / (1.0 + E.powf(-x)), epsilon = 1e-12);
        }
        assert_eq!(TransferFunction::Sigmoid.value(0.0), 0.5);
    }

    #[test]
    fn sigmoid_saturates_without_overflow() {
        assert_eq!(TransferFunction::Sigmoid.value(1e6), 1.0);
        assert_eq!(TransferFunction::Sigmoid.value(-1e6), 0.0);
        assert_eq!(TransferFunction::Sigmoid.derivative(-1e6), 0.0);
    }

    #[test]
    fn derivatives_agree_with_finite_differences() {
        let functions = [
            TransferFunction::Linear,
            TransferFunction::Sigmoid,
            TransferFunction::Tanh,
            TransferFunction::Gaussian { sigma: 0.8 },
            TransferFunction::Sin,
            TransferFunction::SoftPlus,
            TransferFunction::Elu { alpha: 1.0 },
            TransferFunction::Gelu,
            TransferFunction::Swish,
        ];
        for f in functions {
            for x in [-1.3, -0.2, 0.4, 1.9] {
                assert_abs_diff_eq!(f.derivative(x), numeric_derivative(f, x), epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn threshold_functions() {
        assert_eq!(TransferFunction::Step.value(1.1), 1.0);
        assert_eq!(TransferFunction::Step.value(0.0), 0.0);
        assert_eq!(TransferFunction::Sgn.value(-0.1), -1.0);
        assert_eq!(TransferFunction::Ramp.value(1.7), 1.0);
        assert_eq!(TransferFunction::Ramp.value(0.25), 0.25);
        assert_eq!(TransferFunction::Ramp.value(-2.0), 0.0);
    }

    #[test]
    fn default_is_step() {
        assert_eq!(TransferFunction::default(), TransferFunction::Step);
    }
}
