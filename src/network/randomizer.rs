use rand::prelude::*;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Distribution used to initialize connection weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum WeightsRandomizer {
    Uniform { min: f64, max: f64 },
    Gaussian { mean: f64, std_dev: f64 },
}

impl Default for WeightsRandomizer {
    fn default() -> Self {
        WeightsRandomizer::Uniform { min: -1.0, max: 1.0 }
    }
}

impl WeightsRandomizer {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            WeightsRandomizer::Uniform { min, max } => min + rng.gen::<f64>() * (max - min),
            WeightsRandomizer::Gaussian { mean, std_dev } => {
                mean + sample_standard_normal(rng) * std_dev
            }
        }
    }
}

/// `StdRng` seeded from `seed`; the same seed always yields the same weights.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Samples a single value from N(0, 1) using the Box-Muller transform.
fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // Both uniforms lie in (0, 1] so ln never sees zero.
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = 1.0 - rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}
