use serde::{Deserialize, Serialize};

use super::defaults;

/// Two-component Gaussian emission model shared by attachment scoring and
/// reassignment: effect entries ~ N(effect_mean, sd²), the rest ~ N(no_effect_mean, sd²).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseModel {
    pub effect_mean: f64,
    pub no_effect_mean: f64,
    pub sd: f64,
}

impl NoiseModel {
    /// Log density of `x` under the effect component.
    pub fn log_effect(&self, x: f64) -> f64 {
        self.log_normal(x, self.effect_mean)
    }

    /// Log density of `x` under the no-effect component.
    pub fn log_no_effect(&self, x: f64) -> f64 {
        self.log_normal(x, self.no_effect_mean)
    }

    fn log_normal(&self, x: f64, mean: f64) -> f64 {
        let var = self.sd * self.sd;
        let z = x - mean;
        -0.5 * (2.0 * std::f64::consts::PI * var).ln() - z * z / (2.0 * var)
    }
}

impl Default for NoiseModel {
    fn default() -> Self {
        Self {
            effect_mean: defaults::DEFAULT_EFFECT_MEAN,
            no_effect_mean: defaults::DEFAULT_NO_EFFECT_MEAN,
            sd: defaults::DEFAULT_NOISE_SD,
        }
    }
}
