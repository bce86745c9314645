//! Configuration system for nempi.
//! TOML-based, resolution: environment (`NEMPI_*`) > file > compiled defaults.

pub mod classifier_config;
pub mod defaults;
pub mod inference_config;
pub mod noise_config;
pub mod observability_config;
pub mod search_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use classifier_config::{ClassifierBackend, ClassifierConfig};
pub use inference_config::{InferenceConfig, InitialNetwork, PriorBlend, UnlabeledInit};
pub use noise_config::NoiseModel;
pub use observability_config::ObservabilityConfig;
pub use search_config::SearchConfig;

use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NempiConfig {
    pub inference: InferenceConfig,
    pub noise: NoiseModel,
    pub search: SearchConfig,
    pub classifier: ClassifierConfig,
    pub observability: ObservabilityConfig,
}

impl NempiConfig {
    /// Load configuration from a TOML file, then apply `NEMPI_*` environment
    /// overrides and validate the result.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let mut config: NempiConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::apply_env_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string. Missing keys take their defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: NempiConfig = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let inference = &self.inference;
        if inference.max_iterations == 0 {
            return Err(invalid("inference.max_iterations", "must be at least 1"));
        }
        if !(inference.convergence_tolerance > 0.0) {
            return Err(invalid("inference.convergence_tolerance", "must be positive"));
        }
        if !(0.0..=1.0).contains(&inference.random_edge_probability) {
            return Err(invalid(
                "inference.random_edge_probability",
                "must be between 0.0 and 1.0",
            ));
        }
        if inference.label_delimiter.is_empty() {
            return Err(invalid("inference.label_delimiter", "must not be empty"));
        }

        let noise = &self.noise;
        if !(noise.sd > 0.0) || !noise.sd.is_finite() {
            return Err(invalid("noise.sd", "must be positive and finite"));
        }
        if !(noise.effect_mean > noise.no_effect_mean) {
            return Err(invalid(
                "noise.effect_mean",
                "must be greater than noise.no_effect_mean",
            ));
        }

        if self.search.min_improvement < 0.0 {
            return Err(invalid("search.min_improvement", "must not be negative"));
        }

        let classifier = &self.classifier;
        if classifier.k == 0 {
            return Err(invalid("classifier.k", "must be at least 1"));
        }
        if classifier.epochs == 0 {
            return Err(invalid("classifier.epochs", "must be at least 1"));
        }
        if !(classifier.learning_rate > 0.0) {
            return Err(invalid("classifier.learning_rate", "must be positive"));
        }
        if classifier.l2 < 0.0 {
            return Err(invalid("classifier.l2", "must not be negative"));
        }
        Ok(())
    }

    /// Apply `NEMPI_*` environment variable overrides. Unparseable values are ignored.
    pub fn apply_env_overrides(config: &mut NempiConfig) {
        if let Ok(val) = std::env::var("NEMPI_MAX_ITERATIONS") {
            if let Ok(v) = val.parse::<usize>() {
                config.inference.max_iterations = v;
            }
        }
        if let Ok(val) = std::env::var("NEMPI_CONVERGENCE_TOLERANCE") {
            if let Ok(v) = val.parse::<f64>() {
                config.inference.convergence_tolerance = v;
            }
        }
        if let Ok(val) = std::env::var("NEMPI_SEED") {
            if let Ok(v) = val.parse::<u64>() {
                config.inference.seed = v;
            }
        }
        if let Ok(val) = std::env::var("NEMPI_LOG_LEVEL") {
            config.observability.log_level = val;
        }
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}
