use serde::{Deserialize, Serialize};

use super::defaults;

/// Concrete classifier family used by the classifier assignment path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierBackend {
    #[default]
    NearestCentroid,
    Logistic,
    KNearest,
}

impl ClassifierBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NearestCentroid => "nearest_centroid",
            Self::Logistic => "logistic",
            Self::KNearest => "k_nearest",
        }
    }
}

/// Classifier assignment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub backend: ClassifierBackend,
    /// Neighbours for `k_nearest`.
    pub k: usize,
    /// Gradient step for `logistic`.
    pub learning_rate: f64,
    /// Full-batch passes for `logistic`.
    pub epochs: usize,
    /// L2 penalty for `logistic`.
    pub l2: f64,
    /// Propagate the assignment through a supplied network.
    pub propagate: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            backend: ClassifierBackend::default(),
            k: defaults::DEFAULT_KNN_K,
            learning_rate: defaults::DEFAULT_LEARNING_RATE,
            epochs: defaults::DEFAULT_EPOCHS,
            l2: defaults::DEFAULT_L2_PENALTY,
            propagate: defaults::DEFAULT_PROPAGATE,
        }
    }
}
