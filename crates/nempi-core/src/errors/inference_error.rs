use serde::{Deserialize, Serialize};

/// Inference errors. `DimensionMismatch`, `EmptyVocabulary` and `InvalidPrior`
/// are fatal; `DegenerateLikelihood` and `NonConvergence` are collected as
/// diagnostics on a successful result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum InferenceError {
    #[error("dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        context: String,
        expected: String,
        found: String,
    },

    #[error("no p-genes: labels are empty and no prior was supplied")]
    EmptyVocabulary,

    #[error("invalid prior for sample {sample}: {reason}")]
    InvalidPrior { sample: String, reason: String },

    #[error("degenerate likelihood for sample {sample}, using uniform distribution")]
    DegenerateLikelihood { sample: String },

    #[error("no convergence after {cycles} cycles (last delta {last_delta:.3e})")]
    NonConvergence { cycles: usize, last_delta: f64 },
}

impl InferenceError {
    /// Shorthand for a dimension mismatch.
    pub fn mismatch(
        context: impl Into<String>,
        expected: impl ToString,
        found: impl ToString,
    ) -> Self {
        Self::DimensionMismatch {
            context: context.into(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Whether this error is a diagnostic rather than a failure.
    pub fn is_diagnostic(&self) -> bool {
        matches!(
            self,
            Self::DegenerateLikelihood { .. } | Self::NonConvergence { .. }
        )
    }
}
