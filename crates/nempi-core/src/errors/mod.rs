//! Error handling for nempi.
//! One error enum per subsystem, `thiserror` only, aggregated by [`NempiError`].

pub mod classifier_error;
pub mod config_error;
pub mod evaluation_error;
pub mod inference_error;
pub mod network_error;

pub use classifier_error::ClassifierError;
pub use config_error::ConfigError;
pub use evaluation_error::EvaluationError;
pub use inference_error::InferenceError;
pub use network_error::NetworkError;

/// Top-level error for every public entry point.
#[derive(Debug, thiserror::Error)]
pub enum NempiError {
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("inference error: {0}")]
    Inference(#[from] InferenceError),

    #[error("classifier failure ({backend}): {source}")]
    ClassifierFailure {
        backend: String,
        #[source]
        source: ClassifierError,
    },

    #[error("evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl NempiError {
    /// Wrap a backend error as the single opaque classifier failure.
    pub fn classifier(backend: impl Into<String>, source: ClassifierError) -> Self {
        Self::ClassifierFailure {
            backend: backend.into(),
            source,
        }
    }
}

/// Convenience alias used across the workspace.
pub type NempiResult<T> = Result<T, NempiError>;
