/// Errors raised by classifier backends.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("no labeled samples to train on")]
    EmptyTrainingSet,

    #[error("feature mismatch: model has {expected} features, input has {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("model is not fitted")]
    NotFitted,

    #[error("numerical failure: {reason}")]
    Numerical { reason: String },
}
