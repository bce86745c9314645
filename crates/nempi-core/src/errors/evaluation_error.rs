/// Errors raised while scoring an inferred matrix against ground truth.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        context: String,
        expected: String,
        found: String,
    },

    #[error("ground truth contains no positive entries")]
    NoPositives,
}
