/// Causal network mutation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    #[error("edge {from} -> {to} would create a cycle")]
    CycleRejected { from: String, to: String },

    #[error("edge {from} -> {to} already exists")]
    EdgeExists { from: String, to: String },

    #[error("edge {from} -> {to} not found")]
    EdgeNotFound { from: String, to: String },

    #[error("unknown node: {name}")]
    UnknownNode { name: String },
}
