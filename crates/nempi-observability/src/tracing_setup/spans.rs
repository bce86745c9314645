//! Span definitions per phase: inference run, cycle, structure search, classifier path.

/// Create a span for a whole inference run.
#[macro_export]
macro_rules! inference_span {
    ($samples:expr, $p_genes:expr, $e_genes:expr) => {
        $crate::tracing::info_span!(
            "nempi.inference",
            samples = $samples,
            p_genes = $p_genes,
            e_genes = $e_genes
        )
    };
}

/// Create a span for one search/reassign cycle.
#[macro_export]
macro_rules! cycle_span {
    ($cycle:expr) => {
        $crate::tracing::info_span!("nempi.cycle", cycle = $cycle)
    };
}

/// Create a span for one structure search call.
#[macro_export]
macro_rules! search_span {
    ($edges:expr, $parallel:expr) => {
        $crate::tracing::debug_span!("nempi.search", start_edges = $edges, parallel = $parallel)
    };
}

/// Create a span for the classifier assignment path.
#[macro_export]
macro_rules! classifier_span {
    ($backend:expr, $training_rows:expr) => {
        $crate::tracing::info_span!(
            "nempi.classifier",
            backend = %$backend,
            training_rows = $training_rows
        )
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const INFERENCE: &str = "nempi.inference";
    pub const CYCLE: &str = "nempi.cycle";
    pub const SEARCH: &str = "nempi.search";
    pub const CLASSIFIER: &str = "nempi.classifier";
}
