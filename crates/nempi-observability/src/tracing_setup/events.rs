//! Structured log events for the inference loop.

/// A search/reassign cycle finished.
pub fn cycle_completed(cycle: usize, score: f64, delta: f64, edges: usize) {
    tracing::info!(
        event = "cycle_completed",
        cycle = cycle,
        score = score,
        delta = delta,
        edges = edges,
        "cycle completed"
    );
}

/// A structure search call finished.
pub fn search_completed(steps: usize, score: f64, rejected_moves: usize) {
    tracing::info!(
        event = "search_completed",
        steps = steps,
        score = score,
        rejected_moves = rejected_moves,
        "structure search completed"
    );
}

/// A sample had no finite log-posterior and was reset to uniform.
pub fn degenerate_sample(sample: &str) {
    tracing::warn!(
        event = "degenerate_likelihood",
        sample = %sample,
        "non-finite likelihood, using uniform distribution"
    );
}

/// The loop hit its iteration cap.
pub fn non_convergence(cycles: usize, last_delta: f64) {
    tracing::warn!(
        event = "non_convergence",
        cycles = cycles,
        last_delta = last_delta,
        "inference stopped without converging"
    );
}
