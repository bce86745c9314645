use serde::{Deserialize, Serialize};

use super::defaults;

/// Structure search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum accepted moves per search call.
    pub max_steps: usize,
    /// A move must beat the current score by more than this to be accepted.
    pub min_improvement: f64,
    /// Score candidate moves and E-gene rows with rayon.
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_steps: defaults::DEFAULT_MAX_SEARCH_STEPS,
            min_improvement: defaults::DEFAULT_MIN_IMPROVEMENT,
            parallel: defaults::DEFAULT_PARALLEL_SEARCH,
        }
    }
}
