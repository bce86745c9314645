// Single source of truth for all default values.

// --- Inference loop ---
pub const DEFAULT_MAX_ITERATIONS: usize = 20;
pub const DEFAULT_CONVERGENCE_TOLERANCE: f64 = 1e-4;
pub const DEFAULT_KEEP_LABELS: bool = true;
pub const DEFAULT_RANDOM_EDGE_PROBABILITY: f64 = 0.2;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_ALLOW_NULL_ATTACHMENT: bool = true;
pub const DEFAULT_LABEL_DELIMITER: &str = "_";

// --- Noise model ---
pub const DEFAULT_EFFECT_MEAN: f64 = 1.0;
pub const DEFAULT_NO_EFFECT_MEAN: f64 = -1.0;
pub const DEFAULT_NOISE_SD: f64 = 1.0;

// --- Structure search ---
pub const DEFAULT_MAX_SEARCH_STEPS: usize = 100;
pub const DEFAULT_MIN_IMPROVEMENT: f64 = 1e-9;
pub const DEFAULT_PARALLEL_SEARCH: bool = true;

// --- Classifier ---
pub const DEFAULT_KNN_K: usize = 5;
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
pub const DEFAULT_EPOCHS: usize = 200;
pub const DEFAULT_L2_PENALTY: f64 = 1e-3;
pub const DEFAULT_PROPAGATE: bool = false;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
