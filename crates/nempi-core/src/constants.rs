/// Tolerance used when checking that a distribution column sums to one.
pub const COLUMN_SUM_TOLERANCE: f64 = 1e-6;

/// Column mass below which a sample counts as excluded.
pub const EXCLUDED_COLUMN_MASS: f64 = 1e-12;

/// Threshold above which a closure or truth entry counts as set.
pub const INDICATOR_THRESHOLD: f64 = 0.5;

/// Prefix for generated sample identifiers.
pub const SAMPLE_ID_PREFIX: &str = "s";
