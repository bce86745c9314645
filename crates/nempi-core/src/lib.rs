//! # nempi-core
//!
//! Foundation crate for perturbation inference.
//! Defines labeled matrices, datasets, errors, config, constants, and the
//! classifier capability traits. Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod dataset;
pub mod errors;
pub mod matrix;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::NempiConfig;
pub use dataset::{parse_label, Dataset, LabelSet};
pub use errors::{NempiError, NempiResult};
pub use matrix::LabeledMatrix;
pub use traits::{Classifier, FittedClassifier};
