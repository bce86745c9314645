//! # nempi-classify
//!
//! Alternative to iterative inference: train a supervised classifier on the
//! labeled samples, predict Γ for every sample, and optionally propagate it
//! through a known network.

pub mod assignment;
pub mod backends;

pub use assignment::{ClassifierAssignment, ClassifierOutcome};
pub use backends::{build, KNearest, Logistic, NearestCentroid};
