//! # nempi-inference
//!
//! The perturbation inference engine. Alternates a greedy structure search over
//! causal networks (with E-gene attachment scoring) and a re-estimation of the
//! per-sample perturbation distribution Γ, then propagates Γ through the
//! network's transitive closure.

pub mod attachment;
pub mod emission;
pub mod engine;
pub mod init;
pub mod propagation;
pub mod reestimate;
pub mod search;

pub use attachment::{Attachment, AttachmentScorer};
pub use emission::EmissionTable;
pub use engine::{EGeneAttachment, InferenceEngine, InferenceResult, LoopState};
pub use propagation::{propagate, propagate_matrix};
pub use reestimate::{AssignmentReestimator, Reassignment, SampleConstraint};
pub use search::{SearchOutcome, StructureSearch};
