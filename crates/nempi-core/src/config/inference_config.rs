use serde::{Deserialize, Serialize};

use super::defaults;

/// How a supplied prior column combines with freshly computed likelihoods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PriorBlend {
    /// Posterior ∝ prior × likelihood, renormalised every cycle.
    #[default]
    Multiplicative,
    /// The prior seeds the first cycle only; later cycles use the likelihood alone.
    Replace,
}

/// Starting distribution of unlabeled samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnlabeledInit {
    /// The prior column, or uniform without a prior.
    #[default]
    Uniform,
    /// No mass in the first search; the sample is assigned after the first cycle.
    /// Prior columns are still used as given.
    Zero,
    /// The prior column (or uniform) reweighted by Exp(1) draws from a generator
    /// seeded by `seed`, then renormalised. Breaks the symmetric fixed point of a
    /// fully unlabeled screen under a uniform start.
    Random,
}

/// Starting network for the first structure search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InitialNetwork {
    #[default]
    Empty,
    /// Random DAG drawn with `random_edge_probability` from a generator seeded by `seed`.
    Random,
}

/// Inference loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Hard cap on search/reassign cycles.
    pub max_iterations: usize,
    /// Max-abs Γ change below which the loop stops.
    pub convergence_tolerance: f64,
    /// Keep observed labels as hard constraints during reassignment.
    pub keep_labels: bool,
    pub prior_blend: PriorBlend,
    pub unlabeled_init: UnlabeledInit,
    pub initial_network: InitialNetwork,
    pub random_edge_probability: f64,
    pub seed: u64,
    /// Allow E-genes to stay unattached when no P-gene explains them better.
    pub allow_null_attachment: bool,
    /// Delimiter joining P-genes in combinatorial sample labels.
    pub label_delimiter: String,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            max_iterations: defaults::DEFAULT_MAX_ITERATIONS,
            convergence_tolerance: defaults::DEFAULT_CONVERGENCE_TOLERANCE,
            keep_labels: defaults::DEFAULT_KEEP_LABELS,
            prior_blend: PriorBlend::default(),
            unlabeled_init: UnlabeledInit::default(),
            initial_network: InitialNetwork::default(),
            random_edge_probability: defaults::DEFAULT_RANDOM_EDGE_PROBABILITY,
            seed: defaults::DEFAULT_SEED,
            allow_null_attachment: defaults::DEFAULT_ALLOW_NULL_ATTACHMENT,
            label_delimiter: defaults::DEFAULT_LABEL_DELIMITER.to_string(),
        }
    }
}
