//! Input validation and the starting assignment Γ₀.

use nalgebra::{DMatrix, DVector};
use nempi_core::config::{InferenceConfig, PriorBlend, UnlabeledInit};
use nempi_core::constants::{COLUMN_SUM_TOLERANCE, EXCLUDED_COLUMN_MASS};
use nempi_core::errors::InferenceError;
use nempi_core::{Dataset, LabeledMatrix};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Exp1;

use crate::reestimate::{label_distribution, SampleConstraint};

/// Everything the loop needs before its first cycle.
#[derive(Debug, Clone)]
pub struct Prepared {
    /// P-gene vocabulary, in Γ row order.
    pub p_genes: Vec<String>,
    /// Γ₀: P-genes × samples.
    pub gamma: DMatrix<f64>,
    pub constraints: Vec<SampleConstraint>,
}

/// Stream of the seeded generator used for random starting columns; stream 0
/// draws the random starting network.
const START_STREAM: u64 = 1;

/// Validate the dataset and optional prior and build Γ₀.
///
/// The vocabulary is the dataset's (explicit, or the union of its labels). A
/// fully unlabeled dataset without an explicit vocabulary takes the prior's
/// rows. A prior must cover exactly the vocabulary and the sample ids, in any
/// order; its columns must sum to 1, or to 0 to exclude the sample.
pub fn prepare(
    dataset: &Dataset,
    prior: Option<&LabeledMatrix>,
    config: &InferenceConfig,
) -> Result<Prepared, InferenceError> {
    let mut p_genes = dataset.p_gene_vocabulary();
    if p_genes.is_empty() && !dataset.has_explicit_vocabulary() {
        if let Some(prior) = prior {
            p_genes = prior.row_names().to_vec();
        }
    }
    if p_genes.is_empty() {
        return Err(InferenceError::EmptyVocabulary);
    }

    let prior = prior
        .map(|p| {
            let aligned = p.aligned_to(&p_genes, dataset.sample_ids())?;
            validate_prior(&aligned)?;
            Ok::<_, InferenceError>(aligned)
        })
        .transpose()?;

    let n = p_genes.len();
    let m = dataset.n_samples();
    let labels = dataset.label_indices(&p_genes);
    let mut gamma = DMatrix::zeros(n, m);
    let mut constraints = Vec::with_capacity(m);
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    rng.set_stream(START_STREAM);

    for s in 0..m {
        let prior_column = prior.as_ref().map(|p| p.values().column(s).into_owned());
        let excluded = prior_column
            .as_ref()
            .is_some_and(|c| c.sum() <= EXCLUDED_COLUMN_MASS);
        let labeled = !labels[s].is_empty();

        let start: Vec<f64> = if excluded {
            vec![0.0; n]
        } else if labeled {
            label_distribution(&labels[s], n)
        } else {
            match (config.unlabeled_init, &prior_column) {
                (UnlabeledInit::Random, c) => random_start(&mut rng, c.as_ref(), n),
                (_, Some(c)) => c.iter().copied().collect(),
                (UnlabeledInit::Uniform, None) => vec![1.0 / n as f64; n],
                (UnlabeledInit::Zero, None) => vec![0.0; n],
            }
        };
        for (k, v) in start.into_iter().enumerate() {
            gamma[(k, s)] = v;
        }

        constraints.push(constraint_for(
            excluded,
            labeled.then_some(&labels[s]),
            prior_column,
            config,
        ));
    }

    Ok(Prepared {
        p_genes,
        gamma,
        constraints,
    })
}

/// Base column (prior, or all ones) reweighted by Exp(1) draws and renormalised.
fn random_start(rng: &mut ChaCha8Rng, base: Option<&DVector<f64>>, n: usize) -> Vec<f64> {
    let weighted: Vec<f64> = (0..n)
        .map(|k| {
            let w: f64 = rng.sample(Exp1);
            base.map_or(1.0, |c| c[k]) * w
        })
        .collect();
    let total: f64 = weighted.iter().sum();
    if total > 0.0 {
        weighted.into_iter().map(|v| v / total).collect()
    } else {
        vec![1.0 / n as f64; n]
    }
}

fn constraint_for(
    excluded: bool,
    label: Option<&Vec<usize>>,
    prior_column: Option<DVector<f64>>,
    config: &InferenceConfig,
) -> SampleConstraint {
    if excluded {
        return SampleConstraint::Excluded;
    }
    if let Some(genes) = label.filter(|_| config.keep_labels) {
        return SampleConstraint::Labeled(genes.clone());
    }
    match (prior_column, config.prior_blend) {
        (Some(c), PriorBlend::Multiplicative) => SampleConstraint::Prior(c),
        _ => SampleConstraint::Free,
    }
}

fn validate_prior(prior: &LabeledMatrix) -> Result<(), InferenceError> {
    for (s, sample) in prior.col_names().iter().enumerate() {
        let column = prior.values().column(s);
        if let Some(bad) = column.iter().find(|v| !v.is_finite() || **v < 0.0 || **v > 1.0) {
            return Err(InferenceError::InvalidPrior {
                sample: sample.clone(),
                reason: format!("entry {bad} outside [0, 1]"),
            });
        }
        let sum = column.sum();
        if sum > EXCLUDED_COLUMN_MASS && (sum - 1.0).abs() > COLUMN_SUM_TOLERANCE {
            return Err(InferenceError::InvalidPrior {
                sample: sample.clone(),
                reason: format!("column sums to {sum}, expected 1 or 0"),
            });
        }
    }
    Ok(())
}
