//! Re-estimation of the per-sample perturbation distribution Γ.

use nalgebra::{DMatrix, DVector};
use nempi_core::constants::INDICATOR_THRESHOLD;

use crate::attachment::Attachment;
use crate::emission::EmissionTable;

/// What the reestimator may do with one sample.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleConstraint {
    /// Posterior from the likelihood alone.
    Free,
    /// Hard label: uniform over these P-gene indices.
    Labeled(Vec<usize>),
    /// Posterior ∝ prior × likelihood.
    Prior(DVector<f64>),
    /// Stays all-zero.
    Excluded,
}

/// New Γ plus the samples whose likelihood was unusable.
#[derive(Debug, Clone)]
pub struct Reassignment {
    pub gamma: DMatrix<f64>,
    /// Sample indices reset to uniform.
    pub degenerate: Vec<usize>,
}

/// Computes Γ from the network closure and the current attachment.
#[derive(Debug, Clone, Copy)]
pub struct AssignmentReestimator<'a> {
    emission: &'a EmissionTable,
}

impl<'a> AssignmentReestimator<'a> {
    pub fn new(emission: &'a EmissionTable) -> Self {
        Self { emission }
    }

    /// loglik[k][s]: E-genes attached to a descendant of k use ℓ₁, the rest ℓ₀.
    pub fn log_likelihoods(&self, closure: &DMatrix<f64>, attachment: &Attachment) -> DMatrix<f64> {
        let n = closure.nrows();
        let n_e = self.emission.n_e_genes();
        let indicator = DMatrix::from_fn(n, n_e, |k, i| match attachment.targets[i] {
            Some(a) if closure[(k, a)] > INDICATOR_THRESHOLD => 1.0,
            _ => 0.0,
        });
        let baseline = self.emission.sample_baseline();
        let mut loglik = indicator * self.emission.llr();
        for (s, mut column) in loglik.column_iter_mut().enumerate() {
            column.add_scalar_mut(baseline[s]);
        }
        loglik
    }

    /// One Γ per sample, following each sample's constraint.
    pub fn reestimate(
        &self,
        closure: &DMatrix<f64>,
        attachment: &Attachment,
        constraints: &[SampleConstraint],
    ) -> Reassignment {
        let n = closure.nrows();
        let loglik = self.log_likelihoods(closure, attachment);
        let mut gamma = DMatrix::zeros(n, constraints.len());
        let mut degenerate = Vec::new();

        for (s, constraint) in constraints.iter().enumerate() {
            let column: Vec<f64> = match constraint {
                SampleConstraint::Excluded => continue,
                SampleConstraint::Labeled(genes) => label_distribution(genes, n),
                SampleConstraint::Free => loglik.column(s).iter().copied().collect(),
                SampleConstraint::Prior(prior) => loglik
                    .column(s)
                    .iter()
                    .zip(prior.iter())
                    .map(|(l, p)| l + p.ln())
                    .collect(),
            };
            let column = if matches!(constraint, SampleConstraint::Labeled(_)) {
                column
            } else {
                match softmax(&column).filter(|_| self.emission.observed(s) > 0) {
                    Some(p) => p,
                    None => {
                        degenerate.push(s);
                        vec![1.0 / n as f64; n]
                    }
                }
            };
            for (k, v) in column.into_iter().enumerate() {
                gamma[(k, s)] = v;
            }
        }

        Reassignment { gamma, degenerate }
    }
}

/// Uniform over the given indices.
pub fn label_distribution(genes: &[usize], n: usize) -> Vec<f64> {
    let mut column = vec![0.0; n];
    if genes.is_empty() {
        return column;
    }
    let w = 1.0 / genes.len() as f64;
    for &g in genes {
        column[g] = w;
    }
    column
}

/// Max-shifted softmax over the finite entries; non-finite entries get 0.
///
/// Returns `None` when no entry is finite.
pub fn softmax(log_values: &[f64]) -> Option<Vec<f64>> {
    let max = log_values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return None;
    }
    let exps: Vec<f64> = log_values
        .iter()
        .map(|&v| if v.is_finite() { (v - max).exp() } else { 0.0 })
        .collect();
    let total: f64 = exps.iter().sum();
    Some(exps.into_iter().map(|e| e / total).collect())
}
