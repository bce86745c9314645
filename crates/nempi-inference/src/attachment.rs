//! E-gene attachment scoring for a fixed network and assignment.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::emission::EmissionTable;

/// Best attachment of every E-gene.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    /// P-gene index per E-gene; `None` is the null node.
    pub targets: Vec<Option<usize>>,
    /// Best score per E-gene.
    pub scores: Vec<f64>,
    /// Sum of `scores`.
    pub total: f64,
}

impl Attachment {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Number of E-genes left on the null node.
    pub fn unattached(&self) -> usize {
        self.targets.iter().filter(|t| t.is_none()).count()
    }
}

/// Scores every (E-gene, P-gene) pair under the Γ-weighted Gaussian likelihood
/// and attaches each E-gene to its best P-gene.
#[derive(Debug, Clone, Copy)]
pub struct AttachmentScorer<'a> {
    emission: &'a EmissionTable,
    allow_null: bool,
    parallel: bool,
}

impl<'a> AttachmentScorer<'a> {
    pub fn new(emission: &'a EmissionTable, allow_null: bool, parallel: bool) -> Self {
        Self {
            emission,
            allow_null,
            parallel,
        }
    }

    pub fn emission(&self) -> &'a EmissionTable {
        self.emission
    }

    /// F = Tᵀ Γ, each column clamped to [0, c_s].
    pub fn expected_effects(closure: &DMatrix<f64>, gamma: &DMatrix<f64>) -> DMatrix<f64> {
        let mass = column_mass(gamma);
        let mut f = closure.tr_mul(gamma);
        for s in 0..f.ncols() {
            let c = mass[s];
            for v in f.column_mut(s).iter_mut() {
                *v = v.max(0.0).min(c);
            }
        }
        f
    }

    /// Full E-genes × P-genes score matrix.
    pub fn score_matrix(&self, closure: &DMatrix<f64>, gamma: &DMatrix<f64>) -> DMatrix<f64> {
        let f = Self::expected_effects(closure, gamma);
        let base = self.emission.null_scores(&column_mass(gamma));
        let mut scores = self.emission.llr() * f.transpose();
        for (i, mut row) in scores.row_iter_mut().enumerate() {
            row.add_scalar_mut(base[i]);
        }
        scores
    }

    /// Attach every E-gene to its arg-max P-gene.
    ///
    /// Ties go to the lowest P-gene index. The null node wins only when it is
    /// strictly better than every P-gene.
    pub fn score(&self, closure: &DMatrix<f64>, gamma: &DMatrix<f64>) -> Attachment {
        let f = Self::expected_effects(closure, gamma);
        let base = self.emission.null_scores(&column_mass(gamma));
        let n_e = self.emission.n_e_genes();

        let best: Vec<(Option<usize>, f64)> = if self.parallel {
            (0..n_e)
                .into_par_iter()
                .map(|i| self.best_for_row(i, &f, base[i]))
                .collect()
        } else {
            (0..n_e).map(|i| self.best_for_row(i, &f, base[i])).collect()
        };

        let (targets, scores): (Vec<_>, Vec<_>) = best.into_iter().unzip();
        let total = scores.iter().sum();
        Attachment {
            targets,
            scores,
            total,
        }
    }

    fn best_for_row(&self, i: usize, f: &DMatrix<f64>, null: f64) -> (Option<usize>, f64) {
        let llr = self.emission.llr().row(i);
        let mut best: Option<(usize, f64)> = None;
        for k in 0..f.nrows() {
            let score = null + llr.dot(&f.row(k));
            if best.map_or(true, |(_, b)| score > b) {
                best = Some((k, score));
            }
        }
        match best {
            Some((_, b)) if self.allow_null && null > b => (None, null),
            Some((k, b)) => (Some(k), b),
            None => (None, null),
        }
    }
}

/// c_s: the Γ mass of every sample.
pub(crate) fn column_mass(gamma: &DMatrix<f64>) -> DVector<f64> {
    DVector::from_fn(gamma.ncols(), |s, _| gamma.column(s).sum())
}
