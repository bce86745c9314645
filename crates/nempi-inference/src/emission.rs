//! Per-entry emission log-densities, computed once per dataset.

use nalgebra::{DMatrix, DVector};
use nempi_core::config::NoiseModel;

/// ℓ₁ and ℓ₀ for every entry of the data matrix, plus their difference.
///
/// Rows are E-genes, columns are samples, matching the data matrix. Non-finite
/// entries are treated as missing: ℓ₁ = ℓ₀ = 0, so they add nothing to any score.
#[derive(Debug, Clone)]
pub struct EmissionTable {
    effect: DMatrix<f64>,
    no_effect: DMatrix<f64>,
    llr: DMatrix<f64>,
    observed: Vec<usize>,
}

impl EmissionTable {
    pub fn new(data: &DMatrix<f64>, noise: &NoiseModel) -> Self {
        let effect = masked(data, |x| noise.log_effect(x));
        let no_effect = masked(data, |x| noise.log_no_effect(x));
        let llr = &effect - &no_effect;
        let observed = data
            .column_iter()
            .map(|column| column.iter().filter(|x| x.is_finite()).count())
            .collect();
        Self {
            effect,
            no_effect,
            llr,
            observed,
        }
    }

    /// Number of finite entries in sample `s`.
    pub fn observed(&self, s: usize) -> usize {
        self.observed[s]
    }

    pub fn n_e_genes(&self) -> usize {
        self.llr.nrows()
    }

    pub fn n_samples(&self) -> usize {
        self.llr.ncols()
    }

    /// ℓ₁ table.
    pub fn effect(&self) -> &DMatrix<f64> {
        &self.effect
    }

    /// ℓ₀ table.
    pub fn no_effect(&self) -> &DMatrix<f64> {
        &self.no_effect
    }

    /// ℓ₁ − ℓ₀.
    pub fn llr(&self) -> &DMatrix<f64> {
        &self.llr
    }

    /// Per E-gene Σ_s mass[s]·ℓ₀: the score of an E-gene nobody explains.
    pub fn null_scores(&self, mass: &DVector<f64>) -> DVector<f64> {
        &self.no_effect * mass
    }

    /// Per sample Σ_i ℓ₀: the log-likelihood of a sample with no effects at all.
    pub fn sample_baseline(&self) -> DVector<f64> {
        DVector::from_fn(self.n_samples(), |s, _| self.no_effect.column(s).sum())
    }
}

fn masked(data: &DMatrix<f64>, density: impl Fn(f64) -> f64) -> DMatrix<f64> {
    data.map(|x| if x.is_finite() { density(x) } else { 0.0 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn llr_is_linear_in_data_for_equal_variances() {
        let noise = NoiseModel::default();
        let data = DMatrix::from_row_slice(1, 3, &[-1.0, 0.0, 2.0]);
        let table = EmissionTable::new(&data, &noise);
        // With means ±1 and sd 1 the log-ratio is 2x.
        for (s, x) in [-1.0, 0.0, 2.0].into_iter().enumerate() {
            assert!((table.llr()[(0, s)] - 2.0 * x).abs() < 1e-12);
        }
    }

    #[test]
    fn null_scores_weight_by_mass() {
        let noise = NoiseModel::default();
        let data = DMatrix::from_row_slice(1, 2, &[-1.0, -1.0]);
        let table = EmissionTable::new(&data, &noise);
        let l0 = noise.log_no_effect(-1.0);
        let scores = table.null_scores(&DVector::from_vec(vec![1.0, 0.0]));
        assert!((scores[0] - l0).abs() < 1e-12);
    }

    #[test]
    fn non_finite_entries_are_missing() {
        let noise = NoiseModel::default();
        let data = DMatrix::from_row_slice(2, 2, &[f64::NAN, 1.0, f64::INFINITY, -1.0]);
        let table = EmissionTable::new(&data, &noise);
        assert_eq!(table.llr()[(0, 0)], 0.0);
        assert_eq!(table.llr()[(1, 0)], 0.0);
        assert_eq!(table.no_effect()[(1, 0)], 0.0);
        assert_eq!(table.observed(0), 0);
        assert_eq!(table.observed(1), 2);
        assert!(table.sample_baseline().iter().all(|v| v.is_finite()));
    }
}
