//! Nearest-centroid classifier with a shared isotropic variance.

use nalgebra::{DMatrix, DVector};
use nempi_core::errors::ClassifierError;
use nempi_core::{Classifier, FittedClassifier};

use super::{check_features, check_training, softmax_rows};

const MIN_VARIANCE: f64 = 1e-6;

/// Probabilities ∝ exp(−‖x − μ_c‖² / 2τ), τ the pooled per-feature variance.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestCentroid;

#[derive(Debug, Clone)]
struct FittedCentroids {
    /// One centroid per class; `None` for classes without training rows.
    centroids: Vec<Option<DVector<f64>>>,
    variance: f64,
    n_features: usize,
}

impl Classifier for NearestCentroid {
    fn fit(
        &self,
        features: &DMatrix<f64>,
        labels: &[usize],
        n_classes: usize,
    ) -> Result<Box<dyn FittedClassifier>, ClassifierError> {
        check_training(features, labels, n_classes)?;
        let d = features.ncols();

        let mut sums = vec![DVector::zeros(d); n_classes];
        let mut counts = vec![0usize; n_classes];
        for (row, &c) in features.row_iter().zip(labels) {
            sums[c] += row.transpose();
            counts[c] += 1;
        }
        let centroids: Vec<Option<DVector<f64>>> = sums
            .into_iter()
            .zip(&counts)
            .map(|(sum, &n)| (n > 0).then(|| sum / n as f64))
            .collect();

        let mut squared = 0.0;
        for (row, &c) in features.row_iter().zip(labels) {
            if let Some(mu) = &centroids[c] {
                squared += (row.transpose() - mu).norm_squared();
            }
        }
        let variance = (squared / (features.nrows() * d.max(1)) as f64).max(MIN_VARIANCE);

        Ok(Box::new(FittedCentroids {
            centroids,
            variance,
            n_features: d,
        }))
    }

    fn name(&self) -> &str {
        "nearest_centroid"
    }
}

impl FittedClassifier for FittedCentroids {
    fn predict_proba(&self, features: &DMatrix<f64>) -> Result<DMatrix<f64>, ClassifierError> {
        check_features(features, self.n_features)?;
        let mut logits = DMatrix::from_fn(features.nrows(), self.centroids.len(), |s, c| {
            match &self.centroids[c] {
                Some(mu) => {
                    -(features.row(s).transpose() - mu).norm_squared() / (2.0 * self.variance)
                }
                None => f64::NEG_INFINITY,
            }
        });
        softmax_rows(&mut logits)?;
        Ok(logits)
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_class_gets_zero_probability() {
        let x = DMatrix::from_row_slice(2, 1, &[-1.0, 1.0]);
        let model = NearestCentroid.fit(&x, &[0, 2], 3).unwrap();
        let p = model.predict_proba(&DMatrix::from_row_slice(1, 1, &[0.5])).unwrap();
        assert_eq!(p[(0, 1)], 0.0);
        assert!(p[(0, 2)] > p[(0, 0)]);
        assert!((p.row(0).sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn identical_rows_do_not_divide_by_zero() {
        let x = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        let model = NearestCentroid.fit(&x, &[0, 0], 2).unwrap();
        let p = model.predict_proba(&x).unwrap();
        assert_eq!(p[(0, 0)], 1.0);
    }
}
