//! k-nearest-neighbour classifier with Laplace-smoothed votes.

use nalgebra::DMatrix;
use nempi_core::errors::ClassifierError;
use nempi_core::{Classifier, FittedClassifier};

use super::{check_features, check_training};

/// Euclidean k nearest training rows; P(c) = (votes_c + 1) / (k + C).
#[derive(Debug, Clone, Copy)]
pub struct KNearest {
    pub k: usize,
}

#[derive(Debug, Clone)]
struct FittedKNearest {
    k: usize,
    features: DMatrix<f64>,
    labels: Vec<usize>,
    n_classes: usize,
}

impl Classifier for KNearest {
    fn fit(
        &self,
        features: &DMatrix<f64>,
        labels: &[usize],
        n_classes: usize,
    ) -> Result<Box<dyn FittedClassifier>, ClassifierError> {
        check_training(features, labels, n_classes)?;
        if self.k == 0 {
            return Err(ClassifierError::Numerical {
                reason: "k must be at least 1".to_string(),
            });
        }
        Ok(Box::new(FittedKNearest {
            k: self.k,
            features: features.clone(),
            labels: labels.to_vec(),
            n_classes,
        }))
    }

    fn name(&self) -> &str {
        "k_nearest"
    }
}

impl FittedClassifier for FittedKNearest {
    fn predict_proba(&self, features: &DMatrix<f64>) -> Result<DMatrix<f64>, ClassifierError> {
        check_features(features, self.features.ncols())?;
        let k = self.k.min(self.labels.len());
        let mut out = DMatrix::zeros(features.nrows(), self.n_classes);

        for (s, query) in features.row_iter().enumerate() {
            let mut distances: Vec<(f64, usize)> = self
                .features
                .row_iter()
                .enumerate()
                .map(|(t, row)| ((row - query).norm_squared(), t))
                .collect();
            distances.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

            let mut votes = vec![0usize; self.n_classes];
            for &(_, t) in distances.iter().take(k) {
                votes[self.labels[t]] += 1;
            }
            let denominator = (k + self.n_classes) as f64;
            for (c, &v) in votes.iter().enumerate() {
                out[(s, c)] = (v + 1) as f64 / denominator;
            }
        }
        Ok(out)
    }

    fn n_features(&self) -> usize {
        self.features.ncols()
    }
}
