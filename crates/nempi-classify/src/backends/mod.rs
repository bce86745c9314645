//! Concrete classifier families behind the [`Classifier`] trait.

pub mod knn;
pub mod logistic;
pub mod nearest_centroid;

use nalgebra::DMatrix;
use nempi_core::config::{ClassifierBackend, ClassifierConfig};
use nempi_core::errors::ClassifierError;
use nempi_core::Classifier;

pub use knn::KNearest;
pub use logistic::Logistic;
pub use nearest_centroid::NearestCentroid;

/// The backend named by the configuration.
pub fn build(config: &ClassifierConfig) -> Box<dyn Classifier> {
    match config.backend {
        ClassifierBackend::NearestCentroid => Box::new(NearestCentroid),
        ClassifierBackend::Logistic => Box::new(Logistic {
            learning_rate: config.learning_rate,
            epochs: config.epochs,
            l2: config.l2,
        }),
        ClassifierBackend::KNearest => Box::new(KNearest { k: config.k }),
    }
}

/// Shared checks on a training set.
pub(crate) fn check_training(
    features: &DMatrix<f64>,
    labels: &[usize],
    n_classes: usize,
) -> Result<(), ClassifierError> {
    if features.nrows() == 0 || labels.is_empty() {
        return Err(ClassifierError::EmptyTrainingSet);
    }
    if labels.len() != features.nrows() {
        return Err(ClassifierError::Numerical {
            reason: format!("{} labels for {} rows", labels.len(), features.nrows()),
        });
    }
    if let Some(bad) = labels.iter().find(|&&l| l >= n_classes) {
        return Err(ClassifierError::Numerical {
            reason: format!("label {bad} outside 0..{n_classes}"),
        });
    }
    if features.iter().any(|v| !v.is_finite()) {
        return Err(ClassifierError::Numerical {
            reason: "non-finite training feature".to_string(),
        });
    }
    Ok(())
}

pub(crate) fn check_features(features: &DMatrix<f64>, expected: usize) -> Result<(), ClassifierError> {
    if features.ncols() != expected {
        return Err(ClassifierError::FeatureMismatch {
            expected,
            actual: features.ncols(),
        });
    }
    if features.iter().any(|v| !v.is_finite()) {
        return Err(ClassifierError::Numerical {
            reason: "non-finite feature".to_string(),
        });
    }
    Ok(())
}

/// Row-wise max-shifted softmax. Entries at −∞ get probability 0; NaN is an error.
pub(crate) fn softmax_rows(logits: &mut DMatrix<f64>) -> Result<(), ClassifierError> {
    for mut row in logits.row_iter_mut() {
        if row.iter().any(|v| v.is_nan()) {
            return Err(ClassifierError::Numerical {
                reason: "NaN class score".to_string(),
            });
        }
        let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            return Err(ClassifierError::Numerical {
                reason: "no finite class score".to_string(),
            });
        }
        row.apply(|v| *v = (*v - max).exp());
        let total = row.sum();
        row /= total;
    }
    Ok(())
}
