use nalgebra::DMatrix;

use crate::errors::ClassifierError;

/// A supervised classifier family that can be trained on labeled samples.
///
/// Features are laid out samples × features; labels are class indices in
/// `0..n_classes`.
pub trait Classifier: Send + Sync {
    /// Train on the given rows and return a fitted model.
    fn fit(
        &self,
        features: &DMatrix<f64>,
        labels: &[usize],
        n_classes: usize,
    ) -> Result<Box<dyn FittedClassifier>, ClassifierError>;

    /// Human-readable backend name.
    fn name(&self) -> &str;
}

/// A trained model.
pub trait FittedClassifier: Send + Sync {
    /// Per-class probabilities, samples × classes. Every row sums to 1.
    fn predict_proba(&self, features: &DMatrix<f64>) -> Result<DMatrix<f64>, ClassifierError>;

    /// Number of features the model was trained on.
    fn n_features(&self) -> usize;
}
