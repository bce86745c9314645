//! Multinomial logistic regression trained by full-batch gradient descent.

use nalgebra::{DMatrix, DVector};
use nempi_core::errors::ClassifierError;
use nempi_core::{Classifier, FittedClassifier};

use super::{check_features, check_training, softmax_rows};

/// Softmax regression with an L2 penalty on the weights. Features are
/// standardised with the training mean and standard deviation.
#[derive(Debug, Clone, Copy)]
pub struct Logistic {
    pub learning_rate: f64,
    pub epochs: usize,
    pub l2: f64,
}

#[derive(Debug, Clone)]
struct FittedLogistic {
    mean: DVector<f64>,
    scale: DVector<f64>,
    /// features × classes
    weights: DMatrix<f64>,
    bias: DVector<f64>,
}

impl FittedLogistic {
    fn standardise(&self, features: &DMatrix<f64>) -> DMatrix<f64> {
        DMatrix::from_fn(features.nrows(), features.ncols(), |s, f| {
            (features[(s, f)] - self.mean[f]) / self.scale[f]
        })
    }

    fn logits(&self, x: &DMatrix<f64>) -> DMatrix<f64> {
        let mut z = x * &self.weights;
        for mut row in z.row_iter_mut() {
            row += self.bias.transpose();
        }
        z
    }
}

impl Classifier for Logistic {
    fn fit(
        &self,
        features: &DMatrix<f64>,
        labels: &[usize],
        n_classes: usize,
    ) -> Result<Box<dyn FittedClassifier>, ClassifierError> {
        check_training(features, labels, n_classes)?;
        let (n, d) = features.shape();

        let mean = DVector::from_fn(d, |f, _| features.column(f).mean());
        let scale = DVector::from_fn(d, |f, _| {
            let sd = features.column(f).variance().sqrt();
            if sd > 1e-12 {
                sd
            } else {
                1.0
            }
        });
        let mut model = FittedLogistic {
            mean,
            scale,
            weights: DMatrix::zeros(d, n_classes),
            bias: DVector::zeros(n_classes),
        };
        let x = model.standardise(features);
        let y = DMatrix::from_fn(n, n_classes, |s, c| if labels[s] == c { 1.0 } else { 0.0 });

        for _ in 0..self.epochs {
            let mut p = model.logits(&x);
            softmax_rows(&mut p)?;
            let residual = p - &y;
            let grad_w = x.tr_mul(&residual) / n as f64 + &model.weights * self.l2;
            let grad_b = DVector::from_fn(n_classes, |c, _| residual.column(c).mean());
            model.weights -= grad_w * self.learning_rate;
            model.bias -= grad_b * self.learning_rate;
        }

        if model.weights.iter().chain(model.bias.iter()).any(|v| !v.is_finite()) {
            return Err(ClassifierError::Numerical {
                reason: "gradient descent diverged".to_string(),
            });
        }
        Ok(Box::new(model))
    }

    fn name(&self) -> &str {
        "logistic"
    }
}

impl FittedClassifier for FittedLogistic {
    fn predict_proba(&self, features: &DMatrix<f64>) -> Result<DMatrix<f64>, ClassifierError> {
        check_features(features, self.mean.len())?;
        let mut p = self.logits(&self.standardise(features));
        softmax_rows(&mut p)?;
        Ok(p)
    }

    fn n_features(&self) -> usize {
        self.mean.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> Logistic {
        Logistic {
            learning_rate: 0.5,
            epochs: 300,
            l2: 1e-3,
        }
    }

    #[test]
    fn separable_classes_are_learned() {
        let x = DMatrix::from_row_slice(4, 2, &[2.0, -2.0, 1.5, -1.0, -2.0, 2.0, -1.0, 1.5]);
        let fitted = model().fit(&x, &[0, 0, 1, 1], 2).unwrap();
        let p = fitted.predict_proba(&x).unwrap();
        for s in 0..2 {
            assert!(p[(s, 0)] > 0.8);
            assert!(p[(s + 2, 1)] > 0.8);
        }
    }

    #[test]
    fn constant_feature_is_harmless() {
        let x = DMatrix::from_row_slice(2, 2, &[1.0, 3.0, -1.0, 3.0]);
        let fitted = model().fit(&x, &[0, 1], 2).unwrap();
        let p = fitted.predict_proba(&x).unwrap();
        assert!(p.iter().all(|v| v.is_finite()));
    }
}
