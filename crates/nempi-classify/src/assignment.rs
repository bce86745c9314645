//! ClassifierAssignment: Γ from a supervised classifier instead of the loop.

use nalgebra::DMatrix;
use nempi_core::config::ClassifierConfig;
use nempi_core::errors::{ClassifierError, InferenceError, NempiError, NempiResult};
use nempi_core::{Classifier, Dataset, LabeledMatrix};
use nempi_inference::propagate;
use nempi_inference::reestimate::label_distribution;
use nempi_network::NetworkModel;
use nempi_observability::classifier_span;
use tracing::{debug, info};

use crate::backends;

/// Output of the classifier path.
#[derive(Debug, Clone)]
pub struct ClassifierOutcome {
    /// Γ: predictions, with labeled samples replaced by their labels.
    pub assignment: LabeledMatrix,
    /// Raw predictions for every sample, P-genes × samples.
    pub predicted: LabeledMatrix,
    /// Ω when propagation was requested. Equal to `assignment` when no network
    /// was supplied.
    pub propagated: Option<LabeledMatrix>,
    /// Propagation was requested but no network was supplied.
    pub propagation_skipped: bool,
    pub backend: String,
    /// Training rows (a sample with k labels contributes k rows).
    pub training_rows: usize,
}

/// Runs the classifier path with the configured backend.
pub struct ClassifierAssignment {
    config: ClassifierConfig,
}

impl ClassifierAssignment {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Train the configured backend on labeled samples and predict all samples.
    pub fn run(
        &self,
        dataset: &Dataset,
        network: Option<&NetworkModel>,
    ) -> NempiResult<ClassifierOutcome> {
        let classifier = backends::build(&self.config);
        self.run_with(classifier.as_ref(), dataset, network)
    }

    /// Same as [`run`](Self::run) with a caller-supplied backend.
    pub fn run_with(
        &self,
        classifier: &dyn Classifier,
        dataset: &Dataset,
        network: Option<&NetworkModel>,
    ) -> NempiResult<ClassifierOutcome> {
        let backend = classifier.name().to_string();
        let p_genes = dataset.p_gene_vocabulary();
        if p_genes.is_empty() {
            return Err(InferenceError::EmptyVocabulary.into());
        }
        let labels = dataset.label_indices(&p_genes);

        // Samples × E-genes.
        let features = dataset.data().values().transpose();
        let (train_x, train_y) = training_rows(&features, &labels);
        let _span = classifier_span!(backend, train_y.len()).entered();

        let fitted = classifier
            .fit(&train_x, &train_y, p_genes.len())
            .map_err(|e| NempiError::classifier(&backend, e))?;
        let proba = fitted
            .predict_proba(&features)
            .map_err(|e| NempiError::classifier(&backend, e))?;
        if proba.shape() != (features.nrows(), p_genes.len()) {
            return Err(NempiError::classifier(
                &backend,
                ClassifierError::Numerical {
                    reason: format!(
                        "prediction shape {:?}, expected {:?}",
                        proba.shape(),
                        (features.nrows(), p_genes.len())
                    ),
                },
            ));
        }

        let sample_ids = dataset.sample_ids().to_vec();
        let predicted_values = proba.transpose();
        let mut assignment_values = predicted_values.clone();
        for (s, genes) in labels.iter().enumerate() {
            if !genes.is_empty() {
                let column = label_distribution(genes, p_genes.len());
                assignment_values
                    .column_mut(s)
                    .copy_from_slice(&column);
            }
        }
        let predicted = LabeledMatrix::new(p_genes.clone(), sample_ids.clone(), predicted_values)?;
        let assignment = LabeledMatrix::new(p_genes, sample_ids, assignment_values)?;

        let (propagated, propagation_skipped) = match (self.config.propagate, network) {
            (false, _) => (None, false),
            (true, Some(network)) => (Some(propagate(network, &assignment)?), false),
            (true, None) => {
                debug!("no network supplied, propagation skipped");
                (Some(assignment.clone()), true)
            }
        };

        info!(
            backend = %backend,
            training_rows = train_y.len(),
            samples = assignment.ncols(),
            "classifier assignment complete"
        );
        Ok(ClassifierOutcome {
            assignment,
            predicted,
            propagated,
            propagation_skipped,
            backend,
            training_rows: train_y.len(),
        })
    }
}

/// One row per (labeled sample, label gene).
fn training_rows(features: &DMatrix<f64>, labels: &[Vec<usize>]) -> (DMatrix<f64>, Vec<usize>) {
    let rows: Vec<(usize, usize)> = labels
        .iter()
        .enumerate()
        .flat_map(|(s, genes)| genes.iter().map(move |&g| (s, g)))
        .collect();
    let x = DMatrix::from_fn(rows.len(), features.ncols(), |r, f| features[(rows[r].0, f)]);
    let y = rows.into_iter().map(|(_, g)| g).collect();
    (x, y)
}
