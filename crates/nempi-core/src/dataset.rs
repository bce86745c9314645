//! Perturbation datasets: the E-gene × sample readout plus per-sample label sets.

use std::collections::BTreeSet;

use nalgebra::DMatrix;

use crate::config::InferenceConfig;
use crate::constants::SAMPLE_ID_PREFIX;
use crate::errors::InferenceError;
use crate::matrix::LabeledMatrix;

/// The set of P-genes observed as perturbed in one sample. Empty = unlabeled.
pub type LabelSet = BTreeSet<String>;

/// Parse a delimiter-joined label string into a set of P-gene names.
///
/// Tokens are trimmed and empty tokens dropped, so `""` is unlabeled and
/// `"A_B"` with delimiter `_` is the combinatorial perturbation `{A, B}`.
pub fn parse_label(label: &str, delimiter: &str) -> LabelSet {
    label
        .split(delimiter)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Readout matrix and sample labels.
#[derive(Debug, Clone)]
pub struct Dataset {
    data: LabeledMatrix,
    labels: Vec<LabelSet>,
    p_genes: Option<Vec<String>>,
}

impl Dataset {
    /// Build a dataset from a data matrix (rows = E-genes, columns = sample ids)
    /// and one label set per column.
    pub fn new(data: LabeledMatrix, labels: Vec<LabelSet>) -> Result<Self, InferenceError> {
        if labels.len() != data.ncols() {
            return Err(InferenceError::mismatch(
                "sample labels",
                data.ncols(),
                labels.len(),
            ));
        }
        Ok(Self {
            data,
            labels,
            p_genes: None,
        })
    }

    /// Build from raw values whose columns are named by delimiter-joined labels,
    /// the way perturbation screens are usually exported. Sample ids are generated
    /// as `s0, s1, ...`.
    pub fn from_column_labels(
        e_genes: Vec<String>,
        column_labels: &[&str],
        values: DMatrix<f64>,
        delimiter: &str,
    ) -> Result<Self, InferenceError> {
        let sample_ids = (0..column_labels.len())
            .map(|i| format!("{SAMPLE_ID_PREFIX}{i}"))
            .collect();
        let data = LabeledMatrix::new(e_genes, sample_ids, values)?;
        let labels = column_labels
            .iter()
            .map(|l| parse_label(l, delimiter))
            .collect();
        Self::new(data, labels)
    }

    /// [`Dataset::from_column_labels`] with the configured `label_delimiter`.
    pub fn from_column_labels_with(
        config: &InferenceConfig,
        e_genes: Vec<String>,
        column_labels: &[&str],
        values: DMatrix<f64>,
    ) -> Result<Self, InferenceError> {
        Self::from_column_labels(e_genes, column_labels, values, &config.label_delimiter)
    }

    /// Fix the P-gene vocabulary instead of deriving it from the labels.
    /// Every label must belong to the vocabulary.
    pub fn with_p_genes(mut self, p_genes: Vec<String>) -> Result<Self, InferenceError> {
        let known: BTreeSet<&str> = p_genes.iter().map(String::as_str).collect();
        if known.len() != p_genes.len() {
            return Err(InferenceError::mismatch(
                "p-gene vocabulary",
                "unique names",
                format!("{p_genes:?}"),
            ));
        }
        for (sample, set) in self.sample_ids().iter().zip(&self.labels) {
            if let Some(unknown) = set.iter().find(|g| !known.contains(g.as_str())) {
                return Err(InferenceError::mismatch(
                    format!("label of sample {sample}"),
                    format!("one of {p_genes:?}"),
                    unknown,
                ));
            }
        }
        self.p_genes = Some(p_genes);
        Ok(self)
    }

    pub fn data(&self) -> &LabeledMatrix {
        &self.data
    }

    pub fn labels(&self) -> &[LabelSet] {
        &self.labels
    }

    pub fn e_genes(&self) -> &[String] {
        self.data.row_names()
    }

    pub fn sample_ids(&self) -> &[String] {
        self.data.col_names()
    }

    pub fn n_samples(&self) -> usize {
        self.data.ncols()
    }

    /// Whether any sample carries a label.
    pub fn has_labels(&self) -> bool {
        self.labels.iter().any(|l| !l.is_empty())
    }

    /// Explicit P-gene vocabulary, or the sorted union of all labels.
    pub fn p_gene_vocabulary(&self) -> Vec<String> {
        match &self.p_genes {
            Some(explicit) => explicit.clone(),
            None => self
                .labels
                .iter()
                .flatten()
                .cloned()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        }
    }

    /// Whether the vocabulary was set explicitly.
    pub fn has_explicit_vocabulary(&self) -> bool {
        self.p_genes.is_some()
    }

    /// Labels as P-gene indices into `vocabulary`. Unknown names are skipped.
    pub fn label_indices(&self, vocabulary: &[String]) -> Vec<Vec<usize>> {
        self.labels
            .iter()
            .map(|set| {
                set.iter()
                    .filter_map(|g| vocabulary.iter().position(|v| v == g))
                    .collect()
            })
            .collect()
    }
}
