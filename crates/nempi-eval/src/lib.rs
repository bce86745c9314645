//! # nempi-eval
//!
//! Scores an inferred matrix (Γ or Ω) against ground truth: precision-recall
//! curve, PR-AUC by the trapezoid rule, ROC-AUC by the Mann-Whitney U statistic.

pub mod auc;
pub mod pr_curve;

use nempi_core::constants::INDICATOR_THRESHOLD;
use nempi_core::errors::{EvaluationError, InferenceError};
use nempi_core::LabeledMatrix;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use auc::calculate_auc;
pub use pr_curve::{pr_auc, pr_curve, PrPoint};

/// Evaluation of one inferred matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitRecord {
    pub points: Vec<PrPoint>,
    pub pr_auc: f64,
    pub roc_auc: f64,
    pub positives: usize,
    pub negatives: usize,
}

/// Compare `inferred` with `truth` entry by entry.
///
/// Both matrices must carry the same row and column names (any order); truth
/// entries above 0.5 are positives.
pub fn evaluate(
    inferred: &LabeledMatrix,
    truth: &LabeledMatrix,
) -> Result<FitRecord, EvaluationError> {
    let aligned = inferred
        .aligned_to(truth.row_names(), truth.col_names())
        .map_err(into_evaluation)?;

    let scores: Vec<f64> = aligned.values().iter().copied().collect();
    let labels: Vec<bool> = truth
        .values()
        .iter()
        .map(|&v| v > INDICATOR_THRESHOLD)
        .collect();

    let positives = labels.iter().filter(|&&l| l).count();
    if positives == 0 {
        return Err(EvaluationError::NoPositives);
    }
    let negatives = labels.len() - positives;

    let points = pr_curve(&scores, &labels);
    let pr_auc = pr_auc(&points);
    let (pos, neg): (Vec<(f64, bool)>, Vec<(f64, bool)>) =
        scores.iter().copied().zip(labels.iter().copied()).partition(|(_, l)| *l);
    let pos: Vec<f64> = pos.into_iter().map(|(s, _)| s).collect();
    let neg: Vec<f64> = neg.into_iter().map(|(s, _)| s).collect();
    let roc_auc = calculate_auc(&pos, &neg);

    debug!(positives, negatives, pr_auc, roc_auc, "evaluated assignment");
    Ok(FitRecord {
        points,
        pr_auc,
        roc_auc,
        positives,
        negatives,
    })
}

fn into_evaluation(err: InferenceError) -> EvaluationError {
    match err {
        InferenceError::DimensionMismatch {
            context,
            expected,
            found,
        } => EvaluationError::DimensionMismatch {
            context,
            expected,
            found,
        },
        other => EvaluationError::DimensionMismatch {
            context: "alignment".to_string(),
            expected: "matching names".to_string(),
            found: other.to_string(),
        },
    }
}
