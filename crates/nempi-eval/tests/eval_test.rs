//! Tests for nempi-eval: alignment, PR curve and AUC on named matrices.

use nempi_core::errors::EvaluationError;
use nempi_core::LabeledMatrix;
use nempi_eval::{evaluate, FitRecord};
use proptest::prelude::*;

fn matrix(rows: &[&str], cols: &[&str], data: &[Vec<f64>]) -> LabeledMatrix {
    LabeledMatrix::from_rows(
        rows.iter().map(|s| s.to_string()).collect(),
        cols.iter().map(|s| s.to_string()).collect(),
        data,
    )
    .unwrap()
}

fn truth() -> LabeledMatrix {
    matrix(
        &["P1", "P2"],
        &["s0", "s1", "s2"],
        &[vec![1.0, 0.0, 1.0], vec![0.0, 1.0, 0.0]],
    )
}

#[test]
fn perfect_inference_scores_one() {
    let inferred = matrix(
        &["P1", "P2"],
        &["s0", "s1", "s2"],
        &[vec![0.9, 0.2, 0.8], vec![0.1, 0.8, 0.2]],
    );
    let fit = evaluate(&inferred, &truth()).unwrap();
    assert!((fit.pr_auc - 1.0).abs() < 1e-12);
    assert!((fit.roc_auc - 1.0).abs() < 1e-12);
    assert_eq!(fit.positives, 3);
    assert_eq!(fit.negatives, 3);
    assert_eq!(fit.points[0].recall, 0.0);
    assert_eq!(fit.points[0].precision, 1.0);
}

#[test]
fn alignment_is_by_name() {
    let inferred = matrix(
        &["P2", "P1"],
        &["s2", "s1", "s0"],
        &[vec![0.2, 0.8, 0.1], vec![0.8, 0.2, 0.9]],
    );
    let fit = evaluate(&inferred, &truth()).unwrap();
    assert!((fit.roc_auc - 1.0).abs() < 1e-12);
}

#[test]
fn mismatched_names_are_rejected() {
    let inferred = matrix(&["P1", "P3"], &["s0", "s1", "s2"], &[vec![0.0; 3], vec![0.0; 3]]);
    assert!(matches!(
        evaluate(&inferred, &truth()),
        Err(EvaluationError::DimensionMismatch { .. })
    ));
}

#[test]
fn truth_without_positives_is_rejected() {
    let empty = matrix(&["P1"], &["s0"], &[vec![0.0]]);
    assert_eq!(evaluate(&empty, &empty), Err(EvaluationError::NoPositives));
}

#[test]
fn all_positive_truth_has_neutral_roc() {
    let truth = matrix(&["P1"], &["s0", "s1"], &[vec![1.0, 1.0]]);
    let fit = evaluate(&truth, &truth).unwrap();
    assert_eq!(fit.roc_auc, 0.5);
    assert_eq!(fit.negatives, 0);
}

#[test]
fn fit_record_roundtrips_through_json() {
    let fit = evaluate(&truth(), &truth()).unwrap();
    let json = serde_json::to_string(&fit).unwrap();
    let back: FitRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, fit);
}

proptest! {
    #[test]
    fn areas_stay_in_unit_interval(
        scores in prop::collection::vec(0.0_f64..1.0, 6),
        truth_bits in prop::collection::vec(any::<bool>(), 6),
    ) {
        prop_assume!(truth_bits.iter().any(|&b| b));
        let cols = ["a", "b", "c", "d", "e", "f"];
        let inferred = matrix(&["P"], &cols, &[scores]);
        let truth = matrix(
            &["P"],
            &cols,
            &[truth_bits.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect()],
        );
        let fit = evaluate(&inferred, &truth).unwrap();
        prop_assert!((0.0..=1.0 + 1e-12).contains(&fit.pr_auc));
        prop_assert!((0.0..=1.0).contains(&fit.roc_auc));
        let last = fit.points.last().unwrap();
        prop_assert!((last.recall - 1.0).abs() < 1e-12);
    }
}
