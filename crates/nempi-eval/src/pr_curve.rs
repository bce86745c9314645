//! Precision-recall curve over descending score thresholds.

use serde::{Deserialize, Serialize};

/// One point of the curve. `threshold` is `None` for the starting point, which
/// lies above every score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrPoint {
    pub threshold: Option<f64>,
    pub precision: f64,
    pub recall: f64,
}

/// Sweep every distinct score from high to low, predicting positive at or above
/// it. Starts at recall 0 / precision 1. Non-finite scores never predict positive.
pub fn pr_curve(scores: &[f64], labels: &[bool]) -> Vec<PrPoint> {
    let total_pos = labels.iter().filter(|&&l| l).count();
    let mut ranked: Vec<(f64, bool)> = scores
        .iter()
        .copied()
        .zip(labels.iter().copied())
        .filter(|(s, _)| s.is_finite())
        .collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut points = vec![PrPoint {
        threshold: None,
        precision: 1.0,
        recall: 0.0,
    }];
    let (mut tp, mut fp) = (0usize, 0usize);
    let mut i = 0;
    while i < ranked.len() {
        let threshold = ranked[i].0;
        while i < ranked.len() && ranked[i].0 == threshold {
            if ranked[i].1 {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        points.push(PrPoint {
            threshold: Some(threshold),
            precision: tp as f64 / (tp + fp) as f64,
            recall: if total_pos == 0 {
                0.0
            } else {
                tp as f64 / total_pos as f64
            },
        });
    }
    points
}

/// Area under the curve, trapezoid rule over recall.
pub fn pr_auc(points: &[PrPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| (w[1].recall - w[0].recall) * (w[1].precision + w[0].precision) / 2.0)
        .sum()
}
