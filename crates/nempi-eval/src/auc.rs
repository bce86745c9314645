//! ROC-AUC via the Wilcoxon-Mann-Whitney U statistic.
//!
//! O(N log N): sorts once, then a linear scan assigns average ranks to ties.

/// AUC from separate positive and negative score arrays. Higher scores mean
/// "more likely positive".
///
/// Returns 0.5 if either array is empty.
pub fn calculate_auc(pos_scores: &[f64], neg_scores: &[f64]) -> f64 {
    if pos_scores.is_empty() || neg_scores.is_empty() {
        return 0.5;
    }

    let mut all: Vec<(f64, bool)> = pos_scores
        .iter()
        .map(|&s| (s, true))
        .chain(neg_scores.iter().map(|&s| (s, false)))
        .collect();
    all.sort_by(|a, b| a.0.total_cmp(&b.0));

    // Average 1-based rank per tie group.
    let n = all.len();
    let mut ranks = vec![0.0f64; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j < n && all[j].0.total_cmp(&all[i].0).is_eq() {
            j += 1;
        }
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        ranks[i..j].fill(avg_rank);
        i = j;
    }

    let rank_sum_pos: f64 = all
        .iter()
        .zip(&ranks)
        .filter(|((_, positive), _)| *positive)
        .map(|(_, r)| r)
        .sum();

    let p = pos_scores.len() as f64;
    let ng = neg_scores.len() as f64;
    let u = rank_sum_pos - p * (p + 1.0) / 2.0;
    (u / (p * ng)).clamp(0.0, 1.0)
}
