// src/scoring/ensemble.rs
// Majority voting over ensemble member predictions, with the
// probability-mass tie-break used both for answer-count classification and
// per-candidate match scoring.

use ndarray::Array2;

use crate::models::matching::MemberPrediction;

/// Aggregates the ordered member predictions into one class label.
///
/// Returns `None` for an empty prediction slice, the recoverable no-vote
/// case, distinct from startup-fatal conditions. Labels are counted in
/// first-seen order; single-vote labels are treated as noise unless every
/// label got a single vote. A true tie at the maximum count is broken by the
/// *smaller* aggregate probability mass across members. That polarity is part
/// of the contract and must not be "fixed": downstream fixtures depend on it.
pub fn vote(predictions: &[MemberPrediction]) -> Option<usize> {
    if predictions.is_empty() {
        return None;
    }

    // Occurrence counts, first-seen order preserved for tie-breaking.
    let mut counts: Vec<(usize, usize)> = Vec::new();
    for prediction in predictions {
        match counts.iter_mut().find(|(label, _)| *label == prediction.label) {
            Some((_, n)) => *n += 1,
            None => counts.push((prediction.label, 1)),
        }
    }

    let max_count = counts.iter().map(|&(_, n)| n).max()?;

    let survivors: Vec<usize> = counts
        .iter()
        .filter(|&&(_, n)| n != 1 && n == max_count)
        .map(|&(label, _)| label)
        .collect();

    if survivors.is_empty() {
        // Every label got exactly one vote: fall back to the first-seen most
        // frequent label.
        return counts
            .iter()
            .find(|&&(_, n)| n == max_count)
            .map(|&(label, _)| label);
    }
    if survivors.len() == 1 {
        return Some(survivors[0]);
    }

    // Member x class probability matrix; short vectors pad with zero mass.
    let width = predictions
        .iter()
        .map(|p| p.rank_probabilities.len())
        .max()
        .unwrap_or(0);
    let mut matrix = Array2::<f64>::zeros((predictions.len(), width));
    for (row, prediction) in predictions.iter().enumerate() {
        for (col, &mass) in prediction.rank_probabilities.iter().enumerate() {
            matrix[[row, col]] = mass;
        }
    }

    let mut winner = None;
    let mut winner_mass = f64::INFINITY;
    for &label in &survivors {
        let mass = if label < width {
            matrix.column(label).sum()
        } else {
            0.0
        };
        // Strict comparison keeps the earlier tied label on equal sums.
        if mass < winner_mass {
            winner = Some(label);
            winner_mass = mass;
        }
    }
    winner
}

/// Votes and derives a confidence for the winning label: the mean probability
/// mass the members assign to it, clamped to [0, 1].
pub fn vote_with_confidence(predictions: &[MemberPrediction]) -> Option<(usize, f64)> {
    let winner = vote(predictions)?;
    let mass: f64 = predictions
        .iter()
        .map(|p| p.rank_probabilities.get(winner).copied().unwrap_or(0.0))
        .sum();
    let confidence = (mass / predictions.len() as f64).clamp(0.0, 1.0);
    Some((winner, confidence))
}
