// src/matching/selection.rs
// Converts scored candidates plus the predicted answer count into the final
// decision string.

use std::cmp::Ordering;

use strsim::jaro;

use crate::canonical::tables::ANSWER_SEPARATOR;
use crate::models::matching::{CountLabel, MatchLabel, ScoredCandidate};

// Below this maximum statistic the no-match regime is considered too
// uninformative to rank on, and string similarity takes over as the sort key.
const LOW_CONFIDENCE_CEILING: f64 = 0.3;
// Minimum final score for a candidate to join a many-answer decision.
const MULTI_ANSWER_SCORE_FLOOR: f64 = 0.5;
// Last candidate index inspected when assembling a many-answer decision. The
// bound is literal: the candidate at index 6 is inspected and discarded, so
// at most six names are appended.
const MULTI_ANSWER_MAX_INDEX: usize = 5;

#[derive(Debug)]
struct RankedCandidate<'a> {
    name: &'a str,
    score: f64,
}

/// Selects the final canonical names. Returns the empty string when no
/// candidate ever existed or nothing qualified.
pub fn select(count_label: CountLabel, scored: &[ScoredCandidate]) -> String {
    if scored.is_empty() {
        return String::new();
    }

    // Statistics over every candidate: match confidence, or no-match strength.
    let statistics: Vec<f64> = scored.iter().map(|c| c.statistic()).collect();

    // Primary selection: candidates the ensemble called a match, ranked by
    // confidence.
    let mut ranked: Vec<RankedCandidate> = scored
        .iter()
        .filter(|c| c.match_label == MatchLabel::Match)
        .map(|c| RankedCandidate {
            name: c.candidate.entry.canonical_name.as_str(),
            score: c.confidence,
        })
        .collect();

    if ranked.is_empty() {
        // Nothing matched outright: fall back to candidates whose no-match
        // strength beats the median. In the low-confidence regime the sort
        // key switches to edit-distance similarity against the query.
        let max_statistic = statistics.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let threshold = median(&statistics);

        for candidate in scored {
            let strength = 1.0 - candidate.confidence;
            if strength > threshold {
                let score = if max_statistic < LOW_CONFIDENCE_CEILING {
                    jaro(
                        &candidate.candidate.query,
                        &candidate.candidate.entry.canonical_name,
                    )
                } else {
                    strength
                };
                ranked.push(RankedCandidate {
                    name: candidate.candidate.entry.canonical_name.as_str(),
                    score,
                });
            }
        }
    }

    // Stable sort: equal scores keep original candidate order.
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    if ranked.is_empty() {
        return String::new();
    }

    match count_label {
        CountLabel::One => ranked[0].name.to_string(),
        CountLabel::Two => {
            if ranked.len() >= 2 {
                format!("{}{}{}", ranked[0].name, ANSWER_SEPARATOR, ranked[1].name)
            } else {
                ranked[0].name.to_string()
            }
        }
        CountLabel::Many => {
            let mut names = Vec::new();
            for (index, candidate) in ranked.iter().enumerate() {
                if index > MULTI_ANSWER_MAX_INDEX {
                    break;
                }
                if candidate.score > MULTI_ANSWER_SCORE_FLOOR {
                    names.push(candidate.name);
                }
            }
            if names.is_empty() {
                ranked[0].name.to_string()
            } else {
                names.join(ANSWER_SEPARATOR)
            }
        }
    }
}

// Median with interpolation on even lengths.
fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::matching::{Candidate, CandidateOrigin, VocabularyEntry};

    fn scored(
        query: &str,
        name: &str,
        match_label: MatchLabel,
        confidence: f64,
    ) -> ScoredCandidate {
        ScoredCandidate {
            candidate: Candidate {
                query: query.to_string(),
                entry: VocabularyEntry {
                    canonical_name: name.to_string(),
                    code: String::new(),
                },
                origin: CandidateOrigin::Approximate,
            },
            match_label,
            confidence,
        }
    }

    #[test]
    fn test_empty_candidates_yield_empty_decision() {
        assert_eq!(select(CountLabel::One, &[]), "");
        assert_eq!(select(CountLabel::Many, &[]), "");
    }

    #[test]
    fn test_count_one_returns_top_match() {
        let candidates = vec![
            scored("q", "伤寒", MatchLabel::Match, 0.9),
            scored("q", "带状疱疹", MatchLabel::Match, 0.7),
        ];
        assert_eq!(select(CountLabel::One, &candidates), "伤寒");
    }

    #[test]
    fn test_count_two_joins_top_two_by_confidence() {
        let candidates = vec![
            scored("q", "带状疱疹", MatchLabel::Match, 0.6),
            scored("q", "伤寒", MatchLabel::Match, 0.8),
        ];
        assert_eq!(select(CountLabel::Two, &candidates), "伤寒##带状疱疹");
    }

    #[test]
    fn test_count_two_with_single_match_returns_one() {
        let candidates = vec![
            scored("q", "伤寒", MatchLabel::Match, 0.8),
            scored("q", "带状疱疹", MatchLabel::NoMatch, 0.9),
        ];
        assert_eq!(select(CountLabel::Two, &candidates), "伤寒");
    }

    #[test]
    fn test_equal_confidences_keep_candidate_order() {
        let candidates = vec![
            scored("q", "甲", MatchLabel::Match, 0.8),
            scored("q", "乙", MatchLabel::Match, 0.8),
        ];
        assert_eq!(select(CountLabel::Two, &candidates), "甲##乙");
    }

    #[test]
    fn test_many_appends_above_score_floor() {
        let candidates = vec![
            scored("q", "一号", MatchLabel::Match, 0.9),
            scored("q", "二号", MatchLabel::Match, 0.8),
            scored("q", "三号", MatchLabel::Match, 0.4),
        ];
        assert_eq!(select(CountLabel::Many, &candidates), "一号##二号");
    }

    #[test]
    fn test_many_inspects_at_most_seven_and_appends_at_most_six() {
        let candidates: Vec<ScoredCandidate> = (0..9)
            .map(|i| {
                scored(
                    "q",
                    &format!("条目{}", i),
                    MatchLabel::Match,
                    0.99 - i as f64 * 0.01,
                )
            })
            .collect();
        let decision = select(CountLabel::Many, &candidates);
        assert_eq!(decision.split(ANSWER_SEPARATOR).count(), 6);
        assert!(decision.starts_with("条目0"));
        assert!(!decision.contains("条目6"));
    }

    #[test]
    fn test_many_with_no_qualifier_falls_back_to_top() {
        let candidates = vec![
            scored("q", "一号", MatchLabel::Match, 0.45),
            scored("q", "二号", MatchLabel::Match, 0.3),
        ];
        assert_eq!(select(CountLabel::Many, &candidates), "一号");
    }

    #[test]
    fn test_no_match_regime_ranks_by_strength_above_median() {
        // Max statistic 0.4 >= 0.3, so no-match strength stays the key.
        let candidates = vec![
            scored("q", "甲", MatchLabel::NoMatch, 0.60), // strength 0.40
            scored("q", "乙", MatchLabel::NoMatch, 0.65), // strength 0.35
            scored("q", "丙", MatchLabel::NoMatch, 0.90), // strength 0.10
            scored("q", "丁", MatchLabel::NoMatch, 0.95), // strength 0.05
        ];
        // Median of [0.40, 0.35, 0.10, 0.05] is 0.225; 甲 and 乙 qualify.
        assert_eq!(select(CountLabel::Two, &candidates), "甲##乙");
    }

    #[test]
    fn test_low_confidence_regime_switches_to_similarity() {
        // All strengths below 0.3: ranking must follow string similarity,
        // which disagrees with the strength order here.
        let query = "急性胃肠炎";
        let candidates = vec![
            scored(query, "急性胃肠炎", MatchLabel::NoMatch, 0.80), // strength 0.20, similarity 1.0
            scored(query, "白内障", MatchLabel::NoMatch, 0.75),     // strength 0.25, similarity 0.0
            scored(query, "丙", MatchLabel::NoMatch, 0.90),         // strength 0.10
            scored(query, "丁", MatchLabel::NoMatch, 0.95),         // strength 0.05
        ];
        // Median of [0.20, 0.25, 0.10, 0.05] is 0.15; the first two qualify.
        // Strength order would put 白内障 first; similarity order wins.
        assert_eq!(select(CountLabel::Two, &candidates), "急性胃肠炎##白内障");
    }

    #[test]
    fn test_single_no_match_candidate_never_beats_its_own_median() {
        let candidates = vec![scored("q", "甲", MatchLabel::NoMatch, 0.6)];
        assert_eq!(select(CountLabel::One, &candidates), "");
    }

    #[test]
    fn test_median_interpolates_even_lengths() {
        assert!((median(&[0.1, 0.2]) - 0.15).abs() < 1e-9);
        assert!((median(&[0.3, 0.1, 0.2]) - 0.2).abs() < 1e-9);
    }
}
