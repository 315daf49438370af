// src/scoring/features.rs
// Feature extraction strategies for the ensemble classifiers. The strategy is
// a closed set resolved once from checkpoint metadata at construction, never
// re-dispatched per call.

use std::collections::HashSet;
use std::str::FromStr;

use anyhow::bail;
use strsim::{jaro, jaro_winkler, normalized_levenshtein};

const PAIR_DIMENSION: usize = 6;
const QUERY_DIMENSION: usize = 6;

// Characters that delimit independently-codable segments of a raw query.
const SEGMENT_SEPARATORS: [char; 8] = ['+', '＋', '，', ',', '、', ';', '；', ' '];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureStrategy {
    CharOverlap,
    TokenOverlap,
    EditDistance,
}

impl FromStr for FeatureStrategy {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "char_overlap" => Ok(FeatureStrategy::CharOverlap),
            "token_overlap" => Ok(FeatureStrategy::TokenOverlap),
            "edit_distance" => Ok(FeatureStrategy::EditDistance),
            other => bail!("Unknown feature strategy {:?}", other),
        }
    }
}

impl FeatureStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            FeatureStrategy::CharOverlap => "char_overlap",
            FeatureStrategy::TokenOverlap => "token_overlap",
            FeatureStrategy::EditDistance => "edit_distance",
        }
    }

    pub fn pair_dimension(&self) -> usize {
        PAIR_DIMENSION
    }

    pub fn query_dimension(&self) -> usize {
        QUERY_DIMENSION
    }

    /// Similarity features for a (query, candidate) pair. Every value lies in
    /// [0, 1].
    pub fn pair_features(&self, query: &str, candidate: &str) -> Vec<f64> {
        match self {
            FeatureStrategy::CharOverlap => {
                let q_chars = char_set(query);
                let c_chars = char_set(candidate);
                let overlap = q_chars.intersection(&c_chars).count() as f64;
                vec![
                    jaccard(&q_chars, &c_chars),
                    dice(&char_bigrams(query), &char_bigrams(candidate)),
                    overlap / q_chars.len().max(1) as f64,
                    overlap / c_chars.len().max(1) as f64,
                    length_ratio(query, candidate),
                    jaro(query, candidate),
                ]
            }
            FeatureStrategy::TokenOverlap => {
                let q_tokens = token_set(query);
                let c_tokens = token_set(candidate);
                let shared = q_tokens.intersection(&c_tokens).count() as f64;
                vec![
                    jaccard(&q_tokens, &c_tokens),
                    dice(&q_tokens, &c_tokens),
                    shared / q_tokens.len().max(c_tokens.len()).max(1) as f64,
                    jaccard(&char_set(query), &char_set(candidate)),
                    length_ratio(query, candidate),
                    jaro_winkler(query, candidate),
                ]
            }
            FeatureStrategy::EditDistance => vec![
                normalized_levenshtein(query, candidate),
                jaro(query, candidate),
                jaro_winkler(query, candidate),
                common_prefix_ratio(query, candidate),
                common_suffix_ratio(query, candidate),
                length_ratio(query, candidate),
            ],
        }
    }

    /// Shape features for a single raw query, used by the answer-count
    /// classifier. Independent of the pairwise variant.
    pub fn query_features(&self, text: &str) -> Vec<f64> {
        let chars: Vec<char> = text.chars().collect();
        let total = chars.len().max(1) as f64;
        let digits = chars.iter().filter(|c| c.is_ascii_digit()).count() as f64;
        let letters = chars.iter().filter(|c| c.is_ascii_alphabetic()).count() as f64;
        let separators = chars
            .iter()
            .filter(|c| SEGMENT_SEPARATORS.contains(*c))
            .count() as f64;
        let segments = text
            .split(|c| SEGMENT_SEPARATORS.contains(&c))
            .filter(|s| !s.trim().is_empty())
            .count() as f64;

        vec![
            (chars.len() as f64 / 32.0).min(1.0),
            (segments / 8.0).min(1.0),
            (separators / 8.0).min(1.0),
            digits / total,
            letters / total,
            if chars.len() > 12 { 1.0 } else { 0.0 },
        ]
    }
}

fn char_set(text: &str) -> HashSet<char> {
    text.chars().collect()
}

fn char_bigrams(text: &str) -> HashSet<(char, char)> {
    let chars: Vec<char> = text.chars().collect();
    chars.windows(2).map(|w| (w[0], w[1])).collect()
}

fn token_set(text: &str) -> HashSet<String> {
    text.split_whitespace().map(|t| t.to_string()).collect()
}

fn jaccard<T: std::hash::Hash + Eq>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

fn dice<T: std::hash::Hash + Eq>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }
    2.0 * a.intersection(b).count() as f64 / total as f64
}

fn length_ratio(a: &str, b: &str) -> f64 {
    let la = a.chars().count();
    let lb = b.chars().count();
    if la == 0 && lb == 0 {
        return 1.0;
    }
    la.min(lb) as f64 / la.max(lb).max(1) as f64
}

fn common_prefix_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let max_len = a_chars.len().max(b_chars.len());
    if max_len == 0 {
        return 1.0;
    }
    let shared = a_chars
        .iter()
        .zip(&b_chars)
        .take_while(|(x, y)| x == y)
        .count();
    shared as f64 / max_len as f64
}

fn common_suffix_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let max_len = a_chars.len().max(b_chars.len());
    if max_len == 0 {
        return 1.0;
    }
    let shared = a_chars
        .iter()
        .rev()
        .zip(b_chars.iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    shared as f64 / max_len as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parsing() {
        assert_eq!(
            "char_overlap".parse::<FeatureStrategy>().unwrap(),
            FeatureStrategy::CharOverlap
        );
        assert_eq!(
            "edit_distance".parse::<FeatureStrategy>().unwrap(),
            FeatureStrategy::EditDistance
        );
        assert!("transfomer".parse::<FeatureStrategy>().is_err());
    }

    #[test]
    fn test_pair_feature_dimensions() {
        for strategy in [
            FeatureStrategy::CharOverlap,
            FeatureStrategy::TokenOverlap,
            FeatureStrategy::EditDistance,
        ] {
            let features = strategy.pair_features("急性胃炎", "慢性胃炎");
            assert_eq!(features.len(), strategy.pair_dimension());
            for value in features {
                assert!((0.0..=1.0).contains(&value));
            }
        }
    }

    #[test]
    fn test_identical_pair_saturates_similarity() {
        let features = FeatureStrategy::CharOverlap.pair_features("肺炎", "肺炎");
        for value in features {
            assert!((value - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_disjoint_pair_scores_low() {
        let features = FeatureStrategy::CharOverlap.pair_features("肺炎", "白内障");
        assert!(features[0] < 1e-9);
        assert!(features[1] < 1e-9);
    }

    #[test]
    fn test_query_features_bounded() {
        for text in ["", "高血压", "1.高血压 2.冠心病＋心衰"] {
            let features = FeatureStrategy::CharOverlap.query_features(text);
            assert_eq!(features.len(), FeatureStrategy::CharOverlap.query_dimension());
            for value in features {
                assert!((0.0..=1.0).contains(&value));
            }
        }
    }

    #[test]
    fn test_segment_count_reflects_separators() {
        let single = FeatureStrategy::CharOverlap.query_features("高血压");
        let multi = FeatureStrategy::CharOverlap.query_features("高血压+冠心病+心衰");
        assert!(multi[1] > single[1]);
    }
}
