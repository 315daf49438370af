// src/scoring/pair_scorer.rs
// Pairwise scoring collaborator interface and the bundled adapter: an
// ensemble of lightweight multinomial logistic members whose weights are
// loaded once from a serialized checkpoint.

use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use log::debug;
use lru::LruCache;
use serde::{Deserialize, Serialize};

use crate::models::matching::MemberPrediction;
use crate::scoring::features::FeatureStrategy;

/// Class index the pair ensemble assigns to "no match".
pub const NO_MATCH_CLASS: usize = 0;
/// Class index the pair ensemble assigns to "match".
pub const MATCH_CLASS: usize = 1;

const PAIR_CLASS_COUNT: usize = 2;
const FEATURE_CACHE_SIZE: usize = 10_000;

/// Pairwise binary classification over (query, candidate). Member count and
/// order are fixed at construction and stable across calls.
pub trait PairScorer: Send + Sync {
    fn predict(&self, query: &str, candidate: &str) -> Result<Vec<MemberPrediction>>;
}

/// One ensemble member: a multinomial logistic unit. `weights` is
/// class-major, `weights[class][feature]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticMember {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

impl LogisticMember {
    pub fn validate(&self, classes: usize, dimension: usize) -> Result<()> {
        if self.weights.len() != classes || self.bias.len() != classes {
            bail!(
                "Member has {} weight rows / {} bias terms, expected {} classes",
                self.weights.len(),
                self.bias.len(),
                classes
            );
        }
        for (class, row) in self.weights.iter().enumerate() {
            if row.len() != dimension {
                bail!(
                    "Member class {} has {} weights, expected {} features",
                    class,
                    row.len(),
                    dimension
                );
            }
        }
        Ok(())
    }

    /// Softmax over the class logits; the predicted label is the argmax, with
    /// the lower class index winning exact ties.
    pub fn predict(&self, features: &[f64]) -> MemberPrediction {
        let logits: Vec<f64> = self
            .weights
            .iter()
            .zip(&self.bias)
            .map(|(row, bias)| {
                bias + row.iter().zip(features).map(|(w, f)| w * f).sum::<f64>()
            })
            .collect();

        let max_logit = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = logits.iter().map(|l| (l - max_logit).exp()).collect();
        let norm: f64 = exp.iter().sum();
        let probabilities: Vec<f64> = exp.iter().map(|e| e / norm).collect();

        let mut label = 0;
        for (class, &p) in probabilities.iter().enumerate() {
            if p > probabilities[label] {
                label = class;
            }
        }

        MemberPrediction {
            label,
            rank_probabilities: probabilities,
        }
    }
}

/// Serialized ensemble: feature strategy name, class count, and the member
/// weight sets in their fixed evaluation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleCheckpoint {
    pub strategy: String,
    pub classes: usize,
    pub members: Vec<LogisticMember>,
}

impl EnsembleCheckpoint {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read checkpoint {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse checkpoint {}", path.display()))
    }
}

/// The bundled pairwise scorer: N logistic members over one shared feature
/// strategy, with an LRU cache on the extracted pair features.
pub struct LogisticEnsembleScorer {
    strategy: FeatureStrategy,
    members: Vec<LogisticMember>,
    feature_cache: Mutex<LruCache<(String, String), Vec<f64>>>,
}

impl LogisticEnsembleScorer {
    pub fn from_checkpoint(checkpoint: EnsembleCheckpoint) -> Result<Self> {
        if checkpoint.classes != PAIR_CLASS_COUNT {
            bail!(
                "Pair scorer checkpoint declares {} classes, expected {}",
                checkpoint.classes,
                PAIR_CLASS_COUNT
            );
        }
        if checkpoint.members.is_empty() {
            bail!("Pair scorer checkpoint carries no ensemble members");
        }

        let strategy: FeatureStrategy = checkpoint.strategy.parse()?;
        for (idx, member) in checkpoint.members.iter().enumerate() {
            member
                .validate(checkpoint.classes, strategy.pair_dimension())
                .with_context(|| format!("Invalid ensemble member {}", idx))?;
        }

        debug!(
            "Loaded pair scorer: {} members, strategy {}",
            checkpoint.members.len(),
            strategy.name()
        );

        let cache_size = NonZeroUsize::new(FEATURE_CACHE_SIZE).expect("non-zero cache size");
        Ok(Self {
            strategy,
            members: checkpoint.members,
            feature_cache: Mutex::new(LruCache::new(cache_size)),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_checkpoint(EnsembleCheckpoint::load(path)?)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    fn pair_features(&self, query: &str, candidate: &str) -> Vec<f64> {
        let key = (query.to_string(), candidate.to_string());
        if let Ok(mut cache) = self.feature_cache.lock() {
            if let Some(features) = cache.get(&key) {
                return features.clone();
            }
        }
        let features = self.strategy.pair_features(query, candidate);
        if let Ok(mut cache) = self.feature_cache.lock() {
            cache.put(key, features.clone());
        }
        features
    }
}

impl PairScorer for LogisticEnsembleScorer {
    fn predict(&self, query: &str, candidate: &str) -> Result<Vec<MemberPrediction>> {
        let features = self.pair_features(query, candidate);
        Ok(self
            .members
            .iter()
            .map(|member| member.predict(&features))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // A member that pushes the match class in proportion to the jaro feature
    // (index 5 under char_overlap).
    fn similarity_member(scale: f64) -> LogisticMember {
        LogisticMember {
            weights: vec![vec![0.0; 6], vec![0.0, 0.0, 0.0, 0.0, 0.0, scale]],
            bias: vec![scale / 2.0, 0.0],
        }
    }

    fn checkpoint(members: Vec<LogisticMember>) -> EnsembleCheckpoint {
        EnsembleCheckpoint {
            strategy: "char_overlap".to_string(),
            classes: 2,
            members,
        }
    }

    #[test]
    fn test_member_softmax_is_a_distribution() {
        let member = similarity_member(4.0);
        let prediction = member.predict(&[1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
        let total: f64 = prediction.rank_probabilities.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(prediction.label, MATCH_CLASS);
    }

    #[test]
    fn test_identical_pair_scores_match() {
        let scorer =
            LogisticEnsembleScorer::from_checkpoint(checkpoint(vec![similarity_member(4.0)]))
                .unwrap();
        let predictions = scorer.predict("急性胃炎", "急性胃炎").unwrap();
        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].label, MATCH_CLASS);
    }

    #[test]
    fn test_disjoint_pair_scores_no_match() {
        let scorer =
            LogisticEnsembleScorer::from_checkpoint(checkpoint(vec![similarity_member(4.0)]))
                .unwrap();
        let predictions = scorer.predict("急性胃炎", "白内障").unwrap();
        assert_eq!(predictions[0].label, NO_MATCH_CLASS);
    }

    #[test]
    fn test_member_order_is_stable() {
        let scorer = LogisticEnsembleScorer::from_checkpoint(checkpoint(vec![
            similarity_member(4.0),
            similarity_member(0.5),
        ]))
        .unwrap();
        let first = scorer.predict("肺炎", "支原体肺炎").unwrap();
        let second = scorer.predict("肺炎", "支原体肺炎").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_dimension_mismatch_rejected_at_load() {
        let bad = EnsembleCheckpoint {
            strategy: "char_overlap".to_string(),
            classes: 2,
            members: vec![LogisticMember {
                weights: vec![vec![0.0; 3], vec![0.0; 3]],
                bias: vec![0.0, 0.0],
            }],
        };
        assert!(LogisticEnsembleScorer::from_checkpoint(bad).is_err());
    }

    #[test]
    fn test_unknown_strategy_rejected_at_load() {
        let mut bad = checkpoint(vec![similarity_member(1.0)]);
        bad.strategy = "customized".to_string();
        assert!(LogisticEnsembleScorer::from_checkpoint(bad).is_err());
    }

    #[test]
    fn test_empty_member_list_rejected_at_load() {
        assert!(LogisticEnsembleScorer::from_checkpoint(checkpoint(Vec::new())).is_err());
    }

    #[test]
    fn test_checkpoint_round_trips_through_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let serialized = serde_json::to_string(&checkpoint(vec![similarity_member(2.0)])).unwrap();
        file.write_all(serialized.as_bytes()).unwrap();
        let scorer = LogisticEnsembleScorer::load(file.path()).unwrap();
        assert_eq!(scorer.member_count(), 1);
    }
}
