// src/scoring/count_predictor.rs
// Answer-count classification: predicts whether a raw query names one, two,
// or many canonical targets, backed by the same voting scheme as pairwise
// scoring.

use std::path::Path;

use anyhow::{bail, Context, Result};
use log::debug;

use crate::models::matching::CountLabel;
use crate::scoring::ensemble;
use crate::scoring::features::FeatureStrategy;
use crate::scoring::pair_scorer::{EnsembleCheckpoint, LogisticMember};

const COUNT_CLASS_COUNT: usize = 3;

/// Answer-count collaborator. `Ok(None)` is the recoverable no-vote case
/// (empty ensemble output), not an error.
pub trait CountPredictor: Send + Sync {
    fn predict(&self, raw_query: &str) -> Result<Option<CountLabel>>;
}

/// The bundled predictor: N logistic members over query shape features,
/// aggregated with the ensemble vote. Class indices follow the label space
/// `{0: many, 1: one, 2: two}`.
pub struct EnsembleCountPredictor {
    strategy: FeatureStrategy,
    members: Vec<LogisticMember>,
}

impl EnsembleCountPredictor {
    pub fn from_checkpoint(checkpoint: EnsembleCheckpoint) -> Result<Self> {
        if checkpoint.classes != COUNT_CLASS_COUNT {
            bail!(
                "Count predictor checkpoint declares {} classes, expected {}",
                checkpoint.classes,
                COUNT_CLASS_COUNT
            );
        }
        if checkpoint.members.is_empty() {
            bail!("Count predictor checkpoint carries no ensemble members");
        }

        let strategy: FeatureStrategy = checkpoint.strategy.parse()?;
        for (idx, member) in checkpoint.members.iter().enumerate() {
            member
                .validate(checkpoint.classes, strategy.query_dimension())
                .with_context(|| format!("Invalid ensemble member {}", idx))?;
        }

        debug!(
            "Loaded count predictor: {} members, strategy {}",
            checkpoint.members.len(),
            strategy.name()
        );

        Ok(Self {
            strategy,
            members: checkpoint.members,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_checkpoint(EnsembleCheckpoint::load(path)?)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

impl CountPredictor for EnsembleCountPredictor {
    fn predict(&self, raw_query: &str) -> Result<Option<CountLabel>> {
        let normalized = raw_query.trim().to_lowercase();
        let features = self.strategy.query_features(&normalized);
        let predictions: Vec<_> = self
            .members
            .iter()
            .map(|member| member.predict(&features))
            .collect();

        Ok(ensemble::vote(&predictions).and_then(CountLabel::from_class_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A member voting a fixed class regardless of input.
    fn constant_member(class: usize) -> LogisticMember {
        let mut bias = vec![0.0; COUNT_CLASS_COUNT];
        bias[class] = 8.0;
        LogisticMember {
            weights: vec![vec![0.0; 6]; COUNT_CLASS_COUNT],
            bias,
        }
    }

    fn checkpoint(members: Vec<LogisticMember>) -> EnsembleCheckpoint {
        EnsembleCheckpoint {
            strategy: "char_overlap".to_string(),
            classes: COUNT_CLASS_COUNT,
            members,
        }
    }

    #[test]
    fn test_class_indices_map_onto_count_labels() {
        for (class, expected) in [
            (0, CountLabel::Many),
            (1, CountLabel::One),
            (2, CountLabel::Two),
        ] {
            let predictor = EnsembleCountPredictor::from_checkpoint(checkpoint(vec![
                constant_member(class),
                constant_member(class),
            ]))
            .unwrap();
            assert_eq!(predictor.predict("高血压").unwrap(), Some(expected));
        }
    }

    #[test]
    fn test_majority_across_members() {
        let predictor = EnsembleCountPredictor::from_checkpoint(checkpoint(vec![
            constant_member(1),
            constant_member(1),
            constant_member(2),
        ]))
        .unwrap();
        assert_eq!(predictor.predict("高血压").unwrap(), Some(CountLabel::One));
    }

    #[test]
    fn test_two_class_checkpoint_rejected() {
        let mut bad = checkpoint(vec![constant_member(0)]);
        bad.classes = 2;
        bad.members = vec![LogisticMember {
            weights: vec![vec![0.0; 6]; 2],
            bias: vec![0.0; 2],
        }];
        assert!(EnsembleCountPredictor::from_checkpoint(bad).is_err());
    }
}
