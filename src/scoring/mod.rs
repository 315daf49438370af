// src/scoring/mod.rs
//! Ensemble scoring: feature extraction strategies, the majority-vote
//! aggregation, and the pairwise / answer-count collaborator adapters.

pub mod count_predictor;
pub mod ensemble;
pub mod features;
pub mod pair_scorer;

pub use count_predictor::{CountPredictor, EnsembleCountPredictor};
pub use ensemble::{vote, vote_with_confidence};
pub use features::FeatureStrategy;
pub use pair_scorer::{
    EnsembleCheckpoint, LogisticEnsembleScorer, LogisticMember, PairScorer, MATCH_CLASS,
    NO_MATCH_CLASS,
};
