// src/models/matching.rs
// Core data types flowing through the normalization pipeline.

use serde::{Deserialize, Serialize};

/// One immutable entry of the disease reference vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub canonical_name: String,
    pub code: String,
}

/// Which recall source produced a candidate. Exact recall is authoritative:
/// an entry returned by both sources is recorded as `Exact`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateOrigin {
    Exact,
    Approximate,
}

/// A vocabulary entry paired with the query it was recalled for.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub query: String,
    pub entry: VocabularyEntry,
    pub origin: CandidateOrigin,
}

/// Pairwise verdict for one (query, candidate) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchLabel {
    Match,
    NoMatch,
}

/// A candidate with the ensemble's verdict attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub match_label: MatchLabel,
    pub confidence: f64,
}

impl ScoredCandidate {
    /// Value this candidate contributes to the selection statistics list:
    /// match confidence for matches, no-match strength otherwise.
    pub fn statistic(&self) -> f64 {
        match self.match_label {
            MatchLabel::Match => self.confidence,
            MatchLabel::NoMatch => 1.0 - self.confidence,
        }
    }
}

/// Predicted cardinality of the final answer set. Queries naming more than
/// two targets share the `Many` class, which sits at index 0 of the
/// classifier label space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountLabel {
    Many,
    One,
    Two,
}

impl CountLabel {
    pub fn from_class_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(CountLabel::Many),
            1 => Some(CountLabel::One),
            2 => Some(CountLabel::Two),
            _ => None,
        }
    }
}

/// One ensemble member's output for a single input: its predicted class and
/// the probability mass it assigns to each class. `label` indexes
/// `rank_probabilities`.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberPrediction {
    pub label: usize,
    pub rank_probabilities: Vec<f64>,
}

/// One ranked hit from the approximate recall collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecallHit {
    pub entity_name: String,
}
