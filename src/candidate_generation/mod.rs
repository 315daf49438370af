// src/candidate_generation/mod.rs
//! Candidate recall: the exact multi-pattern automaton, the approximate
//! recall collaborator interface, and the aggregation that merges both into
//! one deduplicated candidate set per query.

pub mod aggregate;
pub mod approximate;
pub mod automaton;
pub mod vocabulary;

pub use aggregate::aggregate_candidates;
pub use approximate::{ApproximateRecall, JaroRankedRecall};
pub use automaton::PatternAutomaton;
pub use vocabulary::Vocabulary;
