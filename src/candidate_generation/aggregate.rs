// src/candidate_generation/aggregate.rs
// Merges exact automaton hits with ranked approximate hits into one
// deduplicated candidate list for the pairwise scorer.

use std::collections::HashSet;

use log::debug;

use crate::candidate_generation::vocabulary::Vocabulary;
use crate::models::matching::{Candidate, CandidateOrigin, RecallHit};

/// Exact hits come first, in automaton emission order, then the first
/// `approximate_limit` approximate hits in rank order. Names already present
/// and names unknown to the vocabulary are skipped, so the output carries no
/// duplicate canonical names and is bounded by
/// `|exact| + approximate_limit`.
pub fn aggregate_candidates(
    query: &str,
    exact: &[&str],
    approximate: &[RecallHit],
    approximate_limit: usize,
    vocabulary: &Vocabulary,
) -> Vec<Candidate> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates = Vec::new();

    for &name in exact {
        match vocabulary.get(name) {
            Some(entry) => {
                if seen.insert(entry.canonical_name.clone()) {
                    candidates.push(Candidate {
                        query: query.to_string(),
                        entry: entry.clone(),
                        origin: CandidateOrigin::Exact,
                    });
                }
            }
            None => {
                debug!("Exact hit {:?} missing from vocabulary; skipped", name);
            }
        }
    }

    for hit in approximate.iter().take(approximate_limit) {
        if seen.contains(&hit.entity_name) {
            continue;
        }
        match vocabulary.get(&hit.entity_name) {
            Some(entry) => {
                seen.insert(entry.canonical_name.clone());
                candidates.push(Candidate {
                    query: query.to_string(),
                    entry: entry.clone(),
                    origin: CandidateOrigin::Approximate,
                });
            }
            None => {
                debug!(
                    "Approximate hit {:?} missing from vocabulary; skipped",
                    hit.entity_name
                );
            }
        }
    }

    candidates
}
