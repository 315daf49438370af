// src/matching/resolver.rs
// End-to-end orchestration of the normalization pipeline: canonicalize,
// recall, score, vote, select. One resolver is built at startup and shared
// read-only across request tasks.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use log::{debug, info, warn};

use crate::canonical::canonicalize;
use crate::canonical::tables::ANSWER_SEPARATOR;
use crate::candidate_generation::{
    aggregate_candidates, ApproximateRecall, PatternAutomaton, Vocabulary,
};
use crate::matching::selection;
use crate::models::matching::{MatchLabel, ScoredCandidate};
use crate::models::stats_models::ResolutionStats;
use crate::scoring::ensemble::vote_with_confidence;
use crate::scoring::pair_scorer::MATCH_CLASS;
use crate::scoring::{CountPredictor, PairScorer};

const DEFAULT_APPROXIMATE_LIMIT: usize = 100;

#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Rank positions of approximate recall inspected per query.
    pub approximate_limit: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            approximate_limit: DEFAULT_APPROXIMATE_LIMIT,
        }
    }
}

pub struct DiagnosisResolver {
    vocabulary: Arc<Vocabulary>,
    automaton: PatternAutomaton,
    recall: Box<dyn ApproximateRecall>,
    scorer: Box<dyn PairScorer>,
    count_predictor: Box<dyn CountPredictor>,
    options: ResolverOptions,
}

impl DiagnosisResolver {
    /// Builds the automaton over the vocabulary and wires the collaborators.
    /// Fails only on startup-fatal conditions (empty vocabulary).
    pub fn new(
        vocabulary: Arc<Vocabulary>,
        recall: Box<dyn ApproximateRecall>,
        scorer: Box<dyn PairScorer>,
        count_predictor: Box<dyn CountPredictor>,
        options: ResolverOptions,
    ) -> Result<Self> {
        let automaton = PatternAutomaton::build(vocabulary.names().map(str::to_string))?;
        info!(
            "Resolver ready: {} vocabulary entries, fingerprint {}",
            vocabulary.len(),
            &vocabulary.fingerprint()[..12]
        );
        Ok(Self {
            vocabulary,
            automaton,
            recall,
            scorer,
            count_predictor,
            options,
        })
    }

    /// Resolves one raw query to its decision string: empty, one canonical
    /// name, or several joined by the separator. Collaborator failures
    /// degrade; this never errors.
    pub fn resolve(&self, raw_query: &str) -> String {
        self.resolve_detailed(raw_query).0
    }

    pub fn resolve_detailed(&self, raw_query: &str) -> (String, ResolutionStats) {
        let start = Instant::now();
        let mut stats = ResolutionStats::default();
        let query = raw_query.trim_matches('\n').trim();

        let count_label = match self.count_predictor.predict(query) {
            Ok(Some(label)) => label,
            Ok(None) => {
                warn!("Count prediction returned no vote for {:?}", query);
                stats.processing_time = start.elapsed();
                return (String::new(), stats);
            }
            Err(e) => {
                warn!("Count prediction failed for {:?}: {}", query, e);
                stats.processing_time = start.elapsed();
                return (String::new(), stats);
            }
        };
        stats.predicted_count = Some(count_label);

        let canonical = canonicalize(query);
        let exact = self.automaton.find_matches(&canonical);
        stats.exact_hits = exact.len();

        let approximate = match self
            .recall
            .search(&canonical, self.options.approximate_limit)
        {
            Ok(hits) => hits,
            Err(e) => {
                warn!("Approximate recall failed for {:?}: {}", canonical, e);
                Vec::new()
            }
        };
        stats.approximate_hits = approximate.len();

        let candidates = aggregate_candidates(
            query,
            &exact,
            &approximate,
            self.options.approximate_limit,
            &self.vocabulary,
        );
        stats.candidates = candidates.len();

        let mut scored = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let predictions = match self
                .scorer
                .predict(&candidate.query, &candidate.entry.canonical_name)
            {
                Ok(predictions) => predictions,
                Err(e) => {
                    warn!(
                        "Pair scoring failed for ({:?}, {:?}): {}",
                        candidate.query, candidate.entry.canonical_name, e
                    );
                    continue;
                }
            };
            match vote_with_confidence(&predictions) {
                Some((class, confidence)) => {
                    let match_label = if class == MATCH_CLASS {
                        MatchLabel::Match
                    } else {
                        MatchLabel::NoMatch
                    };
                    scored.push(ScoredCandidate {
                        candidate,
                        match_label,
                        confidence,
                    });
                }
                None => {
                    debug!(
                        "Empty prediction vector for candidate {:?}; skipped",
                        candidate.entry.canonical_name
                    );
                }
            }
        }
        stats.scored_candidates = scored.len();
        stats.matched_candidates = scored
            .iter()
            .filter(|c| c.match_label == MatchLabel::Match)
            .count();

        let decision = selection::select(count_label, &scored);
        stats.targets_emitted = if decision.is_empty() {
            0
        } else {
            decision.split(ANSWER_SEPARATOR).count()
        };
        stats.processing_time = start.elapsed();

        debug!(
            "Resolved {:?}: {} exact, {} approximate, {} scored, decision {:?}",
            query, stats.exact_hits, stats.approximate_hits, stats.scored_candidates, decision
        );
        (decision, stats)
    }
}
