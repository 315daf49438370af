// src/candidate_generation/approximate.rs
// Approximate recall collaborator interface. The real deployment fronts a
// full-text search service; the bundled adapter ranks the vocabulary by
// string similarity as a best-effort local stand-in.

use std::cmp::Ordering;
use std::sync::Arc;

use anyhow::Result;
use strsim::jaro;

use crate::candidate_generation::vocabulary::Vocabulary;
use crate::models::matching::RecallHit;

/// Ranked best-effort recall over the vocabulary. No uniqueness or
/// completeness guarantee; empty results are a valid answer.
pub trait ApproximateRecall: Send + Sync {
    fn search(&self, canonical_query: &str, limit: usize) -> Result<Vec<RecallHit>>;
}

/// Ranks every vocabulary entry by Jaro similarity against the canonical
/// query, descending; equal scores order by name so ranking is stable.
pub struct JaroRankedRecall {
    vocabulary: Arc<Vocabulary>,
}

impl JaroRankedRecall {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self { vocabulary }
    }
}

impl ApproximateRecall for JaroRankedRecall {
    fn search(&self, canonical_query: &str, limit: usize) -> Result<Vec<RecallHit>> {
        let mut ranked: Vec<(f64, &str)> = self
            .vocabulary
            .entries()
            .iter()
            .map(|entry| {
                (
                    jaro(canonical_query, &entry.canonical_name),
                    entry.canonical_name.as_str(),
                )
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.cmp(b.1))
        });

        Ok(ranked
            .into_iter()
            .take(limit)
            .map(|(_, name)| RecallHit {
                entity_name: name.to_string(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary() -> Arc<Vocabulary> {
        Arc::new(
            Vocabulary::from_rows(vec![
                ("J18".to_string(), "肺炎".to_string()),
                ("J18.9".to_string(), "支原体肺炎".to_string()),
                ("H25".to_string(), "白内障".to_string()),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_closest_entry_ranks_first() {
        let recall = JaroRankedRecall::new(vocabulary());
        let hits = recall.search("支原体肺炎", 3).unwrap();
        assert_eq!(hits[0].entity_name, "支原体肺炎");
    }

    #[test]
    fn test_limit_respected() {
        let recall = JaroRankedRecall::new(vocabulary());
        assert_eq!(recall.search("肺炎", 2).unwrap().len(), 2);
        assert_eq!(recall.search("肺炎", 0).unwrap().len(), 0);
    }

    #[test]
    fn test_empty_query_still_ranks() {
        let recall = JaroRankedRecall::new(vocabulary());
        let hits = recall.search("", 3).unwrap();
        assert_eq!(hits.len(), 3);
    }
}
