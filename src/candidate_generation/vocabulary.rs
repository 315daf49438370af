// src/candidate_generation/vocabulary.rs
// The static disease reference table. Loaded once at startup, read-only for
// the process lifetime; shared across request tasks without locking.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::debug;
use sha2::{Digest, Sha256};

use crate::models::matching::VocabularyEntry;

// Rows carrying this name are placeholders in the reference table, not
// diagnoses.
const PLACEHOLDER_NAME: &str = "N";

#[derive(Debug, Clone)]
pub struct Vocabulary {
    entries: Vec<VocabularyEntry>,
    by_name: HashMap<String, usize>,
    fingerprint: String,
}

impl Vocabulary {
    /// Loads a `code<TAB>name` reference table. Quote characters are stripped
    /// from names, placeholder rows dropped, and duplicate names collapsed to
    /// the entry with the longest code. Fails if the file is malformed or the
    /// vocabulary ends up empty (startup-fatal, not a per-request error).
    pub fn load_tsv(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read vocabulary file {}", path.display()))?;

        let mut rows = Vec::new();
        for (line_no, line) in raw.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let (code, name) = line
                .split_once('\t')
                .with_context(|| format!("Malformed vocabulary row at line {}", line_no + 1))?;
            rows.push((code.trim().to_string(), name.replace('"', "").trim().to_string()));
        }

        let vocabulary = Self::from_rows(rows)?;
        debug!(
            "Loaded {} vocabulary entries from {}",
            vocabulary.len(),
            path.display()
        );
        Ok(vocabulary)
    }

    /// Builds the vocabulary from `(code, name)` rows, preserving first-seen
    /// name order.
    pub fn from_rows(rows: Vec<(String, String)>) -> Result<Self> {
        let mut entries: Vec<VocabularyEntry> = Vec::new();
        let mut by_name: HashMap<String, usize> = HashMap::new();

        for (code, name) in rows {
            if name.is_empty() || name == PLACEHOLDER_NAME {
                continue;
            }
            match by_name.get(&name) {
                Some(&idx) => {
                    // Duplicate name: the longest code wins, first-seen on ties.
                    if code.chars().count() > entries[idx].code.chars().count() {
                        entries[idx].code = code;
                    }
                }
                None => {
                    by_name.insert(name.clone(), entries.len());
                    entries.push(VocabularyEntry {
                        canonical_name: name,
                        code,
                    });
                }
            }
        }

        if entries.is_empty() {
            bail!("Vocabulary is empty after normalization");
        }

        let fingerprint = fingerprint_entries(&entries);
        Ok(Self {
            entries,
            by_name,
            fingerprint,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, canonical_name: &str) -> Option<&VocabularyEntry> {
        self.by_name
            .get(canonical_name)
            .map(|&idx| &self.entries[idx])
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.canonical_name.as_str())
    }

    /// SHA-256 over the sorted `name\tcode` lines; stable across load order.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

fn fingerprint_entries(entries: &[VocabularyEntry]) -> String {
    let mut lines: Vec<String> = entries
        .iter()
        .map(|e| format!("{}\t{}", e.canonical_name, e.code))
        .collect();
    lines.sort();

    let mut hasher = Sha256::new();
    for line in &lines {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn rows(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|&(c, n)| (c.to_string(), n.to_string()))
            .collect()
    }

    #[test]
    fn test_duplicate_names_keep_longest_code() {
        let vocab = Vocabulary::from_rows(rows(&[
            ("A01", "伤寒"),
            ("A01.001", "伤寒"),
            ("B02", "带状疱疹"),
        ]))
        .unwrap();
        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.get("伤寒").unwrap().code, "A01.001");
    }

    #[test]
    fn test_placeholder_rows_dropped() {
        let vocab = Vocabulary::from_rows(rows(&[("X00", "N"), ("A01", "伤寒")])).unwrap();
        assert_eq!(vocab.len(), 1);
        assert!(vocab.get("N").is_none());
    }

    #[test]
    fn test_empty_vocabulary_is_fatal() {
        assert!(Vocabulary::from_rows(rows(&[("X00", "N")])).is_err());
        assert!(Vocabulary::from_rows(Vec::new()).is_err());
    }

    #[test]
    fn test_fingerprint_stable_across_load_order() {
        let a = Vocabulary::from_rows(rows(&[("A01", "伤寒"), ("B02", "带状疱疹")])).unwrap();
        let b = Vocabulary::from_rows(rows(&[("B02", "带状疱疹"), ("A01", "伤寒")])).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn test_load_tsv_strips_quotes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "A01\t\"伤寒\"").unwrap();
        writeln!(file, "B02\t带状疱疹").unwrap();
        let vocab = Vocabulary::load_tsv(file.path()).unwrap();
        assert!(vocab.get("伤寒").is_some());
        assert!(vocab.get("\"伤寒\"").is_none());
    }
}
