// src/candidate_generation/automaton.rs
// Multi-pattern exact matcher over the vocabulary (Aho-Corasick). Nodes live
// in a backing array and address each other by index, so the root's
// self-referential failure link is plain index equality, not shared ownership.

use std::collections::{HashMap, HashSet, VecDeque};

use anyhow::{bail, Result};
use log::debug;

const ROOT: usize = 0;

#[derive(Debug, Default)]
struct Node {
    transitions: HashMap<char, usize>,
    failure: usize,
    depth: usize,
    // Vocabulary entry ids completed at this node, own completions first,
    // then the failure target's full emit set (unioned once at build time).
    emits: Vec<usize>,
}

#[derive(Debug)]
pub struct PatternAutomaton {
    nodes: Vec<Node>,
    patterns: Vec<String>,
}

impl PatternAutomaton {
    /// Builds the automaton from the vocabulary entry names. Construction is
    /// linear in the total length of all patterns and fails only on an empty
    /// pattern set (startup-fatal).
    pub fn build<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique = HashSet::new();
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(Into::into)
            .filter(|p| !p.is_empty() && unique.insert(p.clone()))
            .collect();

        if patterns.is_empty() {
            bail!("Pattern automaton requires a non-empty vocabulary");
        }

        let mut automaton = Self {
            nodes: vec![Node::default()],
            patterns,
        };

        for idx in 0..automaton.patterns.len() {
            automaton.insert_pattern(idx);
        }
        automaton.build_failure_links();

        debug!(
            "Built pattern automaton: {} patterns, {} nodes",
            automaton.patterns.len(),
            automaton.nodes.len()
        );
        Ok(automaton)
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Scans `text` once, left to right, and returns every vocabulary entry
    /// occurring as a substring, deduplicated in first-emission order (the
    /// order seeds the aggregator's stable candidate order). Overlapping
    /// entries are all reported.
    pub fn find_matches(&self, text: &str) -> Vec<&str> {
        let mut seen = vec![false; self.patterns.len()];
        let mut matches = Vec::new();
        let mut state = ROOT;

        for symbol in text.chars() {
            state = self.next_state(state, symbol);
            for &pattern_idx in &self.nodes[state].emits {
                if !seen[pattern_idx] {
                    seen[pattern_idx] = true;
                    matches.push(self.patterns[pattern_idx].as_str());
                }
            }
        }
        matches
    }

    fn insert_pattern(&mut self, pattern_idx: usize) {
        let mut state = ROOT;
        let pattern = self.patterns[pattern_idx].clone();
        for symbol in pattern.chars() {
            let existing = self.nodes[state].transitions.get(&symbol).copied();
            state = match existing {
                Some(next) => next,
                None => {
                    let next = self.nodes.len();
                    let depth = self.nodes[state].depth + 1;
                    self.nodes.push(Node {
                        depth,
                        ..Node::default()
                    });
                    self.nodes[state].transitions.insert(symbol, next);
                    next
                }
            };
        }
        self.nodes[state].emits.push(pattern_idx);
    }

    // Breadth-first failure link construction. Root children fail to the
    // root; every deeper child follows its parent's failure chain until a
    // node with a transition on the child's symbol turns up. Emit sets are
    // unioned with the failure target's here, never per query.
    fn build_failure_links(&mut self) {
        let mut queue = VecDeque::new();

        let root_children: Vec<usize> = self.nodes[ROOT].transitions.values().copied().collect();
        for child in root_children {
            self.nodes[child].failure = ROOT;
            queue.push_back(child);
        }

        while let Some(current) = queue.pop_front() {
            let transitions: Vec<(char, usize)> = self.nodes[current]
                .transitions
                .iter()
                .map(|(&symbol, &target)| (symbol, target))
                .collect();

            for (symbol, child) in transitions {
                queue.push_back(child);

                let mut probe = self.nodes[current].failure;
                while self.nodes[probe].transitions.get(&symbol).is_none()
                    && self.nodes[probe].depth != 0
                {
                    probe = self.nodes[probe].failure;
                }

                match self.nodes[probe].transitions.get(&symbol).copied() {
                    Some(target) => {
                        self.nodes[child].failure = target;
                        let inherited = self.nodes[target].emits.clone();
                        self.nodes[child].emits.extend(inherited);
                    }
                    None => {
                        self.nodes[child].failure = probe;
                    }
                }
            }
        }
    }

    // Transition with failure chasing: fall back until a transition on
    // `symbol` exists or the root is reached. A miss at the root resets the
    // scan rather than failing it.
    fn next_state(&self, mut state: usize, symbol: char) -> usize {
        loop {
            if let Some(&next) = self.nodes[state].transitions.get(&symbol) {
                return next;
            }
            if self.nodes[state].depth == 0 {
                return ROOT;
            }
            state = self.nodes[state].failure;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(patterns: &[&str]) -> PatternAutomaton {
        PatternAutomaton::build(patterns.iter().map(|p| p.to_string())).unwrap()
    }

    #[test]
    fn test_overlapping_matches_all_reported() {
        let automaton = build(&["aa", "ab", "b"]);
        let matches = automaton.find_matches("aab");
        assert_eq!(matches, vec!["aa", "ab", "b"]);
    }

    #[test]
    fn test_no_false_positives() {
        let automaton = build(&["糖尿病", "高血压"]);
        assert!(automaton.find_matches("急性阑尾炎").is_empty());
        assert!(automaton.find_matches("").is_empty());
    }

    #[test]
    fn test_substring_entries_both_reported() {
        let automaton = build(&["肺炎", "支原体肺炎"]);
        let matches = automaton.find_matches("支原体肺炎待查");
        assert_eq!(matches.len(), 2);
        assert!(matches.contains(&"肺炎"));
        assert!(matches.contains(&"支原体肺炎"));
    }

    #[test]
    fn test_duplicates_suppressed() {
        let automaton = build(&["炎"]);
        let matches = automaton.find_matches("肺炎肠炎胃炎");
        assert_eq!(matches, vec!["炎"]);
    }

    #[test]
    fn test_failure_links_across_patterns() {
        // "she" overlaps "he"; scanning "she" must emit both.
        let automaton = build(&["she", "he"]);
        let matches = automaton.find_matches("she");
        assert_eq!(matches, vec!["she", "he"]);
    }

    #[test]
    fn test_empty_vocabulary_rejected() {
        assert!(PatternAutomaton::build(Vec::<String>::new()).is_err());
        assert!(PatternAutomaton::build(vec![String::new()]).is_err());
    }
}
