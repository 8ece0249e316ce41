// chatveil-scan/src/automaton/mod.rs
use alloc::collections::BTreeSet;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use daachorse::DoubleArrayAhoCorasick;

use crate::PatternId;

/// One overlapping occurrence of a pattern in a haystack (byte offsets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PatternHit {
    pub start: usize,
    pub end: usize,
    pub id: PatternId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// No patterns were supplied.
    Empty,
    /// The pattern with this id is the empty string.
    EmptyPattern(PatternId),
    /// The pattern with this id repeats an earlier one.
    Duplicate(PatternId),
    /// The automaton construction itself failed.
    Automaton(String),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Empty => f.write_str("no patterns to index"),
            BuildError::EmptyPattern(id) => write!(f, "pattern #{id} is empty"),
            BuildError::Duplicate(id) => write!(f, "pattern #{id} is a duplicate"),
            BuildError::Automaton(msg) => write!(f, "automaton construction failed: {msg}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BuildError {}

/// Multi-pattern matcher reporting every overlapping hit in one pass.
pub struct PatternAutomaton {
    automaton: DoubleArrayAhoCorasick<PatternId>,
    pattern_count: usize,
}

impl fmt::Debug for PatternAutomaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternAutomaton")
         .field("automaton", &"<DoubleArrayAhoCorasick>")
         .field("pattern_count", &self.pattern_count)
         .finish()
    }
}

impl PatternAutomaton {
    /// Builds an automaton from `(pattern, id)` pairs. Patterns must be
    /// non-empty and unique.
    pub fn build<I, S>(patterns: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = (S, PatternId)>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        let mut pairs: Vec<(String, PatternId)> = Vec::new();
        for (pattern, id) in patterns {
            let pattern = pattern.as_ref();
            if pattern.is_empty() {
                return Err(BuildError::EmptyPattern(id));
            }
            if !seen.insert(pattern.to_string()) {
                return Err(BuildError::Duplicate(id));
            }
            pairs.push((pattern.to_string(), id));
        }
        if pairs.is_empty() {
            return Err(BuildError::Empty);
        }

        let pattern_count = pairs.len();
        let automaton = DoubleArrayAhoCorasick::with_values(pairs)
            .map_err(|e| BuildError::Automaton(e.to_string()))?;
        Ok(Self { automaton, pattern_count })
    }

    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Every overlapping hit in `haystack`, ordered by start then end.
    pub fn scan(&self, haystack: &str) -> Vec<PatternHit> {
        let mut hits: Vec<PatternHit> = self
            .automaton
            .find_overlapping_iter(haystack)
            .map(|m| PatternHit { start: m.start(), end: m.end(), id: m.value() })
            .collect();
        hits.sort_unstable();
        hits
    }

    /// True if any pattern occurs in `haystack`.
    pub fn is_match(&self, haystack: &str) -> bool {
        self.automaton.find_overlapping_iter(haystack).next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_overlapping_hits() {
        let a = PatternAutomaton::build(vec![("ass", 0), ("assassin", 1), ("sin", 2)]).unwrap();
        let hits = a.scan("assassin");
        let ids: Vec<_> = hits.iter().map(|h| (h.start, h.end, h.id)).collect();
        assert_eq!(ids, vec![(0, 3, 0), (0, 8, 1), (3, 6, 0), (5, 8, 2)]);
        assert!(a.is_match("bass"));
        assert!(!a.is_match("clean"));
    }

    #[test]
    fn test_build_errors() {
        let none: Vec<(&str, PatternId)> = Vec::new();
        assert_eq!(PatternAutomaton::build(none).unwrap_err(), BuildError::Empty);
        assert_eq!(
            PatternAutomaton::build(vec![("a", 0), ("", 1)]).unwrap_err(),
            BuildError::EmptyPattern(1)
        );
        assert_eq!(
            PatternAutomaton::build(vec![("ab", 0), ("ab", 1)]).unwrap_err(),
            BuildError::Duplicate(1)
        );
    }
}
