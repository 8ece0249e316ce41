// chatveil-core/src/matches.rs
//! Core data structures for detected filter matches, plus the logging
//! helpers that keep user text out of debug logs unless explicitly allowed.

use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};
use std::ops::Range;

use chatveil_scan::PatternId;

lazy_static! {
    /// Initialised once: whether message text may appear in debug logs.
    static ref TEXT_DEBUG_ALLOWED: bool = {
        std::env::var("CHATVEIL_ALLOW_DEBUG_TEXT")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// Which scan produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    /// Found in the normalized text as-is.
    Direct,
    /// Found only after separators were collapsed.
    Window,
}

/// One occurrence of a filter entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Byte offsets into the folded normalized text.
    pub start: usize,
    pub end: usize,
    /// Byte offsets into the caller's original text.
    pub original_start: usize,
    pub original_end: usize,
    pub entry: PatternId,
    /// The normalized filter entry.
    pub pattern: String,
    pub source: MatchSource,
}

impl Match {
    pub fn original_range(&self) -> Range<usize> {
        self.original_start..self.original_end
    }

    pub fn original_len(&self) -> usize {
        self.original_end - self.original_start
    }

    pub fn overlaps(&self, other: &Match) -> bool {
        self.original_start < other.original_end && other.original_start < self.original_end
    }
}

pub fn redact_text(s: &str) -> String {
    const MAX_LEN: usize = 8;
    let chars = s.chars().count();
    if chars <= MAX_LEN {
        "[TEXT]".to_string()
    } else {
        format!("[TEXT: {} chars]", chars)
    }
}

/// `s` itself when text logging is allowed, a placeholder otherwise.
pub fn loggable(s: &str) -> String {
    if *TEXT_DEBUG_ALLOWED {
        s.to_string()
    } else {
        redact_text(s)
    }
}

pub fn log_match_debug(module_path: &str, m: &Match, original: &str) {
    let matched = original.get(m.original_range()).unwrap_or("");
    debug!(
        "{} Found {:?} match for '{}' at {}..{}: '{}'",
        module_path,
        m.source,
        loggable(&m.pattern),
        m.original_start,
        m.original_end,
        loggable(matched)
    );
}

pub fn log_transform_debug(module_path: &str, before: &str, after: &str, strategies: &str) {
    debug!(
        "{} Transformed '{}' -> '{}' using {}",
        module_path,
        loggable(before),
        loggable(after),
        strategies
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_text_short() {
        assert_eq!(redact_text("ass"), "[TEXT]");
    }

    #[test]
    fn test_redact_text_counts_chars_not_bytes() {
        assert_eq!(redact_text("\u{1F130}\u{1F130}\u{1F130}"), "[TEXT]");
        assert_eq!(redact_text("assassinate"), "[TEXT: 11 chars]");
    }

    #[test]
    fn test_match_overlap() {
        let m = |s, e| Match {
            start: s,
            end: e,
            original_start: s,
            original_end: e,
            entry: 0,
            pattern: "x".to_string(),
            source: MatchSource::Direct,
        };
        assert!(m(0, 3).overlaps(&m(2, 5)));
        assert!(!m(0, 3).overlaps(&m(3, 5)));
    }
}
