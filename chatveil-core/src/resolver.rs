//! resolver.rs - Collapses overlapping matches into disjoint spans.
//!
//! License: MIT OR APACHE 2.0

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::matches::Match;

/// A non-overlapping region of the original text and the matches it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSpan {
    pub start: usize,
    pub end: usize,
    pub matches: Vec<Match>,
}

impl ResolvedSpan {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Distinct patterns covered by this span.
    pub fn patterns(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.matches.iter().map(|m| m.pattern.as_str()).collect();
        out.sort_unstable();
        out.dedup();
        out
    }
}

/// Leftmost-longest sweep over the surviving matches.
///
/// A match starting at or after the end of the current span opens a new
/// span. A match contained in the current span joins its coverage set. A
/// match that starts inside the current span but ends past it widens the
/// span, so every match ends up in exactly one span.
pub fn resolve(mut matches: Vec<Match>) -> Vec<ResolvedSpan> {
    matches.sort_by(|a, b| {
        a.original_start
            .cmp(&b.original_start)
            .then_with(|| b.original_len().cmp(&a.original_len()))
            .then_with(|| a.entry.cmp(&b.entry))
    });

    let mut spans: Vec<ResolvedSpan> = Vec::new();
    for m in matches {
        match spans.last_mut() {
            Some(current) if m.original_start < current.end => {
                current.end = current.end.max(m.original_end);
                current.matches.push(m);
            }
            _ => spans.push(ResolvedSpan {
                start: m.original_start,
                end: m.original_end,
                matches: vec![m],
            }),
        }
    }
    spans
}
