//! links.rs - URL detection so links survive transformation untouched.
//!
//! License: MIT OR APACHE 2.0

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

use crate::matches::Match;

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:https?://|www\.|[a-z0-9-]+\.(?:gg|com|net|org|io|tv|me|co)/)[a-z0-9$_@.&+/!*(),%=?#~:;-]*",
    )
    .expect("Valid regex pattern")
});

/// Byte ranges of every link in `text`.
pub fn find_links(text: &str) -> Vec<Range<usize>> {
    URL_PATTERN.find_iter(text).map(|m| m.range()).collect()
}

/// True when `pos` lies inside any of `links`.
pub fn in_link(links: &[Range<usize>], pos: usize) -> bool {
    links.iter().any(|l| l.contains(&pos))
}

/// Splits matches into those outside every link and those touching one.
pub fn partition_protected(matches: Vec<Match>, links: &[Range<usize>]) -> (Vec<Match>, Vec<Match>) {
    if links.is_empty() {
        return (matches, Vec::new());
    }
    matches.into_iter().partition(|m| {
        !links
            .iter()
            .any(|l| m.original_start < l.end && l.start < m.original_end)
    })
}
