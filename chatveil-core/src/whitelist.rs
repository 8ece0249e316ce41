//! whitelist.rs - Position-sensitive match exemptions.
//!
//! A whitelisted word protects the matches inside it only when the word
//! stands alone as a whole token. The same letters embedded in a longer
//! token stay flagged. Standalone-only filter entries are handled here as
//! well: they are dropped when the occurrence is embedded in a longer token.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use chatveil_scan::classify::is_separator;
use chatveil_scan::normalize::normalize_entry;
use chatveil_scan::NormalizedText;

use crate::index::IndexSnapshot;
use crate::matches::{loggable, Match, MatchSource};
use crate::scanner::RawScan;

/// An immutable set of whitelisted words, keyed by normalized form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist {
    words: HashSet<String>,
}

impl Whitelist {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| normalize_entry(w.as_ref().trim(), true))
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&normalize_entry(word, true))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Removes matches exempted by their position and returns the survivors
    /// in their original order.
    pub fn filter(&self, scan: &RawScan, snapshot: &IndexSnapshot) -> Vec<Match> {
        let mut kept = Vec::with_capacity(scan.matches.len());
        for m in &scan.matches {
            if m.source == MatchSource::Direct {
                let token = enclosing_token(&scan.folded, m.start, m.end);
                let standalone = token.start == m.start && token.end == m.end;

                let standalone_only = snapshot.entry(m.entry).map(|e| e.standalone_only).unwrap_or(false);
                if standalone_only && !standalone {
                    debug!("Dropping embedded occurrence of standalone-only entry '{}'.", loggable(&m.pattern));
                    continue;
                }

                let word = &scan.folded.as_str()[token.clone()];
                if self.words.contains(word) {
                    debug!("Dropping match '{}' inside whitelisted word '{}'.", loggable(&m.pattern), loggable(word));
                    continue;
                }
            }
            kept.push(m.clone());
        }
        kept
    }
}

/// The token around `start..end` in the folded text, extended to the nearest
/// separators on both sides.
fn enclosing_token(folded: &NormalizedText, start: usize, end: usize) -> std::ops::Range<usize> {
    let text = folded.as_str();
    let token_start = text[..start]
        .char_indices()
        .rev()
        .find(|(_, c)| is_separator(*c))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let token_end = text[end..]
        .char_indices()
        .find(|(_, c)| is_separator(*c))
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    token_start..token_end
}

/// The active whitelist, replaceable while requests are in flight.
#[derive(Debug, Default)]
pub struct WhitelistFilter {
    current: RwLock<Arc<Whitelist>>,
}

impl WhitelistFilter {
    pub fn new(whitelist: Whitelist) -> Self {
        Self { current: RwLock::new(Arc::new(whitelist)) }
    }

    pub fn snapshot(&self) -> Arc<Whitelist> {
        let guard = self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    pub fn replace(&self, whitelist: Whitelist) {
        let mut guard = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        debug!("Replacing whitelist ({} -> {} words).", guard.len(), whitelist.len());
        *guard = Arc::new(whitelist);
    }
}
