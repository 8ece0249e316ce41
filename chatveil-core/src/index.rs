//! index.rs - The filter-list automaton and its generation swap.
//!
//! A `PatternIndex` owns the current `IndexSnapshot` behind a single
//! `RwLock<Arc<..>>`. Rebuilds construct the new automata off to the side
//! and publish them with one pointer swap, so scans holding the previous
//! snapshot finish against it untouched.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, info, warn};
use sha2::{Digest, Sha256};
use std::sync::{Arc, RwLock};

use chatveil_scan::{PatternAutomaton, PatternHit, PatternId};

use crate::config::MAX_PATTERN_LENGTH;
use crate::errors::ChatveilError;
use crate::loader::{dedupe_entries, FilterEntry};

/// One immutable generation of the filter index.
#[derive(Debug)]
pub struct IndexSnapshot {
    generation: u64,
    fingerprint: Option<String>,
    entries: Vec<FilterEntry>,
    /// Case-insensitive entries, matched against the folded view.
    folded: Option<PatternAutomaton>,
    /// Case-sensitive entries, matched against the case-preserving view.
    exact: Option<PatternAutomaton>,
}

impl IndexSnapshot {
    fn empty() -> Self {
        Self { generation: 0, fingerprint: None, entries: Vec::new(), folded: None, exact: None }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    pub fn entries(&self) -> &[FilterEntry] {
        &self.entries
    }

    pub fn entry(&self, id: PatternId) -> Option<&FilterEntry> {
        self.entries.get(id as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_case_sensitive(&self) -> bool {
        self.exact.is_some()
    }

    /// Hits of case-insensitive entries in folded text.
    pub fn scan_folded(&self, text: &str) -> Vec<PatternHit> {
        self.folded.as_ref().map(|a| a.scan(text)).unwrap_or_default()
    }

    /// Hits of case-sensitive entries in case-preserving text.
    pub fn scan_exact(&self, text: &str) -> Vec<PatternHit> {
        self.exact.as_ref().map(|a| a.scan(text)).unwrap_or_default()
    }
}

/// Stable digest of an entry set, independent of entry order.
pub fn fingerprint_entries(entries: &[FilterEntry]) -> String {
    let mut keys: Vec<String> = entries
        .iter()
        .map(|e| {
            format!(
                "{}{}:{}",
                if e.standalone_only { '^' } else { '-' },
                if e.case_sensitive { '!' } else { '-' },
                e.pattern
            )
        })
        .collect();
    keys.sort();

    let mut hasher = Sha256::new();
    for key in &keys {
        hasher.update(key.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

/// Shared, swappable filter index.
#[derive(Debug)]
pub struct PatternIndex {
    current: RwLock<Arc<IndexSnapshot>>,
    max_pattern_length: usize,
}

impl Default for PatternIndex {
    fn default() -> Self {
        Self::new(MAX_PATTERN_LENGTH)
    }
}

impl PatternIndex {
    /// An index at generation 0 with no entries. Scans return nothing.
    pub fn new(max_pattern_length: usize) -> Self {
        Self {
            current: RwLock::new(Arc::new(IndexSnapshot::empty())),
            max_pattern_length,
        }
    }

    /// Builds an index and publishes `entries` as generation 1.
    pub fn with_entries(entries: Vec<FilterEntry>, max_pattern_length: usize) -> Result<Self, ChatveilError> {
        let index = Self::new(max_pattern_length);
        index.rebuild(entries)?;
        Ok(index)
    }

    /// The snapshot every stage of one request should use.
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        let guard = self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    pub fn generation(&self) -> u64 {
        self.snapshot().generation
    }

    /// Rebuilds the automata from `entries` and swaps them in.
    ///
    /// Returns the generation now active. An unchanged entry set keeps the
    /// current generation. On error the current generation stays active.
    pub fn rebuild(&self, entries: Vec<FilterEntry>) -> Result<u64, ChatveilError> {
        if entries.is_empty() {
            return Err(ChatveilError::IndexBuildError("the pattern set is empty".to_string()));
        }
        for entry in &entries {
            if entry.pattern.is_empty() {
                return Err(ChatveilError::IndexBuildError("the pattern set contains an empty entry".to_string()));
            }
            if entry.pattern.len() > self.max_pattern_length {
                let err = ChatveilError::PatternLengthExceeded(
                    truncate_for_log(&entry.pattern),
                    entry.pattern.len(),
                    self.max_pattern_length,
                );
                warn!("Rejecting filter list: {}", err);
                return Err(ChatveilError::IndexBuildError(err.to_string()));
            }
        }

        let entries = dedupe_entries(entries);
        let fingerprint = fingerprint_entries(&entries);
        {
            let current = self.snapshot();
            if current.fingerprint.as_deref() == Some(fingerprint.as_str()) {
                debug!("Filter list unchanged; keeping generation {}.", current.generation);
                return Ok(current.generation);
            }
        }

        debug!("Building automata for {} entries.", entries.len());
        let folded = build_automaton(&entries, false)?;
        let exact = build_automaton(&entries, true)?;

        let mut guard = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        let generation = guard.generation + 1;
        *guard = Arc::new(IndexSnapshot {
            generation,
            fingerprint: Some(fingerprint),
            entries,
            folded,
            exact,
        });
        info!("Published pattern index generation {} ({} entries).", generation, guard.entries.len());
        Ok(generation)
    }
}

fn build_automaton(entries: &[FilterEntry], case_sensitive: bool) -> Result<Option<PatternAutomaton>, ChatveilError> {
    let patterns: Vec<(&str, PatternId)> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| e.case_sensitive == case_sensitive)
        .map(|(id, e)| (e.pattern.as_str(), id as PatternId))
        .collect();
    if patterns.is_empty() {
        return Ok(None);
    }
    PatternAutomaton::build(patterns)
        .map(Some)
        .map_err(|e| ChatveilError::IndexBuildError(e.to_string()))
}

fn truncate_for_log(pattern: &str) -> String {
    pattern.chars().take(24).collect()
}
