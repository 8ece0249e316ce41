//! scanner.rs - Raw detection over the normalized and collapsed views.
//!
//! The direct scan reports every occurrence of every entry in the
//! normalized text. The sliding-window scan runs the same automaton over the
//! separator-collapsed text and keeps hits that only exist because a word
//! was split across spaces or punctuation.
//!
//! License: MIT OR APACHE 2.0

use log::debug;

use chatveil_scan::{normalize, CollapsedText, NormalizeOptions, NormalizedText, PatternHit};

use crate::config::EngineConfig;
use crate::index::IndexSnapshot;
use crate::matches::{log_match_debug, Match, MatchSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Ignore fancy-text code points.
    pub strip_styled: bool,
    /// Widest multi-word window. Runs of single letters ("a s s") may be wider.
    pub max_window_words: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self { strip_styled: true, max_window_words: 3 }
    }
}

impl From<&EngineConfig> for ScanOptions {
    fn from(config: &EngineConfig) -> Self {
        Self {
            strip_styled: config.strip_styled_text,
            max_window_words: config.max_window_words,
        }
    }
}

/// Output of one scan: the views that were scanned and every raw match.
#[derive(Debug, Clone)]
pub struct RawScan {
    pub folded: NormalizedText,
    pub collapsed: CollapsedText,
    /// Ordered by original start, then original end.
    pub matches: Vec<Match>,
}

impl RawScan {
    pub fn is_clean(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Scans text against one index snapshot.
#[derive(Debug, Clone, Copy)]
pub struct RawScanner<'a> {
    snapshot: &'a IndexSnapshot,
    options: ScanOptions,
}

impl<'a> RawScanner<'a> {
    pub fn new(snapshot: &'a IndexSnapshot, options: ScanOptions) -> Self {
        Self { snapshot, options }
    }

    pub fn snapshot(&self) -> &'a IndexSnapshot {
        self.snapshot
    }

    pub fn scan(&self, text: &str) -> RawScan {
        let folded = normalize(
            text,
            NormalizeOptions { case_fold: true, strip_styled: self.options.strip_styled },
        );
        let collapsed = CollapsedText::new(folded.as_str());
        if self.snapshot.is_empty() || text.is_empty() {
            return RawScan { folded, collapsed, matches: Vec::new() };
        }

        let mut matches = Vec::new();
        for hit in self.snapshot.scan_folded(folded.as_str()) {
            matches.push(self.direct_match(&folded, &folded, hit));
        }

        let exact = if self.snapshot.has_case_sensitive() {
            let exact = normalize(
                text,
                NormalizeOptions { case_fold: false, strip_styled: self.options.strip_styled },
            );
            for hit in self.snapshot.scan_exact(exact.as_str()) {
                matches.push(self.direct_match(&exact, &folded, hit));
            }
            Some(exact)
        } else {
            None
        };

        let direct_count = matches.len();
        let window_hits = self.snapshot.scan_folded(collapsed.as_str());
        let mut window = self.window_matches(&folded, &folded, &collapsed, window_hits, &matches);
        if let Some(exact) = &exact {
            let exact_collapsed = CollapsedText::new(exact.as_str());
            let hits = self.snapshot.scan_exact(exact_collapsed.as_str());
            window.extend(self.window_matches(exact, &folded, &exact_collapsed, hits, &matches));
        }
        matches.extend(window);

        matches.sort_by(|a, b| {
            (a.original_start, a.original_end, a.entry).cmp(&(b.original_start, b.original_end, b.entry))
        });
        matches.dedup_by(|a, b| {
            a.original_start == b.original_start && a.original_end == b.original_end && a.entry == b.entry
        });
        debug!(
            "Scan found {} direct and {} window matches (generation {}).",
            direct_count,
            matches.len().saturating_sub(direct_count),
            self.snapshot.generation()
        );
        for m in &matches {
            log_match_debug(module_path!(), m, text);
        }
        RawScan { folded, collapsed, matches }
    }

    /// True when `text` contains no match at all.
    pub fn is_clean(&self, text: &str) -> bool {
        self.scan(text).is_clean()
    }

    fn pattern_of(&self, hit: &PatternHit) -> String {
        self.snapshot.entry(hit.id).map(|e| e.pattern.clone()).unwrap_or_default()
    }

    fn direct_match(&self, view: &NormalizedText, folded: &NormalizedText, hit: PatternHit) -> Match {
        let original = view.source_span(hit.start, hit.end);
        let normalized = folded.normalized_span(original.clone());
        Match {
            start: normalized.start,
            end: normalized.end,
            original_start: original.start,
            original_end: original.end,
            entry: hit.id,
            pattern: self.pattern_of(&hit),
            source: MatchSource::Direct,
        }
    }

    fn window_matches(
        &self,
        view: &NormalizedText,
        folded: &NormalizedText,
        collapsed: &CollapsedText,
        hits: Vec<PatternHit>,
        direct: &[Match],
    ) -> Vec<Match> {
        let mut out = Vec::new();
        for hit in hits {
            let tokens = collapsed.tokens_spanned(hit.start, hit.end);
            if tokens < 2 {
                continue;
            }
            if tokens > self.options.max_window_words && !collapsed.is_spaced_run(hit.start, hit.end) {
                continue;
            }
            let standalone_only = self.snapshot.entry(hit.id).map(|e| e.standalone_only).unwrap_or(false);
            if standalone_only && !collapsed.is_token_aligned(hit.start, hit.end) {
                continue;
            }

            let norm = collapsed.normalized_span(hit.start, hit.end);
            let original = view.source_span(norm.start, norm.end);
            let normalized = folded.normalized_span(original.clone());
            let candidate = Match {
                start: normalized.start,
                end: normalized.end,
                original_start: original.start,
                original_end: original.end,
                entry: hit.id,
                pattern: self.pattern_of(&hit),
                source: MatchSource::Window,
            };
            if direct.iter().any(|d| d.entry == candidate.entry && d.overlaps(&candidate)) {
                continue;
            }
            out.push(candidate);
        }
        out
    }
}
