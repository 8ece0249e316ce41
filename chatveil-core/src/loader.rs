//! loader.rs - Parsing of filter and whitelist lists.
//!
//! Lists are plain UTF-8 text with one entry per line. Blank lines and lines
//! starting with `#` are ignored. Filter entries may carry leading flag
//! markers: `^` for standalone-only and `!` for case-sensitive.
//!
//! License: MIT OR Apache-2.0

use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chatveil_scan::classify::is_pattern_char;
use chatveil_scan::normalize::normalize_entry;

/// Lists larger than this are refused.
pub const MAX_LIST_FILE_SIZE: u64 = 100 * 1024 * 1024;
const MAX_REJECTED_EXAMPLES: usize = 10;

/// One censored word as the destination filter knows it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterEntry {
    /// Normalized form used for matching.
    pub pattern: String,
    /// Only match when the occurrence is a whole token.
    pub standalone_only: bool,
    /// Match against the case-preserving view.
    pub case_sensitive: bool,
}

impl FilterEntry {
    /// A plain case-insensitive entry that matches anywhere.
    pub fn new(word: &str) -> Self {
        Self {
            pattern: normalize_entry(word, true),
            standalone_only: false,
            case_sensitive: false,
        }
    }

    pub fn standalone(word: &str) -> Self {
        Self { standalone_only: true, ..Self::new(word) }
    }
}

/// What happened while reading a list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    /// Lines read, including blanks and comments.
    pub lines: usize,
    pub skipped: usize,
    pub rejected: usize,
    pub duplicates: usize,
    pub kept: usize,
    /// Up to ten rejected entries, for the user to inspect.
    pub rejected_examples: Vec<String>,
}

impl LoadStats {
    fn reject(&mut self, entry: &str) {
        self.rejected += 1;
        if self.rejected_examples.len() < MAX_REJECTED_EXAMPLES {
            self.rejected_examples.push(entry.to_string());
        }
    }

    fn report(&self, what: &str) {
        info!(
            "Loaded {}: {} kept, {} duplicates, {} rejected, {} skipped ({} lines).",
            what, self.kept, self.duplicates, self.rejected, self.skipped, self.lines
        );
        if self.rejected > 0 {
            warn!(
                "Rejected {} {} entries with characters outside the Latin alphabet, e.g. {}",
                self.rejected,
                what,
                self.rejected_examples.join(", ")
            );
        }
    }
}

/// True when every character is an ASCII letter/digit or an extended Latin letter.
pub fn is_pure_latin(word: &str) -> bool {
    !word.is_empty() && word.chars().all(is_pattern_char)
}

fn split_flags(line: &str) -> (&str, bool, bool) {
    let mut standalone = false;
    let mut case_sensitive = false;
    let mut rest = line;
    loop {
        if let Some(r) = rest.strip_prefix('^') {
            standalone = true;
            rest = r;
        } else if let Some(r) = rest.strip_prefix('!') {
            case_sensitive = true;
            rest = r;
        } else {
            return (rest, standalone, case_sensitive);
        }
    }
}

/// Merges entries that normalize to the same pattern in the same view. The
/// merged entry is standalone-only only if every duplicate was.
pub fn dedupe_entries(entries: Vec<FilterEntry>) -> Vec<FilterEntry> {
    let mut out: Vec<FilterEntry> = Vec::with_capacity(entries.len());
    let mut positions: HashMap<(String, bool), usize> = HashMap::new();
    for entry in entries {
        let key = (entry.pattern.clone(), entry.case_sensitive);
        match positions.get(&key) {
            Some(&idx) => {
                let existing = &mut out[idx];
                existing.standalone_only = existing.standalone_only && entry.standalone_only;
            }
            None => {
                positions.insert(key, out.len());
                out.push(entry);
            }
        }
    }
    out
}

/// Parses a filter list held in memory.
pub fn parse_filter_list(text: &str) -> (Vec<FilterEntry>, LoadStats) {
    let mut stats = LoadStats::default();
    let mut raw: Vec<FilterEntry> = Vec::new();

    for line in text.lines() {
        stats.lines += 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            stats.skipped += 1;
            continue;
        }
        let (word, standalone_only, case_sensitive) = split_flags(line);
        if !is_pure_latin(word) {
            stats.reject(line);
            continue;
        }
        raw.push(FilterEntry {
            pattern: normalize_entry(word, !case_sensitive),
            standalone_only,
            case_sensitive,
        });
    }

    let before = raw.len();
    let entries = dedupe_entries(raw);
    stats.duplicates = before - entries.len();
    stats.kept = entries.len();
    debug!("Parsed filter list: {} entries from {} lines.", stats.kept, stats.lines);
    (entries, stats)
}

/// Parses a whitelist held in memory into normalized, case-folded words.
pub fn parse_whitelist(text: &str) -> (Vec<String>, LoadStats) {
    let mut stats = LoadStats::default();
    let mut words: Vec<String> = Vec::new();

    for line in text.lines() {
        stats.lines += 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            stats.skipped += 1;
            continue;
        }
        if !is_pure_latin(line) {
            stats.reject(line);
            continue;
        }
        let word = normalize_entry(line, true);
        if words.contains(&word) {
            stats.duplicates += 1;
        } else {
            words.push(word);
        }
    }

    stats.kept = words.len();
    (words, stats)
}

fn read_list_file(path: &Path) -> Result<String> {
    let meta = fs::metadata(path)
        .with_context(|| format!("Failed to stat list file {}", path.display()))?;
    if meta.len() > MAX_LIST_FILE_SIZE {
        bail!(
            "List file {} is {} bytes, larger than the {} byte limit.",
            path.display(),
            meta.len(),
            MAX_LIST_FILE_SIZE
        );
    }
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read list file {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Reads and parses a filter list file.
pub fn load_filter_file<P: AsRef<Path>>(path: P) -> Result<(Vec<FilterEntry>, LoadStats)> {
    let path = path.as_ref();
    info!("Loading filter list from: {}", path.display());
    let text = read_list_file(path)?;
    let (entries, stats) = parse_filter_list(&text);
    stats.report("filter list");
    Ok((entries, stats))
}

/// Reads and parses a whitelist file.
pub fn load_whitelist_file<P: AsRef<Path>>(path: P) -> Result<(Vec<String>, LoadStats)> {
    let path = path.as_ref();
    info!("Loading whitelist from: {}", path.display());
    let text = read_list_file(path)?;
    let (words, stats) = parse_whitelist(&text);
    stats.report("whitelist");
    Ok((words, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_list_flags_and_comments() {
        let text = "# comment\n\nass\n^anal\n!Semen\n^!Tit\n";
        let (entries, stats) = parse_filter_list(text);
        assert_eq!(stats.lines, 6);
        assert_eq!(stats.skipped, 2);
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0], FilterEntry::new("ass"));
        assert!(entries[1].standalone_only && !entries[1].case_sensitive);
        assert_eq!(entries[2].pattern, "Semen");
        assert!(entries[2].case_sensitive);
        assert!(entries[3].standalone_only && entries[3].case_sensitive);
    }

    #[test]
    fn test_non_latin_entries_are_rejected() {
        let (entries, stats) = parse_filter_list("coño\nхуй\ntest💩\n2g1c\nfoo bar\n");
        let patterns: Vec<_> = entries.iter().map(|e| e.pattern.as_str()).collect();
        assert_eq!(patterns, vec!["cono", "2g1c"]);
        assert_eq!(stats.rejected, 3);
        assert_eq!(stats.rejected_examples.len(), 3);
    }

    #[test]
    fn test_duplicates_merge_flags() {
        let (entries, stats) = parse_filter_list("^Ass\nass\nÁSS\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(stats.duplicates, 2);
        assert!(!entries[0].standalone_only);
    }

    #[test]
    fn test_parse_whitelist() {
        let (words, stats) = parse_whitelist("Assassin\n# c\nassassin\nclassic\n");
        assert_eq!(words, vec!["assassin".to_string(), "classic".to_string()]);
        assert_eq!(stats.duplicates, 1);
    }
}
