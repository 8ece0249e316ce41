// chatveil-scan/src/normalize/mod.rs
//! Canonical matching form with a reversible offset index.
//!
//! Every byte of the normalized text remembers the byte range of the source
//! character it was produced from. A character may expand (`ß` -> `ss`),
//! shrink to nothing (stylised letters when `strip_styled` is set) or map
//! one-to-one, and span arithmetic stays exact in both directions.

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use unicode_normalization::char::{decompose_canonical, is_combining_mark};

use crate::classify::is_extended_latin;
use crate::styles::is_styled;

/// Switches for [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Lowercase letters.
    pub case_fold: bool,
    /// Drop fancy-text code points entirely.
    pub strip_styled: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self { case_fold: true, strip_styled: true }
    }
}

/// Normalized text plus the per-byte map back to the source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    text: String,
    starts: Vec<usize>,
    ends: Vec<usize>,
    source_len: usize,
}

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// Source byte offset for a normalized byte offset.
    pub fn source_offset(&self, normalized: usize) -> usize {
        self.starts.get(normalized).copied().unwrap_or(self.source_len)
    }

    /// Maps a normalized byte range to the source range covering every
    /// character that contributed to it.
    pub fn source_span(&self, start: usize, end: usize) -> Range<usize> {
        if start >= end || start >= self.starts.len() {
            let at = self.source_offset(start);
            return at..at;
        }
        let last = end.min(self.ends.len()) - 1;
        self.starts[start]..self.ends[last]
    }

    /// First normalized offset whose source character starts at or after
    /// `source`.
    pub fn normalized_offset(&self, source: usize) -> usize {
        self.starts.partition_point(|&s| s < source)
    }

    /// Maps a source byte range to the normalized range produced by the
    /// characters inside it.
    pub fn normalized_span(&self, source: Range<usize>) -> Range<usize> {
        let start = self.normalized_offset(source.start);
        let end = self.normalized_offset(source.end).max(start);
        start..end
    }
}

/// Normalizes `source` according to `options`.
pub fn normalize(source: &str, options: NormalizeOptions) -> NormalizedText {
    let mut out = NormalizedText {
        text: String::with_capacity(source.len()),
        starts: Vec::with_capacity(source.len()),
        ends: Vec::with_capacity(source.len()),
        source_len: source.len(),
    };

    for (idx, c) in source.char_indices() {
        let end = idx + c.len_utf8();
        fold_char(c, options, |folded| {
            out.text.push(folded);
            for _ in 0..folded.len_utf8() {
                out.starts.push(idx);
                out.ends.push(end);
            }
        });
    }
    out
}

/// Normalizes a single filter or whitelist entry without keeping offsets.
pub fn normalize_entry(entry: &str, case_fold: bool) -> String {
    let mut out = String::with_capacity(entry.len());
    let options = NormalizeOptions { case_fold, strip_styled: false };
    for c in entry.chars() {
        fold_char(c, options, |folded| out.push(folded));
    }
    out
}

fn fold_char<F: FnMut(char)>(c: char, options: NormalizeOptions, mut emit: F) {
    if options.strip_styled && is_styled(c) {
        return;
    }
    if c.is_ascii() {
        emit(if options.case_fold { c.to_ascii_lowercase() } else { c });
        return;
    }
    if !is_extended_latin(c) {
        emit(c);
        return;
    }
    if let Some(expansion) = ligature(c) {
        let upper = !options.case_fold && c.is_uppercase();
        for e in expansion.chars() {
            emit(if upper { e.to_ascii_uppercase() } else { e });
        }
        return;
    }
    decompose_canonical(c, |d| {
        if is_combining_mark(d) {
            return;
        }
        if options.case_fold {
            for lower in d.to_lowercase() {
                emit(lower);
            }
        } else {
            emit(d);
        }
    });
}

/// Latin letters without a canonical decomposition into a base letter.
fn ligature(c: char) -> Option<&'static str> {
    let s = match c {
        'ß' => "ss",
        'Æ' | 'æ' => "ae",
        'Œ' | 'œ' => "oe",
        'Ø' | 'ø' => "o",
        'Đ' | 'đ' | 'Ð' | 'ð' => "d",
        'Ł' | 'ł' => "l",
        'Þ' | 'þ' => "th",
        'Ħ' | 'ħ' => "h",
        'ı' => "i",
        _ => return None,
    };
    Some(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_fold_and_diacritics() {
        let n = normalize("Café ÄSS", NormalizeOptions::default());
        assert_eq!(n.as_str(), "cafe ass");
        // 'é' is two bytes in the source but one in the normalized text.
        assert_eq!(n.source_span(3, 4), 3..5);
        assert_eq!(n.source_span(5, 8), 6..10);
    }

    #[test]
    fn test_expansion_maps_back_to_whole_char() {
        let n = normalize("Straße", NormalizeOptions::default());
        assert_eq!(n.as_str(), "strasse");
        // Half of the "ss" expansion still maps to the full 'ß'.
        assert_eq!(n.source_span(4, 5), 4..6);
        assert_eq!(n.source_span(0, 7), 0..7);
    }

    #[test]
    fn test_case_preserving_mode() {
        let opts = NormalizeOptions { case_fold: false, strip_styled: true };
        assert_eq!(normalize("ÉCOLE", opts).as_str(), "ECOLE");
    }

    #[test]
    fn test_styled_chars_are_dropped() {
        let n = normalize("\u{1F130}ss", NormalizeOptions::default());
        assert_eq!(n.as_str(), "ss");
        assert_eq!(n.source_span(0, 2), 4..6);
    }

    #[test]
    fn test_reverse_mapping() {
        let n = normalize("Ünd so", NormalizeOptions::default());
        assert_eq!(n.normalized_offset(0), 0);
        assert_eq!(n.normalized_offset(2), 1);
        assert_eq!(n.normalized_span(2..4), 1..3);
        assert_eq!(n.normalized_span(0..n.source_len()), 0..n.len());
    }

    #[test]
    fn test_normalize_entry() {
        assert_eq!(normalize_entry("Coño", true), "cono");
        assert_eq!(normalize_entry("Coño", false), "Cono");
    }
}
