// chatveil-scan/src/collapse/mod.rs
//! Separator-collapsed view of a normalized message.
//!
//! Filters split words across spaces and punctuation ("a.s.s", "semen t"),
//! so the sliding-window scan runs over the message with every separator
//! removed. Each kept byte remembers where it came from and which original
//! token it belonged to.

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use crate::classify::is_separator;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapsedText {
    text: String,
    /// Normalized byte offset of every collapsed byte.
    origin: Vec<usize>,
    /// Token index of every collapsed byte.
    token: Vec<u32>,
    /// Character count of every token.
    token_chars: Vec<u32>,
}

impl CollapsedText {
    /// Collapses an already-normalized string.
    pub fn new(normalized: &str) -> Self {
        let mut out = CollapsedText {
            text: String::with_capacity(normalized.len()),
            origin: Vec::with_capacity(normalized.len()),
            token: Vec::with_capacity(normalized.len()),
            token_chars: Vec::new(),
        };
        let mut in_token = false;

        for (idx, c) in normalized.char_indices() {
            if is_separator(c) {
                in_token = false;
                continue;
            }
            if !in_token {
                out.token_chars.push(0);
                in_token = true;
            }
            let token_id = (out.token_chars.len() - 1) as u32;
            if let Some(count) = out.token_chars.last_mut() {
                *count += 1;
            }
            out.text.push(c);
            for b in 0..c.len_utf8() {
                out.origin.push(idx + b);
                out.token.push(token_id);
            }
        }
        out
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn token_count(&self) -> usize {
        self.token_chars.len()
    }

    /// Normalized byte range covered by the collapsed range `start..end`,
    /// including any separators in between.
    pub fn normalized_span(&self, start: usize, end: usize) -> Range<usize> {
        if start >= end || end > self.origin.len() {
            return 0..0;
        }
        self.origin[start]..self.origin[end - 1] + 1
    }

    /// Number of tokens the collapsed range touches.
    pub fn tokens_spanned(&self, start: usize, end: usize) -> usize {
        if start >= end || end > self.token.len() {
            return 0;
        }
        (self.token[end - 1] - self.token[start]) as usize + 1
    }

    /// True when every token touched by the range is a single character,
    /// i.e. the range is a spaced-out word like "a s s".
    pub fn is_spaced_run(&self, start: usize, end: usize) -> bool {
        if start >= end || end > self.token.len() {
            return false;
        }
        (self.token[start]..=self.token[end - 1]).all(|t| self.token_chars[t as usize] == 1)
    }

    /// True when the range starts and ends on token boundaries.
    pub fn is_token_aligned(&self, start: usize, end: usize) -> bool {
        if start >= end || end > self.token.len() {
            return false;
        }
        let starts_clean = start == 0 || self.token[start - 1] != self.token[start];
        let ends_clean = end == self.token.len() || self.token[end] != self.token[end - 1];
        starts_clean && ends_clean
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_removes_separators() {
        let c = CollapsedText::new("a.s s-e");
        assert_eq!(c.as_str(), "asse");
        assert_eq!(c.token_count(), 4);
        assert_eq!(c.normalized_span(0, 3), 0..5);
        assert_eq!(c.tokens_spanned(0, 3), 3);
        assert!(c.is_spaced_run(0, 4));
    }

    #[test]
    fn test_multi_char_tokens() {
        let c = CollapsedText::new("sem en");
        assert_eq!(c.as_str(), "semen");
        assert_eq!(c.tokens_spanned(0, 5), 2);
        assert!(!c.is_spaced_run(0, 5));
        assert!(c.is_token_aligned(0, 5));
        assert!(!c.is_token_aligned(1, 5));
        assert!(!c.is_token_aligned(0, 4));
    }

    #[test]
    fn test_multibyte_origin() {
        let c = CollapsedText::new("\u{200B}a \u{2764}");
        assert_eq!(c.as_str(), "\u{200B}a\u{2764}");
        // The last char is three bytes wide and starts after the space.
        assert_eq!(c.normalized_span(4, 7), 5..8);
    }

    #[test]
    fn test_empty_input() {
        let c = CollapsedText::new("  ..  ");
        assert!(c.is_empty());
        assert_eq!(c.tokens_spanned(0, 0), 0);
    }
}
