// chatveil-core/src/splitter.rs
//! Splits an over-budget message into chunks at word boundaries.
//!
//! A word is a run of non-whitespace. Words that touch the same transformed
//! span form one unit and always land in the same chunk. Units are packed
//! greedily and joined with a single space.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use std::ops::Range;

use crate::config::Budget;
use crate::errors::ChatveilError;

#[derive(Debug, Clone, Copy)]
pub struct MessageSplitter {
    budget: Budget,
}

fn word_ranges(text: &str) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
                out.push(s..i);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push(s..text.len());
    }
    out
}

/// Groups words into atomic units. A span that crosses whitespace glues
/// every word it touches together, inner whitespace included.
fn units(text: &str, spans: &[Range<usize>]) -> Vec<Range<usize>> {
    let mut out: Vec<Range<usize>> = Vec::new();
    let mut last_span: Option<usize> = None;
    for word in word_ranges(text) {
        let span = spans.iter().position(|s| s.start < word.end && word.start < s.end);
        match (out.last_mut(), span) {
            (Some(prev), Some(id)) if last_span == Some(id) => prev.end = word.end,
            _ => out.push(word),
        }
        last_span = span;
    }
    out
}

impl MessageSplitter {
    pub fn new(budget: Budget) -> Self {
        Self { budget }
    }

    /// Splits `text` into chunks that each fit the budget. `spans` are byte
    /// ranges in `text` that must not be divided.
    pub fn split(&self, text: &str, spans: &[Range<usize>]) -> Result<Vec<String>, ChatveilError> {
        let units = units(text, spans);
        if units.is_empty() {
            return Ok(Vec::new());
        }

        let mut chunks: Vec<String> = Vec::new();
        let mut current = String::new();
        for unit in units {
            let piece = &text[unit];
            if !self.budget.fits(piece) {
                return Err(ChatveilError::UnsplittableUnitError {
                    bytes: piece.len(),
                    chars: piece.chars().count(),
                    byte_budget: self.budget.bytes,
                    char_budget: self.budget.chars,
                });
            }
            if current.is_empty() {
                current.push_str(piece);
                continue;
            }
            let bytes = current.len() + 1 + piece.len();
            let chars = current.chars().count() + 1 + piece.chars().count();
            if self.budget.fits_len(bytes, chars) {
                current.push(' ');
                current.push_str(piece);
            } else {
                chunks.push(std::mem::take(&mut current));
                current.push_str(piece);
            }
        }
        if !current.is_empty() {
            chunks.push(current);
        }
        debug!("Split message of {} bytes into {} chunk(s).", text.len(), chunks.len());
        Ok(chunks)
    }
}
