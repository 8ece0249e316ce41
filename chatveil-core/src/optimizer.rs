//! optimizer.rs - Shorthand substitution to meet size budgets.
//!
//! Words outside transformed spans are shortened first, biggest saving
//! first, until the budgets hold. Only then are words touching a transformed
//! span considered, and each of those substitutions is re-scanned and
//! reverted if it makes a filter entry reappear.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;

use crate::config::Budget;
use crate::matches::loggable;
use crate::scanner::RawScanner;

/// One applied shorthand substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShorthandSub {
    pub original: String,
    pub replacement: String,
    /// Byte offset in the optimizer's input text.
    pub start: usize,
    /// The word touched a transformed span.
    pub inside_span: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizeOutcome {
    pub text: String,
    pub substitutions: Vec<ShorthandSub>,
    /// Substitutions undone because the result matched a filter entry.
    pub reverted: Vec<ShorthandSub>,
    /// The transformed spans, remapped into `text`.
    pub spans: Vec<Range<usize>>,
    pub fits: bool,
}

#[derive(Debug, Clone)]
struct Candidate {
    range: Range<usize>,
    replacement: String,
    saved_bytes: isize,
    saved_chars: isize,
}

/// Applies a whole-word shorthand dictionary under a byte/char budget.
#[derive(Debug, Clone)]
pub struct SizeOptimizer {
    dictionary: BTreeMap<String, String>,
    max_key_words: usize,
    budget: Budget,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '\'' || c == '\u{2019}'
}

/// Punctuation that may open or close a word without being part of it.
const EDGE_PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '!', '?', '"', '(', ')', '[', ']', '{', '}', '\u{201C}', '\u{201D}', '\u{2026}',
];

/// Whitespace-delimited chunks of `text`.
fn chunks(text: &str) -> Vec<Range<usize>> {
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

/// Whole words: a chunk minus its edge punctuation, made only of word
/// characters. Chunks like "mate$s" or "m\u{200B}ate" hold no word.
fn words(text: &str) -> Vec<Range<usize>> {
    chunks(text)
        .into_iter()
        .filter_map(|range| {
            let chunk = &text[range.clone()];
            let lead = chunk.len() - chunk.trim_start_matches(EDGE_PUNCTUATION).len();
            let core = chunk.trim_matches(EDGE_PUNCTUATION);
            if core.is_empty() || !core.chars().all(is_word_char) {
                return None;
            }
            let start = range.start + lead;
            Some(start..start + core.len())
        })
        .collect()
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Keeps a leading capital from the replaced word.
fn match_case(original: &str, replacement: &str) -> String {
    let starts_upper = original.chars().next().map(char::is_uppercase).unwrap_or(false);
    if !starts_upper {
        return replacement.to_string();
    }
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Applies non-overlapping substitutions, returning the new text.
fn apply(text: &str, subs: &[Candidate]) -> String {
    let mut sorted: Vec<&Candidate> = subs.iter().collect();
    sorted.sort_by_key(|c| c.range.start);
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for c in sorted {
        out.push_str(&text[last..c.range.start]);
        out.push_str(&c.replacement);
        last = c.range.end;
    }
    out.push_str(&text[last..]);
    out
}

/// Maps a range of the input text into the text produced by `subs`.
fn remap(range: &Range<usize>, subs: &[Candidate]) -> Range<usize> {
    let mut start = range.start;
    let mut end = range.end;
    for c in subs {
        if overlaps(&c.range, range) {
            start = start.min(c.range.start);
            end = end.max(c.range.end);
        }
    }
    let shift = |pos: usize| -> usize {
        let delta: isize = subs.iter().filter(|c| c.range.end <= pos).map(|c| -c.saved_bytes).sum();
        (pos as isize + delta) as usize
    };
    let new_start = shift(start);
    // A substitution ending exactly at `end` is already counted by `shift`.
    new_start..shift(end).max(new_start)
}

impl SizeOptimizer {
    pub fn new(dictionary: BTreeMap<String, String>, budget: Budget) -> Self {
        let dictionary: BTreeMap<String, String> = dictionary
            .into_iter()
            .map(|(k, v)| (k.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase(), v))
            .filter(|(k, v)| !k.is_empty() && !v.is_empty())
            .collect();
        let max_key_words = dictionary.keys().map(|k| k.split(' ').count()).max().unwrap_or(0);
        Self { dictionary, max_key_words, budget }
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    fn candidates(&self, text: &str) -> Vec<Candidate> {
        let words = words(text);
        let mut out = Vec::new();
        for i in 0..words.len() {
            for n in 1..=self.max_key_words.min(words.len() - i) {
                let run = &words[i..i + n];
                // Multi-word keys only match across single spaces.
                if run.windows(2).any(|w| &text[w[0].end..w[1].start] != " ") {
                    break;
                }
                let range = run[0].start..run[n - 1].end;
                let phrase = &text[range.clone()];
                if let Some(short) = self.dictionary.get(&phrase.to_lowercase()) {
                    let replacement = match_case(phrase, short);
                    let saved_bytes = phrase.len() as isize - replacement.len() as isize;
                    let saved_chars = phrase.chars().count() as isize - replacement.chars().count() as isize;
                    if saved_bytes > 0 || saved_chars > 0 {
                        out.push(Candidate { range, replacement, saved_bytes, saved_chars });
                    }
                }
            }
        }
        out.sort_by(|a, b| {
            b.saved_bytes
                .cmp(&a.saved_bytes)
                .then(b.saved_chars.cmp(&a.saved_chars))
                .then(a.range.start.cmp(&b.range.start))
        });
        out
    }

    /// Shortens `text` until it fits the budget or the dictionary runs out.
    ///
    /// `spans` are transformed regions and `protected` are regions (links)
    /// that must never change. The scanner, when given, re-validates
    /// substitutions that touch a transformed span.
    pub fn optimize(
        &self,
        text: &str,
        spans: &[Range<usize>],
        protected: &[Range<usize>],
        scanner: Option<&RawScanner<'_>>,
    ) -> OptimizeOutcome {
        self.run(text, spans, protected, scanner, true)
    }

    /// Applies every substitution outside `protected`, whatever the budget.
    pub fn exhaust(&self, text: &str, protected: &[Range<usize>]) -> OptimizeOutcome {
        self.run(text, &[], protected, None, false)
    }

    fn run(
        &self,
        text: &str,
        spans: &[Range<usize>],
        protected: &[Range<usize>],
        scanner: Option<&RawScanner<'_>>,
        until_fits: bool,
    ) -> OptimizeOutcome {
        let mut bytes = text.len() as isize;
        let mut chars = text.chars().count() as isize;
        let fits = |b: isize, c: isize| self.budget.fits_len(b.max(0) as usize, c.max(0) as usize);

        if (until_fits && fits(bytes, chars)) || self.dictionary.is_empty() {
            return OptimizeOutcome {
                text: text.to_string(),
                substitutions: Vec::new(),
                reverted: Vec::new(),
                spans: spans.to_vec(),
                fits: fits(bytes, chars),
            };
        }

        let all = self.candidates(text);
        let (outside, inside): (Vec<Candidate>, Vec<Candidate>) = all
            .into_iter()
            .filter(|c| !protected.iter().any(|p| overlaps(p, &c.range)))
            .partition(|c| !spans.iter().any(|s| overlaps(s, &c.range)));

        let mut chosen: Vec<Candidate> = Vec::new();
        let mut inside_flags: Vec<bool> = Vec::new();
        for c in outside {
            if until_fits && fits(bytes, chars) {
                break;
            }
            if chosen.iter().any(|k| overlaps(&k.range, &c.range)) {
                continue;
            }
            bytes -= c.saved_bytes;
            chars -= c.saved_chars;
            chosen.push(c);
            inside_flags.push(false);
        }

        let mut reverted = Vec::new();
        for c in inside {
            if until_fits && fits(bytes, chars) {
                break;
            }
            if chosen.iter().any(|k| overlaps(&k.range, &c.range)) {
                continue;
            }
            let sub = ShorthandSub {
                original: text[c.range.clone()].to_string(),
                replacement: c.replacement.clone(),
                start: c.range.start,
                inside_span: true,
            };
            let mut trial = chosen.clone();
            trial.push(c.clone());
            if let Some(scanner) = scanner {
                let trial_text = apply(text, &trial);
                let region = remap(&c.range, &trial);
                let collides = scanner
                    .scan(&trial_text)
                    .matches
                    .iter()
                    .any(|m| m.original_start < region.end && region.start < m.original_end);
                if collides {
                    debug!(
                        "Reverting shorthand '{}' -> '{}': it matches a filter entry.",
                        loggable(&sub.original),
                        loggable(&sub.replacement)
                    );
                    reverted.push(sub);
                    continue;
                }
            }
            bytes -= c.saved_bytes;
            chars -= c.saved_chars;
            chosen.push(c);
            inside_flags.push(true);
        }

        let result = apply(text, &chosen);
        let mut substitutions: Vec<ShorthandSub> = chosen
            .iter()
            .zip(inside_flags)
            .map(|(c, inside_span)| ShorthandSub {
                original: text[c.range.clone()].to_string(),
                replacement: c.replacement.clone(),
                start: c.range.start,
                inside_span,
            })
            .collect();
        substitutions.sort_by_key(|s| s.start);
        let spans = spans.iter().map(|s| remap(s, &chosen)).collect();
        let fits = self.budget.fits(&result);
        debug!(
            "Shorthand applied {} substitution(s): {} -> {} bytes, fits={}.",
            substitutions.len(),
            text.len(),
            result.len(),
            fits
        );
        OptimizeOutcome { text: result, substitutions, reverted, spans, fits }
    }
}
