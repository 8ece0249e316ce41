//! transform - Obfuscation strategies and the per-span escalation ladder.
//!
//! Strategies are a closed set dispatched by enum. Each one implements
//! [`SpanTransform`] over the characters of a single resolved span. The
//! [`TransformEngine`] tries increasingly aggressive attempts until the
//! transformed span no longer re-scans as a match.
//!
//! License: MIT OR APACHE 2.0

pub mod fancy;
pub mod force;
pub mod interspace;
pub mod leet;

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

use chatveil_scan::classify::is_separator;
use chatveil_scan::FancyStyle;

use crate::config::{EngineConfig, Escalation, DEFAULT_INTERSPACING_CHAR};
use crate::errors::ChatveilError;
use crate::matches::log_transform_debug;
use crate::resolver::ResolvedSpan;
use crate::scanner::RawScanner;

pub use fancy::FancyText;
pub use interspace::Interspacing;
pub use leet::LeetSpeak;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    LeetSpeak,
    FancyText,
    Interspacing,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::LeetSpeak, Strategy::FancyText, Strategy::Interspacing];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::LeetSpeak => "leet_speak",
            Strategy::FancyText => "fancy_text",
            Strategy::Interspacing => "interspacing",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().replace('-', "_");
        Self::ALL.iter().copied().find(|s| s.name().eq_ignore_ascii_case(&name))
    }

    fn transformer(self) -> &'static dyn SpanTransform {
        match self {
            Strategy::LeetSpeak => &LeetSpeak,
            Strategy::FancyText => &FancyText,
            Strategy::Interspacing => &Interspacing,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How much of a span a strategy touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    /// One character per covered match.
    Minimal,
    /// Every eligible character of the span.
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformParams {
    pub fancy_style: FancyStyle,
    pub interspacing_char: char,
    pub stride: usize,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            fancy_style: FancyStyle::default(),
            interspacing_char: DEFAULT_INTERSPACING_CHAR,
            stride: 1,
        }
    }
}

impl From<&EngineConfig> for TransformParams {
    fn from(config: &EngineConfig) -> Self {
        Self {
            fancy_style: config.fancy_style,
            interspacing_char: config.interspacing.character,
            stride: config.interspacing.stride.max(1),
        }
    }
}

/// A single obfuscation strategy applied to the characters of one span.
pub trait SpanTransform {
    fn strategy(&self) -> Strategy;

    /// Transforms `chars`. `targets` are the char ranges of the matches the
    /// span covers. Returns `None` when the strategy cannot change anything.
    fn apply(
        &self,
        chars: &[char],
        targets: &[Range<usize>],
        intensity: Intensity,
        params: &TransformParams,
    ) -> Option<Vec<char>>;
}

/// One rung of the escalation ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    /// Strategies applied together, in canonical order.
    pub strategies: Vec<Strategy>,
    pub intensity: Intensity,
}

impl Attempt {
    fn single(strategy: Strategy, intensity: Intensity) -> Self {
        Self { strategies: vec![strategy], intensity }
    }

    fn combined(mut strategies: Vec<Strategy>) -> Self {
        strategies.sort();
        Self { strategies, intensity: Intensity::Full }
    }

    pub fn label(&self) -> String {
        let names: Vec<&str> = self.strategies.iter().map(|s| s.name()).collect();
        format!("{}({:?})", names.join("+"), self.intensity)
    }
}

/// A span after transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanOutcome {
    /// Byte range in the input text.
    pub start: usize,
    pub end: usize,
    pub output: String,
    pub strategies: Vec<Strategy>,
    pub intensity: Intensity,
}

/// Applies the configured strategies to resolved spans.
#[derive(Debug, Clone)]
pub struct TransformEngine {
    order: Vec<Strategy>,
    escalation: Escalation,
    params: TransformParams,
}

impl TransformEngine {
    pub fn new(order: Vec<Strategy>, escalation: Escalation, params: TransformParams) -> Self {
        Self { order, escalation, params }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.strategies.clone(), config.escalation, TransformParams::from(config))
    }

    /// The same engine with a different preference order.
    pub fn with_order(&self, order: Vec<Strategy>) -> Self {
        Self { order, ..self.clone() }
    }

    pub fn order(&self) -> &[Strategy] {
        &self.order
    }

    pub fn params(&self) -> &TransformParams {
        &self.params
    }

    /// Every attempt in escalation order: single strategies, then pairs,
    /// then all enabled strategies together.
    pub fn attempts(&self) -> Vec<Attempt> {
        let mut out = Vec::new();
        match self.escalation {
            Escalation::Preference => {
                for &s in &self.order {
                    out.push(Attempt::single(s, Intensity::Minimal));
                    out.push(Attempt::single(s, Intensity::Full));
                }
            }
            Escalation::Distortion => {
                for intensity in [Intensity::Minimal, Intensity::Full] {
                    for &s in &self.order {
                        out.push(Attempt::single(s, intensity));
                    }
                }
            }
        }
        for i in 0..self.order.len() {
            for j in i + 1..self.order.len() {
                out.push(Attempt::combined(vec![self.order[i], self.order[j]]));
            }
        }
        if self.order.len() > 2 {
            out.push(Attempt::combined(self.order.clone()));
        }
        out
    }

    /// Applies one attempt to the chars of a span.
    pub fn apply_attempt(&self, chars: &[char], targets: &[Range<usize>], attempt: &Attempt) -> Option<Vec<char>> {
        let mut current = chars.to_vec();
        let mut targets = targets.to_vec();
        let mut changed = false;
        for &strategy in &attempt.strategies {
            if let Some(next) = strategy.transformer().apply(&current, &targets, attempt.intensity, &self.params) {
                if next.len() != current.len() {
                    targets = vec![0..next.len()];
                }
                current = next;
                changed = true;
            }
        }
        changed.then_some(current)
    }

    /// Transforms one span of `text` until it re-scans clean.
    pub fn transform_span(
        &self,
        text: &str,
        span: &ResolvedSpan,
        scanner: &RawScanner<'_>,
    ) -> Result<SpanOutcome, ChatveilError> {
        let span_text = &text[span.range()];
        let chars: Vec<char> = span_text.chars().collect();
        let targets = char_targets(span_text, span);

        for attempt in self.attempts() {
            let Some(out) = self.apply_attempt(&chars, &targets, &attempt) else {
                continue;
            };
            let output: String = out.into_iter().collect();
            if rescan_clean(text, span, &output, scanner) {
                log_transform_debug(module_path!(), span_text, &output, &attempt.label());
                return Ok(SpanOutcome {
                    start: span.start,
                    end: span.end,
                    output,
                    strategies: attempt.strategies.clone(),
                    intensity: attempt.intensity,
                });
            }
            debug!("Attempt {} still matches; escalating.", attempt.label());
        }
        Err(ChatveilError::UnresolvableSpanError { start: span.start, end: span.end })
    }
}

/// Char ranges of the span's matches, relative to the span.
fn char_targets(span_text: &str, span: &ResolvedSpan) -> Vec<Range<usize>> {
    let char_at = |byte: usize| span_text[..byte.min(span_text.len())].chars().count();
    let mut targets: Vec<Range<usize>> = span
        .matches
        .iter()
        .map(|m| char_at(m.original_start - span.start)..char_at(m.original_end - span.start))
        .collect();
    targets.sort_by_key(|r| (r.start, r.end));
    targets.dedup();
    targets
}

/// Re-scans the transformed span inside its surrounding token and reports
/// whether no match touches the replaced region.
pub fn rescan_clean(text: &str, span: &ResolvedSpan, output: &str, scanner: &RawScanner<'_>) -> bool {
    let token_start = text[..span.start]
        .char_indices()
        .rev()
        .find(|(_, c)| is_separator(*c))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let token_end = text[span.end..]
        .char_indices()
        .find(|(_, c)| is_separator(*c))
        .map(|(i, _)| span.end + i)
        .unwrap_or(text.len());

    let mut context = String::with_capacity(token_end - token_start + output.len());
    context.push_str(&text[token_start..span.start]);
    let out_start = context.len();
    context.push_str(output);
    let out_end = context.len();
    context.push_str(&text[span.end..token_end]);

    !scanner
        .scan(&context)
        .matches
        .iter()
        .any(|m| m.original_start < out_end && out_start < m.original_end)
}
