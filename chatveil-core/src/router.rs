//! router.rs - Runs a message through the whole pipeline.
//!
//! `ModeRouter` owns the configuration, the swappable pattern index and the
//! whitelist. Every request captures one index snapshot and uses it for
//! detection, every re-scan and the final clean check.
//!
//! Manual mode stops after transformation and returns ranked candidates;
//! `commit` finishes the one the caller picked. Auto mode finishes the
//! candidates itself and returns the first one that fits.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::Arc;

use crate::config::{EngineConfig, Mode};
use crate::errors::ChatveilError;
use crate::index::{IndexSnapshot, PatternIndex};
use crate::links::{find_links, partition_protected};
use crate::loader::FilterEntry;
use crate::matches::{loggable, Match};
use crate::optimizer::{ShorthandSub, SizeOptimizer};
use crate::resolver::{resolve, ResolvedSpan};
use crate::scanner::{RawScanner, ScanOptions};
use crate::splitter::MessageSplitter;
use crate::transform::force::force_transform;
use crate::transform::{Intensity, Strategy, TransformEngine, TransformParams};
use crate::whitelist::{Whitelist, WhitelistFilter};

/// Non-fatal findings attached to a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The input was empty or whitespace and is returned unchanged.
    EmptyInput,
    /// No strategy combination defeated the span at `start..end` of the input.
    Unresolvable { start: usize, end: usize, patterns: Vec<String> },
    /// A match inside a link was left alone.
    ProtectedLink { start: usize, end: usize, pattern: String },
    /// A shorthand form was undone because it matched a filter entry.
    ShorthandReverted { original: String, replacement: String },
    /// A match found in the output at `start..end` that no span accounts for.
    Residual { start: usize, end: usize, pattern: String },
}

/// A span of the input and what it became.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlteredSpan {
    /// Byte range in the input.
    pub start: usize,
    pub end: usize,
    /// Byte range in the output text.
    pub output_start: usize,
    pub output_end: usize,
    pub output: String,
    pub patterns: Vec<String>,
    pub strategies: Vec<Strategy>,
    pub intensity: Intensity,
}

/// Everything detection found in one message.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Detection {
    pub generation: u64,
    /// Matches that survived whitelist and link filtering.
    pub matches: Vec<Match>,
    /// Matches left alone because they sit inside a link.
    pub protected: Vec<Match>,
    pub spans: Vec<ResolvedSpan>,
    pub links: Vec<Range<usize>>,
}

impl Detection {
    pub fn is_clean(&self) -> bool {
        self.spans.is_empty()
    }
}

/// One transformed version of the message, before shorthand and splitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// 1-based. In manual reports lower means less visual distortion.
    pub rank: usize,
    pub text: String,
    pub altered: Vec<AlteredSpan>,
    /// Distinct strategies used by any span.
    pub strategies: Vec<Strategy>,
    pub diagnostics: Vec<Diagnostic>,
    pub clean: bool,
    pub byte_len: usize,
    pub char_len: usize,
}

impl Candidate {
    fn distortion(&self) -> (bool, usize, usize, usize, usize, usize) {
        let applications = self.altered.iter().map(|a| a.strategies.len()).sum();
        let full = self.altered.iter().filter(|a| a.intensity == Intensity::Full).count();
        (!self.clean, self.strategies.len(), self.altered.len(), applications, full, self.char_len)
    }
}

/// Manual-mode result: detection plus ranked candidates.
#[derive(Debug, Clone, Serialize)]
pub struct ManualReport {
    pub input: String,
    pub generation: u64,
    pub detection: Detection,
    pub candidates: Vec<Candidate>,
    #[serde(skip)]
    snapshot: Arc<IndexSnapshot>,
}

/// The final message returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizedMessage {
    pub text: String,
    /// `text` itself when it fits, otherwise the chunks to send in order.
    pub chunks: Vec<String>,
    pub byte_len: usize,
    pub char_len: usize,
    pub altered: Vec<AlteredSpan>,
    pub shorthand: Vec<ShorthandSub>,
    /// No filter entry is detectable in `text`.
    pub clean: bool,
    /// Index generation used for the whole request.
    pub generation: u64,
    pub diagnostics: Vec<Diagnostic>,
}

impl OptimizedMessage {
    pub fn is_split(&self) -> bool {
        self.chunks.len() > 1
    }

    fn unchanged(text: &str, generation: u64) -> Self {
        Self {
            text: text.to_string(),
            chunks: if text.is_empty() { Vec::new() } else { vec![text.to_string()] },
            byte_len: text.len(),
            char_len: text.chars().count(),
            altered: Vec::new(),
            shorthand: Vec::new(),
            clean: true,
            generation,
            diagnostics: vec![Diagnostic::EmptyInput],
        }
    }
}

/// Result of [`ModeRouter::process`], shaped by the configured mode.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RouterOutput {
    Manual(ManualReport),
    Auto(OptimizedMessage),
}

impl RouterOutput {
    /// Pretty-printed JSON for machine consumers.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

fn patterns_of(span: &ResolvedSpan) -> Vec<String> {
    span.patterns().into_iter().map(str::to_string).collect()
}

/// Orchestrates detection, transformation, shorthand and splitting.
#[derive(Debug)]
pub struct ModeRouter {
    config: EngineConfig,
    index: PatternIndex,
    whitelist: WhitelistFilter,
}

impl ModeRouter {
    /// A router with an empty index and whitelist.
    pub fn new(config: EngineConfig) -> Result<Self, ChatveilError> {
        config.validate()?;
        Ok(Self {
            index: PatternIndex::new(config.max_pattern_length),
            whitelist: WhitelistFilter::default(),
            config,
        })
    }

    pub fn with_lists(
        config: EngineConfig,
        entries: Vec<FilterEntry>,
        whitelist: Vec<String>,
    ) -> Result<Self, ChatveilError> {
        let router = Self::new(config)?;
        if !entries.is_empty() {
            router.reload_filters(entries)?;
        }
        router.reload_whitelist(whitelist);
        Ok(router)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn index(&self) -> &PatternIndex {
        &self.index
    }

    /// Publishes a new filter list. In-flight requests keep their snapshot.
    pub fn reload_filters(&self, entries: Vec<FilterEntry>) -> Result<u64, ChatveilError> {
        let generation = self.index.rebuild(entries)?;
        info!("Router now serving index generation {}.", generation);
        Ok(generation)
    }

    pub fn reload_whitelist(&self, words: Vec<String>) {
        self.whitelist.replace(Whitelist::new(words));
    }

    fn scanner<'a>(&self, snapshot: &'a IndexSnapshot) -> RawScanner<'a> {
        RawScanner::new(snapshot, ScanOptions::from(&self.config))
    }

    fn links_of(&self, text: &str) -> Vec<Range<usize>> {
        if self.config.link_protection {
            find_links(text)
        } else {
            Vec::new()
        }
    }

    /// Runs detection against the current index generation.
    pub fn detect(&self, text: &str) -> Detection {
        let snapshot = self.index.snapshot();
        self.detect_with(text, &snapshot)
    }

    fn detect_with(&self, text: &str, snapshot: &IndexSnapshot) -> Detection {
        let scan = self.scanner(snapshot).scan(text);
        let surviving = self.whitelist.snapshot().filter(&scan, snapshot);
        let links = self.links_of(text);
        let (matches, protected) = partition_protected(surviving, &links);
        let spans = resolve(matches.clone());
        debug!(
            "Detection: {} match(es) in {} span(s), {} protected by links.",
            matches.len(),
            spans.len(),
            protected.len()
        );
        Detection { generation: snapshot.generation(), matches, protected, spans, links }
    }

    /// Serves `text` in the configured mode.
    pub fn process(&self, text: &str) -> Result<RouterOutput, ChatveilError> {
        match self.config.mode {
            Mode::Manual => Ok(RouterOutput::Manual(self.manual(text))),
            Mode::Auto => self.auto(text).map(RouterOutput::Auto),
        }
    }

    /// Preference orders tried when building candidates: the configured one,
    /// each other strategy moved to the front, then each strategy alone.
    fn candidate_orders(&self, first: &[Strategy]) -> Vec<Vec<Strategy>> {
        let mut orders: Vec<Vec<Strategy>> = vec![first.to_vec()];
        let mut push = |order: Vec<Strategy>| {
            if !order.is_empty() && !orders.contains(&order) {
                orders.push(order);
            }
        };
        for &s in &self.config.strategies {
            let mut order = vec![s];
            order.extend(self.config.strategies.iter().copied().filter(|&o| o != s));
            push(order);
        }
        for &s in &self.config.strategies {
            push(vec![s]);
        }
        orders
    }

    /// Transforms every span of `detection` with one engine.
    fn build_candidate(
        &self,
        text: &str,
        detection: &Detection,
        engine: &TransformEngine,
        snapshot: &IndexSnapshot,
    ) -> Candidate {
        let scanner = self.scanner(snapshot);
        let mut out = String::with_capacity(text.len() * 2);
        let mut altered = Vec::new();
        let mut diagnostics: Vec<Diagnostic> = detection
            .protected
            .iter()
            .map(|m| Diagnostic::ProtectedLink {
                start: m.original_start,
                end: m.original_end,
                pattern: m.pattern.clone(),
            })
            .collect();
        let mut untouched: Vec<Range<usize>> = Vec::new();
        let mut last = 0;

        for span in &detection.spans {
            out.push_str(&text[last..span.start]);
            let output_start = out.len();
            match engine.transform_span(text, span, &scanner) {
                Ok(outcome) => {
                    out.push_str(&outcome.output);
                    altered.push(AlteredSpan {
                        start: span.start,
                        end: span.end,
                        output_start,
                        output_end: out.len(),
                        output: outcome.output,
                        patterns: patterns_of(span),
                        strategies: outcome.strategies,
                        intensity: outcome.intensity,
                    });
                }
                Err(e) => {
                    warn!("{}", e);
                    out.push_str(&text[span.range()]);
                    untouched.push(output_start..out.len());
                    diagnostics.push(Diagnostic::Unresolvable {
                        start: span.start,
                        end: span.end,
                        patterns: patterns_of(span),
                    });
                }
            }
            last = span.end;
        }
        out.push_str(&text[last..]);

        let residual = self.residual(&out, snapshot, &untouched);
        let clean = untouched.is_empty() && residual.is_empty();
        diagnostics.extend(residual);

        let mut strategies: Vec<Strategy> = altered.iter().flat_map(|a| a.strategies.iter().copied()).collect();
        strategies.sort();
        strategies.dedup();
        Candidate {
            rank: 0,
            byte_len: out.len(),
            char_len: out.chars().count(),
            text: out,
            altered,
            strategies,
            diagnostics,
            clean,
        }
    }

    /// Matches in `text` outside the regions left untouched on purpose.
    fn residual(&self, text: &str, snapshot: &IndexSnapshot, untouched: &[Range<usize>]) -> Vec<Diagnostic> {
        self.detect_with(text, snapshot)
            .matches
            .into_iter()
            .filter(|m| !untouched.iter().any(|r| r.start <= m.original_start && m.original_end <= r.end))
            .map(|m| Diagnostic::Residual { start: m.original_start, end: m.original_end, pattern: m.pattern })
            .collect()
    }

    /// Candidates in the order their preference orders were tried.
    fn candidates(
        &self,
        text: &str,
        detection: &Detection,
        snapshot: &IndexSnapshot,
        first: &[Strategy],
    ) -> Vec<Candidate> {
        let base = TransformEngine::from_config(&self.config);
        let mut candidates: Vec<Candidate> = Vec::new();
        for order in self.candidate_orders(first) {
            let candidate = self.build_candidate(text, detection, &base.with_order(order), snapshot);
            if !candidates.iter().any(|c| c.text == candidate.text) {
                candidates.push(candidate);
            }
            if detection.is_clean() {
                break;
            }
        }
        for (i, c) in candidates.iter_mut().enumerate() {
            c.rank = i + 1;
        }
        candidates
    }

    /// Detects and transforms, returning ranked candidates without
    /// shortening or splitting them.
    pub fn manual(&self, text: &str) -> ManualReport {
        let snapshot = self.index.snapshot();
        let generation = snapshot.generation();
        if is_blank(text) {
            let candidate = Candidate {
                rank: 1,
                text: text.to_string(),
                altered: Vec::new(),
                strategies: Vec::new(),
                diagnostics: vec![Diagnostic::EmptyInput],
                clean: true,
                byte_len: text.len(),
                char_len: text.chars().count(),
            };
            return ManualReport {
                input: text.to_string(),
                generation,
                detection: Detection { generation, ..Detection::default() },
                candidates: vec![candidate],
                snapshot,
            };
        }

        let detection = self.detect_with(text, &snapshot);
        let mut candidates = self.candidates(text, &detection, &snapshot, &self.config.strategies);
        // Stable: equal distortion keeps the preference order.
        candidates.sort_by_key(Candidate::distortion);
        for (i, c) in candidates.iter_mut().enumerate() {
            c.rank = i + 1;
        }
        candidates.truncate(self.config.candidate_limit.max(1));
        debug!("Manual mode offers {} candidate(s).", candidates.len());
        ManualReport { input: text.to_string(), generation, detection, candidates, snapshot }
    }

    /// Finishes the candidate at `choice` (0-based) of a manual report.
    pub fn commit(&self, report: &ManualReport, choice: usize) -> Result<OptimizedMessage, ChatveilError> {
        let candidate = report.candidates.get(choice).ok_or(ChatveilError::CandidateNotFound(choice))?;
        if candidate.diagnostics.contains(&Diagnostic::EmptyInput) {
            return Ok(OptimizedMessage::unchanged(&candidate.text, report.generation));
        }
        self.finalize(candidate, &report.snapshot)
    }

    /// Runs the whole pipeline with the configured preference order.
    pub fn auto(&self, text: &str) -> Result<OptimizedMessage, ChatveilError> {
        self.auto_with_order(text, &self.config.strategies)
    }

    /// Runs the whole pipeline, preferring strategies in `order`.
    ///
    /// Candidates are finished in preference order. The first clean one that
    /// fits is returned; failing that the first that fits at all.
    pub fn auto_with_order(&self, text: &str, order: &[Strategy]) -> Result<OptimizedMessage, ChatveilError> {
        if order.is_empty() {
            return Err(ChatveilError::InvalidConfig("At least one strategy must be enabled.".to_string()));
        }
        let snapshot = self.index.snapshot();
        if is_blank(text) {
            return Ok(OptimizedMessage::unchanged(text, snapshot.generation()));
        }

        let detection = self.detect_with(text, &snapshot);
        let candidates = self.candidates(text, &detection, &snapshot, order);

        let mut fallback: Option<OptimizedMessage> = None;
        let mut first_error: Option<ChatveilError> = None;
        for candidate in &candidates {
            match self.finalize(candidate, &snapshot) {
                Ok(message) if message.clean => return Ok(message),
                Ok(message) => {
                    fallback.get_or_insert(message);
                }
                Err(e) => {
                    debug!("Candidate {} rejected: {}", candidate.rank, e);
                    first_error.get_or_insert(e);
                }
            }
        }
        match (fallback, first_error) {
            (Some(message), _) => Ok(message),
            (None, Some(e)) => Err(e),
            (None, None) => Ok(OptimizedMessage::unchanged(text, snapshot.generation())),
        }
    }

    /// Shortens and, if needed, splits a candidate.
    fn finalize(&self, candidate: &Candidate, snapshot: &IndexSnapshot) -> Result<OptimizedMessage, ChatveilError> {
        let budget = self.config.budget();
        let mut text = candidate.text.clone();
        let mut altered = candidate.altered.clone();
        let mut diagnostics = candidate.diagnostics.clone();
        let mut shorthand = Vec::new();
        let mut clean = candidate.clean;

        if !budget.fits(&text) {
            let spans: Vec<Range<usize>> = altered.iter().map(|a| a.output_start..a.output_end).collect();
            let links = self.links_of(&text);
            let optimizer = SizeOptimizer::new(self.config.shorthand.effective_dictionary(), budget);
            let outcome = optimizer.optimize(&text, &spans, &links, Some(&self.scanner(snapshot)));
            diagnostics.extend(outcome.reverted.iter().map(|s| Diagnostic::ShorthandReverted {
                original: s.original.clone(),
                replacement: s.replacement.clone(),
            }));

            if !outcome.substitutions.is_empty() {
                let recheck = self.detect_with(&outcome.text, snapshot);
                if clean && !recheck.is_clean() {
                    debug!("Shorthand made '{}' detectable again; keeping the long form.", loggable(&text));
                    diagnostics.extend(outcome.substitutions.iter().map(|s| Diagnostic::ShorthandReverted {
                        original: s.original.clone(),
                        replacement: s.replacement.clone(),
                    }));
                } else {
                    for (a, range) in altered.iter_mut().zip(&outcome.spans) {
                        a.output_start = range.start;
                        a.output_end = range.end;
                        a.output = outcome.text[range.clone()].to_string();
                    }
                    clean = recheck.is_clean();
                    text = outcome.text;
                    shorthand = outcome.substitutions;
                }
            }
        }

        let chunks = if budget.fits(&text) {
            vec![text.clone()]
        } else {
            let spans: Vec<Range<usize>> = altered.iter().map(|a| a.output_start..a.output_end).collect();
            MessageSplitter::new(budget).split(&text, &spans)?
        };

        Ok(OptimizedMessage {
            byte_len: text.len(),
            char_len: text.chars().count(),
            text,
            chunks,
            altered,
            shorthand,
            clean,
            generation: snapshot.generation(),
            diagnostics,
        })
    }

    /// Transforms every word outside links without running detection first.
    ///
    /// Shorthand is applied to the plain text beforehand when the forced
    /// form would not fit, since transformed words no longer match the
    /// dictionary.
    pub fn force_optimize(&self, text: &str) -> Result<OptimizedMessage, ChatveilError> {
        let snapshot = self.index.snapshot();
        if is_blank(text) {
            return Ok(OptimizedMessage::unchanged(text, snapshot.generation()));
        }
        let budget = self.config.budget();
        let params = TransformParams::from(&self.config);
        let order = &self.config.strategies;

        let mut source = text.to_string();
        let mut shorthand = Vec::new();
        let mut forced = force_transform(&source, order, &params, &self.links_of(&source));
        if !budget.fits(&forced) {
            let optimizer = SizeOptimizer::new(self.config.shorthand.effective_dictionary(), budget);
            let outcome = optimizer.exhaust(&source, &self.links_of(&source));
            if !outcome.substitutions.is_empty() {
                source = outcome.text;
                shorthand = outcome.substitutions;
                forced = force_transform(&source, order, &params, &self.links_of(&source));
            }
        }

        let residual = self.residual(&forced, &snapshot, &[]);
        let clean = residual.is_empty();
        let chunks = if budget.fits(&forced) {
            vec![forced.clone()]
        } else {
            MessageSplitter::new(budget).split(&forced, &[])?
        };
        let altered = vec![AlteredSpan {
            start: 0,
            end: text.len(),
            output_start: 0,
            output_end: forced.len(),
            output: forced.clone(),
            patterns: Vec::new(),
            strategies: order.clone(),
            intensity: Intensity::Full,
        }];
        info!("Force-optimized message into {} chunk(s).", chunks.len());
        Ok(OptimizedMessage {
            byte_len: forced.len(),
            char_len: forced.chars().count(),
            text: forced,
            chunks,
            altered,
            shorthand,
            clean,
            generation: snapshot.generation(),
            diagnostics: residual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShorthandConfig;

    fn router(words: &[&str], whitelist: &[&str]) -> ModeRouter {
        let entries = words.iter().map(|w| FilterEntry::new(w)).collect();
        let whitelist = whitelist.iter().map(|w| w.to_string()).collect();
        ModeRouter::with_lists(EngineConfig::default(), entries, whitelist).unwrap()
    }

    #[test]
    fn test_detect_reports_generation() {
        let r = router(&["ass"], &[]);
        let d = r.detect("a class act");
        assert_eq!(d.generation, 1);
        assert_eq!(d.spans.len(), 1);
        assert_eq!(d.spans[0].range(), 4..7);
    }

    #[test]
    fn test_auto_clean_message() {
        let r = router(&["ass"], &[]);
        let msg = r.auto("a class act").unwrap();
        assert_eq!(msg.text, "a cl4ss act");
        assert!(msg.clean);
        assert_eq!(msg.chunks, vec!["a cl4ss act".to_string()]);
        assert_eq!(msg.altered.len(), 1);
        assert_eq!(msg.altered[0].output, "4ss");
    }

    #[test]
    fn test_untouched_when_nothing_matches() {
        let r = router(&["ass"], &[]);
        let msg = r.auto("hello there").unwrap();
        assert_eq!(msg.text, "hello there");
        assert!(msg.altered.is_empty());
        assert!(msg.clean);
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        let r = router(&["ass"], &[]);
        let msg = r.auto("   ").unwrap();
        assert_eq!(msg.text, "   ");
        assert_eq!(msg.diagnostics, vec![Diagnostic::EmptyInput]);
        let report = r.manual("");
        assert_eq!(report.candidates.len(), 1);
        assert!(r.commit(&report, 0).unwrap().diagnostics.contains(&Diagnostic::EmptyInput));
    }

    #[test]
    fn test_links_are_protected() {
        let r = router(&["ass"], &[]);
        let msg = r.auto("see https://example.com/class").unwrap();
        assert_eq!(msg.text, "see https://example.com/class");
        assert!(matches!(msg.diagnostics[0], Diagnostic::ProtectedLink { .. }));
    }

    #[test]
    fn test_manual_ranks_least_distortion_first() {
        let r = router(&["ass"], &[]);
        let report = r.manual("a class act");
        assert!(!report.candidates.is_empty());
        assert!(report.candidates.len() <= r.config().candidate_limit);
        assert_eq!(report.candidates[0].rank, 1);
        assert_eq!(report.candidates[0].strategies, vec![Strategy::LeetSpeak]);
        let keys: Vec<_> = report.candidates.iter().map(Candidate::distortion).collect();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]));
        let msg = r.commit(&report, 1).unwrap();
        assert_eq!(msg.text, report.candidates[1].text);
        assert!(matches!(r.commit(&report, 99), Err(ChatveilError::CandidateNotFound(99))));
    }

    #[test]
    fn test_auto_with_other_order() {
        let r = router(&["ass"], &[]);
        let msg = r.auto_with_order("class", &[Strategy::FancyText]).unwrap();
        assert!(msg.clean);
        assert_eq!(msg.altered[0].strategies, vec![Strategy::FancyText]);
        assert!(r.auto_with_order("class", &[]).is_err());
    }

    #[test]
    fn test_unresolvable_span_is_a_diagnostic() {
        let config = EngineConfig { strategies: vec![Strategy::LeetSpeak], ..EngineConfig::default() };
        let r = ModeRouter::with_lists(config, vec![FilterEntry::new("bum")], Vec::new()).unwrap();
        let msg = r.auto("you bum").unwrap();
        assert!(!msg.clean);
        assert_eq!(msg.text, "you bum");
        assert!(msg.diagnostics.iter().any(|d| matches!(d, Diagnostic::Unresolvable { start: 4, end: 7, .. })));
    }

    #[test]
    fn test_process_follows_mode() {
        let config = EngineConfig { mode: Mode::Manual, ..EngineConfig::default() };
        let r = ModeRouter::with_lists(config, vec![FilterEntry::new("ass")], Vec::new()).unwrap();
        assert!(matches!(r.process("class").unwrap(), RouterOutput::Manual(_)));
    }

    #[test]
    fn test_shorthand_then_split() {
        let config = EngineConfig {
            byte_budget: 12,
            char_budget: 0,
            shorthand: ShorthandConfig::with_entries([("you", "u")]),
            ..EngineConfig::default()
        };
        let r = ModeRouter::new(config).unwrap();
        let msg = r.auto("you know what you said").unwrap();
        assert!(msg.shorthand.len() >= 1);
        assert!(msg.is_split());
        assert!(msg.chunks.iter().all(|c| c.len() <= 12));
    }

    #[test]
    fn test_force_optimize() {
        let r = router(&["ass"], &[]);
        let msg = r.force_optimize("hi 42").unwrap();
        assert_eq!(msg.text, "\u{1F137}! 4\u{119E}2");
        assert!(msg.clean);
    }

    #[test]
    fn test_snapshot_is_kept_across_rebuild() {
        let r = router(&["ass"], &[]);
        let report = r.manual("class");
        r.reload_filters(vec![FilterEntry::new("zzz")]).unwrap();
        assert_eq!(r.index().generation(), 2);
        let msg = r.commit(&report, 0).unwrap();
        assert_eq!(msg.generation, 1);
    }
}
