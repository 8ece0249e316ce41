// chatveil-core/src/lib.rs
//! # Chatveil Core Library
//!
//! `chatveil-core` finds the words a chat filter would censor in a message
//! and rewrites them so that no filter entry is detectable any more, while
//! keeping the message readable and within the destination's size limits.
//!
//! The library performs no I/O on the hot path. Filter lists, whitelists and
//! configuration are handed to it as in-memory data; the `loader` and
//! `config` modules offer helpers to read them from files.
//!
//! ## Modules
//!
//! * `config`: `EngineConfig`, size budgets and the built-in shorthand table.
//! * `loader`: Parses filter and whitelist files into `FilterEntry` values.
//! * `index`: `PatternIndex`, the automaton with generation snapshots.
//! * `scanner`: Direct and sliding-window detection.
//! * `whitelist`: Position-sensitive whitelist filtering.
//! * `links`: Keeps matches inside URLs untouched.
//! * `resolver`: Collapses overlapping matches into disjoint spans.
//! * `transform`: Leet-speak, fancy text and interspacing, plus force mode.
//! * `optimizer`: Shorthand substitution under byte/char budgets.
//! * `splitter`: Word-boundary chunking of messages that still do not fit.
//! * `router`: `ModeRouter`, the Manual and Auto pipelines.
//! * `headless`: One-shot convenience wrapper.
//!
//! ## Usage Example
//!
//! ```rust
//! use chatveil_core::{EngineConfig, FilterEntry, ModeRouter};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let router = ModeRouter::with_lists(
//!         EngineConfig::default(),
//!         vec![FilterEntry::new("ass")],
//!         Vec::new(),
//!     )?;
//!
//!     let message = router.auto("what a classy move")?;
//!     assert!(message.clean);
//!     println!("{}", message.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! File and YAML loading return `anyhow::Result`. Engine operations return
//! [`ChatveilError`]. Spans that cannot be resolved do not fail a request;
//! they are reported as [`Diagnostic`]s on the result.
//!
//! ---
//! License: MIT OR APACHE 2.0

pub mod config;
pub mod errors;
pub mod headless;
pub mod index;
pub mod links;
pub mod loader;
pub mod matches;
pub mod optimizer;
pub mod resolver;
pub mod router;
pub mod scanner;
pub mod splitter;
pub mod transform;
pub mod whitelist;

/// Re-exports the configuration types.
pub use config::{
    Budget, EngineConfig, Escalation, InterspacingConfig, Mode, ShorthandConfig, DEFAULT_BYTE_BUDGET,
    DEFAULT_CHAR_BUDGET, DEFAULT_INTERSPACING_CHAR, MAX_PATTERN_LENGTH,
};

pub use errors::ChatveilError;

/// Re-exports list loading.
pub use loader::{load_filter_file, load_whitelist_file, parse_filter_list, parse_whitelist, FilterEntry, LoadStats};

/// Re-exports the detection pipeline.
pub use index::{IndexSnapshot, PatternIndex};
pub use matches::{Match, MatchSource};
pub use resolver::{resolve, ResolvedSpan};
pub use scanner::{RawScan, RawScanner, ScanOptions};
pub use whitelist::{Whitelist, WhitelistFilter};

/// Re-exports transformation and output assembly.
pub use optimizer::{OptimizeOutcome, ShorthandSub, SizeOptimizer};
pub use splitter::MessageSplitter;
pub use transform::{Intensity, SpanOutcome, SpanTransform, Strategy, TransformEngine, TransformParams};

/// Re-exports the router and its results.
pub use router::{
    AlteredSpan, Candidate, Detection, Diagnostic, ManualReport, ModeRouter, OptimizedMessage, RouterOutput,
};

pub use headless::{headless_process, HeadlessMode};

pub use chatveil_scan::FancyStyle;
