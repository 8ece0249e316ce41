//! errors.rs - Custom error types for the chatveil-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `chatveil-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ChatveilError {
    /// The filter list could not be turned into an automaton. The previously
    /// published generation stays active.
    #[error("Failed to build pattern index: {0}")]
    IndexBuildError(String),

    #[error("Filter entry '{0}': length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    /// No combination of enabled strategies produced a clean re-scan for
    /// the span at `start..end` of the input.
    #[error("No enabled strategy defeats the match at {start}..{end}")]
    UnresolvableSpanError { start: usize, end: usize },

    /// A single word or transformed span is larger than the budget by itself.
    #[error("Unit of {bytes} bytes / {chars} chars exceeds the budget ({byte_budget} bytes / {char_budget} chars)")]
    UnsplittableUnitError {
        bytes: usize,
        chars: usize,
        byte_budget: usize,
        char_budget: usize,
    },

    /// A manual-mode commit named a candidate the report does not hold.
    #[error("No candidate at position {0}")]
    CandidateNotFound(usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),
}
