// chatveil-core/src/headless.rs

//! `headless.rs`
//! Convenience wrappers for running the engine without any UI.
//! Provides one-shot processing of a single message.

use anyhow::Result;

use crate::config::EngineConfig;
use crate::loader::FilterEntry;
use crate::router::{ModeRouter, OptimizedMessage};

/// Selects the pipeline used in headless mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadlessMode {
    /// Detection-driven transformation.
    Auto,
    /// Transform every word, detection or not.
    Force,
}

/// Processes one message end to end and returns the final result.
///
/// # Arguments
///
/// * `config` - The engine configuration.
/// * `entries` - The filter list. May be empty.
/// * `whitelist` - Whitelisted words.
/// * `text` - The message.
/// * `mode` - Which pipeline to run.
pub fn headless_process(
    config: EngineConfig,
    entries: Vec<FilterEntry>,
    whitelist: Vec<String>,
    text: &str,
    mode: HeadlessMode,
) -> Result<OptimizedMessage> {
    let router = ModeRouter::with_lists(config, entries, whitelist)?;
    let message = match mode {
        HeadlessMode::Auto => router.auto(text)?,
        HeadlessMode::Force => router.force_optimize(text)?,
    };
    Ok(message)
}
