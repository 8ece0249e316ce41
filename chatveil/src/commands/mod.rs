// chatveil/src/commands/mod.rs
//! Command implementations and the setup they share.
//! License: MIT OR APACHE 2.0

pub mod process;
pub mod scan;

use anyhow::{bail, Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::io::{self, Read};

use chatveil_core::{load_filter_file, load_whitelist_file, EngineConfig, FilterEntry, ModeRouter};

use crate::cli::SourceArgs;
use crate::utils::paths;

pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
pub const DEFAULT_FILTER_FILE: &str = "filter.txt";
pub const DEFAULT_WHITELIST_FILE: &str = "whitelist.txt";

/// Reads the message from the argument, `--input-file` or stdin.
///
/// One trailing line break is dropped so that `echo` input matches the
/// argument form.
pub fn read_input(source: &SourceArgs) -> Result<String> {
    let mut text = if let Some(text) = &source.text {
        text.clone()
    } else if let Some(path) = &source.input_file {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read input file {}", path.display()))?
    } else {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            bail!("No message given. Pass it as an argument, with --input-file, or on stdin.");
        }
        let mut buf = String::new();
        stdin.lock().read_to_string(&mut buf).context("Failed to read stdin")?;
        buf
    };
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    Ok(text)
}

/// Loads the configuration named on the command line or the default one.
pub fn load_config(source: &SourceArgs) -> Result<EngineConfig> {
    match paths::resolve(source.config.as_ref(), DEFAULT_CONFIG_FILE) {
        Some(path) => {
            info!("Using configuration {}", path.display());
            EngineConfig::load_from_file(&path)
        }
        None => {
            debug!("No configuration file, using defaults.");
            Ok(EngineConfig::default())
        }
    }
}

/// Loads the filter list and whitelist named on the command line or found
/// in the config directory. Missing defaults mean empty lists.
pub fn load_lists(source: &SourceArgs) -> Result<(Vec<FilterEntry>, Vec<String>)> {
    let entries = match paths::resolve(source.filter.as_ref(), DEFAULT_FILTER_FILE) {
        Some(path) => load_filter_file(&path)?.0,
        None => {
            debug!("No filter list found.");
            Vec::new()
        }
    };
    let whitelist = match paths::resolve(source.whitelist.as_ref(), DEFAULT_WHITELIST_FILE) {
        Some(path) => load_whitelist_file(&path)?.0,
        None => Vec::new(),
    };
    Ok((entries, whitelist))
}

/// Builds a router from `config` and the lists selected by `source`.
pub fn build_router(config: EngineConfig, source: &SourceArgs) -> Result<ModeRouter> {
    let (entries, whitelist) = load_lists(source)?;
    if entries.is_empty() {
        log::warn!("The filter list is empty; nothing will be detected.");
    }
    let router = ModeRouter::with_lists(config, entries, whitelist).context("Failed to set up the engine")?;
    Ok(router)
}
