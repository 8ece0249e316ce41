// chatveil/src/logger.rs
//! Logger initialisation for the CLI.
//!
//! Logs go to stderr so that stdout only ever carries the message.
//! License: MIT OR APACHE 2.0

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Initialises `env_logger`. An explicit `level` wins over `RUST_LOG`,
/// which in turn defaults to `warn`.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).target(Target::Stderr);
    // A second initialisation (e.g. from tests) is harmless.
    let _ = builder.try_init();
}

/// The level implied by the `--quiet` and `--debug` flags.
pub fn level_from_flags(quiet: bool, debug: bool) -> Option<LevelFilter> {
    if quiet {
        Some(LevelFilter::Off)
    } else if debug {
        Some(LevelFilter::Debug)
    } else {
        None
    }
}
