// chatveil/src/lib.rs
//! # chatveil CLI
//!
//! Command-line front end for `chatveil-core`. It loads the filter list,
//! whitelist and engine configuration, runs one message through the engine
//! and prints the result, a list of manual-mode candidates, or a scan report.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
pub mod utils;
