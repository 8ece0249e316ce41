// chatveil/src/cli.rs
//! This file defines the command-line interface (CLI) for the chatveil application,
//! including all available commands and their arguments.
//! License: MIT OR APACHE 2.0

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "chatveil",
    author = "Relay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Rewrite chat messages so filtered words stay readable but undetectable",
    long_about = "Chatveil finds the words a chat filter list would censor and rewrites them with leet-speak, fancy Unicode letters or invisible interspacing until no filter entry is detectable. Messages are shortened with shorthand or split into chunks to fit the chat's byte and character limits.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// Specify the path to a custom YAML theme file.
    #[arg(long = "theme", value_name = "FILE", global = true, help = "Specify the path to a custom YAML theme file.")]
    pub theme: Option<PathBuf>,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `chatveil` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrites a message so that no filter entry survives.
    #[command(about = "Rewrite a message so that no filter entry survives.")]
    Process(ProcessCommand),

    /// Reports filter matches without rewriting anything.
    #[command(about = "Report filter matches in a message without rewriting it.")]
    Scan(ScanCommand),
}

/// Where the message and the lists come from. Shared by every command.
#[derive(Parser, Debug, Clone, Default)]
pub struct SourceArgs {
    /// The message. Read from --input-file or stdin when omitted.
    #[arg(value_name = "TEXT", help = "The message to process (reads --input-file or stdin if omitted).")]
    pub text: Option<String>,

    /// Path to an input file.
    #[arg(long, short = 'i', value_name = "FILE", conflicts_with = "text", help = "Read the message from a file.")]
    pub input_file: Option<PathBuf>,

    /// Filter list, one entry per line.
    #[arg(long, short = 'f', value_name = "FILE", env = "CHATVEIL_FILTER", help = "Filter list file (one entry per line).")]
    pub filter: Option<PathBuf>,

    /// Whitelist, one word per line.
    #[arg(long, short = 'w', value_name = "FILE", env = "CHATVEIL_WHITELIST", help = "Whitelist file (one word per line).")]
    pub whitelist: Option<PathBuf>,

    /// Engine configuration (YAML).
    #[arg(long, short = 'c', value_name = "FILE", env = "CHATVEIL_CONFIG", help = "Path to an engine configuration file (YAML).")]
    pub config: Option<PathBuf>,
}

/// Arguments for the `process` command.
#[derive(Parser, Debug)]
pub struct ProcessCommand {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Serve the message in this mode instead of the configured one.
    #[arg(long, short = 'm', value_enum, help = "Override the configured mode.")]
    pub mode: Option<ModeChoice>,

    /// Transform every word, whether it matches or not.
    #[arg(long, conflicts_with = "mode", help = "Transform every word without detection (force optimize).")]
    pub force: bool,

    /// In manual mode, commit this candidate (1-based).
    #[arg(long, value_name = "N", help = "Finish manual-mode candidate N (1-based) instead of listing them. Implies --mode manual.")]
    pub pick: Option<usize>,

    /// Comma-separated strategy preference order.
    #[arg(long, short = 's', value_delimiter = ',', value_name = "LIST", help = "Strategy preference order, e.g. 'fancy_text,leet_speak'.")]
    pub strategies: Vec<String>,

    /// Override the byte budget (0 disables it).
    #[arg(long = "byte-budget", value_name = "N", help = "Maximum bytes per message or chunk (0 disables).")]
    pub byte_budget: Option<usize>,

    /// Override the character budget (0 disables it).
    #[arg(long = "char-budget", value_name = "N", help = "Maximum characters per message or chunk (0 disables).")]
    pub char_budget: Option<usize>,

    /// Print the result as JSON.
    #[arg(long, help = "Print the full result as JSON to stdout.")]
    pub json: bool,

    /// Copy the result to the system clipboard.
    #[arg(long = "clipboard", short = 'C', help = "Copy the result to the system clipboard.")]
    pub clipboard: bool,

    /// Exit with status 2 when the result still contains a detectable entry.
    #[arg(long, help = "Exit with status 2 if the result is not clean.")]
    pub strict: bool,
}

/// Arguments for the `scan` command.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the detection as JSON.
    #[arg(long, help = "Print the detection as JSON to stdout.")]
    pub json: bool,

    /// Exit with a non-zero code if the number of matches exceeds this threshold.
    #[arg(long = "fail-over-threshold", value_name = "N", help = "Exit with status 1 if more than N matches are found.")]
    pub fail_over_threshold: Option<usize>,
}

/// Mode override for the `process` command.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ModeChoice {
    /// List ranked candidates.
    Manual,
    /// Return the single best result.
    Auto,
}
