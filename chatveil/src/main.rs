// chatveil/src/main.rs
//! chatveil entry point.
//!
//! Parses the command line, sets up logging and the theme, and dispatches to
//! the selected command. stdout carries only the result.

use anyhow::{Context, Result};
use clap::Parser;

use chatveil::cli::{Cli, Commands};
use chatveil::commands::{process::run_process, scan::run_scan};
use chatveil::logger;
use chatveil::ui::output_format::{print_error_message, Painter, Painters};
use chatveil::ui::theme::{build_theme_map, ThemeStyle};

fn run(cli: &Cli) -> Result<i32> {
    let theme_map = build_theme_map(cli.theme.as_ref()).context("Theme error")?;
    let painters = Painters::detect(theme_map);
    match &cli.command {
        Commands::Process(cmd) => run_process(cmd, &painters, cli.quiet),
        Commands::Scan(cmd) => run_scan(cmd, &painters.out),
    }
}

fn main() {
    let cli = Cli::parse();
    logger::init_logger(logger::level_from_flags(cli.quiet, cli.debug));

    let code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            log::debug!("Command failed: {:?}", e);
            print_error_message(&Painter::for_stderr(ThemeStyle::default_theme_map()), &format!("{:#}", e));
            1
        }
    };
    std::process::exit(code);
}
