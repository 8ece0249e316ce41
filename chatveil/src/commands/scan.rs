// chatveil/src/commands/scan.rs
//! The `scan` command: report what a filter list would catch.
//! License: MIT OR APACHE 2.0

use anyhow::Result;
use std::io::{self, Write};

use chatveil_core::Detection;

use crate::cli::ScanCommand;
use crate::commands::{build_router, load_config, read_input};
use crate::ui::output_format::Painter;
use crate::ui::render::render_detection;

/// Exit status when `--fail-over-threshold` is exceeded.
pub const EXIT_OVER_THRESHOLD: i32 = 1;

/// Whether the detection exceeds the optional threshold.
pub fn over_threshold(detection: &Detection, threshold: Option<usize>) -> bool {
    threshold.is_some_and(|t| detection.matches.len() > t)
}

/// Runs the command and returns the process exit status.
pub fn run_scan(cmd: &ScanCommand, painter: &Painter) -> Result<i32> {
    let config = load_config(&cmd.source)?;
    let router = build_router(config, &cmd.source)?;
    let text = read_input(&cmd.source)?;
    let detection = router.detect(&text);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cmd.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&detection)?)?;
    } else {
        render_detection(&mut out, painter, &text, &detection)?;
    }

    if over_threshold(&detection, cmd.fail_over_threshold) {
        log::warn!(
            "{} match(es) found, more than the threshold of {}.",
            detection.matches.len(),
            cmd.fail_over_threshold.unwrap_or_default()
        );
        return Ok(EXIT_OVER_THRESHOLD);
    }
    Ok(0)
}
