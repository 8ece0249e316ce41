// chatveil/src/commands/process.rs
//! The `process` command: rewrite a message in auto, manual or force mode.
//! License: MIT OR APACHE 2.0

use anyhow::{bail, Context, Result};
use log::{debug, info};
use std::io::{self, Write};

use chatveil_core::{EngineConfig, ManualReport, Mode, ModeRouter, OptimizedMessage, RouterOutput, Strategy};

use crate::cli::{ModeChoice, ProcessCommand};
use crate::commands::{build_router, load_config, read_input};
use crate::ui::output_format::{print_info_message, print_warn_message, Painter, Painters};
use crate::ui::render::{render_candidates, render_message, render_summary};
use crate::utils::clipboard::copy_to_clipboard;

/// Exit status when `--strict` is set and the result is not clean.
pub const EXIT_NOT_CLEAN: i32 = 2;

/// Parses a list of strategy names.
pub fn parse_strategies(names: &[String]) -> Result<Vec<Strategy>> {
    names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .map(|n| {
            Strategy::from_name(n).with_context(|| {
                format!("Unknown strategy '{}'. Expected leet_speak, fancy_text or interspacing.", n)
            })
        })
        .collect()
}

/// Applies command-line overrides on top of the loaded configuration.
pub fn apply_overrides(mut config: EngineConfig, cmd: &ProcessCommand) -> Result<EngineConfig> {
    if let Some(bytes) = cmd.byte_budget {
        config.byte_budget = bytes;
    }
    if let Some(chars) = cmd.char_budget {
        config.char_budget = chars;
    }
    if !cmd.strategies.is_empty() {
        config.strategies = parse_strategies(&cmd.strategies)?;
    }
    match cmd.mode {
        Some(ModeChoice::Manual) => config.mode = Mode::Manual,
        Some(ModeChoice::Auto) => config.mode = Mode::Auto,
        None if cmd.pick.is_some() => config.mode = Mode::Manual,
        None => {}
    }
    Ok(config)
}

/// Runs the command and returns the process exit status.
/// Results go to stdout through `painters.out`; the summary, notices and
/// warnings go to stderr through `painters.err`.
pub fn run_process(cmd: &ProcessCommand, painters: &Painters, quiet: bool) -> Result<i32> {
    let config = apply_overrides(load_config(&cmd.source)?, cmd)?;
    let router = build_router(config, &cmd.source)?;
    let text = read_input(&cmd.source)?;
    debug!("Processing {} bytes of input.", text.len());

    if cmd.force {
        info!("Force optimization requested.");
        let message = router.force_optimize(&text)?;
        return emit_message(cmd, &painters.err, quiet, message);
    }

    match router.config().mode {
        Mode::Auto => {
            let message = router.auto(&text)?;
            emit_message(cmd, &painters.err, quiet, message)
        }
        Mode::Manual => {
            let report = router.manual(&text);
            match cmd.pick {
                Some(n) => {
                    let message = pick(&router, &report, n)?;
                    emit_message(cmd, &painters.err, quiet, message)
                }
                None => emit_report(cmd, &painters.out, report),
            }
        }
    }
}

/// Commits the 1-based candidate `n` of a manual report.
fn pick(router: &ModeRouter, report: &ManualReport, n: usize) -> Result<OptimizedMessage> {
    if n == 0 {
        bail!("Candidates are numbered from 1.");
    }
    let message = router
        .commit(report, n - 1)
        .with_context(|| format!("There are only {} candidate(s).", report.candidates.len()))?;
    Ok(message)
}

fn emit_report(cmd: &ProcessCommand, painter: &Painter, report: ManualReport) -> Result<i32> {
    let any_clean = report.candidates.iter().any(|c| c.clean);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cmd.json {
        writeln!(out, "{}", RouterOutput::Manual(report).to_json()?)?;
    } else {
        render_candidates(&mut out, painter, &report)?;
    }
    Ok(if cmd.strict && !any_clean { EXIT_NOT_CLEAN } else { 0 })
}

fn emit_message(cmd: &ProcessCommand, err_painter: &Painter, quiet: bool, message: OptimizedMessage) -> Result<i32> {
    if cmd.clipboard {
        let payload = if message.chunks.is_empty() { message.text.clone() } else { message.chunks.join("\n") };
        match copy_to_clipboard(&payload) {
            Ok(()) if !quiet => print_info_message(err_painter, "Copied to clipboard."),
            Ok(()) => {}
            Err(e) => print_warn_message(err_painter, &format!("{:#}", e)),
        }
    }

    let clean = message.clean;
    {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if cmd.json {
            writeln!(out, "{}", RouterOutput::Auto(message.clone()).to_json()?)?;
        } else {
            render_message(&mut out, &message)?;
        }
    }
    if !quiet && !cmd.json {
        render_summary(&mut io::stderr(), err_painter, &message)?;
    }
    Ok(if cmd.strict && !clean { EXIT_NOT_CLEAN } else { 0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SourceArgs;

    fn command() -> ProcessCommand {
        ProcessCommand {
            source: SourceArgs::default(),
            mode: None,
            force: false,
            pick: None,
            strategies: Vec::new(),
            byte_budget: None,
            char_budget: None,
            json: false,
            clipboard: false,
            strict: false,
        }
    }

    #[test]
    fn strategies_parse_by_name() -> Result<()> {
        let parsed = parse_strategies(&["fancy_text".into(), " leet_speak ".into()])?;
        assert_eq!(parsed, vec![Strategy::FancyText, Strategy::LeetSpeak]);
        assert!(parse_strategies(&["rot13".into()]).is_err());
        Ok(())
    }

    #[test]
    fn overrides_replace_config_values() -> Result<()> {
        let cmd = ProcessCommand {
            byte_budget: Some(0),
            char_budget: Some(40),
            strategies: vec!["interspacing".into()],
            pick: Some(1),
            ..command()
        };
        let config = apply_overrides(EngineConfig::default(), &cmd)?;
        assert_eq!(config.byte_budget, 0);
        assert_eq!(config.char_budget, 40);
        assert_eq!(config.strategies, vec![Strategy::Interspacing]);
        assert_eq!(config.mode, Mode::Manual);
        Ok(())
    }

    #[test]
    fn explicit_mode_wins_over_pick() -> Result<()> {
        let cmd = ProcessCommand { mode: Some(ModeChoice::Auto), pick: Some(2), ..command() };
        assert_eq!(apply_overrides(EngineConfig::default(), &cmd)?.mode, Mode::Auto);
        Ok(())
    }
}
