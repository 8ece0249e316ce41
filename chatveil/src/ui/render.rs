// chatveil/src/ui/render.rs
//! Human-readable rendering of engine results.
//!
//! The message itself goes to stdout on its own lines so it can be piped.
//! Summaries and diagnostics go to stderr.
//! License: MIT OR APACHE 2.0

use std::io::{self, Write};

use chatveil_core::{Candidate, Detection, Diagnostic, ManualReport, OptimizedMessage, Strategy};

use crate::ui::output_format::Painter;
use crate::ui::theme::ThemeEntry;

fn strategy_list(strategies: &[Strategy]) -> String {
    if strategies.is_empty() {
        return "none".to_string();
    }
    strategies.iter().map(|s| s.name()).collect::<Vec<_>>().join(", ")
}

/// One line describing a diagnostic.
pub fn describe_diagnostic(diagnostic: &Diagnostic) -> String {
    match diagnostic {
        Diagnostic::EmptyInput => "Input is empty; nothing to do.".to_string(),
        Diagnostic::Unresolvable { start, end, patterns } => format!(
            "Could not hide bytes {}..{} (matches {}).",
            start,
            end,
            patterns.join(", ")
        ),
        Diagnostic::ProtectedLink { start, end, pattern } => {
            format!("Left '{}' inside a link at bytes {}..{} untouched.", pattern, start, end)
        }
        Diagnostic::ShorthandReverted { original, replacement } => {
            format!("Kept '{}': shorthand '{}' would be filtered.", original, replacement)
        }
        Diagnostic::Residual { start, end, pattern } => {
            format!("'{}' is still detectable at bytes {}..{} of the result.", pattern, start, end)
        }
    }
}

/// Writes the message, one chunk per line.
pub fn render_message<W: Write>(out: &mut W, message: &OptimizedMessage) -> io::Result<()> {
    if message.chunks.is_empty() {
        writeln!(out, "{}", message.text)?;
    }
    for chunk in &message.chunks {
        writeln!(out, "{}", chunk)?;
    }
    Ok(())
}

/// Writes what was changed and why.
pub fn render_summary<W: Write>(out: &mut W, painter: &Painter, message: &OptimizedMessage) -> io::Result<()> {
    writeln!(
        out,
        "{} {} bytes, {} chars, generation {}",
        painter.paint(ThemeEntry::Header, "Result:"),
        message.byte_len,
        message.char_len,
        message.generation
    )?;
    for span in &message.altered {
        writeln!(
            out,
            "  {} -> {} [{}]",
            painter.paint(ThemeEntry::Pattern, &span.patterns.join(", ")),
            painter.paint(ThemeEntry::Altered, &span.output),
            strategy_list(&span.strategies)
        )?;
    }
    for sub in &message.shorthand {
        writeln!(out, "  {} -> {}", sub.original, painter.paint(ThemeEntry::Altered, &sub.replacement))?;
    }
    if message.is_split() {
        writeln!(
            out,
            "  {}",
            painter.paint(ThemeEntry::Chunk, &format!("split into {} chunks", message.chunks.len()))
        )?;
    }
    for diagnostic in &message.diagnostics {
        writeln!(out, "  {} {}", painter.paint(ThemeEntry::Warn, "!"), describe_diagnostic(diagnostic))?;
    }
    Ok(())
}

fn render_candidate<W: Write>(out: &mut W, painter: &Painter, candidate: &Candidate) -> io::Result<()> {
    let label = painter.paint(ThemeEntry::Chunk, &format!("[{}]", candidate.rank));
    let status = if candidate.clean {
        painter.paint(ThemeEntry::Success, "clean")
    } else {
        painter.paint(ThemeEntry::Warn, "not clean")
    };
    writeln!(
        out,
        "{} {}  ({}; {}; {} bytes, {} chars)",
        label,
        painter.paint(ThemeEntry::Altered, &candidate.text),
        strategy_list(&candidate.strategies),
        status,
        candidate.byte_len,
        candidate.char_len
    )
}

/// Lists manual-mode candidates, least distorted first.
pub fn render_candidates<W: Write>(out: &mut W, painter: &Painter, report: &ManualReport) -> io::Result<()> {
    if report.candidates.is_empty() {
        writeln!(out, "{}", painter.paint(ThemeEntry::Success, "Nothing to rewrite."))?;
        return Ok(());
    }
    writeln!(
        out,
        "{} {} candidate(s) for {} span(s)",
        painter.paint(ThemeEntry::Header, "Candidates:"),
        report.candidates.len(),
        report.detection.spans.len()
    )?;
    for candidate in &report.candidates {
        render_candidate(out, painter, candidate)?;
    }
    Ok(())
}

/// The input with detected spans highlighted.
pub fn highlight(painter: &Painter, text: &str, detection: &Detection) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for span in &detection.spans {
        if span.start < last || span.end > text.len() {
            continue;
        }
        out.push_str(&text[last..span.start]);
        out.push_str(&painter.paint(ThemeEntry::Match, &text[span.start..span.end]));
        last = span.end;
    }
    out.push_str(&text[last..]);
    out
}

/// Writes a scan report.
pub fn render_detection<W: Write>(out: &mut W, painter: &Painter, text: &str, detection: &Detection) -> io::Result<()> {
    if detection.is_clean() {
        writeln!(out, "{}", painter.paint(ThemeEntry::Success, "No filter entries detected."))?;
    } else {
        writeln!(out, "{}", highlight(painter, text, detection))?;
        writeln!(
            out,
            "{} {} match(es) in {} span(s)",
            painter.paint(ThemeEntry::Header, "Detected:"),
            detection.matches.len(),
            detection.spans.len()
        )?;
        for m in &detection.matches {
            writeln!(
                out,
                "  {} at bytes {}..{} ({:?})",
                painter.paint(ThemeEntry::Pattern, &m.pattern),
                m.original_start,
                m.original_end,
                m.source
            )?;
        }
    }
    for m in &detection.protected {
        writeln!(
            out,
            "  {} '{}' inside a link at bytes {}..{}",
            painter.paint(ThemeEntry::Info, "skipped"),
            m.pattern,
            m.original_start,
            m.original_end
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::ThemeStyle;
    use chatveil_core::{EngineConfig, FilterEntry, ModeRouter};

    fn plain() -> Painter {
        Painter::new(ThemeStyle::default_theme_map(), false)
    }

    fn router() -> ModeRouter {
        ModeRouter::with_lists(EngineConfig::default(), vec![FilterEntry::new("ass")], Vec::new()).unwrap()
    }

    #[test]
    fn message_is_written_alone() {
        let message = router().auto("first class").unwrap();
        let mut buf = Vec::new();
        render_message(&mut buf, &message).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "first cl4ss\n");
    }

    #[test]
    fn summary_names_pattern_and_strategy() {
        let message = router().auto("first class").unwrap();
        let mut buf = Vec::new();
        render_summary(&mut buf, &plain(), &message).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("ass -> "));
        assert!(text.contains("leet_speak"));
    }

    #[test]
    fn detection_is_highlighted_in_place() {
        let r = router();
        let text = "first class";
        let detection = r.detect(text);
        assert_eq!(highlight(&plain(), text, &detection), text);
        let mut buf = Vec::new();
        render_detection(&mut buf, &plain(), text, &detection).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("1 match(es) in 1 span(s)"));
        assert!(out.contains("ass at bytes 8..11"));
    }

    #[test]
    fn candidates_are_numbered() {
        let r = router();
        let report = r.manual("first class");
        let mut buf = Vec::new();
        render_candidates(&mut buf, &plain(), &report).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("[1] "));
        assert!(out.contains("clean"));
    }

    #[test]
    fn diagnostics_have_messages() {
        let d = Diagnostic::ShorthandReverted { original: "you".into(), replacement: "u".into() };
        assert!(describe_diagnostic(&d).contains("'you'"));
    }
}
