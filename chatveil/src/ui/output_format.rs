// chatveil/src/ui/output_format.rs
//! Themed status messages on stderr.
//!
//! Colors are only emitted when stderr is a terminal and `NO_COLOR` is unset.
//! License: MIT OR APACHE 2.0

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use std::io::{self, Write};

use crate::ui::theme::{ThemeEntry, ThemeMap};

/// Applies theme colors to text.
#[derive(Debug, Clone)]
pub struct Painter {
    theme: ThemeMap,
    enabled: bool,
}

impl Painter {
    pub fn new(theme: ThemeMap, enabled: bool) -> Self {
        Self { theme, enabled }
    }

    /// A painter that colors only when `stream_is_tty` and `NO_COLOR` is unset.
    pub fn for_stream(theme: ThemeMap, stream_is_tty: bool) -> Self {
        let enabled = stream_is_tty && std::env::var_os("NO_COLOR").is_none();
        Self::new(theme, enabled)
    }

    pub fn for_stderr(theme: ThemeMap) -> Self {
        Self::for_stream(theme, io::stderr().is_terminal())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn paint(&self, entry: ThemeEntry, text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        match self.theme.get(&entry).and_then(|s| s.fg.as_ref()) {
            Some(color) => text.color(color.to_ansi_color()).to_string(),
            None => text.to_string(),
        }
    }
}

/// One painter per output stream. Color on each stream is decided by that
/// stream alone, so `chatveil process ... > out.txt` still colors stderr.
#[derive(Debug, Clone)]
pub struct Painters {
    pub out: Painter,
    pub err: Painter,
}

impl Painters {
    pub fn from_ttys(theme: ThemeMap, stdout_is_tty: bool, stderr_is_tty: bool) -> Self {
        Self {
            out: Painter::for_stream(theme.clone(), stdout_is_tty),
            err: Painter::for_stream(theme, stderr_is_tty),
        }
    }

    pub fn detect(theme: ThemeMap) -> Self {
        Self::from_ttys(theme, io::stdout().is_terminal(), io::stderr().is_terminal())
    }
}

fn write_status<W: Write>(out: &mut W, painter: &Painter, entry: ThemeEntry, label: &str, msg: &str) -> io::Result<()> {
    writeln!(out, "{} {}", painter.paint(entry, label), msg)
}

pub fn print_info_message(painter: &Painter, msg: &str) {
    let _ = write_status(&mut io::stderr(), painter, ThemeEntry::Info, "[info]", msg);
}

pub fn print_warn_message(painter: &Painter, msg: &str) {
    let _ = write_status(&mut io::stderr(), painter, ThemeEntry::Warn, "[warn]", msg);
}

pub fn print_error_message(painter: &Painter, msg: &str) {
    let _ = write_status(&mut io::stderr(), painter, ThemeEntry::Error, "[error]", msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::ThemeStyle;

    #[test]
    fn disabled_painter_returns_plain_text() {
        let painter = Painter::new(ThemeStyle::default_theme_map(), false);
        assert_eq!(painter.paint(ThemeEntry::Error, "boom"), "boom");
    }

    #[test]
    fn enabled_painter_wraps_in_ansi() {
        let painter = Painter::new(ThemeStyle::default_theme_map(), true);
        let painted = painter.paint(ThemeEntry::Error, "boom");
        assert!(painted.contains("boom"));
        assert!(painted.starts_with("\u{1b}["));
    }

    #[test]
    fn streams_are_colored_independently() {
        if std::env::var_os("NO_COLOR").is_some() {
            return;
        }
        let painters = Painters::from_ttys(ThemeStyle::default_theme_map(), false, true);
        assert!(!painters.out.is_enabled());
        assert!(painters.err.is_enabled());
        let painters = Painters::from_ttys(ThemeStyle::default_theme_map(), true, false);
        assert!(painters.out.is_enabled());
        assert!(!painters.err.is_enabled());
    }

    #[test]
    fn status_line_has_label() {
        let painter = Painter::new(ThemeStyle::default_theme_map(), false);
        let mut buf = Vec::new();
        write_status(&mut buf, &painter, ThemeEntry::Warn, "[warn]", "careful").unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "[warn] careful\n");
    }
}
