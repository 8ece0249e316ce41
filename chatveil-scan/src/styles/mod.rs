// chatveil-scan/src/styles/mod.rs
//! Stylistic Unicode alphabets ("fancy text").
//!
//! Each style maps ASCII letters (and, for some styles, digits) onto a
//! visually similar code point outside the Latin blocks, so destination
//! filters keyed on Latin words no longer match.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FancyStyle {
    Bold,
    Italic,
    BoldItalic,
    SansSerif,
    Circled,
    Squared,
    NegativeCircled,
    NegativeSquared,
}

impl Default for FancyStyle {
    fn default() -> Self {
        FancyStyle::Squared
    }
}

impl FancyStyle {
    pub const ALL: [FancyStyle; 8] = [
        FancyStyle::Squared,
        FancyStyle::Bold,
        FancyStyle::Italic,
        FancyStyle::BoldItalic,
        FancyStyle::SansSerif,
        FancyStyle::Circled,
        FancyStyle::NegativeSquared,
        FancyStyle::NegativeCircled,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FancyStyle::Bold => "bold",
            FancyStyle::Italic => "italic",
            FancyStyle::BoldItalic => "bold_italic",
            FancyStyle::SansSerif => "sans_serif",
            FancyStyle::Circled => "circled",
            FancyStyle::Squared => "squared",
            FancyStyle::NegativeCircled => "negative_circled",
            FancyStyle::NegativeSquared => "negative_squared",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.name().eq_ignore_ascii_case(name))
    }

    /// Stylised counterpart of `c`, or `None` when the style has no glyph
    /// for it.
    pub fn convert(self, c: char) -> Option<char> {
        if c.is_ascii_digit() {
            return self.convert_digit(c as u32 - '0' as u32);
        }
        let (upper, lower) = match self {
            FancyStyle::Bold => (0x1D400, 0x1D41A),
            FancyStyle::Italic => (0x1D434, 0x1D44E),
            FancyStyle::BoldItalic => (0x1D468, 0x1D482),
            FancyStyle::SansSerif => (0x1D5A0, 0x1D5BA),
            FancyStyle::Circled => (0x24B6, 0x24D0),
            FancyStyle::Squared => (0x1F130, 0x1F130),
            FancyStyle::NegativeCircled => (0x1F150, 0x1F150),
            FancyStyle::NegativeSquared => (0x1F170, 0x1F170),
        };
        let code = if c.is_ascii_uppercase() {
            upper + (c as u32 - 'A' as u32)
        } else if c.is_ascii_lowercase() {
            // Mathematical italic small h is unassigned; Planck's constant
            // stands in for it.
            if self == FancyStyle::Italic && c == 'h' {
                return Some('\u{210E}');
            }
            lower + (c as u32 - 'a' as u32)
        } else {
            return None;
        };
        char::from_u32(code)
    }

    fn convert_digit(self, d: u32) -> Option<char> {
        let code = match (self, d) {
            (FancyStyle::Bold, _) => 0x1D7CE + d,
            (FancyStyle::SansSerif, _) => 0x1D7E2 + d,
            (FancyStyle::Circled, 0) => 0x24EA,
            (FancyStyle::Circled, _) => 0x2460 + d - 1,
            (FancyStyle::NegativeCircled, 0) => 0x24FF,
            (FancyStyle::NegativeCircled, _) => 0x2776 + d - 1,
            _ => return None,
        };
        char::from_u32(code)
    }

    /// Converts every convertible character of `text`.
    pub fn convert_str(self, text: &str) -> alloc::string::String {
        text.chars().map(|c| self.convert(c).unwrap_or(c)).collect()
    }
}

impl fmt::Display for FancyStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// True for any code point produced by one of the [`FancyStyle`] tables.
pub fn is_styled(c: char) -> bool {
    matches!(
        c as u32,
        0x1D400..=0x1D7FF | 0x2460..=0x24FF | 0x2776..=0x277F | 0x210E | 0x1F130..=0x1F189
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_tables() {
        assert_eq!(FancyStyle::Squared.convert('a'), Some('\u{1F130}'));
        assert_eq!(FancyStyle::Squared.convert('A'), Some('\u{1F130}'));
        assert_eq!(FancyStyle::Bold.convert('a'), Some('\u{1D41A}'));
        assert_eq!(FancyStyle::Circled.convert('Z'), Some('\u{24CF}'));
        assert_eq!(FancyStyle::NegativeSquared.convert('z'), Some('\u{1F189}'));
        assert_eq!(FancyStyle::Italic.convert('h'), Some('\u{210E}'));
    }

    #[test]
    fn test_digits_and_unconvertible() {
        assert_eq!(FancyStyle::Circled.convert('0'), Some('\u{24EA}'));
        assert_eq!(FancyStyle::Circled.convert('1'), Some('\u{2460}'));
        assert_eq!(FancyStyle::Squared.convert('1'), None);
        assert_eq!(FancyStyle::Bold.convert('é'), None);
        assert_eq!(FancyStyle::Bold.convert(' '), None);
    }

    #[test]
    fn test_every_output_is_recognised_as_styled() {
        for style in FancyStyle::ALL {
            for c in ('a'..='z').chain('A'..='Z').chain('0'..='9') {
                if let Some(out) = style.convert(c) {
                    assert!(is_styled(out), "{style} {c} -> {out:?}");
                }
            }
        }
    }

    #[test]
    fn test_names_round_trip() {
        for style in FancyStyle::ALL {
            assert_eq!(FancyStyle::from_name(style.name()), Some(style));
        }
        assert_eq!(FancyStyle::from_name("gothic"), None);
    }
}
