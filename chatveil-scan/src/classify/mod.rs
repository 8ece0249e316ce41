// chatveil-scan/src/classify/mod.rs
//! Character classes used for tokenizing chat messages.

/// Latin-1 Supplement and Latin Extended-A/B letters (U+00C0..=U+024F),
/// minus the two arithmetic signs that live in that block.
pub fn is_extended_latin(c: char) -> bool {
    matches!(c as u32, 0x00C0..=0x024F) && c != '\u{00D7}' && c != '\u{00F7}'
}

/// ASCII alphanumerics plus extended Latin letters.
pub fn is_latin_alphanumeric(c: char) -> bool {
    c.is_ascii_alphanumeric() || is_extended_latin(c)
}

/// Separators end a token and are removed by the sliding-window collapse.
///
/// Symbols outside this set (interspacing marks, stylised letters, emoji)
/// are deliberately kept as token characters: destination filters do not
/// strip them either.
pub fn is_separator(c: char) -> bool {
    c.is_whitespace()
        || c.is_ascii_punctuation()
        || matches!(
            c,
            '\u{00A1}' | '\u{00AB}' | '\u{00B7}' | '\u{00BB}' | '\u{00BF}'
                | '\u{2013}' | '\u{2014}' | '\u{2026}'
                | '\u{2018}'..='\u{201F}'
        )
}

/// Letters a filter entry may be made of.
pub fn is_pattern_char(c: char) -> bool {
    is_latin_alphanumeric(c)
}
