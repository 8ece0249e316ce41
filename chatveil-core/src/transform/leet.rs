// chatveil-core/src/transform/leet.rs
use std::ops::Range;

use super::{Intensity, SpanTransform, Strategy, TransformParams};

/// Leet-speak substitution for a single character, full table.
///
/// Some of these glyphs (`!`, `$`, `|`) are word separators to the scanner.
pub fn leet_char(c: char) -> Option<char> {
    let out = match c {
        'a' | 'A' => '4',
        'e' => '3',
        'E' => '€',
        'i' | 'I' => '!',
        'o' | 'O' => '0',
        's' => '5',
        'S' => '$',
        'l' | 'L' => '|',
        'z' | 'Z' => '2',
        'c' | 'C' => '¢',
        _ => return None,
    };
    Some(out)
}

/// Digit-only substitutions used at minimal intensity. A word stays one
/// token for whitelist lookups and window scans.
pub fn leet_char_minimal(c: char) -> Option<char> {
    let out = match c {
        'a' | 'A' => '4',
        'e' | 'E' => '3',
        'i' | 'I' | 'l' | 'L' => '1',
        'o' | 'O' => '0',
        's' | 'S' => '5',
        't' | 'T' => '7',
        'z' | 'Z' => '2',
        _ => return None,
    };
    Some(out)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LeetSpeak;

impl SpanTransform for LeetSpeak {
    fn strategy(&self) -> Strategy {
        Strategy::LeetSpeak
    }

    fn apply(
        &self,
        chars: &[char],
        targets: &[Range<usize>],
        intensity: Intensity,
        _params: &TransformParams,
    ) -> Option<Vec<char>> {
        let mut out = chars.to_vec();
        let mut changed = false;
        match intensity {
            Intensity::Full => {
                for c in out.iter_mut() {
                    if let Some(l) = leet_char(*c) {
                        *c = l;
                        changed = true;
                    }
                }
            }
            Intensity::Minimal => {
                for target in targets {
                    let end = target.end.min(out.len());
                    if let Some(i) = (target.start..end).find(|&i| leet_char_minimal(chars[i]).is_some()) {
                        if out[i] == chars[i] {
                            out[i] = leet_char_minimal(chars[i])?;
                            changed = true;
                        }
                    }
                }
            }
        }
        changed.then_some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(s: &str, targets: &[Range<usize>], intensity: Intensity) -> Option<String> {
        let chars: Vec<char> = s.chars().collect();
        LeetSpeak
            .apply(&chars, targets, intensity, &TransformParams::default())
            .map(|v| v.into_iter().collect())
    }

    #[test]
    fn test_full_uses_whole_table() {
        assert_eq!(run("Assassin", &[0..8], Intensity::Full).as_deref(), Some("455455!n"));
        assert_eq!(run("SEcLZo", &[0..6], Intensity::Full).as_deref(), Some("$€¢|20"));
    }

    #[test]
    fn test_minimal_touches_first_convertible_char_per_target() {
        assert_eq!(run("ass", &[0..3], Intensity::Minimal).as_deref(), Some("4ss"));
        assert_eq!(run("bum", &[0..3], Intensity::Minimal), None);
        assert_eq!(run("assass", &[0..3, 3..6], Intensity::Minimal).as_deref(), Some("4ss4ss"));
    }

    #[test]
    fn test_minimal_never_inserts_separators() {
        use chatveil_scan::classify::is_separator;
        for word in ["Sin", "lip", "Isle", "tilt"] {
            let out = run(word, &[0..word.chars().count()], Intensity::Minimal).unwrap();
            assert!(!out.chars().any(is_separator), "{} -> {}", word, out);
        }
        assert_eq!(run("Sin", &[0..3], Intensity::Minimal).as_deref(), Some("5in"));
        assert_eq!(run("lip", &[0..3], Intensity::Minimal).as_deref(), Some("1ip"));
        assert_eq!(run("tit", &[0..3], Intensity::Minimal).as_deref(), Some("7it"));
    }

    #[test]
    fn test_full_is_a_fixed_point() {
        let once = run("semen", &[0..5], Intensity::Full).unwrap();
        assert_eq!(run(&once, &[0..5], Intensity::Full), None);
    }
}
