// chatveil-core/src/transform/interspace.rs
use std::ops::Range;

use chatveil_scan::classify::is_separator;
use chatveil_scan::styles::is_styled;

use super::{Intensity, SpanTransform, Strategy, TransformParams};

/// Interspacing characters must be invisible to the destination's word
/// splitting and harmless when pasted: no letters, digits, whitespace,
/// control characters, punctuation or styled letters.
pub fn is_safe_interspacing_char(c: char) -> bool {
    !(c.is_alphanumeric() || c.is_whitespace() || c.is_control() || is_separator(c) || is_styled(c))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Interspacing;

impl SpanTransform for Interspacing {
    fn strategy(&self) -> Strategy {
        Strategy::Interspacing
    }

    fn apply(
        &self,
        chars: &[char],
        targets: &[Range<usize>],
        intensity: Intensity,
        params: &TransformParams,
    ) -> Option<Vec<char>> {
        if chars.len() < 2 {
            return None;
        }
        // Indices after which the mark is inserted.
        let mut after = vec![false; chars.len()];
        match intensity {
            Intensity::Full => {
                let stride = params.stride.max(1);
                for i in (stride - 1..chars.len() - 1).step_by(stride) {
                    after[i] = true;
                }
            }
            Intensity::Minimal => {
                for target in targets {
                    if target.end.min(chars.len()) >= target.start + 2 {
                        after[target.start] = true;
                    }
                }
            }
        }
        if !after.iter().any(|&a| a) {
            return None;
        }

        let mut out = Vec::with_capacity(chars.len() * 2);
        for (i, &c) in chars.iter().enumerate() {
            out.push(c);
            if after[i] && chars.get(i + 1) != Some(&params.interspacing_char) && c != params.interspacing_char {
                out.push(params.interspacing_char);
            }
        }
        (out.len() > chars.len()).then_some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(s: &str, targets: &[Range<usize>], intensity: Intensity, stride: usize) -> Option<String> {
        let chars: Vec<char> = s.chars().collect();
        let params = TransformParams { stride, ..TransformParams::default() };
        Interspacing.apply(&chars, targets, intensity, &params).map(|v| v.into_iter().collect())
    }

    #[test]
    fn test_full_every_char() {
        assert_eq!(run("ass", &[0..3], Intensity::Full, 1).as_deref(), Some("a\u{200B}s\u{200B}s"));
    }

    #[test]
    fn test_full_with_stride() {
        assert_eq!(run("semen", &[0..5], Intensity::Full, 2).as_deref(), Some("se\u{200B}me\u{200B}n"));
    }

    #[test]
    fn test_minimal_one_mark_per_target() {
        assert_eq!(run("assass", &[0..3, 3..6], Intensity::Minimal, 1).as_deref(), Some("a\u{200B}ssa\u{200B}ss"));
        assert_eq!(run("a", &[0..1], Intensity::Minimal, 1), None);
    }

    #[test]
    fn test_safe_chars() {
        assert!(is_safe_interspacing_char('\u{200B}'));
        assert!(is_safe_interspacing_char('\u{2063}'));
        for c in ['a', '7', ' ', '\n', '|', '$', '/', '\\', '"', '\'', '`', ';', '&', '<'] {
            assert!(!is_safe_interspacing_char(c), "{c:?}");
        }
    }
}
