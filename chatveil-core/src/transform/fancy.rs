// chatveil-core/src/transform/fancy.rs
use std::ops::Range;

use super::{Intensity, SpanTransform, Strategy, TransformParams};

#[derive(Debug, Clone, Copy, Default)]
pub struct FancyText;

impl SpanTransform for FancyText {
    fn strategy(&self) -> Strategy {
        Strategy::FancyText
    }

    fn apply(
        &self,
        chars: &[char],
        targets: &[Range<usize>],
        intensity: Intensity,
        params: &TransformParams,
    ) -> Option<Vec<char>> {
        let style = params.fancy_style;
        let mut out = chars.to_vec();
        let mut changed = false;
        match intensity {
            Intensity::Full => {
                for c in out.iter_mut() {
                    if let Some(f) = style.convert(*c) {
                        *c = f;
                        changed = true;
                    }
                }
            }
            Intensity::Minimal => {
                for target in targets {
                    let end = target.end.min(chars.len());
                    let first = (target.start..end)
                        .find(|&i| chars[i].is_ascii_alphabetic() && style.convert(chars[i]).is_some())
                        .or_else(|| (target.start..end).find(|&i| style.convert(chars[i]).is_some()));
                    if let Some(i) = first {
                        if out[i] == chars[i] {
                            out[i] = style.convert(chars[i])?;
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
    use chatveil_scan::FancyStyle;

    fn run(s: &str, targets: &[Range<usize>], intensity: Intensity, style: FancyStyle) -> Option<String> {
        let chars: Vec<char> = s.chars().collect();
        let params = TransformParams { fancy_style: style, ..TransformParams::default() };
        FancyText.apply(&chars, targets, intensity, &params).map(|v| v.into_iter().collect())
    }

    #[test]
    fn test_full_squared() {
        assert_eq!(
            run("Ass", &[0..3], Intensity::Full, FancyStyle::Squared).as_deref(),
            Some("\u{1F130}\u{1F142}\u{1F142}")
        );
    }

    #[test]
    fn test_minimal_prefers_letters() {
        assert_eq!(
            run("4ss", &[0..3], Intensity::Minimal, FancyStyle::Bold).as_deref(),
            Some("4\u{1D42C}s")
        );
    }

    #[test]
    fn test_nothing_convertible() {
        assert_eq!(run("éé", &[0..2], Intensity::Full, FancyStyle::Circled), None);
    }
}
