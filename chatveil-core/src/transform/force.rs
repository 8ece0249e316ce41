// chatveil-core/src/transform/force.rs
//! Detection-free transformation of a whole message.

use std::ops::Range;

use super::leet::leet_char;
use super::{Strategy, TransformParams};

/// Inserted between the digits of a number run.
pub const DIGIT_SEPARATOR: char = '\u{119E}';

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

fn protected(links: &[Range<usize>], pos: usize) -> bool {
    links.iter().any(|l| l.contains(&pos))
}

/// Transforms every character outside `links`.
///
/// When interspacing is the first enabled strategy the configured mark goes
/// between every pair of adjacent non-space characters. Otherwise digit runs
/// are split with [`DIGIT_SEPARATOR`], vowels go through leet-speak and
/// consonants through fancy text, as far as those strategies are enabled.
pub fn force_transform(text: &str, order: &[Strategy], params: &TransformParams, links: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(text.len() * 3);

    if order.first() == Some(&Strategy::Interspacing) {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        for (n, &(pos, c)) in chars.iter().enumerate() {
            out.push(c);
            if let Some(&(next_pos, next)) = chars.get(n + 1) {
                let between_words = c.is_whitespace() || next.is_whitespace();
                if !between_words && !protected(links, pos) && !protected(links, next_pos) {
                    out.push(params.interspacing_char);
                }
            }
        }
        return out;
    }

    let leet = order.contains(&Strategy::LeetSpeak);
    let fancy = order.contains(&Strategy::FancyText);
    let mut prev_digit = false;

    for (pos, c) in text.char_indices() {
        if protected(links, pos) {
            out.push(c);
            prev_digit = false;
            continue;
        }
        if c.is_ascii_digit() {
            if prev_digit {
                out.push(DIGIT_SEPARATOR);
            }
            out.push(c);
            prev_digit = true;
            continue;
        }
        prev_digit = false;

        if !c.is_ascii_alphabetic() {
            out.push(c);
            continue;
        }
        let converted = if is_vowel(c) && leet {
            leet_char(c).or_else(|| fancy.then(|| params.fancy_style.convert(c)).flatten())
        } else if fancy {
            params.fancy_style.convert(c)
        } else {
            None
        };
        out.push(converted.unwrap_or(c));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vowels_leet_consonants_fancy_digits_split() {
        let out = force_transform("hi 420", &Strategy::ALL, &TransformParams::default(), &[]);
        assert_eq!(out, "\u{1F137}! 4\u{119E}2\u{119E}0");
    }

    #[test]
    fn test_interspacing_first() {
        let order = [Strategy::Interspacing, Strategy::LeetSpeak];
        let out = force_transform("ab cd", &order, &TransformParams::default(), &[]);
        assert_eq!(out, "a\u{200B}b c\u{200B}d");
    }

    #[test]
    fn test_links_untouched() {
        let text = "go www.site.com";
        let out = force_transform(text, &[Strategy::LeetSpeak], &TransformParams::default(), &[3..text.len()]);
        assert_eq!(out, "g0 www.site.com");
    }

    #[test]
    fn test_vowel_without_leet_mapping_uses_fancy() {
        let out = force_transform("u", &Strategy::ALL, &TransformParams::default(), &[]);
        assert_eq!(out, "\u{1F144}");
    }
}
