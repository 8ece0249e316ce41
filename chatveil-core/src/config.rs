//! Configuration management for `chatveil-core`.
//!
//! This module defines the engine configuration: size budgets, the enabled
//! transformation strategies and their parameters, the shorthand dictionary
//! and the detection switches. Configurations are read from YAML, every key
//! is optional and falls back to its default.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use chatveil_scan::FancyStyle;

use crate::errors::ChatveilError;
use crate::transform::interspace::is_safe_interspacing_char;
use crate::transform::Strategy;

/// Maximum allowed length (bytes, after normalization) of a filter entry.
pub const MAX_PATTERN_LENGTH: usize = 1000;
pub const DEFAULT_BYTE_BUDGET: usize = 92;
pub const DEFAULT_CHAR_BUDGET: usize = 80;
pub const DEFAULT_INTERSPACING_CHAR: char = '\u{200B}';

static BUILTIN_SHORTHAND: Lazy<BTreeMap<String, String>> = Lazy::new(|| {
    let yaml = include_str!("../config/default_shorthand.yaml");
    match serde_yml::from_str::<BTreeMap<String, String>>(yaml) {
        Ok(table) => table
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect(),
        Err(e) => {
            warn!("Built-in shorthand table failed to parse: {}", e);
            BTreeMap::new()
        }
    }
});

/// How a request is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Return ranked candidates and let the caller pick one.
    Manual,
    /// Run the whole pipeline and return the first result within budget.
    #[default]
    Auto,
}

/// Order in which strategy attempts are escalated for a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Escalation {
    /// Each strategy from light to full before moving on to the next one.
    #[default]
    Preference,
    /// Every strategy at its lightest first, then every strategy at full
    /// intensity, then combinations.
    Distortion,
}

/// A byte and character budget. Zero disables that dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub bytes: usize,
    pub chars: usize,
}

impl Budget {
    pub fn new(bytes: usize, chars: usize) -> Self {
        Self { bytes, chars }
    }

    pub fn fits(&self, text: &str) -> bool {
        self.fits_len(text.len(), text.chars().count())
    }

    pub fn fits_len(&self, bytes: usize, chars: usize) -> bool {
        (self.bytes == 0 || bytes <= self.bytes) && (self.chars == 0 || chars <= self.chars)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterspacingConfig {
    /// Code point inserted between characters.
    pub character: char,
    /// Insert after every `stride` characters at full intensity.
    pub stride: usize,
}

impl Default for InterspacingConfig {
    fn default() -> Self {
        Self { character: DEFAULT_INTERSPACING_CHAR, stride: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShorthandConfig {
    pub enabled: bool,
    /// Start from the built-in table.
    pub use_builtin: bool,
    /// Extra entries; these override built-in ones with the same key.
    pub dictionary: BTreeMap<String, String>,
}

impl Default for ShorthandConfig {
    fn default() -> Self {
        Self { enabled: true, use_builtin: true, dictionary: BTreeMap::new() }
    }
}

impl ShorthandConfig {
    /// Only the given entries, no built-in table.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            enabled: true,
            use_builtin: false,
            dictionary: entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// The merged dictionary with lowercase keys.
    pub fn effective_dictionary(&self) -> BTreeMap<String, String> {
        if !self.enabled {
            return BTreeMap::new();
        }
        let mut table = if self.use_builtin { BUILTIN_SHORTHAND.clone() } else { BTreeMap::new() };
        for (k, v) in &self.dictionary {
            table.insert(k.to_lowercase(), v.clone());
        }
        table
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub byte_budget: usize,
    pub char_budget: usize,
    /// Enabled strategies in preference order.
    pub strategies: Vec<Strategy>,
    pub escalation: Escalation,
    pub fancy_style: FancyStyle,
    pub interspacing: InterspacingConfig,
    pub shorthand: ShorthandConfig,
    pub mode: Mode,
    pub max_pattern_length: usize,
    /// Widest run of words a sliding-window hit may span.
    pub max_window_words: usize,
    /// Ignore fancy-text code points during detection.
    pub strip_styled_text: bool,
    /// Never transform matches inside URLs.
    pub link_protection: bool,
    /// Maximum number of candidates offered in manual mode.
    pub candidate_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            byte_budget: DEFAULT_BYTE_BUDGET,
            char_budget: DEFAULT_CHAR_BUDGET,
            strategies: Strategy::ALL.to_vec(),
            escalation: Escalation::default(),
            fancy_style: FancyStyle::default(),
            interspacing: InterspacingConfig::default(),
            shorthand: ShorthandConfig::default(),
            mode: Mode::default(),
            max_pattern_length: MAX_PATTERN_LENGTH,
            max_window_words: 3,
            strip_styled_text: true,
            link_protection: true,
            candidate_limit: 4,
        }
    }
}

impl EngineConfig {
    /// Loads an engine configuration from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading engine configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml_str(&text)
            .with_context(|| format!("Failed to load config file {}", path.display()))?;
        Ok(config)
    }

    /// Parses, repairs and validates a YAML configuration.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let mut config: EngineConfig = if yaml.trim().is_empty() {
            EngineConfig::default()
        } else {
            serde_yml::from_str(yaml).context("Failed to parse engine configuration")?
        };
        config.enforce_safe_interspacing();
        config.validate()?;
        debug!(
            "Engine configuration: budgets {}B/{}c, strategies {:?}, mode {:?}",
            config.byte_budget, config.char_budget, config.strategies, config.mode
        );
        Ok(config)
    }

    /// Replaces an interspacing character that could break the message or a
    /// shell with the default one.
    pub fn enforce_safe_interspacing(&mut self) {
        let c = self.interspacing.character;
        if !is_safe_interspacing_char(c) {
            warn!(
                "Interspacing character U+{:04X} is not allowed; using U+{:04X} instead.",
                c as u32, DEFAULT_INTERSPACING_CHAR as u32
            );
            self.interspacing.character = DEFAULT_INTERSPACING_CHAR;
        }
    }

    pub fn validate(&self) -> Result<(), ChatveilError> {
        let mut errors = Vec::new();

        if self.byte_budget != 0 && self.byte_budget < 4 {
            errors.push(format!("byte_budget must be 0 or at least 4, got {}.", self.byte_budget));
        }
        if self.strategies.is_empty() {
            errors.push("At least one strategy must be enabled.".to_string());
        }
        let mut seen = HashSet::new();
        for s in &self.strategies {
            if !seen.insert(*s) {
                errors.push(format!("Strategy '{}' is listed more than once.", s));
            }
        }
        if self.interspacing.stride == 0 {
            errors.push("interspacing.stride must be at least 1.".to_string());
        }
        if !(2..=5).contains(&self.max_window_words) {
            errors.push(format!(
                "max_window_words must be between 2 and 5, got {}.",
                self.max_window_words
            ));
        }
        if self.max_pattern_length == 0 {
            errors.push("max_pattern_length must be greater than 0.".to_string());
        }
        if self.candidate_limit == 0 {
            errors.push("candidate_limit must be greater than 0.".to_string());
        }
        for (k, v) in &self.shorthand.dictionary {
            if k.trim().is_empty() || v.trim().is_empty() {
                errors.push(format!("Shorthand entry '{}' -> '{}' is empty.", k, v));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ChatveilError::InvalidConfig(errors.join("\n")))
        }
    }

    pub fn budget(&self) -> Budget {
        Budget::new(self.byte_budget, self.char_budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.byte_budget, 92);
        assert_eq!(config.char_budget, 80);
        assert_eq!(config.strategies, vec![Strategy::LeetSpeak, Strategy::FancyText, Strategy::Interspacing]);
        assert_eq!(config.fancy_style, FancyStyle::Squared);
        assert_eq!(config.interspacing.character, '\u{200B}');
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builtin_shorthand_is_loaded() {
        let table = ShorthandConfig::default().effective_dictionary();
        assert_eq!(table.get("you").map(String::as_str), Some("u"));
        assert_eq!(table.get("someone").map(String::as_str), Some("some1"));
        assert_eq!(table.get("by the way").map(String::as_str), Some("btw"));
    }

    #[test]
    fn test_user_entries_override_builtin() {
        let mut sh = ShorthandConfig::default();
        sh.dictionary.insert("You".to_string(), "yu".to_string());
        assert_eq!(sh.effective_dictionary().get("you").map(String::as_str), Some("yu"));
        sh.enabled = false;
        assert!(sh.effective_dictionary().is_empty());
    }

    #[test]
    fn test_budget_zero_disables_dimension() {
        assert!(Budget::new(0, 3).fits("abc"));
        assert!(!Budget::new(0, 2).fits("abc"));
        assert!(Budget::new(5, 0).fits("abcd"));
        assert!(!Budget::new(5, 0).fits("\u{1F130}\u{1F130}"));
    }

    #[test]
    fn test_validation_collects_errors() {
        let mut config = EngineConfig::default();
        config.strategies = vec![Strategy::LeetSpeak, Strategy::LeetSpeak];
        config.interspacing.stride = 0;
        config.max_window_words = 9;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("more than once"));
        assert!(err.contains("stride"));
        assert!(err.contains("max_window_words"));
    }

    #[test]
    fn test_unsafe_interspacing_char_falls_back() {
        let config = EngineConfig::from_yaml_str("interspacing:\n  character: \"|\"\n").unwrap();
        assert_eq!(config.interspacing.character, DEFAULT_INTERSPACING_CHAR);
    }
}
