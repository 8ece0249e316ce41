// chatveil-core/tests/config_integration_tests.rs
use anyhow::Result;
use std::io::Write;
use tempfile::NamedTempFile;
use test_log::test;

use chatveil_core::config::{EngineConfig, Escalation, Mode, DEFAULT_INTERSPACING_CHAR};
use chatveil_core::loader::{load_filter_file, load_whitelist_file};
use chatveil_core::{ChatveilError, FancyStyle, FilterEntry, ModeRouter, Strategy};

fn temp_file(content: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(content.as_bytes())?;
    Ok(file)
}

#[test]
fn test_load_config_from_file() -> Result<()> {
    let file = temp_file(
        r#"
byte_budget: 60
char_budget: 0
strategies: [fancy_text, leet_speak]
escalation: distortion
fancy_style: circled
mode: manual
interspacing:
  character: "\u2063"
  stride: 2
shorthand:
  use_builtin: false
  dictionary:
    tonight: 2nite
"#,
    )?;
    let config = EngineConfig::load_from_file(file.path())?;
    assert_eq!(config.byte_budget, 60);
    assert_eq!(config.char_budget, 0);
    assert_eq!(config.strategies, vec![Strategy::FancyText, Strategy::LeetSpeak]);
    assert_eq!(config.escalation, Escalation::Distortion);
    assert_eq!(config.fancy_style, FancyStyle::Circled);
    assert_eq!(config.mode, Mode::Manual);
    assert_eq!(config.interspacing.character, '\u{2063}');
    assert_eq!(config.interspacing.stride, 2);
    let dict = config.shorthand.effective_dictionary();
    assert_eq!(dict.len(), 1);
    assert_eq!(dict.get("tonight").map(String::as_str), Some("2nite"));
    // Keys left out keep their defaults.
    assert_eq!(config.max_window_words, 3);
    assert!(config.link_protection);
    Ok(())
}

#[test]
fn test_empty_config_file_is_default() -> Result<()> {
    let file = temp_file("")?;
    assert_eq!(EngineConfig::load_from_file(file.path())?, EngineConfig::default());
    Ok(())
}

#[test]
fn test_invalid_config_is_rejected() -> Result<()> {
    let file = temp_file("strategies: []\nbyte_budget: 2\n")?;
    let err = EngineConfig::load_from_file(file.path()).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("At least one strategy"));
    assert!(message.contains("byte_budget"));
    Ok(())
}

#[test]
fn test_unknown_strategy_fails_to_parse() -> Result<()> {
    let file = temp_file("strategies: [rot13]\n")?;
    assert!(EngineConfig::load_from_file(file.path()).is_err());
    Ok(())
}

#[test]
fn test_unsafe_interspacing_falls_back() -> Result<()> {
    let file = temp_file("interspacing:\n  character: \"a\"\n")?;
    let config = EngineConfig::load_from_file(file.path())?;
    assert_eq!(config.interspacing.character, DEFAULT_INTERSPACING_CHAR);
    Ok(())
}

#[test]
fn test_missing_config_file() {
    assert!(EngineConfig::load_from_file("/definitely/not/here.yaml").is_err());
}

#[test]
fn test_load_filter_and_whitelist_files() -> Result<()> {
    let filters = temp_file("# game filter\nass\n^anal\nASS\nsemen\nкот\n\n")?;
    let whitelist = temp_file("Assassin\n# comment\nclassic\n")?;

    let (entries, stats) = load_filter_file(filters.path())?;
    assert_eq!(stats.lines, 7);
    assert_eq!(stats.kept, 3);
    assert_eq!(stats.duplicates, 1);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.rejected_examples, vec!["кот".to_string()]);
    assert_eq!(entries[0], FilterEntry::new("ass"));
    assert!(entries[1].standalone_only);

    let (words, wl_stats) = load_whitelist_file(whitelist.path())?;
    assert_eq!(words, vec!["assassin".to_string(), "classic".to_string()]);
    assert_eq!(wl_stats.skipped, 1);

    let router = ModeRouter::with_lists(EngineConfig::default(), entries, words)?;
    assert!(router.detect("Assassin").is_clean());
    assert!(!router.detect("assassins").is_clean());
    // Standalone-only entries are ignored inside longer words.
    assert!(router.detect("Analyze").is_clean());
    assert!(!router.detect("so anal").is_clean());
    Ok(())
}

#[test]
fn test_empty_filter_file_cannot_build_index() -> Result<()> {
    let filters = temp_file("# nothing here\n")?;
    let (entries, _) = load_filter_file(filters.path())?;
    assert!(entries.is_empty());
    let router = ModeRouter::new(EngineConfig::default())?;
    let err = router.reload_filters(entries).unwrap_err();
    assert!(matches!(err, ChatveilError::IndexBuildError(_)));
    assert_eq!(router.index().generation(), 0);
    // An empty index still accepts scans.
    assert!(router.detect("anything").is_clean());
    Ok(())
}

#[test]
fn test_overlong_entry_keeps_previous_generation() -> Result<()> {
    let config = EngineConfig { max_pattern_length: 5, ..EngineConfig::default() };
    let router = ModeRouter::with_lists(config, vec![FilterEntry::new("ass")], Vec::new())?;
    let err = router.reload_filters(vec![FilterEntry::new("abcdefgh")]).unwrap_err();
    assert!(err.to_string().contains("exceeds maximum allowed"));
    assert_eq!(router.index().generation(), 1);
    assert!(!router.detect("class").is_clean());
    Ok(())
}
