// chatveil/tests/cli_integration_tests.rs
//! Command-line integration tests for the `chatveil` binary.
//!
//! Every run gets its own config directory so that lists in the user's real
//! config directory never leak into a test.

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use test_log::test;

fn list_file(content: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(content.as_bytes())?;
    Ok(file)
}

fn chatveil(config_home: &TempDir) -> Result<Command> {
    let mut cmd = Command::cargo_bin("chatveil")?;
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("CHATVEIL_FILTER")
        .env_remove("CHATVEIL_WHITELIST")
        .env_remove("CHATVEIL_CONFIG")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    Ok(cmd)
}

#[test]
fn process_rewrites_filtered_word() -> Result<()> {
    let home = TempDir::new()?;
    let filter = list_file("ass\n")?;
    chatveil(&home)?
        .args(["process", "-f"])
        .arg(filter.path())
        .arg("first class")
        .assert()
        .success()
        .stdout("first cl4ss\n")
        .stderr(predicate::str::contains("leet_speak"));
    Ok(())
}

#[test]
fn process_reads_stdin() -> Result<()> {
    let home = TempDir::new()?;
    let filter = list_file("ass\n")?;
    chatveil(&home)?
        .args(["-q", "process", "-f"])
        .arg(filter.path())
        .write_stdin("first class\n")
        .assert()
        .success()
        .stdout("first cl4ss\n")
        .stderr("");
    Ok(())
}

#[test]
fn whitelist_keeps_word() -> Result<()> {
    let home = TempDir::new()?;
    let filter = list_file("ass\n")?;
    let whitelist = list_file("assassin\n")?;
    chatveil(&home)?
        .args(["-q", "process", "-f"])
        .arg(filter.path())
        .arg("-w")
        .arg(whitelist.path())
        .arg("Assassin")
        .assert()
        .success()
        .stdout("Assassin\n");
    Ok(())
}

#[test]
fn default_lists_come_from_config_dir() -> Result<()> {
    let home = TempDir::new()?;
    let dir = home.path().join("chatveil");
    std::fs::create_dir_all(&dir)?;
    std::fs::write(dir.join("filter.txt"), "ass\n")?;
    chatveil(&home)?
        .args(["-q", "process", "first class"])
        .assert()
        .success()
        .stdout("first cl4ss\n");
    Ok(())
}

#[test]
fn json_output_describes_result() -> Result<()> {
    let home = TempDir::new()?;
    let filter = list_file("ass\n")?;
    chatveil(&home)?
        .args(["process", "--json", "-f"])
        .arg(filter.path())
        .arg("first class")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"mode\": \"auto\""))
        .stdout(predicate::str::contains("\"clean\": true"))
        .stdout(predicate::str::contains("cl4ss"));
    Ok(())
}

#[test]
fn char_budget_splits_message() -> Result<()> {
    let home = TempDir::new()?;
    let filter = list_file("ass\n")?;
    chatveil(&home)?
        .args(["-q", "process", "--byte-budget", "0", "--char-budget", "6", "-f"])
        .arg(filter.path())
        .arg("first class")
        .assert()
        .success()
        .stdout("first\ncl4ss\n");
    Ok(())
}

#[test]
fn manual_mode_lists_candidates() -> Result<()> {
    let home = TempDir::new()?;
    let filter = list_file("ass\n")?;
    chatveil(&home)?
        .args(["process", "--mode", "manual", "-f"])
        .arg(filter.path())
        .arg("first class")
        .assert()
        .success()
        .stdout(predicate::str::contains("Candidates:"))
        .stdout(predicate::str::contains("[1] "));
    Ok(())
}

#[test]
fn pick_commits_a_candidate() -> Result<()> {
    let home = TempDir::new()?;
    let filter = list_file("ass\n")?;
    chatveil(&home)?
        .args(["-q", "process", "--pick", "1", "-f"])
        .arg(filter.path())
        .arg("first class")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("first "))
        .stdout(predicate::str::contains("class").not());
    Ok(())
}

#[test]
fn pick_out_of_range_fails() -> Result<()> {
    let home = TempDir::new()?;
    let filter = list_file("ass\n")?;
    chatveil(&home)?
        .args(["process", "--pick", "99", "-f"])
        .arg(filter.path())
        .arg("first class")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("There are only"));
    Ok(())
}

#[test]
fn unknown_strategy_is_rejected() -> Result<()> {
    let home = TempDir::new()?;
    chatveil(&home)?
        .args(["process", "-s", "rot13", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown strategy 'rot13'"));
    Ok(())
}

#[test]
fn invalid_config_file_is_reported() -> Result<()> {
    let home = TempDir::new()?;
    let config = list_file("strategies: []\n")?;
    chatveil(&home)?
        .args(["process", "-c"])
        .arg(config.path())
        .arg("hello")
        .assert()
        .failure()
        .stderr(predicate::str::contains("At least one strategy"));
    Ok(())
}

#[test]
fn force_runs_without_filter_list() -> Result<()> {
    let home = TempDir::new()?;
    chatveil(&home)?
        .args(["-q", "process", "--force", "hello there"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
    Ok(())
}

#[test]
fn empty_input_is_returned_unchanged() -> Result<()> {
    let home = TempDir::new()?;
    chatveil(&home)?
        .args(["-q", "process"])
        .write_stdin("")
        .assert()
        .success()
        .stdout("\n");
    Ok(())
}

#[test]
fn scan_reports_matches() -> Result<()> {
    let home = TempDir::new()?;
    let filter = list_file("ass\n")?;
    chatveil(&home)?
        .args(["scan", "-f"])
        .arg(filter.path())
        .arg("class and glass")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 match(es) in 2 span(s)"));
    Ok(())
}

#[test]
fn scan_threshold_sets_exit_code() -> Result<()> {
    let home = TempDir::new()?;
    let filter = list_file("ass\n")?;
    chatveil(&home)?
        .args(["scan", "--fail-over-threshold", "1", "-f"])
        .arg(filter.path())
        .arg("class and glass")
        .assert()
        .code(1);
    Ok(())
}

#[test]
fn scan_json_lists_matches() -> Result<()> {
    let home = TempDir::new()?;
    let filter = list_file("ass\n")?;
    chatveil(&home)?
        .args(["scan", "--json", "-f"])
        .arg(filter.path())
        .arg("first class")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"pattern\": \"ass\""));
    Ok(())
}
