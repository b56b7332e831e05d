//! Smoke tests for the pinned-tabs CLI.
//!
//! These tests verify basic CLI functionality:
//! - `pinned-tabs --version` outputs version info
//! - `pinned-tabs --help` lists the commands
//! - invalid invocations fail with a usage error

use assert_cmd::Command;
use predicates::prelude::*;

fn pinned_tabs() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pinned-tabs"))
}

#[test]
fn test_version_flag() {
    pinned_tabs()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pinned-tabs"))
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_version_includes_build_metadata() {
    pinned_tabs()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"\(\S+, built \d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z\)").unwrap());
}

#[test]
fn test_help_flag() {
    pinned_tabs()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("folders"))
        .stdout(predicate::str::contains("target"));
}

#[test]
fn test_no_args_shows_usage() {
    pinned_tabs()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_target_help() {
    pinned_tabs()
        .args(["target", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("set"));
}

#[test]
fn test_invalid_command() {
    pinned_tabs()
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}
