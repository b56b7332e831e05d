//! Build script to inject build-time information into the binary.
//!
//! This sets environment variables that can be read at compile time:
//! - `PINNED_TABS_BUILD_TIMESTAMP`: ISO 8601 timestamp when the binary was built,
//!   taken from `SOURCE_DATE_EPOCH` when set so packaged builds are reproducible
//! - `PINNED_TABS_GIT_COMMIT`: Short git commit hash (or "unknown" if not in a git repo)

use std::process::Command;

use chrono::{DateTime, Utc};

fn main() {
    // Rerun if git HEAD changes (new commit)
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");

    // Get build timestamp
    let built = source_date_epoch().unwrap_or_else(Utc::now);
    println!(
        "cargo:rustc-env=PINNED_TABS_BUILD_TIMESTAMP={}",
        built.format("%Y-%m-%dT%H:%M:%SZ")
    );

    // Get git commit hash
    let commit = get_git_commit().unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=PINNED_TABS_GIT_COMMIT={}", commit);
}

fn source_date_epoch() -> Option<DateTime<Utc>> {
    let seconds = std::env::var("SOURCE_DATE_EPOCH").ok()?.trim().parse().ok()?;
    DateTime::from_timestamp(seconds, 0)
}

fn get_git_commit() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;

    if output.status.success() {
        let hash = String::from_utf8(output.stdout).ok()?;
        Some(hash.trim().to_string())
    } else {
        None
    }
}
