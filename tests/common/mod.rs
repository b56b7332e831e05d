//! Common test utilities for pinned-tabs integration tests.
//!
//! Provides `TestEnv`, a temporary directory holding a bookmark tree export
//! and a JSON store, so tests never touch each other's files.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
pub use tempfile::TempDir;

/// Bookmark tree in the shape `chrome.bookmarks.getTree()` returns.
pub const SAMPLE_TREE: &str = r#"[
  {
    "id": "0",
    "title": "",
    "children": [
      {
        "id": "1",
        "title": "Bookmarks Bar",
        "children": [
          { "id": "10", "title": "Mail", "url": "https://mail.example.com/" },
          { "id": "11", "title": "Docs", "url": "http://docs.example.com/start" },
          { "id": "12", "title": "Script", "url": "javascript:alert(1)" },
          {
            "id": "13",
            "title": "",
            "children": [
              { "id": "130", "title": "Nested", "url": "https://nested.example.com/" }
            ]
          }
        ]
      },
      { "id": "2", "title": "Other Bookmarks", "children": [] }
    ]
  }
]"#;

pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Environment with `SAMPLE_TREE` written to `tree.json`.
    pub fn with_sample_tree() -> Self {
        let env = Self::new();
        env.write("tree.json", SAMPLE_TREE);
        env
    }

    /// Write a file inside the environment and return its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn tree_path(&self) -> PathBuf {
        self.dir.path().join("tree.json")
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("storage.json")
    }

    /// Command for the pinned-tabs binary, with the store env var pointing
    /// into this environment.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_pinned-tabs"));
        cmd.current_dir(self.dir.path());
        cmd.env("PINNED_TABS_STORE", self.store_path());
        cmd.env_remove("PINNED_TABS_LOG");
        cmd
    }
}

/// Parse a command's stdout as JSON.
pub fn parse_json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("stdout is not JSON")
}
