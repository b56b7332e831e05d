//! CLI argument definitions for Pinned Tabs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Version string shown by `--version`, with build metadata.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("PINNED_TABS_GIT_COMMIT"),
    ", built ",
    env!("PINNED_TABS_BUILD_TIMESTAMP"),
    ")"
);

/// Pinned Tabs - inspect bookmark exports and the saved pinned-tab folder.
///
/// Tree files are the JSON returned by `chrome.bookmarks.getTree()`.
#[derive(Parser, Debug)]
#[command(name = "pinned-tabs")]
#[command(author, version, about = "Inspect the folder reopened as pinned tabs on browser startup", long_about = None)]
#[command(long_version = LONG_VERSION)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the folders offered by the folder picker
    Folders {
        /// Bookmark tree JSON file
        tree: PathBuf,
    },

    /// Show which bookmarks of a folder would open as pinned tabs
    Pinned {
        /// Bookmark tree JSON file
        tree: PathBuf,

        /// Folder id
        #[arg(short, long)]
        folder: String,
    },

    /// Load, validate and print a selector config (.kdl, .toml or .json)
    Config {
        /// Config file; omit to print a preset
        file: Option<PathBuf>,

        /// Start from the popup preset instead of the options page one
        #[arg(long, conflicts_with = "file")]
        popup: bool,
    },

    /// Read or write the saved target folder
    Target {
        #[command(subcommand)]
        command: TargetCommands,
    },
}

/// Target folder subcommands
#[derive(Subcommand, Debug)]
pub enum TargetCommands {
    /// Print the saved target folder id
    Get {
        /// JSON store file
        #[arg(short, long, env = "PINNED_TABS_STORE")]
        store: PathBuf,
    },

    /// Save a target folder id (blank ids are refused)
    Set {
        /// Folder id
        folder_id: String,

        /// JSON store file
        #[arg(short, long, env = "PINNED_TABS_STORE")]
        store: PathBuf,
    },
}
