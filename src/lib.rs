//! Pinned Tabs - reopen one bookmark folder as pinned tabs on browser startup.
//!
//! This library provides the logic behind the extension's folder picker
//! and its startup hook:
//!
//! - [`folders`] flattens a bookmark tree into the list of selectable folders
//! - [`selector`] drives the folder picker UI (load, restore, debounce, save)
//! - [`startup`] reopens the chosen folder's bookmarks as pinned tabs
//!
//! Browser APIs and DOM elements are reached through the capability traits
//! in [`host`], so the same controller runs against `web-sys` in the
//! extension and against deterministic fakes in tests.

pub mod config;
pub mod folders;
pub mod host;
#[cfg(not(target_arch = "wasm32"))]
pub mod logging;
pub mod messages;
pub mod models;
#[cfg(not(target_arch = "wasm32"))]
pub mod native;
pub mod selector;
pub mod startup;
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub mod wasm;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
#[cfg(not(target_arch = "wasm32"))]
pub mod commands;

#[cfg(test)]
pub(crate) mod test_utils;

/// Library-level error type for Pinned Tabs operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("KDL error: {0}")]
    Kdl(#[from] kdl::KdlError),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Bookmarks unavailable: {0}")]
    Bookmarks(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Tabs error: {0}")]
    Tabs(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Pinned Tabs operations.
pub type Result<T> = std::result::Result<T, Error>;
