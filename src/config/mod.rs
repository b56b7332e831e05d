//! Configuration for the folder selector.
//!
//! A selector is configured by the page that embeds it:
//!
//! - Options page: [`ControllerConfig::options_page`] (plain defaults)
//! - Toolbar popup: [`ControllerConfig::popup`] (size warning + 300 ms debounce)
//!
//! Hosts that keep the settings in a file can use [`load`], which picks
//! the format from the extension:
//!
//! - `.kdl` - KDL nodes (`debounce-delay-ms 300`)
//! - `.toml` - camelCase keys (`debounceDelayMs = 300`)
//! - `.json` - camelCase keys, same shape as the JavaScript options object

pub mod schema;

pub use schema::{
    ControllerConfig, DEFAULT_FOLDER_COUNT_THRESHOLD, DEFAULT_STATUS_DURATION_MS,
    POPUP_DEBOUNCE_MS,
};

use std::path::Path;

use kdl::KdlDocument;

use crate::{Error, Result};

/// Load and validate a config file.
pub fn load(path: &Path) -> Result<ControllerConfig> {
    let content = std::fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    let config = match extension.as_deref() {
        Some("kdl") => {
            let doc: KdlDocument = content.parse()?;
            ControllerConfig::from_kdl(&doc)
        }
        Some("toml") => toml::from_str(&content)?,
        Some("json") => serde_json::from_str(&content)?,
        _ => {
            return Err(Error::InvalidConfig(format!(
                "unsupported config format: {}",
                path.display()
            )));
        }
    };

    config.validate().map_err(Error::InvalidConfig)?;
    Ok(config)
}
