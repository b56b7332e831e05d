//! Controller configuration schema.
//!
//! This module provides:
//! - The `ControllerConfig` struct with its defaults and presets
//! - Serialization/deserialization to/from KDL format
//! - Validation

use std::time::Duration;

use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde::{Deserialize, Serialize};

/// Default number of folders above which the popup warns about list size.
pub const DEFAULT_FOLDER_COUNT_THRESHOLD: u32 = 100;

/// Default auto-clear duration for the success message.
pub const DEFAULT_STATUS_DURATION_MS: u64 = 2000;

/// Debounce used by the toolbar popup.
pub const POPUP_DEBOUNCE_MS: u64 = 300;

/// Settings of one folder selector, resolved at construction.
///
/// Every field is optional on input: omitted keys keep their default.
/// Field names are camelCase in JSON/TOML so the options object passed
/// from JavaScript maps onto this struct directly.
///
/// # KDL Schema
///
/// ```kdl
/// show-folder-count-warning #true
/// folder-count-threshold 100
/// debounce-delay-ms 300
/// success-message "Saved!"
/// status-duration-ms 2000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControllerConfig {
    /// Warn when the folder count exceeds `folder_count_threshold`
    pub show_folder_count_warning: bool,

    /// Folder count above which the warning is shown (must be > 0)
    pub folder_count_threshold: u32,

    /// Debounce delay before saving a selection (0 = save immediately)
    pub debounce_delay_ms: u64,

    /// Message shown after a successful save; `None` uses the catalog's
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_message: Option<String>,

    /// How long the success message stays visible (0 = until replaced)
    pub status_duration_ms: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            show_folder_count_warning: false,
            folder_count_threshold: DEFAULT_FOLDER_COUNT_THRESHOLD,
            debounce_delay_ms: 0,
            success_message: None,
            status_duration_ms: DEFAULT_STATUS_DURATION_MS,
        }
    }
}

impl ControllerConfig {
    /// Settings used by the extension's options page.
    pub fn options_page() -> Self {
        Self::default()
    }

    /// Settings used by the toolbar popup: large-tree warning and a
    /// debounce so keyboard scrolling through the list saves only once.
    pub fn popup() -> Self {
        Self {
            show_folder_count_warning: true,
            folder_count_threshold: DEFAULT_FOLDER_COUNT_THRESHOLD,
            debounce_delay_ms: POPUP_DEBOUNCE_MS,
            ..Self::default()
        }
    }

    /// Validate the config values.
    ///
    /// Returns an error message if any value is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.folder_count_threshold == 0 {
            return Err("folder-count-threshold must be greater than 0".to_string());
        }
        Ok(())
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_delay_ms)
    }

    pub fn status_duration(&self) -> Duration {
        Duration::from_millis(self.status_duration_ms)
    }

    /// Whether a list of `count` folders should trigger the size warning.
    pub fn warns_for(&self, count: usize) -> bool {
        self.show_folder_count_warning && count > self.folder_count_threshold as usize
    }

    /// Parse config from a KDL document, starting from the defaults.
    ///
    /// Nodes with a value of the wrong type are ignored.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        let mut config = Self::default();

        if let Some(b) = first_value(doc, "show-folder-count-warning").and_then(|v| v.as_bool()) {
            config.show_folder_count_warning = b;
        }

        if let Some(i) = first_value(doc, "folder-count-threshold").and_then(|v| v.as_integer()) {
            if let Ok(threshold) = u32::try_from(i) {
                config.folder_count_threshold = threshold;
            }
        }

        if let Some(i) = first_value(doc, "debounce-delay-ms").and_then(|v| v.as_integer()) {
            if let Ok(delay) = u64::try_from(i) {
                config.debounce_delay_ms = delay;
            }
        }

        if let Some(s) = first_value(doc, "success-message").and_then(|v| v.as_string()) {
            config.success_message = Some(s.to_string());
        }

        if let Some(i) = first_value(doc, "status-duration-ms").and_then(|v| v.as_integer()) {
            if let Ok(duration) = u64::try_from(i) {
                config.status_duration_ms = duration;
            }
        }

        config
    }

    /// Convert config to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        push_node(
            &mut doc,
            "show-folder-count-warning",
            KdlValue::Bool(self.show_folder_count_warning),
        );
        push_node(
            &mut doc,
            "folder-count-threshold",
            KdlValue::Integer(self.folder_count_threshold as i128),
        );
        push_node(
            &mut doc,
            "debounce-delay-ms",
            KdlValue::Integer(self.debounce_delay_ms as i128),
        );
        if let Some(ref message) = self.success_message {
            push_node(&mut doc, "success-message", KdlValue::String(message.clone()));
        }
        push_node(
            &mut doc,
            "status-duration-ms",
            KdlValue::Integer(self.status_duration_ms as i128),
        );

        doc
    }
}

fn first_value<'a>(doc: &'a KdlDocument, name: &str) -> Option<&'a KdlValue> {
    doc.get(name)
        .and_then(|node| node.entries().first())
        .map(|entry| entry.value())
}

fn push_node(doc: &mut KdlDocument, name: &str, value: KdlValue) {
    let mut node = KdlNode::new(name);
    node.push(KdlEntry::new(value));
    doc.nodes_mut().push(node);
}
