//! Command implementations for the Pinned Tabs CLI.
//!
//! Each command returns a result struct implementing [`Output`], which
//! `main` prints as JSON (default) or human-readable text (`-H`).

use std::path::Path;

use serde::Serialize;

use crate::config::{self, ControllerConfig};
use crate::folders::{extract_folders, find_folder, resolve_folder_title};
use crate::host::{BookmarkSource, KeyValueStore};
use crate::models::{FolderDescriptor, SelectionState, TARGET_FOLDER_KEY};
use crate::native::{JsonFileStore, StaticBookmarks};
use crate::startup::pinned_urls;
use crate::{Error, Result};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json_string<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
}

/// One row of the folder picker.
#[derive(Debug, Clone, Serialize)]
pub struct FolderEntry {
    pub id: String,
    pub title: String,
    pub label: String,
}

impl From<FolderDescriptor> for FolderEntry {
    fn from(folder: FolderDescriptor) -> Self {
        let label = resolve_folder_title(&folder);
        Self {
            id: folder.id,
            title: folder.title,
            label,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FolderList {
    pub count: usize,
    pub folders: Vec<FolderEntry>,
}

impl Output for FolderList {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        if self.folders.is_empty() {
            return "No folders found.".to_string();
        }
        let width = self.folders.iter().map(|f| f.id.len()).max().unwrap_or(0);
        let mut lines = vec![format!("{} folder(s):", self.count)];
        for folder in &self.folders {
            lines.push(format!("  {:>width$}  {}", folder.id, folder.label, width = width));
        }
        lines.join("\n")
    }
}

/// List the selectable folders of a bookmark tree export.
pub fn folders(tree: &Path) -> Result<FolderList> {
    let source = StaticBookmarks::from_file(tree)?;
    let folders: Vec<FolderEntry> = extract_folders(source.tree())
        .into_iter()
        .map(FolderEntry::from)
        .collect();
    Ok(FolderList {
        count: folders.len(),
        folders,
    })
}

#[derive(Debug, Serialize)]
pub struct PinnedList {
    pub folder_id: String,
    pub label: String,
    pub open: Vec<String>,
    pub skipped: Vec<String>,
}

impl Output for PinnedList {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "{} ({}): {} to open, {} skipped",
            self.label,
            self.folder_id,
            self.open.len(),
            self.skipped.len()
        )];
        for url in &self.open {
            lines.push(format!("  + {}", url));
        }
        for url in &self.skipped {
            lines.push(format!("  - {} (unsafe scheme)", url));
        }
        lines.join("\n")
    }
}

/// Show which bookmarks of a folder startup restoration would open.
pub async fn pinned(tree: &Path, folder_id: &str) -> Result<PinnedList> {
    let source = StaticBookmarks::from_file(tree)?;
    let folder = find_folder(source.tree(), folder_id)
        .ok_or_else(|| Error::NotFound(format!("folder {}", folder_id)))?;
    let label = resolve_folder_title(&FolderDescriptor::from(folder));

    let children = source.get_children(folder_id).await?;
    let urls = pinned_urls(&children);
    Ok(PinnedList {
        folder_id: folder_id.to_string(),
        label,
        open: urls.open,
        skipped: urls.skipped,
    })
}

#[derive(Debug, Serialize)]
pub struct ConfigShow {
    /// Config file path, or `preset:<name>`
    pub source: String,
    pub config: ControllerConfig,
}

impl Output for ConfigShow {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        let mut doc = self.config.to_kdl();
        doc.autoformat();
        format!("// {}\n{}", self.source, doc)
    }
}

/// Load and validate a config file, or print a preset.
pub fn config_show(file: Option<&Path>, popup: bool) -> Result<ConfigShow> {
    match file {
        Some(path) => Ok(ConfigShow {
            source: path.display().to_string(),
            config: config::load(path)?,
        }),
        None if popup => Ok(ConfigShow {
            source: "preset:popup".to_string(),
            config: ControllerConfig::popup(),
        }),
        None => Ok(ConfigShow {
            source: "preset:options".to_string(),
            config: ControllerConfig::options_page(),
        }),
    }
}

#[derive(Debug, Serialize)]
pub struct TargetStatus {
    #[serde(rename = "targetFolderId")]
    pub target_folder_id: Option<String>,
}

impl Output for TargetStatus {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        match self.target_folder_id {
            Some(ref id) => format!("Target folder: {}", id),
            None => "No target folder saved.".to_string(),
        }
    }
}

/// Read the saved target folder from a JSON store.
pub async fn target_get(store: &Path) -> Result<TargetStatus> {
    let store = JsonFileStore::new(store);
    let items = store.get(TARGET_FOLDER_KEY).await?;
    let state = SelectionState::from_items(&items)?;
    Ok(TargetStatus {
        target_folder_id: state.folder_id().map(str::to_string),
    })
}

/// Save a target folder to a JSON store.
///
/// Blank ids are refused so a valid saved folder is never erased.
pub async fn target_set(store: &Path, folder_id: &str) -> Result<TargetStatus> {
    if folder_id.trim().is_empty() {
        return Err(Error::InvalidInput(
            "folder id must not be empty".to_string(),
        ));
    }
    let store = JsonFileStore::new(store);
    store.set(SelectionState::new(folder_id).to_items()).await?;
    Ok(TargetStatus {
        target_folder_id: Some(folder_id.to_string()),
    })
}
