//! User-facing message catalog.
//!
//! The extension ships English strings by default. A host that has a
//! localized catalog deserializes it into [`Messages`] (missing keys fall
//! back to the defaults) and hands it to the selector.

use serde::{Deserialize, Serialize};

use crate::models::FolderDescriptor;

/// Placeholder replaced by the folder id in `untitled_folder`.
const ID_PLACEHOLDER: &str = "{id}";

/// Strings shown in the status area and the folder picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Messages {
    pub loading: String,
    pub save_success: String,
    pub no_folders: String,
    pub bookmark_error: String,
    pub storage_save_error: String,
    pub folder_count_warning: String,
    /// Label for the synthetic root folder
    pub root_folder: String,
    /// Label for folders without a title; `{id}` is replaced by the folder id
    pub untitled_folder: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            loading: "Loading...".to_string(),
            save_success: "Saved!".to_string(),
            no_folders: "No folders found.".to_string(),
            bookmark_error: "Failed to load bookmarks. Please reload the page.".to_string(),
            storage_save_error: "Failed to save the setting. Please try again.".to_string(),
            folder_count_warning:
                "Note: there are many folders, so the list may take a while to display."
                    .to_string(),
            root_folder: "Root".to_string(),
            untitled_folder: "(Untitled folder: {id})".to_string(),
        }
    }
}

impl Messages {
    /// Display title for a folder.
    ///
    /// A non-empty title is returned verbatim. An untitled root gets the
    /// root label; any other untitled folder gets a label carrying its id
    /// so that several untitled folders stay distinguishable.
    pub fn folder_title(&self, folder: &FolderDescriptor) -> String {
        if !folder.title.is_empty() {
            return folder.title.clone();
        }
        if folder.is_root() {
            return self.root_folder.clone();
        }
        self.untitled_folder.replace(ID_PLACEHOLDER, &folder.id)
    }
}
