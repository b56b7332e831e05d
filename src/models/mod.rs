//! Data models for Pinned Tabs.
//!
//! This module defines the core data structures:
//! - `BookmarkNode` - One node of the browser's bookmark tree snapshot
//! - `BookmarkChild` - A direct child of a folder, as used by startup restoration
//! - `FolderDescriptor` - A selectable folder derived from the tree
//! - `SelectOption` - One `{value, label}` entry of the folder picker
//! - `SelectionState` - The single persisted key-value pair

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Id of the synthetic root folder of every bookmark tree.
pub const ROOT_FOLDER_ID: &str = "0";

/// Storage key holding the chosen folder id.
pub const TARGET_FOLDER_KEY: &str = "targetFolderId";

/// A node of the bookmark tree as returned by `bookmarks.getTree()`.
///
/// A node with a `url` is a bookmark leaf; a node without one is a folder.
/// Extra fields sent by the browser (`parentId`, `index`, `dateAdded`, ...)
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkNode {
    /// Opaque id, unique within a snapshot
    pub id: String,

    /// Display title (may be empty)
    #[serde(default)]
    pub title: String,

    /// Target URL, present only on bookmark leaves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Child nodes, present only on folders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<BookmarkNode>>,
}

impl BookmarkNode {
    /// Create a folder node with no children.
    pub fn folder(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: None,
            children: None,
        }
    }

    /// Create a bookmark leaf.
    pub fn bookmark(
        id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: Some(url.into()),
            children: None,
        }
    }

    /// Attach children to this node.
    pub fn with_children(mut self, children: Vec<BookmarkNode>) -> Self {
        self.children = Some(children);
        self
    }

    /// Whether this node is a folder. An empty `url` counts as none.
    pub fn is_folder(&self) -> bool {
        self.url.as_deref().is_none_or(str::is_empty)
    }

    /// Children of this node, empty for leaves and childless folders.
    pub fn child_nodes(&self) -> &[BookmarkNode] {
        self.children.as_deref().unwrap_or_default()
    }
}

/// A direct child of a folder as returned by `bookmarks.getChildren()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkChild {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<&BookmarkNode> for BookmarkChild {
    fn from(node: &BookmarkNode) -> Self {
        Self {
            id: node.id.clone(),
            url: node.url.clone(),
        }
    }
}

/// A folder the user can pick, derived 1:1 from a non-root folder node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderDescriptor {
    pub id: String,
    pub title: String,
}

impl FolderDescriptor {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }

    /// Whether this descriptor refers to the synthetic root folder.
    pub fn is_root(&self) -> bool {
        self.id == ROOT_FOLDER_ID
    }
}

impl From<&BookmarkNode> for FolderDescriptor {
    fn from(node: &BookmarkNode) -> Self {
        Self::new(node.id.clone(), node.title.clone())
    }
}

/// One entry of the folder picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Folder id
    pub value: String,
    /// Rendered title
    pub label: String,
}

/// The persisted folder choice.
///
/// Stored as `{"targetFolderId": "<id>"}`; absent until the first save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_folder_id: Option<String>,
}

impl SelectionState {
    /// Create a state pointing at the given folder.
    pub fn new(folder_id: impl Into<String>) -> Self {
        Self {
            target_folder_id: Some(folder_id.into()),
        }
    }

    /// Read the state out of a storage `get` result.
    ///
    /// A missing key yields an empty state; a key holding something other
    /// than a string is an error.
    pub fn from_items(items: &Map<String, Value>) -> crate::Result<Self> {
        match items.get(TARGET_FOLDER_KEY) {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(Value::String(id)) => Ok(Self::new(id.clone())),
            Some(other) => Err(crate::Error::Storage(format!(
                "{} holds a non-string value: {}",
                TARGET_FOLDER_KEY, other
            ))),
        }
    }

    /// Build the mapping passed to a storage `set`.
    pub fn to_items(&self) -> Map<String, Value> {
        let mut items = Map::new();
        if let Some(ref id) = self.target_folder_id {
            items.insert(TARGET_FOLDER_KEY.to_string(), Value::String(id.clone()));
        }
        items
    }

    /// The chosen folder id, if any non-empty one is stored.
    pub fn folder_id(&self) -> Option<&str> {
        self.target_folder_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
    }
}
