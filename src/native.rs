//! Native implementations of the host capabilities.
//!
//! Used by the CLI and by tests:
//! - [`StaticBookmarks`] - a bookmark tree loaded from a `getTree()` JSON export
//! - [`MemoryStore`] - an in-memory key-value store
//! - [`JsonFileStore`] - a key-value store persisted as one JSON object
//! - [`TokioTimer`] - one-shot timers on a tokio `LocalSet`

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use serde_json::{Map, Value};
use tokio::task::JoinHandle;

use crate::folders::find_folder;
use crate::host::{BookmarkSource, KeyValueStore, Timer, TimerCallback, TimerHandle};
use crate::models::{BookmarkChild, BookmarkNode};
use crate::{Error, Result};

/// A fixed bookmark tree.
#[derive(Debug, Clone, Default)]
pub struct StaticBookmarks {
    tree: Vec<BookmarkNode>,
}

impl StaticBookmarks {
    pub fn new(tree: Vec<BookmarkNode>) -> Self {
        Self { tree }
    }

    /// Load a tree from a JSON file holding the result of `getTree()`.
    ///
    /// A single root object is accepted as well as the usual array.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;
        let tree = match value {
            Value::Array(_) => serde_json::from_value(value)?,
            other => vec![serde_json::from_value(other)?],
        };
        Ok(Self::new(tree))
    }

    pub fn tree(&self) -> &[BookmarkNode] {
        &self.tree
    }

    fn children_of(&self, folder_id: &str) -> Result<Vec<BookmarkChild>> {
        let folder = find_folder(&self.tree, folder_id)
            .ok_or_else(|| Error::Bookmarks(format!("folder not found: {}", folder_id)))?;
        Ok(folder.child_nodes().iter().map(BookmarkChild::from).collect())
    }
}

impl BookmarkSource for StaticBookmarks {
    fn get_tree(&self) -> LocalBoxFuture<'_, Result<Vec<BookmarkNode>>> {
        let tree = self.tree.clone();
        async move { Ok(tree) }.boxed_local()
    }

    fn get_children<'a>(
        &'a self,
        folder_id: &'a str,
    ) -> LocalBoxFuture<'a, Result<Vec<BookmarkChild>>> {
        async move { self.children_of(folder_id) }.boxed_local()
    }
}

/// Return only the entry for `key`, mirroring `storage.local.get(key)`.
fn pick(items: &Map<String, Value>, key: &str) -> Map<String, Value> {
    items
        .get(key)
        .map(|value| Map::from_iter([(key.to_string(), value.clone())]))
        .unwrap_or_default()
}

/// An in-memory key-value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<Map<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with `items`.
    pub fn with_items(items: Map<String, Value>) -> Self {
        Self {
            items: RefCell::new(items),
        }
    }

    /// Current value of `key`.
    pub fn value(&self, key: &str) -> Option<Value> {
        self.items.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get<'a>(&'a self, key: &'a str) -> LocalBoxFuture<'a, Result<Map<String, Value>>> {
        async move { Ok(pick(&self.items.borrow(), key)) }.boxed_local()
    }

    fn set(&self, items: Map<String, Value>) -> LocalBoxFuture<'_, Result<()>> {
        async move {
            self.items.borrow_mut().extend(items);
            Ok(())
        }
        .boxed_local()
    }
}

/// A key-value store persisted as a single JSON object on disk.
///
/// A missing file reads as an empty store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&content)? {
            Value::Object(items) => Ok(items),
            _ => Err(Error::Storage(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
        }
    }

    fn merge(&self, items: Map<String, Value>) -> Result<()> {
        let mut current = self.read_all()?;
        current.extend(items);
        self.write_all(&current)
    }

    fn write_all(&self, items: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(items)?;
        std::fs::write(&self.path, content + "\n")?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get<'a>(&'a self, key: &'a str) -> LocalBoxFuture<'a, Result<Map<String, Value>>> {
        async move { self.read_all().map(|items| pick(&items, key)) }.boxed_local()
    }

    fn set(&self, items: Map<String, Value>) -> LocalBoxFuture<'_, Result<()>> {
        async move { self.merge(items) }.boxed_local()
    }
}

/// One-shot timers backed by `tokio::time::sleep`.
///
/// Callbacks are spawned with `spawn_local`, so the timer must be used
/// from inside a `tokio::task::LocalSet`. Once a timer fires it is no
/// longer cancellable: its callback always runs to completion.
#[derive(Debug, Default)]
pub struct TokioTimer {
    next_id: RefCell<u64>,
    armed: Rc<RefCell<HashMap<u64, JoinHandle<()>>>>,
}

impl TokioTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of timers that have not fired or been cancelled.
    pub fn armed_count(&self) -> usize {
        self.armed.borrow().len()
    }
}

impl Timer for TokioTimer {
    fn arm(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let id = {
            let mut next = self.next_id.borrow_mut();
            *next += 1;
            *next
        };
        let armed = Rc::clone(&self.armed);
        let task = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            armed.borrow_mut().remove(&id);
            callback().await;
        });
        self.armed.borrow_mut().insert(id, task);
        TimerHandle(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        if let Some(task) = self.armed.borrow_mut().remove(&handle.0) {
            task.abort();
        }
    }
}
