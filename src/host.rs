//! Capabilities the extension core needs from its host.
//!
//! Everything browser-specific (bookmarks API, `storage.local`, the DOM,
//! `setTimeout`) sits behind one of these traits. The browser build
//! implements them with `web-sys`; tests use deterministic fakes.
//!
//! All work happens on one thread, so the traits hand out
//! [`LocalBoxFuture`]s and take `&self`: DOM handles are shared references
//! with interior mutability, and collaborators are held as `Rc<dyn _>`.

use std::rc::Rc;
use std::time::Duration;

use futures::future::LocalBoxFuture;
use serde_json::{Map, Value};

use crate::Result;
use crate::models::{BookmarkChild, BookmarkNode, SelectOption};

/// Read access to the browser's bookmarks.
pub trait BookmarkSource {
    /// Snapshot of the whole tree, rooted at the synthetic root folder.
    fn get_tree(&self) -> LocalBoxFuture<'_, Result<Vec<BookmarkNode>>>;

    /// Direct children of one folder.
    fn get_children<'a>(&'a self, folder_id: &'a str)
    -> LocalBoxFuture<'a, Result<Vec<BookmarkChild>>>;
}

/// A key-value store in the shape of `storage.local`.
pub trait KeyValueStore {
    /// Fetch the entries for `key`; the mapping lacks `key` when unset.
    fn get<'a>(&'a self, key: &'a str) -> LocalBoxFuture<'a, Result<Map<String, Value>>>;

    /// Write every entry of `items`, replacing existing values.
    fn set(&self, items: Map<String, Value>) -> LocalBoxFuture<'_, Result<()>>;
}

/// Callback invoked on each change of the select element.
///
/// The returned future is driven by the host (for DOM listeners, the
/// browser's microtask queue).
pub type ChangeHandler = Rc<dyn Fn() -> LocalBoxFuture<'static, ()>>;

/// Identifies one `subscribe` registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(pub u64);

/// The folder `<select>` element.
pub trait FolderSelect {
    /// Remove every option.
    fn clear_options(&self);

    /// Append one option at the end of the list.
    fn append_option(&self, option: SelectOption);

    /// Value of the selected option, empty when nothing is selected.
    fn value(&self) -> String;

    /// Select the option with this value. Unknown values leave no selection.
    fn set_value(&self, value: &str);

    /// Register a change listener.
    fn subscribe(&self, handler: ChangeHandler) -> SubscriptionToken;

    /// Remove a change listener. Unknown tokens are ignored.
    fn unsubscribe(&self, token: SubscriptionToken);
}

/// Styling hint for a notice inserted next to the status area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Warning,
}

impl NoticeKind {
    /// CSS class applied to the inserted element.
    pub fn class_name(&self) -> &'static str {
        match self {
            NoticeKind::Warning => "warning",
        }
    }
}

/// A standalone message element inserted before the status area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            text: text.into(),
        }
    }
}

/// The status message element.
pub trait StatusArea {
    /// Replace the displayed text; an empty string clears it.
    fn set_text(&self, text: &str);

    /// Insert a sibling element before the status area.
    fn insert_before(&self, notice: Notice);
}

/// Callback run once when a timer fires.
pub type TimerCallback = Box<dyn FnOnce() -> LocalBoxFuture<'static, ()>>;

/// Identifies one armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// Cancellable one-shot timers (`setTimeout` / `clearTimeout`).
pub trait Timer {
    /// Run `callback` after `delay`.
    fn arm(&self, delay: Duration, callback: TimerCallback) -> TimerHandle;

    /// Cancel a timer. Fired or unknown handles are ignored.
    fn cancel(&self, handle: TimerHandle);
}

/// Browser tab operations used by startup restoration.
pub trait TabHost {
    /// Ids of every currently pinned tab.
    fn query_pinned(&self) -> LocalBoxFuture<'_, Result<Vec<i64>>>;

    /// Close a tab.
    fn remove(&self, tab_id: i64) -> LocalBoxFuture<'_, Result<()>>;

    /// Open a new pinned tab.
    fn create_pinned<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, Result<()>>;
}

/// The collaborators one folder selector works against.
#[derive(Clone)]
pub struct Host {
    pub bookmarks: Rc<dyn BookmarkSource>,
    pub store: Rc<dyn KeyValueStore>,
    pub select: Rc<dyn FolderSelect>,
    pub status: Rc<dyn StatusArea>,
    pub timer: Rc<dyn Timer>,
}
