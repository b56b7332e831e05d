//! Deterministic fakes for the host capabilities.
//!
//! `TestHost` wires one of each fake into a [`Host`] while keeping typed
//! handles around so tests can drive events and inspect effects.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use serde_json::{Map, Value};

use crate::host::{
    BookmarkSource, ChangeHandler, FolderSelect, Host, KeyValueStore, Notice, StatusArea,
    SubscriptionToken, TabHost, Timer, TimerCallback, TimerHandle,
};
use crate::models::{BookmarkChild, BookmarkNode, SelectOption, TARGET_FOLDER_KEY};
use crate::native::{MemoryStore, StaticBookmarks};
use crate::{Error, Result};

/// Returns a sender that releases the held call and the receiving half to
/// hand to a fake.
pub fn gate() -> (oneshot::Sender<()>, oneshot::Receiver<()>) {
    oneshot::channel()
}

/// Bookmark source that can be switched into a failing mode.
#[derive(Default)]
pub struct FakeBookmarks {
    inner: StaticBookmarks,
    pub fail: Cell<bool>,
    held: RefCell<Option<oneshot::Receiver<()>>>,
}

impl FakeBookmarks {
    pub fn new(tree: Vec<BookmarkNode>) -> Self {
        Self {
            inner: StaticBookmarks::new(tree),
            ..Self::default()
        }
    }

    /// Make the next `get_tree` wait until the gate's sender fires or drops.
    pub fn hold_next(&self, gate: oneshot::Receiver<()>) {
        *self.held.borrow_mut() = Some(gate);
    }

    pub fn failing() -> Self {
        let source = Self::default();
        source.fail.set(true);
        source
    }
}

impl BookmarkSource for FakeBookmarks {
    fn get_tree(&self) -> LocalBoxFuture<'_, Result<Vec<BookmarkNode>>> {
        if self.fail.get() {
            return async { Err(Error::Bookmarks("bookmarks API unavailable".to_string())) }
                .boxed_local();
        }
        let held = self.held.borrow_mut().take();
        let tree = self.inner.get_tree();
        async move {
            if let Some(gate) = held {
                let _ = gate.await;
            }
            tree.await
        }
        .boxed_local()
    }

    fn get_children<'a>(
        &'a self,
        folder_id: &'a str,
    ) -> LocalBoxFuture<'a, Result<Vec<BookmarkChild>>> {
        if self.fail.get() {
            return async { Err(Error::Bookmarks("bookmarks API unavailable".to_string())) }
                .boxed_local();
        }
        self.inner.get_children(folder_id)
    }
}

/// In-memory store that records writes and can be made to fail.
#[derive(Default)]
pub struct FakeStore {
    inner: MemoryStore,
    pub fail_get: Cell<bool>,
    pub fail_set: Cell<bool>,
    writes: RefCell<Vec<Map<String, Value>>>,
    held_set: RefCell<Option<oneshot::Receiver<()>>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `targetFolderId`.
    pub fn with_target(folder_id: &str) -> Self {
        let mut items = Map::new();
        items.insert(TARGET_FOLDER_KEY.to_string(), Value::String(folder_id.to_string()));
        Self {
            inner: MemoryStore::with_items(items),
            ..Self::default()
        }
    }

    /// Make the next `set` wait until the gate's sender fires or drops.
    /// The write is applied only once released.
    pub fn hold_next_set(&self, gate: oneshot::Receiver<()>) {
        *self.held_set.borrow_mut() = Some(gate);
    }

    /// Every mapping passed to `set`, including rejected ones.
    pub fn writes(&self) -> Vec<Map<String, Value>> {
        self.writes.borrow().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }

    /// The currently persisted folder id.
    pub fn target(&self) -> Option<String> {
        self.inner
            .value(TARGET_FOLDER_KEY)
            .and_then(|v| v.as_str().map(str::to_string))
    }
}

impl KeyValueStore for FakeStore {
    fn get<'a>(&'a self, key: &'a str) -> LocalBoxFuture<'a, Result<Map<String, Value>>> {
        if self.fail_get.get() {
            return async { Err(Error::Storage("storage read failed".to_string())) }
                .boxed_local();
        }
        self.inner.get(key)
    }

    fn set(&self, items: Map<String, Value>) -> LocalBoxFuture<'_, Result<()>> {
        self.writes.borrow_mut().push(items.clone());
        if self.fail_set.get() {
            return async { Err(Error::Storage("storage write failed".to_string())) }
                .boxed_local();
        }
        let held = self.held_set.borrow_mut().take();
        let write = self.inner.set(items);
        async move {
            if let Some(gate) = held {
                let _ = gate.await;
            }
            write.await
        }
        .boxed_local()
    }
}

/// A `<select>` element.
///
/// `set_value` behaves like the DOM property: a value without a matching
/// option leaves nothing selected. `choose` simulates the user and sets
/// the raw value.
#[derive(Default)]
pub struct FakeSelect {
    options: RefCell<Vec<SelectOption>>,
    value: RefCell<String>,
    handlers: RefCell<Vec<(SubscriptionToken, ChangeHandler)>>,
    next_token: Cell<u64>,
}

impl FakeSelect {
    pub fn options(&self) -> Vec<SelectOption> {
        self.options.borrow().clone()
    }

    pub fn labels(&self) -> Vec<String> {
        self.options.borrow().iter().map(|o| o.label.clone()).collect()
    }

    pub fn listener_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn choose(&self, value: &str) {
        *self.value.borrow_mut() = value.to_string();
    }

    /// Dispatch a change event and run every listener to completion.
    pub async fn fire_change(&self) {
        let handlers: Vec<ChangeHandler> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        for handler in handlers {
            handler().await;
        }
    }

    /// Simulate the user picking `value`.
    pub async fn change_to(&self, value: &str) {
        self.choose(value);
        self.fire_change().await;
    }
}

impl FolderSelect for FakeSelect {
    fn clear_options(&self) {
        self.options.borrow_mut().clear();
        self.value.borrow_mut().clear();
    }

    fn append_option(&self, option: SelectOption) {
        let mut options = self.options.borrow_mut();
        if options.is_empty() {
            *self.value.borrow_mut() = option.value.clone();
        }
        options.push(option);
    }

    fn value(&self) -> String {
        self.value.borrow().clone()
    }

    fn set_value(&self, value: &str) {
        let known = self.options.borrow().iter().any(|o| o.value == value);
        *self.value.borrow_mut() = if known { value.to_string() } else { String::new() };
    }

    fn subscribe(&self, handler: ChangeHandler) -> SubscriptionToken {
        let token = SubscriptionToken(self.next_token.get());
        self.next_token.set(token.0 + 1);
        self.handlers.borrow_mut().push((token, handler));
        token
    }

    fn unsubscribe(&self, token: SubscriptionToken) {
        self.handlers.borrow_mut().retain(|(t, _)| *t != token);
    }
}

/// The status element plus the notices inserted before it.
#[derive(Default)]
pub struct FakeStatus {
    text: RefCell<String>,
    history: RefCell<Vec<String>>,
    notices: RefCell<Vec<Notice>>,
}

impl FakeStatus {
    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    /// Every text ever set, in order.
    pub fn history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }
}

impl StatusArea for FakeStatus {
    fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
        self.history.borrow_mut().push(text.to_string());
    }

    fn insert_before(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}

struct ArmedTimer {
    handle: TimerHandle,
    deadline: Duration,
    callback: TimerCallback,
}

/// A timer driven by [`ManualTimer::advance`] instead of the clock.
#[derive(Default)]
pub struct ManualTimer {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    armed: RefCell<Vec<ArmedTimer>>,
}

impl ManualTimer {
    pub fn armed_count(&self) -> usize {
        self.armed.borrow().len()
    }

    /// Move the clock forward, running due callbacks in deadline order.
    pub async fn advance(&self, by: Duration) {
        let target = self.now.get() + by;
        loop {
            let due = {
                let mut armed = self.armed.borrow_mut();
                let next = armed
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.deadline <= target)
                    .min_by_key(|(_, t)| (t.deadline, t.handle.0))
                    .map(|(i, _)| i);
                next.map(|i| armed.remove(i))
            };
            let Some(timer) = due else { break };
            self.now.set(timer.deadline);
            (timer.callback)().await;
        }
        self.now.set(target);
    }
}

impl Timer for ManualTimer {
    fn arm(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let handle = TimerHandle(self.next_id.get());
        self.next_id.set(handle.0 + 1);
        self.armed.borrow_mut().push(ArmedTimer {
            handle,
            deadline: self.now.get() + delay,
            callback,
        });
        handle
    }

    fn cancel(&self, handle: TimerHandle) {
        self.armed.borrow_mut().retain(|t| t.handle != handle);
    }
}

/// Tab operations recorded for inspection.
#[derive(Default)]
pub struct FakeTabs {
    pinned: RefCell<Vec<i64>>,
    opened: RefCell<Vec<String>>,
    pub fail_create: Cell<bool>,
}

impl FakeTabs {
    pub fn with_pinned(ids: &[i64]) -> Self {
        Self {
            pinned: RefCell::new(ids.to_vec()),
            ..Self::default()
        }
    }

    pub fn pinned(&self) -> Vec<i64> {
        self.pinned.borrow().clone()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }
}

impl TabHost for FakeTabs {
    fn query_pinned(&self) -> LocalBoxFuture<'_, Result<Vec<i64>>> {
        let ids = self.pinned();
        async move { Ok(ids) }.boxed_local()
    }

    fn remove(&self, tab_id: i64) -> LocalBoxFuture<'_, Result<()>> {
        self.pinned.borrow_mut().retain(|id| *id != tab_id);
        async { Ok(()) }.boxed_local()
    }

    fn create_pinned<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, Result<()>> {
        if self.fail_create.get() {
            return async { Err(Error::Tabs("tab creation refused".to_string())) }
                .boxed_local();
        }
        self.opened.borrow_mut().push(url.to_string());
        async { Ok(()) }.boxed_local()
    }
}

/// One of each fake, wired into a [`Host`].
pub struct TestHost {
    pub bookmarks: Rc<FakeBookmarks>,
    pub store: Rc<FakeStore>,
    pub select: Rc<FakeSelect>,
    pub status: Rc<FakeStatus>,
    pub timer: Rc<ManualTimer>,
}

impl TestHost {
    pub fn new(bookmarks: FakeBookmarks, store: FakeStore) -> Self {
        Self {
            bookmarks: Rc::new(bookmarks),
            store: Rc::new(store),
            select: Rc::new(FakeSelect::default()),
            status: Rc::new(FakeStatus::default()),
            timer: Rc::new(ManualTimer::default()),
        }
    }

    pub fn host(&self) -> Host {
        Host {
            bookmarks: self.bookmarks.clone(),
            store: self.store.clone(),
            select: self.select.clone(),
            status: self.status.clone(),
            timer: self.timer.clone(),
        }
    }
}

/// Root with two folders: "Work" (id 1) and an untitled one (id 2).
pub fn two_folder_tree() -> Vec<BookmarkNode> {
    vec![BookmarkNode::folder("0", "").with_children(vec![
        BookmarkNode::folder("1", "Work").with_children(vec![BookmarkNode::bookmark(
            "10",
            "Mail",
            "https://mail.example.com",
        )]),
        BookmarkNode::folder("2", ""),
    ])]
}

/// Root with `count` titled folders, ids "1"..=count.
pub fn wide_tree(count: usize) -> Vec<BookmarkNode> {
    let folders = (1..=count)
        .map(|i| BookmarkNode::folder(i.to_string(), format!("Folder {}", i)))
        .collect();
    vec![BookmarkNode::folder("0", "").with_children(folders)]
}

/// Root holding bookmarks but no folder.
pub fn leaves_only_tree() -> Vec<BookmarkNode> {
    vec![BookmarkNode::folder("0", "").with_children(vec![
        BookmarkNode::bookmark("1", "A", "https://a.example"),
        BookmarkNode::bookmark("2", "B", "https://b.example"),
    ])]
}
