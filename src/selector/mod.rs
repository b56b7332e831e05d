//! Folder picker controller.
//!
//! Binds the folder `<select>` and the status line to the persisted
//! `targetFolderId`:
//!
//! 1. `initialize` loads the bookmark tree, renders one option per folder
//!    and restores the saved choice.
//! 2. Each change event is debounced (popup) or saved right away (options
//!    page). Only the value read when the debounce timer fires is written.
//! 3. `destroy` cancels timers and detaches the change listener.
//!
//! Collaborator failures never escape the controller: they are logged
//! with `tracing` and surface as a status message.

use std::cell::Cell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use futures::FutureExt;

use crate::config::ControllerConfig;
use crate::folders::extract_folders;
use crate::host::{ChangeHandler, Host, Notice, SubscriptionToken, TimerHandle};
use crate::messages::Messages;
use crate::models::{SelectOption, SelectionState, TARGET_FOLDER_KEY};

/// Lifecycle state of a [`FolderSelector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorState {
    /// Constructed, `initialize` not called yet
    Uninitialized,
    /// Fetching the bookmark tree
    Loading,
    /// Folder list rendered, waiting for input
    Ready,
    /// The tree has no selectable folder (not an error)
    NoFolders,
    /// The bookmark tree could not be loaded
    ErrorDisplayed,
    /// A change is waiting for its debounce timer or its write
    PendingSave,
    /// Last write succeeded; reverts to `Ready` when the message clears
    Saved,
    /// Last write failed; the error stays until the next action
    SaveFailed,
    /// `destroy` was called
    Disposed,
}

impl SelectorState {
    /// Whether the folder list is rendered and accepts changes.
    pub fn is_interactive(&self) -> bool {
        matches!(
            self,
            SelectorState::Ready
                | SelectorState::PendingSave
                | SelectorState::Saved
                | SelectorState::SaveFailed
        )
    }
}

struct Inner {
    host: Host,
    config: ControllerConfig,
    messages: Messages,
    state: Cell<SelectorState>,
    /// Armed debounce timer; at most one at a time
    save_timer: Cell<Option<TimerHandle>>,
    /// Armed status auto-clear timer
    clear_timer: Cell<Option<TimerHandle>>,
    subscription: Cell<Option<SubscriptionToken>>,
}

impl Inner {
    fn release(&self) {
        if let Some(handle) = self.save_timer.take() {
            self.host.timer.cancel(handle);
        }
        if let Some(handle) = self.clear_timer.take() {
            self.host.timer.cancel(handle);
        }
        if let Some(token) = self.subscription.take() {
            self.host.select.unsubscribe(token);
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.release();
    }
}

/// Controller for one folder picker.
///
/// Cloning yields another handle to the same controller. Listeners and
/// timers only hold weak references, so dropping every handle releases
/// the controller just like [`destroy`](Self::destroy).
#[derive(Clone)]
pub struct FolderSelector {
    inner: Rc<Inner>,
}

impl std::fmt::Debug for FolderSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderSelector")
            .field("state", &self.state())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl FolderSelector {
    /// Create a controller using the default message catalog.
    pub fn new(host: Host, config: ControllerConfig) -> Self {
        Self::with_messages(host, config, Messages::default())
    }

    /// Create a controller with a localized message catalog.
    pub fn with_messages(host: Host, config: ControllerConfig, messages: Messages) -> Self {
        Self {
            inner: Rc::new(Inner {
                host,
                config,
                messages,
                state: Cell::new(SelectorState::Uninitialized),
                save_timer: Cell::new(None),
                clear_timer: Cell::new(None),
                subscription: Cell::new(None),
            }),
        }
    }

    pub fn state(&self) -> SelectorState {
        self.inner.state.get()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    pub fn is_disposed(&self) -> bool {
        self.state() == SelectorState::Disposed
    }

    /// Whether a debounced save is waiting for its timer.
    pub fn has_pending_save(&self) -> bool {
        self.inner.save_timer.get().is_some()
    }

    fn set_state(&self, state: SelectorState) {
        if !self.is_disposed() {
            self.inner.state.set(state);
        }
    }

    fn from_weak(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    /// Load the folder list, restore the saved choice and start listening
    /// for changes.
    ///
    /// Only the first call on a fresh controller does anything.
    pub async fn initialize(&self) {
        if self.state() != SelectorState::Uninitialized {
            tracing::warn!(state = ?self.state(), "folder selector already initialized");
            return;
        }
        self.set_state(SelectorState::Loading);

        let populated = self.load_folders().await;
        if self.is_disposed() {
            return;
        }
        if populated {
            self.restore_selection().await;
            if self.is_disposed() {
                return;
            }
        }
        self.listen();
    }

    /// Fetch the tree and render it. Returns whether any option was added.
    async fn load_folders(&self) -> bool {
        let host = &self.inner.host;
        let messages = &self.inner.messages;
        self.show_status(&messages.loading, Duration::ZERO);

        let tree = match host.bookmarks.get_tree().await {
            Ok(tree) => tree,
            Err(e) => {
                tracing::error!(error = %e, "failed to load bookmark tree");
                if !self.is_disposed() {
                    self.show_status(&messages.bookmark_error, Duration::ZERO);
                    self.set_state(SelectorState::ErrorDisplayed);
                }
                return false;
            }
        };
        if self.is_disposed() {
            return false;
        }

        let folders = extract_folders(&tree);
        if folders.is_empty() {
            self.show_status(&messages.no_folders, Duration::ZERO);
            self.set_state(SelectorState::NoFolders);
            return false;
        }

        if self.inner.config.warns_for(folders.len()) {
            tracing::debug!(count = folders.len(), "large folder list");
            host.status
                .insert_before(Notice::warning(messages.folder_count_warning.clone()));
        }

        host.select.clear_options();
        for folder in &folders {
            host.select.append_option(SelectOption {
                value: folder.id.clone(),
                label: messages.folder_title(folder),
            });
        }

        self.show_status("", Duration::ZERO);
        self.set_state(SelectorState::Ready);
        true
    }

    /// Select the persisted folder, if any. Failures are only logged.
    async fn restore_selection(&self) {
        let host = &self.inner.host;
        let saved = host
            .store
            .get(TARGET_FOLDER_KEY)
            .await
            .and_then(|items| SelectionState::from_items(&items));

        match saved {
            Ok(state) => {
                if let Some(folder_id) = state.folder_id() {
                    if !self.is_disposed() {
                        host.select.set_value(folder_id);
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to restore saved folder; continuing without a selection");
            }
        }
    }

    fn listen(&self) {
        if self.inner.subscription.get().is_some() {
            return;
        }
        let weak = Rc::downgrade(&self.inner);
        let handler: ChangeHandler = Rc::new(move || {
            let weak = weak.clone();
            async move {
                if let Some(selector) = FolderSelector::from_weak(&weak) {
                    selector.handle_selection_change().await;
                }
            }
            .boxed_local()
        });
        let token = self.inner.host.select.subscribe(handler);
        self.inner.subscription.set(Some(token));
    }

    fn cancel_save_timer(&self) {
        if let Some(handle) = self.inner.save_timer.take() {
            self.inner.host.timer.cancel(handle);
        }
    }

    /// React to a change of the select element.
    ///
    /// Any armed save is cancelled first. Without a debounce delay the
    /// selection is saved before returning; otherwise a timer is armed and
    /// the value is read when it fires. Changes are ignored until a folder
    /// list has been rendered.
    pub async fn handle_selection_change(&self) {
        if !self.state().is_interactive() {
            tracing::debug!(state = ?self.state(), "ignoring change event");
            return;
        }
        self.cancel_save_timer();

        let delay = self.inner.config.debounce_delay();
        if delay.is_zero() {
            self.save_selection().await;
            return;
        }

        self.set_state(SelectorState::PendingSave);
        let weak = Rc::downgrade(&self.inner);
        let handle = self.inner.host.timer.arm(
            delay,
            Box::new(move || {
                async move {
                    if let Some(selector) = FolderSelector::from_weak(&weak) {
                        selector.inner.save_timer.set(None);
                        selector.save_selection().await;
                    }
                }
                .boxed_local()
            }),
        );
        self.inner.save_timer.set(Some(handle));
    }

    /// Persist the current selection.
    ///
    /// An empty or whitespace-only value is never written, so a valid
    /// saved folder cannot be erased by a blank selection.
    pub async fn save_selection(&self) {
        if self.is_disposed() {
            return;
        }
        let host = &self.inner.host;
        let folder_id = host.select.value();
        if folder_id.trim().is_empty() {
            tracing::debug!("empty folder selection, not saving");
            if self.state() == SelectorState::PendingSave {
                self.set_state(SelectorState::Ready);
            }
            return;
        }

        self.set_state(SelectorState::PendingSave);
        let result = host
            .store
            .set(SelectionState::new(folder_id.clone()).to_items())
            .await;
        if self.is_disposed() {
            tracing::debug!(folder_id = %folder_id, "selector disposed during save");
            return;
        }

        match result {
            Ok(()) => {
                tracing::debug!(folder_id = %folder_id, "saved target folder");
                let message = self
                    .inner
                    .config
                    .success_message
                    .as_deref()
                    .unwrap_or(&self.inner.messages.save_success);
                self.show_status(message, self.inner.config.status_duration());
                self.set_state(SelectorState::Saved);
            }
            Err(e) => {
                tracing::error!(error = %e, folder_id = %folder_id, "failed to save target folder");
                self.show_status(&self.inner.messages.storage_save_error, Duration::ZERO);
                self.set_state(SelectorState::SaveFailed);
            }
        }
    }

    /// Show a status message, cleared after `duration` unless it is zero.
    ///
    /// A pending auto-clear from an earlier message is cancelled so it
    /// cannot wipe this one.
    fn show_status(&self, text: &str, duration: Duration) {
        let host = &self.inner.host;
        if let Some(handle) = self.inner.clear_timer.take() {
            host.timer.cancel(handle);
        }
        host.status.set_text(text);

        if duration.is_zero() {
            return;
        }
        let weak = Rc::downgrade(&self.inner);
        let handle = host.timer.arm(
            duration,
            Box::new(move || {
                async move {
                    if let Some(selector) = FolderSelector::from_weak(&weak) {
                        selector.inner.clear_timer.set(None);
                        if selector.is_disposed() {
                            return;
                        }
                        selector.inner.host.status.set_text("");
                        if selector.state() == SelectorState::Saved {
                            selector.set_state(SelectorState::Ready);
                        }
                    }
                }
                .boxed_local()
            }),
        );
        self.inner.clear_timer.set(Some(handle));
    }

    /// Cancel timers and detach the change listener.
    ///
    /// Safe to call repeatedly and at any point, including while
    /// `initialize` is still running. A write already handed to the store
    /// completes, but its result is ignored.
    pub fn destroy(&self) {
        if self.is_disposed() {
            return;
        }
        self.inner.release();
        self.inner.state.set(SelectorState::Disposed);
        tracing::debug!("folder selector disposed");
    }
}
