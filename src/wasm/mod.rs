//! Browser bindings for the extension pages.
//!
//! Built with `wasm-pack build --target web --features wasm`. The options
//! page and popup mount a folder selector on their `<select>` element; the
//! background service worker calls `restoreOnStartup` from its
//! `runtime.onStartup` listener.
//!
//! ```javascript
//! import init, { mountFolderSelector } from './pinned_tabs.js';
//!
//! await init();
//! const selector = mountFolderSelector('folderSelect', 'status', { debounceDelayMs: 300 });
//! window.addEventListener('unload', () => selector.destroy());
//! ```

mod browser;
mod console;
mod dom;

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, HtmlSelectElement};

use crate::config::ControllerConfig;
use crate::host::Host;
use crate::messages::Messages;
use crate::selector::FolderSelector;
use crate::startup;

pub use browser::{BrowserBookmarks, BrowserStorage, BrowserTabs};
pub use dom::{DomSelect, DomStatus, WindowTimer};

/// Version information for the WASM module
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convert Rust panics into readable console errors and send `tracing`
/// events to the console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    console::init_console_logger();
}

#[wasm_bindgen]
pub fn version() -> String {
    VERSION.to_string()
}

fn js_error(e: crate::Error) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}

fn is_absent(value: &JsValue) -> bool {
    value.is_undefined() || value.is_null()
}

/// A mounted folder selector.
#[wasm_bindgen]
pub struct FolderSelectorHandle {
    selector: FolderSelector,
}

#[wasm_bindgen]
impl FolderSelectorHandle {
    /// Detach the listener and cancel pending timers. Safe to call twice.
    pub fn destroy(&self) {
        self.selector.destroy();
    }

    /// Current controller state, e.g. `"Ready"` or `"PendingSave"`.
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        format!("{:?}", self.selector.state())
    }
}

/// Mount a folder selector and start loading folders.
///
/// Throws when either element id does not resolve or `options` is not a
/// valid config. `messages` may override any user-facing text.
#[wasm_bindgen(js_name = mountFolderSelector)]
pub fn mount_folder_selector(
    select_id: &str,
    status_id: &str,
    options: JsValue,
    messages: JsValue,
) -> Result<FolderSelectorHandle, JsValue> {
    let config: ControllerConfig = if is_absent(&options) {
        ControllerConfig::default()
    } else {
        browser::from_js(options).map_err(js_error)?
    };
    config
        .validate()
        .map_err(|e| js_error(crate::Error::InvalidConfig(e)))?;
    let messages: Messages = if is_absent(&messages) {
        Messages::default()
    } else {
        browser::from_js(messages).map_err(js_error)?
    };

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let select: HtmlSelectElement = document
        .get_element_by_id(select_id)
        .ok_or_else(|| JsValue::from_str(&format!("element #{} not found", select_id)))?
        .dyn_into()
        .map_err(|_| JsValue::from_str(&format!("#{} is not a <select>", select_id)))?;
    let status: HtmlElement = document
        .get_element_by_id(status_id)
        .ok_or_else(|| JsValue::from_str(&format!("element #{} not found", status_id)))?
        .dyn_into()
        .map_err(|_| JsValue::from_str(&format!("#{} is not an HTML element", status_id)))?;

    let host = Host {
        bookmarks: Rc::new(BrowserBookmarks),
        store: Rc::new(BrowserStorage),
        select: Rc::new(DomSelect::new(select)),
        status: Rc::new(DomStatus::new(document, status)),
        timer: Rc::new(WindowTimer::new(window)),
    };
    let selector = FolderSelector::with_messages(host, config, messages);

    let initializing = selector.clone();
    wasm_bindgen_futures::spawn_local(async move {
        initializing.initialize().await;
    });

    Ok(FolderSelectorHandle { selector })
}

/// Reopen the saved folder as pinned tabs; resolves to the restore report.
#[wasm_bindgen(js_name = restoreOnStartup)]
pub async fn restore_on_startup() -> Result<JsValue, JsValue> {
    let report = startup::restore_pinned_tabs(&BrowserStorage, &BrowserBookmarks, &BrowserTabs)
        .await
        .map_err(js_error)?;
    browser::to_js(&report).map_err(js_error)
}
