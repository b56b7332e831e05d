//! `chrome.*` extension APIs reached through js-sys.
//!
//! Every call resolves the API object at call time
//! (`globalThis.chrome.bookmarks.getTree`, ...), invokes it and awaits
//! the returned promise. Values cross the boundary through
//! `serde-wasm-bindgen` so the Rust side can reuse the serde models.

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use js_sys::{Array, Function, JSON, Promise, Reflect};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::host::{BookmarkSource, KeyValueStore, TabHost};
use crate::models::{BookmarkChild, BookmarkNode};
use crate::{Error, Result};

/// Describe a thrown JS value.
pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(message) = Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
    {
        return message;
    }
    JSON::stringify(value)
        .map(String::from)
        .unwrap_or_else(|_| "unknown JavaScript error".to_string())
}

pub(crate) fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T> {
    serde_wasm_bindgen::from_value(value).map_err(|e| Error::Other(e.to_string()))
}

/// Serialize into plain JS objects (not `Map`s), as the extension APIs
/// expect.
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| Error::Other(e.to_string()))
}

/// The extension API object: `browser` where the WebExtension namespace
/// exists (Firefox, polyfilled pages), `chrome` otherwise.
fn namespace() -> std::result::Result<JsValue, String> {
    let global = js_sys::global();
    for name in ["browser", "chrome"] {
        let value = Reflect::get(&global, &JsValue::from_str(name)).map_err(|e| describe(&e))?;
        if !value.is_undefined() && !value.is_null() {
            return Ok(value);
        }
    }
    Err("extension APIs are not available".to_string())
}

/// Call `chrome.<path>(...args)` and await the promise it returns.
async fn call(path: &[&str], args: Array) -> std::result::Result<JsValue, String> {
    let Some((method, object_path)) = path.split_last() else {
        return Err("empty API path".to_string());
    };

    let mut target = namespace()?;
    for name in object_path {
        if target.is_undefined() || target.is_null() {
            break;
        }
        target = Reflect::get(&target, &JsValue::from_str(name)).map_err(|e| describe(&e))?;
    }
    if target.is_undefined() || target.is_null() {
        return Err(format!("chrome.{} is not available", object_path.join(".")));
    }

    let function: Function = Reflect::get(&target, &JsValue::from_str(method))
        .map_err(|e| describe(&e))?
        .dyn_into()
        .map_err(|_| format!("chrome.{} is not a function", path.join(".")))?;
    let returned = function.apply(&target, &args).map_err(|e| describe(&e))?;
    let promise: Promise = returned
        .dyn_into()
        .map_err(|_| format!("chrome.{} did not return a promise", path.join(".")))?;
    JsFuture::from(promise).await.map_err(|e| describe(&e))
}

/// `chrome.bookmarks`
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserBookmarks;

impl BrowserBookmarks {
    async fn tree() -> Result<Vec<BookmarkNode>> {
        let value = call(&["bookmarks", "getTree"], Array::new())
            .await
            .map_err(Error::Bookmarks)?;
        from_js(value)
    }

    async fn children(folder_id: String) -> Result<Vec<BookmarkChild>> {
        let args = Array::of1(&JsValue::from_str(&folder_id));
        let value = call(&["bookmarks", "getChildren"], args)
            .await
            .map_err(Error::Bookmarks)?;
        from_js(value)
    }
}

impl BookmarkSource for BrowserBookmarks {
    fn get_tree(&self) -> LocalBoxFuture<'_, Result<Vec<BookmarkNode>>> {
        Self::tree().boxed_local()
    }

    fn get_children<'a>(
        &'a self,
        folder_id: &'a str,
    ) -> LocalBoxFuture<'a, Result<Vec<BookmarkChild>>> {
        Self::children(folder_id.to_string()).boxed_local()
    }
}

/// `chrome.storage.local`
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStorage;

impl BrowserStorage {
    async fn read(key: String) -> Result<Map<String, Value>> {
        let args = Array::of1(&JsValue::from_str(&key));
        let value = call(&["storage", "local", "get"], args)
            .await
            .map_err(Error::Storage)?;
        from_js(value)
    }

    async fn write(items: Map<String, Value>) -> Result<()> {
        let args = Array::of1(&to_js(&items)?);
        call(&["storage", "local", "set"], args)
            .await
            .map_err(Error::Storage)?;
        Ok(())
    }
}

impl KeyValueStore for BrowserStorage {
    fn get<'a>(&'a self, key: &'a str) -> LocalBoxFuture<'a, Result<Map<String, Value>>> {
        Self::read(key.to_string()).boxed_local()
    }

    fn set(&self, items: Map<String, Value>) -> LocalBoxFuture<'_, Result<()>> {
        Self::write(items).boxed_local()
    }
}

#[derive(Debug, Deserialize)]
struct TabInfo {
    id: Option<i64>,
}

#[derive(Serialize)]
struct PinnedQuery {
    pinned: bool,
}

#[derive(Serialize)]
struct CreateProperties<'a> {
    url: &'a str,
    pinned: bool,
}

/// `chrome.tabs`
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserTabs;

impl BrowserTabs {
    async fn pinned() -> Result<Vec<i64>> {
        let query = to_js(&PinnedQuery { pinned: true })?;
        let value = call(&["tabs", "query"], Array::of1(&query))
            .await
            .map_err(Error::Tabs)?;
        let tabs: Vec<TabInfo> = from_js(value)?;
        Ok(tabs.into_iter().filter_map(|t| t.id).collect())
    }

    async fn close(tab_id: i64) -> Result<()> {
        let args = Array::of1(&JsValue::from_f64(tab_id as f64));
        call(&["tabs", "remove"], args).await.map_err(Error::Tabs)?;
        Ok(())
    }

    async fn open_pinned(url: String) -> Result<()> {
        let properties = to_js(&CreateProperties {
            url: &url,
            pinned: true,
        })?;
        call(&["tabs", "create"], Array::of1(&properties))
            .await
            .map_err(Error::Tabs)?;
        Ok(())
    }
}

impl TabHost for BrowserTabs {
    fn query_pinned(&self) -> LocalBoxFuture<'_, Result<Vec<i64>>> {
        Self::pinned().boxed_local()
    }

    fn remove(&self, tab_id: i64) -> LocalBoxFuture<'_, Result<()>> {
        Self::close(tab_id).boxed_local()
    }

    fn create_pinned<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, Result<()>> {
        Self::open_pinned(url.to_string()).boxed_local()
    }
}
