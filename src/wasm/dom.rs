//! DOM-backed select, status area and timer.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, HtmlElement, HtmlOptionElement, HtmlSelectElement, Window};

use crate::host::{
    ChangeHandler, FolderSelect, Notice, StatusArea, SubscriptionToken, Timer, TimerCallback,
    TimerHandle,
};
use crate::models::SelectOption;

use super::browser::describe;

/// A `<select>` element.
pub struct DomSelect {
    element: HtmlSelectElement,
    listeners: RefCell<HashMap<u64, Closure<dyn FnMut()>>>,
    next_token: Cell<u64>,
}

impl DomSelect {
    pub fn new(element: HtmlSelectElement) -> Self {
        Self {
            element,
            listeners: RefCell::new(HashMap::new()),
            next_token: Cell::new(1),
        }
    }
}

impl FolderSelect for DomSelect {
    fn clear_options(&self) {
        self.element.set_length(0);
    }

    fn append_option(&self, option: SelectOption) {
        let added = HtmlOptionElement::new_with_text_and_value(&option.label, &option.value)
            .and_then(|element| self.element.add_with_html_option_element(&element));
        if let Err(e) = added {
            tracing::warn!(value = %option.value, "Failed to add option: {}", describe(&e));
        }
    }

    fn value(&self) -> String {
        self.element.value()
    }

    fn set_value(&self, value: &str) {
        self.element.set_value(value);
    }

    fn subscribe(&self, handler: ChangeHandler) -> SubscriptionToken {
        let token = self.next_token.get();
        self.next_token.set(token + 1);

        let closure = Closure::<dyn FnMut()>::new(move || {
            wasm_bindgen_futures::spawn_local(handler());
        });
        if let Err(e) = self
            .element
            .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())
        {
            tracing::warn!("Failed to attach change listener: {}", describe(&e));
        }
        self.listeners.borrow_mut().insert(token, closure);
        SubscriptionToken(token)
    }

    fn unsubscribe(&self, token: SubscriptionToken) {
        let Some(closure) = self.listeners.borrow_mut().remove(&token.0) else {
            return;
        };
        if let Err(e) = self
            .element
            .remove_event_listener_with_callback("change", closure.as_ref().unchecked_ref())
        {
            tracing::warn!("Failed to detach change listener: {}", describe(&e));
        }
    }
}

impl Drop for DomSelect {
    fn drop(&mut self) {
        let tokens: Vec<u64> = self.listeners.borrow().keys().copied().collect();
        for token in tokens {
            self.unsubscribe(SubscriptionToken(token));
        }
    }
}

/// The status element. Notices are inserted as siblings just before it.
pub struct DomStatus {
    document: Document,
    element: HtmlElement,
}

impl DomStatus {
    pub fn new(document: Document, element: HtmlElement) -> Self {
        Self { document, element }
    }
}

impl StatusArea for DomStatus {
    fn set_text(&self, text: &str) {
        self.element.set_text_content(Some(text));
    }

    fn insert_before(&self, notice: Notice) {
        let Some(parent) = self.element.parent_node() else {
            tracing::warn!("Status element is detached; dropping notice");
            return;
        };
        let inserted = self.document.create_element("div").and_then(|div| {
            div.set_class_name(notice.kind.class_name());
            div.set_text_content(Some(&notice.text));
            parent.insert_before(&div, Some(&self.element))
        });
        if let Err(e) = inserted {
            tracing::warn!("Failed to insert notice: {}", describe(&e));
        }
    }
}

struct Pending {
    timeout_id: i32,
    _closure: Closure<dyn FnMut()>,
}

/// `window.setTimeout` timers.
pub struct WindowTimer {
    window: Window,
    pending: Rc<RefCell<HashMap<u64, Pending>>>,
    next_handle: Cell<u64>,
}

impl WindowTimer {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            pending: Rc::new(RefCell::new(HashMap::new())),
            next_handle: Cell::new(1),
        }
    }
}

impl Timer for WindowTimer {
    fn arm(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let handle = self.next_handle.get();
        self.next_handle.set(handle + 1);

        let pending = Rc::downgrade(&self.pending);
        let mut callback = Some(callback);
        let closure = Closure::<dyn FnMut()>::new(move || {
            let Some(callback) = callback.take() else {
                return;
            };
            let pending = pending.clone();
            wasm_bindgen_futures::spawn_local(async move {
                // The closure is still on the stack here; free it from a task.
                if let Some(pending) = pending.upgrade() {
                    pending.borrow_mut().remove(&handle);
                }
                callback().await;
            });
        });

        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                millis,
            ) {
            Ok(timeout_id) => {
                self.pending.borrow_mut().insert(
                    handle,
                    Pending {
                        timeout_id,
                        _closure: closure,
                    },
                );
            }
            Err(e) => tracing::error!("setTimeout failed: {}", describe(&e)),
        }
        TimerHandle(handle)
    }

    fn cancel(&self, handle: TimerHandle) {
        if let Some(pending) = self.pending.borrow_mut().remove(&handle.0) {
            self.window.clear_timeout_with_handle(pending.timeout_id);
        }
    }
}

impl Drop for WindowTimer {
    fn drop(&mut self) {
        for (_, pending) in self.pending.borrow_mut().drain() {
            self.window.clear_timeout_with_handle(pending.timeout_id);
        }
    }
}
