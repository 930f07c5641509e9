//! Host side of the interaction: the ready callback and event subscribers.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use math_entry_browser::InteractionHost;

pub const RESPONSE_CHANGE: &str = "responseChange";
pub const CONFIG_CHANGE: &str = "configChange";
pub const ADD_GAP: &str = "addGap";

type Subscribers = Rc<RefCell<Vec<(String, Function)>>>;

/// Forwards interaction notifications to JavaScript.
pub struct JsHost {
    ready: Option<Function>,
    subscribers: Subscribers,
}

impl JsHost {
    pub fn new(ready: Option<Function>) -> Self {
        Self {
            ready,
            subscribers: Subscribers::default(),
        }
    }

    pub fn on(&self, event: &str, callback: Function) {
        self.subscribers
            .borrow_mut()
            .push((event.to_string(), callback));
    }

    /// Drop every subscriber of `event`.
    pub fn off(&self, event: &str) {
        self.subscribers.borrow_mut().retain(|(name, _)| name != event);
    }
}

fn emit(subscribers: &Subscribers, event: &str, args: &Array) {
    // Snapshot first: a callback may subscribe or unsubscribe.
    let callbacks: Vec<Function> = subscribers
        .borrow()
        .iter()
        .filter(|(name, _)| name == event)
        .map(|(_, callback)| callback.clone())
        .collect();

    for callback in callbacks {
        if let Err(e) = callback.apply(&JsValue::NULL, args) {
            tracing::warn!(event, error = ?e, "event subscriber threw");
        }
    }
}

impl InteractionHost for JsHost {
    fn notify_ready(&self, id: &str, type_identifier: &str) {
        tracing::debug!(id, type_identifier, "interaction ready");
        let Some(ready) = &self.ready else {
            return;
        };
        if let Err(e) = ready.call2(
            &JsValue::NULL,
            &JsValue::from_str(id),
            &JsValue::from_str(type_identifier),
        ) {
            tracing::warn!(error = ?e, "ready callback threw");
        }
    }

    /// Subscribers run on a microtask, so they can read the response back
    /// while the edit that caused the change is still in progress.
    fn response_changed(&self, latex: &str) {
        let subscribers = Rc::clone(&self.subscribers);
        let args = Array::of1(&JsValue::from_str(latex));
        let task = Closure::once_into_js(move || emit(&subscribers, RESPONSE_CHANGE, &args));

        match web_sys::window() {
            Some(window) => window.queue_microtask(task.unchecked_ref()),
            None => tracing::warn!("no window, dropping responseChange"),
        }
    }
}
