//! JsMathEntryInteraction - the interaction wrapper for JavaScript.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function, Object, Reflect};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement};

use math_entry_browser::{
    DomSurface, INTERACTION_VERSION, InteractionCommand, InteractionHost, MathEntryError,
    MathEntryInteraction, MathQuillBackend, PromptRenderer, ResponseValue, SharedInteraction,
    TYPE_IDENTIFIER, command_sink,
};

use crate::host::{ADD_GAP, CONFIG_CHANGE, JsHost};
use crate::types::JsResponse;

type DomInteraction = MathEntryInteraction<MathQuillBackend, DomSurface>;

/// A math entry interaction bound to one container element.
///
/// No method throws: failures are logged and the call degrades to a no-op
/// (or an empty response).
#[wasm_bindgen(js_name = MathEntryInteraction)]
pub struct JsMathEntryInteraction {
    host: Rc<JsHost>,
    render_prompt: Option<Function>,
    inner: Option<SharedInteraction<MathQuillBackend, DomSurface>>,
}

#[wasm_bindgen(js_class = MathEntryInteraction)]
impl JsMathEntryInteraction {
    /// Create an interaction.
    ///
    /// `onReady(id, typeIdentifier)` is called once the first render is done.
    /// `renderPrompt(element)` renders the rich content of the `.prompt`
    /// element, once per `initialize`.
    #[wasm_bindgen(constructor)]
    pub fn new(on_ready: Option<Function>, render_prompt: Option<Function>) -> Self {
        Self {
            host: Rc::new(JsHost::new(on_ready)),
            render_prompt,
            inner: None,
        }
    }

    #[wasm_bindgen(js_name = getTypeIdentifier)]
    pub fn get_type_identifier(&self) -> String {
        TYPE_IDENTIFIER.to_string()
    }

    #[wasm_bindgen(js_name = getVersion)]
    pub fn get_version(&self) -> String {
        INTERACTION_VERSION.to_string()
    }

    /// Bind to `dom`, render with `config`, and notify readiness.
    ///
    /// Initializing again first destroys the previous binding.
    pub fn initialize(&mut self, id: &str, dom: Element, config: JsValue) {
        if self.inner.is_some() {
            self.destroy();
        }

        let mut surface = match DomSurface::new(&dom) {
            Ok(surface) => surface,
            Err(e) => {
                tracing::error!(id, error = %e, "cannot initialize math entry interaction");
                return;
            }
        };
        if let Some(render_prompt) = &self.render_prompt {
            surface = surface.with_prompt_renderer(prompt_renderer(render_prompt.clone()));
        }
        let backend = MathQuillBackend::new(surface.input().clone());
        let host: Rc<dyn InteractionHost> = self.host.clone();
        let shared = Rc::new(RefCell::new(MathEntryInteraction::new(
            backend, surface, host,
        )));

        let config = decode(config, MathEntryError::InvalidConfig);
        let sink = command_sink(&shared);
        shared.borrow_mut().initialize(id, &config, sink);
        self.inner = Some(shared);
    }

    /// Re-render with a new configuration.
    pub fn render(&self, config: JsValue) {
        let config = decode(config, MathEntryError::InvalidConfig);
        self.with_interaction_mut(|interaction| interaction.render(&config));
    }

    /// The normalized configuration in use.
    #[wasm_bindgen(js_name = getConfig)]
    pub fn get_config(&self) -> JsValue {
        self.with_interaction(|interaction| to_js(interaction.config()))
            .unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(js_name = setResponse)]
    pub fn set_response(&self, response: JsValue) {
        let response = decode(response, MathEntryError::InvalidResponse);
        self.with_interaction(|interaction| interaction.set_response(&response));
    }

    #[wasm_bindgen(js_name = getResponse)]
    pub fn get_response(&self) -> JsResponse {
        self.with_interaction(|interaction| interaction.get_response())
            .unwrap_or_else(|| ResponseValue::base(""))
            .into()
    }

    #[wasm_bindgen(js_name = resetResponse)]
    pub fn reset_response(&self) {
        self.with_interaction(|interaction| interaction.reset_response());
    }

    #[wasm_bindgen(js_name = setSerializedState)]
    pub fn set_serialized_state(&self, state: JsValue) {
        let state = decode(state, MathEntryError::InvalidResponse);
        self.with_interaction(|interaction| interaction.set_serialized_state(&state));
    }

    #[wasm_bindgen(js_name = getSerializedState)]
    pub fn get_serialized_state(&self) -> JsResponse {
        self.with_interaction(|interaction| interaction.get_serialized_state())
            .unwrap_or_else(|| ResponseValue::base(""))
            .into()
    }

    /// Undo the render, leaving only the initial markup.
    pub fn destroy(&mut self) {
        if let Some(shared) = self.inner.take() {
            match shared.try_borrow_mut() {
                Ok(mut interaction) => interaction.destroy(),
                Err(_) => tracing::warn!("destroy called from inside the interaction"),
            }
        }
    }

    /// Subscribe to an interaction event (`responseChange`).
    pub fn on(&self, event: &str, callback: Function) {
        self.host.on(event, callback);
    }

    /// Drop every subscriber of `event`.
    pub fn off(&self, event: &str) {
        self.host.off(event);
    }

    /// Send a host event to the interaction: `configChange` with the new
    /// configuration, or `addGap`.
    pub fn trigger(&self, event: &str, args: JsValue) {
        let command = match event {
            CONFIG_CHANGE => InteractionCommand::ConfigChange(decode(
                first_arg(args),
                MathEntryError::InvalidConfig,
            )),
            ADD_GAP => InteractionCommand::AddGap,
            _ => {
                tracing::debug!(event, "ignoring unknown event");
                return;
            }
        };
        match &self.inner {
            Some(shared) => command_sink(shared)(command),
            None => tracing::warn!(event, "event before initialize"),
        }
    }
}

impl JsMathEntryInteraction {
    fn with_interaction<R>(&self, f: impl FnOnce(&DomInteraction) -> R) -> Option<R> {
        let Some(shared) = &self.inner else {
            tracing::debug!("interaction not initialized");
            return None;
        };
        match shared.try_borrow() {
            Ok(interaction) => Some(f(&interaction)),
            Err(_) => {
                tracing::warn!("interaction busy, ignoring re-entrant call");
                None
            }
        }
    }

    fn with_interaction_mut<R>(&self, f: impl FnOnce(&mut DomInteraction) -> R) -> Option<R> {
        let Some(shared) = &self.inner else {
            tracing::debug!("interaction not initialized");
            return None;
        };
        match shared.try_borrow_mut() {
            Ok(mut interaction) => Some(f(&mut interaction)),
            Err(_) => {
                tracing::warn!("interaction busy, ignoring re-entrant call");
                None
            }
        }
    }
}

/// Event managers pass arguments as an array; accept a bare value too.
fn first_arg(args: JsValue) -> JsValue {
    if Array::is_array(&args) {
        Array::from(&args).get(0)
    } else {
        args
    }
}

fn prompt_renderer(callback: Function) -> PromptRenderer {
    Rc::new(move |prompt: &HtmlElement| {
        if let Err(e) = callback.call1(&JsValue::NULL, prompt) {
            tracing::warn!(error = ?e, "prompt renderer threw");
        }
    })
}

/// Decode an arbitrary JS value; undecodable input becomes `null`.
///
/// Properties set to `undefined` are dropped, so they read as absent.
fn decode(value: JsValue, error: fn(String) -> MathEntryError) -> Value {
    if value.is_undefined() {
        return Value::Null;
    }
    let value = match without_undefined(value) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = ?e, "could not copy value from JavaScript");
            return Value::Null;
        }
    };
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| error(e.to_string()))
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not decode value from JavaScript");
            Value::Null
        })
}

/// Copy plain objects, recursively, leaving out `undefined` properties.
fn without_undefined(value: JsValue) -> Result<JsValue, JsValue> {
    if !value.is_object() || Array::is_array(&value) {
        return Ok(value);
    }

    let copy = Object::new();
    for entry in Object::entries(value.unchecked_ref::<Object>()).iter() {
        let entry = Array::from(&entry);
        let item = entry.get(1);
        if item.is_undefined() {
            continue;
        }
        Reflect::set(&copy, &entry.get(0), &without_undefined(item)?)?;
    }
    Ok(copy.into())
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not encode value for JavaScript");
        JsValue::NULL
    })
}
