//! DOM surface of a mounted interaction.
//!
//! Owns the toolbar, input, prompt and placeholder elements found in the
//! interaction markup, plus every DOM listener the interaction attaches.
//! Listeners are `gloo_events::EventListener`s; dropping them removes them,
//! so detaching is just clearing the list.

use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlElement, KeyboardEvent};

use math_entry_core::{
    CommandSink, InteractionCommand, InteractionSurface, ListenerSet, MathEntryError,
    ToolInsertion, Toolbar,
};

use crate::toolbar::{TOOL_CLASS, toolbar_html};
use crate::{
    AUTHORING_CONTEXT_CLASS, EDITABLE_FIELD_SELECTOR, INPUT_SELECTOR, PLACEHOLDER_CLASS,
    PROMPT_SELECTOR, TOOLBAR_SELECTOR,
};

/// Renders the rich content of the prompt element in place.
pub type PromptRenderer = Rc<dyn Fn(&HtmlElement)>;

pub struct DomSurface {
    container: Element,
    toolbar: HtmlElement,
    input: HtmlElement,
    prompt: Option<HtmlElement>,
    prompt_renderer: Option<PromptRenderer>,
    placeholder: Option<HtmlElement>,
    listeners: Vec<EventListener>,
}

impl DomSurface {
    /// Bind to the interaction markup rooted at `container`.
    ///
    /// Fails if the toolbar or input element is missing. The prompt is
    /// optional.
    pub fn new(container: &Element) -> Result<Self, MathEntryError> {
        Ok(Self {
            container: container.clone(),
            toolbar: find(container, TOOLBAR_SELECTOR)?,
            input: find(container, INPUT_SELECTOR)?,
            prompt: find(container, PROMPT_SELECTOR).ok(),
            prompt_renderer: None,
            placeholder: None,
            listeners: Vec::new(),
        })
    }

    /// Use `renderer` for the prompt's rich content.
    pub fn with_prompt_renderer(mut self, renderer: PromptRenderer) -> Self {
        self.prompt_renderer = Some(renderer);
        self
    }

    /// The element MathQuill is mounted on.
    pub fn input(&self) -> &HtmlElement {
        &self.input
    }

    pub fn placeholder(&self) -> Option<&HtmlElement> {
        self.placeholder.as_ref()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Create the placeholder right after the toolbar on first use.
    fn ensure_placeholder(&mut self) -> Option<HtmlElement> {
        if let Some(placeholder) = &self.placeholder {
            return Some(placeholder.clone());
        }

        let document = self.container.owner_document()?;
        let placeholder = match document.create_element("div") {
            Ok(element) => element.unchecked_into::<HtmlElement>(),
            Err(e) => {
                tracing::warn!(error = ?e, "failed to create placeholder");
                return None;
            }
        };
        placeholder.set_class_name(PLACEHOLDER_CLASS);
        if let Err(e) = self.toolbar.after_with_node_1(&placeholder) {
            tracing::warn!(error = ?e, "failed to insert placeholder");
            return None;
        }

        self.placeholder = Some(placeholder.clone());
        Some(placeholder)
    }

    fn listen_toolbar(&mut self, sink: CommandSink) {
        let options = EventListenerOptions::enable_prevent_default();
        let listener =
            EventListener::new_with_options(&self.toolbar, "mousedown", options, move |event| {
                // Keep focus in the math field.
                event.stop_propagation();
                event.prevent_default();
                if let Some(insertion) = insertion_from_event(event) {
                    sink(InteractionCommand::ToolPressed(insertion));
                }
            });
        self.listeners.push(listener);
    }

    fn listen_input(&mut self, sink: CommandSink) {
        let listener = EventListener::new(&self.input, "keypress", move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if event.key() == "Enter" {
                sink(InteractionCommand::NewLine);
            }
        });
        self.listeners.push(listener);
    }

    fn listen_inner_fields(&mut self, count: usize, sink: &CommandSink) {
        let fields = match self.input.query_selector_all(EDITABLE_FIELD_SELECTOR) {
            Ok(fields) => fields,
            Err(e) => {
                tracing::warn!(error = ?e, "failed to query inner fields");
                return;
            }
        };

        let found = fields.length() as usize;
        if found != count {
            tracing::warn!(found, expected = count, "inner field count mismatch");
        }

        for index in 0..found.min(count) {
            let Some(field) = fields.item(index as u32) else {
                continue;
            };
            for event_type in ["click", "keyup"] {
                let sink = sink.clone();
                self.listeners.push(EventListener::new(&field, event_type, move |_| {
                    sink(InteractionCommand::InnerFieldActivated(index));
                }));
            }
        }
    }
}

impl InteractionSurface for DomSurface {
    fn is_authoring_context(&self) -> bool {
        self.container
            .class_list()
            .contains(AUTHORING_CONTEXT_CLASS)
    }

    fn render_prompt(&mut self) {
        match (&self.prompt, &self.prompt_renderer) {
            (Some(prompt), Some(renderer)) => renderer(prompt),
            (None, _) => tracing::trace!("no prompt to render"),
            (Some(_), None) => tracing::debug!("no prompt renderer, prompt left as is"),
        }
    }

    fn render_toolbar(&mut self, toolbar: &Toolbar) {
        self.toolbar.set_inner_html(&toolbar_html(toolbar));
    }

    fn toggle_placeholder(&mut self, visible: bool) {
        let placeholder = self.ensure_placeholder();
        if visible {
            set_display(&self.input, Some("none"));
            if let Some(placeholder) = placeholder {
                set_display(&placeholder, None);
            }
        } else {
            set_display(&self.input, Some("block"));
            if let Some(placeholder) = placeholder {
                set_display(&placeholder, Some("none"));
            }
        }
    }

    fn attach_listeners(&mut self, listeners: ListenerSet, sink: CommandSink) {
        self.detach_listeners();
        if listeners.toolbar {
            self.listen_toolbar(sink.clone());
        }
        if listeners.input {
            self.listen_input(sink.clone());
        }
        if listeners.inner_fields > 0 {
            self.listen_inner_fields(listeners.inner_fields, &sink);
        }
        tracing::debug!(count = self.listeners.len(), "attached listeners");
    }

    fn detach_listeners(&mut self) {
        self.listeners.clear();
    }
}

fn find(container: &Element, selector: &str) -> Result<HtmlElement, MathEntryError> {
    container
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        .ok_or_else(|| MathEntryError::Markup(format!("missing {selector}")))
}

/// `None` clears the inline display so the stylesheet applies.
fn set_display(element: &HtmlElement, display: Option<&str>) {
    let style = element.style();
    let result = match display {
        Some(value) => style.set_property("display", value),
        None => style.remove_property("display").map(|_| ()),
    };
    if let Err(e) = result {
        tracing::warn!(error = ?e, "failed to set display");
    }
}

/// Read the tool under the event target, if any.
fn insertion_from_event(event: &Event) -> Option<ToolInsertion> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let tool = target.closest(&format!(".{TOOL_CLASS}")).ok()??;
    ToolInsertion::from_attributes(
        &tool.get_attribute("data-fn")?,
        &tool.get_attribute("data-latex")?,
    )
}
