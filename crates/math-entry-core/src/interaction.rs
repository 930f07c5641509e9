//! Interaction Controller.
//!
//! `MathEntryInteraction` implements the host lifecycle contract
//! (initialize, render, response get/set/reset, serialized state, destroy)
//! and wires configuration, the rendering mode, the field adapter, the
//! toolbar and the active-field tracker together.
//!
//! `render` is re-entrant: every host configuration change calls it again.
//! Listeners are dropped and re-attached on each pass, and an existing
//! editable field is reconfigured rather than recreated.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use crate::adapter::MathEditingAdapter;
use crate::command::{CommandSink, InteractionCommand};
use crate::config::InteractionConfig;
use crate::gap;
use crate::mode::RenderMode;
use crate::platform::{
    FieldConfig, InteractionHost, InteractionSurface, ListenerSet, MathBackend, MathField,
};
use crate::response::{self, ResponseValue};
use crate::tools::{InsertKind, ToolInsertion, Toolbar};
use crate::tracker::ActiveFieldTracker;

/// Identifier of this interaction kind.
pub const TYPE_IDENTIFIER: &str = "mathEntryInteraction";

/// Registered interaction version.
pub const INTERACTION_VERSION: &str = "2.0.1";

/// Written on Enter when new lines are allowed; styled as a block break.
pub const NEW_LINE_LATEX: &str = r"\textcolor{newline}{ }";

pub struct MathEntryInteraction<B: MathBackend, S: InteractionSurface> {
    id: String,
    adapter: MathEditingAdapter<B>,
    surface: S,
    host: Rc<dyn InteractionHost>,
    config: InteractionConfig,
    authoring: Option<bool>,
    mode: Option<RenderMode>,
    tracker: ActiveFieldTracker,
    sink: Option<CommandSink>,
}

impl<B: MathBackend, S: InteractionSurface> MathEntryInteraction<B, S> {
    pub fn new(backend: B, surface: S, host: Rc<dyn InteractionHost>) -> Self {
        Self {
            id: String::new(),
            adapter: MathEditingAdapter::new(backend),
            surface,
            host,
            config: InteractionConfig::default(),
            authoring: None,
            mode: None,
            tracker: ActiveFieldTracker::default(),
            sink: None,
        }
    }

    pub fn type_identifier(&self) -> &'static str {
        TYPE_IDENTIFIER
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Mode selected by the last render.
    pub fn mode(&self) -> Option<RenderMode> {
        self.mode
    }

    pub fn adapter(&self) -> &MathEditingAdapter<B> {
        &self.adapter
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// First render, tell the host the interaction is ready, then render the
    /// prompt content once.
    ///
    /// `sink` is where surface listeners send DOM events; it normally feeds
    /// back into `handle` on this same interaction (see `command_sink`).
    pub fn initialize(&mut self, id: &str, config: &Value, sink: CommandSink) {
        tracing::debug!(id, version = INTERACTION_VERSION, "initializing math entry interaction");
        self.id = id.to_string();
        self.sink = Some(sink);
        self.render(config);
        self.host.notify_ready(&self.id, TYPE_IDENTIFIER);
        self.surface.render_prompt();
    }

    /// Whether we render inside the authoring tool. Asked once, then cached.
    pub fn is_authoring_context(&mut self) -> bool {
        *self
            .authoring
            .get_or_insert_with(|| self.surface.is_authoring_context())
    }

    pub fn in_gap_mode(&self) -> bool {
        self.config.use_gap_expression
    }

    /// Normalize `config`, select the rendering mode, and run it.
    pub fn render(&mut self, config: &Value) {
        self.config = InteractionConfig::from_value(config);
        let mode = RenderMode::select(self.config.use_gap_expression, self.is_authoring_context());
        tracing::debug!(id = %self.id, %mode, "rendering math entry interaction");

        self.surface.detach_listeners();
        self.surface.render_toolbar(&Toolbar::build(&self.config.tools_status));
        self.surface.toggle_placeholder(false);
        self.mode = Some(mode);

        let listeners = match mode {
            RenderMode::AuthoringGapEditor => self.render_authoring_gap_editor(),
            RenderMode::AuthoringPlaceholder => self.render_authoring_placeholder(),
            RenderMode::RuntimeGapStatic => self.render_runtime_gap_static(),
            RenderMode::RuntimePlainEditor => self.render_runtime_plain_editor(),
        };

        if listeners.is_empty() {
            return;
        }
        match &self.sink {
            Some(sink) => self.surface.attach_listeners(listeners, sink.clone()),
            None => tracing::warn!("render before initialize, listeners not attached"),
        }
    }

    fn render_authoring_gap_editor(&mut self) -> ListenerSet {
        self.tracker.clear();
        let field_config = self.field_config();
        if let Err(e) = self.adapter.create_or_reconfigure_editable(&field_config) {
            tracing::error!(error = %e, "failed to create gap expression editor");
            return ListenerSet::default();
        }
        self.adapter.set_single_latex(&self.config.gap_expression);

        ListenerSet {
            toolbar: true,
            input: true,
            inner_fields: 0,
        }
    }

    fn render_authoring_placeholder(&mut self) -> ListenerSet {
        self.tracker.clear();
        self.surface.toggle_placeholder(true);
        ListenerSet::default()
    }

    fn render_runtime_gap_static(&mut self) -> ListenerSet {
        let field_config = self.field_config();
        match self
            .adapter
            .create_static(&self.config.gap_expression, &field_config)
        {
            Ok(count) => {
                self.tracker.reset(count);
                ListenerSet {
                    toolbar: true,
                    input: false,
                    inner_fields: count,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to create static gap field");
                self.tracker.clear();
                ListenerSet::default()
            }
        }
    }

    fn render_runtime_plain_editor(&mut self) -> ListenerSet {
        self.tracker.clear();
        let field_config = self.field_config();
        if let Err(e) = self.adapter.create_or_reconfigure_editable(&field_config) {
            tracing::error!(error = %e, "failed to create math field");
            return ListenerSet::default();
        }

        ListenerSet {
            toolbar: true,
            input: true,
            inner_fields: 0,
        }
    }

    /// Settings shared by every field this interaction creates.
    fn field_config(&self) -> FieldConfig {
        let host = Rc::clone(&self.host);
        FieldConfig {
            space_behaves_like_tab: self.config.space_behaves_like_tab(),
            on_edit: Some(Rc::new(move |latex: &str| host.response_changed(latex))),
        }
    }

    /// Dispatch a command from the host or the surface.
    pub fn handle(&mut self, command: InteractionCommand) {
        tracing::trace!(command = command.name(), "handling command");
        match command {
            InteractionCommand::ConfigChange(config) => self.render(&config),
            InteractionCommand::AddGap => {
                self.insert_latex(&ToolInsertion::new(InsertKind::Write, gap::AUTHORING_GAP));
            }
            InteractionCommand::ToolPressed(insertion) => {
                self.insert_latex(&insertion);
            }
            InteractionCommand::NewLine => self.insert_new_line(),
            InteractionCommand::InnerFieldActivated(index) => self.tracker.record(index),
        }
    }

    /// The field toolbar insertions currently target.
    pub fn active_field(&self) -> Option<&B::Field> {
        match self.mode? {
            RenderMode::RuntimeGapStatic => self
                .tracker
                .active_index()
                .and_then(|index| self.adapter.inner_field(index)),
            RenderMode::AuthoringPlaceholder => None,
            RenderMode::AuthoringGapEditor | RenderMode::RuntimePlainEditor => {
                self.adapter.single()
            }
        }
    }

    /// Apply an insertion to the active field and give it focus back.
    ///
    /// Returns false when there is no active field.
    pub fn insert_latex(&self, insertion: &ToolInsertion) -> bool {
        let Some(field) = self.active_field() else {
            tracing::warn!(latex = %insertion.latex, "no active field for insertion");
            return false;
        };
        match insertion.kind {
            InsertKind::Cmd => field.cmd(&insertion.latex),
            InsertKind::Write => field.write(&insertion.latex),
        }
        field.focus();
        true
    }

    fn insert_new_line(&self) {
        if !self.config.allow_new_line {
            return;
        }
        if let Some(field) = self.adapter.single() {
            field.write(NEW_LINE_LATEX);
        }
    }

    // === Response ===

    pub fn get_response(&self) -> ResponseValue {
        response::encode(&self.adapter, self.in_gap_mode())
    }

    /// Apply a typed response.
    pub fn set_response_value(&self, value: &ResponseValue) {
        response::apply(&self.adapter, self.in_gap_mode(), value);
    }

    /// Apply a response in its JSON form.
    ///
    /// Only the envelope of the current mode is read; payloads without it
    /// are ignored.
    pub fn set_response(&self, value: &Value) {
        match ResponseValue::from_value(value, self.in_gap_mode()) {
            Ok(response) => self.set_response_value(&response),
            Err(e) => tracing::warn!(error = %e, "ignoring malformed response"),
        }
    }

    pub fn reset_response(&self) {
        response::clear(&self.adapter, self.in_gap_mode());
    }

    /// Serialized state is the response; there is nothing richer to keep.
    pub fn get_serialized_state(&self) -> ResponseValue {
        self.get_response()
    }

    pub fn set_serialized_state(&self, state: &Value) {
        self.set_response(state);
    }

    /// Undo everything `render` did, leaving only the initial markup.
    pub fn destroy(&mut self) {
        tracing::debug!(id = %self.id, "destroying math entry interaction");
        self.surface.detach_listeners();
        self.reset_response();
        self.adapter.revert();
        self.tracker.clear();
        self.sink = None;
    }
}

/// An interaction shared between its owner and its own listeners.
pub type SharedInteraction<B, S> = Rc<RefCell<MathEntryInteraction<B, S>>>;

/// A sink that feeds commands back into `interaction`.
///
/// Holds a weak reference, so listeners never keep a destroyed interaction
/// alive. Commands arriving while the interaction is already borrowed (a
/// listener fired from inside a field operation) are dropped.
pub fn command_sink<B, S>(interaction: &SharedInteraction<B, S>) -> CommandSink
where
    B: MathBackend + 'static,
    S: InteractionSurface + 'static,
{
    let weak = Rc::downgrade(interaction);
    Rc::new(move |command: InteractionCommand| {
        let Some(interaction) = weak.upgrade() else {
            return;
        };
        match interaction.try_borrow_mut() {
            Ok(mut interaction) => interaction.handle(command),
            Err(_) => tracing::warn!(command = command.name(), "dropping re-entrant command"),
        };
    })
}
