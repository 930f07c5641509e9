//! In-memory doubles for the math editing capability and the surface.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use math_entry_core::gap::RUNTIME_GAP;
use math_entry_core::{
    CommandSink, EmbedRegistry, EmbedSymbol, FieldConfig, InteractionCommand, InteractionHost,
    InteractionSurface, ListenerSet, MathBackend, MathEntryError, MathEntryInteraction,
    MathField, SharedInteraction, ToolId, Toolbar, command_sink, register_gap_embed,
};

pub type Embeds = Rc<RefCell<Vec<(String, EmbedSymbol)>>>;

/// An operation performed on a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOp {
    Cmd(String),
    Write(String),
    Focus,
}

#[derive(Debug, Default)]
struct FieldState {
    latex: String,
    config: Option<FieldConfig>,
    reconfigured: usize,
    ops: Vec<FieldOp>,
    inner: Vec<MockField>,
    reverted: bool,
}

#[derive(Debug, Clone)]
pub struct MockField {
    state: Rc<RefCell<FieldState>>,
    embeds: Embeds,
}

impl MockField {
    fn new(embeds: Embeds) -> Self {
        Self {
            state: Rc::new(RefCell::new(FieldState::default())),
            embeds,
        }
    }

    pub fn ops(&self) -> Vec<FieldOp> {
        self.state.borrow().ops.clone()
    }

    pub fn raw_latex(&self) -> String {
        self.state.borrow().latex.clone()
    }

    pub fn reconfigured(&self) -> usize {
        self.state.borrow().reconfigured
    }

    pub fn config(&self) -> Option<FieldConfig> {
        self.state.borrow().config.clone()
    }

    pub fn is_reverted(&self) -> bool {
        self.state.borrow().reverted
    }

    pub fn same_as(&self, other: &MockField) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    fn edited(&self) {
        let config = self.state.borrow().config.clone();
        if let Some(config) = config {
            config.notify_edit(&self.latex());
        }
    }
}

/// Structural templates for the commands tests use.
fn template(latex: &str) -> String {
    match latex {
        r"\frac" => r"\frac{}{}".to_string(),
        r"\sqrt" => r"\sqrt{}".to_string(),
        "^" => "^{}".to_string(),
        other => other.to_string(),
    }
}

impl MathField for MockField {
    fn latex(&self) -> String {
        // Embeds serialize through their registered LaTeX form.
        let mut latex = self.state.borrow().latex.clone();
        for (name, symbol) in self.embeds.borrow().iter() {
            latex = latex.replace(&format!(r"\embed{{{name}}}"), symbol.latex);
        }
        latex
    }

    fn set_latex(&self, latex: &str) {
        self.state.borrow_mut().latex = latex.to_string();
    }

    fn cmd(&self, latex: &str) {
        {
            let mut state = self.state.borrow_mut();
            state.latex.push_str(&template(latex));
            state.ops.push(FieldOp::Cmd(latex.to_string()));
        }
        self.edited();
    }

    fn write(&self, latex: &str) {
        {
            let mut state = self.state.borrow_mut();
            state.latex.push_str(latex);
            state.ops.push(FieldOp::Write(latex.to_string()));
        }
        self.edited();
    }

    fn focus(&self) {
        self.state.borrow_mut().ops.push(FieldOp::Focus);
    }

    fn reconfigure(&self, config: &FieldConfig) {
        let mut state = self.state.borrow_mut();
        state.config = Some(config.clone());
        state.reconfigured += 1;
    }

    fn inner_fields(&self) -> Vec<Self> {
        self.state.borrow().inner.clone()
    }

    fn revert(&self) {
        self.state.borrow_mut().reverted = true;
    }
}

#[derive(Debug, Default)]
pub struct BackendLog {
    pub editable: Vec<MockField>,
    pub statics: Vec<(String, MockField)>,
    pub fail: bool,
}

#[derive(Clone, Default)]
pub struct MockBackend {
    pub log: Rc<RefCell<BackendLog>>,
    pub embeds: Embeds,
}

impl MathBackend for MockBackend {
    type Field = MockField;

    fn create_editable(&mut self, config: &FieldConfig) -> Result<MockField, MathEntryError> {
        if self.log.borrow().fail {
            return Err(MathEntryError::Backend("MathQuill is not loaded".into()));
        }
        let field = MockField::new(self.embeds.clone());
        field.state.borrow_mut().config = Some(config.clone());
        self.log.borrow_mut().editable.push(field.clone());
        Ok(field)
    }

    fn create_static(&mut self, latex: &str) -> Result<MockField, MathEntryError> {
        if self.log.borrow().fail {
            return Err(MathEntryError::Backend("MathQuill is not loaded".into()));
        }
        let root = MockField::new(self.embeds.clone());
        root.set_latex(latex);
        let inner: Vec<_> = (0..latex.matches(RUNTIME_GAP).count())
            .map(|_| MockField::new(self.embeds.clone()))
            .collect();
        root.state.borrow_mut().inner = inner;
        self.log
            .borrow_mut()
            .statics
            .push((latex.to_string(), root.clone()));
        Ok(root)
    }
}

impl EmbedRegistry for MockBackend {
    fn register_embed(&self, name: &str, symbol: &EmbedSymbol) -> Result<(), MathEntryError> {
        self.embeds.borrow_mut().push((name.to_string(), *symbol));
        Ok(())
    }
}

#[derive(Default)]
pub struct SurfaceLog {
    pub authoring: bool,
    pub authoring_queries: usize,
    pub toolbars: Vec<String>,
    pub placeholder_created: usize,
    pub prompt_renders: usize,
    pub placeholder_visible: bool,
    pub input_visible: bool,
    pub attached: Option<ListenerSet>,
    pub attach_calls: usize,
    pub detach_calls: usize,
    pub sink: Option<CommandSink>,
}

#[derive(Clone, Default)]
pub struct MockSurface {
    pub log: Rc<RefCell<SurfaceLog>>,
}

impl InteractionSurface for MockSurface {
    fn is_authoring_context(&self) -> bool {
        let mut log = self.log.borrow_mut();
        log.authoring_queries += 1;
        log.authoring
    }

    fn render_toolbar(&mut self, toolbar: &Toolbar) {
        self.log.borrow_mut().toolbars.push(toolbar.to_string());
    }

    fn render_prompt(&mut self) {
        self.log.borrow_mut().prompt_renders += 1;
    }

    fn toggle_placeholder(&mut self, visible: bool) {
        let mut log = self.log.borrow_mut();
        if log.placeholder_created == 0 {
            log.placeholder_created = 1;
        }
        log.placeholder_visible = visible;
        log.input_visible = !visible;
    }

    fn attach_listeners(&mut self, listeners: ListenerSet, sink: CommandSink) {
        let mut log = self.log.borrow_mut();
        assert!(log.attached.is_none(), "listeners attached twice");
        log.attached = Some(listeners);
        log.attach_calls += 1;
        log.sink = Some(sink);
    }

    fn detach_listeners(&mut self) {
        let mut log = self.log.borrow_mut();
        log.attached = None;
        log.sink = None;
        log.detach_calls += 1;
    }
}

#[derive(Default)]
pub struct MockHost {
    pub ready: RefCell<Vec<(String, String)>>,
    pub changes: RefCell<Vec<String>>,
}

impl InteractionHost for MockHost {
    fn notify_ready(&self, id: &str, type_identifier: &str) {
        self.ready
            .borrow_mut()
            .push((id.to_string(), type_identifier.to_string()));
    }

    fn response_changed(&self, latex: &str) {
        self.changes.borrow_mut().push(latex.to_string());
    }
}

pub type TestInteraction = SharedInteraction<MockBackend, MockSurface>;

pub struct Harness {
    pub interaction: TestInteraction,
    pub backend: Rc<RefCell<BackendLog>>,
    pub surface: Rc<RefCell<SurfaceLog>>,
    pub host: Rc<MockHost>,
}

impl Harness {
    /// Initialize an interaction the way the host does.
    pub fn mount(authoring: bool, config: Value) -> Self {
        let backend = MockBackend::default();
        register_gap_embed(&backend).expect("mock registry accepts embeds");
        let surface = MockSurface::default();
        surface.log.borrow_mut().authoring = authoring;

        let backend_log = backend.log.clone();
        let surface_log = surface.log.clone();
        let host = Rc::new(MockHost::default());

        let interaction = Rc::new(RefCell::new(MathEntryInteraction::new(
            backend,
            surface,
            host.clone(),
        )));
        let sink = command_sink(&interaction);
        interaction.borrow_mut().initialize("RESPONSE", &config, sink);

        Self {
            interaction,
            backend: backend_log,
            surface: surface_log,
            host,
        }
    }

    /// Send a command through the listener sink, as a DOM event would.
    pub fn dom_event(&self, command: InteractionCommand) {
        let sink = self.surface.borrow().sink.clone();
        let sink = sink.expect("no listeners attached");
        sink(command);
    }

    /// Press a toolbar button.
    pub fn press(&self, id: ToolId) {
        self.dom_event(InteractionCommand::ToolPressed(id.tool().insertion()));
    }

    /// Deliver a host notification.
    pub fn trigger(&self, command: InteractionCommand) {
        self.interaction.borrow_mut().handle(command);
    }

    pub fn editable(&self, index: usize) -> MockField {
        self.backend.borrow().editable[index].clone()
    }

    pub fn last_static(&self) -> MockField {
        self.backend.borrow().statics.last().expect("no static field").1.clone()
    }

    pub fn inner_fields(&self) -> Vec<MockField> {
        self.last_static().inner_fields()
    }

    pub fn attached(&self) -> Option<ListenerSet> {
        self.surface.borrow().attached
    }
}
