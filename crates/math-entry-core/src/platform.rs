//! Platform abstraction traits for the interaction.
//!
//! These traits define the interface between the interaction logic and the
//! platform that actually renders it (browser DOM + MathQuill, or an
//! in-memory double in tests). The core never touches markup directly.

use std::fmt;
use std::rc::Rc;

use crate::command::CommandSink;
use crate::error::MathEntryError;
use crate::gap::EmbedSymbol;
use crate::tools::Toolbar;

/// Callback invoked synchronously with a field's LaTeX after every edit.
pub type EditHandler = Rc<dyn Fn(&str)>;

/// Settings applied to a field at creation or reconfiguration time.
#[derive(Clone, Default)]
pub struct FieldConfig {
    /// Space moves to the next block instead of inserting whitespace.
    pub space_behaves_like_tab: bool,
    pub on_edit: Option<EditHandler>,
}

impl FieldConfig {
    /// Run the edit handler, if any.
    pub fn notify_edit(&self, latex: &str) {
        if let Some(on_edit) = &self.on_edit {
            on_edit(latex);
        }
    }
}

impl fmt::Debug for FieldConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldConfig")
            .field("space_behaves_like_tab", &self.space_behaves_like_tab)
            .field("on_edit", &self.on_edit.is_some())
            .finish()
    }
}

/// Handle to a live math field.
///
/// Handles are cheap to clone and share the underlying field, so methods take
/// `&self` even when they mutate content.
pub trait MathField: Clone {
    /// Current LaTeX content.
    fn latex(&self) -> String;

    /// Replace the whole content.
    fn set_latex(&self, latex: &str);

    /// Apply a structural command at the cursor (e.g. `\frac` builds a template).
    fn cmd(&self, latex: &str);

    /// Insert literal LaTeX at the cursor.
    fn write(&self, latex: &str);

    fn focus(&self);

    /// Apply new settings without recreating the field.
    fn reconfigure(&self, config: &FieldConfig);

    /// Independently editable sub-fields, in document order.
    ///
    /// Empty for anything that is not a static field with gaps.
    fn inner_fields(&self) -> Vec<Self>;

    /// Undo everything the capability did to the node, leaving bare markup.
    fn revert(&self);
}

/// The external math editing capability, bound to one interaction's node.
pub trait MathBackend {
    type Field: MathField;

    /// Turn the node into an editable field.
    fn create_editable(&mut self, config: &FieldConfig) -> Result<Self::Field, MathEntryError>;

    /// Load `latex` into the node and turn it into a static field.
    ///
    /// Each inner-field marker in `latex` becomes one editable inner field.
    fn create_static(&mut self, latex: &str) -> Result<Self::Field, MathEntryError>;
}

/// Process-wide registry of custom embed symbols.
pub trait EmbedRegistry {
    fn register_embed(&self, name: &str, symbol: &EmbedSymbol) -> Result<(), MathEntryError>;
}

/// Which listeners a render wants on the interaction markup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerSet {
    /// Delegated press handler on the toolbar.
    pub toolbar: bool,
    /// Key handler on the input (newline on Enter).
    pub input: bool,
    /// Focus tracking on this many inner fields.
    pub inner_fields: usize,
}

impl ListenerSet {
    pub fn is_empty(&self) -> bool {
        !self.toolbar && !self.input && self.inner_fields == 0
    }
}

/// The markup surrounding the field: toolbar, placeholder, event listeners.
pub trait InteractionSurface {
    /// Whether the interaction is rendered inside the authoring tool.
    fn is_authoring_context(&self) -> bool;

    /// Render the rich content (math, markup) of the prompt, if any.
    fn render_prompt(&mut self);

    /// Replace the toolbar buttons.
    fn render_toolbar(&mut self, toolbar: &Toolbar);

    /// Show the placeholder and hide the input, or the reverse.
    ///
    /// The placeholder is created on first use and reused afterwards.
    fn toggle_placeholder(&mut self, visible: bool);

    /// Attach listeners that forward DOM events into `sink`.
    fn attach_listeners(&mut self, listeners: ListenerSet, sink: CommandSink);

    /// Drop every listener attached so far.
    fn detach_listeners(&mut self);
}

/// Notifications from the interaction to the host rendering engine.
pub trait InteractionHost {
    /// The interaction finished its first render.
    fn notify_ready(&self, id: &str, type_identifier: &str);

    /// A field was edited; carries that field's LaTeX.
    fn response_changed(&self, latex: &str);
}
