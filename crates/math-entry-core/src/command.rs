//! Typed command channel into the interaction.
//!
//! Host notifications (`configChange`, `addGap`) and DOM events forwarded by
//! the surface all arrive as `InteractionCommand`s.

use std::rc::Rc;

use serde_json::Value;

use crate::tools::ToolInsertion;

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionCommand {
    /// The host changed the configuration; re-render with it.
    ConfigChange(Value),
    /// Insert a gap marker at the active field.
    AddGap,
    /// A toolbar button was pressed.
    ToolPressed(ToolInsertion),
    /// Enter was pressed in the input.
    NewLine,
    /// An inner field received a click or key event.
    InnerFieldActivated(usize),
}

impl InteractionCommand {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionCommand::ConfigChange(_) => "configChange",
            InteractionCommand::AddGap => "addGap",
            InteractionCommand::ToolPressed(_) => "toolPressed",
            InteractionCommand::NewLine => "newLine",
            InteractionCommand::InnerFieldActivated(_) => "innerFieldActivated",
        }
    }
}

/// Where surfaces and hosts send commands.
pub type CommandSink = Rc<dyn Fn(InteractionCommand)>;
