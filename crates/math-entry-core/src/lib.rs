//! math-entry-core: Pure Rust logic for the math entry interaction.
//!
//! This crate provides:
//! - `InteractionConfig` - normalized configuration from a loosely-typed host object
//! - `Toolbar` - grouped tool buttons built from the fixed tool catalog
//! - `MathBackend` / `MathField` traits abstracting the external math editing capability
//! - `MathEditingAdapter` - owns the live field (single or composite)
//! - `RenderMode` - the four rendering behaviours selected from (gap mode, authoring context)
//! - `ResponseValue` - the wire-format response and its codec
//! - `MathEntryInteraction` - the lifecycle controller implementing the host contract
//!
//! Nothing here touches the DOM. The browser layer lives in `math-entry-browser`.

pub mod adapter;
pub mod command;
pub mod config;
pub mod error;
pub mod gap;
pub mod interaction;
pub mod mode;
pub mod platform;
pub mod response;
pub mod tools;
pub mod tracker;

pub use adapter::{MathEditingAdapter, MathFieldState};
pub use command::{CommandSink, InteractionCommand};
pub use config::{InteractionConfig, ToolsStatus};
pub use error::MathEntryError;
pub use gap::{EmbedSymbol, GAP_EMBED, register_gap_embed};
pub use interaction::{
    INTERACTION_VERSION, MathEntryInteraction, SharedInteraction, TYPE_IDENTIFIER, command_sink,
};
pub use mode::RenderMode;
pub use platform::{
    EditHandler, EmbedRegistry, FieldConfig, InteractionHost, InteractionSurface, ListenerSet,
    MathBackend, MathField,
};
pub use response::{BaseResponse, ListResponse, ResponseValue};
pub use smol_str::SmolStr;
pub use tools::{InsertKind, Tool, ToolGroup, ToolId, ToolInsertion, Toolbar, ToolbarGroup};
pub use tracker::ActiveFieldTracker;
