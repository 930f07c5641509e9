//! Browser DOM layer for the math entry interaction.
//!
//! This crate binds the core interaction to a real page. It assumes a
//! `wasm32-unknown-unknown` target for everything that touches the DOM.
//!
//! # Architecture
//!
//! - `mathquill`: bindings to the MathQuill v2 interface, implementing `MathBackend`
//! - `surface`: toolbar, prompt, placeholder and listener management on the interaction markup
//! - `toolbar`: toolbar markup generation (target independent)
//!
//! # Re-exports
//!
//! This crate re-exports `math-entry-core` for convenience, so consumers
//! only need to depend on `math-entry-browser`.

// Re-export core crate
pub use math_entry_core;
pub use math_entry_core::*;

pub mod toolbar;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub mod mathquill;
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub mod surface;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub use mathquill::{MathQuill, MathQuillBackend, MathQuillField, install_gap_embed};
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub use surface::{DomSurface, PromptRenderer};
pub use toolbar::toolbar_html;

/// Class on the container when rendered inside the authoring tool.
pub const AUTHORING_CONTEXT_CLASS: &str = "tao-qti-creator-context";

/// Selector of the toolbar element inside the interaction markup.
pub const TOOLBAR_SELECTOR: &str = ".toolbar";

/// Selector of the prompt, whose rich content is rendered once on initialize.
pub const PROMPT_SELECTOR: &str = ".prompt";

/// Selector of the element MathQuill is mounted on.
pub const INPUT_SELECTOR: &str = ".math-entry-input";

/// Class of the lazily created placeholder.
pub const PLACEHOLDER_CLASS: &str = "math-entry-placeholder";

/// Class MathQuill puts on every editable (inner) field.
pub const EDITABLE_FIELD_SELECTOR: &str = ".mq-editable-field";
