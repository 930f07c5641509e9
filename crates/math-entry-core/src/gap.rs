//! Gap markers and their encodings.
//!
//! A gap is stored in authored LaTeX as `\taoGap`. The editing capability
//! never sees that form directly:
//! - an editable field displays it through the registered `gap` embed (`\embed{gap}`)
//! - a static field turns it into an independently editable inner field
//!   (`\MathQuillMathField{}`)
//!
//! The embed renders back to `\taoGap` when the field's LaTeX is read, so
//! authored content round-trips through the editor.

use crate::error::MathEntryError;
use crate::platform::EmbedRegistry;

/// Gap marker as stored in authored LaTeX.
pub const GAP_MARKER: &str = r"\taoGap";

/// Gap marker as written into an editable field (embed widget).
pub const AUTHORING_GAP: &str = r"\embed{gap}";

/// Gap marker as written into static content (one inner field per gap).
pub const RUNTIME_GAP: &str = r"\MathQuillMathField{}";

/// Name the gap embed is registered under.
pub const GAP_EMBED_NAME: &str = "gap";

/// A custom symbol registered with the math editing capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedSymbol {
    /// Markup shown inside the field.
    pub html: &'static str,
    /// Plain-text form.
    pub text: &'static str,
    /// LaTeX the embed serializes to.
    pub latex: &'static str,
}

/// The gap glyph.
pub const GAP_EMBED: EmbedSymbol = EmbedSymbol {
    html: r#"<span class="mq-tao-gap"></span>"#,
    text: "tao_gap",
    latex: GAP_MARKER,
};

/// Translate authored gap markers into the embed form used by editable fields.
pub fn to_authoring(latex: &str) -> String {
    latex.replace(GAP_MARKER, AUTHORING_GAP)
}

/// Translate authored gap markers into inner-field markers for static content.
pub fn to_runtime(latex: &str) -> String {
    latex.replace(GAP_MARKER, RUNTIME_GAP)
}

/// Number of gap markers in authored LaTeX.
pub fn count_gaps(latex: &str) -> usize {
    latex.matches(GAP_MARKER).count()
}

/// Register the gap embed with the capability.
///
/// Registration is process-wide. Callers invoke this once, before any
/// interaction is constructed.
pub fn register_gap_embed<R: EmbedRegistry + ?Sized>(registry: &R) -> Result<(), MathEntryError> {
    tracing::debug!(name = GAP_EMBED_NAME, "registering gap embed");
    registry.register_embed(GAP_EMBED_NAME, &GAP_EMBED)
}
