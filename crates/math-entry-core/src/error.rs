//! Error types for the math entry interaction.
//!
//! None of these ever reach the host. They are produced at the seams
//! (backend construction, payload decoding) and logged where they are handled.

use thiserror::Error;

/// Errors that can occur while driving the interaction.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MathEntryError {
    /// The math editing capability refused an operation.
    #[error("math editing backend error: {0}")]
    Backend(String),

    /// The interaction markup is missing a required element.
    #[error("interaction markup is missing `{0}`")]
    Markup(String),

    /// A response or serialized state payload had an unexpected shape.
    #[error("invalid response payload: {0}")]
    InvalidResponse(String),

    /// A configuration payload could not be read at all.
    #[error("invalid configuration payload: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for MathEntryError {
    fn from(e: serde_json::Error) -> Self {
        MathEntryError::InvalidResponse(e.to_string())
    }
}
