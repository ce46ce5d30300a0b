//! Errors raised while loading a spec document.

use thiserror::Error;

/// Errors that can occur when reading a spec from its serialized form.
#[derive(Debug, Error)]
pub enum SpecLoadError {
    /// The document is not well-formed JSON or does not match the schema.
    #[error("Spec document could not be parsed: {0}")]
    Json(#[from] serde_json::Error),
}
