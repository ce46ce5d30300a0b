//! Errors raised while running a built automaton.

use thiserror::Error;

/// Failures when an adaptive action is fired at runtime.
///
/// A validated spec never produces them; they surface when the recognition
/// engine fires a name or reference the registry does not know.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Adaptive action '{name}' is not registered")]
    UnknownAction { name: String },

    #[error("Action reference {reference} does not resolve to a name")]
    UnresolvedActionName { reference: String },
}
