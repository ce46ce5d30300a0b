//! Structured validation errors.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Broad family of a [`SpecError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Missing transitions or submachines, missing endpoints, non-integer states.
    Structural,
    /// Malformed submachine declarations and undefined submachine calls.
    Submachine,
    /// Malformed adaptive actions and undefined action calls.
    Action,
    /// A transition that both consumes a symbol and calls a submachine.
    TransitionConflict,
}

/// Side of a transition an action call is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallPosition {
    Pre,
    Post,
}

impl fmt::Display for CallPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pre => f.write_str("prior"),
            Self::Post => f.write_str("posterior"),
        }
    }
}

/// First violated rule of a spec, naming the offending entity.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SpecError {
    #[error("The automaton has no transitions. Add at least one transition")]
    NoTransitions,

    #[error("Transition #{index} lacks a source or target state")]
    MissingEndpoints { index: usize },

    #[error("The automaton has no submachines. Declare at least one submachine")]
    NoSubmachines,

    #[error("State '{state}' is not a positive integer identifier")]
    NonIntegerState { state: String },

    #[error("Submachine #{index} has no name")]
    AnonymousSubmachine { index: usize },

    #[error("Submachine '{submachine}' has no states")]
    EmptySubmachine { submachine: String },

    #[error("Submachine '{submachine}' has main flag '{value}', expected 'true'")]
    InvalidMainFlag { submachine: String, value: String },

    #[error("Submachine '{submachine}' is the second submachine marked as main; only one is allowed")]
    MultipleMainSubmachines { submachine: String },

    #[error("Submachine '{submachine}' has a state without a name")]
    AnonymousState { submachine: String },

    #[error("Submachine '{submachine}' has state '{state}' with accepting flag '{value}', expected 'true'")]
    InvalidAcceptingFlag {
        submachine: String,
        state: String,
        value: String,
    },

    #[error("Submachine '{submachine}' has state '{state}' with start flag '{value}', expected 'true'")]
    InvalidStartFlag {
        submachine: String,
        state: String,
        value: String,
    },

    #[error("Submachine '{submachine}' has no start state")]
    MissingStartState { submachine: String },

    #[error("Submachine '{submachine}' has {count} start states, exactly one is required")]
    MultipleStartStates { submachine: String, count: usize },

    #[error("Submachine '{submachine}' has no accepting states")]
    MissingAcceptingState { submachine: String },

    #[error("Transition #{index} ({from} -> {to}) both consumes a symbol and calls a submachine")]
    SymbolAndCall {
        index: usize,
        from: String,
        to: String,
    },

    #[error("Calls to undefined submachines: {}", names.join(", "))]
    UndefinedSubmachines { names: Vec<String> },

    #[error("Transition #{index} has a {position} adaptive function call without a name")]
    AnonymousActionCall { index: usize, position: CallPosition },

    #[error("Adaptive action #{index} has no name")]
    AnonymousAction { index: usize },

    #[error("Adaptive action '{action}' declares variable '{variable}' without the '?' prefix")]
    InvalidVariableName { action: String, variable: String },

    #[error("Adaptive action '{action}' declares generator '{generator}' without the '*' suffix")]
    InvalidGeneratorName { action: String, generator: String },

    #[error("Adaptive action '{action}' has no elementary actions")]
    EmptyAction { action: String },

    #[error("Adaptive action '{action}' has elementary action #{step} without source or target")]
    MissingElementaryEndpoints { action: String, step: usize },

    #[error("Adaptive action '{action}' has elementary action #{step} without a type (add, remove or query)")]
    MissingElementaryKind { action: String, step: usize },

    #[error("Adaptive action '{action}' has elementary action #{step} with invalid type '{kind}'")]
    InvalidElementaryKind {
        action: String,
        step: usize,
        kind: String,
    },

    #[error("Adaptive function '{name}' is called but never defined")]
    UndefinedAction { name: String },
}

impl SpecError {
    /// Family this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoTransitions
            | Self::MissingEndpoints { .. }
            | Self::NoSubmachines
            | Self::NonIntegerState { .. } => ErrorCategory::Structural,

            Self::AnonymousSubmachine { .. }
            | Self::EmptySubmachine { .. }
            | Self::InvalidMainFlag { .. }
            | Self::MultipleMainSubmachines { .. }
            | Self::AnonymousState { .. }
            | Self::InvalidAcceptingFlag { .. }
            | Self::InvalidStartFlag { .. }
            | Self::MissingStartState { .. }
            | Self::MultipleStartStates { .. }
            | Self::MissingAcceptingState { .. }
            | Self::UndefinedSubmachines { .. } => ErrorCategory::Submachine,

            Self::SymbolAndCall { .. } => ErrorCategory::TransitionConflict,

            Self::AnonymousActionCall { .. }
            | Self::AnonymousAction { .. }
            | Self::InvalidVariableName { .. }
            | Self::InvalidGeneratorName { .. }
            | Self::EmptyAction { .. }
            | Self::MissingElementaryEndpoints { .. }
            | Self::MissingElementaryKind { .. }
            | Self::InvalidElementaryKind { .. }
            | Self::UndefinedAction { .. } => ErrorCategory::Action,
        }
    }
}
