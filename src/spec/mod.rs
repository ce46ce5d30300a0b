//! Declarative specification model of an adaptive automaton.
//!
//! These are the immutable value objects handed over by the external parser.
//! Every field that the validator has to reject when absent is kept optional,
//! so a spec can always be represented, valid or not. Nothing in this module
//! validates: see [`crate::validator`].
//!
//! # Example
//!
//! ```rust
//! use adaptive_spec::spec::AutomatonSpec;
//!
//! let spec = AutomatonSpec::from_json(r#"{
//!     "transitions": [
//!         { "from": "1", "to": "2", "symbol": "a" },
//!         { "from": "2", "to": "1", "symbol": "b" }
//!     ],
//!     "submachines": [
//!         { "name": "M", "main": "true", "states": [
//!             { "name": "1", "start": "true" },
//!             { "name": "2", "accepting": "true" }
//!         ] }
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(spec.transitions.len(), 2);
//! assert!(adaptive_spec::validator::validate(&spec).is_ok());
//! ```

pub mod error;
mod summary;

pub use error::SpecLoadError;
pub use summary::{summarize, Statistics};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Prefix every free-variable name must carry (`?x`).
pub const VARIABLE_SIGIL: char = '?';

/// Suffix every generator name must carry (`g*`).
pub const GENERATOR_SIGIL: char = '*';

/// The only accepted value for the `main`, `start` and `accepting` flags.
pub const TRUTHY_TOKEN: &str = "true";

/// Identifier of a state. Doubles as the generator seed domain.
pub type StateId = u64;

/// Parse a raw state name as a positive integer identifier.
///
/// Only canonical decimal names are accepted: no sign and no leading zeros,
/// so each identifier has exactly one name. The largest `StateId` is
/// rejected since the generator could not mint a state past it.
pub fn parse_state_id(name: &str) -> Option<StateId> {
    if name.starts_with('0') || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse::<StateId>()
        .ok()
        .filter(|id| *id > 0 && *id < StateId::MAX)
}

/// Complete specification of an adaptive automaton.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AutomatonSpec {
    #[serde(default)]
    pub transitions: Vec<TransitionSpec>,
    #[serde(default)]
    pub submachines: Vec<SubmachineSpec>,
    #[serde(default)]
    pub actions: Vec<AdaptiveActionSpec>,
}

impl AutomatonSpec {
    /// Load a spec from its JSON rendering.
    pub fn from_json(input: &str) -> Result<Self, SpecLoadError> {
        serde_json::from_str(input).map_err(SpecLoadError::from)
    }

    /// Render the spec as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SpecLoadError> {
        serde_json::to_string_pretty(self).map_err(SpecLoadError::from)
    }

    /// Distinct state names across transition endpoints and submachine states.
    pub fn state_names(&self) -> BTreeSet<&str> {
        let endpoints = self
            .transitions
            .iter()
            .flat_map(|t| [t.from.as_deref(), t.to.as_deref()])
            .flatten();
        let declared = self
            .submachines
            .iter()
            .flat_map(|s| s.states.iter())
            .filter_map(|s| s.name.as_deref());
        endpoints.chain(declared).collect()
    }

    /// Look up an adaptive action by name.
    pub fn action(&self, name: &str) -> Option<&AdaptiveActionSpec> {
        self.actions
            .iter()
            .find(|a| a.name.as_deref() == Some(name))
    }
}

/// What a transition (or elementary action) consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Consumption<'a> {
    Epsilon,
    Symbol(&'a str),
    Call(&'a str),
}

/// A transition of the automaton.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionSpec {
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call: Option<String>,
    #[serde(
        default,
        rename = "preAdaptiveFunction",
        skip_serializing_if = "Option::is_none"
    )]
    pub pre_action: Option<ActionCallSpec>,
    #[serde(
        default,
        rename = "postAdaptiveFunction",
        skip_serializing_if = "Option::is_none"
    )]
    pub post_action: Option<ActionCallSpec>,
}

impl TransitionSpec {
    /// Convenience constructor for a transition between two states.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
            ..Self::default()
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn with_call(mut self, submachine: impl Into<String>) -> Self {
        self.call = Some(submachine.into());
        self
    }

    pub fn with_pre_action(mut self, call: ActionCallSpec) -> Self {
        self.pre_action = Some(call);
        self
    }

    pub fn with_post_action(mut self, call: ActionCallSpec) -> Self {
        self.post_action = Some(call);
        self
    }

    /// A submachine call wins over a symbol; the validator rejects both.
    pub fn consumption(&self) -> Consumption<'_> {
        consumption_of(self.symbol.as_deref(), self.call.as_deref())
    }
}

/// A named sub-automaton.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmachineSpec {
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    #[serde(default)]
    pub states: Vec<StateSpec>,
}

impl SubmachineSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn main(mut self) -> Self {
        self.main = Some(TRUTHY_TOKEN.to_string());
        self
    }

    pub fn state(mut self, state: StateSpec) -> Self {
        self.states.push(state);
        self
    }

    pub fn is_main(&self) -> bool {
        self.main.is_some()
    }

    /// States flagged as start, in declaration order.
    pub fn start_states(&self) -> impl Iterator<Item = &StateSpec> {
        self.states.iter().filter(|s| s.start.is_some())
    }

    /// States flagged as accepting, in declaration order.
    pub fn accepting_states(&self) -> impl Iterator<Item = &StateSpec> {
        self.states.iter().filter(|s| s.accepting.is_some())
    }
}

/// A state declared inside a submachine.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateSpec {
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepting: Option<String>,
}

impl StateSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn start(mut self) -> Self {
        self.start = Some(TRUTHY_TOKEN.to_string());
        self
    }

    pub fn accepting(mut self) -> Self {
        self.accepting = Some(TRUTHY_TOKEN.to_string());
        self
    }
}

/// Declaration of an adaptive action.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveActionSpec {
    pub name: Option<String>,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub variables: Vec<String>,
    #[serde(default)]
    pub generators: Vec<String>,
    #[serde(default)]
    pub actions: Vec<ElementaryActionSpec>,
}

impl AdaptiveActionSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn parameter(mut self, name: impl Into<String>) -> Self {
        self.parameters.push(name.into());
        self
    }

    pub fn variable(mut self, name: impl Into<String>) -> Self {
        self.variables.push(name.into());
        self
    }

    pub fn generator(mut self, name: impl Into<String>) -> Self {
        self.generators.push(name.into());
        self
    }

    pub fn step(mut self, step: ElementaryActionSpec) -> Self {
        self.actions.push(step);
        self
    }
}

/// Kind of an elementary action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementaryKind {
    Add,
    Remove,
    Query,
}

impl ElementaryKind {
    /// Parse the raw `type` token (`add`, `remove`, `query`).
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "add" => Some(Self::Add),
            "remove" => Some(Self::Remove),
            "query" => Some(Self::Query),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Query => "query",
        }
    }
}

impl fmt::Display for ElementaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of an adaptive action.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementaryActionSpec {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call: Option<String>,
    #[serde(
        default,
        rename = "preAdaptiveFunction",
        skip_serializing_if = "Option::is_none"
    )]
    pub pre_action: Option<ActionCallSpec>,
    #[serde(
        default,
        rename = "postAdaptiveFunction",
        skip_serializing_if = "Option::is_none"
    )]
    pub post_action: Option<ActionCallSpec>,
}

impl ElementaryActionSpec {
    pub fn new(kind: ElementaryKind, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.as_str().to_string()),
            from: Some(from.into()),
            to: Some(to.into()),
            ..Self::default()
        }
    }

    pub fn add(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(ElementaryKind::Add, from, to)
    }

    pub fn remove(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(ElementaryKind::Remove, from, to)
    }

    pub fn query(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(ElementaryKind::Query, from, to)
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn with_call(mut self, submachine: impl Into<String>) -> Self {
        self.call = Some(submachine.into());
        self
    }

    pub fn with_pre_action(mut self, call: ActionCallSpec) -> Self {
        self.pre_action = Some(call);
        self
    }

    pub fn with_post_action(mut self, call: ActionCallSpec) -> Self {
        self.post_action = Some(call);
        self
    }

    /// Parsed kind, `None` when missing or not one of the three tokens.
    pub fn elementary_kind(&self) -> Option<ElementaryKind> {
        self.kind.as_deref().and_then(ElementaryKind::parse)
    }

    pub fn consumption(&self) -> Consumption<'_> {
        consumption_of(self.symbol.as_deref(), self.call.as_deref())
    }
}

/// Call of an adaptive action with argument expressions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionCallSpec {
    pub name: Option<String>,
    #[serde(default, rename = "parameters", alias = "parameter")]
    pub arguments: Vec<String>,
}

impl ActionCallSpec {
    pub fn new<I, A>(name: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            name: Some(name.into()),
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }
}

fn consumption_of<'a>(symbol: Option<&'a str>, call: Option<&'a str>) -> Consumption<'a> {
    match (symbol, call) {
        (_, Some(call)) => Consumption::Call(call),
        (Some(symbol), None) => Consumption::Symbol(symbol),
        (None, None) => Consumption::Epsilon,
    }
}
