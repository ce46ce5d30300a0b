//! Runtime values stored in the transition table.
//!
//! Every component of a transition tuple is a [`Value`]: a state, a symbol, a
//! submachine call, an adaptive action reference, the epsilon placeholder, or
//! a free-variable cell whose binding the recognition engine owns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// A component of a transition tuple.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// No symbol consumed, no submachine called.
    Epsilon,
    State(String),
    Symbol(String),
    /// A bare name or argument that was not wrapped as anything more specific.
    Literal(String),
    /// Reference to a submachine, by (possibly variable) name.
    Call(Box<Value>),
    /// Reference to an adaptive action with its arguments.
    Action(ActionRef),
    Variable(Variable),
}

impl Value {
    pub fn state(name: impl Into<String>) -> Self {
        Self::State(name.into())
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    pub fn literal(name: impl Into<String>) -> Self {
        Self::Literal(name.into())
    }

    pub fn call(name: Value) -> Self {
        Self::Call(Box::new(name))
    }

    /// A fresh, unbound free-variable cell.
    pub fn fresh() -> Self {
        Self::Variable(Variable::new())
    }

    /// Re-label this value as a state.
    ///
    /// States and variable cells are kept as they are; anything else keeps
    /// its text and becomes a state.
    pub fn into_state(self) -> Self {
        match self {
            Self::State(_) | Self::Variable(_) => self,
            other => Self::State(other.to_string()),
        }
    }

    /// Re-label this value as a symbol.
    ///
    /// Symbols and variable cells are kept as they are; anything else keeps
    /// its text and becomes a symbol.
    pub fn into_symbol(self) -> Self {
        match self {
            Self::Symbol(_) | Self::Variable(_) => self,
            other => Self::Symbol(other.to_string()),
        }
    }

    /// Replace bound variable cells by their values, recursively.
    pub fn resolved(&self) -> Value {
        match self {
            Self::Variable(cell) => match cell.value() {
                Some(value) => value.resolved(),
                None => self.clone(),
            },
            Self::Call(name) => Self::Call(Box::new(name.resolved())),
            Self::Action(reference) => Self::Action(reference.resolved()),
            other => other.clone(),
        }
    }

    /// True for a variable cell that is still unbound after resolution.
    pub fn is_unbound(&self) -> bool {
        matches!(self.resolved(), Self::Variable(_))
    }

    /// Whether this value, used as a pattern, matches a stored value.
    ///
    /// Unbound cells on either side match anything. Nothing is bound here.
    pub fn matches(&self, stored: &Value) -> bool {
        let pattern = self.resolved();
        let stored = stored.resolved();
        match (&pattern, &stored) {
            (Self::Variable(_), _) | (_, Self::Variable(_)) => true,
            (Self::Call(a), Self::Call(b)) => a.matches(b),
            (Self::Action(a), Self::Action(b)) => a.matches(b),
            _ => pattern == stored,
        }
    }

    /// Bind the unbound cells of this pattern to the matching parts of `stored`.
    ///
    /// Call only after [`Value::matches`] returned true.
    pub fn bind_from(&self, stored: &Value) {
        match self {
            Self::Variable(cell) => match cell.value() {
                Some(bound) => bound.bind_from(stored),
                None => {
                    let stored = stored.resolved();
                    if !matches!(stored, Self::Variable(_)) {
                        cell.bind(stored);
                    }
                }
            },
            Self::Call(name) => {
                if let Self::Call(other) = stored.resolved() {
                    name.bind_from(&other);
                }
            }
            Self::Action(reference) => {
                if let Self::Action(other) = stored.resolved() {
                    reference.bind_from(&other);
                }
            }
            _ => {}
        }
    }

    /// Plain text of a named value, if it has one.
    pub fn name(&self) -> Option<String> {
        match self.resolved() {
            Self::State(name) | Self::Symbol(name) | Self::Literal(name) => Some(name),
            Self::Call(inner) => inner.name(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Epsilon => f.write_str("ε"),
            Self::State(name) | Self::Symbol(name) | Self::Literal(name) => f.write_str(name),
            Self::Call(name) => write!(f, "[{}]", name),
            Self::Action(reference) => write!(f, "{}", reference),
            Self::Variable(cell) => match cell.value() {
                Some(value) => write!(f, "{}", value),
                None => write!(f, "?{}", cell.short_id()),
            },
        }
    }
}

/// Reference to an adaptive action together with its resolved arguments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionRef {
    pub name: Box<Value>,
    pub arguments: Vec<Value>,
}

impl ActionRef {
    pub fn new(name: Value, arguments: Vec<Value>) -> Self {
        Self {
            name: Box::new(name),
            arguments,
        }
    }

    /// Reference by literal name with literal arguments.
    pub fn named<I, A>(name: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self::new(
            Value::literal(name),
            arguments
                .into_iter()
                .map(|a| Value::Literal(a.into()))
                .collect(),
        )
    }

    pub fn resolved(&self) -> ActionRef {
        Self {
            name: Box::new(self.name.resolved()),
            arguments: self.arguments.iter().map(Value::resolved).collect(),
        }
    }

    pub fn matches(&self, stored: &ActionRef) -> bool {
        self.name.matches(&stored.name)
            && self.arguments.len() == stored.arguments.len()
            && self
                .arguments
                .iter()
                .zip(&stored.arguments)
                .all(|(a, b)| a.matches(b))
    }

    pub fn bind_from(&self, stored: &ActionRef) {
        self.name.bind_from(&stored.name);
        for (argument, other) in self.arguments.iter().zip(&stored.arguments) {
            argument.bind_from(other);
        }
    }
}

impl fmt::Display for ActionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, argument) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", argument)?;
        }
        f.write_str(")")
    }
}

/// A free-variable cell.
///
/// Clones share the same cell. Two cells are equal when they are the same
/// cell, whatever their bindings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "VariableRepr", into = "VariableRepr")]
pub struct Variable {
    id: Uuid,
    binding: Arc<RwLock<Option<Value>>>,
}

impl Variable {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            binding: Arc::new(RwLock::new(None)),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    fn short_id(&self) -> String {
        self.id.simple().to_string().chars().take(8).collect()
    }

    /// Current binding, if any.
    pub fn value(&self) -> Option<Value> {
        self.read().clone()
    }

    pub fn is_bound(&self) -> bool {
        self.read().is_some()
    }

    /// Bind an unbound cell. Returns false if the cell was already bound or
    /// the value would make the cell refer to itself.
    pub fn bind(&self, value: Value) -> bool {
        let value = value.resolved();
        if let Value::Variable(other) = &value {
            if other.id == self.id {
                return false;
            }
        }
        let mut binding = self.write();
        if binding.is_some() {
            return false;
        }
        *binding = Some(value);
        true
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Value>> {
        self.binding.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Value>> {
        self.binding
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for Variable {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[derive(Serialize, Deserialize)]
struct VariableRepr {
    id: Uuid,
    binding: Option<Value>,
}

impl From<Variable> for VariableRepr {
    fn from(variable: Variable) -> Self {
        Self {
            id: variable.id,
            binding: variable.value(),
        }
    }
}

impl From<VariableRepr> for Variable {
    fn from(repr: VariableRepr) -> Self {
        Self {
            id: repr.id,
            binding: Arc::new(RwLock::new(repr.binding)),
        }
    }
}
