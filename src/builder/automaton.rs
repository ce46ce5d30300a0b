//! Runtime descriptor produced by the builder.

use crate::builder::error::RuntimeError;
use crate::core::{
    ActionRef, AdaptationHistory, Mapping, StateGenerator, TransitionEntry, TransitionTable, Value,
};
use crate::interpreter::{AdaptiveActionInterpreter, ExecutionContext};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Runtime record of a submachine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Submachine {
    pub name: String,
    /// Every declared state, in declaration order.
    pub states: Vec<Value>,
    pub initial: Option<Value>,
    pub accepting: Vec<Value>,
}

impl Submachine {
    pub fn is_accepting(&self, state: &Value) -> bool {
        self.accepting.contains(state)
    }
}

/// Adaptive action interpreters, by name.
#[derive(Clone, Debug, Default)]
pub struct ActionRegistry {
    interpreters: BTreeMap<String, AdaptiveActionInterpreter>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an interpreter under its own name, replacing any previous one.
    pub fn register(&mut self, interpreter: AdaptiveActionInterpreter) {
        self.interpreters
            .insert(interpreter.name().to_string(), interpreter);
    }

    pub fn get(&self, name: &str) -> Option<&AdaptiveActionInterpreter> {
        self.interpreters.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.interpreters.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.interpreters.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.interpreters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interpreters.is_empty()
    }
}

/// Plain values an [`AdaptiveAutomaton`] is assembled from.
#[derive(Clone, Debug, Default)]
pub struct AutomatonParts {
    pub entries: Vec<TransitionEntry>,
    pub submachines: Vec<Submachine>,
    pub main: Option<String>,
    pub actions: ActionRegistry,
    pub generator: StateGenerator,
    /// `Some` to record every elementary operation.
    pub history: Option<AdaptationHistory>,
}

/// A built adaptive automaton, ready for the recognition engine.
///
/// Owns the transition table; every adaptive action mutates it through
/// `&mut self`, so table mutation is serialized by construction.
#[derive(Clone, Debug)]
pub struct AdaptiveAutomaton {
    table: Mapping,
    submachines: Vec<Submachine>,
    main: Option<String>,
    actions: ActionRegistry,
    generator: StateGenerator,
    history: Option<AdaptationHistory>,
}

impl AdaptiveAutomaton {
    pub fn new(parts: AutomatonParts) -> Self {
        Self {
            table: Mapping::from_entries(parts.entries),
            submachines: parts.submachines,
            main: parts.main,
            actions: parts.actions,
            generator: parts.generator,
            history: parts.history,
        }
    }

    pub fn table(&self) -> &Mapping {
        &self.table
    }

    pub fn submachines(&self) -> &[Submachine] {
        &self.submachines
    }

    /// Name of the main submachine, if one was flagged.
    pub fn main(&self) -> Option<&str> {
        self.main.as_deref()
    }

    pub fn main_submachine(&self) -> Option<&Submachine> {
        self.main.as_deref().and_then(|name| self.submachine(name))
    }

    pub fn submachine(&self, name: &str) -> Option<&Submachine> {
        self.submachines.iter().find(|s| s.name == name)
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    pub fn generator(&self) -> &StateGenerator {
        &self.generator
    }

    /// Recorded adaptations, `None` when recording is off.
    pub fn history(&self) -> Option<&AdaptationHistory> {
        self.history.as_ref()
    }

    /// Run the named adaptive action against the table.
    pub fn fire(
        &mut self,
        name: &str,
        current: &TransitionEntry,
        arguments: &[Value],
    ) -> Result<(), RuntimeError> {
        let interpreter = self
            .actions
            .get(name)
            .ok_or_else(|| RuntimeError::UnknownAction {
                name: name.to_string(),
            })?;

        let mut ctx = ExecutionContext::new(&mut self.table, &self.generator);
        if let Some(history) = self.history.as_mut() {
            ctx = ctx.with_history(history);
        }
        interpreter.execute(&mut ctx, current, arguments);
        Ok(())
    }

    /// Fire an action reference stored in a table entry.
    pub fn fire_reference(
        &mut self,
        reference: &ActionRef,
        current: &TransitionEntry,
    ) -> Result<(), RuntimeError> {
        let reference = reference.resolved();
        let name = reference
            .name
            .name()
            .ok_or_else(|| RuntimeError::UnresolvedActionName {
                reference: reference.to_string(),
            })?;
        debug!(action = %name, transition = %current, "firing action reference");
        self.fire(&name, current, &reference.arguments)
    }

    /// Fire the prior action of `current`, if it has one.
    pub fn fire_prior(&mut self, current: &TransitionEntry) -> Result<bool, RuntimeError> {
        match &current.pre {
            Some(reference) => self.fire_reference(reference, current).map(|_| true),
            None => Ok(false),
        }
    }

    /// Fire the posterior action of `current`, if it has one.
    pub fn fire_posterior(&mut self, current: &TransitionEntry) -> Result<bool, RuntimeError> {
        match &current.post {
            Some(reference) => self.fire_reference(reference, current).map(|_| true),
            None => Ok(false),
        }
    }

    /// Replace the table contents and reseed the generator.
    pub(crate) fn restore(&mut self, entries: Vec<TransitionEntry>, generator_next: u64) {
        self.table = Mapping::from_entries(entries);
        self.generator.seed(generator_next);
    }

    /// Current table entries, cloned.
    pub fn entries(&self) -> Vec<TransitionEntry> {
        self.table.entries().to_vec()
    }
}
