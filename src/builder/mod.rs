//! Builder turning a validated spec into a runtime automaton.
//!
//! The builder does not re-validate. On a spec rejected by
//! [`crate::validator::validate`] the result is unspecified, though building
//! never panics.
//!
//! # Example
//!
//! ```rust
//! use adaptive_spec::builder::AutomatonBuilder;
//! use adaptive_spec::spec::{AutomatonSpec, StateSpec, SubmachineSpec, TransitionSpec};
//!
//! let spec = AutomatonSpec {
//!     transitions: vec![
//!         TransitionSpec::new("1", "2").with_symbol("a"),
//!         TransitionSpec::new("2", "1").with_symbol("b"),
//!     ],
//!     submachines: vec![SubmachineSpec::new("M")
//!         .main()
//!         .state(StateSpec::new("1").start())
//!         .state(StateSpec::new("2").accepting())],
//!     actions: vec![],
//! };
//!
//! let automaton = AutomatonBuilder::new().record_history(true).build(&spec);
//! assert_eq!(automaton.generator().peek(), 3);
//! assert_eq!(automaton.main(), Some("M"));
//! ```

mod automaton;
pub mod error;

pub use automaton::{ActionRegistry, AdaptiveAutomaton, AutomatonParts, Submachine};
pub use error::RuntimeError;

use crate::core::{ActionRef, AdaptationHistory, StateGenerator, TransitionEntry, Value};
use crate::interpreter::AdaptiveActionInterpreter;
use crate::spec::{
    parse_state_id, ActionCallSpec, AutomatonSpec, Consumption, StateId, SubmachineSpec,
    TransitionSpec,
};
use tracing::info;

/// Build a runtime automaton with the default configuration.
pub fn build(spec: &AutomatonSpec) -> AdaptiveAutomaton {
    AutomatonBuilder::new().build(spec)
}

/// Fluent configuration for building an [`AdaptiveAutomaton`].
#[derive(Clone, Debug, Default)]
pub struct AutomatonBuilder {
    record_history: bool,
}

impl AutomatonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every elementary operation into an [`AdaptationHistory`].
    pub fn record_history(mut self, enabled: bool) -> Self {
        self.record_history = enabled;
        self
    }

    pub fn build(self, spec: &AutomatonSpec) -> AdaptiveAutomaton {
        let seed = generator_seed(spec);

        let entries: Vec<TransitionEntry> = spec.transitions.iter().map(translate).collect();
        let submachines: Vec<Submachine> = spec.submachines.iter().map(submachine).collect();
        let main = spec
            .submachines
            .iter()
            .filter(|s| s.is_main())
            .filter_map(|s| s.name.clone())
            .last();

        let mut actions = ActionRegistry::new();
        for action in &spec.actions {
            actions.register(AdaptiveActionInterpreter::new(action));
        }

        info!(
            transitions = entries.len(),
            submachines = submachines.len(),
            actions = actions.len(),
            main = main.as_deref().unwrap_or("-"),
            seed,
            "built adaptive automaton"
        );

        AdaptiveAutomaton::new(AutomatonParts {
            entries,
            submachines,
            main,
            actions,
            generator: StateGenerator::starting_at(seed),
            history: self.record_history.then(AdaptationHistory::new),
        })
    }
}

/// First identifier the generator mints: one past the largest declared state.
///
/// Falls back to 1 when no state name parses. Valid state ids stay below
/// `StateId::MAX`, so the seed never overflows.
pub fn generator_seed(spec: &AutomatonSpec) -> StateId {
    spec.state_names()
        .into_iter()
        .filter_map(parse_state_id)
        .max()
        .map_or(1, |max| max + 1)
}

fn translate(transition: &TransitionSpec) -> TransitionEntry {
    let middle = match transition.consumption() {
        Consumption::Epsilon => Value::Epsilon,
        Consumption::Symbol(symbol) => Value::symbol(symbol),
        Consumption::Call(submachine) => Value::call(Value::literal(submachine)),
    };
    let mut entry = TransitionEntry::new(
        Value::state(transition.from.as_deref().unwrap_or_default()),
        middle,
        Value::state(transition.to.as_deref().unwrap_or_default()),
    );
    entry.pre = transition.pre_action.as_ref().map(reference);
    entry.post = transition.post_action.as_ref().map(reference);
    entry
}

fn reference(call: &ActionCallSpec) -> ActionRef {
    ActionRef::named(call.name.clone().unwrap_or_default(), call.arguments.iter().cloned())
}

fn submachine(spec: &SubmachineSpec) -> Submachine {
    let states = spec
        .states
        .iter()
        .filter_map(|s| s.name.as_deref())
        .map(Value::state)
        .collect();
    let initial = spec
        .start_states()
        .find_map(|s| s.name.as_deref())
        .map(Value::state);
    let accepting = spec
        .accepting_states()
        .filter_map(|s| s.name.as_deref())
        .map(Value::state)
        .collect();

    Submachine {
        name: spec.name.clone().unwrap_or_default(),
        states,
        initial,
        accepting,
    }
}
