//! Fail-fast validation of adaptive automaton specs.
//!
//! [`validate`] runs a fixed, ordered sequence of checks and stops at the
//! first violated rule. Callers that match on the first reported error rely on
//! this order, so new checks go at the end.
//!
//! [`diagnose`] runs the same checks independently and accumulates the first
//! violation of each one, for tooling that wants every problem at once.

mod diagnostics;
pub mod error;

pub use diagnostics::diagnose;
pub use error::{CallPosition, ErrorCategory, SpecError};

use crate::spec::{
    parse_state_id, AutomatonSpec, ElementaryKind, GENERATOR_SIGIL, TRUTHY_TOKEN, VARIABLE_SIGIL,
};
use std::collections::BTreeSet;
use tracing::debug;

/// Result type alias for validation.
pub type ValidationResult = Result<(), SpecError>;

/// A single validation rule.
pub type Check = fn(&AutomatonSpec) -> ValidationResult;

/// Every rule, in the order [`validate`] applies them.
pub const CHECKS: [(&str, Check); 10] = [
    ("has_transitions", check_has_transitions),
    ("has_endpoints", check_has_endpoints),
    ("has_submachines", check_has_submachines),
    ("integer_states", check_integer_states),
    ("valid_submachines", check_valid_submachines),
    ("symbol_call_exclusive", check_symbol_call_exclusive),
    ("submachine_calls", check_submachine_calls),
    ("action_call_names", check_action_call_names),
    ("adaptive_actions", check_adaptive_actions),
    ("action_calls_defined", check_action_calls_defined),
];

/// Validate a spec, reporting the first violated rule.
pub fn validate(spec: &AutomatonSpec) -> ValidationResult {
    for (rule, check) in CHECKS {
        if let Err(error) = check(spec) {
            debug!(rule, %error, "spec rejected");
            return Err(error);
        }
    }
    debug!(
        transitions = spec.transitions.len(),
        submachines = spec.submachines.len(),
        actions = spec.actions.len(),
        "spec validated"
    );
    Ok(())
}

/// Action names referenced by transition pre/post calls, sorted.
pub fn referenced_actions(spec: &AutomatonSpec) -> BTreeSet<&str> {
    spec.transitions
        .iter()
        .flat_map(|t| [t.pre_action.as_ref(), t.post_action.as_ref()])
        .flatten()
        .filter_map(|call| non_empty(&call.name))
        .collect()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn check_has_transitions(spec: &AutomatonSpec) -> ValidationResult {
    if spec.transitions.is_empty() {
        return Err(SpecError::NoTransitions);
    }
    Ok(())
}

fn check_has_endpoints(spec: &AutomatonSpec) -> ValidationResult {
    match spec
        .transitions
        .iter()
        .position(|t| t.from.is_none() || t.to.is_none())
    {
        Some(index) => Err(SpecError::MissingEndpoints { index }),
        None => Ok(()),
    }
}

fn check_has_submachines(spec: &AutomatonSpec) -> ValidationResult {
    if spec.submachines.is_empty() {
        return Err(SpecError::NoSubmachines);
    }
    Ok(())
}

fn check_integer_states(spec: &AutomatonSpec) -> ValidationResult {
    let endpoints = spec
        .transitions
        .iter()
        .flat_map(|t| [t.from.as_deref(), t.to.as_deref()])
        .flatten();
    // Nameless states are reported by the submachine rule.
    let declared = spec
        .submachines
        .iter()
        .flat_map(|s| s.states.iter())
        .filter_map(|s| non_empty(&s.name));

    match endpoints
        .chain(declared)
        .find(|state| parse_state_id(state).is_none())
    {
        Some(state) => Err(SpecError::NonIntegerState {
            state: state.to_string(),
        }),
        None => Ok(()),
    }
}

fn check_valid_submachines(spec: &AutomatonSpec) -> ValidationResult {
    let mut mains = 0;

    for (index, submachine) in spec.submachines.iter().enumerate() {
        let name = non_empty(&submachine.name)
            .ok_or(SpecError::AnonymousSubmachine { index })?
            .to_string();

        if submachine.states.is_empty() {
            return Err(SpecError::EmptySubmachine { submachine: name });
        }

        if let Some(value) = &submachine.main {
            if value != TRUTHY_TOKEN {
                return Err(SpecError::InvalidMainFlag {
                    submachine: name,
                    value: value.clone(),
                });
            }
            mains += 1;
        }
        if mains > 1 {
            return Err(SpecError::MultipleMainSubmachines { submachine: name });
        }

        let mut starts = 0;
        let mut accepting = 0;
        for state in &submachine.states {
            let state_name = non_empty(&state.name).ok_or_else(|| SpecError::AnonymousState {
                submachine: name.clone(),
            })?;

            if let Some(value) = &state.accepting {
                if value != TRUTHY_TOKEN {
                    return Err(SpecError::InvalidAcceptingFlag {
                        submachine: name,
                        state: state_name.to_string(),
                        value: value.clone(),
                    });
                }
                accepting += 1;
            }

            if let Some(value) = &state.start {
                if value != TRUTHY_TOKEN {
                    return Err(SpecError::InvalidStartFlag {
                        submachine: name,
                        state: state_name.to_string(),
                        value: value.clone(),
                    });
                }
                starts += 1;
            }
        }

        match starts {
            0 => return Err(SpecError::MissingStartState { submachine: name }),
            1 => {}
            count => {
                return Err(SpecError::MultipleStartStates {
                    submachine: name,
                    count,
                })
            }
        }

        if accepting == 0 {
            return Err(SpecError::MissingAcceptingState { submachine: name });
        }
    }

    Ok(())
}

fn check_symbol_call_exclusive(spec: &AutomatonSpec) -> ValidationResult {
    match spec
        .transitions
        .iter()
        .enumerate()
        .find(|(_, t)| t.symbol.is_some() && t.call.is_some())
    {
        Some((index, t)) => Err(SpecError::SymbolAndCall {
            index,
            from: t.from.clone().unwrap_or_default(),
            to: t.to.clone().unwrap_or_default(),
        }),
        None => Ok(()),
    }
}

fn check_submachine_calls(spec: &AutomatonSpec) -> ValidationResult {
    let declared: BTreeSet<&str> = spec
        .submachines
        .iter()
        .filter_map(|s| s.name.as_deref())
        .collect();

    let undefined: BTreeSet<&str> = spec
        .transitions
        .iter()
        .filter_map(|t| t.call.as_deref())
        .filter(|call| !declared.contains(call))
        .collect();

    if undefined.is_empty() {
        return Ok(());
    }
    Err(SpecError::UndefinedSubmachines {
        names: undefined.into_iter().map(String::from).collect(),
    })
}

fn check_action_call_names(spec: &AutomatonSpec) -> ValidationResult {
    for (index, transition) in spec.transitions.iter().enumerate() {
        let calls = [
            (CallPosition::Pre, &transition.pre_action),
            (CallPosition::Post, &transition.post_action),
        ];
        for (position, call) in calls {
            if let Some(call) = call {
                if non_empty(&call.name).is_none() {
                    return Err(SpecError::AnonymousActionCall { index, position });
                }
            }
        }
    }
    Ok(())
}

fn check_adaptive_actions(spec: &AutomatonSpec) -> ValidationResult {
    for (index, action) in spec.actions.iter().enumerate() {
        let name = non_empty(&action.name)
            .ok_or(SpecError::AnonymousAction { index })?
            .to_string();

        if let Some(variable) = action
            .variables
            .iter()
            .find(|v| !v.starts_with(VARIABLE_SIGIL))
        {
            return Err(SpecError::InvalidVariableName {
                action: name,
                variable: variable.clone(),
            });
        }

        if let Some(generator) = action
            .generators
            .iter()
            .find(|g| !g.ends_with(GENERATOR_SIGIL))
        {
            return Err(SpecError::InvalidGeneratorName {
                action: name,
                generator: generator.clone(),
            });
        }

        if action.actions.is_empty() {
            return Err(SpecError::EmptyAction { action: name });
        }

        for (step, elementary) in action.actions.iter().enumerate() {
            if non_empty(&elementary.from).is_none() || non_empty(&elementary.to).is_none() {
                return Err(SpecError::MissingElementaryEndpoints { action: name, step });
            }

            let Some(kind) = elementary.kind.as_deref() else {
                return Err(SpecError::MissingElementaryKind { action: name, step });
            };
            if ElementaryKind::parse(kind).is_none() {
                return Err(SpecError::InvalidElementaryKind {
                    action: name,
                    step,
                    kind: kind.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn check_action_calls_defined(spec: &AutomatonSpec) -> ValidationResult {
    let declared: BTreeSet<&str> = spec
        .actions
        .iter()
        .filter_map(|a| non_empty(&a.name))
        .collect();

    match referenced_actions(spec)
        .into_iter()
        .find(|name| !declared.contains(name))
    {
        Some(name) => Err(SpecError::UndefinedAction {
            name: name.to_string(),
        }),
        None => Ok(()),
    }
}
