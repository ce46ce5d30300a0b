//! Diagnostic statistics over a spec.

use super::{AutomatonSpec, TransitionSpec};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Counts describing a spec. Computing them never fails and never validates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub states: usize,
    pub transitions: usize,
    pub symbol_transitions: usize,
    pub epsilon_transitions: usize,
    pub submachine_calls: usize,
    pub action_calls: usize,
    pub pre_action_calls: usize,
    pub post_action_calls: usize,
    pub submachines: usize,
    pub actions: usize,
}

/// Compute the statistics of a spec.
pub fn summarize(spec: &AutomatonSpec) -> Statistics {
    let transitions = spec.transitions.as_slice();

    Statistics {
        states: spec.state_names().len(),
        transitions: transitions.len(),
        symbol_transitions: count(transitions, |t| t.symbol.is_some() && t.call.is_none()),
        epsilon_transitions: count(transitions, |t| t.symbol.is_none() && t.call.is_none()),
        submachine_calls: count(transitions, |t| t.symbol.is_none() && t.call.is_some()),
        action_calls: count(transitions, |t| t.pre_action.is_some() || t.post_action.is_some()),
        pre_action_calls: count(transitions, |t| t.pre_action.is_some()),
        post_action_calls: count(transitions, |t| t.post_action.is_some()),
        submachines: spec.submachines.len(),
        actions: spec.actions.len(),
    }
}

fn count(transitions: &[TransitionSpec], pred: impl Fn(&TransitionSpec) -> bool) -> usize {
    transitions.iter().filter(|t| pred(t)).count()
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    format!("{} {}", count, if count == 1 { singular } else { plural })
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The automaton has {}, {} ({} with symbol consumption, {}, and {}), {}, {} ({} and {}), and {} defined.",
            plural(self.states, "state", "states"),
            plural(self.transitions, "transition", "transitions"),
            plural(self.symbol_transitions, "transition", "transitions"),
            plural(self.epsilon_transitions, "epsilon transition", "epsilon transitions"),
            plural(self.submachine_calls, "submachine call", "submachine calls"),
            plural(self.submachines, "submachine", "submachines"),
            plural(self.action_calls, "adaptive function call", "adaptive function calls"),
            plural(self.pre_action_calls, "prior function", "prior functions"),
            plural(self.post_action_calls, "posterior function", "posterior functions"),
            plural(self.actions, "adaptive action", "adaptive actions"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{
        ActionCallSpec, AdaptiveActionSpec, ElementaryActionSpec, StateSpec, SubmachineSpec,
        TransitionSpec,
    };

    fn sample() -> AutomatonSpec {
        AutomatonSpec {
            transitions: vec![
                TransitionSpec::new("1", "2").with_symbol("a"),
                TransitionSpec::new("2", "3"),
                TransitionSpec::new("3", "4")
                    .with_call("N")
                    .with_pre_action(ActionCallSpec::new("grow", ["3"])),
                TransitionSpec::new("4", "1")
                    .with_symbol("b")
                    .with_pre_action(ActionCallSpec::new("grow", ["4"]))
                    .with_post_action(ActionCallSpec::new("grow", ["1"])),
            ],
            submachines: vec![
                SubmachineSpec::new("M")
                    .main()
                    .state(StateSpec::new("1").start())
                    .state(StateSpec::new("2").accepting()),
                SubmachineSpec::new("N")
                    .state(StateSpec::new("3").start())
                    .state(StateSpec::new("4").accepting()),
            ],
            actions: vec![AdaptiveActionSpec::new("grow")
                .parameter("p")
                .step(ElementaryActionSpec::add("p", "p").with_symbol("c"))],
        }
    }

    #[test]
    fn counts_transitions_by_kind() {
        let stats = summarize(&sample());

        assert_eq!(stats.states, 4);
        assert_eq!(stats.transitions, 4);
        assert_eq!(stats.symbol_transitions, 2);
        assert_eq!(stats.epsilon_transitions, 1);
        assert_eq!(stats.submachine_calls, 1);
        assert_eq!(stats.action_calls, 2);
        assert_eq!(stats.pre_action_calls, 2);
        assert_eq!(stats.post_action_calls, 1);
        assert_eq!(stats.submachines, 2);
        assert_eq!(stats.actions, 1);
    }

    #[test]
    fn summary_text_is_pluralized() {
        let text = summarize(&sample()).to_string();

        assert!(text.starts_with("The automaton has 4 states, 4 transitions"));
        assert!(text.contains("1 epsilon transition,"));
        assert!(text.contains("1 submachine call)"));
        assert!(text.contains("1 posterior function)"));
        assert!(text.ends_with("1 adaptive action defined."));
    }

    #[test]
    fn summarize_is_idempotent() {
        let spec = sample();
        assert_eq!(summarize(&spec).to_string(), summarize(&spec).to_string());
    }

    #[test]
    fn summarize_never_fails_on_empty_or_invalid_specs() {
        let empty = summarize(&AutomatonSpec::default());
        assert_eq!(empty, Statistics::default());

        let broken = AutomatonSpec {
            transitions: vec![TransitionSpec {
                from: Some("x".into()),
                ..TransitionSpec::default()
            }],
            ..AutomatonSpec::default()
        };
        assert_eq!(summarize(&broken).states, 1);
    }
}
