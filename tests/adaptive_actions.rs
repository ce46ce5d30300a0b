//! End-to-end tests: load, validate, build, adapt and checkpoint.

use adaptive_spec::checkpoint::Checkpoint;
use adaptive_spec::core::{TransitionEntry, TransitionTable, Value};
use adaptive_spec::spec::{AutomatonSpec, StateSpec, SubmachineSpec, TransitionSpec};
use adaptive_spec::validator::ErrorCategory;
use adaptive_spec::{build, summarize, validate, AutomatonBuilder, SpecError};

/// Each `a` read from state 1 grows a fresh `b` path back to the accepting state.
const GROWING: &str = r#"{
    "transitions": [
        { "from": "1", "to": "1", "symbol": "a",
          "postAdaptiveFunction": { "name": "grow", "parameters": ["1"] } },
        { "from": "1", "to": "2", "symbol": "c" }
    ],
    "submachines": [
        { "name": "M", "main": "true", "states": [
            { "name": "1", "start": "true" },
            { "name": "2", "accepting": "true" }
        ] }
    ],
    "actions": [
        { "name": "grow",
          "parameters": ["p"],
          "variables": ["?t"],
          "generators": ["g*"],
          "actions": [
            { "type": "query", "from": "p", "symbol": "c", "to": "?t" },
            { "type": "remove", "from": "p", "symbol": "c", "to": "?t" },
            { "type": "add", "from": "p", "symbol": "c", "to": "g*" },
            { "type": "add", "from": "g*", "symbol": "b", "to": "?t" }
          ] }
    ]
}"#;

fn entry(from: &str, symbol: &str, to: &str) -> TransitionEntry {
    TransitionEntry::new(Value::state(from), Value::symbol(symbol), Value::state(to))
}

fn two_states() -> AutomatonSpec {
    AutomatonSpec {
        transitions: vec![
            TransitionSpec::new("1", "2").with_symbol("a"),
            TransitionSpec::new("2", "1").with_symbol("b"),
        ],
        submachines: vec![SubmachineSpec::new("M")
            .main()
            .state(StateSpec::new("1").start())
            .state(StateSpec::new("2").accepting())],
        actions: vec![],
    }
}

#[test]
fn two_state_machine_validates_and_seeds_three() {
    let spec = two_states();
    assert_eq!(validate(&spec), Ok(()));
    assert_eq!(build(&spec).generator().peek(), 3);
}

#[test]
fn missing_target_is_structural() {
    let mut spec = two_states();
    spec.transitions[1].to = None;

    let error = validate(&spec).unwrap_err();
    assert_eq!(error, SpecError::MissingEndpoints { index: 1 });
    assert_eq!(error.category(), ErrorCategory::Structural);
}

#[test]
fn two_mains_are_a_submachine_error() {
    let mut spec = two_states();
    spec.submachines.push(
        SubmachineSpec::new("N")
            .main()
            .state(StateSpec::new("1").start().accepting()),
    );

    let error = validate(&spec).unwrap_err();
    assert_eq!(error.category(), ErrorCategory::Submachine);
    assert!(matches!(
        error,
        SpecError::MultipleMainSubmachines { ref submachine } if submachine == "N"
    ));
}

#[test]
fn growing_automaton_adapts_on_each_posterior_call() {
    let spec = AutomatonSpec::from_json(GROWING).unwrap();
    validate(&spec).unwrap();
    assert!(summarize(&spec).to_string().starts_with("The automaton has 2 states"));

    let mut automaton = AutomatonBuilder::new().record_history(true).build(&spec);
    assert_eq!(automaton.generator().peek(), 3);

    let looping = automaton.table().entries()[0].clone();
    assert_eq!(automaton.fire_posterior(&looping), Ok(true));

    // 1 -c-> 2 became 1 -c-> 3 -b-> 2
    assert!(!automaton.table().contains(&entry("1", "c", "2")));
    assert!(automaton.table().contains(&entry("1", "c", "3")));
    assert!(automaton.table().contains(&entry("3", "b", "2")));

    assert_eq!(automaton.fire_posterior(&looping), Ok(true));
    assert!(automaton.table().contains(&entry("1", "c", "4")));
    assert!(automaton.table().contains(&entry("4", "b", "3")));
    assert!(automaton.table().contains(&entry("3", "b", "2")));
    assert_eq!(automaton.table().len(), 4);
    assert_eq!(automaton.generator().peek(), 5);

    let history = automaton.history().unwrap();
    assert_eq!(history.steps().len(), 8);
    assert!(history.steps().iter().all(|step| step.matched));
}

#[test]
fn symbol_arguments_match_built_transitions() {
    let spec = AutomatonSpec::from_json(
        r#"{
            "transitions": [
                { "from": "1", "to": "1", "symbol": "c",
                  "postAdaptiveFunction": { "name": "flip", "parameters": ["a"] } },
                { "from": "1", "to": "2", "symbol": "a" }
            ],
            "submachines": [
                { "name": "M", "main": "true", "states": [
                    { "name": "1", "start": "true" },
                    { "name": "2", "accepting": "true" }
                ] }
            ],
            "actions": [
                { "name": "flip",
                  "parameters": ["s"],
                  "actions": [
                    { "type": "query", "from": "1", "symbol": "s", "to": "2" },
                    { "type": "remove", "from": "1", "symbol": "s", "to": "2" },
                    { "type": "add", "from": "2", "symbol": "s", "to": "1" }
                  ] }
            ]
        }"#,
    )
    .unwrap();
    validate(&spec).unwrap();

    let mut automaton = AutomatonBuilder::new().record_history(true).build(&spec);
    let looping = automaton.table().entries()[0].clone();
    assert_eq!(automaton.fire_posterior(&looping), Ok(true));

    assert!(!automaton.table().contains(&entry("1", "a", "2")));
    assert!(automaton.table().contains(&entry("2", "a", "1")));
    let added = &automaton.table().entries()[1];
    assert_eq!(added.middle, Value::symbol("a"));

    let history = automaton.history().unwrap();
    assert!(history.steps().iter().all(|step| step.matched));
}

#[test]
fn checkpoint_resumes_an_adapted_automaton() {
    let spec = AutomatonSpec::from_json(GROWING).unwrap();
    let mut automaton = build(&spec);
    let looping = automaton.table().entries()[0].clone();
    automaton.fire_posterior(&looping).unwrap();

    let bytes = Checkpoint::capture(&automaton).to_binary().unwrap();
    let mut resumed = build(&spec);
    Checkpoint::from_binary(&bytes)
        .unwrap()
        .restore_into(&mut resumed)
        .unwrap();

    assert_eq!(resumed.entries(), automaton.entries());
    resumed.fire_posterior(&looping).unwrap();
    assert!(resumed.table().contains(&entry("1", "c", "4")));
}
