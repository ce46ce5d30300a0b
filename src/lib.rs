//! Adaptive Spec: validation and construction of adaptive automatons
//!
//! An adaptive automaton is a finite-state recognizer whose transition table
//! is rewritten at runtime by adaptive actions attached to its transitions.
//! This crate is the core between a parsed automaton description and the
//! recognition engine that runs it.
//!
//! # Core Concepts
//!
//! - **Spec**: Declarative description of transitions, submachines and adaptive actions
//! - **Validator**: Ordered fail-fast checks, plus an accumulating diagnostic pass
//! - **Builder**: Turns a validated spec into a runtime [`AdaptiveAutomaton`]
//! - **Interpreter**: Executes adaptive actions as add/remove/query operations on the table
//! - **Checkpoint**: Snapshot of the table and generator counter
//!
//! # Example
//!
//! ```rust
//! use adaptive_spec::core::{TransitionEntry, Value};
//! use adaptive_spec::spec::{
//!     AdaptiveActionSpec, AutomatonSpec, ElementaryActionSpec, StateSpec, SubmachineSpec,
//!     TransitionSpec,
//! };
//! use adaptive_spec::{build, summarize, validate};
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
//!     actions: vec![AdaptiveActionSpec::new("inc")
//!         .generator("g*")
//!         .step(ElementaryActionSpec::add("1", "g*").with_symbol("x"))],
//! };
//!
//! validate(&spec).unwrap();
//! println!("{}", summarize(&spec));
//!
//! let mut automaton = build(&spec);
//! let current = TransitionEntry::new(Value::state("1"), Value::symbol("a"), Value::state("2"));
//! automaton.fire("inc", &current, &[]).unwrap();
//!
//! assert!(automaton.table().contains(&TransitionEntry::new(
//!     Value::state("1"),
//!     Value::symbol("x"),
//!     Value::state("3"),
//! )));
//! assert_eq!(automaton.generator().peek(), 4);
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod interpreter;
pub mod spec;
pub mod validator;

// Re-export commonly used types
pub use builder::{build, AdaptiveAutomaton, AutomatonBuilder, RuntimeError};
pub use checkpoint::{Checkpoint, CheckpointError};
pub use spec::{summarize, AutomatonSpec, Statistics};
pub use validator::{diagnose, validate, SpecError};
