//! Adaptive action interpreter.
//!
//! One [`AdaptiveActionInterpreter`] exists per declared adaptive action. The
//! recognition engine runs it whenever a transition's prior or posterior
//! action fires, passing the actual arguments. Each invocation:
//!
//! 1. builds a fresh [`Environment`] binding parameters, free variables and
//!    generators;
//! 2. resolves every elementary action against it, in declaration order;
//! 3. dispatches the resulting [`ElementaryRequest`] to the table.
//!
//! Elementary actions never short-circuit: a query that finds nothing does
//! not stop the remaining steps.
//!
//! # Example
//!
//! ```rust
//! use adaptive_spec::core::{Mapping, StateGenerator, TransitionEntry, TransitionTable, Value};
//! use adaptive_spec::interpreter::{AdaptiveActionInterpreter, ExecutionContext};
//! use adaptive_spec::spec::{AdaptiveActionSpec, ElementaryActionSpec};
//!
//! let spec = AdaptiveActionSpec::new("inc")
//!     .generator("g*")
//!     .step(ElementaryActionSpec::add("1", "g*").with_symbol("x"));
//! let interpreter = AdaptiveActionInterpreter::new(&spec);
//!
//! let mut table = Mapping::new();
//! let generator = StateGenerator::starting_at(3);
//! let current = TransitionEntry::new(Value::state("1"), Value::symbol("a"), Value::state("2"));
//!
//! let mut ctx = ExecutionContext::new(&mut table, &generator);
//! interpreter.execute(&mut ctx, &current, &[]);
//!
//! assert!(table.contains(&TransitionEntry::new(
//!     Value::state("1"),
//!     Value::symbol("x"),
//!     Value::state("3"),
//! )));
//! assert_eq!(generator.peek(), 4);
//! ```

mod environment;
mod request;

pub use environment::{Binding, Environment, Wrap};
pub use request::{dispatch, Dispatched, ElementaryRequest};

use crate::core::{AdaptationHistory, AdaptationStep, StateGenerator, TransitionEntry, TransitionTable, Value};
use crate::spec::{ActionCallSpec, AdaptiveActionSpec, Consumption, ElementaryActionSpec, ElementaryKind};
use chrono::Utc;
use tracing::{debug, warn};

/// Everything an invocation needs besides its arguments.
pub struct ExecutionContext<'a> {
    pub table: &'a mut dyn TransitionTable,
    pub generator: &'a StateGenerator,
    pub history: Option<&'a mut AdaptationHistory>,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(table: &'a mut dyn TransitionTable, generator: &'a StateGenerator) -> Self {
        Self {
            table,
            generator,
            history: None,
        }
    }

    /// Record every dispatched step into `history`.
    pub fn with_history(mut self, history: &'a mut AdaptationHistory) -> Self {
        self.history = Some(history);
        self
    }
}

/// An elementary action with its kind already parsed.
#[derive(Clone, Debug)]
struct Step {
    kind: ElementaryKind,
    spec: ElementaryActionSpec,
}

/// Interpreter for one declared adaptive action.
#[derive(Clone, Debug)]
pub struct AdaptiveActionInterpreter {
    name: String,
    parameters: Vec<String>,
    variables: Vec<String>,
    generators: Vec<String>,
    steps: Vec<Step>,
}

impl AdaptiveActionInterpreter {
    /// Prepare the interpreter for a validated adaptive action.
    ///
    /// Elementary actions with a missing or unknown kind cannot run and are
    /// dropped with a warning; a validated spec has none.
    pub fn new(spec: &AdaptiveActionSpec) -> Self {
        let name = spec.name.clone().unwrap_or_default();
        let steps = spec
            .actions
            .iter()
            .enumerate()
            .filter_map(|(index, elementary)| match elementary.elementary_kind() {
                Some(kind) => Some(Step {
                    kind,
                    spec: elementary.clone(),
                }),
                None => {
                    warn!(action = %name, step = index, kind = ?elementary.kind, "elementary action without a valid kind skipped");
                    None
                }
            })
            .collect();

        Self {
            name,
            parameters: spec.parameters.clone(),
            variables: spec.variables.clone(),
            generators: spec.generators.clone(),
            steps,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Number of elementary actions one invocation issues.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Bind a fresh environment for one invocation.
    pub fn environment(&self, generator: &StateGenerator, arguments: &[Value]) -> Environment {
        if arguments.len() != self.parameters.len() {
            warn!(
                action = %self.name,
                expected = self.parameters.len(),
                actual = arguments.len(),
                "adaptive action invoked with a mismatched argument count"
            );
        }
        Environment::bind(
            &self.parameters,
            &self.variables,
            &self.generators,
            arguments,
            generator,
        )
    }

    /// Resolve the requests one invocation would issue, in order.
    ///
    /// Resolution happens against a single environment, so free-variable
    /// cells are shared by every request.
    pub fn requests(&self, env: &Environment) -> Vec<(ElementaryKind, ElementaryRequest)> {
        self.steps
            .iter()
            .map(|step| (step.kind, resolve_step(env, &step.spec)))
            .collect()
    }

    /// Run the adaptive action against the context's table.
    pub fn execute(
        &self,
        ctx: &mut ExecutionContext<'_>,
        current: &TransitionEntry,
        arguments: &[Value],
    ) {
        debug!(action = %self.name, transition = %current, arguments = arguments.len(), "executing adaptive action");

        let env = self.environment(ctx.generator, arguments);
        for step in &self.steps {
            // Resolved lazily: a query can bind cells later steps use.
            let request = resolve_step(&env, &step.spec);
            let arity = request.arity();
            let outcome = dispatch(&mut *ctx.table, step.kind, request);

            debug!(
                action = %self.name,
                kind = %step.kind,
                arity,
                entry = %outcome.entry,
                matched = outcome.matched,
                "elementary action applied"
            );

            if let Some(history) = ctx.history.as_deref_mut() {
                *history = history.record(AdaptationStep {
                    action: self.name.clone(),
                    kind: step.kind,
                    entry: outcome.entry,
                    matched: outcome.matched,
                    timestamp: Utc::now(),
                });
            }
        }
    }
}

fn resolve_step(env: &Environment, spec: &ElementaryActionSpec) -> ElementaryRequest {
    let from = env.resolve(spec.from.as_deref().unwrap_or_default(), Wrap::State);
    let to = env.resolve(spec.to.as_deref().unwrap_or_default(), Wrap::State);
    let middle = match spec.consumption() {
        Consumption::Epsilon => Value::Epsilon,
        Consumption::Symbol(symbol) => env.resolve(symbol, Wrap::Symbol),
        Consumption::Call(submachine) => env.resolve(submachine, Wrap::Call),
    };
    let call = |call: &Option<ActionCallSpec>| call.as_ref().map(|c| env.resolve_call(c));

    ElementaryRequest::new(
        call(&spec.pre_action),
        from,
        middle,
        to,
        call(&spec.post_action),
    )
}
