//! Per-invocation binding environment and name resolution.
//!
//! A name used inside an adaptive action resolves with a fixed precedence:
//! free variable, then generator, then formal parameter, then the literal
//! name itself. The [`Wrap`] strategy decides what the resolved value becomes
//! at each call site.

use crate::core::{ActionRef, StateGenerator, Value, Variable};
use crate::spec::{ActionCallSpec, StateId};
use std::collections::HashMap;

/// What a name is bound to in the current invocation.
#[derive(Clone, Debug, PartialEq)]
pub enum Binding<'a> {
    Variable(&'a Variable),
    Generated(StateId),
    Parameter(&'a Value),
}

/// How a resolved name is turned into a value at a given call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wrap {
    /// Transition endpoints.
    State,
    /// Consumed symbols. Parameter arguments keep their text as a symbol.
    Symbol,
    /// Submachine calls.
    Call,
    /// Adaptive action names. Never wraps as a state.
    Reference,
    /// Adaptive action call arguments.
    PassThrough,
}

impl Wrap {
    fn apply(self, binding: Option<Binding<'_>>, name: &str) -> Value {
        match binding {
            Some(Binding::Variable(cell)) => {
                let cell = Value::Variable(cell.clone());
                match self {
                    Self::Call => Value::call(cell),
                    _ => cell,
                }
            }
            Some(Binding::Generated(id)) => {
                let id = id.to_string();
                match self {
                    Self::State | Self::PassThrough => Value::State(id),
                    Self::Symbol => Value::Symbol(id),
                    Self::Call => Value::call(Value::Literal(id)),
                    Self::Reference => Value::Literal(id),
                }
            }
            Some(Binding::Parameter(argument)) => match self {
                Self::State => argument.clone().into_state(),
                Self::Symbol => argument.clone().into_symbol(),
                Self::Call => Value::call(argument.clone()),
                Self::Reference | Self::PassThrough => argument.clone(),
            },
            None => match self {
                Self::State => Value::state(name),
                Self::Symbol => Value::symbol(name),
                Self::Call => Value::call(Value::literal(name)),
                Self::Reference | Self::PassThrough => Value::literal(name),
            },
        }
    }
}

/// Names bound by one invocation of an adaptive action.
///
/// Built fresh for every invocation and never shared.
#[derive(Debug, Default)]
pub struct Environment {
    variables: HashMap<String, Variable>,
    generators: HashMap<String, StateId>,
    parameters: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind parameters positionally, allocate a cell per variable and mint a
    /// fresh state per generator, in declaration order.
    ///
    /// Parameters without an actual argument stay unbound; surplus arguments
    /// are ignored.
    pub fn bind(
        parameters: &[String],
        variables: &[String],
        generators: &[String],
        arguments: &[Value],
        generator: &StateGenerator,
    ) -> Self {
        let mut env = Self::new();
        for (name, argument) in parameters.iter().zip(arguments) {
            env.bind_parameter(name, argument.clone());
        }
        for name in variables {
            env.bind_variable(name, Variable::new());
        }
        for name in generators {
            env.bind_generated(name, generator.next_id());
        }
        env
    }

    pub fn bind_parameter(&mut self, name: impl Into<String>, value: Value) {
        self.parameters.insert(name.into(), value);
    }

    pub fn bind_variable(&mut self, name: impl Into<String>, cell: Variable) {
        self.variables.insert(name.into(), cell);
    }

    pub fn bind_generated(&mut self, name: impl Into<String>, id: StateId) {
        self.generators.insert(name.into(), id);
    }

    /// Binding of a name, honoring variable > generator > parameter.
    pub fn lookup(&self, name: &str) -> Option<Binding<'_>> {
        if let Some(cell) = self.variables.get(name) {
            return Some(Binding::Variable(cell));
        }
        if let Some(id) = self.generators.get(name) {
            return Some(Binding::Generated(*id));
        }
        self.parameters.get(name).map(Binding::Parameter)
    }

    /// Identifier minted for a generator in this invocation.
    pub fn generated(&self, name: &str) -> Option<StateId> {
        self.generators.get(name).copied()
    }

    /// Cell allocated for a free variable in this invocation.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    pub fn resolve(&self, name: &str, wrap: Wrap) -> Value {
        wrap.apply(self.lookup(name), name)
    }

    /// Resolve an adaptive action call: the name as a reference, every
    /// argument with the same precedence, passed through.
    pub fn resolve_call(&self, call: &ActionCallSpec) -> ActionRef {
        let name = call.name.as_deref().unwrap_or_default();
        ActionRef::new(
            self.resolve(name, Wrap::Reference),
            call.arguments
                .iter()
                .map(|argument| self.resolve(argument, Wrap::PassThrough))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> Environment {
        let mut env = Environment::new();
        env.bind_parameter("p", Value::literal("7"));
        env.bind_parameter("s", Value::symbol("z"));
        env.bind_generated("g*", 40);
        env
    }

    #[test]
    fn literal_fallback_wraps_per_site() {
        let env = env();
        assert_eq!(env.resolve("5", Wrap::State), Value::state("5"));
        assert_eq!(env.resolve("a", Wrap::Symbol), Value::symbol("a"));
        assert_eq!(env.resolve("M", Wrap::Call), Value::call(Value::literal("M")));
        assert_eq!(env.resolve("f", Wrap::Reference), Value::literal("f"));
        assert_eq!(env.resolve("x", Wrap::PassThrough), Value::literal("x"));
    }

    #[test]
    fn parameters_wrap_as_states_and_symbols() {
        let env = env();
        assert_eq!(env.resolve("p", Wrap::State), Value::state("7"));
        assert_eq!(env.resolve("s", Wrap::Symbol), Value::symbol("z"));
        assert_eq!(env.resolve("p", Wrap::Symbol), Value::symbol("7"));
        assert_eq!(env.resolve("p", Wrap::PassThrough), Value::literal("7"));
        assert_eq!(env.resolve("p", Wrap::Call), Value::call(Value::literal("7")));
    }

    #[test]
    fn generators_wrap_the_minted_id() {
        let env = env();
        assert_eq!(env.resolve("g*", Wrap::State), Value::state("40"));
        assert_eq!(env.resolve("g*", Wrap::PassThrough), Value::state("40"));
        assert_eq!(env.resolve("g*", Wrap::Symbol), Value::symbol("40"));
        assert_eq!(env.resolve("g*", Wrap::Reference), Value::literal("40"));
    }

    #[test]
    fn variables_reuse_their_cell_everywhere() {
        let mut env = env();
        let cell = Variable::new();
        env.bind_variable("?x", cell.clone());

        let expected = Value::Variable(cell);
        assert_eq!(env.resolve("?x", Wrap::State), expected);
        assert_eq!(env.resolve("?x", Wrap::Symbol), expected);
        assert_eq!(env.resolve("?x", Wrap::Reference), expected);
        assert_eq!(env.resolve("?x", Wrap::Call), Value::call(expected));
    }

    #[test]
    fn variable_beats_parameter_and_generator_beats_parameter() {
        let mut env = Environment::new();
        let cell = Variable::new();
        env.bind_parameter("?x", Value::literal("1"));
        env.bind_variable("?x", cell.clone());
        env.bind_parameter("g*", Value::literal("2"));
        env.bind_generated("g*", 9);

        assert_eq!(env.lookup("?x"), Some(Binding::Variable(&cell)));
        assert_eq!(env.lookup("g*"), Some(Binding::Generated(9)));
        assert_eq!(env.lookup("other"), None);
    }

    #[test]
    fn bind_mints_one_state_per_generator_in_order() {
        let generator = StateGenerator::starting_at(3);
        let env = Environment::bind(
            &["p".to_string(), "q".to_string()],
            &["?x".to_string()],
            &["a*".to_string(), "b*".to_string()],
            &[Value::literal("1")],
            &generator,
        );

        assert_eq!(env.generated("a*"), Some(3));
        assert_eq!(env.generated("b*"), Some(4));
        assert_eq!(generator.peek(), 5);
        assert!(env.variable("?x").is_some_and(|cell| !cell.is_bound()));
        assert_eq!(env.lookup("p"), Some(Binding::Parameter(&Value::literal("1"))));
        assert_eq!(env.lookup("q"), None);
    }

    #[test]
    fn calls_resolve_name_and_arguments() {
        let mut env = env();
        let cell = Variable::new();
        env.bind_variable("?x", cell.clone());
        let call = ActionCallSpec::new("f", ["p", "g*", "?x", "lit"]);

        let reference = env.resolve_call(&call);
        assert_eq!(*reference.name, Value::literal("f"));
        assert_eq!(
            reference.arguments,
            vec![
                Value::literal("7"),
                Value::state("40"),
                Value::Variable(cell),
                Value::literal("lit"),
            ]
        );
    }

    #[test]
    fn call_name_bound_to_parameter_uses_the_argument() {
        let mut env = Environment::new();
        env.bind_parameter("h", Value::literal("grow"));
        let reference = env.resolve_call(&ActionCallSpec::new("h", Vec::<String>::new()));

        assert_eq!(*reference.name, Value::literal("grow"));
        assert!(reference.arguments.is_empty());
    }
}
