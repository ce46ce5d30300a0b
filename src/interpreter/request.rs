//! Arity-tagged elementary operation requests and their dispatch.

use crate::core::{ActionRef, TransitionEntry, TransitionTable, Value};
use crate::spec::ElementaryKind;

/// A fully resolved elementary operation, tagged by its arity.
#[derive(Clone, Debug, PartialEq)]
pub enum ElementaryRequest {
    /// `(from, middle, to)`
    Triple { from: Value, middle: Value, to: Value },
    /// `(pre, from, middle, to)`
    WithPre {
        pre: ActionRef,
        from: Value,
        middle: Value,
        to: Value,
    },
    /// `(from, middle, to, post)`
    WithPost {
        from: Value,
        middle: Value,
        to: Value,
        post: ActionRef,
    },
    /// `(pre, from, middle, to, post)`
    Full {
        pre: ActionRef,
        from: Value,
        middle: Value,
        to: Value,
        post: ActionRef,
    },
}

impl ElementaryRequest {
    pub fn new(
        pre: Option<ActionRef>,
        from: Value,
        middle: Value,
        to: Value,
        post: Option<ActionRef>,
    ) -> Self {
        match (pre, post) {
            (None, None) => Self::Triple { from, middle, to },
            (Some(pre), None) => Self::WithPre {
                pre,
                from,
                middle,
                to,
            },
            (None, Some(post)) => Self::WithPost {
                from,
                middle,
                to,
                post,
            },
            (Some(pre), Some(post)) => Self::Full {
                pre,
                from,
                middle,
                to,
                post,
            },
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Self::Triple { .. } => 3,
            Self::WithPre { .. } | Self::WithPost { .. } => 4,
            Self::Full { .. } => 5,
        }
    }

    /// The tuple this request operates on.
    pub fn into_entry(self) -> TransitionEntry {
        match self {
            Self::Triple { from, middle, to } => TransitionEntry::new(from, middle, to),
            Self::WithPre {
                pre,
                from,
                middle,
                to,
            } => TransitionEntry::new(from, middle, to).with_pre(pre),
            Self::WithPost {
                from,
                middle,
                to,
                post,
            } => TransitionEntry::new(from, middle, to).with_post(post),
            Self::Full {
                pre,
                from,
                middle,
                to,
                post,
            } => TransitionEntry::new(from, middle, to)
                .with_pre(pre)
                .with_post(post),
        }
    }
}

/// What a dispatched request did.
#[derive(Clone, Debug, PartialEq)]
pub struct Dispatched {
    /// The tuple, resolved after the operation ran.
    pub entry: TransitionEntry,
    /// Inserted (add), removed at least one entry (remove), or found (query).
    pub matched: bool,
}

/// Issue one elementary request against the table.
pub fn dispatch(
    table: &mut dyn TransitionTable,
    kind: ElementaryKind,
    request: ElementaryRequest,
) -> Dispatched {
    let pattern = request.into_entry();
    let matched = match kind {
        ElementaryKind::Add => table.add(pattern.clone()),
        ElementaryKind::Remove => table.remove(&pattern) > 0,
        ElementaryKind::Query => table.query(&pattern),
    };
    Dispatched {
        entry: pattern.resolved(),
        matched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Mapping, Variable};

    fn triple() -> ElementaryRequest {
        ElementaryRequest::new(
            None,
            Value::state("1"),
            Value::symbol("a"),
            Value::state("2"),
            None,
        )
    }

    #[test]
    fn arity_follows_the_action_references() {
        let pre = || Some(ActionRef::named("f", ["1"]));
        let post = || Some(ActionRef::named("g", ["2"]));
        let request = |pre, post| {
            ElementaryRequest::new(pre, Value::state("1"), Value::Epsilon, Value::state("2"), post)
        };

        assert_eq!(request(None, None).arity(), 3);
        assert_eq!(request(pre(), None).arity(), 4);
        assert_eq!(request(None, post()).arity(), 4);
        assert!(matches!(request(pre(), None), ElementaryRequest::WithPre { .. }));
        assert!(matches!(request(None, post()), ElementaryRequest::WithPost { .. }));

        let full = request(pre(), post());
        assert_eq!(full.arity(), 5);
        let entry = full.into_entry();
        assert_eq!(entry.arity(), 5);
        assert_eq!(entry.to_string(), "(f(1), 1, ε, 2, g(2))");
    }

    #[test]
    fn dispatch_add_then_query_then_remove() {
        let mut table = Mapping::new();

        assert!(dispatch(&mut table, ElementaryKind::Add, triple()).matched);
        assert!(!dispatch(&mut table, ElementaryKind::Add, triple()).matched);
        assert!(dispatch(&mut table, ElementaryKind::Query, triple()).matched);
        assert_eq!(table.len(), 1);

        assert!(dispatch(&mut table, ElementaryKind::Remove, triple()).matched);
        assert!(table.is_empty());
        assert!(!dispatch(&mut table, ElementaryKind::Remove, triple()).matched);
        assert!(!dispatch(&mut table, ElementaryKind::Query, triple()).matched);
    }

    #[test]
    fn dispatched_entry_shows_query_bindings() {
        let mut table = Mapping::new();
        dispatch(&mut table, ElementaryKind::Add, triple());

        let target = Variable::new();
        let request = ElementaryRequest::new(
            None,
            Value::state("1"),
            Value::symbol("a"),
            Value::Variable(target.clone()),
            None,
        );
        let outcome = dispatch(&mut table, ElementaryKind::Query, request);

        assert!(outcome.matched);
        assert_eq!(outcome.entry.to, Value::state("2"));
        assert_eq!(target.value(), Some(Value::state("2")));
    }
}
