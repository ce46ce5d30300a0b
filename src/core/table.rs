//! The transition table mutated by adaptive actions.

use super::value::{ActionRef, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One transition tuple: `(pre, from, middle, to, post)`.
///
/// `middle` is a symbol, a submachine call or [`Value::Epsilon`]. The action
/// references are optional; an entry without them is a plain 3-tuple.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionEntry {
    #[serde(default)]
    pub pre: Option<ActionRef>,
    pub from: Value,
    pub middle: Value,
    pub to: Value,
    #[serde(default)]
    pub post: Option<ActionRef>,
}

impl TransitionEntry {
    pub fn new(from: Value, middle: Value, to: Value) -> Self {
        Self {
            pre: None,
            from,
            middle,
            to,
            post: None,
        }
    }

    pub fn with_pre(mut self, pre: ActionRef) -> Self {
        self.pre = Some(pre);
        self
    }

    pub fn with_post(mut self, post: ActionRef) -> Self {
        self.post = Some(post);
        self
    }

    /// Number of tuple components: 3, 4 or 5.
    pub fn arity(&self) -> usize {
        3 + usize::from(self.pre.is_some()) + usize::from(self.post.is_some())
    }

    /// Copy with every bound cell replaced by its value.
    pub fn resolved(&self) -> Self {
        Self {
            pre: self.pre.as_ref().map(ActionRef::resolved),
            from: self.from.resolved(),
            middle: self.middle.resolved(),
            to: self.to.resolved(),
            post: self.post.as_ref().map(ActionRef::resolved),
        }
    }

    /// Whether this entry, used as a pattern, matches a stored entry.
    ///
    /// Action references only match when both sides carry them.
    pub fn matches(&self, stored: &TransitionEntry) -> bool {
        let actions = |a: &Option<ActionRef>, b: &Option<ActionRef>| match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => a.matches(b),
            _ => false,
        };
        actions(&self.pre, &stored.pre)
            && self.from.matches(&stored.from)
            && self.middle.matches(&stored.middle)
            && self.to.matches(&stored.to)
            && actions(&self.post, &stored.post)
    }

    /// Bind the unbound cells of this pattern from a matching stored entry.
    pub fn bind_from(&self, stored: &TransitionEntry) {
        if let (Some(pre), Some(other)) = (&self.pre, &stored.pre) {
            pre.bind_from(other);
        }
        self.from.bind_from(&stored.from);
        self.middle.bind_from(&stored.middle);
        self.to.bind_from(&stored.to);
        if let (Some(post), Some(other)) = (&self.post, &stored.post) {
            post.bind_from(other);
        }
    }
}

impl fmt::Display for TransitionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        if let Some(pre) = &self.pre {
            write!(f, "{}, ", pre)?;
        }
        write!(f, "{}, {}, {}", self.from, self.middle, self.to)?;
        if let Some(post) = &self.post {
            write!(f, ", {}", post)?;
        }
        f.write_str(")")
    }
}

/// Elementary operations the interpreter issues against a transition table.
///
/// Binding free variables through `query` and `remove` is the table's
/// business; callers only see whether something matched.
pub trait TransitionTable {
    /// Insert an entry. Returns false if an equal entry was already present.
    fn add(&mut self, entry: TransitionEntry) -> bool;

    /// Delete every entry matching the pattern, returning how many went away.
    fn remove(&mut self, pattern: &TransitionEntry) -> usize;

    /// Test for a matching entry without mutating the table.
    fn query(&self, pattern: &TransitionEntry) -> bool;

    /// Current entries, in insertion order.
    fn entries(&self) -> &[TransitionEntry];
}

/// In-memory transition table.
///
/// Unbound cells act as wildcards; `query` and `remove` bind the pattern's
/// unbound cells to the first matching entry.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Mapping {
    entries: Vec<TransitionEntry>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<TransitionEntry>) -> Self {
        let mut mapping = Self::new();
        for entry in entries {
            mapping.add(entry);
        }
        mapping
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an entry equal to `entry` (after resolution) is stored.
    pub fn contains(&self, entry: &TransitionEntry) -> bool {
        let entry = entry.resolved();
        self.entries.iter().any(|e| *e == entry)
    }

    /// Entries leaving the given state.
    pub fn outgoing<'a>(&'a self, state: &'a Value) -> impl Iterator<Item = &'a TransitionEntry> {
        self.entries.iter().filter(move |e| e.from == *state)
    }
}

impl TransitionTable for Mapping {
    fn add(&mut self, entry: TransitionEntry) -> bool {
        let entry = entry.resolved();
        if self.entries.contains(&entry) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    fn remove(&mut self, pattern: &TransitionEntry) -> usize {
        let (removed, kept): (Vec<_>, Vec<_>) = self
            .entries
            .drain(..)
            .partition(|entry| pattern.matches(entry));
        self.entries = kept;
        if let Some(first) = removed.first() {
            pattern.bind_from(first);
        }
        removed.len()
    }

    fn query(&self, pattern: &TransitionEntry) -> bool {
        match self.entries.iter().find(|entry| pattern.matches(entry)) {
            Some(entry) => {
                pattern.bind_from(entry);
                true
            }
            None => false,
        }
    }

    fn entries(&self) -> &[TransitionEntry] {
        &self.entries
    }
}
