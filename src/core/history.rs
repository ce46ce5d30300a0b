//! History of elementary operations applied to a transition table.
//!
//! Provides immutable tracking of adaptations over time, one record per
//! elementary action executed by an adaptive action.

use super::table::TransitionEntry;
use crate::spec::ElementaryKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single elementary operation.
///
/// # Example
///
/// ```rust
/// use adaptive_spec::core::{AdaptationStep, TransitionEntry, Value};
/// use adaptive_spec::spec::ElementaryKind;
/// use chrono::Utc;
///
/// let step = AdaptationStep {
///     action: "grow".to_string(),
///     kind: ElementaryKind::Add,
///     entry: TransitionEntry::new(Value::state("1"), Value::symbol("a"), Value::state("3")),
///     matched: true,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(step.entry.arity(), 3);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdaptationStep {
    /// Adaptive action that issued the operation
    pub action: String,
    pub kind: ElementaryKind,
    /// Tuple as it was resolved when the operation ran
    pub entry: TransitionEntry,
    /// Whether the table changed (add, remove) or a match was found (query)
    pub matched: bool,
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of adaptations.
///
/// History is immutable - the `record` method returns a new history with the
/// step added.
///
/// # Example
///
/// ```rust
/// use adaptive_spec::core::{AdaptationHistory, AdaptationStep, TransitionEntry, Value};
/// use adaptive_spec::spec::ElementaryKind;
/// use chrono::Utc;
///
/// let history = AdaptationHistory::new();
/// let step = AdaptationStep {
///     action: "grow".to_string(),
///     kind: ElementaryKind::Query,
///     entry: TransitionEntry::new(Value::state("1"), Value::Epsilon, Value::state("2")),
///     matched: false,
///     timestamp: Utc::now(),
/// };
///
/// let updated = history.record(step);
/// assert_eq!(updated.steps().len(), 1);
/// assert_eq!(history.steps().len(), 0); // Original unchanged
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AdaptationHistory {
    steps: Vec<AdaptationStep>,
}

impl AdaptationHistory {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Record a step, returning a new history.
    pub fn record(&self, step: AdaptationStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }

    /// All steps, in execution order.
    pub fn steps(&self) -> &[AdaptationStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps issued by the named adaptive action.
    pub fn for_action<'a>(&'a self, action: &'a str) -> impl Iterator<Item = &'a AdaptationStep> {
        self.steps.iter().filter(move |s| s.action == action)
    }

    /// Steps of the given kind that matched.
    pub fn matched(&self, kind: ElementaryKind) -> usize {
        self.steps
            .iter()
            .filter(|s| s.kind == kind && s.matched)
            .count()
    }

    /// Time between the first and last step, `None` when empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.steps.first(), self.steps.last()) {
            last.timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok()
        } else {
            None
        }
    }
}
