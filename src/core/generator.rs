//! Process-wide source of fresh state identifiers.

use crate::spec::StateId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::warn;

/// Monotonic counter minting fresh state identifiers for generators.
///
/// Clones share the counter, so the handle can be threaded into every
/// interpreter invocation. Increments are atomic.
///
/// # Example
///
/// ```rust
/// use adaptive_spec::core::StateGenerator;
///
/// let generator = StateGenerator::new();
/// generator.seed(3);
/// let shared = generator.clone();
///
/// assert_eq!(generator.next_id(), 3);
/// assert_eq!(shared.next_id(), 4);
/// assert_eq!(generator.peek(), 5);
/// ```
#[derive(Clone, Debug)]
pub struct StateGenerator {
    next: Arc<AtomicU64>,
}

impl StateGenerator {
    /// Create a counter starting at 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: StateId) -> Self {
        Self {
            next: Arc::new(AtomicU64::new(first)),
        }
    }

    /// Set the next identifier to mint. Only the builder seeds.
    pub fn seed(&self, next: StateId) {
        self.next.store(next, Ordering::SeqCst);
    }

    /// Mint a fresh identifier.
    ///
    /// The counter never wraps: once `StateId::MAX` is minted it stays there
    /// and further calls repeat it.
    pub fn next_id(&self) -> StateId {
        match self
            .next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_add(1))
        {
            Ok(minted) => minted,
            Err(exhausted) => {
                warn!(id = exhausted, "state identifier space exhausted");
                exhausted
            }
        }
    }

    /// Identifier the next call to [`StateGenerator::next_id`] will return.
    pub fn peek(&self) -> StateId {
        self.next.load(Ordering::SeqCst)
    }
}

impl Default for StateGenerator {
    fn default() -> Self {
        Self::new()
    }
}
