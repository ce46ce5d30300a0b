//! Checkpoint and resume for built automatons.
//!
//! A checkpoint captures what adaptive actions change at runtime: the
//! transition table and the generator counter. Interpreters are rebuilt from
//! the [`AutomatonSpec`](crate::spec::AutomatonSpec), so they are not part of it.
//!
//! # Example
//!
//! ```rust
//! use adaptive_spec::builder::build;
//! use adaptive_spec::checkpoint::Checkpoint;
//! use adaptive_spec::spec::{AutomatonSpec, StateSpec, SubmachineSpec, TransitionSpec};
//!
//! let spec = AutomatonSpec {
//!     transitions: vec![TransitionSpec::new("1", "2").with_symbol("a")],
//!     submachines: vec![SubmachineSpec::new("M")
//!         .main()
//!         .state(StateSpec::new("1").start())
//!         .state(StateSpec::new("2").accepting())],
//!     actions: vec![],
//! };
//! let automaton = build(&spec);
//!
//! let json = Checkpoint::capture(&automaton).to_json().unwrap();
//! let mut resumed = build(&spec);
//! Checkpoint::from_json(&json).unwrap().restore_into(&mut resumed).unwrap();
//! assert_eq!(resumed.entries(), automaton.entries());
//! ```

pub mod error;

pub use error::CheckpointError;

use crate::builder::AdaptiveAutomaton;
use crate::core::TransitionEntry;
use crate::spec::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a runtime automaton's mutable state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Transition table, in insertion order
    pub entries: Vec<TransitionEntry>,

    /// Identifier the generator mints next
    pub generator_next: StateId,

    /// Main submachine of the automaton the checkpoint came from
    pub main: Option<String>,
}

impl Checkpoint {
    pub fn capture(automaton: &AdaptiveAutomaton) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            entries: automaton.entries(),
            generator_next: automaton.generator().peek(),
            main: automaton.main().map(str::to_string),
        }
    }

    /// Reset `automaton` to the captured table and counter.
    ///
    /// The automaton must be built from the same description; a different main
    /// submachine is rejected and leaves it untouched.
    pub fn restore_into(self, automaton: &mut AdaptiveAutomaton) -> Result<(), CheckpointError> {
        self.check_version()?;
        if self.main.as_deref() != automaton.main() {
            return Err(CheckpointError::MainMismatch {
                found: self.main,
                expected: automaton.main().map(str::to_string),
            });
        }

        info!(
            checkpoint = %self.id,
            entries = self.entries.len(),
            generator_next = self.generator_next,
            "restoring checkpoint"
        );
        automaton.restore(self.entries, self.generator_next);
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    fn check_version(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::core::Value;
    use crate::spec::{
        ActionCallSpec, AdaptiveActionSpec, AutomatonSpec, ElementaryActionSpec, StateSpec,
        SubmachineSpec, TransitionSpec,
    };

    fn spec() -> AutomatonSpec {
        AutomatonSpec {
            transitions: vec![
                TransitionSpec::new("1", "2")
                    .with_symbol("a")
                    .with_post_action(ActionCallSpec::new("grow", ["2"])),
                TransitionSpec::new("2", "1").with_symbol("b"),
            ],
            submachines: vec![SubmachineSpec::new("M")
                .main()
                .state(StateSpec::new("1").start())
                .state(StateSpec::new("2").accepting())],
            actions: vec![AdaptiveActionSpec::new("grow")
                .parameter("p")
                .generator("g*")
                .step(ElementaryActionSpec::add("p", "g*").with_symbol("a"))],
        }
    }

    fn adapted() -> AdaptiveAutomaton {
        let mut automaton = build(&spec());
        let current = automaton.entries()[0].clone();
        automaton.fire_posterior(&current).unwrap();
        automaton
    }

    #[test]
    fn capture_records_table_and_counter() {
        let checkpoint = Checkpoint::capture(&adapted());

        assert_eq!(checkpoint.version, CHECKPOINT_VERSION);
        assert_eq!(checkpoint.entries.len(), 3);
        assert_eq!(checkpoint.generator_next, 4);
        assert_eq!(checkpoint.main.as_deref(), Some("M"));
    }

    #[test]
    fn json_round_trip_restores_state() {
        let original = adapted();
        let json = Checkpoint::capture(&original).to_json().unwrap();

        let mut resumed = build(&spec());
        Checkpoint::from_json(&json)
            .unwrap()
            .restore_into(&mut resumed)
            .unwrap();

        assert_eq!(resumed.entries(), original.entries());
        assert_eq!(resumed.generator().peek(), 4);
    }

    #[test]
    fn binary_round_trip_keeps_action_references() {
        let original = adapted();
        let bytes = Checkpoint::capture(&original).to_binary().unwrap();
        let restored = Checkpoint::from_binary(&bytes).unwrap();

        assert_eq!(restored.entries, original.entries());
        assert!(restored.entries[0].post.is_some());
        assert!(restored.entries[1].pre.is_none());
    }

    #[test]
    fn resumed_generator_continues_minting() {
        let checkpoint = Checkpoint::capture(&adapted());
        let mut resumed = build(&spec());
        checkpoint.restore_into(&mut resumed).unwrap();

        let current = resumed.entries()[0].clone();
        resumed.fire_posterior(&current).unwrap();
        assert!(resumed.entries().iter().any(|e| e.to == Value::state("4")));
    }

    #[test]
    fn rejects_unsupported_version() {
        let mut checkpoint = Checkpoint::capture(&adapted());
        checkpoint.version = 99;
        let json = serde_json::to_string(&checkpoint).unwrap();

        match Checkpoint::from_json(&json) {
            Err(CheckpointError::UnsupportedVersion { found, supported }) => {
                assert_eq!(found, 99);
                assert_eq!(supported, CHECKPOINT_VERSION);
            }
            other => panic!("expected version error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            Checkpoint::from_json("not json"),
            Err(CheckpointError::DeserializationFailed(_))
        ));
        assert!(matches!(
            Checkpoint::from_binary(&[1, 2, 3]),
            Err(CheckpointError::DeserializationFailed(_))
        ));
    }

    #[test]
    fn rejects_other_main_submachine() {
        let mut checkpoint = Checkpoint::capture(&adapted());
        checkpoint.main = Some("N".into());

        let mut target = build(&spec());
        let result = checkpoint.restore_into(&mut target);

        assert!(matches!(result, Err(CheckpointError::MainMismatch { .. })));
        assert_eq!(target.entries().len(), 2);
    }
}
