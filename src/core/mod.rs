//! Runtime data the interpreter and builder work on.
//!
//! This module contains the values stored in the transition table, the
//! table itself, the shared generator counter and the adaptation history.

mod generator;
mod history;
mod table;
mod value;

pub use generator::StateGenerator;
pub use history::{AdaptationHistory, AdaptationStep};
pub use table::{Mapping, TransitionEntry, TransitionTable};
pub use value::{ActionRef, Value, Variable};
