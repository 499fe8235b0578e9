//! Match rules.
//!
//! - `invariants`: structural checks run before and after every transition
//! - `objectives`: per-villain win conditions
//! - `commands`: what each command does to a state
//! - `reducer`: validate, execute, fold, validate

pub mod invariants;
pub mod objectives;
pub mod commands;
pub mod reducer;

pub use invariants::{validate, Collection, InvariantViolation};
pub use objectives::{Objective, ObjectiveRegistry, PrinceJohn};
pub use reducer::{reduce, Reducer};
