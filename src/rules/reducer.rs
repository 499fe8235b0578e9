//! The match reducer: `(state, command) -> (next state, events)`.
//!
//! ## Steps
//!
//! 1. Validate the current state
//! 2. Execute the command against it, producing events
//! 3. Fold each event into a clone of the state
//! 4. Validate the successor
//!
//! The only randomness is the RNG state carried in the snapshot, so replaying
//! the same commands from the same initial state reproduces the same events
//! and the same final state byte for byte.

use std::sync::OnceLock;

use crate::core::{Command, Events, GameState};

use super::commands;
use super::invariants::{validate, InvariantViolation};
use super::objectives::ObjectiveRegistry;

/// Reducer with its objective table.
#[derive(Debug, Default)]
pub struct Reducer {
    objectives: ObjectiveRegistry,
}

impl Reducer {
    /// Create a reducer using the given objectives.
    #[must_use]
    pub fn new(objectives: ObjectiveRegistry) -> Self {
        Self { objectives }
    }

    /// Reducer with every built-in objective.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(ObjectiveRegistry::standard())
    }

    /// Get the objective table.
    #[must_use]
    pub fn objectives(&self) -> &ObjectiveRegistry {
        &self.objectives
    }

    /// Apply a command to a state.
    ///
    /// Returns the successor state and the events in emission order. The input
    /// state is left untouched.
    pub fn reduce(&self, state: &GameState, command: &Command) -> Result<(GameState, Events), InvariantViolation> {
        validate(state)?;

        let events = commands::execute(command, state, &self.objectives);

        let mut next = state.clone();
        for event in &events {
            next.apply(event);
        }

        validate(&next)?;
        Ok((next, events))
    }
}

/// Apply a command using the built-in objectives.
pub fn reduce(state: &GameState, command: &Command) -> Result<(GameState, Events), InvariantViolation> {
    static STANDARD: OnceLock<Reducer> = OnceLock::new();
    STANDARD.get_or_init(Reducer::standard).reduce(state, command)
}
