//! # villain-match
//!
//! Authoritative, deterministic match engine for a multiplayer villain card
//! game.
//!
//! ## Design Principles
//!
//! 1. **Pure Transitions**: `reduce(state, command)` never mutates its input
//!    and returns the successor state plus the events it emitted.
//!
//! 2. **Reproducible Randomness**: RNG progress is part of the state
//!    (`seed`, `draws`), so replaying the same commands from the same initial
//!    state yields byte-identical results.
//!
//! 3. **Exactly Once**: every `(player, client_seq)` pair is processed at most
//!    once per match, under the same lock that swaps the state.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) cloning via `im-rs` so each
//!   transition works on a cheap copy.
//!
//! - **Per-Match Locking**: the match table is only locked to look up a
//!   match; each match serializes its own commands.
//!
//! ## Modules
//!
//! - `core`: Identifiers, cards, players, state, commands, events, RNG, configuration
//! - `rules`: Invariant validator, command semantics, objectives, reducer
//! - `store`: Match table, command intake, error taxonomy, wire shapes
//! - `hub`: Per-connection state pushes and rejections

pub mod core;
pub mod rules;
pub mod store;
pub mod hub;

// Re-export commonly used types
pub use crate::core::{
    MatchId, PlayerId,
    Hero, Ally, LocationState, PlayerState,
    GameRng, RngState,
    Command, DomainEvent, Events,
    GameState, MatchConfig,
};

pub use crate::rules::{reduce, validate, Collection, InvariantViolation, Objective, ObjectiveRegistry, PrinceJohn, Reducer};

pub use crate::store::{
    CommandAccepted, CreateMatchRequest, CreateMatchResponse,
    DispatchError, Dispatcher, GameStateView, PlayerStateView,
    Problem, SubmitCommandRequest, Subscription,
};

pub use crate::hub::{Connection, ConnectionId, ServerMessage};
