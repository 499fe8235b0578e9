//! Core match types: identifiers, cards, players, state, commands, events, RNG,
//! configuration.
//!
//! Everything here is plain data. Rules live in `rules`; sharing and
//! sequencing live in `store`.

pub mod entity;
pub mod card;
pub mod player;
pub mod rng;
pub mod config;
pub mod command;
pub mod event;
pub mod state;

pub use entity::{MatchId, PlayerId};
pub use card::{Ally, Hero};
pub use player::{LocationState, PlayerState};
pub use rng::{entropy_seed, GameRng, RngState};
pub use config::MatchConfig;
pub use command::Command;
pub use event::{DomainEvent, Events};
pub use state::GameState;
