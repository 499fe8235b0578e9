//! Domain events.
//!
//! Events are immutable facts emitted by the reducer. They are the unit of a
//! match's replay log: once appended they are never mutated or removed.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::entity::PlayerId;

/// Something that happened in a match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DomainEvent {
    /// A player rolled a die.
    DieRolled { player: PlayerId, value: u8 },

    /// A hero was defeated and left the location.
    HeroVanquished {
        player: PlayerId,
        location: String,
        hero: String,
    },

    /// A fate card was played against a target player.
    FateCardRevealed { target: PlayerId, card: String },

    /// A player met their villain's objective.
    ObjectiveAchieved { player: PlayerId },
}

impl DomainEvent {
    /// The player the event is about.
    #[must_use]
    pub fn player(&self) -> PlayerId {
        match self {
            DomainEvent::DieRolled { player, .. }
            | DomainEvent::HeroVanquished { player, .. }
            | DomainEvent::ObjectiveAchieved { player } => *player,
            DomainEvent::FateCardRevealed { target, .. } => *target,
        }
    }

    /// Stable event name, used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            DomainEvent::DieRolled { .. } => "DieRolled",
            DomainEvent::HeroVanquished { .. } => "HeroVanquished",
            DomainEvent::FateCardRevealed { .. } => "FateCardRevealed",
            DomainEvent::ObjectiveAchieved { .. } => "ObjectiveAchieved",
        }
    }
}

/// Events emitted by one command. Commands emit at most one event today.
pub type Events = SmallVec<[DomainEvent; 2]>;
