//! Player commands.
//!
//! A command states what a player wants to do. Each variant carries exactly
//! the fields it needs; requests missing a required field never become a
//! `Command` (see `store::request`). All interpretation happens in the reducer.

use serde::{Deserialize, Serialize};

use super::entity::PlayerId;

/// A player intent.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Roll a six-sided die.
    RollDie { player: PlayerId },

    /// Defeat a hero at one of the player's locations using the allies there.
    Vanquish {
        player: PlayerId,
        location: String,
        hero: String,
    },

    /// Play a fate card against another player.
    Fate {
        player: PlayerId,
        target: PlayerId,
        card: String,
    },

    /// Check whether the player's villain objective is met.
    CheckObjective { player: PlayerId },
}

impl Command {
    /// The acting player.
    #[must_use]
    pub fn player(&self) -> PlayerId {
        match self {
            Command::RollDie { player }
            | Command::Vanquish { player, .. }
            | Command::Fate { player, .. }
            | Command::CheckObjective { player } => *player,
        }
    }

    /// Wire name of the command type.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Command::RollDie { .. } => "RollDie",
            Command::Vanquish { .. } => "Vanquish",
            Command::Fate { .. } => "Fate",
            Command::CheckObjective { .. } => "CheckObjective",
        }
    }
}
