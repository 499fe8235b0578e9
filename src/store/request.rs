//! Request and response shapes shared by every transport.
//!
//! Field names are camelCase on the wire. Submit-command payloads are a type
//! tag plus optional fields; [`SubmitCommandRequest::to_command`] turns them
//! into a [`Command`] or rejects them at the boundary.

use serde::{Deserialize, Serialize};

use crate::core::{Command, DomainEvent, GameState, LocationState, MatchId, PlayerId, PlayerState};

/// Create a match for a list of villains.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMatchRequest {
    #[serde(default)]
    pub villains: Vec<String>,
}

impl CreateMatchRequest {
    /// Create a request from villain names.
    pub fn new<S: Into<String>>(villains: impl IntoIterator<Item = S>) -> Self {
        Self {
            villains: villains.into_iter().map(Into::into).collect(),
        }
    }

    /// Trimmed villain names, or `None` if fewer than two, any blank, or any
    /// duplicate after trimming.
    #[must_use]
    pub fn normalized_villains(&self) -> Option<Vec<String>> {
        let villains: Vec<String> = self.villains.iter().map(|v| v.trim().to_string()).collect();

        if villains.len() < 2 || villains.iter().any(String::is_empty) {
            return None;
        }
        for (i, villain) in villains.iter().enumerate() {
            if villains[i + 1..].contains(villain) {
                return None;
            }
        }

        Some(villains)
    }
}

/// Identifier of a newly created match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchResponse {
    pub match_id: MatchId,
}

/// A command submission: type tag, acting player, client sequence number and
/// whatever fields the type needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitCommandRequest {
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default = "PlayerId::nil")]
    pub player_id: PlayerId,

    #[serde(default)]
    pub client_seq: i64,

    #[serde(default)]
    pub target_player_id: Option<PlayerId>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub hero: Option<String>,

    #[serde(default)]
    pub card: Option<String>,
}

impl SubmitCommandRequest {
    /// Create a request with no optional fields.
    pub fn new(kind: impl Into<String>, player: PlayerId, client_seq: i64) -> Self {
        Self {
            kind: kind.into(),
            player_id: player,
            client_seq,
            target_player_id: None,
            location: None,
            hero: None,
            card: None,
        }
    }

    /// `RollDie` request.
    pub fn roll_die(player: PlayerId, client_seq: i64) -> Self {
        Self::new("RollDie", player, client_seq)
    }

    /// `Vanquish` request.
    pub fn vanquish(player: PlayerId, client_seq: i64, location: impl Into<String>, hero: impl Into<String>) -> Self {
        Self::new("Vanquish", player, client_seq)
            .with_location(location)
            .with_hero(hero)
    }

    /// `Fate` request.
    pub fn fate(player: PlayerId, client_seq: i64, target: PlayerId, card: impl Into<String>) -> Self {
        Self::new("Fate", player, client_seq)
            .with_target(target)
            .with_card(card)
    }

    /// `CheckObjective` request.
    pub fn check_objective(player: PlayerId, client_seq: i64) -> Self {
        Self::new("CheckObjective", player, client_seq)
    }

    /// Set the target player (builder pattern).
    #[must_use]
    pub fn with_target(mut self, target: PlayerId) -> Self {
        self.target_player_id = Some(target);
        self
    }

    /// Set the location (builder pattern).
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the hero (builder pattern).
    #[must_use]
    pub fn with_hero(mut self, hero: impl Into<String>) -> Self {
        self.hero = Some(hero.into());
        self
    }

    /// Set the card (builder pattern).
    #[must_use]
    pub fn with_card(mut self, card: impl Into<String>) -> Self {
        self.card = Some(card.into());
        self
    }

    /// Build the command this request describes.
    ///
    /// The type tag and string fields are trimmed first. Returns `None` for an
    /// unknown type or when a field the type requires is absent or blank.
    #[must_use]
    pub fn to_command(&self) -> Option<Command> {
        let player = self.player_id;

        match self.kind.trim() {
            "RollDie" => Some(Command::RollDie { player }),
            "Vanquish" => Some(Command::Vanquish {
                player,
                location: required(&self.location)?,
                hero: required(&self.hero)?,
            }),
            "Fate" => Some(Command::Fate {
                player,
                target: self.target_player_id?,
                card: required(&self.card)?,
            }),
            "CheckObjective" => Some(Command::CheckObjective { player }),
            _ => None,
        }
    }
}

fn required(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Acknowledgement of an accepted command.
///
/// `events` is empty when the command was legal but had no effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandAccepted {
    pub match_id: MatchId,
    pub client_seq: u64,
    pub events: Vec<DomainEvent>,
}

/// Public projection of a player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStateView {
    pub id: PlayerId,
    pub villain: String,
    pub power: i32,
    pub locations: Vec<LocationState>,
    pub villain_deck_count: i32,
    pub fate_deck_count: i32,
}

impl From<&PlayerState> for PlayerStateView {
    fn from(player: &PlayerState) -> Self {
        Self {
            id: player.id,
            villain: player.villain.clone(),
            power: player.power,
            locations: player.locations().cloned().collect(),
            villain_deck_count: player.villain_deck_count,
            fate_deck_count: player.fate_deck_count,
        }
    }
}

/// Public projection of a match, pushed to subscribers after every change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateView {
    pub match_id: MatchId,
    pub players: Vec<PlayerStateView>,
    pub current_player_index: usize,
    pub turn: u32,
}

impl From<&GameState> for GameStateView {
    fn from(state: &GameState) -> Self {
        Self {
            match_id: state.match_id,
            players: state.players.iter().map(PlayerStateView::from).collect(),
            current_player_index: state.current_player_index,
            turn: state.turn,
        }
    }
}
