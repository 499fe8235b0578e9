//! Match state: the immutable snapshot of one match.
//!
//! ## GameState
//!
//! - Match identifier
//! - Players in turn order (fixed at creation)
//! - Current player index and turn counter
//! - RNG progress as plain data
//!
//! A `GameState` value is never mutated once published. The reducer clones
//! it, folds the emitted events into the clone with [`GameState::apply`] and
//! publishes the result. Collections are `im` persistent vectors, so the clone
//! is O(1) and snapshots handed to subscribers share structure with the live
//! state.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::entity::{MatchId, PlayerId};
use super::event::DomainEvent;
use super::player::PlayerState;
use super::rng::RngState;

/// Complete state of one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub match_id: MatchId,

    /// Players in turn order.
    pub players: Vector<PlayerState>,

    /// Index into `players` of the player whose turn it is.
    pub current_player_index: usize,

    /// Turn counter (starts at 0).
    pub turn: u32,

    /// Deterministic RNG progress.
    pub rng: RngState,
}

impl GameState {
    /// Create the initial state of a match.
    ///
    /// ## Defaults
    ///
    /// - `current_player_index`: 0
    /// - `turn`: 0
    /// - `rng`: fresh state for `seed`
    pub fn new(match_id: MatchId, players: impl IntoIterator<Item = PlayerState>, seed: u64) -> Self {
        Self {
            match_id,
            players: players.into_iter().collect(),
            current_player_index: 0,
            turn: 0,
            rng: RngState::new(seed),
        }
    }

    /// Get player count.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Find a player by ID.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Find a player by ID for mutation.
    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut PlayerState> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Check whether a player takes part in this match.
    #[must_use]
    pub fn has_player(&self, id: PlayerId) -> bool {
        self.player(id).is_some()
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> Option<&PlayerState> {
        self.players.get(self.current_player_index)
    }

    /// Iterate over player IDs in turn order.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().map(|p| p.id)
    }

    // === Event Folding ===

    /// Fold one event's effect into this state.
    ///
    /// - `DieRolled`: consumes one RNG draw
    /// - `HeroVanquished`: removes the first hero with that name from the location
    /// - `FateCardRevealed`, `ObjectiveAchieved`: no board change
    pub fn apply(&mut self, event: &DomainEvent) {
        match event {
            DomainEvent::DieRolled { .. } => {
                self.rng = self.rng.advanced();
            }
            DomainEvent::HeroVanquished {
                player,
                location,
                hero,
            } => {
                if let Some(location) = self
                    .player_mut(*player)
                    .and_then(|p| p.location_mut(location))
                {
                    location.remove_hero(hero);
                }
            }
            DomainEvent::FateCardRevealed { .. } | DomainEvent::ObjectiveAchieved { .. } => {}
        }
    }

    /// Fold a sequence of events over an initial state.
    #[must_use]
    pub fn replay<'a>(initial: &GameState, events: impl IntoIterator<Item = &'a DomainEvent>) -> Self {
        let mut state = initial.clone();
        for event in events {
            state.apply(event);
        }
        state
    }

    // === Encoding ===

    /// Encode the snapshot to its canonical byte image.
    pub fn encode(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }
}
