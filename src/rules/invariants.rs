//! Structural invariants checked on every transition.
//!
//! A violation means the engine or whoever built the state produced something
//! impossible. It is never a user error, and the transition that observed it
//! is aborted.

use thiserror::Error;

use crate::core::{GameState, PlayerId};

/// Which card collection a violation refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    Locations,
    Heroes,
    Allies,
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Collection::Locations => "locations",
            Collection::Heroes => "heroes",
            Collection::Allies => "allies",
        };
        write!(f, "{}", label)
    }
}

/// A broken structural invariant.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("match has no players")]
    NoPlayers,

    #[error("current player index {index} out of range for {count} players")]
    CurrentPlayerOutOfRange { index: usize, count: usize },

    #[error("{player} appears more than once")]
    DuplicatePlayer { player: PlayerId },

    #[error("{player}: power cannot be negative (was {value})")]
    NegativePower { player: PlayerId, value: i32 },

    #[error("{player}: villain deck count cannot be negative (was {value})")]
    NegativeVillainDeck { player: PlayerId, value: i32 },

    #[error("{player}: fate deck count cannot be negative (was {value})")]
    NegativeFateDeck { player: PlayerId, value: i32 },

    #[error("{player}: {collection} collection is absent{}", at(.location))]
    MissingCollection {
        player: PlayerId,
        location: Option<String>,
        collection: Collection,
    },

    #[error("{player}: {collection} at {location} contain an absent entry")]
    AbsentEntry {
        player: PlayerId,
        location: String,
        collection: Collection,
    },
}

fn at(location: &Option<String>) -> String {
    location
        .as_ref()
        .map(|l| format!(" at {}", l))
        .unwrap_or_default()
}

/// Validate a state.
///
/// Checks, in order: players present, current player index in range, unique
/// player IDs, then for each player: power, villain deck, fate deck, locations
/// present, and for each location heroes then allies present with no absent
/// entries. Returns the first violation found.
pub fn validate(state: &GameState) -> Result<(), InvariantViolation> {
    if state.players.is_empty() {
        return Err(InvariantViolation::NoPlayers);
    }

    if state.current_player_index >= state.players.len() {
        return Err(InvariantViolation::CurrentPlayerOutOfRange {
            index: state.current_player_index,
            count: state.players.len(),
        });
    }

    for (i, player) in state.players.iter().enumerate() {
        if state.players.iter().skip(i + 1).any(|p| p.id == player.id) {
            return Err(InvariantViolation::DuplicatePlayer { player: player.id });
        }
    }

    for player in &state.players {
        let id = player.id;

        if player.power < 0 {
            return Err(InvariantViolation::NegativePower { player: id, value: player.power });
        }
        if player.villain_deck_count < 0 {
            return Err(InvariantViolation::NegativeVillainDeck {
                player: id,
                value: player.villain_deck_count,
            });
        }
        if player.fate_deck_count < 0 {
            return Err(InvariantViolation::NegativeFateDeck {
                player: id,
                value: player.fate_deck_count,
            });
        }

        let Some(locations) = &player.locations else {
            return Err(InvariantViolation::MissingCollection {
                player: id,
                location: None,
                collection: Collection::Locations,
            });
        };

        for location in locations {
            check_entries(id, &location.name, Collection::Heroes, location.heroes.as_ref())?;
            check_entries(id, &location.name, Collection::Allies, location.allies.as_ref())?;
        }
    }

    Ok(())
}

fn check_entries<T: Clone>(
    player: PlayerId,
    location: &str,
    collection: Collection,
    entries: Option<&im::Vector<Option<T>>>,
) -> Result<(), InvariantViolation> {
    let Some(entries) = entries else {
        return Err(InvariantViolation::MissingCollection {
            player,
            location: Some(location.to_string()),
            collection,
        });
    };

    if entries.iter().any(Option::is_none) {
        return Err(InvariantViolation::AbsentEntry {
            player,
            location: location.to_string(),
            collection,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Ally, Hero, LocationState, MatchId, PlayerState};

    fn state_with(player: PlayerState) -> GameState {
        GameState::new(
            MatchId::new(),
            vec![player, PlayerState::new(PlayerId::new(), "Captain Hook")],
            1,
        )
    }

    fn john() -> PlayerState {
        PlayerState::new(PlayerId::new(), "Prince John").with_location(
            LocationState::new("The Jail")
                .with_hero(Hero::new("Robin Hood", 4))
                .with_ally(Ally::new("Sheriff", 2)),
        )
    }

    #[test]
    fn test_valid_state_passes() {
        assert_eq!(validate(&state_with(john())), Ok(()));
    }

    #[test]
    fn test_negative_power() {
        let player = john().with_power(-1);
        let id = player.id;

        assert_eq!(
            validate(&state_with(player)),
            Err(InvariantViolation::NegativePower { player: id, value: -1 })
        );
    }

    #[test]
    fn test_negative_decks() {
        let player = john().with_decks(-2, 5);
        assert!(matches!(
            validate(&state_with(player)),
            Err(InvariantViolation::NegativeVillainDeck { value: -2, .. })
        ));

        let player = john().with_decks(5, -3);
        assert!(matches!(
            validate(&state_with(player)),
            Err(InvariantViolation::NegativeFateDeck { value: -3, .. })
        ));
    }

    #[test]
    fn test_power_checked_before_decks() {
        let player = john().with_power(-1).with_decks(-1, -1);
        assert!(matches!(
            validate(&state_with(player)),
            Err(InvariantViolation::NegativePower { .. })
        ));
    }

    #[test]
    fn test_missing_locations() {
        let mut player = john();
        player.locations = None;

        let err = validate(&state_with(player)).unwrap_err();
        assert!(matches!(
            err,
            InvariantViolation::MissingCollection { collection: Collection::Locations, location: None, .. }
        ));
        assert!(err.to_string().ends_with("locations collection is absent"));
    }

    #[test]
    fn test_absent_hero_entry() {
        let mut player = john();
        player
            .location_mut("The Jail")
            .unwrap()
            .heroes
            .as_mut()
            .unwrap()
            .push_back(None);

        let err = validate(&state_with(player)).unwrap_err();
        assert!(matches!(
            err,
            InvariantViolation::AbsentEntry { collection: Collection::Heroes, .. }
        ));
        assert!(err.to_string().contains("heroes at The Jail"));
    }

    #[test]
    fn test_absent_ally_entry_and_missing_allies() {
        let mut player = john();
        player
            .location_mut("The Jail")
            .unwrap()
            .allies
            .as_mut()
            .unwrap()
            .push_front(None);
        assert!(matches!(
            validate(&state_with(player)),
            Err(InvariantViolation::AbsentEntry { collection: Collection::Allies, .. })
        ));

        let mut player = john();
        player.location_mut("The Jail").unwrap().allies = None;
        assert!(matches!(
            validate(&state_with(player)),
            Err(InvariantViolation::MissingCollection { collection: Collection::Allies, .. })
        ));
    }

    #[test]
    fn test_structural_checks() {
        let mut state = state_with(john());
        state.current_player_index = 2;
        assert_eq!(
            validate(&state),
            Err(InvariantViolation::CurrentPlayerOutOfRange { index: 2, count: 2 })
        );

        let player = john();
        let duplicate = player.clone();
        let state = GameState::new(MatchId::new(), vec![player, duplicate], 1);
        assert!(matches!(validate(&state), Err(InvariantViolation::DuplicatePlayer { .. })));

        let empty = GameState::new(MatchId::new(), Vec::new(), 1);
        assert_eq!(validate(&empty), Err(InvariantViolation::NoPlayers));
    }
}
