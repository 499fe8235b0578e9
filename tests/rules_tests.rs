//! Rule tests driven through the dispatcher: invariant enforcement, vanquish
//! threshold, fate targeting and objectives.

use im::vector;
use proptest::prelude::*;

use villain_match::core::{Ally, DomainEvent, GameState, Hero, LocationState, MatchId, PlayerId, PlayerState};
use villain_match::rules::{Collection, InvariantViolation};
use villain_match::store::{DispatchError, Dispatcher, SubmitCommandRequest};

fn two_player_state(john: PlayerState) -> GameState {
    let hook = PlayerState::new(PlayerId::new(), "Captain Hook");
    GameState::new(MatchId::new(), vec![john, hook], 1)
}

fn host(state: GameState) -> (Dispatcher, MatchId) {
    let dispatcher = Dispatcher::default();
    let match_id = dispatcher.store().insert(state).unwrap();
    (dispatcher, match_id)
}

fn jail(hero_strength: u32, allies: &[u32]) -> LocationState {
    allies.iter().enumerate().fold(
        LocationState::new("The Jail").with_hero(Hero::new("Robin Hood", hero_strength)),
        |location, (i, &strength)| location.with_ally(Ally::new(format!("Guard {}", i), strength)),
    )
}

// =============================================================================
// Invariant Enforcement
// =============================================================================

fn assert_invariant_violation(state: GameState, expected: InvariantViolation) {
    let player = state.players[0].id;
    let (dispatcher, match_id) = host(state.clone());

    let err = dispatcher
        .submit(match_id, &SubmitCommandRequest::roll_die(player, 0))
        .unwrap_err();

    assert_eq!(err, DispatchError::Invariant(expected));
    assert_eq!(err.code(), "engine.invariant_violation");
    assert_eq!(err.status(), 500);

    // Aborted: no state change, no events, no ledger entry
    assert_eq!(dispatcher.snapshot(match_id).unwrap(), state);
    assert!(dispatcher.replay(match_id).unwrap().is_empty());
    assert!(!dispatcher.store().is_processed(match_id, player, 0).unwrap());
}

#[test]
fn test_negative_power_is_rejected() {
    let john = PlayerState::new(PlayerId::new(), "Prince John").with_power(-1);
    let id = john.id;
    assert_invariant_violation(two_player_state(john), InvariantViolation::NegativePower { player: id, value: -1 });
}

#[test]
fn test_negative_deck_counts_are_rejected() {
    let john = PlayerState::new(PlayerId::new(), "Prince John").with_decks(-2, 5);
    let id = john.id;
    assert_invariant_violation(
        two_player_state(john),
        InvariantViolation::NegativeVillainDeck { player: id, value: -2 },
    );

    let john = PlayerState::new(PlayerId::new(), "Prince John").with_decks(5, -3);
    let id = john.id;
    assert_invariant_violation(
        two_player_state(john),
        InvariantViolation::NegativeFateDeck { player: id, value: -3 },
    );
}

#[test]
fn test_absent_locations_are_rejected() {
    let mut john = PlayerState::new(PlayerId::new(), "Prince John");
    john.locations = None;
    let id = john.id;

    assert_invariant_violation(
        two_player_state(john),
        InvariantViolation::MissingCollection {
            player: id,
            location: None,
            collection: Collection::Locations,
        },
    );
}

#[test]
fn test_absent_hero_and_ally_entries_are_rejected() {
    let mut location = LocationState::new("The Jail");
    location.heroes = Some(vector![Some(Hero::new("Robin Hood", 3)), None]);
    let john = PlayerState::new(PlayerId::new(), "Prince John").with_location(location);
    let id = john.id;
    assert_invariant_violation(
        two_player_state(john),
        InvariantViolation::AbsentEntry {
            player: id,
            location: "The Jail".into(),
            collection: Collection::Heroes,
        },
    );

    let mut location = LocationState::new("The Jail");
    location.allies = Some(vector![None]);
    let john = PlayerState::new(PlayerId::new(), "Prince John").with_location(location);
    let id = john.id;
    assert_invariant_violation(
        two_player_state(john),
        InvariantViolation::AbsentEntry {
            player: id,
            location: "The Jail".into(),
            collection: Collection::Allies,
        },
    );
}

#[test]
fn test_snapshot_missing_fields_is_rejected() {
    let john = PlayerId::new();
    let json = format!(
        r#"{{
            "matchId": "{}",
            "players": [
                {{ "id": "{}", "villain": "Prince John", "power": 0, "locations": null,
                   "villainDeckCount": 0, "fateDeckCount": 0 }}
            ],
            "currentPlayerIndex": 0,
            "turn": 0,
            "rng": {{ "seed": 1, "draws": 0 }}
        }}"#,
        MatchId::new(),
        john.raw()
    );
    let state: GameState = serde_json::from_str(&json).unwrap();

    assert_invariant_violation(
        state,
        InvariantViolation::MissingCollection {
            player: john,
            location: None,
            collection: Collection::Locations,
        },
    );
}

// =============================================================================
// Vanquish
// =============================================================================

#[test]
fn test_vanquish_succeeds_when_allies_are_strong_enough() {
    let john = PlayerState::new(PlayerId::new(), "Prince John").with_location(jail(3, &[2, 2]));
    let id = john.id;
    let (dispatcher, match_id) = host(two_player_state(john));

    let ack = dispatcher
        .submit(match_id, &SubmitCommandRequest::vanquish(id, 0, "The Jail", "Robin Hood"))
        .unwrap();

    assert_eq!(
        ack.events,
        vec![DomainEvent::HeroVanquished {
            player: id,
            location: "The Jail".into(),
            hero: "Robin Hood".into(),
        }]
    );
    let state = dispatcher.snapshot(match_id).unwrap();
    assert!(!state.player(id).unwrap().location("The Jail").unwrap().has_hero("Robin Hood"));
}

#[test]
fn test_vanquish_tie_goes_to_villain() {
    let john = PlayerState::new(PlayerId::new(), "Prince John").with_location(jail(4, &[1, 3]));
    let id = john.id;
    let (dispatcher, match_id) = host(two_player_state(john));

    let ack = dispatcher
        .submit(match_id, &SubmitCommandRequest::vanquish(id, 0, "The Jail", "Robin Hood"))
        .unwrap();
    assert_eq!(ack.events.len(), 1);
}

#[test]
fn test_vanquish_fails_when_allies_are_too_weak() {
    let john = PlayerState::new(PlayerId::new(), "Prince John").with_location(jail(5, &[2]));
    let id = john.id;
    let state = two_player_state(john);
    let (dispatcher, match_id) = host(state.clone());

    let ack = dispatcher
        .submit(match_id, &SubmitCommandRequest::vanquish(id, 0, "The Jail", "Robin Hood"))
        .unwrap();

    assert!(ack.events.is_empty());
    assert_eq!(dispatcher.snapshot(match_id).unwrap(), state);
}

#[test]
fn test_vanquish_with_padded_names() {
    let john = PlayerState::new(PlayerId::new(), "Prince John").with_location(jail(3, &[2, 2]));
    let id = john.id;
    let (dispatcher, match_id) = host(two_player_state(john));

    let request = SubmitCommandRequest::new(" Vanquish ", id, 0)
        .with_location("  The Jail ")
        .with_hero(" Robin Hood");
    let ack = dispatcher.submit(match_id, &request).unwrap();

    assert_eq!(ack.events.len(), 1);
}

// =============================================================================
// Objectives
// =============================================================================

#[test]
fn test_prince_john_objective_at_threshold() {
    let john = PlayerState::new(PlayerId::new(), "Prince John")
        .with_power(20)
        .with_location(jail(3, &[]));
    let id = john.id;
    let (dispatcher, match_id) = host(two_player_state(john));

    let ack = dispatcher
        .submit(match_id, &SubmitCommandRequest::check_objective(id, 0))
        .unwrap();
    assert_eq!(ack.events, vec![DomainEvent::ObjectiveAchieved { player: id }]);
}

#[test]
fn test_prince_john_objective_below_threshold() {
    let john = PlayerState::new(PlayerId::new(), "Prince John")
        .with_power(19)
        .with_location(jail(3, &[]));
    let id = john.id;
    let (dispatcher, match_id) = host(two_player_state(john));

    let ack = dispatcher
        .submit(match_id, &SubmitCommandRequest::check_objective(id, 0))
        .unwrap();
    assert!(ack.events.is_empty());
}

#[test]
fn test_villain_without_objective_never_wins() {
    let john = PlayerState::new(PlayerId::new(), "Prince John");
    let state = two_player_state(john);
    let hook = state.players[1].id;
    let (dispatcher, match_id) = host(state);

    let ack = dispatcher
        .submit(match_id, &SubmitCommandRequest::check_objective(hook, 0))
        .unwrap();
    assert!(ack.events.is_empty());
}

// =============================================================================
// Fate
// =============================================================================

#[test]
fn test_fate_against_opponent() {
    let state = two_player_state(PlayerState::new(PlayerId::new(), "Prince John"));
    let (john, hook) = (state.players[0].id, state.players[1].id);
    let (dispatcher, match_id) = host(state);

    let ack = dispatcher
        .submit(match_id, &SubmitCommandRequest::fate(john, 0, hook, "Little John"))
        .unwrap();
    assert_eq!(
        ack.events,
        vec![DomainEvent::FateCardRevealed {
            target: hook,
            card: "Little John".into(),
        }]
    );
}

proptest! {
    #[test]
    fn prop_fate_self_target_is_noop(card in "[A-Za-z][A-Za-z ]{0,20}", which in 0usize..2) {
        let state = two_player_state(PlayerState::new(PlayerId::new(), "Prince John"));
        let player = state.players[which].id;
        let (dispatcher, match_id) = host(state.clone());

        let ack = dispatcher
            .submit(match_id, &SubmitCommandRequest::fate(player, 0, player, card))
            .unwrap();

        prop_assert!(ack.events.is_empty());
        prop_assert_eq!(dispatcher.snapshot(match_id).unwrap(), state);
    }
}
