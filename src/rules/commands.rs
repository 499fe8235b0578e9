//! Per-command execution.
//!
//! Each function reads the current state and returns the events the command
//! produces. None of them mutate state; the reducer folds the events.
//! Legal-but-ineffective attempts (unknown names, weak allies, self-targeting)
//! return no events rather than an error.

use crate::core::{Command, DomainEvent, Events, GameRng, GameState, PlayerId};

use super::objectives::ObjectiveRegistry;

/// Execute a command against a state.
#[must_use]
pub fn execute(command: &Command, state: &GameState, objectives: &ObjectiveRegistry) -> Events {
    match command {
        Command::RollDie { player } => roll_die(state, *player),
        Command::Vanquish {
            player,
            location,
            hero,
        } => vanquish(state, *player, location, hero),
        Command::Fate {
            player,
            target,
            card,
        } => fate(state, *player, *target, card),
        Command::CheckObjective { player } => check_objective(state, objectives, *player),
    }
}

/// Roll a die from the match's deterministic stream.
///
/// Unknown players roll nothing and consume no draw.
#[must_use]
pub fn roll_die(state: &GameState, player: PlayerId) -> Events {
    let mut events = Events::new();
    if !state.has_player(player) {
        return events;
    }

    let value = GameRng::from_state(&state.rng).roll_die();
    events.push(DomainEvent::DieRolled { player, value });
    events
}

/// Vanquish a hero at one of the player's locations.
///
/// Succeeds iff the allies at that location are together at least as strong
/// as the hero. Ties go to the villain.
#[must_use]
pub fn vanquish(state: &GameState, player: PlayerId, location: &str, hero: &str) -> Events {
    let mut events = Events::new();

    let Some(site) = state.player(player).and_then(|p| p.location(location)) else {
        return events;
    };
    let Some(target) = site.hero(hero) else {
        return events;
    };

    if site.ally_strength() >= u64::from(target.strength) {
        events.push(DomainEvent::HeroVanquished {
            player,
            location: location.to_string(),
            hero: hero.to_string(),
        });
    }
    events
}

/// Reveal a fate card against another player.
#[must_use]
pub fn fate(state: &GameState, player: PlayerId, target: PlayerId, card: &str) -> Events {
    let mut events = Events::new();
    if player == target || !state.has_player(player) || !state.has_player(target) {
        return events;
    }

    events.push(DomainEvent::FateCardRevealed {
        target,
        card: card.to_string(),
    });
    events
}

/// Check the player's villain objective.
#[must_use]
pub fn check_objective(state: &GameState, objectives: &ObjectiveRegistry, player: PlayerId) -> Events {
    let mut events = Events::new();

    if let Some(p) = state.player(player) {
        if objectives.is_achieved(state, p) {
            events.push(DomainEvent::ObjectiveAchieved { player });
        }
    }
    events
}
