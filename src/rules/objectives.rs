//! Villain objectives.
//!
//! Each villain wins by meeting its own objective. Objectives are independent
//! [`Objective`] implementations kept in an [`ObjectiveRegistry`] keyed by
//! villain name. Villains with no registered objective never achieve one.
//!
//! ## Example
//!
//! ```
//! use villain_match::core::{GameState, MatchId, PlayerId, PlayerState};
//! use villain_match::rules::{Objective, ObjectiveRegistry};
//!
//! struct Hoarder;
//!
//! impl Objective for Hoarder {
//!     fn villain(&self) -> &str {
//!         "Scrooge"
//!     }
//!
//!     fn is_achieved(&self, _state: &GameState, player: &PlayerState) -> bool {
//!         player.power >= 50
//!     }
//! }
//!
//! let mut registry = ObjectiveRegistry::standard();
//! registry.register(Hoarder);
//!
//! let scrooge = PlayerState::new(PlayerId::new(), "Scrooge").with_power(50);
//! let state = GameState::new(MatchId::new(), vec![scrooge.clone()], 1);
//! assert!(registry.is_achieved(&state, &scrooge));
//! ```

use rustc_hash::FxHashMap;

use crate::core::{GameState, PlayerState};

/// A villain's win condition, evaluated over the full match state.
pub trait Objective: Send + Sync {
    /// Villain name this objective belongs to.
    fn villain(&self) -> &str;

    /// Whether `player` has met the objective in `state`.
    fn is_achieved(&self, state: &GameState, player: &PlayerState) -> bool;
}

/// Prince John: hold at least 20 power with Robin Hood locked in The Jail.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrinceJohn;

impl PrinceJohn {
    pub const VILLAIN: &'static str = "Prince John";
    pub const REQUIRED_POWER: i32 = 20;
    pub const JAIL: &'static str = "The Jail";
    pub const PRISONER: &'static str = "Robin Hood";
}

impl Objective for PrinceJohn {
    fn villain(&self) -> &str {
        Self::VILLAIN
    }

    fn is_achieved(&self, _state: &GameState, player: &PlayerState) -> bool {
        player.power >= Self::REQUIRED_POWER
            && player
                .locations()
                .any(|l| l.name == Self::JAIL && l.has_hero(Self::PRISONER))
    }
}

/// Registry of objectives keyed by villain name.
#[derive(Default)]
pub struct ObjectiveRegistry {
    objectives: FxHashMap<String, Box<dyn Objective>>,
}

impl ObjectiveRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in objective.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(PrinceJohn);
        registry
    }

    /// Register an objective, replacing any existing one for the same villain.
    pub fn register(&mut self, objective: impl Objective + 'static) {
        self.objectives
            .insert(objective.villain().to_string(), Box::new(objective));
    }

    /// Get the objective for a villain.
    #[must_use]
    pub fn get(&self, villain: &str) -> Option<&dyn Objective> {
        self.objectives.get(villain).map(|o| o.as_ref())
    }

    /// Check if a villain has an objective.
    #[must_use]
    pub fn contains(&self, villain: &str) -> bool {
        self.objectives.contains_key(villain)
    }

    /// Get the number of registered objectives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objectives.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objectives.is_empty()
    }

    /// Whether `player`'s villain objective is met. Unregistered villains never are.
    #[must_use]
    pub fn is_achieved(&self, state: &GameState, player: &PlayerState) -> bool {
        self.get(&player.villain)
            .is_some_and(|o| o.is_achieved(state, player))
    }
}

impl std::fmt::Debug for ObjectiveRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut villains: Vec<_> = self.objectives.keys().collect();
        villains.sort();
        f.debug_struct("ObjectiveRegistry")
            .field("villains", &villains)
            .finish()
    }
}
