//! Per-player board state.
//!
//! ## PlayerState
//!
//! One entry per villain in turn order: power, realm locations and deck counts.
//!
//! ## LocationState
//!
//! A named location in a villain's realm holding heroes and allies.
//!
//! ## Absent collections
//!
//! States can be materialized from external snapshots, where a collection or an
//! entry may be missing. Those shapes are representable (`Option`) so that the
//! invariant validator can reject them; game logic only ever sees present
//! entries through the iterator accessors below.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::card::{Ally, Hero};
use super::entity::PlayerId;

/// A location in a villain's realm.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationState {
    /// Location name, unique within a player's realm.
    pub name: String,

    /// Heroes present. `None` or a `None` entry is an invariant violation.
    pub heroes: Option<Vector<Option<Hero>>>,

    /// Allies present. `None` or a `None` entry is an invariant violation.
    pub allies: Option<Vector<Option<Ally>>>,
}

impl LocationState {
    /// Create an empty location.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            heroes: Some(Vector::new()),
            allies: Some(Vector::new()),
        }
    }

    /// Add a hero (builder pattern).
    #[must_use]
    pub fn with_hero(mut self, hero: Hero) -> Self {
        self.heroes.get_or_insert_with(Vector::new).push_back(Some(hero));
        self
    }

    /// Add an ally (builder pattern).
    #[must_use]
    pub fn with_ally(mut self, ally: Ally) -> Self {
        self.allies.get_or_insert_with(Vector::new).push_back(Some(ally));
        self
    }

    /// Iterate over the heroes present.
    pub fn heroes(&self) -> impl Iterator<Item = &Hero> {
        self.heroes.iter().flatten().flatten()
    }

    /// Iterate over the allies present.
    pub fn allies(&self) -> impl Iterator<Item = &Ally> {
        self.allies.iter().flatten().flatten()
    }

    /// Find the first hero with the given name.
    #[must_use]
    pub fn hero(&self, name: &str) -> Option<&Hero> {
        self.heroes().find(|h| h.name == name)
    }

    /// Check whether a hero with the given name is present.
    #[must_use]
    pub fn has_hero(&self, name: &str) -> bool {
        self.hero(name).is_some()
    }

    /// Combined strength of all allies present.
    #[must_use]
    pub fn ally_strength(&self) -> u64 {
        self.allies().map(|a| u64::from(a.strength)).sum()
    }

    /// Remove the first hero with the given name.
    ///
    /// Returns the removed hero, or `None` if no such hero is present.
    pub fn remove_hero(&mut self, name: &str) -> Option<Hero> {
        let heroes = self.heroes.as_mut()?;
        let index = heroes
            .iter()
            .position(|h| h.as_ref().is_some_and(|h| h.name == name))?;
        heroes.remove(index)
    }
}

/// Board state for one villain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub id: PlayerId,

    /// Villain name. Selects rule variants such as the objective.
    pub villain: String,

    /// Power. Must never be negative.
    pub power: i32,

    /// Realm locations. `None` is an invariant violation.
    pub locations: Option<Vector<LocationState>>,

    /// Cards left in the villain deck. Must never be negative.
    pub villain_deck_count: i32,

    /// Cards left in the fate deck. Must never be negative.
    pub fate_deck_count: i32,
}

impl PlayerState {
    /// Create a fresh player: zero power, no locations, empty decks.
    pub fn new(id: PlayerId, villain: impl Into<String>) -> Self {
        Self {
            id,
            villain: villain.into(),
            power: 0,
            locations: Some(Vector::new()),
            villain_deck_count: 0,
            fate_deck_count: 0,
        }
    }

    /// Set power (builder pattern).
    #[must_use]
    pub fn with_power(mut self, power: i32) -> Self {
        self.power = power;
        self
    }

    /// Set deck counts (builder pattern).
    #[must_use]
    pub fn with_decks(mut self, villain_deck: i32, fate_deck: i32) -> Self {
        self.villain_deck_count = villain_deck;
        self.fate_deck_count = fate_deck;
        self
    }

    /// Add a location (builder pattern).
    #[must_use]
    pub fn with_location(mut self, location: LocationState) -> Self {
        self.locations
            .get_or_insert_with(Vector::new)
            .push_back(location);
        self
    }

    /// Iterate over the player's locations.
    pub fn locations(&self) -> impl Iterator<Item = &LocationState> {
        self.locations.iter().flatten()
    }

    /// Find a location by name.
    #[must_use]
    pub fn location(&self, name: &str) -> Option<&LocationState> {
        self.locations().find(|l| l.name == name)
    }

    /// Find a location by name for mutation.
    pub fn location_mut(&mut self, name: &str) -> Option<&mut LocationState> {
        self.locations.as_mut()?.iter_mut().find(|l| l.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jail() -> LocationState {
        LocationState::new("The Jail")
            .with_hero(Hero::new("Robin Hood", 4))
            .with_hero(Hero::new("Little John", 3))
            .with_ally(Ally::new("Sheriff", 3))
            .with_ally(Ally::new("Guard", 2))
    }

    #[test]
    fn test_location_lookup() {
        let location = jail();

        assert!(location.has_hero("Robin Hood"));
        assert!(!location.has_hero("Maid Marian"));
        assert_eq!(location.hero("Little John").map(|h| h.strength), Some(3));
        assert_eq!(location.ally_strength(), 5);
    }

    #[test]
    fn test_remove_hero() {
        let mut location = jail();

        let removed = location.remove_hero("Robin Hood");
        assert_eq!(removed, Some(Hero::new("Robin Hood", 4)));
        assert!(!location.has_hero("Robin Hood"));
        assert_eq!(location.heroes().count(), 1);

        assert_eq!(location.remove_hero("Robin Hood"), None);
    }

    #[test]
    fn test_remove_hero_takes_first_match_only() {
        let mut location = LocationState::new("Sherwood Forest")
            .with_hero(Hero::new("Robin Hood", 4))
            .with_hero(Hero::new("Robin Hood", 4));

        location.remove_hero("Robin Hood");
        assert_eq!(location.heroes().count(), 1);
    }

    #[test]
    fn test_accessors_skip_absent_entries() {
        let mut location = jail();
        location.heroes.as_mut().unwrap().push_back(None);
        location.allies = None;

        assert_eq!(location.heroes().count(), 2);
        assert_eq!(location.allies().count(), 0);
        assert_eq!(location.ally_strength(), 0);
    }

    #[test]
    fn test_player_locations() {
        let mut player = PlayerState::new(PlayerId::new(), "Prince John")
            .with_power(7)
            .with_location(jail())
            .with_location(LocationState::new("Nottingham"));

        assert_eq!(player.power, 7);
        assert_eq!(player.locations().count(), 2);
        assert!(player.location("Nottingham").is_some());
        assert!(player.location("Sherwood Forest").is_none());

        player
            .location_mut("The Jail")
            .unwrap()
            .remove_hero("Little John");
        assert!(!player.location("The Jail").unwrap().has_hero("Little John"));
    }

    #[test]
    fn test_missing_collections_deserialize_as_absent() {
        let json = r#"{
            "id": "6f1f7a5e-8d0c-4d7a-9a49-0d8d1f3b6a11",
            "villain": "Captain Hook",
            "power": 2,
            "villainDeckCount": 30,
            "fateDeckCount": 15
        }"#;

        let player: PlayerState = serde_json::from_str(json).unwrap();
        assert!(player.locations.is_none());
        assert_eq!(player.locations().count(), 0);
    }
}
