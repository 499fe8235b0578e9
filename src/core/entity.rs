//! Match and player identification.
//!
//! Both identifiers are UUID newtypes. Ids are allocated by the match store
//! (`new_v4`) and never reused within a process.
//!
//! ```
//! use villain_match::core::{MatchId, PlayerId};
//!
//! let player = PlayerId::new();
//! assert!(!player.is_nil());
//! assert!(PlayerId::nil().is_nil());
//!
//! let a = MatchId::new();
//! let b = MatchId::new();
//! assert_ne!(a, b);
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub Uuid);

impl MatchId {
    /// Allocate a fresh random match ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the raw UUID.
    #[must_use]
    pub const fn raw(self) -> Uuid {
        self.0
    }
}

impl Default for MatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for MatchId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a player within the process.
///
/// The nil UUID is never allocated and is rejected at command intake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    /// Allocate a fresh random player ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The nil identifier.
    #[must_use]
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Check whether this is the nil identifier.
    #[must_use]
    pub fn is_nil(self) -> bool {
        self.0.is_nil()
    }

    /// Get the raw UUID.
    #[must_use]
    pub const fn raw(self) -> Uuid {
        self.0
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for PlayerId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player({})", self.0)
    }
}
