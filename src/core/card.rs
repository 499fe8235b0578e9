//! Cards that occupy locations: heroes sent by opponents and the villain's allies.

use serde::{Deserialize, Serialize};

/// A hero card at a location.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hero {
    pub name: String,
    pub strength: u32,
}

impl Hero {
    /// Create a new hero.
    pub fn new(name: impl Into<String>, strength: u32) -> Self {
        Self {
            name: name.into(),
            strength,
        }
    }
}

/// An ally card at a location.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ally {
    pub name: String,
    pub strength: u32,
}

impl Ally {
    /// Create a new ally.
    pub fn new(name: impl Into<String>, strength: u32) -> Self {
        Self {
            name: name.into(),
            strength,
        }
    }
}
