//! Read-only world snapshot passed into each decision cycle.
//!
//! The snapshot is the only shared resource between concurrently deciding
//! NPCs, and it must stay immutable for the duration of a simulation tick.
//! It is game-engine agnostic — the integration layer converts engine state
//! into these plain values.

use serde::{Deserialize, Serialize};

use crate::types::{CharacterId, GameTimestamp};

/// Summary of one character near the deciding NPC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyCharacter {
    /// Opaque id of the character.
    pub id: CharacterId,
    /// Display name.
    pub name: String,
    /// Gold the character visibly carries.
    pub gold: u32,
    /// Character level.
    pub level: u32,
    /// Archetype tag ("thug", "merchant", ...). Unknown tags are fine.
    pub archetype_tag: String,
    /// Where the character currently is.
    pub location: String,
}

/// The read-only view of nearby state for one decision cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Current simulated time.
    pub now: GameTimestamp,
    /// Hour of the simulated day (0-23).
    pub hour: u32,
    /// Location of the deciding NPC.
    pub location: String,
    /// Whether the deciding NPC is currently in combat.
    pub in_combat: bool,
    /// Characters within perception range.
    pub nearby: Vec<NearbyCharacter>,
}

impl WorldSnapshot {
    /// Look up a nearby character by id.
    #[must_use]
    pub fn character(&self, id: &CharacterId) -> Option<&NearbyCharacter> {
        self.nearby.iter().find(|c| &c.id == id)
    }

    /// All nearby characters at a given location.
    #[must_use]
    pub fn characters_at(&self, location: &str) -> Vec<&NearbyCharacter> {
        self.nearby.iter().filter(|c| c.location == location).collect()
    }
}

/// The deciding NPC's own vitals, owned by the external progression system
/// and handed in per cycle alongside the snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OwnerStatus {
    /// Gold held.
    pub gold: u32,
    /// Health as a fraction of maximum (0.0 to 1.0).
    pub health_fraction: f32,
    /// Current level.
    pub level: u32,
    /// Whether this NPC holds the ruling position.
    pub holds_throne: bool,
}

impl Default for OwnerStatus {
    fn default() -> Self {
        Self {
            gold: 0,
            health_fraction: 1.0,
            level: 1,
            holds_throne: false,
        }
    }
}
