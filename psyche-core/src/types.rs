//! Core type definitions for the Psyche decision engine.
//!
//! All types are serializable so external collaborators can snapshot
//! an NPC's mind state without this crate defining the wire format.

use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identity Types
// ---------------------------------------------------------------------------

/// Opaque identifier for a character (NPC or player) in the game world.
///
/// Characters are owned elsewhere; the engine only ever holds their id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacterId(pub String);

impl CharacterId {
    /// Create a character id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CharacterId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Unique identifier for a memory event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemoryId(pub Uuid);

impl MemoryId {
    /// Create a new random memory id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MemoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MemoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GoalId(pub Uuid);

impl GoalId {
    /// Create a new random goal id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GoalId {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// In-game timestamp measured in simulated seconds since world creation.
///
/// The simulated clock travels with the world snapshot; entities never read
/// wall-clock time themselves, which keeps decay/expiry/cooldown logic
/// deterministic under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameTimestamp {
    /// Simulated tick (monotonically increasing, 1 tick = 1 simulated second).
    pub tick: u64,
    /// Corresponding real-world wall-clock time (save metadata only).
    pub real_time: DateTime<Utc>,
}

impl GameTimestamp {
    /// Ticks per simulated minute.
    pub const TICKS_PER_MINUTE: u64 = 60;
    /// Ticks per simulated hour.
    pub const TICKS_PER_HOUR: u64 = 3_600;
    /// Ticks per simulated day.
    pub const TICKS_PER_DAY: u64 = 86_400;

    /// Create a new timestamp at the current wall-clock time.
    #[must_use]
    pub fn now(tick: u64) -> Self {
        Self {
            tick,
            real_time: Utc::now(),
        }
    }

    /// Simulated minutes elapsed since `other`.
    #[must_use]
    pub fn minutes_since(&self, other: &Self) -> f32 {
        self.tick.saturating_sub(other.tick) as f32 / Self::TICKS_PER_MINUTE as f32
    }

    /// Simulated hours elapsed since `other`.
    #[must_use]
    pub fn hours_since(&self, other: &Self) -> f32 {
        self.tick.saturating_sub(other.tick) as f32 / Self::TICKS_PER_HOUR as f32
    }

    /// Simulated days elapsed since `other`.
    #[must_use]
    pub fn days_since(&self, other: &Self) -> f32 {
        self.tick.saturating_sub(other.tick) as f32 / Self::TICKS_PER_DAY as f32
    }

    /// This timestamp advanced by a number of simulated minutes.
    #[must_use]
    pub fn plus_minutes(&self, minutes: u64) -> Self {
        Self {
            tick: self.tick + minutes * Self::TICKS_PER_MINUTE,
            real_time: self.real_time,
        }
    }

    /// This timestamp advanced by a number of simulated days.
    #[must_use]
    pub fn plus_days(&self, days: u64) -> Self {
        Self {
            tick: self.tick + days * Self::TICKS_PER_DAY,
            real_time: self.real_time,
        }
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// The closed set of behaviors an NPC can choose.
///
/// The first ten carry personality decision weights; the rest score neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Attack a target character.
    Attack,
    /// Withdraw from a threat.
    Flee,
    /// Talk a conflict or deal through.
    Negotiate,
    /// Take something that isn't yours.
    Steal,
    /// Assist another character.
    Help,
    /// Turn on an ally for personal gain.
    Betray,
    /// Strike back at a remembered attacker.
    Revenge,
    /// Throw in with an organized group.
    JoinGang,
    /// Buy or sell goods.
    Trade,
    /// Wander somewhere new.
    Explore,
    /// Seek out company.
    Socialize,
    /// Recover health and strength.
    Rest,
    /// Do nothing this cycle.
    Idle,
    /// Keep doing whatever was already underway (cooldown no-op).
    Continue,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Attack => "attack",
            Self::Flee => "flee",
            Self::Negotiate => "negotiate",
            Self::Steal => "steal",
            Self::Help => "help",
            Self::Betray => "betray",
            Self::Revenge => "revenge",
            Self::JoinGang => "join_gang",
            Self::Trade => "trade",
            Self::Explore => "explore",
            Self::Socialize => "socialize",
            Self::Rest => "rest",
            Self::Idle => "idle",
            Self::Continue => "continue",
        };
        write!(f, "{name}")
    }
}

/// One chosen behavior, constructed fresh per decision cycle and handed to
/// the external action executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcAction {
    /// What to do.
    pub kind: ActionKind,
    /// Final scored priority of the action.
    pub priority: f32,
    /// Who the action is aimed at, if anyone.
    pub target: Option<CharacterId>,
}

impl NpcAction {
    /// Create an untargeted action.
    #[must_use]
    pub fn new(kind: ActionKind, priority: f32) -> Self {
        Self {
            kind,
            priority: priority.max(0.0),
            target: None,
        }
    }

    /// Attach a target character.
    #[must_use]
    pub fn with_target(mut self, target: CharacterId) -> Self {
        self.target = Some(target);
        self
    }

    /// The do-nothing action returned when no goal is worth pursuing.
    #[must_use]
    pub fn idle() -> Self {
        Self::new(ActionKind::Idle, 0.0)
    }

    /// The no-op action returned inside the decision cooldown window.
    #[must_use]
    pub fn continue_current() -> Self {
        Self::new(ActionKind::Continue, 0.0)
    }
}

// ---------------------------------------------------------------------------
// Score
// ---------------------------------------------------------------------------

/// Totally-ordered wrapper over an `f32` score, used wherever candidates
/// or goals are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score(pub OrderedFloat<f32>);

impl Score {
    /// Create a score from a raw f32.
    #[must_use]
    pub fn new(score: f32) -> Self {
        Self(OrderedFloat(score))
    }

    /// Get the raw score value.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0.into_inner()
    }
}
