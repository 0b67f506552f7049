//! Episodic memory — the importance-weighted event log of one NPC.
//!
//! Events are immutable once recorded. Retention is bounded: when the store
//! exceeds its cap, the lowest-importance unprotected events are pruned
//! first, and a small protected set of event kinds (attacks, betrayals,
//! help, defense, rescue) is retained preferentially regardless of age.
//!
//! The store is internally serialized. A `MemorySystem` shared across
//! threads behind an `Arc` stays consistent without external locking; the
//! per-character index keeps queries from scanning the whole log.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::MemoryConfig;
use crate::types::{CharacterId, GameTimestamp, MemoryId, Score};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// The closed set of things an NPC can remember happening to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemoryEventKind {
    /// Another character attacked this NPC.
    WasAttacked,
    /// An ally turned on this NPC.
    WasBetrayed,
    /// Another character helped this NPC.
    WasHelped,
    /// Another character defended this NPC in a fight.
    WasDefended,
    /// Another character saved this NPC's life.
    WasSaved,
    /// Another character stole from this NPC.
    WasRobbed,
    /// Another character insulted this NPC.
    WasInsulted,
    /// Shared a drink with another character.
    SharedDrink,
    /// Completed a trade with another character.
    Traded,
    /// Had a conversation with another character.
    Conversation,
    /// Witnessed a crime happening to someone else.
    WitnessedCrime,
    /// The NPC's own recorded decision (low importance, self-referential).
    Decision,
}

impl MemoryEventKind {
    /// Importance assigned to an event of this kind, derived
    /// deterministically — same kind, same importance.
    #[must_use]
    pub fn base_importance(self) -> f32 {
        match self {
            Self::WasAttacked => 0.9,
            Self::WasBetrayed => 1.0,
            Self::WasHelped => 0.7,
            Self::WasDefended => 0.8,
            Self::WasSaved => 0.95,
            Self::WasRobbed => 0.75,
            Self::WasInsulted => 0.4,
            Self::SharedDrink => 0.35,
            Self::Traded => 0.3,
            Self::Conversation => 0.2,
            Self::WitnessedCrime => 0.45,
            Self::Decision => 0.15,
        }
    }

    /// Whether this kind belongs to the protected retention set.
    #[must_use]
    pub fn is_protected(self) -> bool {
        matches!(
            self,
            Self::WasAttacked
                | Self::WasBetrayed
                | Self::WasHelped
                | Self::WasDefended
                | Self::WasSaved
        )
    }

    /// Whether this kind represents hostility from the involved character.
    #[must_use]
    pub fn is_hostile(self) -> bool {
        matches!(self, Self::WasAttacked | Self::WasBetrayed | Self::WasRobbed)
    }
}

impl fmt::Display for MemoryEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::WasAttacked => "was_attacked",
            Self::WasBetrayed => "was_betrayed",
            Self::WasHelped => "was_helped",
            Self::WasDefended => "was_defended",
            Self::WasSaved => "was_saved",
            Self::WasRobbed => "was_robbed",
            Self::WasInsulted => "was_insulted",
            Self::SharedDrink => "shared_drink",
            Self::Traded => "traded",
            Self::Conversation => "conversation",
            Self::WitnessedCrime => "witnessed_crime",
            Self::Decision => "decision",
        };
        write!(f, "{name}")
    }
}

/// One recorded occurrence. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryEvent {
    /// Unique id of this event.
    pub id: MemoryId,
    /// What happened.
    pub kind: MemoryEventKind,
    /// The other character involved, if any.
    pub other: Option<CharacterId>,
    /// When it happened (simulated clock).
    pub timestamp: GameTimestamp,
    /// Retention weight in [0, 1], derived from the kind.
    pub importance: f32,
    /// Free-form details for collaborators (dialogue, logging).
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl MemoryEvent {
    /// Create an event about another character.
    #[must_use]
    pub fn about(kind: MemoryEventKind, other: CharacterId, timestamp: GameTimestamp) -> Self {
        Self {
            id: MemoryId::new(),
            kind,
            other: Some(other),
            timestamp,
            importance: kind.base_importance(),
            details: serde_json::Map::new(),
        }
    }

    /// Create an event with no involved character.
    #[must_use]
    pub fn ambient(kind: MemoryEventKind, timestamp: GameTimestamp) -> Self {
        Self {
            id: MemoryId::new(),
            kind,
            other: None,
            timestamp,
            importance: kind.base_importance(),
            details: serde_json::Map::new(),
        }
    }

    /// Attach free-form details.
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Map<String, serde_json::Value>) -> Self {
        self.details = details;
        self
    }

    /// Override the derived importance (clamped to [0, 1]).
    #[must_use]
    pub fn with_importance(mut self, importance: f32) -> Self {
        self.importance = importance.clamp(0.0, 1.0);
        self
    }
}

// ---------------------------------------------------------------------------
// Derived relationship signals
// ---------------------------------------------------------------------------

/// Per-event impact on the four relationship signals.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalImpact {
    /// Friendship delta.
    pub friendship: f32,
    /// Trust delta.
    pub trust: f32,
    /// Hostility delta.
    pub hostility: f32,
    /// Fear delta.
    pub fear: f32,
    /// Whether this event forces trust to its floor.
    pub saturates_trust: bool,
}

/// The fixed impact table: event kind → signal deltas.
#[must_use]
pub fn signal_impact(kind: MemoryEventKind) -> SignalImpact {
    match kind {
        MemoryEventKind::WasAttacked => SignalImpact {
            hostility: 0.3,
            fear: 0.2,
            trust: -0.2,
            ..Default::default()
        },
        MemoryEventKind::WasBetrayed => SignalImpact {
            friendship: -0.4,
            hostility: 0.3,
            saturates_trust: true,
            ..Default::default()
        },
        MemoryEventKind::WasHelped => SignalImpact {
            friendship: 0.3,
            trust: 0.2,
            ..Default::default()
        },
        MemoryEventKind::WasDefended => SignalImpact {
            friendship: 0.3,
            trust: 0.3,
            fear: -0.1,
            ..Default::default()
        },
        MemoryEventKind::WasSaved => SignalImpact {
            friendship: 0.4,
            trust: 0.3,
            ..Default::default()
        },
        MemoryEventKind::WasRobbed => SignalImpact {
            hostility: 0.25,
            trust: -0.25,
            ..Default::default()
        },
        MemoryEventKind::WasInsulted => SignalImpact {
            friendship: -0.1,
            hostility: 0.15,
            ..Default::default()
        },
        MemoryEventKind::SharedDrink => SignalImpact {
            friendship: 0.2,
            trust: 0.1,
            ..Default::default()
        },
        MemoryEventKind::Traded => SignalImpact {
            friendship: 0.05,
            trust: 0.05,
            ..Default::default()
        },
        MemoryEventKind::Conversation => SignalImpact {
            friendship: 0.05,
            ..Default::default()
        },
        MemoryEventKind::WitnessedCrime => SignalImpact {
            trust: -0.1,
            fear: 0.05,
            ..Default::default()
        },
        MemoryEventKind::Decision => SignalImpact::default(),
    }
}

/// Aggregated stance toward one character, recomputed from the event log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelationshipSignals {
    /// Warmth toward the character, [0, 1].
    pub friendship: f32,
    /// Confidence in the character, [0, 1]. Floors after betrayal.
    pub trust: f32,
    /// Antagonism toward the character, [0, 1].
    pub hostility: f32,
    /// Dread of the character, [0, 1].
    pub fear: f32,
}

impl RelationshipSignals {
    /// Trust never drops below this, however many betrayals pile up.
    pub const TRUST_FLOOR: f32 = 0.0;

    /// The stance toward a complete stranger.
    #[must_use]
    pub fn stranger() -> Self {
        Self {
            friendship: 0.0,
            trust: 0.5,
            hostility: 0.0,
            fear: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// The store
// ---------------------------------------------------------------------------

/// Internal state behind the lock: chronological log + per-character index.
#[derive(Debug, Default)]
struct Store {
    events: Vec<Arc<MemoryEvent>>,
    by_character: HashMap<CharacterId, Vec<Arc<MemoryEvent>>>,
}

impl Store {
    fn insert(&mut self, event: Arc<MemoryEvent>) {
        if let Some(other) = &event.other {
            self.by_character
                .entry(other.clone())
                .or_default()
                .push(Arc::clone(&event));
        }
        self.events.push(event);
    }

    /// Drop the lowest-importance prunable events until at or below `cap`.
    /// Unprotected events go first; protected ones only when nothing else
    /// remains to cut.
    fn enforce_cap(&mut self, cap: usize) {
        while self.events.len() > cap {
            let victim = self
                .events
                .iter()
                .enumerate()
                .filter(|(_, e)| !e.kind.is_protected())
                .min_by_key(|(_, e)| Score::new(e.importance))
                .map(|(i, _)| i)
                .or_else(|| {
                    self.events
                        .iter()
                        .enumerate()
                        .min_by_key(|(_, e)| Score::new(e.importance))
                        .map(|(i, _)| i)
                });
            match victim {
                Some(i) => {
                    self.events.remove(i);
                }
                None => break,
            }
        }
        self.rebuild_index();
    }

    fn rebuild_index(&mut self) {
        self.by_character.clear();
        for event in &self.events {
            if let Some(other) = &event.other {
                self.by_character
                    .entry(other.clone())
                    .or_default()
                    .push(Arc::clone(event));
            }
        }
    }
}

/// Per-NPC episodic memory store.
///
/// All queries are pure reads over the log; only `record_event` and `decay`
/// mutate state, and both serialize through the internal lock.
#[derive(Debug)]
pub struct MemorySystem {
    inner: RwLock<Store>,
    config: MemoryConfig,
}

impl MemorySystem {
    /// Create an empty store with the given retention policy.
    #[must_use]
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            inner: RwLock::new(Store::default()),
            config,
        }
    }

    /// Append an event, pruning lowest-importance unprotected events if the
    /// cap is exceeded.
    pub fn record_event(&self, event: MemoryEvent) {
        let cap = self.config.max_events;
        let mut store = self.inner.write();
        store.insert(Arc::new(event));
        if store.events.len() > cap {
            store.enforce_cap(cap);
        }
    }

    /// Periodic housekeeping: drop unimportant unprotected events that have
    /// gone stale. Protected events are never deleted here — emotional
    /// staleness is handled at query time instead.
    pub fn decay(&self, now: GameTimestamp) {
        let stale_days = self.config.stale_after_days;
        let floor = self.config.stale_importance_floor;
        let mut store = self.inner.write();
        let before = store.events.len();
        store.events.retain(|e| {
            e.kind.is_protected()
                || e.importance >= floor
                || now.days_since(&e.timestamp) <= stale_days
        });
        if store.events.len() != before {
            store.rebuild_index();
        }
    }

    /// Every remembered event involving the given character, oldest first.
    /// This is the historical view — no recency window applies.
    #[must_use]
    pub fn memories_about(&self, id: &CharacterId) -> Vec<Arc<MemoryEvent>> {
        self.inner
            .read()
            .by_character
            .get(id)
            .cloned()
            .unwrap_or_default()
    }

    /// Every remembered event of a given kind, oldest first.
    #[must_use]
    pub fn memories_of_kind(&self, kind: MemoryEventKind) -> Vec<Arc<MemoryEvent>> {
        self.inner
            .read()
            .events
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect()
    }

    /// Events recorded within the last `window_hours` simulated hours.
    #[must_use]
    pub fn recent_events(&self, window_hours: f32, now: GameTimestamp) -> Vec<Arc<MemoryEvent>> {
        self.inner
            .read()
            .events
            .iter()
            .filter(|e| now.hours_since(&e.timestamp) <= window_hours)
            .cloned()
            .collect()
    }

    /// Whether this NPC still *feels* a recent grievance of the given kind
    /// from the character — false once the event is older than the emotional
    /// window, even though it remains in the historical record.
    #[must_use]
    pub fn recalls_recent(
        &self,
        id: &CharacterId,
        kind: MemoryEventKind,
        now: GameTimestamp,
    ) -> bool {
        let window = self.config.emotional_window_days;
        self.inner.read().by_character.get(id).is_some_and(|events| {
            events
                .iter()
                .any(|e| e.kind == kind && now.days_since(&e.timestamp) <= window)
        })
    }

    /// Whether any hostile act by the character is still inside the
    /// emotional window.
    #[must_use]
    pub fn remembers_hostility_from(&self, id: &CharacterId, now: GameTimestamp) -> bool {
        let window = self.config.emotional_window_days;
        self.inner.read().by_character.get(id).is_some_and(|events| {
            events
                .iter()
                .any(|e| e.kind.is_hostile() && now.days_since(&e.timestamp) <= window)
        })
    }

    /// Characters who attacked this NPC within the emotional window.
    #[must_use]
    pub fn recent_attackers(&self, now: GameTimestamp) -> Vec<CharacterId> {
        let window = self.config.emotional_window_days;
        let store = self.inner.read();
        let mut attackers: Vec<CharacterId> = store
            .events
            .iter()
            .filter(|e| {
                e.kind == MemoryEventKind::WasAttacked
                    && now.days_since(&e.timestamp) <= window
            })
            .filter_map(|e| e.other.clone())
            .collect();
        attackers.sort();
        attackers.dedup();
        attackers
    }

    /// Recompute the four relationship signals toward a character from the
    /// per-kind impact table, applied over that character's events in order.
    ///
    /// Trust saturates: a betrayal forces it to the floor, and later positive
    /// events only restore it once their accumulated trust impact passes the
    /// counterbalancing threshold — then at quarter strength.
    #[must_use]
    pub fn relationship_signals(&self, id: &CharacterId) -> RelationshipSignals {
        let store = self.inner.read();
        let Some(events) = store.by_character.get(id) else {
            return RelationshipSignals::stranger();
        };
        if events.is_empty() {
            return RelationshipSignals::stranger();
        }

        let mut signals = RelationshipSignals::stranger();
        let mut betrayed = false;
        let mut counterbalance = 0.0_f32;
        // Enough accumulated goodwill to start rebuilding trust.
        const COUNTERBALANCE_THRESHOLD: f32 = 1.5;

        for event in events.iter() {
            let impact = signal_impact(event.kind);
            signals.friendship = (signals.friendship + impact.friendship).clamp(0.0, 1.0);
            signals.hostility = (signals.hostility + impact.hostility).clamp(0.0, 1.0);
            signals.fear = (signals.fear + impact.fear).clamp(0.0, 1.0);

            if impact.saturates_trust {
                betrayed = true;
                counterbalance = 0.0;
                signals.trust = RelationshipSignals::TRUST_FLOOR;
            } else if betrayed {
                if impact.trust > 0.0 {
                    counterbalance += impact.trust;
                    if counterbalance > COUNTERBALANCE_THRESHOLD {
                        signals.trust = (counterbalance * 0.25).clamp(0.0, 1.0);
                    }
                }
            } else {
                signals.trust =
                    (signals.trust + impact.trust).clamp(RelationshipSignals::TRUST_FLOOR, 1.0);
            }
        }

        signals
    }

    /// Characters this NPC regards as enemies (hostility-dominated stance).
    #[must_use]
    pub fn enemies(&self) -> Vec<CharacterId> {
        self.known_characters()
            .into_iter()
            .filter(|id| {
                let s = self.relationship_signals(id);
                s.hostility >= 0.5 || (s.hostility > s.friendship && s.hostility >= 0.3)
            })
            .collect()
    }

    /// Characters this NPC regards as allies (friendship-dominated stance).
    #[must_use]
    pub fn allies(&self) -> Vec<CharacterId> {
        self.known_characters()
            .into_iter()
            .filter(|id| {
                let s = self.relationship_signals(id);
                s.friendship >= 0.5 && s.hostility < 0.3
            })
            .collect()
    }

    /// Every character this NPC has at least one memory about.
    #[must_use]
    pub fn known_characters(&self) -> Vec<CharacterId> {
        self.inner.read().by_character.keys().cloned().collect()
    }

    /// Number of distinct characters this NPC has memories about.
    #[must_use]
    pub fn known_character_count(&self) -> usize {
        self.inner.read().by_character.len()
    }

    /// Total stored event count.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.inner.read().events.len()
    }
}
