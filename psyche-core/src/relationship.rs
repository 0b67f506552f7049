//! Per-character relationship tracking.
//!
//! Every memory event about another character moves four component signals
//! (friendship, trust, hostility, fear) and a single total value that maps
//! onto a fixed ladder of relationship kinds. Betrayal saturates trust at
//! the floor until enough goodwill has accumulated to let it recover.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::config::RelationshipConfig;
use crate::memory::{signal_impact, MemoryEvent, MemoryEventKind};
use crate::types::{CharacterId, GameTimestamp};

// ---------------------------------------------------------------------------
// Ladder
// ---------------------------------------------------------------------------

/// The closed ladder of relationship standings, from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipKind {
    /// Total ≥ 2.0.
    CloseAlly,
    /// Total ≥ 1.0.
    Friend,
    /// Total ≥ 0.3.
    Friendly,
    /// Total ≥ -0.1.
    Neutral,
    /// Total ≥ -0.5.
    Dislike,
    /// Total ≥ -1.5.
    Enemy,
    /// Anything below.
    Nemesis,
}

impl RelationshipKind {
    /// Map a cumulative total onto the ladder.
    #[must_use]
    pub fn from_total(total: f32) -> Self {
        if total >= 2.0 {
            Self::CloseAlly
        } else if total >= 1.0 {
            Self::Friend
        } else if total >= 0.3 {
            Self::Friendly
        } else if total >= -0.1 {
            Self::Neutral
        } else if total >= -0.5 {
            Self::Dislike
        } else if total >= -1.5 {
            Self::Enemy
        } else {
            Self::Nemesis
        }
    }

    /// Whether this standing is on the positive side of the ladder.
    #[must_use]
    pub fn is_positive(self) -> bool {
        matches!(self, Self::CloseAlly | Self::Friend | Self::Friendly)
    }

    /// Whether this standing is on the negative side of the ladder.
    #[must_use]
    pub fn is_negative(self) -> bool {
        matches!(self, Self::Dislike | Self::Enemy | Self::Nemesis)
    }

    /// Short human-readable description.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::CloseAlly => "a close ally",
            Self::Friend => "a friend",
            Self::Friendly => "on friendly terms",
            Self::Neutral => "an acquaintance",
            Self::Dislike => "disliked",
            Self::Enemy => "an enemy",
            Self::Nemesis => "a sworn nemesis",
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CloseAlly => "close ally",
            Self::Friend => "friend",
            Self::Friendly => "friendly",
            Self::Neutral => "neutral",
            Self::Dislike => "dislike",
            Self::Enemy => "enemy",
            Self::Nemesis => "nemesis",
        };
        write!(f, "{name}")
    }
}

/// Fixed event → total-value impact table.
#[must_use]
pub fn total_impact(kind: MemoryEventKind) -> f32 {
    use MemoryEventKind as K;
    match kind {
        K::WasAttacked => -0.5,
        K::WasBetrayed => -1.0,
        K::WasRobbed => -0.4,
        K::WasInsulted => -0.15,
        K::WasHelped => 0.6,
        K::WasDefended => 0.5,
        K::WasSaved => 0.7,
        K::SharedDrink => 0.2,
        K::Traded => 0.1,
        K::Conversation => 0.05,
        K::WitnessedCrime => -0.1,
        K::Decision => 0.0,
    }
}

// ---------------------------------------------------------------------------
// Relationship
// ---------------------------------------------------------------------------

/// One recorded impact, kept for inactivity attenuation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactRecord {
    /// When the impact landed.
    pub timestamp: GameTimestamp,
    /// Signed contribution to the total value.
    pub value: f32,
}

/// The full standing toward one other character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    /// Affection component in [-1, 1].
    pub friendship: f32,
    /// Trust component in [0, 1]. Strangers start at 0.5.
    pub trust: f32,
    /// Hostility component in [0, 1].
    pub hostility: f32,
    /// Fear component in [0, 1].
    pub fear: f32,
    /// Cumulative impact total; drives the ladder.
    pub total_value: f32,
    /// Current standing on the ladder.
    pub kind: RelationshipKind,
    /// Number of events recorded about this character.
    pub interaction_count: u32,
    /// Timestamp of the most recent event.
    pub last_event: GameTimestamp,
    /// Whether a betrayal has saturated trust at the floor.
    pub betrayed: bool,
    /// Positive trust goodwill accumulated while betrayed.
    pub pending_trust: f32,
    history: Vec<ImpactRecord>,
}

/// Trust never drops below this.
pub const TRUST_FLOOR: f32 = 0.0;

impl Relationship {
    /// A fresh stranger: neutral components, trust at the midpoint.
    #[must_use]
    pub fn stranger(now: GameTimestamp) -> Self {
        Self {
            friendship: 0.0,
            trust: 0.5,
            hostility: 0.0,
            fear: 0.0,
            total_value: 0.0,
            kind: RelationshipKind::Neutral,
            interaction_count: 0,
            last_event: now,
            betrayed: false,
            pending_trust: 0.0,
            history: Vec::new(),
        }
    }

    fn apply(&mut self, event: &MemoryEvent, recovery_threshold: f32) {
        let impact = signal_impact(event.kind);

        self.friendship = (self.friendship + impact.friendship).clamp(-1.0, 1.0);
        self.hostility = (self.hostility + impact.hostility).clamp(0.0, 1.0);
        self.fear = (self.fear + impact.fear).clamp(0.0, 1.0);

        if impact.saturates_trust {
            self.betrayed = true;
            self.pending_trust = 0.0;
            self.trust = TRUST_FLOOR;
        } else if self.betrayed {
            // While betrayed, positive trust only accumulates as goodwill;
            // the floor holds until enough has stacked up.
            if impact.trust > 0.0 {
                self.pending_trust += impact.trust;
                if self.pending_trust > recovery_threshold {
                    self.betrayed = false;
                    self.trust = (self.pending_trust * 0.25).clamp(0.0, 1.0);
                    self.pending_trust = 0.0;
                }
            }
        } else {
            self.trust = (self.trust + impact.trust).clamp(TRUST_FLOOR, 1.0);
        }

        let value = total_impact(event.kind);
        self.total_value += value;
        self.kind = RelationshipKind::from_total(self.total_value);
        self.interaction_count += 1;
        self.last_event = event.timestamp;
        if value != 0.0 {
            self.history.push(ImpactRecord {
                timestamp: event.timestamp,
                value,
            });
        }
    }

    fn attenuate(&mut self, factor: f32) {
        for record in &mut self.history {
            record.value *= factor;
        }
        self.total_value = self.history.iter().map(|r| r.value).sum();
        self.kind = RelationshipKind::from_total(self.total_value);
        self.friendship *= factor;
        self.hostility *= factor;
        self.fear *= factor;
    }

    /// Recorded impact history, oldest first.
    #[must_use]
    pub fn history(&self) -> &[ImpactRecord] {
        &self.history
    }
}

// ---------------------------------------------------------------------------
// Manager
// ---------------------------------------------------------------------------

/// All relationships of one NPC, keyed by the other character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipManager {
    map: HashMap<CharacterId, Relationship>,
    config: RelationshipConfig,
}

impl RelationshipManager {
    /// Create an empty relationship table.
    #[must_use]
    pub fn new(config: RelationshipConfig) -> Self {
        Self {
            map: HashMap::new(),
            config,
        }
    }

    /// Fold one memory event about `other` into the standing.
    pub fn update(&mut self, other: &CharacterId, event: &MemoryEvent) {
        let threshold = self.config.trust_recovery_threshold;
        let relationship = self
            .map
            .entry(other.clone())
            .or_insert_with(|| Relationship::stranger(event.timestamp));
        relationship.apply(event, threshold);
        tracing::debug!(
            other = %other,
            kind = %relationship.kind,
            total = relationship.total_value,
            "relationship updated"
        );
    }

    /// Attenuate standings untouched for the inactivity window and evict
    /// the ones that have faded to nothing.
    pub fn decay(&mut self, now: GameTimestamp) {
        let window = self.config.inactivity_days;
        let factor = self.config.attenuation;
        let epsilon = self.config.forget_epsilon;
        self.map.retain(|id, rel| {
            if now.days_since(&rel.last_event) > window {
                rel.attenuate(factor);
                if rel.total_value.abs() < epsilon {
                    tracing::debug!(other = %id, "relationship forgotten");
                    return false;
                }
            }
            true
        });
    }

    /// The standing toward `other`; strangers get the default.
    #[must_use]
    pub fn get(&self, other: &CharacterId) -> Option<&Relationship> {
        self.map.get(other)
    }

    /// The standing toward `other`, materialized if absent.
    #[must_use]
    pub fn standing(&self, other: &CharacterId, now: GameTimestamp) -> Relationship {
        self.map
            .get(other)
            .cloned()
            .unwrap_or_else(|| Relationship::stranger(now))
    }

    /// Characters on the positive side of the ladder.
    #[must_use]
    pub fn allies(&self) -> Vec<&CharacterId> {
        self.map
            .iter()
            .filter(|(_, r)| r.kind.is_positive())
            .map(|(id, _)| id)
            .collect()
    }

    /// Characters on the negative side of the ladder.
    #[must_use]
    pub fn enemies(&self) -> Vec<&CharacterId> {
        self.map
            .iter()
            .filter(|(_, r)| r.kind.is_negative())
            .map(|(id, _)| id)
            .collect()
    }

    /// Characters at the neutral rung.
    #[must_use]
    pub fn neutrals(&self) -> Vec<&CharacterId> {
        self.map
            .iter()
            .filter(|(_, r)| r.kind == RelationshipKind::Neutral)
            .map(|(id, _)| id)
            .collect()
    }

    /// Number of tracked characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no relationships are tracked yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// One line per tracked character.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut entries: Vec<_> = self.map.iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()));
        entries
            .iter()
            .map(|(id, r)| {
                format!(
                    "{id}: {} (total {:.2}, trust {:.2}, {} interactions)",
                    r.kind.description(),
                    r.total_value,
                    r.trust,
                    r.interaction_count
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(tick: u64) -> GameTimestamp {
        GameTimestamp::now(tick)
    }

    fn event(kind: MemoryEventKind, tick: u64) -> MemoryEvent {
        MemoryEvent::about(kind, CharacterId::from("rival"), ts(tick))
    }

    #[test]
    fn ladder_maps_totals_to_kinds() {
        assert_eq!(RelationshipKind::from_total(2.5), RelationshipKind::CloseAlly);
        assert_eq!(RelationshipKind::from_total(1.2), RelationshipKind::Friend);
        assert_eq!(RelationshipKind::from_total(0.5), RelationshipKind::Friendly);
        assert_eq!(RelationshipKind::from_total(0.0), RelationshipKind::Neutral);
        assert_eq!(RelationshipKind::from_total(-0.2), RelationshipKind::Dislike);
        assert_eq!(RelationshipKind::from_total(-1.0), RelationshipKind::Enemy);
        assert_eq!(RelationshipKind::from_total(-2.0), RelationshipKind::Nemesis);
    }

    #[test]
    fn betrayal_outweighs_earlier_goodwill() {
        let mut manager = RelationshipManager::new(RelationshipConfig::default());
        let rival = CharacterId::from("rival");
        manager.update(&rival, &event(MemoryEventKind::SharedDrink, 0));
        manager.update(&rival, &event(MemoryEventKind::WasHelped, 100));
        manager.update(&rival, &event(MemoryEventKind::WasBetrayed, 200));

        let rel = manager.get(&rival).expect("tracked");
        assert!((rel.total_value - (-0.2)).abs() < 0.001);
        assert_eq!(rel.kind, RelationshipKind::Dislike);
        assert!(rel.betrayed);
        assert!((rel.trust - TRUST_FLOOR).abs() < f32::EPSILON);
    }

    #[test]
    fn trust_stays_floored_until_goodwill_accumulates() {
        let mut manager = RelationshipManager::new(RelationshipConfig::default());
        let rival = CharacterId::from("rival");
        manager.update(&rival, &event(MemoryEventKind::WasBetrayed, 0));

        // Helped: +0.2 trust goodwill each, floor holds.
        for tick in 1..=7 {
            manager.update(&rival, &event(MemoryEventKind::WasHelped, tick));
            let rel = manager.get(&rival).expect("tracked");
            assert!(
                (rel.trust - TRUST_FLOOR).abs() < f32::EPSILON,
                "floor held at tick {tick}"
            );
        }

        // The eighth push takes accumulated goodwill past the threshold.
        manager.update(&rival, &event(MemoryEventKind::WasHelped, 8));
        let rel = manager.get(&rival).expect("tracked");
        assert!(!rel.betrayed);
        assert!(rel.trust > TRUST_FLOOR);
        assert!(rel.trust < 0.5, "recovery starts low, not at the stranger midpoint");
    }

    #[test]
    fn strangers_default_to_neutral_midpoint_trust() {
        let manager = RelationshipManager::new(RelationshipConfig::default());
        let rel = manager.standing(&CharacterId::from("nobody"), ts(0));
        assert_eq!(rel.kind, RelationshipKind::Neutral);
        assert!((rel.trust - 0.5).abs() < f32::EPSILON);
        assert_eq!(rel.interaction_count, 0);
    }

    #[test]
    fn inactivity_attenuates_then_forgets() {
        let mut manager = RelationshipManager::new(RelationshipConfig::default());
        let rival = CharacterId::from("rival");
        manager.update(&rival, &event(MemoryEventKind::Traded, 0));
        assert!((manager.get(&rival).expect("tracked").total_value - 0.1).abs() < 0.001);

        // 31 simulated days of silence: 0.1 → 0.05 → evicted next pass.
        let later = ts(31 * GameTimestamp::TICKS_PER_DAY);
        manager.decay(later);
        let rel = manager.get(&rival).expect("still tracked");
        assert!((rel.total_value - 0.05).abs() < 0.001);

        manager.decay(later);
        assert!(manager.get(&rival).is_none());
    }

    #[test]
    fn active_relationships_do_not_decay() {
        let mut manager = RelationshipManager::new(RelationshipConfig::default());
        let friend = CharacterId::from("friend");
        manager.update(&friend, &event(MemoryEventKind::WasHelped, 0));
        manager.decay(ts(GameTimestamp::TICKS_PER_DAY));
        let rel = manager.get(&friend).expect("tracked");
        assert!((rel.total_value - 0.6).abs() < 0.001);
    }

    #[test]
    fn allies_and_enemies_partition_by_ladder_side() {
        let mut manager = RelationshipManager::new(RelationshipConfig::default());
        let friend = CharacterId::from("friend");
        let foe = CharacterId::from("foe");
        manager.update(&friend, &event(MemoryEventKind::WasSaved, 0));
        manager.update(&foe, &event(MemoryEventKind::WasAttacked, 0));

        assert_eq!(manager.allies(), vec![&friend]);
        assert_eq!(manager.enemies(), vec![&foe]);
        assert!(manager.neutrals().is_empty());
    }

    #[test]
    fn components_clamp_under_repeated_events() {
        let mut manager = RelationshipManager::new(RelationshipConfig::default());
        let foe = CharacterId::from("foe");
        for tick in 0..20 {
            manager.update(&foe, &event(MemoryEventKind::WasAttacked, tick));
        }
        let rel = manager.get(&foe).expect("tracked");
        assert!(rel.hostility <= 1.0);
        assert!(rel.fear <= 1.0);
        assert!(rel.trust >= TRUST_FLOOR);
        assert_eq!(rel.kind, RelationshipKind::Nemesis);
    }
}
