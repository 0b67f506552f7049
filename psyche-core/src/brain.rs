//! The decision loop tying personality, memory, emotion, goals, and
//! relationships together.
//!
//! `decide_next_action` is the single entry point a simulation calls each
//! time an NPC is free to act: it runs the housekeeping pipeline, generates
//! candidate actions from the current priority goal, scores them by
//! personality weight × emotional modifier, and picks the winner. Highly
//! impulsive NPCs occasionally pick at random instead.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{BrainConfig, PsycheConfig};
use crate::emotion::{EmotionalState, InteractionCategory};
use crate::error::{PsycheError, Result};
use crate::goal::{GoalKind, GoalSystem};
use crate::memory::{MemoryEvent, MemoryEventKind, MemorySystem};
use crate::personality::{Archetype, PersonalityProfile};
use crate::relationship::RelationshipManager;
use crate::types::{ActionKind, CharacterId, GameTimestamp, NpcAction, Score};
use crate::world::{NearbyCharacter, OwnerStatus, WorldSnapshot};

// ---------------------------------------------------------------------------
// Event sink
// ---------------------------------------------------------------------------

/// Observer hooks for decisions and interactions. The default
/// implementations are no-ops, so a sink can subscribe to either hook.
pub trait EventSink: Send {
    /// Called after a decision is made.
    fn on_decision(&self, _id: &CharacterId, _action: &NpcAction, _now: GameTimestamp) {}

    /// Called after an interaction is recorded.
    fn on_interaction(
        &self,
        _id: &CharacterId,
        _other: &CharacterId,
        _kind: InteractionKind,
        _now: GameTimestamp,
    ) {
    }
}

/// The default sink: structured log lines, nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn on_decision(&self, id: &CharacterId, action: &NpcAction, now: GameTimestamp) {
        tracing::info!(
            npc = %id,
            action = %action.kind,
            priority = action.priority,
            target = action.target.as_ref().map(CharacterId::as_str),
            tick = now.tick,
            "decision"
        );
    }

    fn on_interaction(
        &self,
        id: &CharacterId,
        other: &CharacterId,
        kind: InteractionKind,
        now: GameTimestamp,
    ) {
        tracing::debug!(npc = %id, other = %other, kind = ?kind, tick = now.tick, "interaction");
    }
}

// ---------------------------------------------------------------------------
// Interactions
// ---------------------------------------------------------------------------

/// What another character did to this NPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    /// Physical attack.
    Attacked,
    /// Theft.
    Robbed,
    /// Betrayal of standing trust.
    Betrayed,
    /// Verbal insult.
    Insulted,
    /// Practical help.
    Helped,
    /// Defense in a fight.
    Defended,
    /// Rescue from death.
    Saved,
    /// A drink together.
    SharedDrink,
    /// A completed trade.
    Traded,
    /// Small talk.
    Chatted,
}

impl InteractionKind {
    /// The memory event this interaction records as.
    #[must_use]
    pub fn memory_kind(self) -> MemoryEventKind {
        match self {
            Self::Attacked => MemoryEventKind::WasAttacked,
            Self::Robbed => MemoryEventKind::WasRobbed,
            Self::Betrayed => MemoryEventKind::WasBetrayed,
            Self::Insulted => MemoryEventKind::WasInsulted,
            Self::Helped => MemoryEventKind::WasHelped,
            Self::Defended => MemoryEventKind::WasDefended,
            Self::Saved => MemoryEventKind::WasSaved,
            Self::SharedDrink => MemoryEventKind::SharedDrink,
            Self::Traded => MemoryEventKind::Traded,
            Self::Chatted => MemoryEventKind::Conversation,
        }
    }

    /// The emotional category of the interaction.
    #[must_use]
    pub fn category(self) -> InteractionCategory {
        match self {
            Self::Attacked | Self::Robbed | Self::Betrayed | Self::Insulted => {
                InteractionCategory::Hostile
            }
            Self::Helped | Self::Defended | Self::Saved => InteractionCategory::Helpful,
            Self::SharedDrink | Self::Traded | Self::Chatted => InteractionCategory::Social,
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Step-by-step construction of an [`NpcBrain`].
pub struct BrainBuilder {
    id: Option<CharacterId>,
    personality: Option<PersonalityProfile>,
    config: PsycheConfig,
    seed: Option<u64>,
    sink: Box<dyn EventSink>,
}

impl Default for BrainBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BrainBuilder {
    /// Start with defaults everywhere.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: None,
            personality: None,
            config: PsycheConfig::default(),
            seed: None,
            sink: Box::new(TracingSink),
        }
    }

    /// The NPC's character id. Required.
    #[must_use]
    pub fn id(mut self, id: impl Into<CharacterId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// An explicit personality profile. Either this or `archetype` is
    /// required.
    #[must_use]
    pub fn personality(mut self, profile: PersonalityProfile) -> Self {
        self.personality = Some(profile);
        self
    }

    /// Generate the personality from an archetype using the brain's seed.
    #[must_use]
    pub fn archetype(mut self, archetype: Archetype) -> Self {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.personality = Some(PersonalityProfile::generate(archetype, &mut rng));
        self
    }

    /// Tuning parameters. Defaults to [`PsycheConfig::default`].
    #[must_use]
    pub fn config(mut self, config: PsycheConfig) -> Self {
        self.config = config;
        self
    }

    /// Seed the decision RNG for reproducible runs.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace the default [`TracingSink`].
    #[must_use]
    pub fn sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Assemble the brain.
    ///
    /// # Errors
    /// Returns [`PsycheError::NotInitialized`] if the id or personality was
    /// never provided.
    pub fn build(self) -> Result<NpcBrain> {
        let id = self.id.ok_or(PsycheError::NotInitialized("character id"))?;
        let personality = self
            .personality
            .ok_or(PsycheError::NotInitialized("personality"))?;
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(NpcBrain {
            memory: MemorySystem::new(self.config.memory.clone()),
            emotions: EmotionalState::new(self.config.emotion.clone()),
            goals: GoalSystem::new(self.config.goal.clone()),
            relationships: RelationshipManager::new(self.config.relationship.clone()),
            config: self.config.brain,
            id,
            personality,
            rng,
            last_decision: None,
            sink: self.sink,
        })
    }
}

// ---------------------------------------------------------------------------
// Brain
// ---------------------------------------------------------------------------

/// The complete decision-making state of one NPC.
pub struct NpcBrain {
    id: CharacterId,
    personality: PersonalityProfile,
    memory: MemorySystem,
    emotions: EmotionalState,
    goals: GoalSystem,
    relationships: RelationshipManager,
    config: BrainConfig,
    rng: StdRng,
    last_decision: Option<GameTimestamp>,
    sink: Box<dyn EventSink>,
}

impl NpcBrain {
    /// Start building a brain.
    #[must_use]
    pub fn builder() -> BrainBuilder {
        BrainBuilder::new()
    }

    /// This NPC's character id.
    #[must_use]
    pub fn id(&self) -> &CharacterId {
        &self.id
    }

    /// The immutable personality.
    #[must_use]
    pub fn personality(&self) -> &PersonalityProfile {
        &self.personality
    }

    /// The episodic memory store.
    #[must_use]
    pub fn memory(&self) -> &MemorySystem {
        &self.memory
    }

    /// The current emotional state.
    #[must_use]
    pub fn emotions(&self) -> &EmotionalState {
        &self.emotions
    }

    /// The goal list.
    #[must_use]
    pub fn goals(&self) -> &GoalSystem {
        &self.goals
    }

    /// The relationship table.
    #[must_use]
    pub fn relationships(&self) -> &RelationshipManager {
        &self.relationships
    }

    /// Decide what to do next.
    ///
    /// Within the decision cooldown this is a cheap no-op returning
    /// `Continue`. Otherwise it runs the full pipeline: memory and
    /// relationship decay, emotion update, goal update, candidate
    /// generation, scoring, and selection.
    pub fn decide_next_action(
        &mut self,
        world: &WorldSnapshot,
        status: &OwnerStatus,
    ) -> NpcAction {
        let now = world.now;
        if let Some(last) = self.last_decision {
            if now.minutes_since(&last) < self.config.cooldown_minutes {
                return NpcAction::continue_current();
            }
        }

        self.memory.decay(now);
        self.relationships.decay(now);
        let recent = self
            .memory
            .recent_events(self.emotions.recent_window_hours(), now);
        self.emotions.update(&recent, now);
        self.goals
            .update(&self.personality, status, world, &self.memory, &self.emotions, now);

        let candidates = self.candidates(world, status, now);
        let action = self.choose(candidates);

        self.last_decision = Some(now);
        let mut details = serde_json::Map::new();
        details.insert(
            "action".to_string(),
            serde_json::Value::String(action.kind.to_string()),
        );
        if let Some(target) = &action.target {
            details.insert(
                "target".to_string(),
                serde_json::Value::String(target.as_str().to_string()),
            );
        }
        self.memory.record_event(
            MemoryEvent::ambient(MemoryEventKind::Decision, now)
                .with_importance(self.config.decision_importance)
                .with_details(details),
        );
        self.sink.on_decision(&self.id, &action, now);
        action
    }

    /// Candidate actions for the current priority goal, plus the Idle and
    /// Explore baselines that are always on the table.
    fn candidates(
        &self,
        world: &WorldSnapshot,
        status: &OwnerStatus,
        now: GameTimestamp,
    ) -> Vec<NpcAction> {
        let mut candidates = Vec::with_capacity(6);

        if let Some(goal) = self.goals.priority_goal(now) {
            let priority = goal.effective_priority(now).min(3.0);
            match goal.kind {
                GoalKind::Combat => {
                    if let Some(target) = &goal.target {
                        if world.character(target).is_some() {
                            candidates.push(
                                NpcAction::new(ActionKind::Revenge, priority)
                                    .with_target(target.clone()),
                            );
                        } else {
                            // Grudge target is elsewhere: go look.
                            candidates
                                .push(NpcAction::new(ActionKind::Explore, priority * 0.6));
                        }
                    }
                    if world.in_combat && status.health_fraction < 0.3 {
                        candidates.push(NpcAction::new(ActionKind::Flee, priority));
                    }
                }
                GoalKind::Economic => {
                    if let Some(mark) = self.richest_nearby(world) {
                        candidates.push(
                            NpcAction::new(ActionKind::Trade, priority)
                                .with_target(mark.id.clone()),
                        );
                        if self.personality.likely_to_betray() {
                            candidates.push(
                                NpcAction::new(ActionKind::Steal, priority * 0.8)
                                    .with_target(mark.id.clone()),
                            );
                        }
                    } else {
                        candidates.push(NpcAction::new(ActionKind::Explore, priority * 0.7));
                    }
                }
                GoalKind::Social => {
                    if let Some(companion) = self.most_compatible_nearby(world) {
                        candidates.push(
                            NpcAction::new(ActionKind::Socialize, priority)
                                .with_target(companion.id.clone()),
                        );
                    } else {
                        candidates.push(NpcAction::new(ActionKind::Explore, priority * 0.7));
                    }
                    if self.personality.likely_to_join_gang() {
                        candidates.push(NpcAction::new(ActionKind::JoinGang, priority * 0.6));
                    }
                }
                GoalKind::Personal => {
                    candidates.push(NpcAction::new(ActionKind::Rest, priority));
                    if world.in_combat {
                        candidates.push(NpcAction::new(ActionKind::Flee, priority));
                    }
                }
                GoalKind::Power => {
                    if let Some(rival) = self.highest_level_nearby(world) {
                        candidates.push(
                            NpcAction::new(ActionKind::Negotiate, priority)
                                .with_target(rival.id.clone()),
                        );
                        if self.personality.likely_to_betray() && rival.level <= status.level {
                            candidates.push(
                                NpcAction::new(ActionKind::Betray, priority * 0.5)
                                    .with_target(rival.id.clone()),
                            );
                        }
                    } else {
                        candidates.push(NpcAction::new(ActionKind::Explore, priority * 0.7));
                    }
                }
            }
        }

        // Active combat overrides goal silence: fight or flight.
        if world.in_combat && !candidates.iter().any(|c| c.kind == ActionKind::Flee) {
            candidates.push(NpcAction::new(ActionKind::Attack, 0.8));
            candidates.push(NpcAction::new(ActionKind::Flee, 0.8));
        }

        candidates.push(NpcAction::new(ActionKind::Explore, 0.3));
        candidates.push(NpcAction::idle());
        candidates
    }

    /// Score every candidate and pick the winner, or an impulsive random
    /// choice for sufficiently impulsive NPCs.
    fn choose(&mut self, candidates: Vec<NpcAction>) -> NpcAction {
        debug_assert!(!candidates.is_empty());

        if self.personality.impulsiveness > self.config.impulsive_threshold {
            let p = f64::from(self.personality.impulsiveness * self.config.impulsive_scale);
            if self.rng.gen_bool(p.clamp(0.0, 1.0)) {
                let index = self.rng.gen_range(0..candidates.len());
                tracing::debug!(npc = %self.id, "impulsive pick");
                return candidates.into_iter().nth(index).unwrap_or_else(NpcAction::idle);
            }
        }

        candidates
            .into_iter()
            .max_by_key(|action| {
                let weight = self.personality.decision_weight(action.kind);
                let modifier = self.emotions.action_modifier(action.kind);
                Score::new(action.priority * weight * modifier)
            })
            .unwrap_or_else(NpcAction::idle)
    }

    fn richest_nearby<'w>(&self, world: &'w WorldSnapshot) -> Option<&'w NearbyCharacter> {
        world
            .nearby
            .iter()
            .filter(|c| c.id != self.id)
            .max_by_key(|c| c.gold)
    }

    fn most_compatible_nearby<'w>(&self, world: &'w WorldSnapshot) -> Option<&'w NearbyCharacter> {
        world
            .nearby
            .iter()
            .filter(|c| c.id != self.id)
            .max_by_key(|c| {
                let archetype = Archetype::from_tag(&c.archetype_tag);
                Score::new(self.personality.archetype_compatibility(archetype))
            })
    }

    fn highest_level_nearby<'w>(&self, world: &'w WorldSnapshot) -> Option<&'w NearbyCharacter> {
        world
            .nearby
            .iter()
            .filter(|c| c.id != self.id)
            .max_by_key(|c| c.level)
    }

    /// Record that `other` did something to this NPC: the event lands in
    /// memory, moves the relationship, and (for high-salience kinds) shifts
    /// the emotional state immediately.
    pub fn record_interaction(
        &mut self,
        other: &CharacterId,
        kind: InteractionKind,
        now: GameTimestamp,
    ) {
        let memory_kind = kind.memory_kind();
        let event = MemoryEvent::about(memory_kind, other.clone(), now);
        let importance = event.importance;

        self.relationships.update(other, &event);
        self.memory.record_event(event);

        let high_salience = matches!(
            kind,
            InteractionKind::Attacked
                | InteractionKind::Betrayed
                | InteractionKind::Helped
                | InteractionKind::Defended
                | InteractionKind::Saved
        );
        if high_salience {
            self.emotions.process_interaction(kind.category(), importance, now);
        }
        self.sink.on_interaction(&self.id, other, kind, now);
    }

    /// Level-up hook: boosts ongoing self-improvement goals and may spawn
    /// an ambition goal.
    pub fn on_level_up(&mut self, new_level: u32, now: GameTimestamp) {
        self.goals.on_level_up(&self.personality, new_level, now);
        tracing::info!(npc = %self.id, level = new_level, "leveled up");
    }

    /// One-paragraph state summary for debugging and dialogue grounding.
    #[must_use]
    pub fn summary(&self) -> String {
        let mood = self.emotions.current_mood();
        let dominant = self
            .emotions
            .dominant_emotion()
            .map_or_else(|| "calm".to_string(), |e| e.kind.to_string());
        format!(
            "{} ({}): mood {:.2}, feeling {}, {} active goals, {} known characters",
            self.id,
            self.personality.archetype.tag(),
            mood,
            dominant,
            self.goals.active_count(),
            self.memory.known_character_count()
        )
    }

    /// Active goals, one line each, ranked by effective priority at `now`.
    #[must_use]
    pub fn goal_summary(&self, now: GameTimestamp) -> String {
        self.goals.summary(now)
    }

    /// Active emotions, strongest first.
    #[must_use]
    pub fn emotional_summary(&self) -> String {
        self.emotions.summary()
    }

    /// The relationship table, one line per character.
    #[must_use]
    pub fn relationship_summary(&self) -> String {
        self.relationships.summary()
    }
}
