//! Transient emotion model — time-decaying mood effects.
//!
//! At most five emotions are active at once; the weakest is evicted on
//! overflow. Active emotions multiplicatively bias action scoring through
//! the fixed (emotion × action) multiplier table, and new emotions are
//! generated from recent, important memory events.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::config::EmotionConfig;
use crate::error::{PsycheError, Result};
use crate::memory::{MemoryEvent, MemoryEventKind};
use crate::types::{ActionKind, GameTimestamp};

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

/// The closed set of twelve emotions an NPC can feel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmotionKind {
    /// Delight and good spirits.
    Joy,
    /// Self-assurance.
    Confidence,
    /// Thankfulness toward a benefactor.
    Gratitude,
    /// Expectation of better things.
    Hope,
    /// Calm contentment.
    Peace,
    /// Hot antagonism.
    Anger,
    /// Dread of harm.
    Fear,
    /// Grief and low spirits.
    Sadness,
    /// Acquisitive hunger.
    Greed,
    /// Ache for company.
    Loneliness,
    /// Resentment of what others have.
    Envy,
    /// Pull toward the unknown.
    Curiosity,
}

impl EmotionKind {
    /// Sign of this emotion's contribution to overall mood:
    /// +1 uplifting, −1 dragging, 0 neutral.
    #[must_use]
    pub fn mood_sign(self) -> f32 {
        match self {
            Self::Joy | Self::Confidence | Self::Gratitude | Self::Hope | Self::Peace => 1.0,
            Self::Anger
            | Self::Fear
            | Self::Sadness
            | Self::Greed
            | Self::Loneliness
            | Self::Envy => -1.0,
            Self::Curiosity => 0.0,
        }
    }
}

impl fmt::Display for EmotionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Joy => "joy",
            Self::Confidence => "confidence",
            Self::Gratitude => "gratitude",
            Self::Hope => "hope",
            Self::Peace => "peace",
            Self::Anger => "anger",
            Self::Fear => "fear",
            Self::Sadness => "sadness",
            Self::Greed => "greed",
            Self::Loneliness => "loneliness",
            Self::Envy => "envy",
            Self::Curiosity => "curiosity",
        };
        write!(f, "{name}")
    }
}

/// Interaction categories used by `process_interaction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionCategory {
    /// Attacks, theft, betrayal.
    Hostile,
    /// Help, defense, rescue.
    Helpful,
    /// Drinks, talk, trade.
    Social,
}

// ---------------------------------------------------------------------------
// One active emotion
// ---------------------------------------------------------------------------

/// One active, decaying mood effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Emotion {
    /// Which emotion this is.
    pub kind: EmotionKind,
    /// Current intensity in [0, 1].
    pub intensity: f32,
    /// Lifetime in simulated minutes from `started`.
    pub duration_minutes: f32,
    /// When the timer (re)started.
    pub started: GameTimestamp,
}

impl Emotion {
    /// Create an emotion without clamping — the fail-fast entry point.
    ///
    /// # Errors
    /// Returns [`PsycheError::IntensityOutOfRange`] if intensity is outside
    /// [0, 1].
    pub fn try_new(
        kind: EmotionKind,
        intensity: f32,
        duration_minutes: f32,
        started: GameTimestamp,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&intensity) {
            return Err(PsycheError::IntensityOutOfRange(intensity));
        }
        Ok(Self {
            kind,
            intensity,
            duration_minutes,
            started,
        })
    }

    /// Whether this emotion has run its course.
    #[must_use]
    pub fn is_expired(&self, now: GameTimestamp) -> bool {
        now.minutes_since(&self.started) >= self.duration_minutes
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Fixed mapping: memory event kind → (emotion, intensity, duration minutes).
/// Kinds with no entry generate nothing.
#[must_use]
pub fn event_emotion(kind: MemoryEventKind) -> Option<(EmotionKind, f32, f32)> {
    match kind {
        MemoryEventKind::WasAttacked => Some((EmotionKind::Anger, 0.7, 180.0)),
        MemoryEventKind::WasBetrayed => Some((EmotionKind::Anger, 0.8, 360.0)),
        MemoryEventKind::WasRobbed => Some((EmotionKind::Anger, 0.6, 120.0)),
        MemoryEventKind::WasInsulted => Some((EmotionKind::Anger, 0.4, 60.0)),
        MemoryEventKind::WasHelped => Some((EmotionKind::Gratitude, 0.6, 180.0)),
        MemoryEventKind::WasDefended => Some((EmotionKind::Gratitude, 0.7, 240.0)),
        MemoryEventKind::WasSaved => Some((EmotionKind::Gratitude, 0.9, 360.0)),
        MemoryEventKind::SharedDrink => Some((EmotionKind::Joy, 0.5, 90.0)),
        MemoryEventKind::Traded => Some((EmotionKind::Confidence, 0.3, 60.0)),
        MemoryEventKind::Conversation => Some((EmotionKind::Joy, 0.2, 45.0)),
        MemoryEventKind::WitnessedCrime => Some((EmotionKind::Fear, 0.4, 90.0)),
        MemoryEventKind::Decision => None,
    }
}

/// Fixed (emotion × action) multiplier table. Pairs with no rule default to
/// a neutral 1.0; the result is interpolated by the emotion's intensity.
#[must_use]
pub fn action_multiplier(emotion: EmotionKind, action: ActionKind) -> f32 {
    use ActionKind as A;
    use EmotionKind as E;
    match (emotion, action) {
        (E::Anger, A::Attack) => 1.5,
        (E::Anger, A::Revenge) => 1.6,
        (E::Anger, A::Negotiate) => 0.6,
        (E::Anger, A::Help) => 0.7,
        (E::Anger, A::Flee) => 0.8,
        (E::Fear, A::Flee) => 1.8,
        (E::Fear, A::Attack) => 0.5,
        (E::Fear, A::Explore) => 0.6,
        (E::Fear, A::Steal) => 0.7,
        (E::Joy, A::Socialize) => 1.4,
        (E::Joy, A::Help) => 1.3,
        (E::Joy, A::Trade) => 1.2,
        (E::Joy, A::Attack) => 0.8,
        (E::Confidence, A::Attack) => 1.3,
        (E::Confidence, A::Negotiate) => 1.2,
        (E::Confidence, A::Explore) => 1.2,
        (E::Confidence, A::Flee) => 0.7,
        (E::Gratitude, A::Help) => 1.5,
        (E::Gratitude, A::Betray) => 0.4,
        (E::Sadness, A::Socialize) => 0.7,
        (E::Sadness, A::Explore) => 0.8,
        (E::Sadness, A::Idle) => 1.3,
        (E::Greed, A::Steal) => 1.5,
        (E::Greed, A::Trade) => 1.4,
        (E::Greed, A::Help) => 0.8,
        (E::Envy, A::Steal) => 1.3,
        (E::Envy, A::Betray) => 1.3,
        (E::Loneliness, A::Socialize) => 1.5,
        (E::Loneliness, A::JoinGang) => 1.3,
        (E::Hope, A::Explore) => 1.3,
        (E::Peace, A::Attack) => 0.6,
        (E::Peace, A::Revenge) => 0.5,
        (E::Curiosity, A::Explore) => 1.5,
        _ => 1.0,
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// The set of active emotions for one NPC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionalState {
    active: Vec<Emotion>,
    config: EmotionConfig,
}

impl EmotionalState {
    /// Create an empty emotional state.
    #[must_use]
    pub fn new(config: EmotionConfig) -> Self {
        Self {
            active: Vec::new(),
            config,
        }
    }

    /// Add an emotion, clamping intensity to [0, 1].
    ///
    /// If the kind is already active the two merge: intensity becomes
    /// min(1, old + new × 0.5), duration becomes the longer of the two, and
    /// the timer restarts. If the active count then exceeds the cap, the
    /// single weakest emotion is evicted.
    pub fn add_emotion(
        &mut self,
        kind: EmotionKind,
        intensity: f32,
        duration_minutes: f32,
        now: GameTimestamp,
    ) {
        let intensity = intensity.clamp(0.0, 1.0);

        if let Some(existing) = self.active.iter_mut().find(|e| e.kind == kind) {
            existing.intensity = (existing.intensity + intensity * 0.5).min(1.0);
            existing.duration_minutes = existing.duration_minutes.max(duration_minutes);
            existing.started = now;
            return;
        }

        self.active.push(Emotion {
            kind,
            intensity,
            duration_minutes,
            started: now,
        });

        if self.active.len() > self.config.max_active {
            if let Some(weakest) = self
                .active
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| {
                    a.intensity
                        .partial_cmp(&b.intensity)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .map(|(i, _)| i)
            {
                self.active.remove(weakest);
            }
        }
    }

    /// One housekeeping pass: expire finished emotions, generate new ones
    /// from recent important memory events, then apply the slow decay.
    pub fn update(&mut self, recent_events: &[Arc<MemoryEvent>], now: GameTimestamp) {
        self.active.retain(|e| !e.is_expired(now));

        let threshold = self.config.generation_importance_threshold;
        let window = self.config.recent_window_hours;
        for event in recent_events {
            if event.importance <= threshold || now.hours_since(&event.timestamp) > window {
                continue;
            }
            if let Some((kind, intensity, duration)) = event_emotion(event.kind) {
                self.add_emotion(kind, intensity, duration, now);
            }
        }

        let decay = self.config.tick_decay;
        for emotion in &mut self.active {
            emotion.intensity *= decay;
        }
        self.active.retain(|e| e.intensity > 0.01);
    }

    /// Combined multiplicative modifier for an action kind, clamped to the
    /// configured [floor, ceiling]. Each active emotion contributes its
    /// table multiplier interpolated by intensity.
    #[must_use]
    pub fn action_modifier(&self, action: ActionKind) -> f32 {
        let mut product = 1.0_f32;
        for emotion in &self.active {
            let table = action_multiplier(emotion.kind, action);
            product *= 1.0 + (table - 1.0) * emotion.intensity;
        }
        product.clamp(self.config.modifier_floor, self.config.modifier_ceiling)
    }

    /// Overall mood in [0, 1]. Exactly 0.5 with no active emotions;
    /// otherwise the signed intensity average mapped from [−1, 1].
    #[must_use]
    pub fn current_mood(&self) -> f32 {
        if self.active.is_empty() {
            return 0.5;
        }
        let sum: f32 = self
            .active
            .iter()
            .map(|e| e.kind.mood_sign() * e.intensity)
            .sum();
        let avg = sum / self.active.len() as f32;
        ((avg + 1.0) / 2.0).clamp(0.0, 1.0)
    }

    /// The strongest active emotion, if any.
    #[must_use]
    pub fn dominant_emotion(&self) -> Option<&Emotion> {
        self.active.iter().max_by(|a, b| {
            a.intensity
                .partial_cmp(&b.intensity)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// Whether an emotion of this kind is currently active.
    #[must_use]
    pub fn has_emotion(&self, kind: EmotionKind) -> bool {
        self.active.iter().any(|e| e.kind == kind)
    }

    /// Intensity of the given kind, or 0.0 if not active.
    #[must_use]
    pub fn intensity_of(&self, kind: EmotionKind) -> f32 {
        self.active
            .iter()
            .find(|e| e.kind == kind)
            .map_or(0.0, |e| e.intensity)
    }

    /// Emotionally stable while total intensity stays below the threshold.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.active.iter().map(|e| e.intensity).sum::<f32>() < self.config.stability_threshold
    }

    /// Number of active emotions.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// All active emotions, strongest first.
    #[must_use]
    pub fn active_emotions(&self) -> Vec<&Emotion> {
        let mut emotions: Vec<&Emotion> = self.active.iter().collect();
        emotions.sort_by(|a, b| {
            b.intensity
                .partial_cmp(&a.intensity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        emotions
    }

    /// One line per active emotion, strongest first, or "calm" when empty.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.active.is_empty() {
            return "calm".to_string();
        }
        self.active_emotions()
            .iter()
            .map(|e| format!("{} ({:.2})", e.kind, e.intensity))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The window (in simulated hours) within which memory events can still
    /// generate emotions.
    #[must_use]
    pub fn recent_window_hours(&self) -> f32 {
        self.config.recent_window_hours
    }

    /// Map an interaction category to the corresponding emotion additions,
    /// scaled by the interaction's importance.
    pub fn process_interaction(
        &mut self,
        category: InteractionCategory,
        importance: f32,
        now: GameTimestamp,
    ) {
        let importance = importance.clamp(0.0, 1.0);
        match category {
            InteractionCategory::Hostile => {
                self.add_emotion(EmotionKind::Anger, 0.7 * importance, 180.0, now);
                self.add_emotion(EmotionKind::Fear, 0.4 * importance, 120.0, now);
            }
            InteractionCategory::Helpful => {
                self.add_emotion(EmotionKind::Gratitude, 0.8 * importance, 180.0, now);
            }
            InteractionCategory::Social => {
                self.add_emotion(EmotionKind::Joy, 0.5 * importance, 90.0, now);
            }
        }
    }
}
