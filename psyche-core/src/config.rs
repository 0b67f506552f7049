//! Configuration for the Psyche engine.
//!
//! Maps directly to `psyche.toml`. Every tunable the decision loop and its
//! components consume lives here, so tests and game integrations can tighten
//! or relax the engine without code changes.

use serde::{Deserialize, Serialize};

/// Top-level Psyche configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PsycheConfig {
    /// Episodic memory retention and recall.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Transient emotion behavior.
    #[serde(default)]
    pub emotion: EmotionConfig,
    /// Goal generation and decay.
    #[serde(default)]
    pub goal: GoalConfig,
    /// Relationship classification and decay.
    #[serde(default)]
    pub relationship: RelationshipConfig,
    /// Decision loop timing and randomness.
    #[serde(default)]
    pub brain: BrainConfig,
}

impl PsycheConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `PsycheError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::PsycheError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Episodic memory retention policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Hard cap on stored events per NPC. Lowest-importance unprotected
    /// events are pruned first on overflow.
    #[serde(default = "default_150")]
    pub max_events: usize,
    /// Emotional recall window in simulated days. Events older than this no
    /// longer register as "recent" grievances even though the record persists
    /// for historical queries.
    #[serde(default = "default_7_0")]
    pub emotional_window_days: f32,
    /// Unprotected events older than this (days) become prunable by the
    /// periodic decay pass when their importance is below the floor.
    #[serde(default = "default_90_0")]
    pub stale_after_days: f32,
    /// Importance floor for the decay pass.
    #[serde(default = "default_0_3")]
    pub stale_importance_floor: f32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_events: 150,
            emotional_window_days: 7.0,
            stale_after_days: 90.0,
            stale_importance_floor: 0.3,
        }
    }
}

/// Transient emotion behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionConfig {
    /// Maximum concurrent emotions; the weakest is evicted on overflow.
    #[serde(default = "default_5")]
    pub max_active: usize,
    /// Multiplicative intensity decay applied per update call.
    #[serde(default = "default_0_99")]
    pub tick_decay: f32,
    /// Lower clamp on the combined action modifier.
    #[serde(default = "default_0_1")]
    pub modifier_floor: f32,
    /// Upper clamp on the combined action modifier.
    #[serde(default = "default_3_0")]
    pub modifier_ceiling: f32,
    /// Only memory events within this window (hours) generate emotions.
    #[serde(default = "default_2_0")]
    pub recent_window_hours: f32,
    /// Only memory events above this importance generate emotions.
    #[serde(default = "default_0_5")]
    pub generation_importance_threshold: f32,
    /// Total intensity at or above which the NPC counts as unstable.
    #[serde(default = "default_1_5")]
    pub stability_threshold: f32,
}

impl Default for EmotionConfig {
    fn default() -> Self {
        Self {
            max_active: 5,
            tick_decay: 0.99,
            modifier_floor: 0.1,
            modifier_ceiling: 3.0,
            recent_window_hours: 2.0,
            generation_importance_threshold: 0.5,
            stability_threshold: 1.5,
        }
    }
}

/// Goal generation and decay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalConfig {
    /// Multiplicative priority decay applied per update call.
    #[serde(default = "default_0_995")]
    pub priority_decay: f32,
    /// Goals whose priority drops below this are deactivated.
    #[serde(default = "default_0_1")]
    pub deactivate_below: f32,
    /// Gold at which a wealth goal counts as completed.
    #[serde(default = "default_500")]
    pub wealth_target: u32,
    /// Gold below which greedy NPCs generate an earn-money goal.
    #[serde(default = "default_100")]
    pub low_gold: u32,
    /// Health fraction below which a heal goal is generated.
    #[serde(default = "default_0_4")]
    pub low_health: f32,
    /// Maximum concurrent revenge goals.
    #[serde(default = "default_2")]
    pub max_revenge_goals: usize,
    /// Minimum level before ambition goals appear.
    #[serde(default = "default_10")]
    pub ruler_min_level: u32,
    /// Known-character count below which sociable NPCs seek friends.
    #[serde(default = "default_2_usize")]
    pub lonely_known_count: usize,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            priority_decay: 0.995,
            deactivate_below: 0.1,
            wealth_target: 500,
            low_gold: 100,
            low_health: 0.4,
            max_revenge_goals: 2,
            ruler_min_level: 10,
            lonely_known_count: 2,
        }
    }
}

/// Relationship classification and decay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipConfig {
    /// Days of inactivity after which historical impacts are attenuated.
    #[serde(default = "default_30_0")]
    pub inactivity_days: f32,
    /// Attenuation factor applied to stale impact history.
    #[serde(default = "default_0_5")]
    pub attenuation: f32,
    /// Relationships with |total value| below this are evicted.
    #[serde(default = "default_0_05")]
    pub forget_epsilon: f32,
    /// Positive trust impacts must sum past this before trust recovers from
    /// a betrayal.
    #[serde(default = "default_1_5")]
    pub trust_recovery_threshold: f32,
}

impl Default for RelationshipConfig {
    fn default() -> Self {
        Self {
            inactivity_days: 30.0,
            attenuation: 0.5,
            forget_epsilon: 0.05,
            trust_recovery_threshold: 1.5,
        }
    }
}

/// Decision loop timing and randomness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrainConfig {
    /// Minimum simulated minutes between two full decision cycles.
    #[serde(default = "default_15_0")]
    pub cooldown_minutes: f32,
    /// Impulsiveness above which weighted-random selection can kick in.
    #[serde(default = "default_0_7")]
    pub impulsive_threshold: f32,
    /// Probability scale: p(random pick) = impulsiveness × this.
    #[serde(default = "default_0_3")]
    pub impulsive_scale: f32,
    /// Importance assigned to the self-recorded decision memory.
    #[serde(default = "default_0_2")]
    pub decision_importance: f32,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            cooldown_minutes: 15.0,
            impulsive_threshold: 0.7,
            impulsive_scale: 0.3,
            decision_importance: 0.2,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_0_05() -> f32 { 0.05 }
fn default_0_1() -> f32 { 0.1 }
fn default_0_2() -> f32 { 0.2 }
fn default_0_3() -> f32 { 0.3 }
fn default_0_4() -> f32 { 0.4 }
fn default_0_5() -> f32 { 0.5 }
fn default_0_7() -> f32 { 0.7 }
fn default_0_99() -> f32 { 0.99 }
fn default_0_995() -> f32 { 0.995 }
fn default_1_5() -> f32 { 1.5 }
fn default_2_0() -> f32 { 2.0 }
fn default_3_0() -> f32 { 3.0 }
fn default_7_0() -> f32 { 7.0 }
fn default_15_0() -> f32 { 15.0 }
fn default_30_0() -> f32 { 30.0 }
fn default_90_0() -> f32 { 90.0 }
fn default_2() -> usize { 2 }
fn default_2_usize() -> usize { 2 }
fn default_5() -> usize { 5 }
fn default_10() -> u32 { 10 }
fn default_100() -> u32 { 100 }
fn default_150() -> usize { 150 }
fn default_500() -> u32 { 500 }
