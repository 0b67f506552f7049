//! # Psyche Core Library
//!
//! Personality-driven decision making for game NPCs.
//!
//! Every NPC gets an [`NpcBrain`] combining five cooperating subsystems:
//!
//! - [`PersonalityProfile`] — eight immutable traits drawn from an archetype
//! - [`MemorySystem`] — capped, decaying episodic event store
//! - [`EmotionalState`] — short-lived emotions that bias actions and goals
//! - [`GoalSystem`] — trigger-generated objectives with decaying priorities
//! - [`RelationshipManager`] — per-character standings on a fixed ladder
//!
//! The simulation drives the brain with two calls:
//! [`NpcBrain::decide_next_action`] whenever the NPC is free to act, and
//! [`NpcBrain::record_interaction`] whenever something happens to it.
//! Everything runs on the simulated game clock ([`GameTimestamp`], one tick
//! per simulated second); wall time never enters the model.
//!
//! ## Performance Contract
//!
//! All operations are designed for real-time game use:
//! - Interaction recording: < 10μs
//! - Full decision cycle (warm brain): < 100μs
//! - Memory query over a full (150-event) store: < 50μs

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod brain;
pub mod config;
pub mod emotion;
pub mod error;
pub mod goal;
pub mod memory;
pub mod personality;
pub mod relationship;
pub mod types;
pub mod world;

pub use brain::{BrainBuilder, EventSink, InteractionKind, NpcBrain, TracingSink};
pub use config::PsycheConfig;
pub use emotion::{Emotion, EmotionKind, EmotionalState, InteractionCategory};
pub use error::{PsycheError, Result};
pub use goal::{Goal, GoalKind, GoalSystem};
pub use memory::{MemoryEvent, MemoryEventKind, MemorySystem, RelationshipSignals};
pub use personality::{Archetype, CombatStyle, PersonalityProfile, TraitValues};
pub use relationship::{Relationship, RelationshipKind, RelationshipManager};
pub use types::{ActionKind, CharacterId, GameTimestamp, GoalId, MemoryId, NpcAction};
pub use world::{NearbyCharacter, OwnerStatus, WorldSnapshot};
