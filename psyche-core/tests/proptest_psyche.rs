//! Property-based tests for psyche-core.
//!
//! Uses `proptest` to verify the structural invariants that hold for every
//! input pattern: trait and intensity clamping, bounded moods and modifiers,
//! the memory cap, and deterministic seeded generation.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use psyche_core::config::{EmotionConfig, MemoryConfig, RelationshipConfig};
use psyche_core::emotion::{EmotionKind, EmotionalState};
use psyche_core::memory::{MemoryEvent, MemoryEventKind, MemorySystem};
use psyche_core::personality::{Archetype, PersonalityProfile, TraitValues};
use psyche_core::relationship::RelationshipManager;
use psyche_core::types::{ActionKind, CharacterId, GameTimestamp};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_traits() -> impl Strategy<Value = TraitValues> {
    (
        0.0..=1.0f32, // aggression
        0.0..=1.0f32, // greed
        0.0..=1.0f32, // courage
        0.0..=1.0f32, // loyalty
        0.0..=1.0f32, // vengefulness
        0.0..=1.0f32, // impulsiveness
        0.0..=1.0f32, // sociability
        0.0..=1.0f32, // ambition
    )
        .prop_map(|(ag, gr, co, lo, ve, im, so, am)| TraitValues {
            aggression: ag,
            greed: gr,
            courage: co,
            loyalty: lo,
            vengefulness: ve,
            impulsiveness: im,
            sociability: so,
            ambition: am,
        })
}

fn arb_archetype() -> impl Strategy<Value = Archetype> {
    prop_oneof![
        Just(Archetype::Thug),
        Just(Archetype::Merchant),
        Just(Archetype::Noble),
        Just(Archetype::Guard),
        Just(Archetype::Farmer),
        Just(Archetype::Commoner),
    ]
}

fn arb_event_kind() -> impl Strategy<Value = MemoryEventKind> {
    prop_oneof![
        Just(MemoryEventKind::WasAttacked),
        Just(MemoryEventKind::WasBetrayed),
        Just(MemoryEventKind::WasHelped),
        Just(MemoryEventKind::WasDefended),
        Just(MemoryEventKind::WasSaved),
        Just(MemoryEventKind::WasRobbed),
        Just(MemoryEventKind::WasInsulted),
        Just(MemoryEventKind::SharedDrink),
        Just(MemoryEventKind::Traded),
        Just(MemoryEventKind::Conversation),
        Just(MemoryEventKind::WitnessedCrime),
    ]
}

fn arb_emotion_kind() -> impl Strategy<Value = EmotionKind> {
    prop_oneof![
        Just(EmotionKind::Joy),
        Just(EmotionKind::Anger),
        Just(EmotionKind::Fear),
        Just(EmotionKind::Sadness),
        Just(EmotionKind::Gratitude),
        Just(EmotionKind::Greed),
        Just(EmotionKind::Loneliness),
        Just(EmotionKind::Curiosity),
        Just(EmotionKind::Confidence),
        Just(EmotionKind::Envy),
        Just(EmotionKind::Hope),
        Just(EmotionKind::Peace),
    ]
}

fn arb_action_kind() -> impl Strategy<Value = ActionKind> {
    prop_oneof![
        Just(ActionKind::Attack),
        Just(ActionKind::Flee),
        Just(ActionKind::Negotiate),
        Just(ActionKind::Steal),
        Just(ActionKind::Help),
        Just(ActionKind::Betray),
        Just(ActionKind::Revenge),
        Just(ActionKind::JoinGang),
        Just(ActionKind::Trade),
        Just(ActionKind::Explore),
        Just(ActionKind::Socialize),
        Just(ActionKind::Rest),
        Just(ActionKind::Idle),
    ]
}

fn ts(tick: u64) -> GameTimestamp {
    GameTimestamp::now(tick)
}

// ---------------------------------------------------------------------------
// Property: generated traits always land inside the archetype's ranges
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn generated_profiles_respect_archetype_ranges(
        archetype in arb_archetype(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let profile = PersonalityProfile::generate(archetype, &mut rng);
        let ranges = archetype.trait_ranges();
        let values = [
            profile.aggression,
            profile.greed,
            profile.courage,
            profile.loyalty,
            profile.vengefulness,
            profile.impulsiveness,
            profile.sociability,
            profile.ambition,
        ];
        for (value, (lo, hi)) in values.iter().zip(ranges.iter()) {
            prop_assert!(*value >= *lo && *value <= *hi);
            prop_assert!((0.0..=1.0).contains(value));
        }
    }

    #[test]
    fn seeded_generation_is_deterministic(
        archetype in arb_archetype(),
        seed in any::<u64>(),
    ) {
        let mut a = StdRng::seed_from_u64(seed);
        let mut b = StdRng::seed_from_u64(seed);
        let first = PersonalityProfile::generate(archetype, &mut a);
        let second = PersonalityProfile::generate(archetype, &mut b);
        prop_assert!((first.aggression - second.aggression).abs() < f32::EPSILON);
        prop_assert!((first.greed - second.greed).abs() < f32::EPSILON);
        prop_assert!((first.ambition - second.ambition).abs() < f32::EPSILON);
        prop_assert_eq!(first.combat_style, second.combat_style);
    }

    #[test]
    fn decision_weights_are_bounded(
        traits in arb_traits(),
        action in arb_action_kind(),
    ) {
        let profile = PersonalityProfile::try_from_traits(Archetype::Commoner, &traits)
            .expect("traits in range by construction");
        let weight = profile.decision_weight(action);
        prop_assert!((0.0..=1.0).contains(&weight));
    }

    #[test]
    fn compatibility_is_bounded_and_symmetric(
        a in arb_traits(),
        b in arb_traits(),
        arch_a in arb_archetype(),
        arch_b in arb_archetype(),
    ) {
        let pa = PersonalityProfile::try_from_traits(arch_a, &a)
            .expect("traits in range by construction");
        let pb = PersonalityProfile::try_from_traits(arch_b, &b)
            .expect("traits in range by construction");
        let ab = pa.compatibility(&pb);
        let ba = pb.compatibility(&pa);
        prop_assert!((0.0..=1.0).contains(&ab));
        prop_assert!((ab - ba).abs() < 1e-5);
    }
}

// ---------------------------------------------------------------------------
// Property: the memory cap holds under any event sequence
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn memory_cap_holds_for_any_event_sequence(
        kinds in prop::collection::vec(arb_event_kind(), 0..400),
    ) {
        let memory = MemorySystem::new(MemoryConfig::default());
        let other = CharacterId::from("partner");
        for (i, kind) in kinds.iter().enumerate() {
            memory.record_event(MemoryEvent::about(*kind, other.clone(), ts(i as u64)));
        }
        prop_assert!(memory.event_count() <= MemoryConfig::default().max_events);
    }

    #[test]
    fn relationship_signals_stay_in_range(
        kinds in prop::collection::vec(arb_event_kind(), 0..100),
    ) {
        let memory = MemorySystem::new(MemoryConfig::default());
        let other = CharacterId::from("partner");
        for (i, kind) in kinds.iter().enumerate() {
            memory.record_event(MemoryEvent::about(*kind, other.clone(), ts(i as u64)));
        }
        let signals = memory.relationship_signals(&other);
        prop_assert!((-1.0..=1.0).contains(&signals.friendship));
        prop_assert!((0.0..=1.0).contains(&signals.trust));
        prop_assert!((0.0..=1.0).contains(&signals.hostility));
        prop_assert!((0.0..=1.0).contains(&signals.fear));
    }
}

// ---------------------------------------------------------------------------
// Property: emotional state stays bounded under arbitrary stimulation
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn emotions_stay_clamped_and_capped(
        additions in prop::collection::vec(
            (arb_emotion_kind(), -2.0..3.0f32, 1.0..600.0f32),
            0..50,
        ),
    ) {
        let mut state = EmotionalState::new(EmotionConfig::default());
        for (i, (kind, intensity, duration)) in additions.iter().enumerate() {
            state.add_emotion(*kind, *intensity, *duration, ts(i as u64));
        }
        prop_assert!(state.active_count() <= EmotionConfig::default().max_active);
        for emotion in state.active_emotions() {
            prop_assert!((0.0..=1.0).contains(&emotion.intensity));
        }
    }

    #[test]
    fn mood_is_always_in_unit_range(
        additions in prop::collection::vec(
            (arb_emotion_kind(), 0.0..=1.0f32),
            0..20,
        ),
    ) {
        let mut state = EmotionalState::new(EmotionConfig::default());
        for (kind, intensity) in &additions {
            state.add_emotion(*kind, *intensity, 120.0, ts(0));
        }
        let mood = state.current_mood();
        prop_assert!((0.0..=1.0).contains(&mood));
    }

    #[test]
    fn action_modifier_respects_the_configured_bounds(
        additions in prop::collection::vec(
            (arb_emotion_kind(), 0.0..=1.0f32),
            0..20,
        ),
        action in arb_action_kind(),
    ) {
        let config = EmotionConfig::default();
        let mut state = EmotionalState::new(config.clone());
        for (kind, intensity) in &additions {
            state.add_emotion(*kind, *intensity, 120.0, ts(0));
        }
        let modifier = state.action_modifier(action);
        prop_assert!(modifier >= config.modifier_floor);
        prop_assert!(modifier <= config.modifier_ceiling);
    }
}

// ---------------------------------------------------------------------------
// Property: relationship totals and components stay bounded
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn relationship_components_stay_bounded(
        kinds in prop::collection::vec(arb_event_kind(), 1..100),
    ) {
        let mut manager = RelationshipManager::new(RelationshipConfig::default());
        let other = CharacterId::from("partner");
        for (i, kind) in kinds.iter().enumerate() {
            manager.update(&other, &MemoryEvent::about(*kind, other.clone(), ts(i as u64)));
        }
        let rel = manager.get(&other).expect("tracked after at least one event");
        prop_assert!((-1.0..=1.0).contains(&rel.friendship));
        prop_assert!((0.0..=1.0).contains(&rel.trust));
        prop_assert!((0.0..=1.0).contains(&rel.hostility));
        prop_assert!((0.0..=1.0).contains(&rel.fear));
        prop_assert_eq!(rel.interaction_count as usize, kinds.len());
    }
}
