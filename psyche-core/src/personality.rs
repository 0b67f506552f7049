//! Static personality model — the fixed behavioral tendencies of one NPC.
//!
//! A profile is generated once at spawn from archetype-specific trait ranges
//! and is read-only afterwards. Everything downstream (decision weights,
//! goal triggers, compatibility) derives from the eight normalized traits.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{PsycheError, Result};
use crate::types::ActionKind;

// ---------------------------------------------------------------------------
// Archetypes
// ---------------------------------------------------------------------------

/// A named personality template defining trait generation ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    /// Street muscle — aggressive, brave, not much of a talker.
    Thug,
    /// Trader — greedy, sociable, conflict-averse.
    Merchant,
    /// Aristocrat — ambitious, proud, disloyal when it pays.
    Noble,
    /// Watchman — loyal, brave, rule-bound.
    Guard,
    /// Field worker — steady, modest ambitions.
    Farmer,
    /// The default template for everyone else.
    Commoner,
}

impl Archetype {
    /// Resolve an archetype from a free-form tag. Unknown tags fall back to
    /// [`Archetype::Commoner`] — this never fails.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "thug" | "bandit" => Self::Thug,
            "merchant" | "trader" => Self::Merchant,
            "noble" => Self::Noble,
            "guard" | "soldier" => Self::Guard,
            "farmer" | "peasant" => Self::Farmer,
            _ => Self::Commoner,
        }
    }

    /// Canonical tag string.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Thug => "thug",
            Self::Merchant => "merchant",
            Self::Noble => "noble",
            Self::Guard => "guard",
            Self::Farmer => "farmer",
            Self::Commoner => "commoner",
        }
    }

    /// Per-trait generation ranges, in declaration order of the eight traits:
    /// aggression, greed, courage, loyalty, vengefulness, impulsiveness,
    /// sociability, ambition.
    #[must_use]
    pub fn trait_ranges(self) -> [(f32, f32); 8] {
        match self {
            Self::Thug => [
                (0.7, 1.0), // aggression
                (0.5, 0.9), // greed
                (0.6, 1.0), // courage
                (0.2, 0.6), // loyalty
                (0.5, 0.9), // vengefulness
                (0.5, 0.9), // impulsiveness
                (0.3, 0.7), // sociability
                (0.3, 0.7), // ambition
            ],
            Self::Merchant => [
                (0.0, 0.3), // aggression
                (0.7, 1.0), // greed
                (0.2, 0.6), // courage
                (0.4, 0.8), // loyalty
                (0.2, 0.5), // vengefulness
                (0.1, 0.4), // impulsiveness
                (0.6, 1.0), // sociability
                (0.5, 0.9), // ambition
            ],
            Self::Noble => [
                (0.2, 0.6), // aggression
                (0.5, 0.9), // greed
                (0.3, 0.7), // courage
                (0.2, 0.6), // loyalty
                (0.4, 0.8), // vengefulness
                (0.2, 0.5), // impulsiveness
                (0.5, 0.9), // sociability
                (0.7, 1.0), // ambition
            ],
            Self::Guard => [
                (0.4, 0.8), // aggression
                (0.1, 0.4), // greed
                (0.6, 1.0), // courage
                (0.7, 1.0), // loyalty
                (0.3, 0.6), // vengefulness
                (0.1, 0.4), // impulsiveness
                (0.3, 0.7), // sociability
                (0.2, 0.6), // ambition
            ],
            Self::Farmer => [
                (0.1, 0.4), // aggression
                (0.2, 0.6), // greed
                (0.3, 0.7), // courage
                (0.5, 0.9), // loyalty
                (0.1, 0.4), // vengefulness
                (0.1, 0.5), // impulsiveness
                (0.4, 0.8), // sociability
                (0.1, 0.4), // ambition
            ],
            Self::Commoner => [
                (0.2, 0.8), // aggression
                (0.2, 0.8), // greed
                (0.2, 0.8), // courage
                (0.2, 0.8), // loyalty
                (0.2, 0.8), // vengefulness
                (0.1, 0.9), // impulsiveness
                (0.2, 0.8), // sociability
                (0.2, 0.8), // ambition
            ],
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Preferred combat style, derived from the trait vector at generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatStyle {
    /// Presses the attack.
    Aggressive,
    /// Holds ground, fights when forced.
    Defensive,
    /// Avoids combat entirely when possible.
    Evasive,
    /// No strong preference.
    Balanced,
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// The fixed trait vector of one NPC. All traits are in [0, 1].
///
/// Immutable after creation: the engine reads it, nothing writes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalityProfile {
    /// Tendency toward violence.
    pub aggression: f32,
    /// Desire for wealth.
    pub greed: f32,
    /// Willingness to face danger.
    pub courage: f32,
    /// Faithfulness to allies and groups.
    pub loyalty: f32,
    /// Tendency to hold and act on grudges.
    pub vengefulness: f32,
    /// Tendency to act without deliberation.
    pub impulsiveness: f32,
    /// Appetite for company and talk.
    pub sociability: f32,
    /// Hunger for status and power.
    pub ambition: f32,
    /// Preferred combat style.
    pub combat_style: CombatStyle,
    /// The template this profile was generated from.
    pub archetype: Archetype,
    /// Things this NPC fears, for flavor and dialogue collaborators.
    pub fears: Vec<String>,
    /// Things this NPC wants, for flavor and dialogue collaborators.
    pub desires: Vec<String>,
}

impl PersonalityProfile {
    /// Generate a profile for an archetype, drawing each trait from the
    /// archetype's sub-range of [0, 1].
    pub fn generate<R: Rng + ?Sized>(archetype: Archetype, rng: &mut R) -> Self {
        let ranges = archetype.trait_ranges();
        let draw = |rng: &mut R, (lo, hi): (f32, f32)| -> f32 {
            let value = if (hi - lo).abs() < f32::EPSILON {
                lo
            } else {
                rng.gen_range(lo..hi)
            };
            value.clamp(0.0, 1.0)
        };

        let aggression = draw(rng, ranges[0]);
        let greed = draw(rng, ranges[1]);
        let courage = draw(rng, ranges[2]);
        let loyalty = draw(rng, ranges[3]);
        let vengefulness = draw(rng, ranges[4]);
        let impulsiveness = draw(rng, ranges[5]);
        let sociability = draw(rng, ranges[6]);
        let ambition = draw(rng, ranges[7]);

        let combat_style = if aggression > 0.65 && courage > 0.5 {
            CombatStyle::Aggressive
        } else if courage < 0.35 {
            CombatStyle::Evasive
        } else if aggression < 0.35 {
            CombatStyle::Defensive
        } else {
            CombatStyle::Balanced
        };

        let mut profile = Self {
            aggression,
            greed,
            courage,
            loyalty,
            vengefulness,
            impulsiveness,
            sociability,
            ambition,
            combat_style,
            archetype,
            fears: Vec::new(),
            desires: Vec::new(),
        };
        profile.seed_fears_and_desires();
        profile
    }

    /// Build a profile from explicit trait values without clamping.
    ///
    /// This is the fail-fast entry point: any trait outside [0, 1] is a
    /// programmer error.
    ///
    /// # Errors
    /// Returns [`PsycheError::TraitOutOfRange`] for the first invalid trait.
    pub fn try_from_traits(archetype: Archetype, traits: &TraitValues) -> Result<Self> {
        let checks: [(&'static str, f32); 8] = [
            ("aggression", traits.aggression),
            ("greed", traits.greed),
            ("courage", traits.courage),
            ("loyalty", traits.loyalty),
            ("vengefulness", traits.vengefulness),
            ("impulsiveness", traits.impulsiveness),
            ("sociability", traits.sociability),
            ("ambition", traits.ambition),
        ];
        for (name, value) in checks {
            if !(0.0..=1.0).contains(&value) {
                return Err(PsycheError::TraitOutOfRange { name, value });
            }
        }

        let mut profile = Self {
            aggression: traits.aggression,
            greed: traits.greed,
            courage: traits.courage,
            loyalty: traits.loyalty,
            vengefulness: traits.vengefulness,
            impulsiveness: traits.impulsiveness,
            sociability: traits.sociability,
            ambition: traits.ambition,
            combat_style: CombatStyle::Balanced,
            archetype,
            fears: Vec::new(),
            desires: Vec::new(),
        };
        profile.seed_fears_and_desires();
        Ok(profile)
    }

    fn seed_fears_and_desires(&mut self) {
        if self.courage < 0.3 {
            self.fears.push("violence".to_string());
        }
        if self.loyalty > 0.7 {
            self.fears.push("betrayal".to_string());
        }
        if self.greed > 0.6 {
            self.fears.push("poverty".to_string());
            self.desires.push("wealth".to_string());
        }
        if self.ambition > 0.7 {
            self.desires.push("power".to_string());
        }
        if self.sociability > 0.7 {
            self.desires.push("companionship".to_string());
            self.fears.push("loneliness".to_string());
        }
        if self.desires.is_empty() {
            self.desires.push("a quiet life".to_string());
        }
    }

    /// Compatibility with another profile, in [0, 1].
    ///
    /// 1 − mean absolute difference over (aggression, loyalty, sociability,
    /// ambition), plus an archetype-pair affinity bonus/penalty.
    #[must_use]
    pub fn compatibility(&self, other: &Self) -> f32 {
        let diff = ((self.aggression - other.aggression).abs()
            + (self.loyalty - other.loyalty).abs()
            + (self.sociability - other.sociability).abs()
            + (self.ambition - other.ambition).abs())
            / 4.0;
        let base = 1.0 - diff;
        (base + archetype_affinity(self.archetype, other.archetype)).clamp(0.0, 1.0)
    }

    /// Compatibility estimate from archetype alone, in [0, 1], for
    /// characters whose full profile is not visible. Centered on 0.5 plus
    /// the archetype-pair affinity.
    #[must_use]
    pub fn archetype_compatibility(&self, other: Archetype) -> f32 {
        (0.5 + archetype_affinity(self.archetype, other)).clamp(0.0, 1.0)
    }

    /// Personality weight for a candidate action kind, in [0, 1].
    ///
    /// Each scored kind blends two or three relevant traits with fixed
    /// linear coefficients; unscored kinds return a neutral 0.5.
    #[must_use]
    pub fn decision_weight(&self, kind: ActionKind) -> f32 {
        let w = match kind {
            ActionKind::Attack => {
                0.5 * self.aggression + 0.3 * self.courage + 0.2 * self.vengefulness
            }
            ActionKind::Flee => 0.6 * (1.0 - self.courage) + 0.4 * (1.0 - self.aggression),
            ActionKind::Negotiate => {
                0.5 * self.sociability + 0.3 * (1.0 - self.aggression) + 0.2 * self.ambition
            }
            ActionKind::Steal => {
                0.5 * self.greed + 0.3 * self.impulsiveness + 0.2 * (1.0 - self.loyalty)
            }
            ActionKind::Help => 0.5 * self.loyalty + 0.3 * self.sociability + 0.2 * self.courage,
            ActionKind::Betray => {
                0.4 * (1.0 - self.loyalty) + 0.3 * self.greed + 0.3 * self.ambition
            }
            ActionKind::Revenge => {
                0.6 * self.vengefulness + 0.2 * self.aggression + 0.2 * self.courage
            }
            ActionKind::JoinGang => {
                0.4 * self.sociability + 0.3 * self.loyalty + 0.3 * self.ambition
            }
            ActionKind::Trade => 0.6 * self.greed + 0.4 * self.sociability,
            ActionKind::Explore => {
                0.5 * self.impulsiveness + 0.3 * self.courage + 0.2 * self.ambition
            }
            _ => 0.5,
        };
        w.clamp(0.0, 1.0)
    }

    /// Whether this NPC would plausibly join an organized gang.
    #[must_use]
    pub fn likely_to_join_gang(&self) -> bool {
        let pull = 0.3 * self.loyalty
            + 0.3 * self.sociability
            + 0.2 * self.ambition
            + 0.2 * self.courage;
        pull > 0.6 && self.aggression > 0.3
    }

    /// Whether this NPC would plausibly betray an ally for gain.
    #[must_use]
    pub fn likely_to_betray(&self) -> bool {
        let pull = 0.4 * (1.0 - self.loyalty)
            + 0.25 * self.greed
            + 0.2 * self.ambition
            + 0.15 * self.impulsiveness;
        pull > 0.7
    }

    /// Whether this NPC holds grudges hard enough to act on them.
    #[must_use]
    pub fn likely_to_seek_revenge(&self) -> bool {
        self.vengefulness > 0.6 && (self.aggression > 0.4 || self.ambition > 0.5)
    }
}

/// Explicit trait values for the non-clamping constructor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TraitValues {
    /// Tendency toward violence.
    pub aggression: f32,
    /// Desire for wealth.
    pub greed: f32,
    /// Willingness to face danger.
    pub courage: f32,
    /// Faithfulness to allies and groups.
    pub loyalty: f32,
    /// Tendency to hold and act on grudges.
    pub vengefulness: f32,
    /// Tendency to act without deliberation.
    pub impulsiveness: f32,
    /// Appetite for company and talk.
    pub sociability: f32,
    /// Hunger for status and power.
    pub ambition: f32,
}

impl Default for TraitValues {
    fn default() -> Self {
        Self {
            aggression: 0.5,
            greed: 0.5,
            courage: 0.5,
            loyalty: 0.5,
            vengefulness: 0.5,
            impulsiveness: 0.5,
            sociability: 0.5,
            ambition: 0.5,
        }
    }
}

/// Fixed affinity between two archetypes, added to trait compatibility.
/// Symmetric; pairs not listed score 0.
fn archetype_affinity(a: Archetype, b: Archetype) -> f32 {
    use Archetype::{Commoner, Farmer, Guard, Merchant, Noble, Thug};
    // Normalize the pair so the table only lists each combination once.
    let pair = if (a as u8) <= (b as u8) { (a, b) } else { (b, a) };
    match pair {
        (Thug, Thug) => 0.1,
        (Thug, Merchant) => -0.15,
        (Thug, Noble) => -0.2,
        (Thug, Guard) => -0.25,
        (Merchant, Merchant) => 0.1,
        (Merchant, Noble) => 0.1,
        (Noble, Noble) => -0.05,
        (Guard, Guard) => 0.15,
        (Guard, Farmer) => 0.1,
        (Farmer, Farmer) => 0.1,
        (Farmer, Commoner) | (Commoner, Commoner) => 0.05,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn thug_traits_stay_in_archetype_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let p = PersonalityProfile::generate(Archetype::Thug, &mut rng);
            assert!((0.7..=1.0).contains(&p.aggression), "aggression {}", p.aggression);
            assert!((0.6..=1.0).contains(&p.courage), "courage {}", p.courage);
            assert!((0.3..=0.7).contains(&p.sociability), "sociability {}", p.sociability);
        }
    }

    #[test]
    fn unknown_archetype_falls_back_to_commoner() {
        assert_eq!(Archetype::from_tag("lich king"), Archetype::Commoner);
        assert_eq!(Archetype::from_tag("MERCHANT"), Archetype::Merchant);
    }

    #[test]
    fn generated_traits_always_normalized() {
        let mut rng = StdRng::seed_from_u64(7);
        for archetype in [
            Archetype::Thug,
            Archetype::Merchant,
            Archetype::Noble,
            Archetype::Guard,
            Archetype::Farmer,
            Archetype::Commoner,
        ] {
            let p = PersonalityProfile::generate(archetype, &mut rng);
            for t in [
                p.aggression, p.greed, p.courage, p.loyalty,
                p.vengefulness, p.impulsiveness, p.sociability, p.ambition,
            ] {
                assert!((0.0..=1.0).contains(&t));
            }
        }
    }

    #[test]
    fn out_of_range_trait_is_rejected() {
        let traits = TraitValues { aggression: 1.3, ..Default::default() };
        let result = PersonalityProfile::try_from_traits(Archetype::Commoner, &traits);
        assert!(matches!(
            result,
            Err(PsycheError::TraitOutOfRange { name: "aggression", .. })
        ));
    }

    #[test]
    fn compatibility_is_clamped_and_symmetric_enough() {
        let mut rng = StdRng::seed_from_u64(3);
        let thug = PersonalityProfile::generate(Archetype::Thug, &mut rng);
        let guard = PersonalityProfile::generate(Archetype::Guard, &mut rng);
        let score = thug.compatibility(&guard);
        assert!((0.0..=1.0).contains(&score));
        // Affinity table is symmetric, trait diff is symmetric.
        assert!((score - guard.compatibility(&thug)).abs() < f32::EPSILON);
    }

    #[test]
    fn identical_profiles_are_highly_compatible() {
        let traits = TraitValues::default();
        let a = PersonalityProfile::try_from_traits(Archetype::Farmer, &traits).expect("valid");
        let b = PersonalityProfile::try_from_traits(Archetype::Farmer, &traits).expect("valid");
        assert!(a.compatibility(&b) >= 0.9);
    }

    #[test]
    fn unknown_action_kind_scores_neutral() {
        let p = PersonalityProfile::try_from_traits(Archetype::Commoner, &TraitValues::default())
            .expect("valid");
        assert!((p.decision_weight(ActionKind::Rest) - 0.5).abs() < f32::EPSILON);
        assert!((p.decision_weight(ActionKind::Idle) - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn coward_prefers_flight_over_fight() {
        let traits = TraitValues {
            aggression: 0.1,
            courage: 0.1,
            ..Default::default()
        };
        let p = PersonalityProfile::try_from_traits(Archetype::Farmer, &traits).expect("valid");
        assert!(p.decision_weight(ActionKind::Flee) > p.decision_weight(ActionKind::Attack));
    }

    #[test]
    fn vengeful_aggressive_npc_seeks_revenge() {
        let traits = TraitValues {
            vengefulness: 0.8,
            aggression: 0.6,
            ..Default::default()
        };
        let p = PersonalityProfile::try_from_traits(Archetype::Thug, &traits).expect("valid");
        assert!(p.likely_to_seek_revenge());

        let mild = TraitValues { vengefulness: 0.3, ..Default::default() };
        let q = PersonalityProfile::try_from_traits(Archetype::Thug, &mild).expect("valid");
        assert!(!q.likely_to_seek_revenge());
    }

    #[test]
    fn disloyal_greedy_climber_betrays() {
        let traits = TraitValues {
            loyalty: 0.05,
            greed: 0.9,
            ambition: 0.9,
            impulsiveness: 0.8,
            ..Default::default()
        };
        let p = PersonalityProfile::try_from_traits(Archetype::Noble, &traits).expect("valid");
        assert!(p.likely_to_betray());
    }
}
