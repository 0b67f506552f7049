//! Error types for the Psyche core library.
//!
//! The engine favors defaulting over failing: unknown archetypes, action
//! kinds and missing relationships all resolve to neutral defaults. The
//! variants here cover the few conditions treated as programmer errors.

use thiserror::Error;

/// Top-level error type for all Psyche operations.
#[derive(Error, Debug)]
pub enum PsycheError {
    /// A personality trait supplied through a non-clamping entry point was
    /// outside [0, 1].
    #[error("trait {name} out of range: {value} (expected 0.0..=1.0)")]
    TraitOutOfRange {
        /// Which trait was invalid.
        name: &'static str,
        /// The offending value.
        value: f32,
    },

    /// An emotion intensity supplied through a non-clamping entry point was
    /// outside [0, 1].
    #[error("emotion intensity out of range: {0} (expected 0.0..=1.0)")]
    IntensityOutOfRange(f32),

    /// A goal priority supplied through a non-clamping entry point was
    /// outside [0, 1].
    #[error("goal priority out of range: {0} (expected 0.0..=1.0)")]
    PriorityOutOfRange(f32),

    /// The brain was asked to decide before it was fully constructed.
    #[error("brain not initialized: {0}")]
    NotInitialized(&'static str),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Generic I/O error (config file loading only — the core performs no
    /// other I/O).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, PsycheError>;
