//! Elo rating model
//!
//! This module provides the pure rating computations used by the replay
//! engine: expected score, rating updates with pluggable K-factor policies
//! and optional bounds, and reduction of series scores.

pub mod calculator;
pub mod k_factor;

// Re-export commonly used types
pub use calculator::{actual_score, ensure_finite, RatingModel};
pub use k_factor::{ExperienceKFactor, KFactorPolicy, KFactorTier, ThresholdKFactor};
