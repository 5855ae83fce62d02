//! Configuration management for the rating engine
//!
//! This module handles configuration loading from TOML files and environment
//! variables, validation, and default values. Configuration is built per
//! invocation and handed to components explicitly.

pub mod app;
pub mod rating;

// Re-export commonly used types
pub use app::{
    validate_config, AppConfig, LeaderboardSettings, ReplaySettings, ServiceSettings,
    StandingsSettings,
};
pub use rating::{KFactorConfig, RatingBounds, RatingConfig};
