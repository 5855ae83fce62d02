//! Main application configuration
//!
//! This module defines the primary configuration structures for the rating
//! engine, including TOML file loading, environment overrides and validation.

use crate::config::rating::{KFactorConfig, RatingBounds, RatingConfig};
use crate::standings::DEFAULT_POINTS_TABLE;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: RatingConfig,
    pub replay: ReplaySettings,
    pub standings: StandingsSettings,
    pub leaderboard: LeaderboardSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Replay engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplaySettings {
    /// Maximum in-flight writes while persisting ratings and results
    pub write_concurrency: usize,
}

/// Standings aggregation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StandingsSettings {
    /// Points for rank `i` at index `i`; index 0 is unused
    pub points_table: Vec<u32>,
}

/// Leaderboard query settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardSettings {
    /// Players need strictly more matches than this to be listed
    pub min_matches: u32,
    /// Row limit applied when the caller does not give one
    pub default_limit: Option<usize>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "fgc-ratings".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self {
            write_concurrency: 5,
        }
    }
}

impl Default for StandingsSettings {
    fn default() -> Self {
        Self {
            points_table: DEFAULT_POINTS_TABLE.to_vec(),
        }
    }
}

impl Default for LeaderboardSettings {
    fn default() -> Self {
        Self {
            min_matches: 0,
            default_limit: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Rating settings
        if let Ok(initial) = env::var("RATING_INITIAL") {
            self.rating.initial_rating = initial
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_INITIAL value: {}", initial))?;
        }
        if let Ok(k) = env::var("RATING_DEFAULT_K") {
            let k: f64 = k
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_DEFAULT_K value: {}", k))?;
            match &mut self.rating.k_factor {
                KFactorConfig::Threshold { default_k, .. } => *default_k = k,
                KFactorConfig::Experience { established_k, .. } => *established_k = k,
            }
        }
        match (env::var("RATING_MIN"), env::var("RATING_MAX")) {
            (Ok(min), Ok(max)) => {
                self.rating.bounds = Some(RatingBounds {
                    min: min
                        .parse()
                        .map_err(|_| anyhow!("Invalid RATING_MIN value: {}", min))?,
                    max: max
                        .parse()
                        .map_err(|_| anyhow!("Invalid RATING_MAX value: {}", max))?,
                });
            }
            (Err(_), Err(_)) => {}
            _ => return Err(anyhow!("RATING_MIN and RATING_MAX must be set together")),
        }

        // Replay settings
        if let Ok(concurrency) = env::var("REPLAY_WRITE_CONCURRENCY") {
            self.replay.write_concurrency = concurrency
                .parse()
                .map_err(|_| anyhow!("Invalid REPLAY_WRITE_CONCURRENCY value: {}", concurrency))?;
        }

        // Leaderboard settings
        if let Ok(min_matches) = env::var("LEADERBOARD_MIN_MATCHES") {
            self.leaderboard.min_matches = min_matches
                .parse()
                .map_err(|_| anyhow!("Invalid LEADERBOARD_MIN_MATCHES value: {}", min_matches))?;
        }

        Ok(())
    }

    /// Replace the log level, rejecting levels the logger cannot parse
    pub fn override_log_level(&mut self, log_level: &str) -> Result<()> {
        let previous = std::mem::replace(&mut self.service.log_level, log_level.to_string());
        if let Err(e) = validate_config(self) {
            self.service.log_level = previous;
            return Err(e);
        }
        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    config.rating.validate()?;

    if config.replay.write_concurrency == 0 {
        return Err(anyhow!("Replay write concurrency must be greater than 0"));
    }

    if config.standings.points_table.is_empty() {
        return Err(anyhow!("Points table cannot be empty"));
    }

    if config.leaderboard.default_limit == Some(0) {
        return Err(anyhow!("Leaderboard default limit must be greater than 0"));
    }

    Ok(())
}
