//! Rating system configuration

use crate::error::{EngineError, Result};
use crate::rating::{ensure_finite, KFactorTier};
use serde::{Deserialize, Serialize};

/// Inclusive rating bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingBounds {
    pub min: f64,
    pub max: f64,
}

impl RatingBounds {
    pub fn clamp(&self, rating: f64) -> f64 {
        rating.clamp(self.min, self.max)
    }
}

/// K-factor strategy selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum KFactorConfig {
    /// Highest matching rating threshold wins, else `default_k`
    Threshold {
        default_k: f64,
        #[serde(default)]
        tiers: Vec<KFactorTier>,
    },
    /// Provisional / established / elite tiers
    Experience {
        provisional_matches: u32,
        provisional_k: f64,
        established_k: f64,
        elite_rating: f64,
        elite_k: f64,
    },
}

impl Default for KFactorConfig {
    fn default() -> Self {
        KFactorConfig::Threshold {
            default_k: 32.0,
            tiers: Vec::new(),
        }
    }
}

/// Parameters of one rating space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Rating every player starts a replay with
    pub initial_rating: f64,
    /// Round updated ratings to whole points
    pub round_ratings: bool,
    pub k_factor: KFactorConfig,
    pub bounds: Option<RatingBounds>,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            initial_rating: 1000.0,
            round_ratings: true,
            k_factor: KFactorConfig::default(),
            bounds: None,
        }
    }
}

impl RatingConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_finite("initial_rating", self.initial_rating)?;

        match &self.k_factor {
            KFactorConfig::Threshold { default_k, tiers } => {
                validate_k("default_k", *default_k)?;
                for tier in tiers {
                    ensure_finite("tier threshold", tier.threshold)?;
                    validate_k("tier k_factor", tier.k_factor)?;
                }
            }
            KFactorConfig::Experience {
                provisional_k,
                established_k,
                elite_rating,
                elite_k,
                ..
            } => {
                validate_k("provisional_k", *provisional_k)?;
                validate_k("established_k", *established_k)?;
                validate_k("elite_k", *elite_k)?;
                ensure_finite("elite_rating", *elite_rating)?;
            }
        }

        if let Some(bounds) = self.bounds {
            ensure_finite("bounds.min", bounds.min)?;
            ensure_finite("bounds.max", bounds.max)?;
            if bounds.min > bounds.max {
                return Err(EngineError::ConfigurationError {
                    message: format!(
                        "Rating bounds are inverted: min {} > max {}",
                        bounds.min, bounds.max
                    ),
                });
            }
        }

        Ok(())
    }
}

fn validate_k(label: &str, k: f64) -> Result<()> {
    if !k.is_finite() || k <= 0.0 {
        return Err(EngineError::ConfigurationError {
            message: format!("{} must be a positive number, got {}", label, k),
        });
    }
    Ok(())
}
