//! Rating model
//!
//! Pure Elo arithmetic for one rating space: expected score, rating update
//! and reduction of a game-by-game score into an actual score.

use crate::config::{KFactorConfig, RatingBounds, RatingConfig};
use crate::error::{EngineError, Result};
use crate::rating::k_factor::{ExperienceKFactor, KFactorPolicy, ThresholdKFactor};
use crate::types::ScorePair;
use std::sync::Arc;

/// Rating difference at which the stronger side is ten times as likely to win
const LOGISTIC_SCALE: f64 = 400.0;

/// Stateless Elo calculator with an injected K-factor strategy
#[derive(Debug, Clone)]
pub struct RatingModel {
    policy: Arc<dyn KFactorPolicy>,
    bounds: Option<RatingBounds>,
}

impl Default for RatingModel {
    fn default() -> Self {
        Self::new(Arc::new(ThresholdKFactor::default()), None)
    }
}

impl RatingModel {
    pub fn new(policy: Arc<dyn KFactorPolicy>, bounds: Option<RatingBounds>) -> Self {
        Self { policy, bounds }
    }

    /// Build a model from validated configuration
    pub fn from_config(config: &RatingConfig) -> Result<Self> {
        config.validate()?;

        let policy: Arc<dyn KFactorPolicy> = match &config.k_factor {
            KFactorConfig::Threshold { default_k, tiers } => {
                Arc::new(ThresholdKFactor::new(*default_k, tiers.clone()))
            }
            KFactorConfig::Experience {
                provisional_matches,
                provisional_k,
                established_k,
                elite_rating,
                elite_k,
            } => Arc::new(ExperienceKFactor {
                provisional_matches: *provisional_matches,
                provisional_k: *provisional_k,
                established_k: *established_k,
                elite_rating: *elite_rating,
                elite_k: *elite_k,
            }),
        };

        Ok(Self::new(policy, config.bounds))
    }

    pub fn bounds(&self) -> Option<RatingBounds> {
        self.bounds
    }

    /// K-factor that applies to a player in the given state
    pub fn k_factor(&self, rating: f64, matches_played: u32) -> f64 {
        self.policy.k_factor(rating, matches_played)
    }

    /// Probability-weighted score `rating_a` is expected to take from `rating_b`
    pub fn expected_score(&self, rating_a: f64, rating_b: f64) -> f64 {
        let a = self.clamp_input(rating_a);
        let b = self.clamp_input(rating_b);
        1.0 / (1.0 + 10f64.powf((b - a) / LOGISTIC_SCALE))
    }

    /// Rating after applying `actual` against `expected`
    ///
    /// Rounds to the nearest integer when `round` is set, then clamps to the
    /// configured bounds.
    pub fn new_rating(
        &self,
        expected: f64,
        actual: f64,
        current_rating: f64,
        matches_played: u32,
        round: bool,
    ) -> f64 {
        let k = self.k_factor(current_rating, matches_played);
        let mut rating = current_rating + k * (actual - expected);
        if round {
            rating = rating.round();
        }
        match self.bounds {
            Some(bounds) => bounds.clamp(rating),
            None => rating,
        }
    }

    // Unbounded models still floor inputs at zero
    fn clamp_input(&self, rating: f64) -> f64 {
        match self.bounds {
            Some(bounds) => bounds.clamp(rating),
            None => rating.max(0.0),
        }
    }
}

/// Reduce a list of per-game score pairs to player 1's actual score
///
/// A series with no games won by either side carries no signal and counts as
/// a draw.
pub fn actual_score(pairs: &[ScorePair]) -> f64 {
    let (p1, p2) = pairs.iter().fold((0u64, 0u64), |(p1, p2), pair| {
        (p1 + u64::from(pair.p1), p2 + u64::from(pair.p2))
    });

    if p1 + p2 == 0 {
        return 0.5;
    }
    p1 as f64 / (p1 + p2) as f64
}

/// Reject NaN and infinite ratings before they reach the model
pub fn ensure_finite(label: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::InvalidRatingInput {
            reason: format!("{} must be finite, got {}", label, value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::k_factor::KFactorTier;

    fn round2(value: f64) -> f64 {
        (value * 100.0).round() / 100.0
    }

    #[test]
    fn test_expected_score_even_match() {
        let model = RatingModel::default();
        assert_eq!(model.expected_score(1000.0, 1000.0), 0.5);
        assert_eq!(model.expected_score(1733.0, 1733.0), 0.5);
    }

    #[test]
    fn test_expected_scores_are_complementary() {
        let model = RatingModel::default();
        let a = model.expected_score(1613.0, 1477.0);
        let b = model.expected_score(1477.0, 1613.0);
        assert!((a + b - 1.0).abs() < 1e-12);
        assert!(a > 0.5);
    }

    #[test]
    fn test_reference_scenario() {
        let model = RatingModel::default();
        let opponents = [1609.0, 1477.0, 1388.0, 1586.0, 1720.0];

        let expected: f64 = opponents
            .iter()
            .map(|&opponent| round2(model.expected_score(1613.0, opponent)))
            .sum();
        assert!((expected - 2.88).abs() < 1e-9);

        // loss, draw, win, win, loss
        let actual = 0.0 + 0.5 + 1.0 + 1.0 + 0.0;
        assert_eq!(model.new_rating(expected, actual, 1613.0, 0, true), 1601.0);
    }

    #[test]
    fn test_new_rating_without_rounding() {
        let model = RatingModel::default();
        let rating = model.new_rating(0.5, 2.0 / 3.0, 1000.0, 0, false);
        assert!((rating - (1000.0 + 32.0 / 6.0)).abs() < 1e-9);
        assert_eq!(model.new_rating(0.5, 2.0 / 3.0, 1000.0, 0, true), 1005.0);
    }

    #[test]
    fn test_tiered_model() {
        let config = RatingConfig {
            k_factor: KFactorConfig::Threshold {
                default_k: 32.0,
                tiers: vec![
                    KFactorTier {
                        threshold: 1400.0,
                        k_factor: 24.0,
                    },
                    KFactorTier {
                        threshold: 1200.0,
                        k_factor: 28.0,
                    },
                ],
            },
            ..RatingConfig::default()
        };
        let model = RatingModel::from_config(&config).unwrap();

        assert_eq!(model.k_factor(1444.0, 0), 24.0);
        assert_eq!(model.k_factor(1250.0, 0), 28.0);
        assert_eq!(model.k_factor(1050.0, 0), 32.0);
    }

    #[test]
    fn test_bounds_clamp_output_and_input() {
        let bounds = RatingBounds {
            min: 100.0,
            max: 3000.0,
        };
        let model = RatingModel::new(Arc::new(ThresholdKFactor::flat(32.0)), Some(bounds));

        assert_eq!(model.new_rating(0.9, 0.0, 110.0, 0, true), 100.0);
        assert_eq!(model.new_rating(0.1, 1.0, 2990.0, 0, true), 3000.0);
        // Inputs beyond the bound are evaluated at the bound
        assert_eq!(
            model.expected_score(5000.0, 3000.0),
            model.expected_score(3000.0, 3000.0)
        );
    }

    #[test]
    fn test_unbounded_inputs_floor_at_zero() {
        let model = RatingModel::default();
        assert_eq!(model.expected_score(-50.0, 0.0), 0.5);
    }

    #[test]
    fn test_actual_score_reduction() {
        assert_eq!(actual_score(&[]), 0.5);
        assert_eq!(actual_score(&[ScorePair::new(0, 0)]), 0.5);
        assert_eq!(actual_score(&[ScorePair::new(3, 0)]), 1.0);
        assert_eq!(
            actual_score(&[
                ScorePair::new(1, 0),
                ScorePair::new(0, 1),
                ScorePair::new(1, 0)
            ]),
            2.0 / 3.0
        );
    }

    #[test]
    fn test_ensure_finite() {
        assert_eq!(ensure_finite("rating", 1000.0).unwrap(), 1000.0);
        assert!(ensure_finite("rating", f64::NAN).is_err());
        assert!(ensure_finite("rating", f64::INFINITY).is_err());
    }
}
