//! K-factor strategies
//!
//! The K-factor decides how far one result moves a rating. Strategies are
//! injected into [`RatingModel`](super::RatingModel) so one model serves every
//! rating space.

use serde::{Deserialize, Serialize};

/// Selects the K-factor for a player about to have a result applied
pub trait KFactorPolicy: Send + Sync + std::fmt::Debug {
    /// `rating` is the pre-match rating, `matches_played` the pre-match count
    fn k_factor(&self, rating: f64, matches_played: u32) -> f64;
}

/// A `(threshold, k_factor)` pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KFactorTier {
    pub threshold: f64,
    pub k_factor: f64,
}

/// Rating-threshold policy: the highest tier whose threshold the rating meets wins
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdKFactor {
    default_k: f64,
    // Sorted by threshold, highest first
    tiers: Vec<KFactorTier>,
}

impl ThresholdKFactor {
    pub fn new(default_k: f64, mut tiers: Vec<KFactorTier>) -> Self {
        tiers.sort_by(|a, b| b.threshold.total_cmp(&a.threshold));
        Self { default_k, tiers }
    }

    /// Same K-factor regardless of rating
    pub fn flat(k_factor: f64) -> Self {
        Self::new(k_factor, Vec::new())
    }

    pub fn tiers(&self) -> &[KFactorTier] {
        &self.tiers
    }
}

impl Default for ThresholdKFactor {
    fn default() -> Self {
        Self::flat(32.0)
    }
}

impl KFactorPolicy for ThresholdKFactor {
    fn k_factor(&self, rating: f64, _matches_played: u32) -> f64 {
        self.tiers
            .iter()
            .find(|tier| rating >= tier.threshold)
            .map(|tier| tier.k_factor)
            .unwrap_or(self.default_k)
    }
}

/// Three-tier policy keyed on experience first, then rating
///
/// Players with fewer than `provisional_matches` matches use `provisional_k`.
/// Established players at or above `elite_rating` use `elite_k`, everyone
/// else `established_k`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceKFactor {
    pub provisional_matches: u32,
    pub provisional_k: f64,
    pub established_k: f64,
    pub elite_rating: f64,
    pub elite_k: f64,
}

impl Default for ExperienceKFactor {
    fn default() -> Self {
        Self {
            provisional_matches: 30,
            provisional_k: 40.0,
            established_k: 20.0,
            elite_rating: 2400.0,
            elite_k: 10.0,
        }
    }
}

impl KFactorPolicy for ExperienceKFactor {
    fn k_factor(&self, rating: f64, matches_played: u32) -> f64 {
        if matches_played < self.provisional_matches {
            self.provisional_k
        } else if rating >= self.elite_rating {
            self.elite_k
        } else {
            self.established_k
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_tiers() {
        let policy = ThresholdKFactor::new(
            32.0,
            vec![
                KFactorTier {
                    threshold: 1200.0,
                    k_factor: 28.0,
                },
                KFactorTier {
                    threshold: 1400.0,
                    k_factor: 24.0,
                },
            ],
        );

        assert_eq!(policy.k_factor(1444.0, 0), 24.0);
        assert_eq!(policy.k_factor(1250.0, 0), 28.0);
        assert_eq!(policy.k_factor(1050.0, 0), 32.0);
        // Threshold is inclusive
        assert_eq!(policy.k_factor(1400.0, 0), 24.0);
        assert_eq!(policy.tiers()[0].threshold, 1400.0);
    }

    #[test]
    fn test_flat_policy_ignores_history() {
        let policy = ThresholdKFactor::default();
        assert_eq!(policy.k_factor(0.0, 0), 32.0);
        assert_eq!(policy.k_factor(3000.0, 500), 32.0);
    }

    #[test]
    fn test_experience_policy() {
        let policy = ExperienceKFactor::default();

        assert_eq!(policy.k_factor(2500.0, 5), 40.0);
        assert_eq!(policy.k_factor(1500.0, 30), 20.0);
        assert_eq!(policy.k_factor(2400.0, 100), 10.0);
    }
}
