//! Property tests for the rating model

use fgc_ratings::config::RatingBounds;
use fgc_ratings::rating::{actual_score, KFactorPolicy, KFactorTier, RatingModel, ThresholdKFactor};
use fgc_ratings::types::ScorePair;
use proptest::prelude::*;
use std::sync::Arc;

fn tiered_model() -> RatingModel {
    RatingModel::new(
        Arc::new(ThresholdKFactor::new(
            32.0,
            vec![
                KFactorTier {
                    threshold: 1400.0,
                    k_factor: 24.0,
                },
                KFactorTier {
                    threshold: 1200.0,
                    k_factor: 28.0,
                },
            ],
        )),
        None,
    )
}

proptest! {
    #[test]
    fn even_ratings_expect_half(rating in 0.0f64..4000.0) {
        let model = RatingModel::default();
        prop_assert_eq!(model.expected_score(rating, rating), 0.5);
    }

    #[test]
    fn expected_scores_sum_to_one(a in 0.0f64..4000.0, b in 0.0f64..4000.0) {
        let model = RatingModel::default();
        let total = model.expected_score(a, b) + model.expected_score(b, a);
        prop_assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn expected_score_is_a_probability(a in 0.0f64..4000.0, b in 0.0f64..4000.0) {
        let expected = RatingModel::default().expected_score(a, b);
        prop_assert!((0.0..=1.0).contains(&expected));
    }

    #[test]
    fn new_rating_monotonic_in_actual(
        expected in 0.0f64..=1.0,
        current in 0.0f64..3000.0,
        matches in 0u32..200,
        round in any::<bool>(),
    ) {
        let model = tiered_model();
        let win = model.new_rating(expected, 1.0, current, matches, round);
        let draw = model.new_rating(expected, 0.5, current, matches, round);
        let loss = model.new_rating(expected, 0.0, current, matches, round);
        prop_assert!(win >= draw);
        prop_assert!(draw >= loss);
    }

    #[test]
    fn bounded_ratings_stay_in_bounds(
        expected in 0.0f64..=1.0,
        actual in 0.0f64..=1.0,
        current in 0.0f64..5000.0,
    ) {
        let bounds = RatingBounds { min: 100.0, max: 3000.0 };
        let model = RatingModel::new(Arc::new(ThresholdKFactor::flat(64.0)), Some(bounds));
        let rating = model.new_rating(expected, actual, current, 0, true);
        prop_assert!((100.0..=3000.0).contains(&rating));
    }

    #[test]
    fn series_score_is_complementary(
        games in prop::collection::vec((0u32..5, 0u32..5), 1..8),
    ) {
        let pairs: Vec<_> = games.iter().map(|&(a, b)| ScorePair::new(a, b)).collect();
        let swapped: Vec<_> = games.iter().map(|&(a, b)| ScorePair::new(b, a)).collect();

        let forward = actual_score(&pairs);
        let backward = actual_score(&swapped);
        prop_assert!((0.0..=1.0).contains(&forward));
        prop_assert!((forward + backward - 1.0).abs() < 1e-12);
    }

    #[test]
    fn threshold_policy_picks_highest_met_tier(rating in 0.0f64..3000.0) {
        let policy = ThresholdKFactor::new(
            32.0,
            vec![
                KFactorTier { threshold: 1200.0, k_factor: 28.0 },
                KFactorTier { threshold: 1400.0, k_factor: 24.0 },
            ],
        );
        let k = policy.k_factor(rating, 0);
        let expected = if rating >= 1400.0 {
            24.0
        } else if rating >= 1200.0 {
            28.0
        } else {
            32.0
        };
        prop_assert_eq!(k, expected);
    }
}

#[test]
fn k_factor_tier_examples() {
    let model = tiered_model();
    assert_eq!(model.k_factor(1444.0, 0), 24.0);
    assert_eq!(model.k_factor(1250.0, 0), 28.0);
    assert_eq!(model.k_factor(1050.0, 0), 32.0);
}
