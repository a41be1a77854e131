//! ELO rating system implementation
//!
//! This module provides the two-player ELO update used for every recorded match,
//! built on the `elo` module of the skillratings crate. The free functions are the
//! engine itself; [`EloRatingCalculator`] binds them to a configured K-factor.

use crate::config::RatingConfig;
use crate::rating::calculator::{RatingCalculator, RatingUpdate};
use crate::rating::outcome::MatchOutcome;
use skillratings::elo::{elo, EloConfig, EloRating};

/// Expected score of a player rated `rating_a` against one rated `rating_b`:
/// `1 / (1 + 10^((rating_b - rating_a) / 400))`.
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    let (expected_a, _) = skillratings::elo::expected_score(
        &EloRating { rating: rating_a },
        &EloRating { rating: rating_b },
    );
    expected_a
}

/// Apply one match result to both ratings.
///
/// `outcome` is side A's result; side B implicitly scores `1 - outcome.score()`.
/// The two deltas always sum to zero up to floating point rounding.
pub fn update_ratings(rating_a: f64, rating_b: f64, outcome: MatchOutcome, k: f64) -> (f64, f64) {
    let (new_a, new_b) = elo(
        &EloRating { rating: rating_a },
        &EloRating { rating: rating_b },
        &outcome.into(),
        &EloConfig { k },
    );
    (new_a.rating, new_b.rating)
}

/// ELO rating calculator implementation
#[derive(Debug, Clone)]
pub struct EloRatingCalculator {
    config: RatingConfig,
}

impl EloRatingCalculator {
    /// Create a new ELO rating calculator
    pub fn new(config: RatingConfig) -> crate::error::Result<Self> {
        config.validate()?;

        Ok(Self { config })
    }

    pub fn k_factor(&self) -> f64 {
        self.config.k_factor
    }
}

impl Default for EloRatingCalculator {
    fn default() -> Self {
        Self {
            config: RatingConfig::default(),
        }
    }
}

impl RatingCalculator for EloRatingCalculator {
    fn update_ratings(&self, rating_a: f64, rating_b: f64, outcome: MatchOutcome) -> RatingUpdate {
        update_ratings(rating_a, rating_b, outcome, self.config.k_factor).into()
    }

    fn initial_rating(&self) -> f64 {
        self.config.initial_rating
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "elo",
            "k_factor": self.config.k_factor,
            "initial_rating": self.config.initial_rating
        })
    }
}
