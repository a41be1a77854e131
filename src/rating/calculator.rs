//! Rating calculator trait
//!
//! This module defines the interface the match recorder uses to turn two current
//! ratings and a match outcome into two new ratings.

use crate::rating::outcome::MatchOutcome;
use serde::{Deserialize, Serialize};

/// New ratings for both sides of a two-player match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingUpdate {
    pub new_rating_a: f64,
    pub new_rating_b: f64,
}

impl RatingUpdate {
    pub fn new(new_rating_a: f64, new_rating_b: f64) -> Self {
        Self {
            new_rating_a,
            new_rating_b,
        }
    }
}

impl From<(f64, f64)> for RatingUpdate {
    fn from((new_rating_a, new_rating_b): (f64, f64)) -> Self {
        Self::new(new_rating_a, new_rating_b)
    }
}

/// Trait for calculating rating changes after a match
///
/// Implementations must be pure: the same inputs always produce the same update and
/// no call may block or fail.
#[cfg_attr(test, mockall::automock)]
pub trait RatingCalculator: Send + Sync {
    /// Compute new ratings for side A and side B
    ///
    /// # Arguments
    /// * `rating_a` - side A's rating before the match
    /// * `rating_b` - side B's rating before the match
    /// * `outcome` - the result from side A's point of view
    fn update_ratings(&self, rating_a: f64, rating_b: f64, outcome: MatchOutcome) -> RatingUpdate;

    /// Rating given to players on first reference
    fn initial_rating(&self) -> f64;

    /// Get current configuration as JSON
    fn config(&self) -> serde_json::Value;
}
