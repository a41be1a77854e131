//! Rating engine
//!
//! This module provides the pure ELO computation, the outcome derivation from
//! per-game scores, and the calculator interface used by the match recorder.

pub mod calculator;
pub mod elo;
pub mod outcome;

// Re-export commonly used types
pub use calculator::{RatingCalculator, RatingUpdate};
pub use elo::{expected_score, update_ratings, EloRatingCalculator};
pub use outcome::{MatchOutcome, WinTally};
