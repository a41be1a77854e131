//! Scoreboard - match recording and ELO ratings for casual games
//!
//! This crate provides an HTTP service that records two-player matches reported
//! from a Telegram Mini App, derives each match outcome from per-game scores, and
//! keeps ELO ratings with a complete history in SQLite.

pub mod config;
pub mod error;
pub mod metrics;
pub mod rating;
pub mod recorder;
pub mod service;
pub mod storage;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{Result, ScoreboardError};
pub use types::*;

// Re-export key components
pub use rating::{EloRatingCalculator, MatchOutcome, RatingCalculator};
pub use recorder::MatchRecorder;
pub use storage::{InMemoryMatchStore, MatchStore, MatchTransaction, SqliteMatchStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
