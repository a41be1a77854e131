//! Match recorder configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Limits and retry policy for match submissions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Attempts of the rating transaction when storage reports contention
    pub max_retry_attempts: u32,
    /// Pause between attempts in milliseconds
    pub retry_delay_ms: u64,
    /// Upper bound on games in one submission
    pub max_games_per_match: usize,
    /// Upper bound on points one side may score in one game
    pub max_game_score: u32,
    /// Upper bound on display name length, in characters
    pub max_name_length: usize,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            max_retry_attempts: 3,
            retry_delay_ms: 50,
            max_games_per_match: 50,
            max_game_score: 1000,
            max_name_length: 64,
        }
    }
}

impl RecorderConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}
