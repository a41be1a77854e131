//! Common types used throughout the scoreboard service

use crate::rating::outcome::MatchOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Surrogate key of a stored player
pub type PlayerId = i64;

/// Surrogate key of a stored match
pub type MatchId = i64;

/// Rating assigned to players the first time they are referenced
pub const DEFAULT_RATING: f64 = 1000.0;

/// Who reported a match, as seen by the calling front-end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    /// Stable id from the front-end (Telegram user id)
    pub external_id: Option<i64>,
    pub display_name: String,
}

impl PlayerIdentity {
    pub fn new(external_id: impl Into<Option<i64>>, display_name: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            display_name: display_name.into(),
        }
    }

    /// Identity known only by name, like an opponent who never opened the bot
    pub fn named(display_name: impl Into<String>) -> Self {
        Self::new(None, display_name)
    }
}

/// A stored player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub external_id: Option<i64>,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

/// Current rating of a player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub player_id: PlayerId,
    pub current_rating: f64,
    pub updated_at: DateTime<Utc>,
}

/// Points scored by each side in a single game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameScore {
    pub player_score: u32,
    pub opponent_score: u32,
}

impl GameScore {
    pub fn new(player_score: u32, opponent_score: u32) -> Self {
        Self {
            player_score,
            opponent_score,
        }
    }
}

impl From<(u32, u32)> for GameScore {
    fn from((player_score, opponent_score): (u32, u32)) -> Self {
        Self::new(player_score, opponent_score)
    }
}

/// Match row to be inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewMatch {
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub player1_wins: u32,
    pub player2_wins: u32,
}

/// A stored match; never mutated after insertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub player1_wins: u32,
    pub player2_wins: u32,
    pub created_at: DateTime<Utc>,
}

/// Rating history row to be inserted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewRatingHistory {
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub old_rating: f64,
    pub new_rating: f64,
}

impl NewRatingHistory {
    pub fn delta(&self) -> f64 {
        self.new_rating - self.old_rating
    }
}

/// Audit entry for one player's rating change in one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingHistoryEntry {
    pub id: i64,
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub old_rating: f64,
    pub new_rating: f64,
    pub delta: f64,
    pub created_at: DateTime<Utc>,
}

/// Rating movement of one side of a recorded match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideSummary {
    pub username: String,
    pub old_rating: f64,
    pub new_rating: f64,
    pub delta: f64,
}

impl SideSummary {
    pub fn new(username: impl Into<String>, old_rating: f64, new_rating: f64) -> Self {
        Self {
            username: username.into(),
            old_rating,
            new_rating,
            delta: new_rating - old_rating,
        }
    }
}

/// What `record_match` hands back to its caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcomeSummary {
    pub match_id: MatchId,
    pub outcome: MatchOutcome,
    pub player_games_won: u32,
    pub opponent_games_won: u32,
    pub player: SideSummary,
    pub opponent: SideSummary,
}

/// Aggregated view of a player for the Mini App profile panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player: Player,
    pub rating: f64,
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    /// Newest first
    pub recent_history: Vec<RatingHistoryEntry>,
}

/// Row counts per relation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreCounts {
    pub players: u64,
    pub ratings: u64,
    pub matches: u64,
    pub rating_history: u64,
}
