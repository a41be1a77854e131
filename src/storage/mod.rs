//! Persistent match and rating state
//!
//! This module defines the storage interface the match recorder is written against.
//! A [`MatchStore`] resolves player identities and opens [`MatchTransaction`]s; a
//! transaction stages the multi-record write of one match and only becomes visible on
//! [`MatchTransaction::commit`]. Dropping an uncommitted transaction rolls it back, which
//! is what makes a cancelled or failed submission leave no trace.

pub mod memory;
pub mod sqlite;

use crate::error::Result;
use crate::types::{
    MatchId, MatchRecord, NewMatch, NewRatingHistory, Player, PlayerId, PlayerIdentity,
    PlayerStats, Rating, RatingHistoryEntry, StoreCounts,
};
use async_trait::async_trait;

pub use memory::InMemoryMatchStore;
pub use sqlite::SqliteMatchStore;

/// Trait for match storage operations
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Find the player for `identity`, creating it together with a rating of
    /// `initial_rating` if it does not exist yet.
    ///
    /// Lookup is by external id first, then by display name. A player found by name
    /// that has no external id yet adopts the one in `identity`. Concurrent calls for
    /// the same identity end up with the same player. Lock contention surfaces as
    /// `ScoreboardError::Conflict`; callers decide whether to try again.
    async fn resolve_player(&self, identity: &PlayerIdentity, initial_rating: f64)
        -> Result<Player>;

    /// Open a write transaction
    async fn begin(&self) -> Result<Box<dyn MatchTransaction>>;

    async fn find_player_by_name(&self, display_name: &str) -> Result<Option<Player>>;

    async fn rating(&self, player_id: PlayerId) -> Result<Option<Rating>>;

    async fn match_record(&self, match_id: MatchId) -> Result<Option<MatchRecord>>;

    /// Rating history of a player, newest first
    async fn rating_history(
        &self,
        player_id: PlayerId,
        limit: usize,
    ) -> Result<Vec<RatingHistoryEntry>>;

    /// History entries written for one match
    async fn match_history(&self, match_id: MatchId) -> Result<Vec<RatingHistoryEntry>>;

    /// Rating, record and recent history of a player
    ///
    /// Fails with `ScoreboardError::PlayerNotFound` for unknown names.
    async fn player_stats(&self, display_name: &str, history_limit: usize) -> Result<PlayerStats>;

    async fn counts(&self) -> Result<StoreCounts>;

    /// Cheap round trip used by readiness checks
    async fn ping(&self) -> Result<()>;
}

/// One unit of work against a [`MatchStore`]
#[async_trait]
pub trait MatchTransaction: Send {
    /// Read both ratings and hold them against concurrent writers until the
    /// transaction ends. Returned in argument order.
    async fn lock_ratings(
        &mut self,
        player_a: PlayerId,
        player_b: PlayerId,
    ) -> Result<(Rating, Rating)>;

    async fn insert_match(&mut self, new_match: NewMatch) -> Result<MatchRecord>;

    async fn insert_rating_history(&mut self, entry: NewRatingHistory)
        -> Result<RatingHistoryEntry>;

    async fn update_rating(&mut self, player_id: PlayerId, new_rating: f64) -> Result<Rating>;

    /// Make every write of this transaction visible at once
    async fn commit(self: Box<Self>) -> Result<()>;
}
