//! Test fixtures and store wrappers for integration testing
#![allow(dead_code)]

use async_trait::async_trait;
use scoreboard::config::{DatabaseSettings, RecorderConfig};
use scoreboard::error::{Result, ScoreboardError};
use scoreboard::metrics::MetricsCollector;
use scoreboard::storage::{InMemoryMatchStore, MatchStore, MatchTransaction, SqliteMatchStore};
use scoreboard::types::{
    GameScore, MatchId, MatchRecord, NewMatch, NewRatingHistory, Player, PlayerId,
    PlayerIdentity, PlayerStats, Rating, RatingHistoryEntry, StoreCounts,
};
use scoreboard::{EloRatingCalculator, MatchRecorder};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Build a list of games from `(player, opponent)` score pairs
pub fn games(scores: &[(u32, u32)]) -> Vec<GameScore> {
    scores.iter().copied().map(GameScore::from).collect()
}

/// Every store configuration, labelled for assertion messages
///
/// `sqlite-file` is a WAL database in a temporary directory behind the default pool,
/// so several connections contend for the write lock. The directory handle must stay
/// alive for as long as the store is used.
pub async fn all_stores() -> Vec<(&'static str, Arc<dyn MatchStore>, Option<TempDir>)> {
    let dir = tempfile::tempdir().unwrap();
    let settings = DatabaseSettings {
        url: format!("sqlite://{}", dir.path().join("scoreboard.db").display()),
        ..DatabaseSettings::default()
    };
    let file_store = SqliteMatchStore::connect(&settings).await.unwrap();

    vec![
        ("memory", Arc::new(InMemoryMatchStore::new()) as Arc<dyn MatchStore>, None),
        (
            "sqlite",
            Arc::new(SqliteMatchStore::memory().await.unwrap()) as Arc<dyn MatchStore>,
            None,
        ),
        (
            "sqlite-file",
            Arc::new(file_store) as Arc<dyn MatchStore>,
            Some(dir),
        ),
    ]
}

/// Recorder with the default ELO calculator and limits
pub fn recorder_for(store: Arc<dyn MatchStore>) -> MatchRecorder {
    MatchRecorder::new(
        store,
        Arc::new(EloRatingCalculator::default()),
        RecorderConfig {
            retry_delay_ms: 1,
            ..RecorderConfig::default()
        },
        Arc::new(MetricsCollector::new().unwrap()),
    )
}

pub fn named(name: &str) -> PlayerIdentity {
    PlayerIdentity::named(name)
}

/// Store whose transactions fail while writing the rating history
///
/// The first history row of a match is written normally; the second one fails with a
/// non-retryable persistence error, so the transaction has already staged a match row,
/// one history row and no rating updates when it is abandoned.
pub struct FailingStore {
    inner: Arc<dyn MatchStore>,
    failures: Arc<AtomicU32>,
}

impl FailingStore {
    pub fn new(inner: Arc<dyn MatchStore>) -> Self {
        Self {
            inner,
            failures: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Transactions abandoned so far
    pub fn failures(&self) -> u32 {
        self.failures.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MatchStore for FailingStore {
    async fn resolve_player(
        &self,
        identity: &PlayerIdentity,
        initial_rating: f64,
    ) -> Result<Player> {
        self.inner.resolve_player(identity, initial_rating).await
    }

    async fn begin(&self) -> Result<Box<dyn MatchTransaction>> {
        let inner = self.inner.begin().await?;
        Ok(Box::new(FailingTransaction {
            inner,
            history_rows: 0,
            failures: self.failures.clone(),
        }))
    }

    async fn find_player_by_name(&self, display_name: &str) -> Result<Option<Player>> {
        self.inner.find_player_by_name(display_name).await
    }

    async fn rating(&self, player_id: PlayerId) -> Result<Option<Rating>> {
        self.inner.rating(player_id).await
    }

    async fn match_record(&self, match_id: MatchId) -> Result<Option<MatchRecord>> {
        self.inner.match_record(match_id).await
    }

    async fn rating_history(
        &self,
        player_id: PlayerId,
        limit: usize,
    ) -> Result<Vec<RatingHistoryEntry>> {
        self.inner.rating_history(player_id, limit).await
    }

    async fn match_history(&self, match_id: MatchId) -> Result<Vec<RatingHistoryEntry>> {
        self.inner.match_history(match_id).await
    }

    async fn player_stats(&self, display_name: &str, history_limit: usize) -> Result<PlayerStats> {
        self.inner.player_stats(display_name, history_limit).await
    }

    async fn counts(&self) -> Result<StoreCounts> {
        self.inner.counts().await
    }

    async fn ping(&self) -> Result<()> {
        self.inner.ping().await
    }
}

struct FailingTransaction {
    inner: Box<dyn MatchTransaction>,
    history_rows: u32,
    failures: Arc<AtomicU32>,
}

#[async_trait]
impl MatchTransaction for FailingTransaction {
    async fn lock_ratings(
        &mut self,
        player_a: PlayerId,
        player_b: PlayerId,
    ) -> Result<(Rating, Rating)> {
        self.inner.lock_ratings(player_a, player_b).await
    }

    async fn insert_match(&mut self, new_match: NewMatch) -> Result<MatchRecord> {
        self.inner.insert_match(new_match).await
    }

    async fn insert_rating_history(
        &mut self,
        entry: NewRatingHistory,
    ) -> Result<RatingHistoryEntry> {
        self.history_rows += 1;
        if self.history_rows > 1 {
            self.failures.fetch_add(1, Ordering::SeqCst);
            return Err(ScoreboardError::Persistence {
                message: "disk I/O error".to_string(),
            }
            .into());
        }
        self.inner.insert_rating_history(entry).await
    }

    async fn update_rating(&mut self, player_id: PlayerId, new_rating: f64) -> Result<Rating> {
        self.inner.update_rating(player_id, new_rating).await
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.inner.commit().await
    }
}
