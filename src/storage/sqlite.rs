//! SQLite-backed match store
//!
//! Writers serialize on SQLite's database lock: rating transactions and player creation
//! both open with `BEGIN IMMEDIATE`, so the write lock is held before anything is read.
//! The connection-level busy timeout then makes competing writers queue instead of
//! failing.
//! Lock errors that still surface are reported as `ScoreboardError::Conflict` so the
//! recorder can retry the whole unit of work.

use crate::config::DatabaseSettings;
use crate::error::{Result, ScoreboardError};
use crate::storage::{MatchStore, MatchTransaction};
use crate::types::{
    MatchId, MatchRecord, NewMatch, NewRatingHistory, Player, PlayerId, PlayerIdentity,
    PlayerStats, Rating, RatingHistoryEntry, StoreCounts,
};
use crate::utils::current_timestamp;
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    migrate, query, query_as,
    sqlite::{
        Sqlite, SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqlitePool,
        SqlitePoolOptions,
    },
    Transaction,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

type PlayerRow = (i64, Option<i64>, String, DateTime<Utc>);
type RatingRow = (i64, Option<f64>, DateTime<Utc>);
type MatchRow = (i64, i64, i64, i64, i64, DateTime<Utc>);
type HistoryRow = (i64, i64, i64, f64, f64, f64, DateTime<Utc>);

const PLAYER_COLUMNS: &str = "id, external_id, display_name, created_at";
const HISTORY_COLUMNS: &str = "id, match_id, player_id, old_rating, new_rating, delta, created_at";

/// Match store persisted in a SQLite database
#[derive(Debug, Clone)]
pub struct SqliteMatchStore {
    pool: SqlitePool,
}

impl SqliteMatchStore {
    /// Open (creating if needed) the database at `settings.url` and apply migrations
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self> {
        let in_memory = settings.url.contains(":memory:") || settings.url.contains("mode=memory");

        let mut options = SqliteConnectOptions::from_str(&settings.url)
            .with_context(|| format!("Invalid database URL {}", settings.url))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_millis(settings.busy_timeout_ms));
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        // An in-memory database lives exactly as long as its connections, and
        // shared-cache locking does not honour the busy timeout, so keep one for good.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(settings.max_connections)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database {}", settings.url))?;
        migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to apply database migrations")?;

        info!(url = %settings.url, in_memory, "Database ready");
        Ok(Self { pool })
    }

    /// Fresh private in-memory database
    pub async fn memory() -> Result<Self> {
        Self::connect(&DatabaseSettings {
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        })
        .await
    }

    async fn resolve_identity(
        &self,
        identity: &PlayerIdentity,
        initial_rating: f64,
    ) -> Result<Player> {
        // Known players are served from a plain read so they never queue for the writer lock.
        {
            let mut conn = self.pool.acquire().await.map_err(storage_error)?;
            if let Some(player) = lookup_identity(&mut *conn, identity).await? {
                if !adopts_external_id(&player, identity) {
                    return Ok(player);
                }
            }
        }

        // Creation and id adoption re-check under the write lock; the busy timeout
        // queues competing writers here instead of failing a read-to-write upgrade.
        let mut tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(storage_error)?;

        if let Some(mut player) = lookup_identity(&mut *tx, identity).await? {
            if let (true, Some(external_id)) =
                (adopts_external_id(&player, identity), identity.external_id)
            {
                query("UPDATE players SET external_id = $1 WHERE id = $2")
                    .bind(external_id)
                    .bind(player.id)
                    .execute(&mut *tx)
                    .await
                    .map_err(storage_error)?;
                tx.commit().await.map_err(storage_error)?;
                debug!(player_id = player.id, external_id, "attached external id");
                player.external_id = Some(external_id);
            }
            return Ok(player);
        }

        let now = current_timestamp();
        let (id,): (i64,) = query_as(
            "INSERT INTO players (external_id, display_name, created_at) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(identity.external_id)
        .bind(&identity.display_name)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(storage_error)?;
        query("INSERT INTO ratings (player_id, current_rating, updated_at) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(initial_rating)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;
        tx.commit().await.map_err(storage_error)?;

        debug!(player_id = id, name = %identity.display_name, "created player");
        Ok(Player {
            id,
            external_id: identity.external_id,
            display_name: identity.display_name.clone(),
            created_at: now,
        })
    }
}

/// Player matching `identity`: by external id first, then by display name
async fn lookup_identity(
    conn: &mut SqliteConnection,
    identity: &PlayerIdentity,
) -> Result<Option<Player>> {
    if let Some(external_id) = identity.external_id {
        let found: Option<PlayerRow> = query_as(&format!(
            "SELECT {PLAYER_COLUMNS} FROM players WHERE external_id = $1"
        ))
        .bind(external_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(storage_error)?;
        if let Some(row) = found {
            return Ok(Some(player_from_row(row)));
        }
    }

    let found: Option<PlayerRow> = query_as(&format!(
        "SELECT {PLAYER_COLUMNS} FROM players WHERE display_name = $1"
    ))
    .bind(&identity.display_name)
    .fetch_optional(&mut *conn)
    .await
    .map_err(storage_error)?;
    Ok(found.map(player_from_row))
}

fn adopts_external_id(player: &Player, identity: &PlayerIdentity) -> bool {
    player.external_id.is_none() && identity.external_id.is_some()
}

#[async_trait]
impl MatchStore for SqliteMatchStore {
    async fn resolve_player(
        &self,
        identity: &PlayerIdentity,
        initial_rating: f64,
    ) -> Result<Player> {
        self.resolve_identity(identity, initial_rating).await
    }

    async fn begin(&self) -> Result<Box<dyn MatchTransaction>> {
        let tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(storage_error)?;
        Ok(Box::new(SqliteTransaction { tx }))
    }

    async fn find_player_by_name(&self, display_name: &str) -> Result<Option<Player>> {
        let row: Option<PlayerRow> = query_as(&format!(
            "SELECT {PLAYER_COLUMNS} FROM players WHERE display_name = $1"
        ))
        .bind(display_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(row.map(player_from_row))
    }

    async fn rating(&self, player_id: PlayerId) -> Result<Option<Rating>> {
        let row: Option<RatingRow> = query_as(
            "SELECT player_id, current_rating, updated_at FROM ratings WHERE player_id = $1",
        )
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;
        row.map(rating_from_row).transpose()
    }

    async fn match_record(&self, match_id: MatchId) -> Result<Option<MatchRecord>> {
        let row: Option<MatchRow> = query_as(
            "SELECT id, player1_id, player2_id, player1_wins, player2_wins, created_at FROM matches WHERE id = $1",
        )
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;
        row.map(match_from_row).transpose()
    }

    async fn rating_history(
        &self,
        player_id: PlayerId,
        limit: usize,
    ) -> Result<Vec<RatingHistoryEntry>> {
        let rows: Vec<HistoryRow> = query_as(&format!(
            "SELECT {HISTORY_COLUMNS} FROM rating_history WHERE player_id = $1 ORDER BY id DESC LIMIT $2"
        ))
        .bind(player_id)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(rows.into_iter().map(history_from_row).collect())
    }

    async fn match_history(&self, match_id: MatchId) -> Result<Vec<RatingHistoryEntry>> {
        let rows: Vec<HistoryRow> = query_as(&format!(
            "SELECT {HISTORY_COLUMNS} FROM rating_history WHERE match_id = $1 ORDER BY id"
        ))
        .bind(match_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(rows.into_iter().map(history_from_row).collect())
    }

    async fn player_stats(&self, display_name: &str, history_limit: usize) -> Result<PlayerStats> {
        let player = self.find_player_by_name(display_name).await?.ok_or_else(|| {
            ScoreboardError::PlayerNotFound {
                name: display_name.to_string(),
            }
        })?;
        let rating = self.rating(player.id).await?.ok_or_else(|| {
            ScoreboardError::InternalError {
                message: format!("player {} has no rating", player.id),
            }
        })?;

        let (played, wins, losses, draws): (i64, i64, i64, i64) = query_as(
            "SELECT COUNT(*),
                COALESCE(SUM(CASE WHEN (player1_id = $1 AND player1_wins > player2_wins)
                                    OR (player2_id = $1 AND player2_wins > player1_wins)
                                  THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN (player1_id = $1 AND player1_wins < player2_wins)
                                    OR (player2_id = $1 AND player2_wins < player1_wins)
                                  THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN player1_wins = player2_wins THEN 1 ELSE 0 END), 0)
             FROM matches WHERE player1_id = $1 OR player2_id = $1",
        )
        .bind(player.id)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;

        let recent_history = self.rating_history(player.id, history_limit).await?;
        Ok(PlayerStats {
            player,
            rating: rating.current_rating,
            matches_played: to_count(played)?,
            wins: to_count(wins)?,
            losses: to_count(losses)?,
            draws: to_count(draws)?,
            recent_history,
        })
    }

    async fn counts(&self) -> Result<StoreCounts> {
        let (players, ratings, matches, rating_history): (i64, i64, i64, i64) = query_as(
            "SELECT (SELECT COUNT(*) FROM players),
                    (SELECT COUNT(*) FROM ratings),
                    (SELECT COUNT(*) FROM matches),
                    (SELECT COUNT(*) FROM rating_history)",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(StoreCounts {
            players: players.max(0) as u64,
            ratings: ratings.max(0) as u64,
            matches: matches.max(0) as u64,
            rating_history: rating_history.max(0) as u64,
        })
    }

    async fn ping(&self) -> Result<()> {
        query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(())
    }
}

struct SqliteTransaction {
    tx: Transaction<'static, Sqlite>,
}

impl SqliteTransaction {
    async fn read_rating(&mut self, player_id: PlayerId) -> Result<Rating> {
        let row: Option<RatingRow> = query_as(
            "SELECT player_id, current_rating, updated_at FROM ratings WHERE player_id = $1",
        )
        .bind(player_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(storage_error)?;

        row.map(rating_from_row).transpose()?.ok_or_else(|| {
            ScoreboardError::InternalError {
                message: format!("player {player_id} has no rating"),
            }
            .into()
        })
    }
}

#[async_trait]
impl MatchTransaction for SqliteTransaction {
    async fn lock_ratings(
        &mut self,
        player_a: PlayerId,
        player_b: PlayerId,
    ) -> Result<(Rating, Rating)> {
        // No-op write so the database lock is held before the ratings are read.
        query("UPDATE ratings SET updated_at = updated_at WHERE player_id IN ($1, $2)")
            .bind(player_a)
            .bind(player_b)
            .execute(&mut *self.tx)
            .await
            .map_err(storage_error)?;

        let a = self.read_rating(player_a).await?;
        let b = self.read_rating(player_b).await?;
        Ok((a, b))
    }

    async fn insert_match(&mut self, new_match: NewMatch) -> Result<MatchRecord> {
        let created_at = current_timestamp();
        let (id,): (i64,) = query_as(
            "INSERT INTO matches (player1_id, player2_id, player1_wins, player2_wins, created_at)
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(new_match.player1_id)
        .bind(new_match.player2_id)
        .bind(i64::from(new_match.player1_wins))
        .bind(i64::from(new_match.player2_wins))
        .bind(created_at)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(storage_error)?;

        Ok(MatchRecord {
            id,
            player1_id: new_match.player1_id,
            player2_id: new_match.player2_id,
            player1_wins: new_match.player1_wins,
            player2_wins: new_match.player2_wins,
            created_at,
        })
    }

    async fn insert_rating_history(
        &mut self,
        entry: NewRatingHistory,
    ) -> Result<RatingHistoryEntry> {
        let created_at = current_timestamp();
        let delta = entry.delta();
        let (id,): (i64,) = query_as(
            "INSERT INTO rating_history (match_id, player_id, old_rating, new_rating, delta, created_at)
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(entry.match_id)
        .bind(entry.player_id)
        .bind(entry.old_rating)
        .bind(entry.new_rating)
        .bind(delta)
        .bind(created_at)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(storage_error)?;

        Ok(RatingHistoryEntry {
            id,
            match_id: entry.match_id,
            player_id: entry.player_id,
            old_rating: entry.old_rating,
            new_rating: entry.new_rating,
            delta,
            created_at,
        })
    }

    async fn update_rating(&mut self, player_id: PlayerId, new_rating: f64) -> Result<Rating> {
        let updated_at = current_timestamp();
        let result = query("UPDATE ratings SET current_rating = $1, updated_at = $2 WHERE player_id = $3")
            .bind(new_rating)
            .bind(updated_at)
            .bind(player_id)
            .execute(&mut *self.tx)
            .await
            .map_err(storage_error)?;
        if result.rows_affected() != 1 {
            return Err(ScoreboardError::InternalError {
                message: format!("player {player_id} has no rating"),
            }
            .into());
        }

        Ok(Rating {
            player_id,
            current_rating: new_rating,
            updated_at,
        })
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(storage_error)
    }
}

/// Translate a driver error into the domain taxonomy
fn storage_error(err: sqlx::Error) -> anyhow::Error {
    let mapped = match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() || is_lock_error(db.code()) => {
            ScoreboardError::Conflict {
                message: db.message().to_string(),
            }
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            ScoreboardError::InternalError {
                message: err.to_string(),
            }
        }
        _ => ScoreboardError::Persistence {
            message: err.to_string(),
        },
    };
    mapped.into()
}

/// SQLITE_BUSY (5) or SQLITE_LOCKED (6), including their extended codes
fn is_lock_error(code: Option<std::borrow::Cow<'_, str>>) -> bool {
    code.and_then(|c| c.parse::<i32>().ok())
        .is_some_and(|c| matches!(c & 0xff, 5 | 6))
}

fn player_from_row((id, external_id, display_name, created_at): PlayerRow) -> Player {
    Player {
        id,
        external_id,
        display_name,
        created_at,
    }
}

fn rating_from_row((player_id, current_rating, updated_at): RatingRow) -> Result<Rating> {
    // SQLite stores NaN as NULL
    let value = current_rating.unwrap_or(f64::NAN);
    if !value.is_finite() {
        return Err(ScoreboardError::CorruptRating { player_id, value }.into());
    }
    Ok(Rating {
        player_id,
        current_rating: value,
        updated_at,
    })
}

fn match_from_row(
    (id, player1_id, player2_id, player1_wins, player2_wins, created_at): MatchRow,
) -> Result<MatchRecord> {
    Ok(MatchRecord {
        id,
        player1_id,
        player2_id,
        player1_wins: to_count(player1_wins)?,
        player2_wins: to_count(player2_wins)?,
        created_at,
    })
}

fn history_from_row(
    (id, match_id, player_id, old_rating, new_rating, delta, created_at): HistoryRow,
) -> RatingHistoryEntry {
    RatingHistoryEntry {
        id,
        match_id,
        player_id,
        old_rating,
        new_rating,
        delta,
        created_at,
    }
}

fn to_count(value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        ScoreboardError::InternalError {
            message: format!("count out of range: {value}"),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with_players() -> (SqliteMatchStore, Player, Player) {
        let store = SqliteMatchStore::memory().await.unwrap();
        let alice = store
            .resolve_player(&PlayerIdentity::new(10, "alice"), 1000.0)
            .await
            .unwrap();
        let bob = store
            .resolve_player(&PlayerIdentity::named("bob"), 1000.0)
            .await
            .unwrap();
        (store, alice, bob)
    }

    #[tokio::test]
    async fn test_migrations_create_empty_store() {
        let store = SqliteMatchStore::memory().await.unwrap();
        assert_eq!(store.counts().await.unwrap(), StoreCounts::default());
        assert!(store.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_resolve_player_round_trip() {
        let (store, alice, bob) = store_with_players().await;

        let again = store
            .resolve_player(&PlayerIdentity::new(10, "someone-else"), 1000.0)
            .await
            .unwrap();
        assert_eq!(again.id, alice.id);
        assert_eq!(again.display_name, "alice");

        let claimed = store
            .resolve_player(&PlayerIdentity::new(20, "bob"), 1000.0)
            .await
            .unwrap();
        assert_eq!(claimed.id, bob.id);
        assert_eq!(claimed.external_id, Some(20));
        assert_eq!(
            store.find_player_by_name("bob").await.unwrap().unwrap().external_id,
            Some(20)
        );

        let counts = store.counts().await.unwrap();
        assert_eq!(counts.players, 2);
        assert_eq!(counts.ratings, 2);
    }

    #[tokio::test]
    async fn test_transaction_commit_and_rollback() {
        let (store, alice, bob) = store_with_players().await;

        {
            let mut tx = store.begin().await.unwrap();
            tx.lock_ratings(alice.id, bob.id).await.unwrap();
            tx.insert_match(NewMatch {
                player1_id: alice.id,
                player2_id: bob.id,
                player1_wins: 1,
                player2_wins: 0,
            })
            .await
            .unwrap();
            tx.update_rating(alice.id, 1016.0).await.unwrap();
        }
        assert_eq!(store.counts().await.unwrap().matches, 0);
        assert_eq!(
            store.rating(alice.id).await.unwrap().unwrap().current_rating,
            1000.0
        );

        let mut tx = store.begin().await.unwrap();
        let (a, b) = tx.lock_ratings(alice.id, bob.id).await.unwrap();
        assert_eq!((a.current_rating, b.current_rating), (1000.0, 1000.0));
        let record = tx
            .insert_match(NewMatch {
                player1_id: alice.id,
                player2_id: bob.id,
                player1_wins: 2,
                player2_wins: 1,
            })
            .await
            .unwrap();
        for (player_id, new_rating) in [(alice.id, 1016.0), (bob.id, 984.0)] {
            tx.insert_rating_history(NewRatingHistory {
                match_id: record.id,
                player_id,
                old_rating: 1000.0,
                new_rating,
            })
            .await
            .unwrap();
            tx.update_rating(player_id, new_rating).await.unwrap();
        }
        tx.commit().await.unwrap();

        assert_eq!(
            store.match_record(record.id).await.unwrap().unwrap().player1_wins,
            2
        );
        let history = store.match_history(record.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].delta, -16.0);

        let stats = store.player_stats("alice", 5).await.unwrap();
        assert_eq!(stats.rating, 1016.0);
        assert_eq!((stats.matches_played, stats.wins, stats.losses), (1, 1, 0));
        assert_eq!(stats.recent_history.len(), 1);

        let stats = store.player_stats("bob", 5).await.unwrap();
        assert_eq!((stats.wins, stats.losses, stats.draws), (0, 1, 0));
    }

    #[tokio::test]
    async fn test_schema_rejects_self_match() {
        let (store, alice, _) = store_with_players().await;
        let mut tx = store.begin().await.unwrap();
        let err = tx
            .insert_match(NewMatch {
                player1_id: alice.id,
                player2_id: alice.id,
                player1_wins: 1,
                player2_wins: 0,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScoreboardError>(),
            Some(ScoreboardError::Persistence { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_player_stats() {
        let store = SqliteMatchStore::memory().await.unwrap();
        let err = store.player_stats("ghost", 5).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScoreboardError>(),
            Some(ScoreboardError::PlayerNotFound { .. })
        ));
    }

    async fn file_store(dir: &tempfile::TempDir) -> SqliteMatchStore {
        SqliteMatchStore::connect(&DatabaseSettings {
            url: format!("sqlite://{}", dir.path().join("scoreboard.db").display()),
            ..DatabaseSettings::default()
        })
        .await
        .unwrap()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_resolution_on_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir).await;

        let lookups = (0..40).map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .resolve_player(&PlayerIdentity::named(format!("player{}", i % 20)), 1000.0)
                    .await
            })
        });
        for result in futures::future::join_all(lookups).await {
            result.unwrap().unwrap();
        }

        let counts = store.counts().await.unwrap();
        assert_eq!(counts.players, 20);
        assert_eq!(counts.ratings, 20);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_transactions_on_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir).await;
        let alice = store
            .resolve_player(&PlayerIdentity::named("alice"), 1000.0)
            .await
            .unwrap();
        let bob = store
            .resolve_player(&PlayerIdentity::named("bob"), 1000.0)
            .await
            .unwrap();

        let (alice_id, bob_id) = (alice.id, bob.id);

        let writers = (0..10).map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                let mut tx = store.begin().await?;
                let (a, _) = tx.lock_ratings(alice_id, bob_id).await?;
                tx.update_rating(alice_id, a.current_rating + 1.0).await?;
                tx.commit().await
            })
        });
        for result in futures::future::join_all(writers).await {
            result.unwrap().unwrap();
        }

        assert_eq!(
            store.rating(alice.id).await.unwrap().unwrap().current_rating,
            1010.0
        );
    }

    #[test]
    fn test_lock_error_codes() {
        assert!(is_lock_error(Some("5".into())));
        assert!(is_lock_error(Some("517".into())));
        assert!(is_lock_error(Some("6".into())));
        assert!(!is_lock_error(Some("2067".into())));
        assert!(!is_lock_error(None));
    }
}
