//! Match recorder implementation
//!
//! The recorder turns a submitted match into persisted state: it validates the
//! submission, resolves both players, derives the outcome from the per-game scores and
//! applies the rating update inside a single storage transaction. Transactions that
//! lose a storage conflict are retried from scratch with freshly read ratings.

use crate::config::RecorderConfig;
use crate::error::{error_kind, is_retryable, Result, ScoreboardError};
use crate::metrics::MetricsCollector;
use crate::rating::{RatingCalculator, WinTally};
use crate::recorder::validation::validate_submission;
use crate::storage::MatchStore;
use crate::types::{
    GameScore, MatchOutcomeSummary, NewMatch, NewRatingHistory, Player, PlayerIdentity,
    SideSummary,
};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Records matches and keeps ratings in step with them
#[derive(Clone)]
pub struct MatchRecorder {
    /// Persistent state
    store: Arc<dyn MatchStore>,
    /// Rating engine
    calculator: Arc<dyn RatingCalculator>,
    /// Limits and retry policy
    config: RecorderConfig,
    /// Metrics collector for recording outcomes and timings
    metrics: Arc<MetricsCollector>,
}

impl MatchRecorder {
    pub fn new(
        store: Arc<dyn MatchStore>,
        calculator: Arc<dyn RatingCalculator>,
        config: RecorderConfig,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            store,
            calculator,
            config,
            metrics,
        }
    }

    pub fn store(&self) -> Arc<dyn MatchStore> {
        self.store.clone()
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Parameters of the rating engine, as reported by `GET /`
    pub fn rating_engine(&self) -> serde_json::Value {
        self.calculator.config()
    }

    /// Record one match reported by `player` against `opponent_name`.
    ///
    /// Either every row of the match is committed or nothing is. Submitting the same
    /// games twice records two matches.
    pub async fn record_match(
        &self,
        player: &PlayerIdentity,
        opponent_name: &str,
        games: &[GameScore],
    ) -> Result<MatchOutcomeSummary> {
        let timer = self.metrics.start_timer();
        let result = self.record(player, opponent_name, games).await;

        match &result {
            Ok(summary) => {
                self.metrics
                    .record_match_recorded(summary.outcome, timer.stop());
            }
            Err(e) => {
                let kind = error_kind(e);
                self.metrics.record_match_failure(kind);
                warn!(
                    player = %player.display_name,
                    opponent = %opponent_name,
                    kind,
                    "Match not recorded: {}",
                    e
                );
            }
        }

        result
    }

    async fn record(
        &self,
        player: &PlayerIdentity,
        opponent_name: &str,
        games: &[GameScore],
    ) -> Result<MatchOutcomeSummary> {
        let submission = validate_submission(player, opponent_name, games, &self.config)?;
        let initial_rating = self.calculator.initial_rating();

        let player = self
            .with_retry("resolve player", || {
                self.store.resolve_player(&submission.player, initial_rating)
            })
            .await?;
        let opponent_identity = PlayerIdentity::named(submission.opponent_name.as_str());
        let opponent = self
            .with_retry("resolve opponent", || {
                self.store.resolve_player(&opponent_identity, initial_rating)
            })
            .await?;

        if player.id == opponent.id {
            return Err(ScoreboardError::validation(
                "a player cannot record a match against themselves",
            )
            .into());
        }

        let tally = WinTally::from_games(games);
        debug!(
            player_id = player.id,
            opponent_id = opponent.id,
            player_wins = tally.player_wins,
            opponent_wins = tally.opponent_wins,
            "Tallied {} games",
            games.len()
        );

        self.with_retry("rating transaction", || self.apply(&player, &opponent, tally))
            .await
    }

    /// Run `operation` again after a pause while it fails with a storage conflict,
    /// up to `max_retry_attempts` attempts in total.
    async fn with_retry<T, F, Fut>(&self, step: &'static str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Err(e) if attempt < self.config.max_retry_attempts && is_retryable(&e) => {
                    warn!(attempt, step, "Storage conflict, retrying: {}", e);
                    self.metrics.record_transaction_retry();
                    attempt += 1;
                    tokio::time::sleep(self.config.retry_delay()).await;
                }
                result => return result,
            }
        }
    }

    /// One attempt of the rating transaction. Dropping the transaction on any early
    /// return rolls it back.
    async fn apply(
        &self,
        player: &Player,
        opponent: &Player,
        tally: WinTally,
    ) -> Result<MatchOutcomeSummary> {
        let mut tx = self.store.begin().await?;
        let (player_rating, opponent_rating) = tx.lock_ratings(player.id, opponent.id).await?;

        let outcome = tally.outcome();
        let timer = self.metrics.start_timer();
        let update = self.calculator.update_ratings(
            player_rating.current_rating,
            opponent_rating.current_rating,
            outcome,
        );
        self.metrics.record_rating_calculation(timer.stop());

        if !update.new_rating_a.is_finite() || !update.new_rating_b.is_finite() {
            return Err(ScoreboardError::InternalError {
                message: format!(
                    "rating update produced {} / {}",
                    update.new_rating_a, update.new_rating_b
                ),
            }
            .into());
        }

        let record = tx
            .insert_match(NewMatch {
                player1_id: player.id,
                player2_id: opponent.id,
                player1_wins: tally.player_wins,
                player2_wins: tally.opponent_wins,
            })
            .await?;

        tx.insert_rating_history(NewRatingHistory {
            match_id: record.id,
            player_id: player.id,
            old_rating: player_rating.current_rating,
            new_rating: update.new_rating_a,
        })
        .await?;
        tx.insert_rating_history(NewRatingHistory {
            match_id: record.id,
            player_id: opponent.id,
            old_rating: opponent_rating.current_rating,
            new_rating: update.new_rating_b,
        })
        .await?;

        tx.update_rating(player.id, update.new_rating_a).await?;
        tx.update_rating(opponent.id, update.new_rating_b).await?;
        tx.commit().await?;

        let summary = MatchOutcomeSummary {
            match_id: record.id,
            outcome,
            player_games_won: tally.player_wins,
            opponent_games_won: tally.opponent_wins,
            player: SideSummary::new(
                &player.display_name,
                player_rating.current_rating,
                update.new_rating_a,
            ),
            opponent: SideSummary::new(
                &opponent.display_name,
                opponent_rating.current_rating,
                update.new_rating_b,
            ),
        };

        info!(
            match_id = summary.match_id,
            %outcome,
            player = %summary.player.username,
            player_delta = summary.player.delta,
            opponent = %summary.opponent.username,
            opponent_delta = summary.opponent.delta,
            "Match recorded"
        );
        Ok(summary)
    }
}
