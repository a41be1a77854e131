//! In-memory match store
//!
//! Keeps every relation in a single mutex-guarded state. A transaction holds the lock
//! for its whole lifetime and works on a private copy that replaces the shared state
//! on commit, so writers are fully serialized and an abandoned transaction changes
//! nothing.

use crate::error::{Result, ScoreboardError};
use crate::storage::{MatchStore, MatchTransaction};
use crate::types::{
    MatchId, MatchRecord, NewMatch, NewRatingHistory, Player, PlayerId, PlayerIdentity,
    PlayerStats, Rating, RatingHistoryEntry, StoreCounts,
};
use crate::utils::current_timestamp;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

#[derive(Debug, Clone, Default)]
struct MemoryState {
    players: Vec<Player>,
    ratings: HashMap<PlayerId, Rating>,
    matches: Vec<MatchRecord>,
    history: Vec<RatingHistoryEntry>,
}

impl MemoryState {
    fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    fn player_by_external_id(&self, external_id: i64) -> Option<&Player> {
        self.players
            .iter()
            .find(|p| p.external_id == Some(external_id))
    }

    fn player_by_name(&self, display_name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.display_name == display_name)
    }

    fn create_player(&mut self, identity: &PlayerIdentity, initial_rating: f64) -> Player {
        let now = current_timestamp();
        let player = Player {
            id: self.players.len() as PlayerId + 1,
            external_id: identity.external_id,
            display_name: identity.display_name.clone(),
            created_at: now,
        };
        self.players.push(player.clone());
        self.ratings.insert(
            player.id,
            Rating {
                player_id: player.id,
                current_rating: initial_rating,
                updated_at: now,
            },
        );
        player
    }

    fn attach_external_id(&mut self, id: PlayerId, external_id: i64) -> Option<Player> {
        let player = self.players.iter_mut().find(|p| p.id == id)?;
        player.external_id = Some(external_id);
        Some(player.clone())
    }

    fn history_for(&self, player_id: PlayerId, limit: usize) -> Vec<RatingHistoryEntry> {
        self.history
            .iter()
            .rev()
            .filter(|entry| entry.player_id == player_id)
            .take(limit)
            .cloned()
            .collect()
    }
}

/// Match store that lives entirely in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryMatchStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn overwrite_rating(&self, player_id: PlayerId, value: f64) {
        let mut state = self.state.lock().await;
        if let Some(rating) = state.ratings.get_mut(&player_id) {
            rating.current_rating = value;
        }
    }
}

#[async_trait]
impl MatchStore for InMemoryMatchStore {
    async fn resolve_player(
        &self,
        identity: &PlayerIdentity,
        initial_rating: f64,
    ) -> Result<Player> {
        let mut state = self.state.lock().await;

        if let Some(external_id) = identity.external_id {
            if let Some(player) = state.player_by_external_id(external_id) {
                return Ok(player.clone());
            }
        }

        if let Some(player) = state.player_by_name(&identity.display_name).cloned() {
            return match (player.external_id, identity.external_id) {
                (None, Some(external_id)) => {
                    debug!(player_id = player.id, external_id, "attaching external id");
                    state
                        .attach_external_id(player.id, external_id)
                        .ok_or_else(|| {
                            ScoreboardError::InternalError {
                                message: format!("player {} vanished", player.id),
                            }
                            .into()
                        })
                }
                _ => Ok(player),
            };
        }

        let player = state.create_player(identity, initial_rating);
        debug!(player_id = player.id, name = %player.display_name, "created player");
        Ok(player)
    }

    async fn begin(&self) -> Result<Box<dyn MatchTransaction>> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTransaction { guard, working }))
    }

    async fn find_player_by_name(&self, display_name: &str) -> Result<Option<Player>> {
        let state = self.state.lock().await;
        Ok(state.player_by_name(display_name).cloned())
    }

    async fn rating(&self, player_id: PlayerId) -> Result<Option<Rating>> {
        let state = self.state.lock().await;
        Ok(state.ratings.get(&player_id).copied())
    }

    async fn match_record(&self, match_id: MatchId) -> Result<Option<MatchRecord>> {
        let state = self.state.lock().await;
        Ok(state.matches.iter().find(|m| m.id == match_id).cloned())
    }

    async fn rating_history(
        &self,
        player_id: PlayerId,
        limit: usize,
    ) -> Result<Vec<RatingHistoryEntry>> {
        let state = self.state.lock().await;
        Ok(state.history_for(player_id, limit))
    }

    async fn match_history(&self, match_id: MatchId) -> Result<Vec<RatingHistoryEntry>> {
        let state = self.state.lock().await;
        Ok(state
            .history
            .iter()
            .filter(|entry| entry.match_id == match_id)
            .cloned()
            .collect())
    }

    async fn player_stats(&self, display_name: &str, history_limit: usize) -> Result<PlayerStats> {
        let state = self.state.lock().await;
        let player = state
            .player_by_name(display_name)
            .cloned()
            .ok_or_else(|| ScoreboardError::PlayerNotFound {
                name: display_name.to_string(),
            })?;
        let rating = state
            .ratings
            .get(&player.id)
            .map(|r| r.current_rating)
            .ok_or_else(|| ScoreboardError::InternalError {
                message: format!("player {} has no rating", player.id),
            })?;

        let mut stats = PlayerStats {
            rating,
            matches_played: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            recent_history: state.history_for(player.id, history_limit),
            player,
        };
        for record in &state.matches {
            let (own, other) = if record.player1_id == stats.player.id {
                (record.player1_wins, record.player2_wins)
            } else if record.player2_id == stats.player.id {
                (record.player2_wins, record.player1_wins)
            } else {
                continue;
            };
            stats.matches_played += 1;
            match own.cmp(&other) {
                std::cmp::Ordering::Greater => stats.wins += 1,
                std::cmp::Ordering::Less => stats.losses += 1,
                std::cmp::Ordering::Equal => stats.draws += 1,
            }
        }

        Ok(stats)
    }

    async fn counts(&self) -> Result<StoreCounts> {
        let state = self.state.lock().await;
        Ok(StoreCounts {
            players: state.players.len() as u64,
            ratings: state.ratings.len() as u64,
            matches: state.matches.len() as u64,
            rating_history: state.history.len() as u64,
        })
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

impl MemoryTransaction {
    fn ensure_player(&self, player_id: PlayerId) -> Result<()> {
        if self.working.player(player_id).is_none() {
            return Err(ScoreboardError::Persistence {
                message: format!("unknown player {player_id}"),
            }
            .into());
        }
        Ok(())
    }

    fn read_rating(&self, player_id: PlayerId) -> Result<Rating> {
        let rating = self.working.ratings.get(&player_id).copied().ok_or_else(|| {
            ScoreboardError::InternalError {
                message: format!("player {player_id} has no rating"),
            }
        })?;
        if !rating.current_rating.is_finite() {
            return Err(ScoreboardError::CorruptRating {
                player_id,
                value: rating.current_rating,
            }
            .into());
        }
        Ok(rating)
    }
}

#[async_trait]
impl MatchTransaction for MemoryTransaction {
    async fn lock_ratings(
        &mut self,
        player_a: PlayerId,
        player_b: PlayerId,
    ) -> Result<(Rating, Rating)> {
        // The whole store is already locked by this transaction.
        Ok((self.read_rating(player_a)?, self.read_rating(player_b)?))
    }

    async fn insert_match(&mut self, new_match: NewMatch) -> Result<MatchRecord> {
        self.ensure_player(new_match.player1_id)?;
        self.ensure_player(new_match.player2_id)?;
        if new_match.player1_id == new_match.player2_id {
            return Err(ScoreboardError::Persistence {
                message: "a match needs two distinct players".to_string(),
            }
            .into());
        }

        let record = MatchRecord {
            id: self.working.matches.len() as MatchId + 1,
            player1_id: new_match.player1_id,
            player2_id: new_match.player2_id,
            player1_wins: new_match.player1_wins,
            player2_wins: new_match.player2_wins,
            created_at: current_timestamp(),
        };
        self.working.matches.push(record.clone());
        Ok(record)
    }

    async fn insert_rating_history(
        &mut self,
        entry: NewRatingHistory,
    ) -> Result<RatingHistoryEntry> {
        self.ensure_player(entry.player_id)?;
        if !self.working.matches.iter().any(|m| m.id == entry.match_id) {
            return Err(ScoreboardError::Persistence {
                message: format!("unknown match {}", entry.match_id),
            }
            .into());
        }
        if self
            .working
            .history
            .iter()
            .any(|h| h.match_id == entry.match_id && h.player_id == entry.player_id)
        {
            return Err(ScoreboardError::Conflict {
                message: format!(
                    "history for player {} in match {} already exists",
                    entry.player_id, entry.match_id
                ),
            }
            .into());
        }

        let stored = RatingHistoryEntry {
            id: self.working.history.len() as i64 + 1,
            match_id: entry.match_id,
            player_id: entry.player_id,
            old_rating: entry.old_rating,
            new_rating: entry.new_rating,
            delta: entry.delta(),
            created_at: current_timestamp(),
        };
        self.working.history.push(stored.clone());
        Ok(stored)
    }

    async fn update_rating(&mut self, player_id: PlayerId, new_rating: f64) -> Result<Rating> {
        let rating = self.working.ratings.get_mut(&player_id).ok_or_else(|| {
            ScoreboardError::InternalError {
                message: format!("player {player_id} has no rating"),
            }
        })?;
        rating.current_rating = new_rating;
        rating.updated_at = current_timestamp();
        Ok(*rating)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let MemoryTransaction { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}
