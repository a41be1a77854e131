//! Match outcome derivation from per-game scores

use crate::types::GameScore;
use serde::{Deserialize, Serialize};
use skillratings::Outcomes;
use std::cmp::Ordering;

/// Result of a match from the reporting player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOutcome {
    Win,
    Draw,
    Loss,
}

impl MatchOutcome {
    /// Actual score fed into the rating update: 1.0, 0.5 or 0.0
    pub fn score(self) -> f64 {
        match self {
            MatchOutcome::Win => 1.0,
            MatchOutcome::Draw => 0.5,
            MatchOutcome::Loss => 0.0,
        }
    }

    /// Compare two win counts; equal counts, zero included, are a draw.
    pub fn from_wins(player_wins: u32, opponent_wins: u32) -> Self {
        match player_wins.cmp(&opponent_wins) {
            Ordering::Greater => MatchOutcome::Win,
            Ordering::Less => MatchOutcome::Loss,
            Ordering::Equal => MatchOutcome::Draw,
        }
    }
}

impl From<MatchOutcome> for Outcomes {
    fn from(outcome: MatchOutcome) -> Self {
        match outcome {
            MatchOutcome::Win => Outcomes::WIN,
            MatchOutcome::Draw => Outcomes::DRAW,
            MatchOutcome::Loss => Outcomes::LOSS,
        }
    }
}

impl std::fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchOutcome::Win => write!(f, "win"),
            MatchOutcome::Draw => write!(f, "draw"),
            MatchOutcome::Loss => write!(f, "loss"),
        }
    }
}

/// Games won by each side of a match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinTally {
    pub player_wins: u32,
    pub opponent_wins: u32,
}

impl WinTally {
    /// Count games won by each side. A game goes to whoever scored strictly more;
    /// a level game counts for nobody.
    pub fn from_games(games: &[GameScore]) -> Self {
        games.iter().fold(Self::default(), |mut tally, game| {
            match game.player_score.cmp(&game.opponent_score) {
                Ordering::Greater => tally.player_wins += 1,
                Ordering::Less => tally.opponent_wins += 1,
                Ordering::Equal => {}
            }
            tally
        })
    }

    pub fn outcome(&self) -> MatchOutcome {
        MatchOutcome::from_wins(self.player_wins, self.opponent_wins)
    }
}
