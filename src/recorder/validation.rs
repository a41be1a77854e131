//! Submission checks performed before anything touches storage

use crate::config::RecorderConfig;
use crate::error::ScoreboardError;
use crate::types::{GameScore, PlayerIdentity};
use crate::utils::normalize_display_name;

/// A submission that passed validation, with display names normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    pub player: PlayerIdentity,
    pub opponent_name: String,
}

/// Check a raw submission against the recorder limits.
///
/// An external id of `0` is how the Mini App reports "unknown" and is dropped.
pub fn validate_submission(
    player: &PlayerIdentity,
    opponent_name: &str,
    games: &[GameScore],
    config: &RecorderConfig,
) -> Result<ValidatedSubmission, ScoreboardError> {
    let player_name = checked_name("player", &player.display_name, config)?;
    let opponent_name = checked_name("opponent", opponent_name, config)?;

    if player_name == opponent_name {
        return Err(ScoreboardError::validation(
            "a player cannot record a match against themselves",
        ));
    }

    if games.len() > config.max_games_per_match {
        return Err(ScoreboardError::validation(format!(
            "too many games: {} (limit {})",
            games.len(),
            config.max_games_per_match
        )));
    }

    if let Some((index, game)) = games.iter().enumerate().find(|(_, g)| {
        g.player_score > config.max_game_score || g.opponent_score > config.max_game_score
    }) {
        return Err(ScoreboardError::validation(format!(
            "game {} score {}:{} exceeds the limit of {}",
            index + 1,
            game.player_score,
            game.opponent_score,
            config.max_game_score
        )));
    }

    Ok(ValidatedSubmission {
        player: PlayerIdentity::new(player.external_id.filter(|id| *id != 0), player_name),
        opponent_name,
    })
}

fn checked_name(
    role: &str,
    raw: &str,
    config: &RecorderConfig,
) -> Result<String, ScoreboardError> {
    let name = normalize_display_name(raw);
    if name.is_empty() {
        return Err(ScoreboardError::validation(format!(
            "{role} name must not be empty"
        )));
    }
    if name.chars().count() > config.max_name_length {
        return Err(ScoreboardError::validation(format!(
            "{role} name is longer than {} characters",
            config.max_name_length
        )));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn games(scores: &[(u32, u32)]) -> Vec<GameScore> {
        scores.iter().copied().map(GameScore::from).collect()
    }

    #[test]
    fn test_normalizes_names() {
        let config = RecorderConfig::default();
        let submission = validate_submission(
            &PlayerIdentity::new(42, " alice "),
            "@bob",
            &games(&[(6, 4)]),
            &config,
        )
        .unwrap();

        assert_eq!(submission.player, PlayerIdentity::new(42, "alice"));
        assert_eq!(submission.opponent_name, "bob");
    }

    #[test]
    fn test_zero_external_id_is_unknown() {
        let submission = validate_submission(
            &PlayerIdentity::new(0, "alice"),
            "bob",
            &[],
            &RecorderConfig::default(),
        )
        .unwrap();
        assert_eq!(submission.player.external_id, None);
    }

    #[test]
    fn test_rejects_bad_names() {
        let config = RecorderConfig::default();

        for (player, opponent) in [("", "bob"), ("alice", "  @ "), ("alice", "@alice")] {
            let err =
                validate_submission(&PlayerIdentity::named(player), opponent, &[], &config)
                    .unwrap_err();
            assert!(matches!(err, ScoreboardError::Validation { .. }), "{err}");
        }

        let long = "x".repeat(config.max_name_length + 1);
        assert!(validate_submission(&PlayerIdentity::named("alice"), &long, &[], &config).is_err());

        // Multi-byte names are measured in characters
        let cyrillic = "ё".repeat(config.max_name_length);
        assert!(
            validate_submission(&PlayerIdentity::named("alice"), &cyrillic, &[], &config).is_ok()
        );
    }

    #[test]
    fn test_rejects_excessive_games() {
        let config = RecorderConfig {
            max_games_per_match: 2,
            max_game_score: 10,
            ..Default::default()
        };
        let player = PlayerIdentity::named("alice");

        assert!(validate_submission(&player, "bob", &games(&[(1, 0), (0, 1)]), &config).is_ok());
        assert!(
            validate_submission(&player, "bob", &games(&[(1, 0), (0, 1), (1, 1)]), &config)
                .is_err()
        );

        let err = validate_submission(&player, "bob", &games(&[(3, 11)]), &config).unwrap_err();
        assert!(err.to_string().contains("game 1"));
    }
}
