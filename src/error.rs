//! Error types for the scoreboard service
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application. Domain failures are raised as [`ScoreboardError`] and
//! travel inside `anyhow::Error`; the HTTP layer downcasts them to pick a status code.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific scoreboard scenarios
#[derive(Debug, thiserror::Error)]
pub enum ScoreboardError {
    #[error("Invalid match submission: {reason}")]
    Validation { reason: String },

    #[error("Player not found: {name}")]
    PlayerNotFound { name: String },

    #[error("Storage conflict: {message}")]
    Conflict { message: String },

    #[error("Storage failure: {message}")]
    Persistence { message: String },

    #[error("Stored rating for player {player_id} is not a finite number: {value}")]
    CorruptRating { player_id: i64, value: f64 },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal service error: {message}")]
    InternalError { message: String },
}

impl ScoreboardError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Whether a fresh attempt of the same unit of work may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Short label used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::PlayerNotFound { .. } => "not_found",
            Self::Conflict { .. } => "conflict",
            Self::Persistence { .. } => "persistence",
            Self::CorruptRating { .. } => "corrupt_rating",
            Self::ConfigurationError { .. } => "configuration",
            Self::InternalError { .. } => "internal",
        }
    }
}

/// Find a [`ScoreboardError`] anywhere in an error chain.
pub fn classify(error: &anyhow::Error) -> Option<&ScoreboardError> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<ScoreboardError>())
}

/// Whether an error chain describes a transient storage conflict.
pub fn is_retryable(error: &anyhow::Error) -> bool {
    classify(error).is_some_and(ScoreboardError::is_retryable)
}

/// Metrics label for any error, `unknown` when it carries no [`ScoreboardError`].
pub fn error_kind(error: &anyhow::Error) -> &'static str {
    classify(error).map_or("unknown", ScoreboardError::kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_classify_through_context() {
        let err: anyhow::Error = ScoreboardError::Conflict {
            message: "database is locked".to_string(),
        }
        .into();
        let err = Err::<(), _>(err)
            .context("recording match")
            .unwrap_err();

        assert!(matches!(
            classify(&err),
            Some(ScoreboardError::Conflict { .. })
        ));
        assert!(is_retryable(&err));
        assert_eq!(error_kind(&err), "conflict");
    }

    #[test]
    fn test_non_domain_errors() {
        let err = anyhow::anyhow!("something else");
        assert!(classify(&err).is_none());
        assert!(!is_retryable(&err));
        assert_eq!(error_kind(&err), "unknown");

        let err: anyhow::Error = ScoreboardError::validation("empty name").into();
        assert!(!is_retryable(&err));
        assert_eq!(err.to_string(), "Invalid match submission: empty name");
    }
}
