//! Utility functions for the scoreboard service

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new unique request ID for log correlation
pub fn generate_request_id() -> Uuid {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Trim surrounding whitespace and one leading `@` from a display name.
///
/// The Mini App sends opponents as `@username`; stored names never carry the `@`.
pub fn normalize_display_name(name: &str) -> String {
    let trimmed = name.trim();
    trimmed
        .strip_prefix('@')
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}
