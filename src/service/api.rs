//! Match API
//!
//! JSON endpoints used by the Telegram Mini App: submitting a match and reading a
//! player's rating card. Errors are reported as `{"status": "error", "error": ...}`
//! with a status code derived from the error kind.

use crate::config::ServiceSettings;
use crate::error::{classify, ScoreboardError};
use crate::metrics::monitoring_routes;
use crate::service::app::AppState;
use crate::types::{GameScore, MatchOutcomeSummary, PlayerIdentity, PlayerStats};
use crate::utils::{generate_request_id, normalize_display_name};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{error, info, info_span, warn, Instrument};

const DEFAULT_HISTORY_LIMIT: usize = 10;
const MAX_HISTORY_LIMIT: usize = 100;

/// Build the complete application router
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config().service);
    Router::new()
        .route("/api/matches", post(record_match_handler))
        .route("/api/players/{name}", get(player_stats_handler))
        .merge(monitoring_routes())
        .with_state(state)
        .layer(cors)
}

/// Browser access for the Mini App, which is served from a different origin
pub fn cors_layer(settings: &ServiceSettings) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if settings.cors_allowed_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = settings
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Body of `POST /api/matches`
///
/// Extra fields sent by older Mini App builds (client-side rating guesses) are ignored.
/// A `player_tg_id` of 0 stands for a reporter whose Telegram id is unknown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSubmission {
    pub player_tg_id: i64,
    pub player_username: String,
    pub opponent_username: String,
    #[serde(default)]
    pub games: Vec<GameScore>,
}

#[derive(Debug, Serialize)]
struct MatchResponse {
    status: &'static str,
    #[serde(flatten)]
    summary: MatchOutcomeSummary,
}

#[derive(Debug, Deserialize)]
struct HistoryParams {
    history: Option<usize>,
}

#[derive(Debug, Serialize)]
struct PlayerResponse {
    status: &'static str,
    username: String,
    rating: f64,
    matches_played: u32,
    wins: u32,
    losses: u32,
    draws: u32,
    history: Vec<HistoryItem>,
}

#[derive(Debug, Serialize)]
struct HistoryItem {
    match_id: i64,
    old_rating: f64,
    new_rating: f64,
    delta: f64,
    created_at: DateTime<Utc>,
}

impl From<PlayerStats> for PlayerResponse {
    fn from(stats: PlayerStats) -> Self {
        Self {
            status: "ok",
            username: stats.player.display_name,
            rating: stats.rating,
            matches_played: stats.matches_played,
            wins: stats.wins,
            losses: stats.losses,
            draws: stats.draws,
            history: stats
                .recent_history
                .into_iter()
                .map(|entry| HistoryItem {
                    match_id: entry.match_id,
                    old_rating: entry.old_rating,
                    new_rating: entry.new_rating,
                    delta: entry.delta,
                    created_at: entry.created_at,
                })
                .collect(),
        }
    }
}

/// An error on its way to becoming an HTTP response
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        Self {
            status: status_for(&error),
            message: error.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "status": "error", "error": self.message })),
        )
            .into_response()
    }
}

/// HTTP status for an error chain
pub fn status_for(error: &anyhow::Error) -> StatusCode {
    match classify(error) {
        Some(ScoreboardError::Validation { .. }) => StatusCode::BAD_REQUEST,
        Some(ScoreboardError::PlayerNotFound { .. }) => StatusCode::NOT_FOUND,
        Some(ScoreboardError::Conflict { .. }) | Some(ScoreboardError::Persistence { .. }) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        Some(ScoreboardError::CorruptRating { .. })
        | Some(ScoreboardError::ConfigurationError { .. })
        | Some(ScoreboardError::InternalError { .. })
        | None => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn record_match_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MatchSubmission>, JsonRejection>,
) -> Result<Json<MatchResponse>, ApiError> {
    let request_id = generate_request_id();
    let timer = state.metrics().start_timer();

    let result = async {
        let Json(submission) = payload?;
        info!(
            player = %submission.player_username,
            opponent = %submission.opponent_username,
            games = submission.games.len(),
            "Match submitted"
        );

        let identity =
            PlayerIdentity::new(submission.player_tg_id, submission.player_username.as_str());
        let summary = state
            .recorder()
            .record_match(&identity, &submission.opponent_username, &submission.games)
            .await?;

        Ok::<_, ApiError>(Json(MatchResponse {
            status: "ok",
            summary,
        }))
    }
    .instrument(info_span!("record_match", %request_id))
    .await;

    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            log_failure(e, request_id);
            e.status
        }
    };
    state
        .metrics()
        .record_http_request("/api/matches", status.as_u16(), timer.stop());
    result
}

async fn player_stats_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<PlayerResponse>, ApiError> {
    let request_id = generate_request_id();
    let timer = state.metrics().start_timer();
    let limit = params
        .history
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .min(MAX_HISTORY_LIMIT);

    let result = state
        .store()
        .player_stats(&normalize_display_name(&name), limit)
        .instrument(info_span!("player_stats", %request_id))
        .await
        .map(|stats| Json(PlayerResponse::from(stats)))
        .map_err(ApiError::from);

    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            log_failure(e, request_id);
            e.status
        }
    };
    state
        .metrics()
        .record_http_request("/api/players", status.as_u16(), timer.stop());
    result
}

fn log_failure(error: &ApiError, request_id: uuid::Uuid) {
    if error.status.is_server_error() {
        error!(%request_id, status = %error.status, "Request failed: {}", error.message);
    } else {
        warn!(%request_id, status = %error.status, "Request rejected: {}", error.message);
    }
}
