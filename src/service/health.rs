//! Service and database health reports
//!
//! Liveness only looks at the running flag; readiness and the full report also
//! round-trip the match store.

use crate::service::app::AppState;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Database round trips slower than this mark the service as degraded
const SLOW_DATABASE_THRESHOLD: Duration = Duration::from_secs(1);

/// Coarse health of a component or of the whole service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    /// Gauge value exported to Prometheus
    pub fn as_metric(self) -> u8 {
        match self {
            HealthStatus::Healthy => 2,
            HealthStatus::Degraded => 1,
            HealthStatus::Unhealthy => 0,
        }
    }

    /// The worse of two statuses
    fn combine(self, other: HealthStatus) -> HealthStatus {
        match (self, other) {
            (HealthStatus::Unhealthy, _) | (_, HealthStatus::Unhealthy) => HealthStatus::Unhealthy,
            (HealthStatus::Degraded, _) | (_, HealthStatus::Degraded) => HealthStatus::Degraded,
            _ => HealthStatus::Healthy,
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy ✅"),
            HealthStatus::Degraded => write!(f, "degraded ⚠️"),
            HealthStatus::Unhealthy => write!(f, "unhealthy ❌"),
        }
    }
}

/// Full report served by `/stats` and printed by `--health-check`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Worst status among `checks`
    pub status: HealthStatus,
    pub service: String,
    /// Crate version
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub checks: Vec<ComponentCheck>,
    /// Row counts and uptime
    pub stats: ServiceStats,
}

/// Result of probing one component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentCheck {
    pub name: String,
    pub status: HealthStatus,
    /// Why the component is not healthy
    pub message: Option<String>,
    /// Time spent probing
    pub duration_ms: u64,
}

/// Store counts at the time of the report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceStats {
    pub players: u64,
    pub matches: u64,
    pub rating_history: u64,
    pub uptime_seconds: u64,
}

impl HealthCheck {
    /// Probe every component and gather store counts
    pub async fn check(app_state: Arc<AppState>) -> Result<Self> {
        let service_check = Self::check_service_running(&app_state).await;
        let database_check = Self::check_database(&app_state).await;
        let status = service_check.status.combine(database_check.status);

        let stats = Self::gather_service_stats(&app_state).await;

        Ok(HealthCheck {
            status,
            service: app_state.config().service.name.clone(),
            version: crate::VERSION.to_string(),
            timestamp: chrono::Utc::now(),
            checks: vec![service_check, database_check],
            stats,
        })
    }

    /// Healthy while the service is started; never touches the database
    pub async fn liveness_check(app_state: Arc<AppState>) -> Result<HealthStatus> {
        if app_state.is_running().await {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy)
        }
    }

    /// Healthy when started and the database answers
    pub async fn readiness_check(app_state: Arc<AppState>) -> Result<HealthStatus> {
        if !app_state.is_running().await {
            return Ok(HealthStatus::Unhealthy);
        }

        Ok(Self::check_database(&app_state).await.status)
    }

    async fn check_service_running(app_state: &AppState) -> ComponentCheck {
        let start = Instant::now();

        let (status, message) = if app_state.is_running().await {
            (HealthStatus::Healthy, None)
        } else {
            (
                HealthStatus::Unhealthy,
                Some("not started or shutting down".to_string()),
            )
        };

        ComponentCheck {
            name: "service".to_string(),
            status,
            message,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Check that the database answers, and answers quickly
    async fn check_database(app_state: &AppState) -> ComponentCheck {
        let start = Instant::now();

        let (status, message) = match app_state.store().ping().await {
            Ok(()) if start.elapsed() > SLOW_DATABASE_THRESHOLD => (
                HealthStatus::Degraded,
                Some(format!(
                    "Database responded in {}ms",
                    start.elapsed().as_millis()
                )),
            ),
            Ok(()) => (HealthStatus::Healthy, None),
            Err(e) => {
                error!("Database health check failed: {}", e);
                (
                    HealthStatus::Unhealthy,
                    Some(format!("Database unavailable: {}", e)),
                )
            }
        };

        ComponentCheck {
            name: "database".to_string(),
            status,
            message,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Counts fall back to zero when the store cannot be read
    async fn gather_service_stats(app_state: &AppState) -> ServiceStats {
        let uptime_seconds = app_state.uptime().as_secs();

        match app_state.store().counts().await {
            Ok(counts) => ServiceStats {
                players: counts.players,
                matches: counts.matches,
                rating_history: counts.rating_history,
                uptime_seconds,
            },
            Err(e) => {
                debug!("Failed to get store counts for health check: {}", e);
                ServiceStats {
                    uptime_seconds,
                    ..Default::default()
                }
            }
        }
    }
}

impl HealthCheck {
    /// Pretty-printed JSON of the report
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| anyhow::anyhow!("Health report is not serializable: {}", e))
    }
}
