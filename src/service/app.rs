//! Main application state and service coordination
//!
//! This module contains the AppState shared by every HTTP handler and the
//! ScoreboardService that owns the HTTP server and background tasks.

use crate::config::AppConfig;
use crate::metrics::MetricsCollector;
use crate::rating::EloRatingCalculator;
use crate::recorder::MatchRecorder;
use crate::service::api;
use crate::service::health::HealthCheck;
use crate::service::server::{HttpServer, HttpServerConfig};
use crate::storage::{MatchStore, SqliteMatchStore};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{debug, error, info, warn};

/// How often the background task refreshes health and storage gauges
const HEALTH_METRICS_INTERVAL: Duration = Duration::from_secs(30);

/// Service-level errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Service initialization error: {message}")]
    Initialization { message: String },

    #[error("Background task error: {message}")]
    BackgroundTask { message: String },
}

/// Components shared by all request handlers
pub struct AppState {
    /// Application configuration
    config: AppConfig,

    /// Persistent match and rating state
    store: Arc<dyn MatchStore>,

    /// Match recording pipeline
    recorder: MatchRecorder,

    /// Prometheus metrics
    metrics: Arc<MetricsCollector>,

    /// Service status
    is_running: RwLock<bool>,

    started_at: Instant,
}

impl AppState {
    /// Open the configured database and wire up all components
    pub async fn new(config: AppConfig) -> Result<Self, ServiceError> {
        info!("Initializing scoreboard service");
        info!(
            "Configuration: service={}, database={}",
            config.service.name, config.database.url
        );

        let store = SqliteMatchStore::connect(&config.database)
            .await
            .map_err(|e| ServiceError::Database {
                message: format!("{:#}", e),
            })?;

        Self::with_store(config, Arc::new(store))
    }

    /// Wire up all components around an existing store
    pub fn with_store(config: AppConfig, store: Arc<dyn MatchStore>) -> Result<Self, ServiceError> {
        let metrics = Arc::new(MetricsCollector::new().map_err(|e| {
            ServiceError::Initialization {
                message: format!("Failed to create metrics collector: {}", e),
            }
        })?);

        let calculator = EloRatingCalculator::new(config.rating.clone()).map_err(|e| {
            ServiceError::Configuration {
                message: format!("Invalid rating configuration: {}", e),
            }
        })?;
        info!(
            "Rating engine: ELO, K-factor {}, initial rating {}",
            calculator.k_factor(),
            config.rating.initial_rating
        );

        let recorder = MatchRecorder::new(
            store.clone(),
            Arc::new(calculator),
            config.recorder.clone(),
            metrics.clone(),
        );

        Ok(Self {
            config,
            store,
            recorder,
            metrics,
            is_running: RwLock::new(false),
            started_at: Instant::now(),
        })
    }

    /// Get service configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> Arc<dyn MatchStore> {
        self.store.clone()
    }

    pub fn recorder(&self) -> &MatchRecorder {
        &self.recorder
    }

    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    /// Check if service is running
    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    pub async fn set_running(&self, running: bool) {
        *self.is_running.write().await = running;
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// The running service: HTTP server plus background maintenance
pub struct ScoreboardService {
    state: Arc<AppState>,

    server: Arc<HttpServer>,

    /// Background task handles
    background_tasks: Vec<JoinHandle<()>>,

    shutdown_tx: broadcast::Sender<()>,
}

impl ScoreboardService {
    pub fn new(state: Arc<AppState>) -> Self {
        let server_config = HttpServerConfig {
            host: state.config().service.http_host.clone(),
            port: state.config().service.http_port,
        };
        let server = Arc::new(HttpServer::new(server_config, api::router(state.clone())));
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            state,
            server,
            background_tasks: Vec::new(),
            shutdown_tx,
        }
    }

    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    /// Start the HTTP server and background tasks
    pub async fn start(&mut self) -> Result<(), ServiceError> {
        info!("Starting scoreboard service");

        // Fail fast if the address is unusable instead of inside the task
        let listener = self
            .server
            .bind()
            .await
            .map_err(|e| ServiceError::Initialization {
                message: format!("{:#}", e),
            })?;

        self.state.set_running(true).await;

        let server = self.server.clone();
        self.background_tasks.push(tokio::spawn(async move {
            if let Err(e) = server.serve(listener).await {
                error!("HTTP server failed: {}", e);
            } else {
                info!("HTTP server task completed");
            }
        }));

        self.start_background_tasks();

        info!("✅ Scoreboard service started successfully");
        Ok(())
    }

    /// Perform graceful shutdown
    pub async fn shutdown(&mut self) -> Result<(), ServiceError> {
        info!("Starting graceful shutdown of scoreboard service");

        self.state.set_running(false).await;
        let _ = self.shutdown_tx.send(());

        if let Err(e) = self.server.stop().await {
            warn!("Failed to stop HTTP server: {}", e);
        }

        let shutdown_timeout = self.state.config().shutdown_timeout();
        let task_count = self.background_tasks.len();
        for task in self.background_tasks.drain(..) {
            let abort = task.abort_handle();
            match tokio::time::timeout(shutdown_timeout, task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) if e.is_cancelled() => {}
                Ok(Err(e)) => warn!("Background task ended abnormally: {}", e),
                Err(_) => {
                    warn!("Background task did not stop within {:?}, aborting", shutdown_timeout);
                    abort.abort();
                }
            }
        }
        debug!("Stopped {} background tasks", task_count);

        let counts = self
            .state
            .store()
            .counts()
            .await
            .map_err(|e| ServiceError::BackgroundTask {
                message: format!("Failed to get final stats: {}", e),
            })?;

        info!(
            "Final statistics: {} players, {} matches, {} rating changes",
            counts.players, counts.matches, counts.rating_history
        );
        info!("✅ Scoreboard service shutdown completed");
        Ok(())
    }

    /// Start background maintenance tasks
    fn start_background_tasks(&mut self) {
        let state = self.state.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        let health_metrics_task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(HEALTH_METRICS_INTERVAL);
            let metrics = state.metrics();
            info!("Health metrics task started");

            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    _ = shutdown_rx.recv() => break,
                }

                metrics
                    .service()
                    .uptime_seconds
                    .set(state.uptime().as_secs() as i64);

                match HealthCheck::check(state.clone()).await {
                    Ok(health) => {
                        metrics.update_health_status(health.status.as_metric());
                        for check in &health.checks {
                            metrics.update_component_health(
                                &check.name,
                                check.status != crate::service::HealthStatus::Unhealthy,
                            );
                        }
                        debug!("Health status: {}", health.status);
                    }
                    Err(e) => warn!("Health check failed: {}", e),
                }

                match state.store().counts().await {
                    Ok(counts) => metrics.update_store_counts(&counts),
                    Err(e) => warn!("Failed to read store counts for metrics: {}", e),
                }
            }

            info!("Health metrics task stopped");
        });

        self.background_tasks.push(health_metrics_task);
    }
}
