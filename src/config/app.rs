//! Main application configuration
//!
//! This module defines the primary configuration structures for the scoreboard
//! service, including environment variable and TOML file loading and validation.

use crate::config::{RatingConfig, RecorderConfig};
use anyhow::{anyhow, Context, Result};
use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub database: DatabaseSettings,
    pub rating: RatingConfig,
    pub recorder: RecorderConfig,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and metrics
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Interface the HTTP server binds to
    pub http_host: String,
    /// Port for the match API, health and metrics endpoints
    pub http_port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
    /// Origins allowed to call the API from a browser; `*` allows any
    pub cors_allowed_origins: Vec<String>,
}

/// Database connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite URL, e.g. `sqlite://scoreboard.db` or `sqlite::memory:`
    pub url: String,
    /// Maximum pooled connections
    pub max_connections: u32,
    /// How long a writer waits for a locked database, in milliseconds
    pub busy_timeout_ms: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "scoreboard".to_string(),
            log_level: "info".to_string(),
            http_host: "0.0.0.0".to_string(),
            http_port: 8080,
            shutdown_timeout_seconds: 30,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://scoreboard.db".to_string(),
            max_connections: 8,
            busy_timeout_ms: 5000,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from a TOML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // Service settings
        if let Some(name) = lookup("SERVICE_NAME") {
            config.service.name = name;
        }
        if let Some(log_level) = lookup("LOG_LEVEL") {
            config.service.log_level = log_level;
        }
        if let Some(host) = lookup("HTTP_HOST") {
            config.service.http_host = host;
        }
        if let Some(port) = parse_var(&lookup, "HTTP_PORT")? {
            config.service.http_port = port;
        }
        if let Some(timeout) = parse_var(&lookup, "SHUTDOWN_TIMEOUT_SECONDS")? {
            config.service.shutdown_timeout_seconds = timeout;
        }
        if let Some(origins) = lookup("CORS_ALLOWED_ORIGINS") {
            config.service.cors_allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect();
        }

        // Database settings
        if let Some(url) = lookup("DATABASE_URL") {
            config.database.url = url;
        }
        if let Some(max) = parse_var(&lookup, "DATABASE_MAX_CONNECTIONS")? {
            config.database.max_connections = max;
        }
        if let Some(timeout) = parse_var(&lookup, "DATABASE_BUSY_TIMEOUT_MS")? {
            config.database.busy_timeout_ms = timeout;
        }

        // Rating settings
        if let Some(k) = parse_var(&lookup, "RATING_K_FACTOR")? {
            config.rating.k_factor = k;
        }
        if let Some(initial) = parse_var(&lookup, "RATING_INITIAL")? {
            config.rating.initial_rating = initial;
        }

        // Recorder settings
        if let Some(attempts) = parse_var(&lookup, "RECORDER_MAX_RETRY_ATTEMPTS")? {
            config.recorder.max_retry_attempts = attempts;
        }
        if let Some(delay) = parse_var(&lookup, "RECORDER_RETRY_DELAY_MS")? {
            config.recorder.retry_delay_ms = delay;
        }
        if let Some(games) = parse_var(&lookup, "RECORDER_MAX_GAMES_PER_MATCH")? {
            config.recorder.max_games_per_match = games;
        }
        if let Some(score) = parse_var(&lookup, "RECORDER_MAX_GAME_SCORE")? {
            config.recorder.max_game_score = score;
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.service.shutdown_timeout_seconds)
    }

    /// Get database busy timeout as Duration
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.database.busy_timeout_ms)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("Invalid {} value: {}", key, value)),
        None => Ok(None),
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate ports
    if config.service.http_port == 0 {
        return Err(anyhow!("HTTP port cannot be 0"));
    }

    // Validate timeouts
    if config.service.shutdown_timeout_seconds == 0 {
        return Err(anyhow!("Shutdown timeout must be greater than 0"));
    }

    // Validate CORS origins
    for origin in &config.service.cors_allowed_origins {
        if origin != "*" && HeaderValue::from_str(origin).is_err() {
            return Err(anyhow!("Invalid CORS origin: {:?}", origin));
        }
    }

    // Validate database settings
    if config.database.url.is_empty() {
        return Err(anyhow!("Database URL cannot be empty"));
    }
    if config.database.max_connections == 0 {
        return Err(anyhow!("Database pool needs at least one connection"));
    }

    // Validate rating and recorder settings
    config.rating.validate()?;
    if config.recorder.max_retry_attempts == 0 {
        return Err(anyhow!("Recorder needs at least one attempt per match"));
    }
    if config.recorder.max_name_length == 0 {
        return Err(anyhow!("Maximum display name length must be greater than 0"));
    }

    Ok(())
}
