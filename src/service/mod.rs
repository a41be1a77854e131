//! Service layer for the scoreboard service
//!
//! This module contains the application state, the HTTP API and server, health
//! checks, and background task management for the production service.

pub mod api;
pub mod app;
pub mod health;
pub mod server;

pub use api::{router, MatchSubmission};
pub use app::{AppState, ScoreboardService, ServiceError};
pub use health::{HealthCheck, HealthStatus};
pub use server::{HttpServer, HttpServerConfig};
