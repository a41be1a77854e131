//! Metrics and monitoring for the scoreboard service
//!
//! This module provides Prometheus metrics collection and the health and metrics
//! HTTP endpoints.

pub mod collector;
pub mod health;

pub use collector::{MatchMetrics, MetricsCollector, MetricsTimer, PerformanceMetrics, ServiceMetrics};
pub use health::{metrics_text, monitoring_routes};
