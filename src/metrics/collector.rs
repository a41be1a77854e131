//! Prometheus metrics for the scoreboard service
//!
//! This module provides metrics collection for the scoreboard service using
//! Prometheus metrics.

use crate::rating::MatchOutcome;
use crate::types::StoreCounts;
use anyhow::Result;
use prometheus::{
    Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, IntGaugeVec,
    Opts, Registry,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for the scoreboard service
#[derive(Clone)]
pub struct MetricsCollector {
    registry: Arc<Registry>,

    /// Process and HTTP level metrics
    service_metrics: ServiceMetrics,

    /// Match recording metrics
    match_metrics: MatchMetrics,

    /// Latency histograms
    performance_metrics: PerformanceMetrics,
}

/// Process and HTTP level metrics
#[derive(Clone)]
pub struct ServiceMetrics {
    pub uptime_seconds: IntGauge,

    /// 0 unhealthy, 1 degraded, 2 healthy
    pub health_status: IntGauge,

    /// 1 while the labelled component is healthy
    pub component_health: IntGaugeVec,

    /// HTTP requests by route and status code
    pub http_requests_total: IntCounterVec,
}

/// Match recording metrics
#[derive(Clone)]
pub struct MatchMetrics {
    /// Matches committed, by outcome from the reporter's side
    pub matches_recorded_total: IntCounterVec,

    /// Submissions that failed, by error kind
    pub match_failures_total: IntCounterVec,

    /// Rating transactions restarted after a storage conflict
    pub transaction_retries_total: IntCounter,

    /// Stored players, refreshed by the health task
    pub players: IntGauge,

    /// Stored matches, refreshed by the health task
    pub matches: IntGauge,
}

/// Latency histograms
#[derive(Clone)]
pub struct PerformanceMetrics {
    /// End-to-end duration of a successful `record_match`
    pub record_duration: Histogram,

    pub rating_calculation_duration: Histogram,

    /// HTTP handler durations
    pub http_request_duration: HistogramVec,
}

impl MetricsCollector {
    /// Create a new metrics collector with its own registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Register every metric in `registry`; fails if a name is already taken
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let service_metrics = ServiceMetrics::new(&registry)?;
        let match_metrics = MatchMetrics::new(&registry)?;
        let performance_metrics = PerformanceMetrics::new(&registry)?;

        Ok(Self {
            registry,
            service_metrics,
            match_metrics,
            performance_metrics,
        })
    }

    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    pub fn service(&self) -> &ServiceMetrics {
        &self.service_metrics
    }

    pub fn matches(&self) -> &MatchMetrics {
        &self.match_metrics
    }

    pub fn performance(&self) -> &PerformanceMetrics {
        &self.performance_metrics
    }

    /// Record a committed match
    pub fn record_match_recorded(&self, outcome: MatchOutcome, duration: Duration) {
        self.match_metrics
            .matches_recorded_total
            .with_label_values(&[&outcome.to_string()])
            .inc();

        self.performance_metrics
            .record_duration
            .observe(duration.as_secs_f64());
    }

    /// Record a failed submission
    pub fn record_match_failure(&self, kind: &str) {
        self.match_metrics
            .match_failures_total
            .with_label_values(&[kind])
            .inc();
    }

    pub fn record_transaction_retry(&self) {
        self.match_metrics.transaction_retries_total.inc();
    }

    pub fn record_rating_calculation(&self, duration: Duration) {
        self.performance_metrics
            .rating_calculation_duration
            .observe(duration.as_secs_f64());
    }

    /// Record an HTTP request
    pub fn record_http_request(&self, route: &str, status: u16, duration: Duration) {
        self.service_metrics
            .http_requests_total
            .with_label_values(&[route, &status.to_string()])
            .inc();

        self.performance_metrics
            .http_request_duration
            .with_label_values(&[route])
            .observe(duration.as_secs_f64());
    }

    /// Update gauges from storage row counts
    pub fn update_store_counts(&self, counts: &StoreCounts) {
        self.match_metrics.players.set(counts.players as i64);
        self.match_metrics.matches.set(counts.matches as i64);
    }

    /// Set the overall health gauge from [`crate::service::HealthStatus::as_metric`]
    pub fn update_health_status(&self, status: u8) {
        self.service_metrics.health_status.set(status as i64);
    }

    pub fn update_component_health(&self, component: &str, healthy: bool) {
        let status = if healthy { 1 } else { 0 };
        self.service_metrics
            .component_health
            .with_label_values(&[component])
            .set(status);
    }

    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }
}

/// Wall-clock stopwatch started by [`MetricsCollector::start_timer`]
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Consume the timer, returning the measured duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl ServiceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let uptime_seconds =
            IntGauge::new("scoreboard_uptime_seconds", "Service uptime in seconds")?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        let health_status = IntGauge::new(
            "scoreboard_health_status",
            "Overall service health: 0 unhealthy, 1 degraded, 2 healthy",
        )?;
        registry.register(Box::new(health_status.clone()))?;

        let component_health = IntGaugeVec::new(
            Opts::new("scoreboard_component_health", "Component health status"),
            &["component"],
        )?;
        registry.register(Box::new(component_health.clone()))?;

        let http_requests_total = IntCounterVec::new(
            Opts::new("scoreboard_http_requests_total", "Total HTTP requests"),
            &["route", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        Ok(Self {
            uptime_seconds,
            health_status,
            component_health,
            http_requests_total,
        })
    }
}

impl MatchMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let matches_recorded_total = IntCounterVec::new(
            Opts::new("scoreboard_matches_recorded_total", "Total matches recorded"),
            &["outcome"],
        )?;
        registry.register(Box::new(matches_recorded_total.clone()))?;

        let match_failures_total = IntCounterVec::new(
            Opts::new(
                "scoreboard_match_failures_total",
                "Total rejected or failed match submissions",
            ),
            &["kind"],
        )?;
        registry.register(Box::new(match_failures_total.clone()))?;

        let transaction_retries_total = IntCounter::new(
            "scoreboard_transaction_retries_total",
            "Rating transactions retried after a storage conflict",
        )?;
        registry.register(Box::new(transaction_retries_total.clone()))?;

        let players = IntGauge::new("scoreboard_players", "Stored players")?;
        registry.register(Box::new(players.clone()))?;

        let matches = IntGauge::new("scoreboard_matches", "Stored matches")?;
        registry.register(Box::new(matches.clone()))?;

        Ok(Self {
            matches_recorded_total,
            match_failures_total,
            transaction_retries_total,
            players,
            matches,
        })
    }
}

impl PerformanceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let record_duration = Histogram::with_opts(
            HistogramOpts::new(
                "scoreboard_record_duration_seconds",
                "Match recording time",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        )?;
        registry.register(Box::new(record_duration.clone()))?;

        let rating_calculation_duration = Histogram::with_opts(
            HistogramOpts::new(
                "scoreboard_rating_calculation_duration_seconds",
                "Time spent in the ELO update",
            )
            .buckets(vec![0.00001, 0.0001, 0.001, 0.005, 0.01]),
        )?;
        registry.register(Box::new(rating_calculation_duration.clone()))?;

        let http_request_duration = HistogramVec::new(
            HistogramOpts::new(
                "scoreboard_http_request_duration_seconds",
                "HTTP request duration",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["route"],
        )?;
        registry.register(Box::new(http_request_duration.clone()))?;

        Ok(Self {
            record_duration,
            rating_calculation_duration,
            http_request_duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::{Encoder, TextEncoder};

    fn render(collector: &MetricsCollector) -> String {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&collector.registry().gather(), &mut buffer)
            .unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_metrics_collector_creation() {
        let collector = MetricsCollector::new().unwrap();

        let _service = collector.service();
        let _matches = collector.matches();
        let _performance = collector.performance();
    }

    #[test]
    fn test_collectors_are_independent() {
        // Each collector owns its registry, so tests never trip over duplicates.
        let a = MetricsCollector::new().unwrap();
        let b = MetricsCollector::new().unwrap();
        a.record_transaction_retry();
        assert_eq!(a.matches().transaction_retries_total.get(), 1);
        assert_eq!(b.matches().transaction_retries_total.get(), 0);
    }

    #[test]
    fn test_match_recording() {
        let collector = MetricsCollector::new().unwrap();

        collector.record_match_recorded(MatchOutcome::Win, Duration::from_millis(3));
        collector.record_match_recorded(MatchOutcome::Draw, Duration::from_millis(1));
        collector.record_match_failure("validation");

        let matches = collector.matches();
        assert_eq!(
            matches
                .matches_recorded_total
                .with_label_values(&["win"])
                .get(),
            1
        );
        assert_eq!(
            matches
                .match_failures_total
                .with_label_values(&["validation"])
                .get(),
            1
        );
        assert_eq!(collector.performance().record_duration.get_sample_count(), 2);

        let text = render(&collector);
        assert!(text.contains("scoreboard_matches_recorded_total"));
        assert!(text.contains("outcome=\"draw\""));
    }

    #[test]
    fn test_store_counts_and_health() {
        let collector = MetricsCollector::new().unwrap();

        collector.update_store_counts(&StoreCounts {
            players: 4,
            ratings: 4,
            matches: 9,
            rating_history: 18,
        });
        collector.update_health_status(2);
        collector.update_component_health("database", true);
        collector.record_http_request("/api/matches", 200, Duration::from_millis(2));

        assert_eq!(collector.matches().players.get(), 4);
        assert_eq!(collector.matches().matches.get(), 9);
        assert_eq!(collector.service().health_status.get(), 2);
        assert_eq!(
            collector
                .service()
                .http_requests_total
                .with_label_values(&["/api/matches", "200"])
                .get(),
            1
        );
    }

    #[test]
    fn test_metrics_timer() {
        let collector = MetricsCollector::new().unwrap();
        let timer = collector.start_timer();

        std::thread::sleep(Duration::from_millis(10));
        let duration = timer.elapsed();

        assert!(duration >= Duration::from_millis(10));

        let final_duration = timer.stop();
        assert!(final_duration >= Duration::from_millis(10));
    }
}
