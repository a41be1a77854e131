//! Scoreboard service binary
//!
//! Parses the command line, loads configuration, sets up tracing and runs the HTTP
//! service until SIGINT or SIGTERM arrives.

use anyhow::Result;
use clap::Parser;
use scoreboard::config::{validate_config, AppConfig};
use scoreboard::service::{AppState, HealthCheck, HealthStatus, ScoreboardService};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// Scoreboard - match recording and ELO ratings for casual games
#[derive(Parser, Debug)]
#[command(
    name = "scoreboard",
    version,
    about = "Records two-player matches and keeps ELO ratings",
    long_about = "Scoreboard is the backend of a Telegram Mini App: it accepts match results \
                 over HTTP, derives the winner from per-game scores, updates both players' \
                 ELO ratings atomically in SQLite, and keeps a full rating history."
)]
struct Args {
    /// TOML file to read instead of the environment
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Check the database, print a report and exit non-zero unless healthy
    #[arg(long)]
    health_check: bool,

    /// Tracing filter, e.g. `info` or `scoreboard=debug`
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// SQLite URL such as `sqlite://scoreboard.db` or `sqlite::memory:`
    #[arg(long, value_name = "URL")]
    database_url: Option<String>,

    /// Port for the match API and monitoring endpoints
    #[arg(long, value_name = "PORT")]
    http_port: Option<u16>,

    /// Shorthand for `--log-level debug`
    #[arg(short, long)]
    debug: bool,

    /// Validate the configuration, print the banner and exit
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    /// Read the base configuration and layer the command-line flags on top
    fn resolve_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::from_env()?,
        };

        if let Some(level) = &self.log_level {
            config.service.log_level = level.clone();
        }
        if self.debug {
            config.service.log_level = "debug".to_string();
        }
        if let Some(url) = &self.database_url {
            config.database.url = url.clone();
        }
        if let Some(port) = self.http_port {
            config.service.http_port = port;
        }

        validate_config(&config)?;
        Ok(config)
    }
}

/// Install the global tracing subscriber; `RUST_LOG` wins over the configured level
fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))
}

/// One-shot health report for container probes and operators
async fn run_health_check(config: AppConfig) -> Result<ExitCode> {
    info!("Running one-shot health check against {}", config.database.url);

    let state = Arc::new(AppState::new(config).await?);
    // No server loop runs here, so the process itself counts as up.
    state.set_running(true).await;

    let report = HealthCheck::check(state).await?;
    println!("Scoreboard health: {}", report.status);
    for component in &report.checks {
        match &component.message {
            Some(message) => println!(
                "  {:<10} {} ({}, {}ms)",
                component.name, component.status, message, component.duration_ms
            ),
            None => println!(
                "  {:<10} {} ({}ms)",
                component.name, component.status, component.duration_ms
            ),
        }
    }
    println!(
        "  players={} matches={} rating_changes={}",
        report.stats.players, report.stats.matches, report.stats.rating_history
    );

    Ok(if report.status == HealthStatus::Healthy {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Resolve once SIGINT or (on unix) SIGTERM is received
async fn shutdown_signal() {
    let interrupt = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("SIGINT received"),
            Err(e) => {
                error!("Cannot listen for SIGINT: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("SIGTERM received");
            }
            Err(e) => {
                error!("Cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {}
        _ = terminate => {}
    }
}

fn log_banner(config: &AppConfig) {
    info!("🏓 {} v{}", config.service.name, scoreboard::VERSION);
    info!(
        "   listening on {}:{} (log level {})",
        config.service.http_host, config.service.http_port, config.service.log_level
    );
    info!(
        "   database {} (pool of {}, busy timeout {}ms)",
        config.database.url, config.database.max_connections, config.database.busy_timeout_ms
    );
    info!(
        "   ELO K-factor {}, newcomers start at {}",
        config.rating.k_factor, config.rating.initial_rating
    );
    info!(
        "   up to {} attempts per match, {}ms apart",
        config.recorder.max_retry_attempts, config.recorder.retry_delay_ms
    );
}

async fn run(config: AppConfig) -> Result<()> {
    let state = Arc::new(AppState::new(config).await?);
    let mut service = ScoreboardService::new(state);
    service.start().await?;
    info!("✅ Accepting matches; Ctrl+C stops the service");

    shutdown_signal().await;

    info!("🛑 Draining in-flight requests...");
    if let Err(e) = service.shutdown().await {
        warn!("Shutdown finished with errors: {}", e);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match args.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(&config.service.log_level) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }
    if let Some(path) = &args.config {
        info!("Configuration read from {}", path.display());
    }

    if args.health_check {
        return run_health_check(config).await.unwrap_or_else(|e| {
            error!("Health check failed: {:#}", e);
            ExitCode::FAILURE
        });
    }

    log_banner(&config);
    if args.dry_run {
        info!("Configuration is valid; dry run, not starting");
        return ExitCode::SUCCESS;
    }

    match run(config).await {
        Ok(()) => {
            info!("Scoreboard stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Scoreboard failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
