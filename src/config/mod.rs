//! Configuration management for the scoreboard service
//!
//! This module handles configuration loading from environment variables and TOML
//! files, validation, and default values.

pub mod app;
pub mod rating;
pub mod recorder;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, DatabaseSettings, ServiceSettings};
pub use rating::RatingConfig;
pub use recorder::RecorderConfig;
