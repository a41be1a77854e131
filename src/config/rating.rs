//! Rating system configuration

use crate::error::ScoreboardError;
use crate::types::DEFAULT_RATING;
use serde::{Deserialize, Serialize};

/// K-factor used when none is configured
pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// ELO parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Sensitivity of a single match result
    pub k_factor: f64,
    /// Rating for players seen for the first time
    pub initial_rating: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            k_factor: DEFAULT_K_FACTOR,
            initial_rating: DEFAULT_RATING,
        }
    }
}

impl RatingConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.k_factor.is_finite() || self.k_factor <= 0.0 {
            return Err(ScoreboardError::ConfigurationError {
                message: format!("K-factor must be a positive number, got {}", self.k_factor),
            }
            .into());
        }

        if !self.initial_rating.is_finite() {
            return Err(ScoreboardError::ConfigurationError {
                message: format!(
                    "Initial rating must be a finite number, got {}",
                    self.initial_rating
                ),
            }
            .into());
        }

        Ok(())
    }
}
