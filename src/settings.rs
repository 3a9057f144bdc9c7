//! Runtime settings for the oracle client and turn pacing.

use crate::orchestrator::Pacing;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Settings for the oracle connection and automated-turn pacing.
///
/// Every field has a default, so a partial (or absent) TOML file works.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the move-recommendation service.
    #[serde(default = "default_oracle_url")]
    oracle_url: String,

    /// Per-request latency budget, in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    request_timeout_ms: u64,

    /// Pause before the oracle is consulted, in milliseconds.
    #[serde(default = "default_thinking_delay_ms")]
    thinking_delay_ms: u64,

    /// Pause between consecutive automated moves, in milliseconds.
    #[serde(default = "default_inter_move_delay_ms")]
    inter_move_delay_ms: u64,
}

fn default_oracle_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_request_timeout_ms() -> u64 {
    3_000
}

fn default_thinking_delay_ms() -> u64 {
    1_000
}

fn default_inter_move_delay_ms() -> u64 {
    800
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            oracle_url: default_oracle_url(),
            request_timeout_ms: default_request_timeout_ms(),
            thinking_delay_ms: default_thinking_delay_ms(),
            inter_move_delay_ms: default_inter_move_delay_ms(),
        }
    }
}

impl Settings {
    /// Loads settings from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading settings from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read settings file: {}", e)))?;

        let settings: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse settings: {}", e)))?;

        info!(oracle_url = %settings.oracle_url, "Settings loaded successfully");
        Ok(settings)
    }

    /// Applies the `KALAH_ORACLE_URL` environment override, if set.
    pub fn resolve_env(mut self) -> Self {
        if let Ok(url) = std::env::var("KALAH_ORACLE_URL") {
            info!(oracle_url = %url, "Oracle URL overridden from environment");
            self.oracle_url = url;
        }
        self
    }

    /// Replaces the oracle URL (command-line override).
    pub fn with_oracle_url(mut self, url: String) -> Self {
        self.oracle_url = url;
        self
    }

    /// The per-request latency budget as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Turn pacing for the orchestrator.
    pub fn pacing(&self) -> Pacing {
        Pacing {
            thinking_delay: Duration::from_millis(self.thinking_delay_ms),
            inter_move_delay: Duration::from_millis(self.inter_move_delay_ms),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where the error occurred.
    pub line: u32,
    /// Source file where the error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
