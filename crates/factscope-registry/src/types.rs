//! Configuration types for the remote clients.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{RegistryError, RegistryResult};

/// Fixed retry schedule: up to `attempts` tries, `delay` apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn fixed(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    /// A single attempt.
    pub fn none() -> Self {
        Self::fixed(1, Duration::ZERO)
    }
}

/// Explorer client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Arweave gateway serving archive bundles.
    #[serde(default = "default_arweave_url")]
    pub arweave_url: String,

    /// Record store base URL.
    #[serde(default = "default_db_host")]
    pub db_host: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Roster fetch attempts, including the first.
    #[serde(default = "default_roster_attempts")]
    pub roster_attempts: u32,

    /// Flat delay between roster attempts.
    #[serde(default = "default_roster_retry_delay_ms")]
    pub roster_retry_delay_ms: u64,
}

fn default_arweave_url() -> String {
    "https://arweave.net".to_string()
}

fn default_db_host() -> String {
    "http://127.0.0.1:8090".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_roster_attempts() -> u32 {
    2
}

fn default_roster_retry_delay_ms() -> u64 {
    1000
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            arweave_url: default_arweave_url(),
            db_host: default_db_host(),
            timeout_secs: default_timeout(),
            roster_attempts: default_roster_attempts(),
            roster_retry_delay_ms: default_roster_retry_delay_ms(),
        }
    }
}

impl ExplorerConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `FACTSCOPE_ARWEAVE_URL` | Arweave gateway URL |
    /// | `FACTSCOPE_DB_HOST` | Record store URL |
    /// | `FACTSCOPE_HTTP_TIMEOUT` | Request timeout in seconds |
    /// | `FACTSCOPE_ROSTER_ATTEMPTS` | Roster fetch attempts |
    /// | `FACTSCOPE_ROSTER_RETRY_DELAY_MS` | Delay between roster attempts |
    ///
    /// Unparseable numbers fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            arweave_url: std::env::var("FACTSCOPE_ARWEAVE_URL")
                .unwrap_or_else(|_| default_arweave_url()),
            db_host: std::env::var("FACTSCOPE_DB_HOST").unwrap_or_else(|_| default_db_host()),
            timeout_secs: std::env::var("FACTSCOPE_HTTP_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_timeout),
            roster_attempts: std::env::var("FACTSCOPE_ROSTER_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_roster_attempts),
            roster_retry_delay_ms: std::env::var("FACTSCOPE_ROSTER_RETRY_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_roster_retry_delay_ms),
        }
    }

    /// Set the Arweave gateway URL.
    pub fn with_arweave_url(mut self, url: impl Into<String>) -> Self {
        self.arweave_url = url.into();
        self
    }

    /// Set the record store URL.
    pub fn with_db_host(mut self, url: impl Into<String>) -> Self {
        self.db_host = url.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_roster_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.roster_attempts = attempts;
        self.roster_retry_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn roster_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(
            self.roster_attempts,
            Duration::from_millis(self.roster_retry_delay_ms),
        )
    }

    /// Check URLs parse and the retry policy makes at least one attempt.
    pub fn validate(&self) -> RegistryResult<()> {
        for (name, value) in [("arweave_url", &self.arweave_url), ("db_host", &self.db_host)] {
            let parsed = url::Url::parse(value).map_err(|e| RegistryError::Config {
                message: format!("{} {:?} is not a valid URL: {}", name, value, e),
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(RegistryError::Config {
                    message: format!("{} {:?} must be http or https", name, value),
                });
            }
        }
        if self.roster_attempts == 0 {
            return Err(RegistryError::Config {
                message: "roster_attempts must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
