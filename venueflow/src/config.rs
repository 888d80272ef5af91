//! Configuration for the dashboard.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use venueflow_gemini::{DEFAULT_API_URL, DEFAULT_MODEL, GeminiClient};

/// Default backend base URL
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3001";

/// Default seconds the dashboard waits for an operation to finish
pub const DEFAULT_RESPONSE_WAIT_SECS: u64 = 30;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Booking backend configuration
    pub backend: BackendConfig,
    /// Generative assist configuration
    pub gemini: GeminiConfig,
}

/// Booking backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the REST API
    pub url: String,
    /// How long the dashboard waits for an operation's outcome, in seconds
    pub response_wait_secs: u64,
}

impl BackendConfig {
    /// Wait as a duration
    #[must_use]
    pub const fn response_wait(&self) -> Duration {
        Duration::from_secs(self.response_wait_secs)
    }
}

/// Generative assist configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key; assist is disabled without one
    pub api_key: Option<String>,
    /// API base URL
    pub api_url: String,
    /// Model name
    pub model: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiConfig {
    /// Client for this configuration, if a key is set
    #[must_use]
    pub fn client(&self) -> Option<GeminiClient> {
        self.api_key.as_ref().map(|key| {
            GeminiClient::new(key.clone())
                .with_base_url(&self.api_url)
                .with_model(&self.model)
        })
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// - `VENUEFLOW_API_URL` (default `http://localhost:3001`)
    /// - `VENUEFLOW_RESPONSE_WAIT_SECS` (default 30)
    /// - `GEMINI_API_KEY` (optional)
    /// - `GEMINI_API_URL`, `GEMINI_MODEL`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, applying the same defaults as [`Config::from_env`]
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            backend: BackendConfig {
                url: lookup("VENUEFLOW_API_URL").unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
                response_wait_secs: lookup("VENUEFLOW_RESPONSE_WAIT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_RESPONSE_WAIT_SECS),
            },
            gemini: GeminiConfig {
                api_key: lookup("GEMINI_API_KEY").filter(|key| !key.trim().is_empty()),
                api_url: lookup("GEMINI_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            },
        }
    }
}
