//! # Client Configuration Module
//!
//! Loads the settings the Midway client needs from environment variables, with
//! defaults for local development.
//!
//! ## Environment Variables
//!
//! - `MIDWAY_API_URL`: Base URL of the event API (default: "http://localhost:8000")
//! - `MIDWAY_WEB_URL`: Base URL of the web app, used for share links (default: "http://localhost:3000")
//! - `MIDWAY_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `MIDWAY_SEARCH_DEBOUNCE_MS`: Quiet period before a location lookup (default: 300)
//! - `MIDWAY_STATE_PATH`: File remembering which events this device joined (optional)
//! - `LOG_LEVEL`: Logging level (default: "info")

use eyre::{Result, WrapErr};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// Configuration for the Midway client.
///
/// # Example
///
/// ```
/// use midway_client::config::ClientConfig;
///
/// let config = ClientConfig::default();
/// assert_eq!(config.event_url("a1b2c3d4"), "http://localhost:3000/e/a1b2c3d4");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the event API
    pub api_url: String,

    /// Base URL of the web app that share links point at
    pub web_url: String,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Debounce for location search in milliseconds
    pub search_debounce_ms: u64,

    /// Where the joined-events file lives; `None` keeps it in memory
    pub state_path: Option<PathBuf>,

    /// Log level for the application
    pub log_level: Level,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            web_url: "http://localhost:3000".to_string(),
            request_timeout: 30,
            search_debounce_ms: 300,
            state_path: None,
            log_level: Level::INFO,
        }
    }
}

impl ClientConfig {
    /// Creates a ClientConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if a numeric setting is present but
    /// cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let api_url = env::var("MIDWAY_API_URL").unwrap_or(defaults.api_url);
        let web_url = env::var("MIDWAY_WEB_URL").unwrap_or(defaults.web_url);

        let request_timeout = match env::var("MIDWAY_REQUEST_TIMEOUT_SECONDS") {
            Ok(value) => value
                .parse()
                .wrap_err("Invalid MIDWAY_REQUEST_TIMEOUT_SECONDS value")?,
            Err(_) => defaults.request_timeout,
        };
        let search_debounce_ms = match env::var("MIDWAY_SEARCH_DEBOUNCE_MS") {
            Ok(value) => value
                .parse()
                .wrap_err("Invalid MIDWAY_SEARCH_DEBOUNCE_MS value")?,
            Err(_) => defaults.search_debounce_ms,
        };

        let state_path = env::var("MIDWAY_STATE_PATH").ok().map(PathBuf::from);

        let log_level =
            parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        Ok(Self {
            api_url,
            web_url,
            request_timeout,
            search_debounce_ms,
            state_path,
            log_level,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Link participants open to join an event
    pub fn event_url(&self, slug: &str) -> String {
        format!("{}/e/{}", self.web_url.trim_end_matches('/'), slug)
    }

    /// Link to an event's results page
    pub fn results_url(&self, slug: &str) -> String {
        format!("{}/results", self.event_url(slug))
    }
}

fn parse_log_level(value: &str) -> Level {
    match value {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
