//! Configuration loading for the paper-trading server
//!
//! A JSON file supplies the defaults, environment variables override a few
//! deployment knobs on top:
//!
//! ```json
//! {
//!   "host": "127.0.0.1",
//!   "port": 5000,
//!   "seed_balance": 1000000,
//!   "poll_interval_secs": 15,
//!   "quotes": { "source": { "kind": "mock", "seed": 7 }, "cache_ttl_secs": 300 },
//!   "watchlist": ["RELIANCE", "TCS"]
//! }
//! ```

use papertrade_engine::DEFAULT_SEED_BALANCE;
use papertrade_quotes::{MAX_TTL_SECS, QuoteProviderConfig, SourceConfig};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Root configuration for the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Starting cash of the paper account
    #[serde(default = "default_seed_balance")]
    pub seed_balance: Decimal,

    /// Re-poll period for watched symbols
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Candle window used when `/api/stock` is called without a query
    #[serde(default = "default_interval")]
    pub default_interval: String,

    #[serde(default = "default_range")]
    pub default_range: String,

    /// Upstream source and cache
    #[serde(default)]
    pub quotes: QuoteProviderConfig,

    /// Symbols polled from startup
    #[serde(default)]
    pub watchlist: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_seed_balance() -> Decimal {
    Decimal::from(DEFAULT_SEED_BALANCE)
}

fn default_poll_interval_secs() -> u64 {
    15
}

fn default_interval() -> String {
    "5m".to_string()
}

fn default_range() -> String {
    "1d".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            seed_balance: default_seed_balance(),
            poll_interval_secs: default_poll_interval_secs(),
            default_interval: default_interval(),
            default_range: default_range(),
            quotes: QuoteProviderConfig::default(),
            watchlist: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply `HOST`, `PORT` and `QUOTE_SOURCE` (+ `QUOTE_SOURCE_URL`) from the process environment
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }

        if let Some(port) = lookup("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("PORT must be a port number, got {:?}", port)))?;
        }

        if let Some(kind) = lookup("QUOTE_SOURCE") {
            let kind = kind.trim().to_lowercase();
            let url = lookup("QUOTE_SOURCE_URL");
            self.quotes.source = SourceConfig::for_kind(&kind, url).ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "QUOTE_SOURCE {:?} is unknown or needs QUOTE_SOURCE_URL (expected mock, yahoo or proxy)",
                    kind
                ))
            })?;
        }

        Ok(())
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("host must not be empty".to_string()));
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid("poll_interval_secs must be at least 1".to_string()));
        }
        if !self.quotes.cache_ttl_in_range() {
            return Err(ConfigError::Invalid(format!(
                "cache_ttl_secs must be between 0 and {}, got {}",
                MAX_TTL_SECS, self.quotes.cache_ttl_secs
            )));
        }
        if self.seed_balance.is_sign_negative() {
            return Err(ConfigError::Invalid("seed_balance must not be negative".to_string()));
        }
        if self.default_interval.is_empty() || self.default_range.is_empty() {
            return Err(ConfigError::Invalid(
                "default_interval and default_range must not be empty".to_string(),
            ));
        }

        match &self.quotes.source {
            SourceConfig::Mock(mock) if mock.volatility < 0.0 => {
                Err(ConfigError::Invalid("mock volatility must not be negative".to_string()))
            }
            SourceConfig::Yahoo(http) | SourceConfig::Proxy(http)
                if !(http.base_url.starts_with("http://") || http.base_url.starts_with("https://")) =>
            {
                Err(ConfigError::Invalid(format!(
                    "source base_url must be an http(s) URL, got {:?}",
                    http.base_url
                )))
            }
            _ => Ok(()),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration errors
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
