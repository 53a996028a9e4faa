//! Source selection
//!
//! The upstream strategy is picked by configuration, never by branching
//! inside a source:
//!
//! ```json
//! { "source": { "kind": "yahoo", "base_url": "https://query1.finance.yahoo.com" },
//!   "cache_ttl_secs": 300 }
//! ```

use chrono::Duration;
use papertrade_ports::{Clock, QuoteResult, QuoteSource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::cache::{DEFAULT_TTL_SECS, MAX_TTL_SECS};
use crate::provider::QuoteProvider;
use crate::sources::{DEFAULT_YAHOO_URL, MockSource, MockSourceConfig, ProxySource, YahooSource};

/// Which upstream to read market data from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Offline random-walk generator
    Mock(MockSourceConfig),
    /// Third-party finance API
    Yahoo(HttpSourceConfig),
    /// Another instance of the proxy server
    Proxy(HttpSourceConfig),
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Mock(MockSourceConfig::default())
    }
}

impl SourceConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            SourceConfig::Mock(_) => "mock",
            SourceConfig::Yahoo(_) => "yahoo",
            SourceConfig::Proxy(_) => "proxy",
        }
    }

    /// Default configuration for a source kind, if the kind is known
    pub fn for_kind(kind: &str, base_url: Option<String>) -> Option<Self> {
        match kind {
            "mock" => Some(SourceConfig::Mock(MockSourceConfig::default())),
            "yahoo" => Some(SourceConfig::Yahoo(HttpSourceConfig::new(
                base_url.unwrap_or_else(|| DEFAULT_YAHOO_URL.to_string()),
            ))),
            "proxy" => base_url.map(|url| SourceConfig::Proxy(HttpSourceConfig::new(url))),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSourceConfig {
    pub base_url: String,
    /// Per-request timeout
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl HttpSourceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: default_timeout_ms(),
        }
    }

    fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }
}

/// Quote layer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteProviderConfig {
    #[serde(default)]
    pub source: SourceConfig,
    /// Freshness window for cached quotes, charts and searches, in
    /// `0..=MAX_TTL_SECS`
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: i64,
}

fn default_cache_ttl_secs() -> i64 {
    DEFAULT_TTL_SECS
}

impl Default for QuoteProviderConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl QuoteProviderConfig {
    /// Whether `cache_ttl_secs` lies within `0..=MAX_TTL_SECS`
    pub fn cache_ttl_in_range(&self) -> bool {
        (0..=MAX_TTL_SECS).contains(&self.cache_ttl_secs)
    }

    /// Build the configured source and wrap it in a caching provider
    ///
    /// An out-of-range TTL is clamped into `0..=MAX_TTL_SECS`.
    pub fn build(&self, clock: Arc<dyn Clock>) -> QuoteResult<QuoteProvider> {
        let source = build_source(&self.source, Arc::clone(&clock))?;
        let ttl_secs = self.cache_ttl_secs.clamp(0, MAX_TTL_SECS);
        if ttl_secs != self.cache_ttl_secs {
            log::warn!(
                "cache_ttl_secs {} out of range, using {}",
                self.cache_ttl_secs,
                ttl_secs
            );
        }
        log::info!("Quote source: {} (cache TTL {}s)", source.name(), ttl_secs);
        Ok(QuoteProvider::with_ttl(source, clock, Duration::seconds(ttl_secs)))
    }
}

/// Instantiate the source variant named by `config`
pub fn build_source(config: &SourceConfig, clock: Arc<dyn Clock>) -> QuoteResult<Arc<dyn QuoteSource>> {
    let source: Arc<dyn QuoteSource> = match config {
        SourceConfig::Mock(mock) => Arc::new(MockSource::new(mock.clone(), clock)),
        SourceConfig::Yahoo(http) => Arc::new(YahooSource::new(&http.base_url, http.timeout(), clock)?),
        SourceConfig::Proxy(http) => Arc::new(ProxySource::new(&http.base_url, http.timeout())?),
    };
    Ok(source)
}
