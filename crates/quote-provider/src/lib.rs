//! Paper-Trading Quote Provider
//!
//! Resolves user-entered symbols into normalized market data:
//!
//! ```text
//! caller ──► QuoteProvider ──► TtlCache (5 min, keyed by normalized symbol)
//!                 │                 miss
//!                 ▼
//!           dyn QuoteSource ──► mock | yahoo | proxy
//! ```
//!
//! Quote and history failures propagate to the caller; search degrades to an
//! empty result.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use papertrade_quotes::{QuoteProviderConfig};
//!
//! let provider = QuoteProviderConfig::default().build(clock)?;
//! let quote = provider.get_latest_price("reliance").await?; // RELIANCE.NS
//! ```

pub mod cache;
pub mod config;
pub mod provider;
pub mod sources;
pub mod wire;

// Re-export main types
pub use cache::{CacheEntry, DEFAULT_TTL_SECS, MAX_TTL_SECS, TtlCache};
pub use config::{HttpSourceConfig, QuoteProviderConfig, SourceConfig, build_source};
pub use provider::{MIN_SEARCH_LEN, QuoteProvider};
pub use sources::{MockSource, MockSourceConfig, ProxySource, YahooSource};
pub use papertrade_ports::{QuoteError, QuoteResult, QuoteSource};
