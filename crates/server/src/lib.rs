//! Paper-Trading Server
//!
//! HTTP surface over the quote provider and the order engine:
//!
//! - **Quote proxy**: `/api/stock/{symbol}`, `/api/search/{query}` with the
//!   provider's 5 minute cache in front of the upstream
//! - **Paper account**: balance, positions, summary, order placement and
//!   cancellation
//! - **Watch list**: per-symbol pollers that feed quotes back to the engine
//!
//! ## Usage
//!
//! ```rust,ignore
//! use papertrade_server::{App, ServerConfig};
//!
//! let mut config = ServerConfig::from_file("papertrade.json")?;
//! config.apply_env()?;
//! config.validate()?;
//! App::new(config)?.run().await?;
//! ```

pub mod app;
pub mod config;
pub mod poller;
pub mod rest;

pub use app::App;
pub use config::{ConfigError, ServerConfig};
pub use poller::{DEFAULT_POLL_INTERVAL, QuotePoller};
