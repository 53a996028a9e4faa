//! Upstream quote sources
//!
//! Each variant implements [`papertrade_ports::QuoteSource`] and is chosen by
//! configuration (see [`crate::config::SourceConfig`]).

mod http;
mod mock;
mod proxy;
mod yahoo;

pub use http::{HttpClient, HttpError};
pub use mock::{MockSource, MockSourceConfig};
pub use proxy::ProxySource;
pub use yahoo::{DEFAULT_YAHOO_URL, YahooSource};
