//! Paper-Trading Ports
//!
//! Port definitions (traits) for the paper-trading simulator.
//! These define the boundaries between domain logic and infrastructure.

mod clock;
mod error;
mod quote_source;

pub use clock::Clock;
pub use error::{QuoteError, QuoteResult};
pub use quote_source::QuoteSource;
