//! Normalized market data shapes
//!
//! Every quote source maps its own wire format onto these types, so callers
//! never see provider-specific field names.

mod candle;
mod quote;
mod search;

pub use candle::{Candle, CandleRecord};
pub use quote::Quote;
pub use search::SymbolSearch;
