//! Paper-Trading Core Domain
//!
//! Pure domain types shared by the quote layer and the order engine.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod market;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{Order, OrderId, OrderStatus, OrderType, Position, Side};
pub use market::{Candle, CandleRecord, Quote, SymbolSearch};
pub use values::{DEFAULT_MARKET_SUFFIX, Price, Quantity, Symbol, Timestamp};
