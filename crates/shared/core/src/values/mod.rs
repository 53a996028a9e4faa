use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

mod symbol;

pub use symbol::{DEFAULT_MARKET_SUFFIX, Symbol};

/// Price value - uses Decimal for precision
pub type Price = Decimal;

/// Order and position size in whole shares
pub type Quantity = u64;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;
