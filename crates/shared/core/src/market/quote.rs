use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::values::{Price, Symbol, Timestamp};

/// Point-in-time price snapshot for one instrument
///
/// Quotes are never mutated; the next fetch produces a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: Symbol,
    /// Display name when the source provides one
    pub name: Option<String>,
    pub price: Price,
    /// Absolute change against the previous close
    pub change: Decimal,
    /// Percent change against the previous close
    pub change_percent: Decimal,
    pub open: Option<Price>,
    pub high: Option<Price>,
    pub low: Option<Price>,
    pub volume: Option<u64>,
    /// When the price was observed
    pub timestamp: Timestamp,
}

impl Quote {
    /// Build a quote whose change fields are derived from the previous close
    ///
    /// Without a usable previous close the change is reported as zero.
    pub fn from_previous_close(
        symbol: Symbol,
        price: Price,
        previous_close: Option<Price>,
        timestamp: Timestamp,
    ) -> Self {
        let (change, change_percent) = match previous_close {
            Some(prev) if !prev.is_zero() => {
                let change = price - prev;
                (change, (change / prev * Decimal::ONE_HUNDRED).round_dp(2))
            }
            _ => (Decimal::ZERO, Decimal::ZERO),
        };

        Self {
            symbol,
            name: None,
            price,
            change,
            change_percent,
            open: None,
            high: None,
            low: None,
            volume: None,
            timestamp,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_range(mut self, open: Option<Price>, high: Option<Price>, low: Option<Price>) -> Self {
        self.open = open;
        self.high = high;
        self.low = low;
        self
    }

    pub fn with_volume(mut self, volume: Option<u64>) -> Self {
        self.volume = volume;
        self
    }

    /// Name to display, falling back to the symbol
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.symbol.as_str())
    }
}
