//! JSON contract of the proxy server
//!
//! `GET /api/stock/{symbol}` returns a [`StockResponse`], `GET
//! /api/search/{query}` an array of [`SymbolSearch`], and failures an
//! [`ErrorBody`]. Prices travel as JSON numbers.

use chrono::{DateTime, Utc};
use papertrade_core::{Candle, CandleRecord, Quote, Symbol};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use papertrade_core::SymbolSearch;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockResponse {
    pub symbol: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub change: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub change_percent: Decimal,
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub open: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub high: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub low: Option<Decimal>,
    #[serde(default)]
    pub volume: Option<u64>,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub chart_data: Vec<ChartPoint>,
}

impl StockResponse {
    pub fn new(quote: &Quote, candles: &[Candle]) -> Self {
        Self {
            symbol: quote.symbol.to_string(),
            name: quote.display_name().to_string(),
            price: quote.price,
            change: quote.change,
            change_percent: quote.change_percent,
            open: quote.open,
            high: quote.high,
            low: quote.low,
            volume: quote.volume,
            last_updated: quote.timestamp,
            chart_data: candles.iter().map(ChartPoint::from).collect(),
        }
    }

    /// Rebuild the normalized quote carried by this response
    pub fn to_quote(&self) -> Quote {
        Quote {
            symbol: Symbol::normalize(&self.symbol),
            name: Some(self.name.clone()),
            price: self.price,
            change: self.change,
            change_percent: self.change_percent,
            open: self.open,
            high: self.high,
            low: self.low,
            volume: self.volume,
            timestamp: self.last_updated,
        }
    }
}

/// One bar of `chartData`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub time: i64,
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub open: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub high: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub low: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub close: Option<Decimal>,
    #[serde(default)]
    pub volume: Option<u64>,
}

impl From<&Candle> for ChartPoint {
    fn from(c: &Candle) -> Self {
        Self {
            time: c.time,
            open: Some(c.open),
            high: Some(c.high),
            low: Some(c.low),
            close: Some(c.close),
            volume: c.volume,
        }
    }
}

impl From<ChartPoint> for CandleRecord {
    fn from(p: ChartPoint) -> Self {
        Self {
            time: p.time,
            open: p.open,
            high: p.high,
            low: p.low,
            close: p.close,
            volume: p.volume,
        }
    }
}

/// `{ "error": true, "message": "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: bool,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_stock_response_field_names() {
        let quote = Quote::from_previous_close(
            Symbol::normalize("reliance"),
            dec!(2450.5),
            Some(dec!(2400)),
            Utc::now(),
        );
        let candle = Candle {
            time: 1_700_000_000,
            open: dec!(2440),
            high: dec!(2455),
            low: dec!(2435),
            close: dec!(2450.5),
            volume: Some(1200),
        };

        let value = serde_json::to_value(StockResponse::new(&quote, &[candle])).unwrap();
        assert_eq!(value["symbol"], json!("RELIANCE.NS"));
        assert_eq!(value["name"], json!("RELIANCE.NS"));
        assert_eq!(value["price"], json!(2450.5));
        assert_eq!(value["changePercent"], json!(2.1));
        assert!(value.get("lastUpdated").is_some());
        assert_eq!(value["chartData"][0]["close"], json!(2450.5));
    }

    #[test]
    fn test_chart_point_tolerates_nulls() {
        let point: ChartPoint =
            serde_json::from_value(json!({"time": 60, "open": null, "close": 10.5})).unwrap();
        let record = CandleRecord::from(point);
        assert_eq!(record.close, Some(dec!(10.5)));
        assert!(record.complete().is_none());
    }
}
