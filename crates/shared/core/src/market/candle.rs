use serde::{Deserialize, Serialize};

use crate::values::Price;

/// One OHLC bar
///
/// `time` is Unix seconds. Within a series candles are ascending by time and
/// no two share a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Option<u64>,
}

impl Candle {
    /// Sort ascending by time and keep the last bar seen for each timestamp
    pub fn into_series(candles: impl IntoIterator<Item = Candle>) -> Vec<Candle> {
        let mut series: Vec<Candle> = candles.into_iter().collect();
        // Stable sort keeps arrival order within a timestamp
        series.sort_by_key(|c| c.time);

        let mut deduped: Vec<Candle> = Vec::with_capacity(series.len());
        for candle in series {
            match deduped.last_mut() {
                Some(last) if last.time == candle.time => *last = candle,
                _ => deduped.push(candle),
            }
        }
        deduped
    }
}

/// A bar as delivered by an upstream source, where any field may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandleRecord {
    pub time: i64,
    pub open: Option<Price>,
    pub high: Option<Price>,
    pub low: Option<Price>,
    pub close: Option<Price>,
    pub volume: Option<u64>,
}

impl CandleRecord {
    /// Convert into a `Candle`; `None` if any of open/high/low/close is missing
    pub fn complete(self) -> Option<Candle> {
        Some(Candle {
            time: self.time,
            open: self.open?,
            high: self.high?,
            low: self.low?,
            close: self.close?,
            volume: self.volume,
        })
    }
}

impl From<Candle> for CandleRecord {
    fn from(c: Candle) -> Self {
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
