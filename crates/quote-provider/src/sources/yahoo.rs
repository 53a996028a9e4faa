//! Yahoo Finance source
//!
//! One chart endpoint serves both quotes (from `meta`) and bars (parallel
//! `timestamp` / `indicators.quote` arrays, with nulls for missing values).
//! Errors arrive as `chart.error` in the body, usually with a 404 status.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use papertrade_core::{CandleRecord, Price, Quote, Symbol, SymbolSearch};
use papertrade_ports::{Clock, QuoteError, QuoteResult, QuoteSource};
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::http::{HttpClient, parse_json, segment};

pub const DEFAULT_YAHOO_URL: &str = "https://query1.finance.yahoo.com";

const SEARCH_RESULT_LIMIT: &str = "10";

pub struct YahooSource {
    http: HttpClient,
    clock: Arc<dyn Clock>,
}

impl YahooSource {
    pub fn new(base_url: &str, timeout: Duration, clock: Arc<dyn Clock>) -> QuoteResult<Self> {
        Ok(Self {
            http: HttpClient::new(base_url, timeout)?,
            clock,
        })
    }

    async fn chart(&self, symbol: &Symbol, interval: &str, range: &str) -> QuoteResult<ChartResult> {
        let path = format!("/v8/finance/chart/{}", segment(symbol.as_str()));
        let (status, body) = self
            .http
            .get_raw(&path, &[("interval", interval), ("range", range)])
            .await?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(QuoteError::RateLimited(format!("{} ({})", symbol, status)));
        }

        let envelope: ChartEnvelope = match parse_json(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(QuoteError::NetworkFailure(format!("HTTP {} for {}", status, symbol)));
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(error) = envelope.chart.error {
            return Err(map_chart_error(symbol, error));
        }
        if !status.is_success() {
            return Err(QuoteError::NetworkFailure(format!("HTTP {} for {}", status, symbol)));
        }

        envelope
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| QuoteError::SymbolNotFound(symbol.to_string()))
    }
}

fn map_chart_error(symbol: &Symbol, error: ChartError) -> QuoteError {
    let description = error.description.unwrap_or_default();
    match error.code.as_str() {
        "Not Found" => QuoteError::SymbolNotFound(symbol.to_string()),
        "Too Many Requests" => QuoteError::RateLimited(description),
        _ => QuoteError::NetworkFailure(format!("{}: {}", error.code, description)),
    }
}

#[async_trait]
impl QuoteSource for YahooSource {
    async fn get_latest_price(&self, symbol: &Symbol) -> QuoteResult<Quote> {
        let chart = self.chart(symbol, "1d", "1d").await?;
        let meta = chart.meta;

        let price = meta
            .regular_market_price
            .ok_or_else(|| QuoteError::SymbolNotFound(symbol.to_string()))?;
        let observed = meta
            .regular_market_time
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .unwrap_or_else(|| self.clock.now());
        let open = chart
            .indicators
            .quote
            .first()
            .and_then(|q| q.open.iter().flatten().next().copied());

        let mut quote = Quote::from_previous_close(
            symbol.clone(),
            price,
            meta.chart_previous_close.or(meta.previous_close),
            observed,
        )
        .with_range(open, meta.regular_market_day_high, meta.regular_market_day_low)
        .with_volume(meta.regular_market_volume);

        if let Some(name) = meta.long_name.or(meta.short_name) {
            quote = quote.with_name(name);
        }
        Ok(quote)
    }

    async fn get_historical_data(
        &self,
        symbol: &Symbol,
        interval: &str,
        range: &str,
    ) -> QuoteResult<Vec<CandleRecord>> {
        let chart = self.chart(symbol, interval, range).await?;
        let Some(series) = chart.indicators.quote.into_iter().next() else {
            return Ok(Vec::new());
        };

        let at = |values: &[Option<Price>], i: usize| values.get(i).copied().flatten();

        Ok(chart
            .timestamp
            .iter()
            .enumerate()
            .map(|(i, &time)| CandleRecord {
                time,
                open: at(series.open.as_slice(), i),
                high: at(series.high.as_slice(), i),
                low: at(series.low.as_slice(), i),
                close: at(series.close.as_slice(), i),
                volume: series.volume.get(i).copied().flatten(),
            })
            .collect())
    }

    async fn search_symbols(&self, keywords: &str) -> QuoteResult<Vec<SymbolSearch>> {
        let response: SearchResponse = self
            .http
            .get_json(
                "/v1/finance/search",
                &[
                    ("q", keywords),
                    ("quotesCount", SEARCH_RESULT_LIMIT),
                    ("newsCount", "0"),
                ],
            )
            .await?;

        Ok(response
            .quotes
            .into_iter()
            .map(|q| SymbolSearch {
                name: q
                    .long_name
                    .or(q.short_name)
                    .unwrap_or_else(|| q.symbol.clone()),
                symbol: q.symbol,
                exchange: q.exchange.unwrap_or_default(),
                instrument_type: q.quote_type.unwrap_or_default(),
            })
            .collect())
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

// Wire types

#[derive(Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<Price>,
    chart_previous_close: Option<Price>,
    previous_close: Option<Price>,
    regular_market_day_high: Option<Price>,
    regular_market_day_low: Option<Price>,
    regular_market_volume: Option<u64>,
    regular_market_time: Option<i64>,
    short_name: Option<String>,
    long_name: Option<String>,
}

#[derive(Deserialize, Default)]
struct Indicators {
    #[serde(default)]
    quote: Vec<IndicatorQuote>,
}

#[derive(Deserialize, Default)]
struct IndicatorQuote {
    #[serde(default)]
    open: Vec<Option<Price>>,
    #[serde(default)]
    high: Vec<Option<Price>>,
    #[serde(default)]
    low: Vec<Option<Price>>,
    #[serde(default)]
    close: Vec<Option<Price>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    quotes: Vec<SearchQuote>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchQuote {
    symbol: String,
    #[serde(rename = "shortname")]
    short_name: Option<String>,
    #[serde(rename = "longname")]
    long_name: Option<String>,
    exchange: Option<String>,
    quote_type: Option<String>,
}
