//! Quote Provider
//!
//! Cache-then-fetch facade over a [`QuoteSource`]. Callers pass raw user
//! input; the provider normalizes symbols, filters and orders candle series,
//! and keeps upstream call volume bounded with a short-TTL cache.

use chrono::Duration;
use papertrade_core::{Candle, Quote, Symbol, SymbolSearch};
use papertrade_ports::{Clock, QuoteError, QuoteResult, QuoteSource};
use std::sync::Arc;

use crate::cache::{DEFAULT_TTL_SECS, TtlCache};

/// Queries shorter than this (in characters, after trimming) never reach upstream
pub const MIN_SEARCH_LEN: usize = 2;

pub struct QuoteProvider {
    source: Arc<dyn QuoteSource>,
    quotes: TtlCache<Symbol, Quote>,
    charts: TtlCache<ChartKey, Vec<Candle>>,
    searches: TtlCache<String, Vec<SymbolSearch>>,
}

/// Cache key for a candle series
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ChartKey {
    symbol: Symbol,
    interval: String,
    range: String,
}

impl QuoteProvider {
    /// Create a provider with the default 5 minute TTL
    pub fn new(source: Arc<dyn QuoteSource>, clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(source, clock, Duration::seconds(DEFAULT_TTL_SECS))
    }

    pub fn with_ttl(source: Arc<dyn QuoteSource>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            source,
            quotes: TtlCache::new(ttl, Arc::clone(&clock)),
            charts: TtlCache::new(ttl, Arc::clone(&clock)),
            searches: TtlCache::new(ttl, clock),
        }
    }

    /// Name of the upstream source in use
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Freshness window shared by the quote, chart and search caches
    pub fn cache_ttl(&self) -> Duration {
        self.quotes.ttl()
    }

    /// Latest quote for `symbol`, served from cache while fresh
    pub async fn get_latest_price(&self, symbol: &str) -> QuoteResult<Quote> {
        let symbol = Symbol::normalize(symbol);

        if let Some(quote) = self.quotes.get(&symbol) {
            log::debug!("Quote cache hit for {}", symbol);
            return Ok(quote);
        }

        log::debug!("Fetching quote for {} from {}", symbol, self.source.name());
        let quote = self.source.get_latest_price(&symbol).await.inspect_err(|e| {
            log::warn!("Quote fetch for {} failed: {}", symbol, e);
        })?;

        self.quotes.insert(symbol, quote.clone());
        Ok(quote)
    }

    /// Ascending candle series for `symbol`
    ///
    /// Bars missing any of open/high/low/close are dropped. An empty result
    /// is an error, never an empty success.
    pub async fn get_historical_data(
        &self,
        symbol: &str,
        interval: &str,
        range: &str,
    ) -> QuoteResult<Vec<Candle>> {
        let key = ChartKey {
            symbol: Symbol::normalize(symbol),
            interval: interval.to_string(),
            range: range.to_string(),
        };

        if let Some(candles) = self.charts.get(&key) {
            log::debug!("Chart cache hit for {} {}/{}", key.symbol, interval, range);
            return Ok(candles);
        }

        let records = self
            .source
            .get_historical_data(&key.symbol, interval, range)
            .await?;
        let received = records.len();

        let candles = Candle::into_series(records.into_iter().filter_map(|r| r.complete()));
        if candles.is_empty() {
            log::warn!(
                "No usable bars for {} {}/{} ({} records received)",
                key.symbol,
                interval,
                range,
                received
            );
            return Err(QuoteError::NoChartData(key.symbol.to_string()));
        }

        if candles.len() < received {
            log::debug!(
                "Dropped {} incomplete bars for {}",
                received - candles.len(),
                key.symbol
            );
        }

        self.charts.insert(key, candles.clone());
        Ok(candles)
    }

    /// Advisory instrument search
    ///
    /// Never fails: short queries and upstream errors both yield an empty list.
    pub async fn search_symbols(&self, keywords: &str) -> Vec<SymbolSearch> {
        if keywords.trim().chars().count() < MIN_SEARCH_LEN {
            return Vec::new();
        }

        let key = keywords.to_string();
        if let Some(results) = self.searches.get(&key) {
            return results;
        }

        match self.source.search_symbols(keywords.trim()).await {
            Ok(results) => {
                self.searches.insert(key, results.clone());
                results
            }
            Err(e) => {
                log::warn!("Symbol search for {:?} failed: {}", keywords, e);
                Vec::new()
            }
        }
    }

    /// Drop expired entries from every cache, returning the count removed
    pub fn purge_expired(&self) -> usize {
        self.quotes.purge_expired() + self.charts.purge_expired() + self.searches.purge_expired()
    }

    pub fn clear_cache(&self) {
        self.quotes.clear();
        self.charts.clear();
        self.searches.clear();
    }
}
