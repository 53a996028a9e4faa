//! Client for the same-origin proxy server
//!
//! The proxy already normalizes and caches; this source only maps its JSON
//! contract and error bodies back onto the port.

use async_trait::async_trait;
use papertrade_core::{CandleRecord, Quote, Symbol, SymbolSearch};
use papertrade_ports::{QuoteError, QuoteResult, QuoteSource};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::http::{HttpClient, parse_json, segment};
use crate::wire::{ErrorBody, StockResponse};

pub struct ProxySource {
    http: HttpClient,
}

impl ProxySource {
    pub fn new(base_url: &str, timeout: Duration) -> QuoteResult<Self> {
        Ok(Self {
            http: HttpClient::new(base_url, timeout)?,
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        subject: &str,
    ) -> QuoteResult<T> {
        let (status, body) = self.http.get_raw(path, query).await?;

        if status.is_success() {
            return Ok(parse_json(&body)?);
        }

        let message = parse_json::<ErrorBody>(&body)
            .map(|e| e.message)
            .unwrap_or_else(|_| format!("HTTP {}", status));
        Err(map_status(status, subject, message))
    }
}

fn map_status(status: StatusCode, subject: &str, message: String) -> QuoteError {
    match status {
        StatusCode::NOT_FOUND => QuoteError::SymbolNotFound(subject.to_string()),
        StatusCode::TOO_MANY_REQUESTS => QuoteError::RateLimited(message),
        StatusCode::UNPROCESSABLE_ENTITY => QuoteError::NoChartData(subject.to_string()),
        _ => QuoteError::NetworkFailure(message),
    }
}

#[async_trait]
impl QuoteSource for ProxySource {
    async fn get_latest_price(&self, symbol: &Symbol) -> QuoteResult<Quote> {
        let path = format!("/api/stock/{}", segment(symbol.as_str()));
        let stock: StockResponse = self.get(&path, &[], symbol.as_str()).await?;
        Ok(stock.to_quote())
    }

    async fn get_historical_data(
        &self,
        symbol: &Symbol,
        interval: &str,
        range: &str,
    ) -> QuoteResult<Vec<CandleRecord>> {
        let path = format!("/api/stock/{}", segment(symbol.as_str()));
        let stock: StockResponse = self
            .get(&path, &[("interval", interval), ("range", range)], symbol.as_str())
            .await?;
        Ok(stock.chart_data.into_iter().map(CandleRecord::from).collect())
    }

    async fn search_symbols(&self, keywords: &str) -> QuoteResult<Vec<SymbolSearch>> {
        let path = format!("/api/search/{}", segment(keywords));
        self.get(&path, &[], keywords).await
    }

    fn name(&self) -> &str {
        "proxy"
    }
}
