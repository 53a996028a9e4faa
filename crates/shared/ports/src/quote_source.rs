use async_trait::async_trait;
use papertrade_core::{CandleRecord, Quote, Symbol, SymbolSearch};

use crate::error::QuoteResult;

/// Port for upstream market data
///
/// Implementations:
/// - Mock random-walk generator (offline / demo)
/// - Third-party finance API
/// - Same-origin proxy server
///
/// Sources receive already-normalized symbols and only translate their wire
/// format; caching, bar filtering and ordering belong to the caller.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Latest quote for `symbol`
    async fn get_latest_price(&self, symbol: &Symbol) -> QuoteResult<Quote>;

    /// Raw bars for `symbol` at `interval` (e.g. `5m`) covering `range` (e.g. `1d`)
    async fn get_historical_data(
        &self,
        symbol: &Symbol,
        interval: &str,
        range: &str,
    ) -> QuoteResult<Vec<CandleRecord>>;

    /// Free-text instrument search
    async fn search_symbols(&self, keywords: &str) -> QuoteResult<Vec<SymbolSearch>>;

    /// Get the name of the source
    fn name(&self) -> &str;
}
