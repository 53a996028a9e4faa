use thiserror::Error;

/// Failures resolving market data from an upstream source
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    /// Upstream has no such instrument (or returned no price for it)
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// Upstream quota exhausted
    #[error("Rate limited by upstream: {0}")]
    RateLimited(String),

    /// History query returned no usable bars
    #[error("No chart data available for {0}")]
    NoChartData(String),

    /// Transport-level failure reaching upstream
    #[error("Network failure: {0}")]
    NetworkFailure(String),
}

pub type QuoteResult<T> = std::result::Result<T, QuoteError>;
