//! Mock quote source
//!
//! Generates quotes and candles offline from a random walk around fixed base
//! prices for a small universe of Indian large caps. Listed on both NSE
//! (`.NS`) and BSE (`.BO`); anything else is reported as not found.

use async_trait::async_trait;
use papertrade_core::{CandleRecord, Price, Quote, Symbol, SymbolSearch};
use papertrade_ports::{Clock, QuoteError, QuoteResult, QuoteSource};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

struct MockListing {
    ticker: &'static str,
    name: &'static str,
    /// Previous close in paise
    base_paise: i64,
}

impl MockListing {
    fn base_price(&self) -> Price {
        Decimal::new(self.base_paise, 2)
    }
}

const UNIVERSE: &[MockListing] = &[
    MockListing { ticker: "RELIANCE", name: "Reliance Industries Ltd", base_paise: 245_000 },
    MockListing { ticker: "TCS", name: "Tata Consultancy Services Ltd", base_paise: 345_000 },
    MockListing { ticker: "INFY", name: "Infosys Ltd", base_paise: 148_000 },
    MockListing { ticker: "HDFCBANK", name: "HDFC Bank Ltd", base_paise: 162_000 },
    MockListing { ticker: "ICICIBANK", name: "ICICI Bank Ltd", base_paise: 94_500 },
    MockListing { ticker: "SBIN", name: "State Bank of India", base_paise: 61_000 },
    MockListing { ticker: "ITC", name: "ITC Ltd", base_paise: 44_000 },
    MockListing { ticker: "WIPRO", name: "Wipro Ltd", base_paise: 41_000 },
    MockListing { ticker: "HINDUNILVR", name: "Hindustan Unilever Ltd", base_paise: 255_000 },
    MockListing { ticker: "BHARTIARTL", name: "Bharti Airtel Ltd", base_paise: 88_000 },
    MockListing { ticker: "KOTAKBANK", name: "Kotak Mahindra Bank Ltd", base_paise: 178_000 },
    MockListing { ticker: "LT", name: "Larsen & Toubro Ltd", base_paise: 290_000 },
    MockListing { ticker: "TATAMOTORS", name: "Tata Motors Ltd", base_paise: 62_000 },
    MockListing { ticker: "MARUTI", name: "Maruti Suzuki India Ltd", base_paise: 980_000 },
];

const MAX_SEARCH_RESULTS: usize = 10;

/// Configuration for the mock source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockSourceConfig {
    /// Max relative move per step (e.g. 0.002 = 0.2%). Zero freezes prices.
    #[serde(default = "default_volatility")]
    pub volatility: f64,
    /// Seed for reproducible walks; entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Upper bound on generated bars per chart request
    #[serde(default = "default_max_bars")]
    pub max_bars: usize,
    /// Base price overrides keyed by symbol (normalized on lookup)
    #[serde(default)]
    pub prices: HashMap<String, Decimal>,
}

fn default_volatility() -> f64 {
    0.002
}

fn default_max_bars() -> usize {
    390
}

impl Default for MockSourceConfig {
    fn default() -> Self {
        Self {
            volatility: default_volatility(),
            seed: None,
            max_bars: default_max_bars(),
            prices: HashMap::new(),
        }
    }
}

impl MockSourceConfig {
    /// Frozen prices at their base values, for deterministic tests and demos
    pub fn fixed() -> Self {
        Self {
            volatility: 0.0,
            seed: Some(7),
            ..Default::default()
        }
    }
}

struct MockState {
    rng: StdRng,
    /// Last generated price per symbol
    last: HashMap<Symbol, Price>,
}

pub struct MockSource {
    config: MockSourceConfig,
    overrides: HashMap<Symbol, Price>,
    clock: Arc<dyn Clock>,
    state: Mutex<MockState>,
}

impl MockSource {
    pub fn new(config: MockSourceConfig, clock: Arc<dyn Clock>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let overrides = config
            .prices
            .iter()
            .map(|(symbol, price)| (Symbol::normalize(symbol), *price))
            .collect();

        Self {
            config,
            overrides,
            clock,
            state: Mutex::new(MockState {
                rng,
                last: HashMap::new(),
            }),
        }
    }

    /// Pin the walk for `symbol` to `price`; the next quote starts from it
    pub fn set_price(&self, symbol: &str, price: Price) {
        self.state.lock().last.insert(Symbol::normalize(symbol), price);
    }

    fn listing(&self, symbol: &Symbol) -> QuoteResult<&'static MockListing> {
        let listed_exchange = matches!(symbol.exchange_suffix(), Some("NS") | Some("BO"));
        UNIVERSE
            .iter()
            .find(|l| listed_exchange && l.ticker == symbol.base())
            .ok_or_else(|| QuoteError::SymbolNotFound(symbol.to_string()))
    }

    fn base_price(&self, symbol: &Symbol, listing: &MockListing) -> Price {
        self.overrides
            .get(symbol)
            .copied()
            .unwrap_or_else(|| listing.base_price())
    }
}

/// One random-walk step from `last`
fn walk(rng: &mut StdRng, last: Price, volatility: f64) -> Price {
    if volatility <= 0.0 {
        return last;
    }
    let shock: f64 = rng.gen_range(-1.0..1.0);
    let factor = Decimal::from_f64_retain(1.0 + volatility * shock).unwrap_or(Decimal::ONE);
    (last * factor).round_dp(2).max(Decimal::new(1, 2))
}

/// Widen `price` by up to half a volatility step in `direction` (+1 / -1)
fn wick(rng: &mut StdRng, price: Price, volatility: f64, direction: f64) -> Price {
    if volatility <= 0.0 {
        return price;
    }
    let reach: f64 = rng.gen_range(0.0..0.5);
    let factor = Decimal::from_f64_retain(1.0 + direction * volatility * reach).unwrap_or(Decimal::ONE);
    (price * factor).round_dp(2)
}

/// Bar width in seconds for an interval like `5m`, `1h`, `1d`
fn interval_secs(interval: &str) -> Option<i64> {
    match interval {
        "1m" => Some(60),
        "2m" => Some(120),
        "5m" => Some(300),
        "15m" => Some(900),
        "30m" => Some(1_800),
        "60m" | "1h" => Some(3_600),
        "1d" => Some(86_400),
        "1wk" => Some(604_800),
        "1mo" => Some(2_592_000),
        _ => None,
    }
}

/// Span in seconds for a range like `1d`, `5d`, `1mo`
fn range_secs(range: &str) -> Option<i64> {
    match range {
        "1d" => Some(86_400),
        "5d" => Some(5 * 86_400),
        "1mo" => Some(30 * 86_400),
        "3mo" => Some(90 * 86_400),
        "6mo" => Some(180 * 86_400),
        "1y" => Some(365 * 86_400),
        "2y" => Some(730 * 86_400),
        "5y" => Some(1_825 * 86_400),
        _ => None,
    }
}

#[async_trait]
impl QuoteSource for MockSource {
    async fn get_latest_price(&self, symbol: &Symbol) -> QuoteResult<Quote> {
        let listing = self.listing(symbol)?;
        let base = self.base_price(symbol, listing);
        let volatility = self.config.volatility;

        let mut state = self.state.lock();
        let last = state.last.get(symbol).copied().unwrap_or(base);
        let price = walk(&mut state.rng, last, volatility);
        let volume = state.rng.gen_range(100_000..5_000_000u64);
        state.last.insert(symbol.clone(), price);

        Ok(
            Quote::from_previous_close(symbol.clone(), price, Some(base), self.clock.now())
                .with_name(listing.name)
                .with_range(Some(base), Some(base.max(price)), Some(base.min(price)))
                .with_volume(Some(volume)),
        )
    }

    async fn get_historical_data(
        &self,
        symbol: &Symbol,
        interval: &str,
        range: &str,
    ) -> QuoteResult<Vec<CandleRecord>> {
        let listing = self.listing(symbol)?;
        let Some(step) = interval_secs(interval) else {
            log::debug!("Mock source has no bars for interval {:?}", interval);
            return Ok(Vec::new());
        };

        let max_bars = self.config.max_bars.max(1);
        let bars = range_secs(range)
            .map(|span| ((span / step).max(1) as usize).min(max_bars))
            .unwrap_or(max_bars);

        let end = self.clock.now().timestamp() / step * step;
        let start = end - (bars as i64 - 1) * step;
        let volatility = self.config.volatility;

        let mut state = self.state.lock();
        let mut close = self.base_price(symbol, listing);
        let mut records = Vec::with_capacity(bars);

        for i in 0..bars as i64 {
            let open = close;
            close = walk(&mut state.rng, open, volatility);
            let high = wick(&mut state.rng, open.max(close), volatility, 1.0);
            let low = wick(&mut state.rng, open.min(close), volatility, -1.0);
            let volume = state.rng.gen_range(1_000..250_000u64);

            records.push(CandleRecord {
                time: start + i * step,
                open: Some(open),
                high: Some(high),
                low: Some(low),
                close: Some(close),
                volume: Some(volume),
            });
        }

        Ok(records)
    }

    async fn search_symbols(&self, keywords: &str) -> QuoteResult<Vec<SymbolSearch>> {
        let needle = keywords.trim().to_uppercase();

        Ok(UNIVERSE
            .iter()
            .filter(|l| l.ticker.contains(&needle) || l.name.to_uppercase().contains(&needle))
            .take(MAX_SEARCH_RESULTS)
            .map(|l| SymbolSearch {
                symbol: format!("{}.NS", l.ticker),
                name: l.name.to_string(),
                exchange: "NSE".to_string(),
                instrument_type: "EQUITY".to_string(),
            })
            .collect())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
