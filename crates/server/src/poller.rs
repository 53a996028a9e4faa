//! Watch-list quote poller
//!
//! One tokio task per watched symbol: fetch the latest quote every period
//! (first tick immediately) and feed it to the engine, which fills marketable
//! limit orders and marks the position. Failed polls are logged and the loop
//! carries on.

use papertrade_core::Symbol;
use papertrade_engine::OrderEngine;
use papertrade_quotes::QuoteProvider;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);

pub struct QuotePoller {
    quotes: Arc<QuoteProvider>,
    engine: Arc<OrderEngine>,
    period: Duration,
    tasks: Mutex<HashMap<Symbol, JoinHandle<()>>>,
}

impl QuotePoller {
    pub fn new(quotes: Arc<QuoteProvider>, engine: Arc<OrderEngine>, period: Duration) -> Self {
        Self {
            quotes,
            engine,
            period,
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Start polling `symbol`, replacing any existing task for it
    ///
    /// Must be called from within a tokio runtime.
    pub fn watch(&self, symbol: &str) -> Symbol {
        let symbol = Symbol::normalize(symbol);
        let task = tokio::spawn(poll_loop(
            symbol.clone(),
            Arc::clone(&self.quotes),
            Arc::clone(&self.engine),
            self.period,
        ));

        if let Some(previous) = self.tasks.lock().insert(symbol.clone(), task) {
            previous.abort();
        }
        log::info!("Watching {} every {:?}", symbol, self.period);
        symbol
    }

    /// Stop polling `symbol`. Returns false if it was not watched.
    pub fn unwatch(&self, symbol: &str) -> bool {
        let symbol = Symbol::normalize(symbol);
        match self.tasks.lock().remove(&symbol) {
            Some(task) => {
                task.abort();
                log::info!("Stopped watching {}", symbol);
                true
            }
            None => false,
        }
    }

    /// Watched symbols, sorted
    pub fn watched(&self) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = self.tasks.lock().keys().cloned().collect();
        symbols.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        symbols
    }

    /// Abort every polling task
    pub fn shutdown(&self) {
        for (_, task) in self.tasks.lock().drain() {
            task.abort();
        }
    }
}

impl Drop for QuotePoller {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn poll_loop(symbol: Symbol, quotes: Arc<QuoteProvider>, engine: Arc<OrderEngine>, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match quotes.get_latest_price(symbol.as_str()).await {
            Ok(quote) => {
                let filled = engine.apply_quote(&quote);
                if !filled.is_empty() {
                    log::info!("{} limit order(s) filled on {} @ {}", filled.len(), symbol, quote.price);
                }
            }
            Err(e) => log::warn!("Poll of {} failed: {}", symbol, e),
        }
    }
}
