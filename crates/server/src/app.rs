//! Composition root
//!
//! Builds every service from a [`ServerConfig`] and wires them into the
//! router. Nothing here is global: tests construct as many apps as they like.

use axum::Router;
use papertrade_clock::SystemClock;
use papertrade_engine::OrderEngine;
use papertrade_ports::Clock;
use papertrade_quotes::{QuoteError, QuoteProvider};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::poller::QuotePoller;
use crate::rest::{AppState, create_router};

pub struct App {
    pub config: ServerConfig,
    pub state: Arc<AppState>,
}

impl App {
    /// Build the services on the system clock
    pub fn new(config: ServerConfig) -> Result<Self, QuoteError> {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    pub fn with_clock(config: ServerConfig, clock: Arc<dyn Clock>) -> Result<Self, QuoteError> {
        let quotes = Arc::new(config.quotes.build(Arc::clone(&clock))?);
        log::info!("Quotes from {} source, {} clock", quotes.source_name(), clock.name());
        let engine = Arc::new(OrderEngine::with_seed_balance(
            Arc::clone(&quotes),
            Arc::clone(&clock),
            config.seed_balance,
        ));
        let poller = Arc::new(QuotePoller::new(
            Arc::clone(&quotes),
            Arc::clone(&engine),
            Duration::from_secs(config.poll_interval_secs),
        ));

        let state = AppState::new(clock, quotes, engine, poller)
            .with_chart_window(&config.default_interval, &config.default_range);

        Ok(App {
            config,
            state: Arc::new(state),
        })
    }

    pub fn router(&self) -> Router {
        create_router(Arc::clone(&self.state))
    }

    /// Start polling the configured watch list
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_watchlist(&self) {
        for symbol in &self.config.watchlist {
            self.state.poller.watch(symbol);
        }
    }

    /// Serve until the listener fails
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = self.config.bind_addr();
        self.start_watchlist();

        let listener = TcpListener::bind(&addr).await?;
        log::info!("Listening on http://{}", listener.local_addr()?);
        axum::serve(listener, self.router()).await?;

        self.state.poller.shutdown();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use papertrade_clock::ManualClock;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_app_from_default_config() {
        let config = ServerConfig {
            seed_balance: dec!(5000),
            watchlist: vec!["reliance".to_string(), "TCS".to_string()],
            ..Default::default()
        };
        let app = App::with_clock(config, ManualClock::new(None)).unwrap();

        assert_eq!(app.state.engine.get_balance(), dec!(5000));
        assert_eq!(app.state.quotes.source_name(), "mock");

        app.start_watchlist();
        let watched: Vec<String> = app.state.poller.watched().iter().map(|s| s.to_string()).collect();
        assert_eq!(watched, vec!["RELIANCE.NS", "TCS.NS"]);
        app.state.poller.shutdown();
    }
}
