use axum::{
    Router,
    routing::{delete, get, post},
};
use papertrade_engine::OrderEngine;
use papertrade_ports::Clock;
use papertrade_quotes::QuoteProvider;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use super::handlers;
use crate::poller::QuotePoller;

/// Application state shared across handlers
pub struct AppState {
    pub clock: Arc<dyn Clock>,
    pub quotes: Arc<QuoteProvider>,
    pub engine: Arc<OrderEngine>,
    pub poller: Arc<QuotePoller>,
    /// Candle window for `/api/stock` requests that do not name one
    pub default_interval: String,
    pub default_range: String,
}

impl AppState {
    pub fn new(
        clock: Arc<dyn Clock>,
        quotes: Arc<QuoteProvider>,
        engine: Arc<OrderEngine>,
        poller: Arc<QuotePoller>,
    ) -> Self {
        AppState {
            clock,
            quotes,
            engine,
            poller,
            default_interval: "5m".to_string(),
            default_range: "1d".to_string(),
        }
    }

    pub fn with_chart_window(mut self, interval: impl Into<String>, range: impl Into<String>) -> Self {
        self.default_interval = interval.into();
        self.default_range = range.into();
        self
    }
}

/// Create the REST API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Quote proxy
        .route("/api/health", get(handlers::health))
        .route("/api/stock/{symbol}", get(handlers::stock))
        .route("/api/search/{query}", get(handlers::search))
        // Paper account
        .route("/api/balance", get(handlers::balance))
        .route("/api/positions", get(handlers::positions))
        .route("/api/summary", get(handlers::summary))
        .route("/api/orders", get(handlers::list_orders).post(handlers::place_order))
        .route("/api/orders/{id}", delete(handlers::cancel_order))
        // Watch list
        .route("/api/watch", get(handlers::list_watched))
        .route("/api/watch/{symbol}", post(handlers::watch).delete(handlers::unwatch))
        // Middleware
        .layer(CorsLayer::permissive())
        .with_state(state)
}
