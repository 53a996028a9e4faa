use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use papertrade_engine::OrderIntent;
use papertrade_ports::Clock;
use papertrade_quotes::QuoteError;
use std::sync::Arc;
use uuid::Uuid;

use super::dto::*;
use super::{ApiError, AppState};

/// GET /api/health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        source: state.quotes.source_name().to_string(),
        cache_ttl_secs: state.quotes.cache_ttl().num_seconds(),
        timestamp: state.clock.now(),
    })
}

/// GET /api/stock/{symbol}?interval=5m&range=1d
///
/// A quote with its candle series. A window with no usable bars still
/// returns the quote, with empty `chartData`.
pub async fn stock(
    Path(symbol): Path<String>,
    Query(query): Query<StockQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<StockResponse>, ApiError> {
    let interval = query.interval.as_deref().unwrap_or(&state.default_interval);
    let range = query.range.as_deref().unwrap_or(&state.default_range);

    let quote = state.quotes.get_latest_price(&symbol).await?;

    let candles = match state.quotes.get_historical_data(&symbol, interval, range).await {
        Ok(candles) => candles,
        Err(QuoteError::NoChartData(_)) => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    Ok(Json(StockResponse::new(&quote, &candles)))
}

/// GET /api/search/{query}
pub async fn search(Path(query): Path<String>, State(state): State<Arc<AppState>>) -> Json<Vec<SymbolSearch>> {
    Json(state.quotes.search_symbols(&query).await)
}

/// GET /api/balance
pub async fn balance(State(state): State<Arc<AppState>>) -> Json<BalanceResponse> {
    Json(BalanceResponse {
        balance: state.engine.get_balance(),
    })
}

/// GET /api/positions
pub async fn positions(State(state): State<Arc<AppState>>) -> Json<Vec<PositionResponse>> {
    let mut positions = state.engine.get_positions();
    positions.sort_by(|a, b| a.symbol.as_str().cmp(b.symbol.as_str()));
    Json(positions.iter().map(PositionResponse::from).collect())
}

/// GET /api/summary
pub async fn summary(State(state): State<Arc<AppState>>) -> Json<SummaryResponse> {
    Json(state.engine.summary().into())
}

/// GET /api/orders
pub async fn list_orders(State(state): State<Arc<AppState>>) -> Json<Vec<OrderResponse>> {
    Json(state.engine.get_orders().iter().map(OrderResponse::from).collect())
}

/// POST /api/orders
pub async fn place_order(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let Json(req) = payload?;

    let intent = OrderIntent {
        symbol: req.symbol,
        side: req.side,
        order_type: req.order_type,
        quantity: req.quantity,
    };
    let order = state.engine.place_order(&intent, req.limit_price).await?;

    Ok((StatusCode::CREATED, Json(OrderResponse::from(&order))))
}

/// DELETE /api/orders/{id}
pub async fn cancel_order(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<OrderResponse>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::invalid_parameter("id", "not an order id"))?;
    let order = state.engine.cancel_order(id)?;
    Ok(Json(OrderResponse::from(&order)))
}

/// GET /api/watch
pub async fn list_watched(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.poller.watched().iter().map(|s| s.to_string()).collect())
}

/// POST /api/watch/{symbol}
///
/// The symbol must resolve to a quote before polling starts.
pub async fn watch(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<WatchResponse>, ApiError> {
    let quote = state.quotes.get_latest_price(&symbol).await?;
    state.engine.apply_quote(&quote);

    let symbol = state.poller.watch(quote.symbol.as_str());
    Ok(Json(WatchResponse {
        symbol: symbol.to_string(),
        watched: state.poller.watched().iter().map(|s| s.to_string()).collect(),
    }))
}

/// DELETE /api/watch/{symbol}
pub async fn unwatch(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<WatchResponse>, ApiError> {
    if !state.poller.unwatch(&symbol) {
        return Err(ApiError::not_found(format!("Not watching {}", symbol)));
    }
    Ok(Json(WatchResponse {
        symbol: papertrade_core::Symbol::normalize(&symbol).to_string(),
        watched: state.poller.watched().iter().map(|s| s.to_string()).collect(),
    }))
}
