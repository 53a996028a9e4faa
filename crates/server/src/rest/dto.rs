use chrono::{DateTime, Utc};
use papertrade_core::{Order, OrderType, Position, Side};
use papertrade_engine::LedgerSummary;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use papertrade_quotes::wire::{ChartPoint, ErrorBody, StockResponse, SymbolSearch};

/// Query of `GET /api/stock/{symbol}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockQuery {
    pub interval: Option<String>,
    pub range: Option<String>,
}

/// Body of `POST /api/orders`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub symbol: String,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub quantity: u64,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub limit_price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub symbol: String,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub quantity: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        OrderResponse {
            id: order.id,
            symbol: order.symbol.to_string(),
            side: order.side,
            order_type: order.order_type,
            quantity: order.quantity,
            price: order.price,
            status: order.status.to_string(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionResponse {
    pub symbol: String,
    pub quantity: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub pnl: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub pnl_percent: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl From<&Position> for PositionResponse {
    fn from(p: &Position) -> Self {
        PositionResponse {
            symbol: p.symbol.to_string(),
            quantity: p.quantity,
            average_price: p.average_price,
            current_price: p.current_price,
            pnl: p.pnl,
            pnl_percent: p.pnl_percent.round_dp(2),
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub invested: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub market_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub unrealized_pnl: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub equity: Decimal,
    pub open_positions: usize,
    pub order_count: usize,
}

impl From<LedgerSummary> for SummaryResponse {
    fn from(s: LedgerSummary) -> Self {
        SummaryResponse {
            equity: s.equity(),
            balance: s.balance,
            invested: s.invested,
            market_value: s.market_value,
            unrealized_pnl: s.unrealized_pnl,
            open_positions: s.open_positions,
            order_count: s.order_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub source: String,
    pub cache_ttl_secs: i64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WatchResponse {
    pub symbol: String,
    pub watched: Vec<String>,
}
