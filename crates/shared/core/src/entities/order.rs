use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{OrderStatus, OrderType, Side};
use crate::values::{Price, Quantity, Symbol, Timestamp};

/// Unique identifier for an order
pub type OrderId = Uuid;

/// An order intent together with its outcome
///
/// Everything except `status` (and `updated_at`) is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub symbol: Symbol,
    pub order_type: OrderType,
    pub side: Side,
    pub quantity: Quantity,
    /// Execution price: the quote for market orders, the limit for limit orders
    pub price: Price,
    pub status: OrderStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Order {
    /// Create a new order with explicit timestamp
    ///
    /// Market orders are born `Filled`, limit orders `Pending`.
    pub fn new_with_time(
        symbol: Symbol,
        side: Side,
        order_type: OrderType,
        quantity: Quantity,
        price: Price,
        timestamp: Timestamp,
    ) -> Self {
        let status = match order_type {
            OrderType::Market => OrderStatus::Filled,
            OrderType::Limit => OrderStatus::Pending,
        };

        Self {
            id: Uuid::new_v4(),
            symbol,
            order_type,
            side,
            quantity,
            price,
            status,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Cash value of the order at its execution price
    ///
    /// `None` when `price x quantity` does not fit in a `Decimal`.
    pub fn notional(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }

    /// Whether a resting limit order would execute against `market_price`
    pub fn is_marketable(&self, market_price: Price) -> bool {
        match (self.order_type, self.side) {
            (OrderType::Market, _) => true,
            (OrderType::Limit, Side::Buy) => market_price <= self.price,
            (OrderType::Limit, Side::Sell) => market_price >= self.price,
        }
    }

    /// Move to `next` if the lifecycle allows it. Returns false otherwise.
    pub fn transition(&mut self, next: OrderStatus, at: Timestamp) -> bool {
        if !self.status.can_transition_to(next) {
            return false;
        }
        self.status = next;
        self.updated_at = at;
        true
    }
}
