//! Order Engine
//!
//! Turns order intents into orders priced off the quote provider, and keeps
//! the paper ledger consistent with every fill.
//!
//! ## Order lifecycle
//!
//! ```text
//! market ──► Filled (at quote price, applied immediately)
//!
//! limit ───► Pending ──► Filled     (apply_quote sees a marketable price;
//!               │                    fills at the limit price)
//!               └──────► Cancelled  (cancel_order)
//! ```
//!
//! The ledger lock is only held for synchronous mutation, never across the
//! quote fetch.

use papertrade_core::{Order, OrderId, OrderStatus, OrderType, Position, Price, Quantity, Quote, Side, Symbol};
use papertrade_ports::Clock;
use papertrade_quotes::QuoteProvider;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::ledger::{Ledger, LedgerSummary};
use crate::pnl::refresh_pnl;

/// What the user asked for, before pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderIntent {
    /// Raw symbol as entered; normalized on placement
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: Quantity,
}

impl OrderIntent {
    pub fn market(symbol: impl Into<String>, side: Side, quantity: Quantity) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Market,
            quantity,
        }
    }

    pub fn limit(symbol: impl Into<String>, side: Side, quantity: Quantity) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Limit,
            quantity,
        }
    }

    fn validate(&self, limit_price: Option<Price>) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(Error::InvalidOrder("symbol is required".to_string()));
        }
        if self.quantity == 0 {
            return Err(Error::InvalidOrder("quantity must be at least 1".to_string()));
        }
        if let Some(limit) = limit_price {
            if limit <= Decimal::ZERO {
                return Err(Error::InvalidOrder(format!(
                    "limit price must be positive, got {}",
                    limit
                )));
            }
            if limit.checked_mul(Decimal::from(self.quantity)).is_none() {
                return Err(Error::InvalidOrder(format!(
                    "{} x {} exceeds the largest representable order value",
                    self.quantity, limit
                )));
            }
        }
        Ok(())
    }
}

pub struct OrderEngine {
    quotes: Arc<QuoteProvider>,
    clock: Arc<dyn Clock>,
    ledger: Mutex<Ledger>,
}

impl OrderEngine {
    /// Engine over a fresh ledger with the default seed balance
    pub fn new(quotes: Arc<QuoteProvider>, clock: Arc<dyn Clock>) -> Self {
        Self::with_ledger(quotes, clock, Ledger::default())
    }

    pub fn with_seed_balance(quotes: Arc<QuoteProvider>, clock: Arc<dyn Clock>, seed_balance: Decimal) -> Self {
        Self::with_ledger(quotes, clock, Ledger::new(seed_balance))
    }

    pub fn with_ledger(quotes: Arc<QuoteProvider>, clock: Arc<dyn Clock>, ledger: Ledger) -> Self {
        Self {
            quotes,
            clock,
            ledger: Mutex::new(ledger),
        }
    }

    /// Price, record and (for market orders) fill an order
    ///
    /// A limit order executes at `limit_price`, falling back to the quoted
    /// price when none is given. If the quote cannot be resolved, or the
    /// order's value does not fit the ledger, nothing is recorded.
    pub async fn place_order(&self, intent: &OrderIntent, limit_price: Option<Price>) -> Result<Order> {
        intent.validate(limit_price)?;

        let quote = self.quotes.get_latest_price(&intent.symbol).await?;

        let price = match intent.order_type {
            OrderType::Market => quote.price,
            OrderType::Limit => limit_price.unwrap_or(quote.price),
        };
        let now = self.clock.now();
        let order = Order::new_with_time(
            Symbol::normalize(&intent.symbol),
            intent.side,
            intent.order_type,
            intent.quantity,
            price,
            now,
        );

        if order.notional().is_none() {
            return Err(Error::InvalidOrder(format!(
                "{} x {} exceeds the largest representable order value",
                order.quantity, order.price
            )));
        }

        {
            let mut ledger = self.ledger.lock();
            if order.status == OrderStatus::Filled {
                ledger.apply_fill(&order, now)?;
            }
            ledger.record(order.clone());
        }

        log::info!(
            "Order {} {} {} {} x {} @ {} -> {}",
            order.id,
            order.order_type,
            order.side,
            order.symbol,
            order.quantity,
            order.price,
            order.status
        );
        Ok(order)
    }

    /// Withdraw a pending order
    pub fn cancel_order(&self, id: OrderId) -> Result<Order> {
        let now = self.clock.now();
        let mut ledger = self.ledger.lock();
        let order = ledger.order_mut(id).ok_or(Error::OrderNotFound(id))?;

        if !order.transition(OrderStatus::Cancelled, now) {
            return Err(Error::InvalidTransition {
                id,
                from: order.status,
                to: OrderStatus::Cancelled,
            });
        }

        log::info!("Order {} cancelled", id);
        Ok(order.clone())
    }

    /// Feed a fresh quote into the ledger
    ///
    /// Fills every pending limit order on the quote's symbol that the price
    /// makes marketable, then marks the held position to the quote. Returns
    /// the orders filled by this call. An order the ledger cannot absorb
    /// stays pending.
    pub fn apply_quote(&self, quote: &Quote) -> Vec<Order> {
        let now = self.clock.now();
        let mut ledger = self.ledger.lock();

        let marketable: Vec<OrderId> = ledger
            .orders()
            .iter()
            .filter(|o| o.status.is_active() && o.symbol == quote.symbol && o.is_marketable(quote.price))
            .map(|o| o.id)
            .collect();

        let mut filled = Vec::with_capacity(marketable.len());
        for id in marketable {
            let Some(mut order) = ledger.order_mut(id).cloned() else {
                continue;
            };
            if !order.transition(OrderStatus::Filled, now) {
                continue;
            }
            if let Err(e) = ledger.apply_fill(&order, now) {
                log::warn!("Limit order {} left pending: {}", order.id, e);
                continue;
            }
            if let Some(stored) = ledger.order_mut(id) {
                *stored = order.clone();
            }
            log::info!(
                "Limit order {} ({} {} x {}) filled @ {} (market {})",
                order.id,
                order.side,
                order.symbol,
                order.quantity,
                order.price,
                quote.price
            );
            filled.push(order);
        }

        let refreshed = ledger.position(&quote.symbol).map(|p| refresh_pnl(p, quote));
        if let Some(position) = refreshed {
            ledger.update_position(position);
        }

        filled
    }

    pub fn get_balance(&self) -> Decimal {
        self.ledger.lock().balance()
    }

    /// Open positions as owned copies, in no particular order
    pub fn get_positions(&self) -> Vec<Position> {
        self.ledger.lock().positions().cloned().collect()
    }

    /// Order history in insertion order
    pub fn get_orders(&self) -> Vec<Order> {
        self.ledger.lock().orders().to_vec()
    }

    pub fn get_order(&self, id: OrderId) -> Option<Order> {
        self.ledger.lock().orders().iter().find(|o| o.id == id).cloned()
    }

    pub fn summary(&self) -> LedgerSummary {
        self.ledger.lock().summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use papertrade_clock::ManualClock;
    use papertrade_quotes::{MockSource, MockSourceConfig};
    use rust_decimal_macros::dec;

    fn engine() -> OrderEngine {
        let clock = ManualClock::new(None);
        let source = MockSource::new(MockSourceConfig::fixed(), clock.clone());
        let quotes = Arc::new(QuoteProvider::new(Arc::new(source), clock.clone()));
        OrderEngine::new(quotes, clock)
    }

    #[tokio::test]
    async fn test_zero_quantity_rejected() {
        let engine = engine();
        let err = engine
            .place_order(&OrderIntent::market("tcs", Side::Buy, 0), None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidOrder(_)));
        assert!(engine.get_orders().is_empty());
    }

    #[tokio::test]
    async fn test_non_positive_limit_rejected() {
        let engine = engine();
        let err = engine
            .place_order(&OrderIntent::limit("tcs", Side::Buy, 1), Some(dec!(0)))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidOrder(_)));
    }

    #[tokio::test]
    async fn test_blank_symbol_rejected() {
        let engine = engine();
        let err = engine
            .place_order(&OrderIntent::market("   ", Side::Buy, 1), None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidOrder(_)));
    }

    #[tokio::test]
    async fn test_limit_without_price_uses_quote() {
        let engine = engine();
        let order = engine
            .place_order(&OrderIntent::limit("infy", Side::Buy, 2), None)
            .await
            .unwrap();

        assert_eq!(order.price, dec!(1480.00));
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_quote_error_message_is_verbatim() {
        let engine = engine();
        let err = engine
            .place_order(&OrderIntent::market("nosuchco", Side::Buy, 1), None)
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            papertrade_quotes::QuoteError::SymbolNotFound("NOSUCHCO.NS".to_string()).to_string()
        );
    }

    #[tokio::test]
    async fn test_limit_value_out_of_range_rejected() {
        let engine = engine();
        let err = engine
            .place_order(
                &OrderIntent::limit("itc", Side::Buy, 1_000_000_000_000_000_000),
                Some(dec!(1000000000000)),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidOrder(_)));
        assert!(engine.get_orders().is_empty());
    }

    #[tokio::test]
    async fn test_market_buy_past_max_quantity_rejected() {
        let engine = engine();
        engine
            .place_order(&OrderIntent::market("itc", Side::Buy, u64::MAX), None)
            .await
            .unwrap();
        let balance = engine.get_balance();

        let err = engine
            .place_order(&OrderIntent::market("itc", Side::Buy, 1), None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidOrder(_)));
        assert_eq!(engine.get_orders().len(), 1);
        assert_eq!(engine.get_balance(), balance);
        assert_eq!(engine.get_positions()[0].quantity, u64::MAX);
    }

    #[tokio::test]
    async fn test_unabsorbable_limit_fill_stays_pending() {
        let engine = engine();
        engine
            .place_order(&OrderIntent::market("itc", Side::Buy, 1), None)
            .await
            .unwrap();
        let pending = engine
            .place_order(&OrderIntent::limit("itc", Side::Buy, u64::MAX), Some(dec!(500)))
            .await
            .unwrap();
        let balance = engine.get_balance();

        let quote = engine.quotes.get_latest_price("itc").await.unwrap();
        assert!(engine.apply_quote(&quote).is_empty());

        assert_eq!(engine.get_order(pending.id).unwrap().status, OrderStatus::Pending);
        assert_eq!(engine.get_balance(), balance);
        assert_eq!(engine.get_positions()[0].quantity, 1);
    }
}
