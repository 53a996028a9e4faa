//! Paper ledger
//!
//! Cash balance, open positions keyed by symbol, and the append-only order
//! history. Only filled orders ever touch cash or positions.
//!
//! Overselling, selling an instrument that is not held, and buying past the
//! available cash are all accepted. They are logged, not rejected.

use papertrade_core::{Order, OrderId, Position, Side, Symbol, Timestamp};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::error::{Error, Result};

/// Starting cash for a fresh ledger
pub const DEFAULT_SEED_BALANCE: i64 = 1_000_000;

#[derive(Debug, Clone)]
pub struct Ledger {
    balance: Decimal,
    positions: HashMap<Symbol, Position>,
    orders: Vec<Order>,
}

/// Aggregate view over the ledger at the last marked prices
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSummary {
    pub balance: Decimal,
    /// Cost basis of open positions: sum of average price x quantity
    pub invested: Decimal,
    /// Sum of current price x quantity
    pub market_value: Decimal,
    pub unrealized_pnl: Decimal,
    pub open_positions: usize,
    pub order_count: usize,
}

impl LedgerSummary {
    /// Cash plus holdings at market
    pub fn equity(&self) -> Decimal {
        self.balance.saturating_add(self.market_value)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(Decimal::from(DEFAULT_SEED_BALANCE))
    }
}

impl Ledger {
    pub fn new(seed_balance: Decimal) -> Self {
        Self {
            balance: seed_balance,
            positions: HashMap::new(),
            orders: Vec::new(),
        }
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn position(&self, symbol: &Symbol) -> Option<&Position> {
        self.positions.get(symbol)
    }

    pub fn positions(&self) -> impl Iterator<Item = &Position> {
        self.positions.values()
    }

    /// Order history in insertion order
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Append an order to the history
    pub fn record(&mut self, order: Order) {
        self.orders.push(order);
    }

    pub fn order_mut(&mut self, id: OrderId) -> Option<&mut Order> {
        self.orders.iter_mut().find(|o| o.id == id)
    }

    /// Apply a filled order's cash and position effects
    ///
    /// All-or-nothing: a fill whose cash or position arithmetic would
    /// overflow leaves the ledger untouched and returns `InvalidOrder`.
    pub fn apply_fill(&mut self, order: &Order, at: Timestamp) -> Result<()> {
        let out_of_range = || {
            Error::InvalidOrder(format!(
                "{} {} x {} @ {} is out of range for the ledger",
                order.side, order.symbol, order.quantity, order.price
            ))
        };
        let notional = order.notional().ok_or_else(out_of_range)?;

        match order.side {
            Side::Buy => {
                let balance = self.balance.checked_sub(notional).ok_or_else(out_of_range)?;
                let position = match self.positions.get(&order.symbol) {
                    Some(held) => {
                        let mut grown = held.clone();
                        grown
                            .increase(order.quantity, order.price, at)
                            .ok_or_else(out_of_range)?;
                        grown
                    }
                    None => Position::open(order.symbol.clone(), order.quantity, order.price, at),
                };

                self.balance = balance;
                self.positions.insert(order.symbol.clone(), position);
                if self.balance.is_sign_negative() {
                    log::warn!(
                        "Buy of {} {} leaves cash negative: {}",
                        order.quantity,
                        order.symbol,
                        self.balance
                    );
                }
            }
            Side::Sell => {
                self.balance = self.balance.checked_add(notional).ok_or_else(out_of_range)?;

                let Some(position) = self.positions.get_mut(&order.symbol) else {
                    log::warn!(
                        "Sell of {} {} with no position held; credited cash only",
                        order.quantity,
                        order.symbol
                    );
                    return Ok(());
                };

                if order.quantity > position.quantity {
                    log::warn!(
                        "Oversell of {}: sold {} while holding {}",
                        order.symbol,
                        order.quantity,
                        position.quantity
                    );
                }

                position.decrease(order.quantity, at);
                if position.is_closed() {
                    self.positions.remove(&order.symbol);
                }
            }
        }
        Ok(())
    }

    /// Replace the held position for `position.symbol`, if still open
    pub fn update_position(&mut self, position: Position) {
        if let Some(held) = self.positions.get_mut(&position.symbol) {
            *held = position;
        }
    }

    pub fn summary(&self) -> LedgerSummary {
        let (invested, market_value) = self
            .positions
            .values()
            .fold((Decimal::ZERO, Decimal::ZERO), |(cost, value), p| {
                (
                    cost.saturating_add(p.cost_basis()),
                    value.saturating_add(p.market_value()),
                )
            });

        LedgerSummary {
            balance: self.balance,
            invested,
            market_value,
            unrealized_pnl: market_value.saturating_sub(invested),
            open_positions: self.positions.len(),
            order_count: self.orders.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use papertrade_core::OrderType;
    use rust_decimal_macros::dec;

    fn fill(symbol: &str, side: Side, quantity: u64, price: Decimal) -> Order {
        Order::new_with_time(
            Symbol::normalize(symbol),
            side,
            OrderType::Market,
            quantity,
            price,
            Utc::now(),
        )
    }

    fn apply(ledger: &mut Ledger, order: Order) {
        ledger.apply_fill(&order, order.created_at).unwrap();
        ledger.record(order);
    }

    /// balance + cost basis of all positions
    fn book_value(ledger: &Ledger) -> Decimal {
        ledger.balance() + ledger.positions().map(|p| p.cost_basis()).sum::<Decimal>()
    }

    #[test]
    fn test_buy_debits_and_opens() {
        let mut ledger = Ledger::default();
        apply(&mut ledger, fill("reliance", Side::Buy, 10, dec!(2450)));

        assert_eq!(ledger.balance(), dec!(975500));
        let pos = ledger.position(&Symbol::normalize("RELIANCE.NS")).unwrap();
        assert_eq!(pos.quantity, 10);
        assert_eq!(pos.average_price, dec!(2450));
        assert_eq!(pos.current_price, dec!(2450));
        assert_eq!(pos.pnl, Decimal::ZERO);
    }

    #[test]
    fn test_buys_weight_average() {
        let mut ledger = Ledger::default();
        apply(&mut ledger, fill("tcs", Side::Buy, 10, dec!(100)));
        apply(&mut ledger, fill("tcs", Side::Buy, 10, dec!(200)));

        let pos = ledger.position(&Symbol::normalize("tcs")).unwrap();
        assert_eq!(pos.quantity, 20);
        assert_eq!(pos.average_price, dec!(150));
    }

    #[test]
    fn test_partial_sell_keeps_average() {
        let mut ledger = Ledger::default();
        apply(&mut ledger, fill("tcs", Side::Buy, 10, dec!(100)));
        apply(&mut ledger, fill("tcs", Side::Sell, 4, dec!(120)));

        let pos = ledger.position(&Symbol::normalize("tcs")).unwrap();
        assert_eq!(pos.quantity, 6);
        assert_eq!(pos.average_price, dec!(100));
        assert_eq!(ledger.balance(), dec!(1000000) - dec!(1000) + dec!(480));
    }

    #[test]
    fn test_full_sell_removes_position() {
        let mut ledger = Ledger::default();
        apply(&mut ledger, fill("infy", Side::Buy, 5, dec!(1480)));
        apply(&mut ledger, fill("infy", Side::Sell, 5, dec!(1500)));

        assert!(ledger.position(&Symbol::normalize("infy")).is_none());
        assert_eq!(ledger.balance(), dec!(1000100));
    }

    #[test]
    fn test_oversell_removes_position_and_credits_all() {
        let mut ledger = Ledger::default();
        apply(&mut ledger, fill("infy", Side::Buy, 5, dec!(100)));
        apply(&mut ledger, fill("infy", Side::Sell, 8, dec!(100)));

        assert!(ledger.position(&Symbol::normalize("infy")).is_none());
        assert_eq!(ledger.balance(), dec!(1000300));
    }

    #[test]
    fn test_sell_without_position_is_cash_only() {
        let mut ledger = Ledger::default();
        apply(&mut ledger, fill("sbin", Side::Sell, 3, dec!(610)));

        assert_eq!(ledger.balance(), dec!(1001830));
        assert_eq!(ledger.positions().count(), 0);
        assert_eq!(ledger.orders().len(), 1);
    }

    #[test]
    fn test_buy_past_cash_goes_negative() {
        let mut ledger = Ledger::new(dec!(1000));
        apply(&mut ledger, fill("maruti", Side::Buy, 1, dec!(9800)));

        assert_eq!(ledger.balance(), dec!(-8800));
    }

    #[test]
    fn test_conservation_across_fills() {
        let mut ledger = Ledger::default();
        let mut expected = book_value(&ledger);

        let fills = [
            fill("tcs", Side::Buy, 10, dec!(3450)),
            fill("infy", Side::Buy, 7, dec!(1480.55)),
            fill("tcs", Side::Buy, 3, dec!(3500)),
            fill("tcs", Side::Sell, 5, dec!(3600)),
        ];

        for order in fills {
            let before_cost = ledger
                .position(&order.symbol)
                .map(|p| p.average_price)
                .unwrap_or(order.price);
            // Cash moves by the notional; cost basis moves by qty at the
            // fill price for buys and at the held average for sells.
            expected += match order.side {
                Side::Buy => Decimal::ZERO,
                Side::Sell => (order.price - before_cost) * Decimal::from(order.quantity),
            };
            apply(&mut ledger, order);
            assert_eq!(book_value(&ledger).round_dp(10), expected.round_dp(10));
        }
    }

    #[test]
    fn test_summary() {
        let mut ledger = Ledger::default();
        apply(&mut ledger, fill("tcs", Side::Buy, 10, dec!(100)));
        apply(&mut ledger, fill("infy", Side::Buy, 5, dec!(200)));

        let symbol = Symbol::normalize("tcs");
        let marked = ledger
            .position(&symbol)
            .unwrap()
            .marked_to(dec!(110), Utc::now());
        ledger.update_position(marked);

        let summary = ledger.summary();
        assert_eq!(summary.balance, dec!(998000));
        assert_eq!(summary.invested, dec!(2000));
        assert_eq!(summary.market_value, dec!(2100));
        assert_eq!(summary.unrealized_pnl, dec!(100));
        assert_eq!(summary.open_positions, 2);
        assert_eq!(summary.order_count, 2);
        assert_eq!(summary.equity(), dec!(1000100));
    }

    #[test]
    fn test_fill_past_max_quantity_leaves_ledger_untouched() {
        let mut ledger = Ledger::default();
        apply(&mut ledger, fill("itc", Side::Buy, u64::MAX, dec!(0.0000001)));
        let balance = ledger.balance();

        let err = ledger
            .apply_fill(&fill("itc", Side::Buy, 1, dec!(0.0000001)), Utc::now())
            .unwrap_err();

        assert!(matches!(err, Error::InvalidOrder(_)));
        assert_eq!(ledger.balance(), balance);
        let pos = ledger.position(&Symbol::normalize("itc")).unwrap();
        assert_eq!(pos.quantity, u64::MAX);
    }

    #[test]
    fn test_fill_with_unrepresentable_notional_is_refused() {
        let mut ledger = Ledger::default();
        let order = fill("itc", Side::Buy, 1_000_000_000_000_000_000, dec!(1000000000000));

        assert!(ledger.apply_fill(&order, Utc::now()).is_err());
        assert_eq!(ledger.balance(), dec!(1000000));
        assert_eq!(ledger.positions().count(), 0);
    }
}
