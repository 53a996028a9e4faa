use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::values::{Price, Quantity, Symbol, Timestamp};

/// Aggregated long holding in one instrument
///
/// A position only exists while `quantity > 0`; the ledger drops it as soon
/// as a sell takes the quantity to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Instrument held
    pub symbol: Symbol,

    /// Shares held
    pub quantity: Quantity,

    /// Volume-weighted average entry price
    pub average_price: Price,

    /// Latest observed market price
    pub current_price: Price,

    /// Unrealized P&L: (current - average) * quantity
    pub pnl: Decimal,

    /// Unrealized P&L as a percentage of cost basis
    pub pnl_percent: Decimal,

    /// When the position was opened
    pub opened_at: Timestamp,

    /// Last update time
    pub updated_at: Timestamp,
}

impl Position {
    /// Open a position from a first buy
    pub fn open(symbol: Symbol, quantity: Quantity, price: Price, at: Timestamp) -> Self {
        Self {
            symbol,
            quantity,
            average_price: price,
            current_price: price,
            pnl: Decimal::ZERO,
            pnl_percent: Decimal::ZERO,
            opened_at: at,
            updated_at: at,
        }
    }

    /// Total cost of the holding at average price
    pub fn cost_basis(&self) -> Decimal {
        self.average_price.saturating_mul(Decimal::from(self.quantity))
    }

    /// Current value of the holding at the latest observed price
    pub fn market_value(&self) -> Decimal {
        self.current_price.saturating_mul(Decimal::from(self.quantity))
    }

    /// Add to the position, re-weighting the average entry price
    ///
    /// Returns the new quantity, or `None` (leaving the position untouched)
    /// when the combined quantity or cost does not fit.
    pub fn increase(&mut self, quantity: Quantity, price: Price, at: Timestamp) -> Option<Quantity> {
        let total_quantity = self.quantity.checked_add(quantity)?;
        let held_cost = self.average_price.checked_mul(Decimal::from(self.quantity))?;
        let total_cost = held_cost.checked_add(price.checked_mul(Decimal::from(quantity))?)?;

        if total_quantity > 0 {
            self.average_price = total_cost / Decimal::from(total_quantity);
        }
        self.quantity = total_quantity;
        self.recompute_pnl();
        self.updated_at = at;
        Some(total_quantity)
    }

    /// Reduce the position. The average price is unchanged by a sell.
    pub fn decrease(&mut self, quantity: Quantity, at: Timestamp) {
        self.quantity = self.quantity.saturating_sub(quantity);
        self.recompute_pnl();
        self.updated_at = at;
    }

    /// Copy of this position marked to `price`
    pub fn marked_to(&self, price: Price, at: Timestamp) -> Self {
        let mut marked = self.clone();
        marked.current_price = price;
        marked.recompute_pnl();
        marked.updated_at = at;
        marked
    }

    /// Check if position is closed (quantity is zero)
    pub fn is_closed(&self) -> bool {
        self.quantity == 0
    }

    fn recompute_pnl(&mut self) {
        let quantity = Decimal::from(self.quantity);
        self.pnl = self
            .current_price
            .saturating_sub(self.average_price)
            .saturating_mul(quantity);

        let cost = self.cost_basis();
        self.pnl_percent = if cost.is_zero() {
            Decimal::ZERO
        } else {
            self.pnl
                .checked_div(cost)
                .map_or(Decimal::ZERO, |ratio| ratio.saturating_mul(Decimal::ONE_HUNDRED))
        };
    }
}
