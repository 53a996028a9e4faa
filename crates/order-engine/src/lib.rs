//! Paper-Trading Order Engine
//!
//! Simulated order placement against a virtual cash balance:
//! - **Pricing**: every order is priced off the quote provider at placement
//! - **Ledger**: cash, symbol-keyed positions, append-only order history
//! - **Limit orders**: rest as pending until a quote makes them marketable
//! - **Mark-to-market**: quotes refresh position P&L
//!
//! ## Architecture
//!
//! ```text
//! OrderIntent ──► OrderEngine ──► QuoteProvider (price)
//!                      │
//!                      ▼
//!                   Ledger ◄── apply_quote(Quote) ◄── poller / caller
//!                (balance, positions, orders)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use papertrade_engine::{OrderEngine, OrderIntent};
//!
//! let engine = OrderEngine::new(quotes, clock);
//! let order = engine
//!     .place_order(&OrderIntent::market("reliance", Side::Buy, 10), None)
//!     .await?;
//! assert_eq!(engine.get_balance(), dec!(975500));
//! ```

pub mod engine;
pub mod error;
pub mod ledger;
pub mod pnl;

// Re-export main types
pub use engine::{OrderEngine, OrderIntent};
pub use error::{Error, Result};
pub use ledger::{DEFAULT_SEED_BALANCE, Ledger, LedgerSummary};
pub use pnl::refresh_pnl;
