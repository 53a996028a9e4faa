//! Order Engine errors

use papertrade_core::{OrderId, OrderStatus};
use papertrade_ports::QuoteError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Price resolution failed; the message is passed through verbatim
    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    #[error("Order {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
