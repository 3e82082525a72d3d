//! Error type for [`super::OrderBook`] operations.

use crate::ids::{OrderId, Symbol};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum OrderBookError {
    /// The order's symbol does not match this book's symbol.
    SymbolMismatch { expected: Symbol, got: Symbol },
    /// `cancel` referenced an id this book has no record of.
    UnknownOrder(OrderId),
}

impl fmt::Display for OrderBookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderBookError::SymbolMismatch { expected, got } => {
                write!(f, "symbol mismatch: book is '{expected}', order is '{got}'")
            }
            OrderBookError::UnknownOrder(id) => write!(f, "unknown order id: {id}"),
        }
    }
}

impl std::error::Error for OrderBookError {}
