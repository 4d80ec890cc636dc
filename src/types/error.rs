//! Error type for order book operations.

use thiserror::Error;

/// Reasons a book operation is rejected.
///
/// A rejected call never mutates the book.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    /// Cancel/amend referenced an id with no live order
    #[error("order {0} not found")]
    OrderNotFound(u64),

    /// Add used an id that is still live in the book
    #[error("order {0} is already resting in the book")]
    DuplicateOrderId(u64),

    /// Add carried a zero quantity
    #[error("order {0} has zero quantity")]
    ZeroQuantity(u64),

    /// Add carried a `side_raw` that is neither Buy nor Sell
    #[error("order {0} has invalid side {1}")]
    InvalidSide(u64, u8),

    /// The order's level total would exceed `u64::MAX`
    #[error("order {0} would overflow its price level total")]
    QuantityOverflow(u64),

    /// SSZ encoding of a resting order failed while hashing the book
    #[error("failed to encode book state: {0}")]
    Encoding(String),

    /// Cross-index consistency check failed
    #[error("book invariant violated: {0}")]
    Corrupted(String),
}
