//! Order types for the limit order book.
//!
//! ## SSZ Serialization
//!
//! `Order` derives `SimpleSerialize` from ssz_rs so every resting order has
//! one canonical byte encoding. The book hashes these bytes to build its
//! state root.
//!
//! ## Fixed-Point Representation
//!
//! Prices are u64 scaled by 10^8 (see [`crate::types::price`]); quantities are
//! plain whole units.

use ssz_rs::prelude::*;

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Buy or Sell
///
/// Represented as u8 for SSZ compatibility:
/// - Buy = 0
/// - Sell = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Buy order (bid)
    #[default]
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Buy => 0,
            Side::Sell => 1,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::Buy),
            1 => Some(Side::Sell),
            _ => None,
        }
    }

    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// A resting limit order.
///
/// The side never changes for a given `id`. A price change goes through
/// [`crate::OrderBook::amend_order`], which re-queues the order at the new
/// level instead of editing it in place.
///
/// ## SSZ Layout
///
/// Fixed-size container of 33 bytes: `id` (8) + `side_raw` (1) + `price` (8)
/// + `quantity` (8) + `timestamp` (8).
///
/// ## Example
///
/// ```
/// use lob_core::types::{Order, Side};
///
/// let order = Order::new(
///     1,                  // id
///     Side::Buy,          // side
///     10_000_000_000,     // price: 100.00000000
///     50,                 // quantity
///     1_703_577_600_000,  // timestamp (ns)
/// );
/// assert_eq!(order.side(), Side::Buy);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Order {
    /// Caller-assigned identifier, unique among live orders
    pub id: u64,

    /// Order side as u8 (0=Buy, 1=Sell); the book rejects any other value
    pub side_raw: u8,

    /// Limit price in fixed-point (scaled by 10^8)
    pub price: u64,

    /// Remaining quantity
    pub quantity: u64,

    /// Arrival marker. Informational only; queue position decides priority.
    pub timestamp: u64,
}

impl Order {
    /// Create a new limit order
    pub fn new(id: u64, side: Side, price: u64, quantity: u64, timestamp: u64) -> Self {
        Self {
            id,
            side_raw: side.to_u8(),
            price,
            quantity,
            timestamp,
        }
    }

    /// Get the order side
    pub fn side(&self) -> Side {
        Side::from_u8(self.side_raw).unwrap_or(Side::Buy)
    }

    /// Check if the order is a bid
    #[inline]
    pub fn is_buy(&self) -> bool {
        self.side() == Side::Buy
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_conversion() {
        assert_eq!(Side::Buy.to_u8(), 0);
        assert_eq!(Side::Sell.to_u8(), 1);
        assert_eq!(Side::from_u8(0), Some(Side::Buy));
        assert_eq!(Side::from_u8(1), Some(Side::Sell));
        assert_eq!(Side::from_u8(2), None);
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }

    #[test]
    fn test_order_new() {
        let order = Order::new(7, Side::Sell, 10_100_000_000, 40, 123);

        assert_eq!(order.id, 7);
        assert_eq!(order.side(), Side::Sell);
        assert!(!order.is_buy());
        assert_eq!(order.price, 10_100_000_000);
        assert_eq!(order.quantity, 40);
        assert_eq!(order.timestamp, 123);
    }

    #[test]
    fn test_order_ssz_roundtrip() {
        let order = Order::new(1, Side::Buy, 10_000_000_000, 50, 1_703_577_600_000);

        let serialized = ssz_rs::serialize(&order).expect("Failed to serialize");
        let deserialized: Order = ssz_rs::deserialize(&serialized).expect("Failed to deserialize");

        assert_eq!(order, deserialized);
    }

    #[test]
    fn test_order_ssz_size() {
        let order = Order::new(1, Side::Buy, 10_000_000_000, 50, 0);
        let bytes = ssz_rs::serialize(&order).expect("Failed to serialize");

        // id + side_raw + price + quantity + timestamp
        assert_eq!(bytes.len(), 33, "Order should serialize to 33 bytes");
    }

    #[test]
    fn test_order_ssz_distinguishes_side() {
        let buy = Order::new(1, Side::Buy, 10_000_000_000, 50, 0);
        let sell = Order::new(1, Side::Sell, 10_000_000_000, 50, 0);

        let a = ssz_rs::serialize(&buy).expect("Failed to serialize");
        let b = ssz_rs::serialize(&sell).expect("Failed to serialize");
        assert_ne!(a, b);
    }
}
