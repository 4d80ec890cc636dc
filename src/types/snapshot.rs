//! Aggregated depth view returned by [`crate::OrderBook::snapshot`].
//!
//! A snapshot exposes price and total quantity per level, never individual
//! orders. Bids are listed best (highest) first, asks best (lowest) first.

use std::fmt;

use crate::types::price::fixed_to_decimal;

/// Price and aggregate resting quantity of one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LevelSummary {
    /// Level price in fixed-point (scaled by 10^8)
    pub price: u64,
    /// Sum of remaining quantity over the level's orders
    pub total_quantity: u64,
}

impl LevelSummary {
    pub fn new(price: u64, total_quantity: u64) -> Self {
        Self {
            price,
            total_quantity,
        }
    }
}

/// Top-of-book depth for both sides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Bid levels, strictly descending by price
    pub bids: Vec<LevelSummary>,
    /// Ask levels, strictly ascending by price
    pub asks: Vec<LevelSummary>,
}

impl Snapshot {
    /// True if neither side has any level
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    #[inline]
    pub fn best_bid(&self) -> Option<&LevelSummary> {
        self.bids.first()
    }

    #[inline]
    pub fn best_ask(&self) -> Option<&LevelSummary> {
        self.asks.first()
    }

    /// best_ask - best_bid, or None if either side is empty or the book is crossed
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) if ask.price >= bid.price => Some(ask.price - bid.price),
            _ => None,
        }
    }
}

/// Ladder rendering: asks on top (highest first), bids below (highest first).
///
/// ```text
/// --- ASKS ---
///          60 @ $  102.00
///          60 @ $  101.00
/// ------------
/// --- BIDS ---
///          80 @ $  100.00
///         100 @ $   99.00
/// ```
impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- ASKS ---")?;
        for level in self.asks.iter().rev() {
            write_row(f, level)?;
        }
        writeln!(f, "------------")?;
        writeln!(f, "--- BIDS ---")?;
        for level in &self.bids {
            write_row(f, level)?;
        }
        Ok(())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, level: &LevelSummary) -> fmt::Result {
    writeln!(
        f,
        "  {:>10} @ ${:>8.2}",
        level.total_quantity,
        fixed_to_decimal(level.price)
    )
}

// ============================================================================
// Unit Tests
// ============================================================================
