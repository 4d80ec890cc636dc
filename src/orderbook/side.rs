//! One side of the book: price levels sorted best-first.
//!
//! Bids and asks only differ in the direction of their price ordering, so
//! both are a [`BookSide`] parameterised by a [`SideOrdering`]:
//!
//! - [`BidOrdering`]: keys are `Reverse(price)`, iteration is high-to-low
//! - [`AskOrdering`]: keys are `price`, iteration is low-to-high
//!
//! In both cases the first entry of the map is the best price.

use std::cmp::Reverse;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::marker::PhantomData;

use crate::orderbook::PriceLevel;
use crate::types::{LevelSummary, Side};

/// Price ordering for one side of the book
pub trait SideOrdering {
    /// BTreeMap key whose natural order is the side's priority order
    type Key: Ord + Copy + Debug;

    /// The side this ordering sorts
    const SIDE: Side;

    /// Map a price to its key
    fn key(price: u64) -> Self::Key;
}

/// Highest price first
#[derive(Debug, Clone, Copy)]
pub struct BidOrdering;

impl SideOrdering for BidOrdering {
    type Key = Reverse<u64>;
    const SIDE: Side = Side::Buy;

    #[inline]
    fn key(price: u64) -> Self::Key {
        Reverse(price)
    }
}

/// Lowest price first
#[derive(Debug, Clone, Copy)]
pub struct AskOrdering;

impl SideOrdering for AskOrdering {
    type Key = u64;
    const SIDE: Side = Side::Sell;

    #[inline]
    fn key(price: u64) -> Self::Key {
        price
    }
}

/// Sorted price levels for one side
#[derive(Debug)]
pub struct BookSide<D: SideOrdering> {
    levels: BTreeMap<D::Key, PriceLevel>,
    order_count: usize,
    _ordering: PhantomData<D>,
}

/// Buy side, best (highest) bid first
pub type Bids = BookSide<BidOrdering>;

/// Sell side, best (lowest) ask first
pub type Asks = BookSide<AskOrdering>;

impl<D: SideOrdering> Default for BookSide<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: SideOrdering> BookSide<D> {
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
            order_count: 0,
            _ordering: PhantomData,
        }
    }

    #[inline]
    pub fn side(&self) -> Side {
        D::SIDE
    }

    /// Number of distinct price levels
    #[inline]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Number of resting orders across all levels
    #[inline]
    pub fn order_count(&self) -> usize {
        self.order_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Level at `price`, created empty if absent. O(log P).
    ///
    /// The flag is true when the level was just created.
    pub fn level_or_insert(&mut self, price: u64) -> (&mut PriceLevel, bool) {
        match self.levels.entry(D::key(price)) {
            Entry::Occupied(entry) => (entry.into_mut(), false),
            Entry::Vacant(entry) => (entry.insert(PriceLevel::new(price)), true),
        }
    }

    #[inline]
    pub fn get(&self, price: u64) -> Option<&PriceLevel> {
        self.levels.get(&D::key(price))
    }

    #[inline]
    pub fn get_mut(&mut self, price: u64) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&D::key(price))
    }

    /// Drop the level at `price`. O(log P).
    #[inline]
    pub fn remove(&mut self, price: u64) -> Option<PriceLevel> {
        self.levels.remove(&D::key(price))
    }

    /// Best level
    #[inline]
    pub fn best(&self) -> Option<&PriceLevel> {
        self.levels.values().next()
    }

    /// Best price
    #[inline]
    pub fn best_price(&self) -> Option<u64> {
        self.best().map(|level| level.price)
    }

    /// All levels, best first
    pub fn levels(&self) -> impl Iterator<Item = &PriceLevel> + '_ {
        self.levels.values()
    }

    /// Up to `depth` best levels as summaries. O(depth).
    pub fn top(&self, depth: usize) -> Vec<LevelSummary> {
        self.levels
            .values()
            .take(depth)
            .map(|level| LevelSummary::new(level.price, level.total_quantity))
            .collect()
    }

    #[inline]
    pub(crate) fn order_added(&mut self) {
        self.order_count += 1;
    }

    #[inline]
    pub(crate) fn order_removed(&mut self) {
        self.order_count -= 1;
    }

    pub fn clear(&mut self) {
        self.levels.clear();
        self.order_count = 0;
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn prices<D: SideOrdering>(side: &BookSide<D>) -> Vec<u64> {
        side.levels().map(|level| level.price).collect()
    }

    #[test]
    fn test_bids_sorted_descending() {
        let mut bids = Bids::new();
        for price in [99, 101, 100] {
            bids.level_or_insert(price);
        }

        assert_eq!(bids.side(), Side::Buy);
        assert_eq!(prices(&bids), vec![101, 100, 99]);
        assert_eq!(bids.best_price(), Some(101));
    }

    #[test]
    fn test_asks_sorted_ascending() {
        let mut asks = Asks::new();
        for price in [102, 100, 101] {
            asks.level_or_insert(price);
        }

        assert_eq!(asks.side(), Side::Sell);
        assert_eq!(prices(&asks), vec![100, 101, 102]);
        assert_eq!(asks.best_price(), Some(100));
    }

    #[test]
    fn test_level_or_insert_reports_creation() {
        let mut bids = Bids::new();

        let (_, created) = bids.level_or_insert(100);
        assert!(created);

        let (level, created) = bids.level_or_insert(100);
        assert!(!created);
        assert_eq!(level.price, 100);
        assert_eq!(bids.level_count(), 1);
    }

    #[test]
    fn test_top_is_bounded_prefix() {
        let mut asks = Asks::new();
        for price in 1..=10 {
            let (level, _) = asks.level_or_insert(price);
            level.total_quantity = price * 10;
        }

        let top = asks.top(3);
        assert_eq!(
            top,
            vec![
                LevelSummary::new(1, 10),
                LevelSummary::new(2, 20),
                LevelSummary::new(3, 30)
            ]
        );
        assert_eq!(asks.top(15).len(), 10);
        assert!(asks.top(0).is_empty());
    }

    #[test]
    fn test_remove_level() {
        let mut bids = Bids::new();
        bids.level_or_insert(100);
        bids.level_or_insert(99);

        assert!(bids.remove(100).is_some());
        assert!(bids.remove(100).is_none());
        assert_eq!(bids.best_price(), Some(99));
    }

    #[test]
    fn test_clear() {
        let mut bids = Bids::new();
        bids.level_or_insert(100);
        bids.order_added();

        bids.clear();

        assert!(bids.is_empty());
        assert_eq!(bids.order_count(), 0);
    }
}
