//! Limit order book implementation.
//!
//! ## Architecture
//!
//! Three indices describe the same set of live orders:
//!
//! - **Slab**: owns every `OrderNode`; nodes are linked into per-level FIFO queues
//! - **BookSide**: sorted price levels per side, best price first
//! - **HashMap**: order ID to [`OrderLocation`] (side, price, slab key)
//!
//! Every public mutation updates all three before returning, and a rejected
//! call touches none of them.
//!
//! ## Complexity
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Add order | O(log P) for a new level, O(1) otherwise |
//! | Cancel order | O(1), O(log P) when the level empties |
//! | Amend quantity | O(1) |
//! | Amend price | O(log P) |
//! | Snapshot | O(depth) |
//!
//! P is the number of distinct price levels on the order's side.
//!
//! ## Example
//!
//! ```
//! use lob_core::OrderBook;
//! use lob_core::types::{Order, Side};
//!
//! let mut book = OrderBook::with_capacity(1_000);
//!
//! book.add_order(Order::new(1, Side::Buy, 10_000_000_000, 50, 0)).unwrap();
//! book.add_order(Order::new(2, Side::Sell, 10_100_000_000, 40, 0)).unwrap();
//!
//! assert_eq!(book.best_bid(), Some(10_000_000_000));
//! assert_eq!(book.best_ask(), Some(10_100_000_000));
//! assert_eq!(book.spread(), Some(100_000_000));
//! ```

use std::collections::HashMap;

use log::{debug, trace, warn};
use sha2::{Digest, Sha256};
use slab::Slab;

use crate::orderbook::{Asks, Bids, BookSide, OrderNode, SideOrdering};
use crate::types::{BookError, Order, Side, Snapshot};

/// Where a live order sits: its side, its level, and its slab key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLocation {
    pub side: Side,
    pub price: u64,
    pub key: usize,
}

/// What a successful [`OrderBook::amend_order`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmendOutcome {
    /// Same price: quantity replaced in place, queue position kept
    Resized,
    /// New price: order moved to the back of the new level's queue
    Repriced,
    /// New quantity was zero: order removed from the book
    Cancelled,
}

/// In-memory limit order book with price-time priority.
///
/// Single-threaded: callers that share a book across threads must
/// serialise access themselves.
#[derive(Debug)]
pub struct OrderBook {
    /// Owns all resting orders
    orders: Slab<OrderNode>,

    /// Bid levels (sorted high to low)
    bids: Bids,

    /// Ask levels (sorted low to high)
    asks: Asks,

    /// Order ID to location mapping
    index: HashMap<u64, OrderLocation>,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    /// Create a new empty book
    pub fn new() -> Self {
        Self {
            orders: Slab::new(),
            bids: Bids::new(),
            asks: Asks::new(),
            index: HashMap::new(),
        }
    }

    /// Create a book with pre-allocated order storage
    ///
    /// ```
    /// use lob_core::OrderBook;
    ///
    /// let book = OrderBook::with_capacity(100_000);
    /// assert!(book.capacity() >= 100_000);
    /// ```
    pub fn with_capacity(order_capacity: usize) -> Self {
        Self {
            orders: Slab::with_capacity(order_capacity),
            bids: Bids::new(),
            asks: Asks::new(),
            index: HashMap::with_capacity(order_capacity),
        }
    }

    // ========================================================================
    // Capacity and Size
    // ========================================================================

    /// Pre-allocated order slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.orders.capacity()
    }

    /// Total number of resting orders
    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn bid_count(&self) -> usize {
        self.bids.order_count()
    }

    #[inline]
    pub fn ask_count(&self) -> usize {
        self.asks.order_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number of distinct bid prices
    #[inline]
    pub fn bid_levels(&self) -> usize {
        self.bids.level_count()
    }

    /// Number of distinct ask prices
    #[inline]
    pub fn ask_levels(&self) -> usize {
        self.asks.level_count()
    }

    // ========================================================================
    // Order Management
    // ========================================================================

    /// Add an order to the back of its price level
    ///
    /// Creates the level if this is the first order at that price.
    ///
    /// # Errors
    ///
    /// - [`BookError::DuplicateOrderId`] if an order with the same id is live
    /// - [`BookError::ZeroQuantity`] if `order.quantity == 0`
    /// - [`BookError::InvalidSide`] if `order.side_raw` is not a known side
    /// - [`BookError::QuantityOverflow`] if the level total would exceed `u64::MAX`
    ///
    /// # Returns
    ///
    /// The slab key of the new node
    ///
    /// ```
    /// use lob_core::{BookError, OrderBook};
    /// use lob_core::types::{Order, Side};
    ///
    /// let mut book = OrderBook::new();
    /// book.add_order(Order::new(1, Side::Buy, 10_000_000_000, 50, 0)).unwrap();
    ///
    /// let dup = book.add_order(Order::new(1, Side::Buy, 9_900_000_000, 10, 0));
    /// assert_eq!(dup, Err(BookError::DuplicateOrderId(1)));
    /// assert_eq!(book.order_count(), 1);
    /// ```
    pub fn add_order(&mut self, order: Order) -> Result<usize, BookError> {
        if self.index.contains_key(&order.id) {
            warn!("rejected add: duplicate order_id={}", order.id);
            return Err(BookError::DuplicateOrderId(order.id));
        }
        if order.quantity == 0 {
            warn!("rejected add: zero quantity order_id={}", order.id);
            return Err(BookError::ZeroQuantity(order.id));
        }
        let Some(side) = Side::from_u8(order.side_raw) else {
            warn!("rejected add: side_raw={} order_id={}", order.side_raw, order.id);
            return Err(BookError::InvalidSide(order.id, order.side_raw));
        };
        if self.level_total(side, order.price).checked_add(order.quantity).is_none() {
            warn!("rejected add: level total overflow order_id={}", order.id);
            return Err(BookError::QuantityOverflow(order.id));
        }

        debug!(
            "add order_id={} side={:?} price={} quantity={}",
            order.id,
            side,
            order.price,
            order.quantity
        );
        Ok(self.insert(order))
    }

    /// Cancel an order by id
    ///
    /// Removes the order from its level, and the level from its side once
    /// it has no orders left.
    ///
    /// # Errors
    ///
    /// [`BookError::OrderNotFound`] if no live order has this id. The book
    /// is left unchanged.
    ///
    /// ```
    /// use lob_core::{BookError, OrderBook};
    /// use lob_core::types::{Order, Side};
    ///
    /// let mut book = OrderBook::new();
    /// book.add_order(Order::new(42, Side::Buy, 10_000_000_000, 50, 0)).unwrap();
    ///
    /// let cancelled = book.cancel_order(42).unwrap();
    /// assert_eq!(cancelled.id, 42);
    /// assert!(book.is_empty());
    /// assert_eq!(book.cancel_order(42), Err(BookError::OrderNotFound(42)));
    /// ```
    pub fn cancel_order(&mut self, order_id: u64) -> Result<Order, BookError> {
        let Some(location) = self.index.remove(&order_id) else {
            warn!("rejected cancel: unknown order_id={}", order_id);
            return Err(BookError::OrderNotFound(order_id));
        };

        let order = self.unlink(location);
        debug!(
            "cancel order_id={} side={:?} price={} quantity={}",
            order_id, location.side, location.price, order.quantity
        );
        Ok(order)
    }

    /// Change an order's price and/or quantity
    ///
    /// - Same price (exact match): quantity is replaced in place and the
    ///   order keeps its queue position.
    /// - Different price: the order is removed and re-queued at the back of
    ///   the new level under the same id, side and timestamp.
    /// - `new_quantity == 0`: the order is cancelled.
    ///
    /// # Errors
    ///
    /// - [`BookError::OrderNotFound`] if no live order has this id
    /// - [`BookError::QuantityOverflow`] if the target level total would
    ///   exceed `u64::MAX`
    ///
    /// The book is left unchanged on error.
    pub fn amend_order(
        &mut self,
        order_id: u64,
        new_price: u64,
        new_quantity: u64,
    ) -> Result<AmendOutcome, BookError> {
        let Some(&location) = self.index.get(&order_id) else {
            warn!("rejected amend: unknown order_id={}", order_id);
            return Err(BookError::OrderNotFound(order_id));
        };

        if new_quantity == 0 {
            self.cancel_order(order_id)?;
            return Ok(AmendOutcome::Cancelled);
        }

        // the order's own quantity leaves a same-price level before the new one joins
        let mut base = self.level_total(location.side, new_price);
        if new_price == location.price {
            base = base.saturating_sub(self.orders[location.key].quantity());
        }
        if base.checked_add(new_quantity).is_none() {
            warn!("rejected amend: level total overflow order_id={}", order_id);
            return Err(BookError::QuantityOverflow(order_id));
        }

        if new_price == location.price {
            let old_quantity = self.orders[location.key].set_quantity(new_quantity);
            let level = match location.side {
                Side::Buy => self.bids.get_mut(location.price),
                Side::Sell => self.asks.get_mut(location.price),
            };
            if let Some(level) = level {
                level.adjust_quantity(old_quantity, new_quantity);
            }
            debug!(
                "amend order_id={} quantity {} -> {} at price={}",
                order_id, old_quantity, new_quantity, new_price
            );
            return Ok(AmendOutcome::Resized);
        }

        self.index.remove(&order_id);
        let mut order = self.unlink(location);
        order.price = new_price;
        order.quantity = new_quantity;
        self.insert(order);
        debug!(
            "amend order_id={} price {} -> {} quantity={} (requeued)",
            order_id, location.price, new_price, new_quantity
        );
        Ok(AmendOutcome::Repriced)
    }

    /// Aggregate quantity resting at one level, 0 if the level is absent
    pub fn level_total(&self, side: Side, price: u64) -> u64 {
        let level = match side {
            Side::Buy => self.bids.get(price),
            Side::Sell => self.asks.get(price),
        };
        level.map_or(0, |level| level.total_quantity)
    }

    /// Look up a live order by id
    pub fn get_order(&self, order_id: u64) -> Option<&Order> {
        let location = self.index.get(&order_id)?;
        self.orders.get(location.key).map(|node| &node.order)
    }

    /// Location of a live order
    #[inline]
    pub fn location(&self, order_id: u64) -> Option<OrderLocation> {
        self.index.get(&order_id).copied()
    }

    #[inline]
    pub fn contains_order(&self, order_id: u64) -> bool {
        self.index.contains_key(&order_id)
    }

    /// Ids resting at one level, oldest (highest priority) first
    pub fn level_order_ids(&self, side: Side, price: u64) -> Vec<u64> {
        let level = match side {
            Side::Buy => self.bids.get(price),
            Side::Sell => self.asks.get(price),
        };
        level
            .map(|level| {
                level
                    .iter(&self.orders)
                    .map(|(_, node)| node.order_id())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Remove every order
    pub fn clear(&mut self) {
        self.orders.clear();
        self.bids.clear();
        self.asks.clear();
        self.index.clear();
    }

    // ========================================================================
    // Depth Queries
    // ========================================================================

    /// Aggregated view of up to `depth` best levels per side
    ///
    /// Returns fewer levels when a side has fewer than `depth` prices.
    ///
    /// ```
    /// use lob_core::OrderBook;
    /// use lob_core::types::{LevelSummary, Order, Side};
    ///
    /// let mut book = OrderBook::new();
    /// book.add_order(Order::new(1, Side::Buy, 10_000_000_000, 50, 0)).unwrap();
    /// book.add_order(Order::new(2, Side::Buy, 10_000_000_000, 30, 0)).unwrap();
    /// book.add_order(Order::new(3, Side::Buy, 9_900_000_000, 100, 0)).unwrap();
    ///
    /// let snap = book.snapshot(5);
    /// assert_eq!(
    ///     snap.bids,
    ///     vec![
    ///         LevelSummary::new(10_000_000_000, 80),
    ///         LevelSummary::new(9_900_000_000, 100),
    ///     ]
    /// );
    /// assert!(snap.asks.is_empty());
    /// ```
    pub fn snapshot(&self, depth: usize) -> Snapshot {
        Snapshot {
            bids: self.bids.top(depth),
            asks: self.asks.top(depth),
        }
    }

    /// Best bid price (highest buy price)
    #[inline]
    pub fn best_bid(&self) -> Option<u64> {
        self.bids.best_price()
    }

    /// Best ask price (lowest sell price)
    #[inline]
    pub fn best_ask(&self) -> Option<u64> {
        self.asks.best_price()
    }

    /// best_ask - best_bid, or None if either side is empty or the book is crossed
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) if ask >= bid => Some(ask - bid),
            _ => None,
        }
    }

    #[inline]
    pub fn bids(&self) -> &Bids {
        &self.bids
    }

    #[inline]
    pub fn asks(&self) -> &Asks {
        &self.asks
    }

    // ========================================================================
    // State Root
    // ========================================================================

    /// SHA-256 over the SSZ encoding of every resting order
    ///
    /// Orders are visited bids best-first, then asks best-first, oldest
    /// first inside each level. Two books have the same root exactly when
    /// they hold the same orders in the same priority order.
    pub fn state_root(&self) -> Result<[u8; 32], BookError> {
        let mut hasher = Sha256::new();
        let bid_nodes = self.bids.levels().flat_map(|level| level.iter(&self.orders));
        let ask_nodes = self.asks.levels().flat_map(|level| level.iter(&self.orders));

        for (_, node) in bid_nodes.chain(ask_nodes) {
            let bytes = ssz_rs::serialize(&node.order)
                .map_err(|e| BookError::Encoding(format!("order {}: {:?}", node.order_id(), e)))?;
            hasher.update(&bytes);
        }

        let mut root = [0u8; 32];
        root.copy_from_slice(&hasher.finalize());
        Ok(root)
    }

    /// State root as a hex string
    pub fn state_root_hex(&self) -> Result<String, BookError> {
        self.state_root().map(hex::encode)
    }

    // ========================================================================
    // Consistency Check
    // ========================================================================

    /// Verify that the slab, both sides and the order index agree
    ///
    /// Checks, for every level: non-empty queue, positive aggregate equal to
    /// the sum of its orders, well-formed links, and an index entry pointing
    /// back at each node. Also checks that no node or index entry is orphaned.
    /// O(N); meant for tests and debugging.
    pub fn check_invariants(&self) -> Result<(), BookError> {
        let bid_orders = check_side(&self.bids, &self.orders, &self.index)?;
        let ask_orders = check_side(&self.asks, &self.orders, &self.index)?;
        let linked = bid_orders + ask_orders;

        if linked != self.orders.len() {
            return Err(BookError::Corrupted(format!(
                "{} nodes in slab but {} linked into levels",
                self.orders.len(),
                linked
            )));
        }
        if self.index.len() != linked {
            return Err(BookError::Corrupted(format!(
                "{} index entries for {} live orders",
                self.index.len(),
                linked
            )));
        }
        Ok(())
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    /// Store and enqueue an order that has already passed validation
    fn insert(&mut self, order: Order) -> usize {
        let order_id = order.id;
        let side = order.side();
        let price = order.price;

        let key = self.orders.insert(OrderNode::new(order));
        match side {
            Side::Buy => enqueue(&mut self.bids, &mut self.orders, key, price),
            Side::Sell => enqueue(&mut self.asks, &mut self.orders, key, price),
        }
        self.index.insert(order_id, OrderLocation { side, price, key });

        key
    }

    /// Dequeue and free the node at `location`. The index entry must
    /// already be gone.
    fn unlink(&mut self, location: OrderLocation) -> Order {
        match location.side {
            Side::Buy => dequeue(&mut self.bids, &mut self.orders, location.key, location.price),
            Side::Sell => dequeue(&mut self.asks, &mut self.orders, location.key, location.price),
        }
        self.orders.remove(location.key).order
    }
}

fn enqueue<D: SideOrdering>(
    side: &mut BookSide<D>,
    orders: &mut Slab<OrderNode>,
    key: usize,
    price: u64,
) {
    let (level, created) = side.level_or_insert(price);
    level.push_back(key, orders);
    side.order_added();
    if created {
        trace!("level created side={:?} price={}", D::SIDE, price);
    }
}

fn dequeue<D: SideOrdering>(
    side: &mut BookSide<D>,
    orders: &mut Slab<OrderNode>,
    key: usize,
    price: u64,
) {
    let Some(level) = side.get_mut(price) else {
        warn!("no {:?} level at price {} for slab key {}", D::SIDE, price, key);
        return;
    };
    level.remove(key, orders);
    let emptied = level.is_empty();
    side.order_removed();
    if emptied {
        side.remove(price);
        trace!("level removed side={:?} price={}", D::SIDE, price);
    }
}

/// Walk one side, returning the number of orders linked into it
fn check_side<D: SideOrdering>(
    side: &BookSide<D>,
    orders: &Slab<OrderNode>,
    index: &HashMap<u64, OrderLocation>,
) -> Result<usize, BookError> {
    let corrupted = |msg: String| Err(BookError::Corrupted(msg));
    let mut side_total = 0usize;
    let mut last_price: Option<u64> = None;

    for level in side.levels() {
        if let Some(last) = last_price {
            let ordered = match D::SIDE {
                Side::Buy => level.price < last,
                Side::Sell => level.price > last,
            };
            if !ordered {
                return corrupted(format!("{:?} level {} out of order", D::SIDE, level.price));
            }
        }
        last_price = Some(level.price);

        if level.is_empty() || level.head.is_none() {
            return corrupted(format!("{:?} level {} is empty", D::SIDE, level.price));
        }

        let mut count = 0usize;
        let mut sum = 0u64;
        let mut prev: Option<usize> = None;
        for (key, node) in level.iter(orders) {
            if node.prev != prev {
                return corrupted(format!("order {} has a broken prev link", node.order_id()));
            }
            if node.price() != level.price || node.side() != D::SIDE {
                return corrupted(format!(
                    "order {} ({:?} @ {}) linked into {:?} level {}",
                    node.order_id(),
                    node.side(),
                    node.price(),
                    D::SIDE,
                    level.price
                ));
            }
            let expected = OrderLocation {
                side: D::SIDE,
                price: level.price,
                key,
            };
            if index.get(&node.order_id()) != Some(&expected) {
                return corrupted(format!("order {} index entry is stale", node.order_id()));
            }
            count += 1;
            let Some(next) = sum.checked_add(node.quantity()) else {
                return corrupted(format!("{:?} level {} sum overflows", D::SIDE, level.price));
            };
            sum = next;
            prev = Some(key);
        }

        if prev != level.tail {
            return corrupted(format!("{:?} level {} tail mismatch", D::SIDE, level.price));
        }
        if count != level.order_count {
            return corrupted(format!(
                "{:?} level {} counts {} orders, queue holds {}",
                D::SIDE,
                level.price,
                level.order_count,
                count
            ));
        }
        if sum != level.total_quantity || sum == 0 {
            return corrupted(format!(
                "{:?} level {} total {} but orders sum to {}",
                D::SIDE,
                level.price,
                level.total_quantity,
                sum
            ));
        }
        side_total += count;
    }

    if side_total != side.order_count() {
        return corrupted(format!(
            "{:?} side counts {} orders, levels hold {}",
            D::SIDE,
            side.order_count(),
            side_total
        ));
    }
    Ok(side_total)
}

// ============================================================================
// Unit Tests
// ============================================================================
