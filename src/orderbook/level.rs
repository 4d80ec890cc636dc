//! Price level management for orders at the same price.
//!
//! ## Design
//!
//! A `PriceLevel` represents all orders at a single price point.
//! Orders are kept in a doubly-linked list threaded through the slab, so
//! arrival order is the priority order.
//!
//! ## Queue Structure
//!
//! ```text
//! head (oldest) <-> order2 <-> order3 <-> tail (newest)
//! ```
//!
//! - New orders are appended at the tail
//! - Any order can be removed in O(1) using its slab key
//! - `total_quantity` always equals the sum of the linked orders' quantities

use slab::Slab;

use crate::orderbook::OrderNode;

/// A price level containing orders at a single price.
///
/// The order data lives in the slab; this struct only holds the queue
/// metadata and the aggregate quantity.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Price for this level (fixed-point, scaled by 10^8)
    pub price: u64,

    /// Total remaining quantity at this level
    pub total_quantity: u64,

    /// Oldest order (slab key)
    pub head: Option<usize>,

    /// Newest order (slab key)
    pub tail: Option<usize>,

    /// Number of orders at this price level
    pub order_count: usize,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new(price: u64) -> Self {
        Self {
            price,
            total_quantity: 0,
            head: None,
            tail: None,
            order_count: 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }

    /// Append an order to the tail of the queue
    ///
    /// # Panics
    ///
    /// Panics if `key` or the current tail is not present in the slab.
    /// The caller must have checked that the new total fits in a `u64`.
    pub fn push_back(&mut self, key: usize, slab: &mut Slab<OrderNode>) {
        let node = &mut slab[key];
        let quantity = node.quantity();

        node.prev = self.tail;
        node.next = None;

        match self.tail {
            Some(tail_key) => slab[tail_key].next = Some(key),
            None => self.head = Some(key),
        }

        self.tail = Some(key);
        self.order_count += 1;
        self.total_quantity += quantity;
    }

    /// Unlink an order from the queue by slab key
    ///
    /// The node stays in the slab; the caller owns freeing it.
    ///
    /// # Returns
    ///
    /// The remaining quantity of the unlinked order
    ///
    /// # Panics
    ///
    /// Panics if `key` or one of its neighbours is not present in the slab.
    pub fn remove(&mut self, key: usize, slab: &mut Slab<OrderNode>) -> u64 {
        let node = &slab[key];
        let quantity = node.quantity();
        let prev_key = node.prev;
        let next_key = node.next;

        match prev_key {
            Some(prev) => slab[prev].next = next_key,
            None => self.head = next_key,
        }

        match next_key {
            Some(next) => slab[next].prev = prev_key,
            None => self.tail = prev_key,
        }

        let node = &mut slab[key];
        node.prev = None;
        node.next = None;

        self.order_count -= 1;
        self.total_quantity -= quantity;

        quantity
    }

    /// Replace one order's contribution to the aggregate
    ///
    /// Used for in-place quantity amends; queue position is untouched.
    /// The caller must have checked that the new total fits in a `u64`.
    #[inline]
    pub fn adjust_quantity(&mut self, old_quantity: u64, new_quantity: u64) {
        self.total_quantity = self.total_quantity - old_quantity + new_quantity;
    }

    /// Oldest order's slab key
    #[inline]
    pub fn peek_head(&self) -> Option<usize> {
        self.head
    }

    /// Walk the queue from oldest to newest
    pub fn iter<'a>(&self, slab: &'a Slab<OrderNode>) -> LevelIter<'a> {
        LevelIter {
            slab,
            cursor: self.head,
        }
    }
}

/// FIFO iterator over a level's nodes, yielding `(slab key, node)`
pub struct LevelIter<'a> {
    slab: &'a Slab<OrderNode>,
    cursor: Option<usize>,
}

impl<'a> Iterator for LevelIter<'a> {
    type Item = (usize, &'a OrderNode);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.cursor?;
        let node = self.slab.get(key)?;
        self.cursor = node.next;
        Some((key, node))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
