//! Order node for slab-based storage.
//!
//! ## Design
//!
//! `OrderNode` wraps an `Order` with doubly-linked list pointers so the
//! order can be unlinked from its price level in O(1) given its slab key.
//!
//! ## Slab Integration
//!
//! Per slab docs (https://docs.rs/slab/0.4.11):
//! - Keys are `usize` values returned by `slab.insert()`
//! - Keys may be reused after `slab.remove()`
//! - O(1) insert, remove, and lookup
//!
//! A key stays valid for as long as the order rests in the book, even when
//! the slab grows, which is what lets the order index hold it.
//!
//! ## Linked List
//!
//! Orders at the same price level form a doubly-linked list:
//! - `next`: the next (newer) order in the level
//! - `prev`: the previous (older) order in the level

use crate::types::{Order, Side};

/// Order node stored in the slab.
///
/// The pointers are slab keys (`usize`), not references.
#[derive(Debug, Clone)]
pub struct OrderNode {
    /// The resting order
    pub order: Order,

    /// Next order in the level queue, None at the tail (newest)
    pub next: Option<usize>,

    /// Previous order in the level queue, None at the head (oldest)
    pub prev: Option<usize>,
}

impl OrderNode {
    /// Create a new, unlinked node
    ///
    /// ```
    /// use lob_core::orderbook::OrderNode;
    /// use lob_core::types::{Order, Side};
    ///
    /// let node = OrderNode::new(Order::new(1, Side::Buy, 10_000_000_000, 50, 0));
    /// assert!(node.is_unlinked());
    /// ```
    #[inline]
    pub fn new(order: Order) -> Self {
        Self {
            order,
            next: None,
            prev: None,
        }
    }

    /// Check if this node has no neighbours
    #[inline]
    pub fn is_unlinked(&self) -> bool {
        self.next.is_none() && self.prev.is_none()
    }

    #[inline]
    pub fn order_id(&self) -> u64 {
        self.order.id
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.order.side()
    }

    #[inline]
    pub fn price(&self) -> u64 {
        self.order.price
    }

    #[inline]
    pub fn quantity(&self) -> u64 {
        self.order.quantity
    }

    /// Overwrite the remaining quantity, returning the previous value
    #[inline]
    pub fn set_quantity(&mut self, quantity: u64) -> u64 {
        std::mem::replace(&mut self.order.quantity, quantity)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
