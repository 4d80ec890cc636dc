//! # lob-core
//!
//! In-memory limit order book with price-time priority.
//!
//! ## Architecture
//!
//! - **Types**: Order, Side, fixed-point prices, depth snapshots, errors
//! - **OrderBook**: price levels, FIFO queues and an order index kept consistent
//!
//! The book is pure bookkeeping: it stores, amends and removes resting orders
//! and answers depth queries. It does not match orders.
//!
//! ## Design Principles
//!
//! 1. **Exact prices**: fixed-point `u64` (10^8 scaling), so level lookup is integer equality
//! 2. **Stable keys**: orders live in a slab; queues and the index refer to slab keys
//! 3. **Synchronous execution**: no locks, no async; one caller at a time
//! 4. **All-or-nothing**: a rejected call leaves the book untouched
//!
//! ## Example
//!
//! ```
//! use lob_core::{OrderBook, Order, Side};
//! use lob_core::types::price::price_from_f64;
//!
//! let mut book = OrderBook::new();
//! let p100 = price_from_f64(100.0).unwrap();
//!
//! book.add_order(Order::new(1, Side::Buy, p100, 50, 0)).unwrap();
//! book.amend_order(1, p100, 75).unwrap();
//!
//! let snap = book.snapshot(5);
//! assert_eq!(snap.bids[0].total_quantity, 75);
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Order, Side, Snapshot, BookError
pub mod types;

/// Order book: slab-backed levels and order index
pub mod orderbook;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use types::{BookError, LevelSummary, Order, Side, Snapshot};
pub use orderbook::{AmendOutcome, OrderBook, OrderLocation, PriceLevel};
