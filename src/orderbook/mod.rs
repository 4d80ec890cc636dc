//! Order book module.
//!
//! ## Architecture
//!
//! - **Slab-based storage**: every resting order lives in one arena slot,
//!   addressed by a stable `usize` key
//! - **Price levels**: FIFO queues linked through the slab by key
//! - **Book sides**: `BTreeMap` of levels per side, best price first
//! - **Order index**: `HashMap` from order ID to (side, price, key)
//!
//! ## Components
//!
//! - [`OrderNode`]: `Order` plus prev/next slab keys
//! - [`PriceLevel`]: one price's FIFO queue and aggregate quantity
//! - [`BookSide`]: sorted levels for one side ([`Bids`], [`Asks`])
//! - [`OrderBook`]: the three indices kept in lockstep
//!
//! ## Example
//!
//! ```
//! use lob_core::orderbook::OrderBook;
//! use lob_core::types::{Order, Side};
//!
//! let mut book = OrderBook::with_capacity(10_000);
//! book.add_order(Order::new(1, Side::Buy, 10_000_000_000, 50, 0)).unwrap();
//!
//! assert_eq!(book.best_bid(), Some(10_000_000_000));
//! ```

pub mod node;
pub mod level;
pub mod side;
pub mod book;

pub use node::OrderNode;
pub use level::{LevelIter, PriceLevel};
pub use side::{AskOrdering, Asks, BidOrdering, Bids, BookSide, SideOrdering};
pub use book::{AmendOutcome, OrderBook, OrderLocation};
