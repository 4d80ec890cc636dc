//! Core data types for the limit order book
//!
//! ## Types
//!
//! - [`Order`]: A resting limit order
//! - [`Side`]: Buy or Sell
//! - [`LevelSummary`] / [`Snapshot`]: Aggregated depth view
//! - [`BookError`]: Rejections reported by book operations
//!
//! ## Fixed-Point Arithmetic
//!
//! All prices are stored as `u64` scaled by 10^8; quantities are unscaled `u64`
//! whole units.
//! Example: 99.5 is stored as 9_950_000_000u64

mod error;
mod order;
mod snapshot;
pub mod price;

pub use error::BookError;
pub use order::{Order, Side};
pub use snapshot::{LevelSummary, Snapshot};
