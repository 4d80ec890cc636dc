//! lob-core - demo driver
//!
//! Replays a short add / cancel / amend sequence against a fresh book and
//! prints the depth ladder after each step.
//!
//! Environment:
//! - `LOB_DEPTH`: levels shown per side (default 10)
//! - `LOB_CAPACITY`: pre-allocated order slots (default 10_000)
//! - `RUST_LOG`: log verbosity, e.g. `RUST_LOG=lob_core=debug`

use std::error::Error;
use std::time::{SystemTime, UNIX_EPOCH};

use lob_core::types::price::price_from_f64;
use lob_core::{Order, OrderBook, Side};

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn timestamp_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn tick(price: f64) -> Result<u64, Box<dyn Error>> {
    Ok(price_from_f64(price).ok_or_else(|| format!("invalid price {price}"))?)
}

fn order(id: u64, side: Side, price: f64, quantity: u64) -> Result<Order, Box<dyn Error>> {
    Ok(Order::new(id, side, tick(price)?, quantity, timestamp_ns()))
}

fn show(book: &OrderBook, depth: usize, title: &str) {
    println!("{title}");
    println!("{}", book.snapshot(depth));
}

fn main() -> Result<(), Box<dyn Error>> {
    let _ = env_logger::try_init();

    let depth: usize = env_or("LOB_DEPTH", 10);
    let capacity: usize = env_or("LOB_CAPACITY", 10_000);

    println!("===========================================");
    println!("  lob-core - Limit Order Book");
    println!("===========================================");
    println!();

    let mut book = OrderBook::with_capacity(capacity);

    book.add_order(order(1, Side::Buy, 100.0, 50)?)?;
    book.add_order(order(2, Side::Buy, 100.0, 30)?)?;
    book.add_order(order(3, Side::Buy, 99.0, 100)?)?;
    book.add_order(order(4, Side::Sell, 101.0, 40)?)?;
    book.add_order(order(5, Side::Sell, 102.0, 60)?)?;
    book.add_order(order(6, Side::Sell, 101.0, 20)?)?;
    show(&book, depth, "After adds:");

    book.cancel_order(2)?;
    show(&book, depth, "After cancelling order 2:");

    if let Err(e) = book.cancel_order(999) {
        println!("Cancel 999: {e}");
        println!();
    }

    book.amend_order(1, tick(100.0)?, 75)?;
    show(&book, depth, "After amending order 1 quantity 50 -> 75:");

    book.amend_order(1, tick(99.5)?, 75)?;
    show(&book, depth, "After amending order 1 price 100.00 -> 99.50:");

    println!(
        "Resting orders: {} ({} bids, {} asks)",
        book.order_count(),
        book.bid_count(),
        book.ask_count()
    );
    println!("State root:     {}", book.state_root_hex()?);

    Ok(())
}
