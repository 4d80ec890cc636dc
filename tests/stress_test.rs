//! Stress tests for the order book.
//!
//! These tests verify:
//! 1. Throughput of mixed add / cancel / amend workloads
//! 2. The book stays internally consistent under load
//! 3. Determinism: the same seeded workload yields the same state root
//!
//! ## Running Stress Tests
//!
//! ```bash
//! cargo test --release --test stress_test -- --nocapture
//! ```

use std::time::Instant;

use lob_core::{Order, OrderBook, Side};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

/// Base price: 100.00000000 (fixed-point)
const BASE_PRICE: u64 = 10_000_000_000;

/// Price tick: 0.01 (fixed-point)
const TICK: u64 = 1_000_000;

/// Number of operations in the mixed workload
const OPERATION_COUNT: usize = 200_000;

/// Floor for mixed-operation throughput (ops/sec); loose enough for debug builds
const MIN_THROUGHPUT: f64 = 20_000.0;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Random order around BASE_PRICE: bids below it, asks above it
fn random_order(rng: &mut ChaCha8Rng, id: u64) -> Order {
    let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
    let offset = rng.gen_range(0..100u64) * TICK;
    let price = match side {
        Side::Buy => BASE_PRICE - TICK - offset,
        Side::Sell => BASE_PRICE + offset,
    };
    let quantity = rng.gen_range(1..=1_000);
    Order::new(id, side, price, quantity, id)
}

/// Run a seeded add / cancel / amend mix and return the final book.
fn run_workload(seed: u64, operations: usize) -> OrderBook {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut book = OrderBook::with_capacity(operations);
    let mut live: Vec<u64> = Vec::new();
    let mut next_id = 1u64;

    for _ in 0..operations {
        let roll: f64 = rng.gen();
        if live.is_empty() || roll < 0.5 {
            let order = random_order(&mut rng, next_id);
            book.add_order(order).unwrap();
            live.push(next_id);
            next_id += 1;
        } else if roll < 0.8 {
            let idx = rng.gen_range(0..live.len());
            let id = live.swap_remove(idx);
            book.cancel_order(id).unwrap();
        } else {
            let idx = rng.gen_range(0..live.len());
            let id = live[idx];
            let current = book.get_order(id).unwrap().price;
            let new_price = if rng.gen_bool(0.5) {
                current
            } else if current < BASE_PRICE {
                BASE_PRICE - TICK - rng.gen_range(0..100u64) * TICK
            } else {
                BASE_PRICE + rng.gen_range(0..100u64) * TICK
            };
            let new_quantity = rng.gen_range(1..=1_000);
            book.amend_order(id, new_price, new_quantity).unwrap();
        }
    }

    book
}

// ============================================================================
// STRESS TESTS
// ============================================================================

#[test]
fn stress_mixed_operations() {
    println!("\n=== STRESS TEST: {} mixed operations ===\n", OPERATION_COUNT);

    let start = Instant::now();
    let book = run_workload(42, OPERATION_COUNT);
    let elapsed = start.elapsed();

    let throughput = OPERATION_COUNT as f64 / elapsed.as_secs_f64();

    println!("  Final book size:   {:>12}", book.order_count());
    println!("  Bid levels:        {:>12}", book.bid_levels());
    println!("  Ask levels:        {:>12}", book.ask_levels());
    println!("  Elapsed time:      {:>12.2?}", elapsed);
    println!("  Throughput:        {:>12.0} ops/sec", throughput);

    book.check_invariants().unwrap();
    assert!(book.bid_levels() <= 100);
    assert!(book.ask_levels() <= 100);
    assert!(
        throughput >= MIN_THROUGHPUT,
        "Throughput {:.0} ops/sec below floor {:.0}",
        throughput,
        MIN_THROUGHPUT
    );
}

/// Same seed, same book; different seed, different book.
#[test]
fn verify_determinism() {
    const COUNT: usize = 10_000;

    let root1 = run_workload(12345, COUNT).state_root().unwrap();
    let root2 = run_workload(12345, COUNT).state_root().unwrap();
    println!("  Run 1 state root: {}", hex::encode(root1));
    println!("  Run 2 state root: {}", hex::encode(root2));
    assert_eq!(root1, root2, "State roots must match for identical input");

    let root3 = run_workload(12346, COUNT).state_root().unwrap();
    assert_ne!(root1, root3, "Different seeds should produce different roots");
}

/// Cancel every other order from a large book, then drain it completely.
#[test]
fn stress_cancel_drain() {
    const ORDER_COUNT: u64 = 10_000;

    let mut book = OrderBook::with_capacity(ORDER_COUNT as usize);
    for i in 0..ORDER_COUNT {
        let side = if i % 2 == 0 { Side::Buy } else { Side::Sell };
        let price = BASE_PRICE + (i % 100) * TICK;
        book.add_order(Order::new(i, side, price, 100, i)).unwrap();
    }
    assert_eq!(book.order_count(), ORDER_COUNT as usize);

    let start = Instant::now();
    for i in (0..ORDER_COUNT).step_by(2) {
        book.cancel_order(i).unwrap();
    }
    println!("  Cancelled {} orders in {:.2?}", ORDER_COUNT / 2, start.elapsed());

    assert_eq!(book.bid_count(), 0);
    assert_eq!(book.bid_levels(), 0);
    assert_eq!(book.ask_count(), (ORDER_COUNT / 2) as usize);
    book.check_invariants().unwrap();

    let start = Instant::now();
    for _ in 0..1_000 {
        let snap = book.snapshot(10);
        assert_eq!(snap.asks.len(), 10);
    }
    println!("  1000 snapshots in {:.2?}", start.elapsed());

    for i in (1..ORDER_COUNT).step_by(2) {
        book.cancel_order(i).unwrap();
    }
    assert!(book.is_empty());
    assert!(book.snapshot(10).is_empty());
    book.check_invariants().unwrap();
}

/// Slab slots are reused once orders leave the book.
#[test]
fn stress_memory_stability() {
    const ROUNDS: u64 = 50;
    const BATCH: u64 = 1_000;

    let mut book = OrderBook::with_capacity(BATCH as usize);
    let initial_capacity = book.capacity();

    for round in 0..ROUNDS {
        for i in 0..BATCH {
            let id = round * BATCH + i;
            book.add_order(Order::new(id, Side::Sell, BASE_PRICE + (i % 10) * TICK, 1, id))
                .unwrap();
        }
        for i in 0..BATCH {
            book.cancel_order(round * BATCH + i).unwrap();
        }
        assert!(book.is_empty());
    }

    assert_eq!(book.capacity(), initial_capacity);
}
