//! Benchmark suite for record file loading and rewriting
//!
//! Every repository operation loads a whole record file, so load and
//! rewrite cost grows with file size. These benchmarks measure that cost
//! using the divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```
//!
//! Fixture stores are generated into a temporary directory with 100, 1,000
//! and 10,000 rows per file.

use canteen_ledger::core::{AccountLedger, Catalog, OrderLedger};
use rust_decimal::Decimal;
use std::fmt::Write as _;
use std::fs;
use tempfile::TempDir;

const SIZES: &[usize] = &[100, 1_000, 10_000];

fn main() {
    divan::main();
}

fn food_items(rows: usize) -> String {
    let mut content = String::new();
    for id in 1..=rows {
        let _ = writeln!(content, "{}|Item {}|Tasty item number {}|{}.50|True", id, id, id, id % 300 + 1);
    }
    content
}

fn wallets(rows: usize) -> String {
    let mut content = String::new();
    for n in 0..rows {
        let _ = writeln!(content, "STD{:03}|{}.25", 101 + n, n * 10);
    }
    content
}

fn bills(rows: usize) -> String {
    let mut content = String::new();
    for n in 0..rows {
        let _ = writeln!(content, "STD{:03}|2x Burger; 1x Pizza|400", 101 + n % 50);
    }
    content
}

fn store_with(file_name: &str, content: String) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(dir.path().join(file_name), content).expect("Failed to write fixture");
    dir
}

/// Load the full catalog
#[divan::bench(args = SIZES)]
fn catalog_list_items(bencher: divan::Bencher, rows: usize) {
    let dir = store_with("food_items.txt", food_items(rows));
    let catalog = Catalog::new(dir.path().join("food_items.txt"));

    bencher.bench_local(|| catalog.list_items().expect("Load failed"));
}

/// Load, mutate and atomically rewrite the catalog
#[divan::bench(args = SIZES)]
fn catalog_update_price(bencher: divan::Bencher, rows: usize) {
    let dir = store_with("food_items.txt", food_items(rows));
    let catalog = Catalog::new(dir.path().join("food_items.txt"));

    bencher.bench_local(|| {
        catalog
            .update_price(1, Decimal::new(9950, 2))
            .expect("Update failed")
    });
}

/// Balance lookup of the last wallet in the file
#[divan::bench(args = SIZES)]
fn ledger_balance(bencher: divan::Bencher, rows: usize) {
    let dir = store_with("wallet.txt", wallets(rows));
    let ledger = AccountLedger::new(dir.path().join("wallet.txt"));
    let last = format!("STD{:03}", 100 + rows);

    bencher.bench_local(|| ledger.balance(&last).expect("Lookup failed"));
}

/// Credit a wallet, rewriting the whole ledger
#[divan::bench(args = SIZES)]
fn ledger_credit(bencher: divan::Bencher, rows: usize) {
    let dir = store_with("wallet.txt", wallets(rows));
    let ledger = AccountLedger::new(dir.path().join("wallet.txt"));

    bencher.bench_local(|| ledger.credit("STD101", Decimal::ONE).expect("Credit failed"));
}

/// Filter one student's orders out of the history
#[divan::bench(args = SIZES)]
fn order_history_for(bencher: divan::Bencher, rows: usize) {
    let dir = store_with("bill_history.txt", bills(rows));
    let orders = OrderLedger::new(dir.path().join("bill_history.txt"));

    bencher.bench_local(|| orders.history_for("STD101").expect("Load failed"));
}
