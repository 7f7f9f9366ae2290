//! Canteen Ledger Library
//! # Overview
//!
//! This library provides a canteen point-of-sale and student wallet ledger
//! persisted in pipe-delimited record files.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (FoodItem, WalletBalance, UserRecord, etc.)
//! - [`config`] - Location of the record files
//! - [`cli`] - CLI arguments parsing and the interactive console
//! - [`core`] - Business logic components:
//!   - [`core::catalog`] - Menu maintenance
//!   - [`core::account_ledger`] - Wallet balances, credits and debits
//!   - [`core::identity_store`] - Authentication and registration
//!   - [`core::order_ledger`] - Bill history
//!   - [`core::canteen`] - Role sessions and checkout
//! - [`io`] - Record file format, atomic rewrites and seeding
//!
//! # Roles
//!
//! - **Admin**: maintains the menu and adjusts any student's wallet
//! - **Student**: browses the menu, builds a cart, pays by wallet or cash and
//!   reviews their own balance and order history
//!
//! # Record Files
//!
//! | File | Row |
//! |---|---|
//! | `users.txt` | `username\|password\|role\|studentId or canteenName` |
//! | `students.txt` | `studentId\|walletPassword` |
//! | `wallet.txt` | `studentId\|balance` |
//! | `food_items.txt` | `itemId\|name\|description\|price\|available` |
//! | `bill_history.txt` | `studentId\|summary\|total` |

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod types;

pub use config::StoreConfig;
pub use core::{
    AccountLedger, Canteen, Catalog, IdentityStore, OrderLedger, PaymentMethod, Receipt, Session,
};
pub use io::initialize_store;
pub use types::{
    BillRecord, CanteenError, FoodItem, Identity, ItemId, Role, StudentId, UserRecord,
    WalletBalance,
};
