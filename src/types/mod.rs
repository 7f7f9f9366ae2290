//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `food_item`: Catalog entries
//! - `wallet`: Stored-value wallet balances
//! - `user`: Credentials, roles and authenticated identities
//! - `bill`: Completed-order history records
//! - `error`: Error types for the canteen ledger

pub mod bill;
pub mod error;
pub mod food_item;
pub mod user;
pub mod wallet;

pub use bill::BillRecord;
pub use error::{CanteenError, Result};
pub use food_item::{FoodItem, ItemId};
pub use user::{Identity, Role, StudentCredentials, StudentId, UserRecord};
pub use wallet::WalletBalance;
