//! Core business logic module
//!
//! This module contains the canteen's repositories and the session layer:
//! - `traits` - Role capability traits and the credential lookup seam
//! - `catalog` - Menu items and their availability
//! - `account_ledger` - Student wallet balances
//! - `identity_store` - Logins, roles and student registration
//! - `order_ledger` - Append-only history of completed orders
//! - `cart` - Session-scoped shopping cart
//! - `canteen` - Facade that opens role sessions and runs checkout

pub mod account_ledger;
pub mod canteen;
pub mod cart;
pub mod catalog;
pub mod identity_store;
pub mod order_ledger;
pub mod traits;

pub use account_ledger::{AccountLedger, DebitAuth};
pub use canteen::{
    AdminSession, Canteen, PaymentMethod, Receipt, Session, StudentSession, WalletDirection,
};
pub use cart::{Cart, CartLine};
pub use catalog::Catalog;
pub use identity_store::IdentityStore;
pub use order_ledger::OrderLedger;
pub use traits::{CatalogAdmin, CredentialLookup, Shopper, WalletAdmin, WalletViewer};
