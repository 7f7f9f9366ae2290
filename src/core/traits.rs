//! Core traits for role capabilities and credential lookup
//!
//! A login yields either an admin or a student session. Each session kind
//! implements only the capability traits of its role:
//!
//! | Role | Capabilities |
//! |---|---|
//! | admin | [`CatalogAdmin`], [`WalletAdmin`] |
//! | student | [`Shopper`], [`WalletViewer`] |

use crate::core::canteen::{PaymentMethod, Receipt, WalletDirection};
use crate::core::cart::{Cart, CartLine};
use crate::types::{BillRecord, FoodItem, ItemId, Result};
use rust_decimal::Decimal;

/// Source of stored wallet passwords
///
/// Used by the ledger to authorize student-initiated debits.
pub trait CredentialLookup {
    /// The student's wallet password, or `None` when none is stored
    fn wallet_password(&self, student_id: &str) -> Result<Option<String>>;
}

/// Browsing, cart building and checkout
pub trait Shopper {
    /// Every catalog item, available or not
    fn browse_menu(&self) -> Result<Vec<FoodItem>>;

    /// Add `quantity` of a catalog item to the session's cart
    fn add_to_cart(&mut self, item_id: ItemId, quantity: u32) -> Result<CartLine>;

    fn cart(&self) -> &Cart;

    /// Settle the cart and record the order
    ///
    /// `wallet_password` is required for [`PaymentMethod::Wallet`] and
    /// ignored for cash.
    fn checkout(&mut self, method: PaymentMethod, wallet_password: Option<&str>)
        -> Result<Receipt>;
}

/// Read access to the student's own wallet and history
pub trait WalletViewer {
    fn wallet_balance(&self) -> Result<Decimal>;

    fn order_history(&self) -> Result<Vec<BillRecord>>;
}

/// Menu maintenance
pub trait CatalogAdmin {
    fn list_items(&self) -> Result<Vec<FoodItem>>;

    fn add_item(&self, name: &str, description: &str, price: Decimal) -> Result<FoodItem>;

    fn update_price(&self, item_id: ItemId, new_price: Decimal) -> Result<FoodItem>;

    fn remove_item(&self, item_id: ItemId) -> Result<FoodItem>;

    fn set_availability(&self, item_id: ItemId, available: bool) -> Result<FoodItem>;
}

/// Wallet overrides on behalf of any registered student
pub trait WalletAdmin {
    fn wallet_balance_of(&self, student_id: &str) -> Result<Decimal>;

    /// Credit or debit a wallet without a wallet password
    ///
    /// Returns the new balance.
    fn adjust_wallet(
        &self,
        student_id: &str,
        amount: Decimal,
        direction: WalletDirection,
    ) -> Result<Decimal>;
}
