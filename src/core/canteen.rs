//! Canteen facade and role sessions
//!
//! This module provides the `Canteen` that wires the four repositories
//! together and turns a successful login into a role-specific session.
//!
//! The checkout flow enforces:
//! - An empty cart cannot be checked out
//! - Wallet payment debits the ledger (sufficiency, then wallet password)
//!   before anything is recorded
//! - Cash payment never touches the ledger
//! - Once payment succeeds the cart is cleared, even when the history append
//!   fails (the receipt reports `history_recorded = false`)

use crate::config::StoreConfig;
use crate::core::account_ledger::{AccountLedger, DebitAuth};
use crate::core::cart::{Cart, CartLine};
use crate::core::catalog::Catalog;
use crate::core::identity_store::IdentityStore;
use crate::core::order_ledger::OrderLedger;
use crate::core::traits::{CatalogAdmin, Shopper, WalletAdmin, WalletViewer};
use crate::types::{
    BillRecord, CanteenError, FoodItem, Identity, ItemId, Result, StudentId,
};
use rand::Rng;
use rust_decimal::Decimal;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use tracing::{info, warn};

/// Range of the ephemeral queue numbers handed out for cash orders
pub const QUEUE_NUMBERS: RangeInclusive<u32> = 100..=999;

/// How a cart is settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    /// Debit the student's wallet (requires the wallet password)
    Wallet,
    /// Paid at the counter, no ledger effect
    Cash,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Wallet => f.write_str("wallet"),
            PaymentMethod::Cash => f.write_str("cash"),
        }
    }
}

/// Direction of an admin wallet adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletDirection {
    Add,
    Subtract,
}

impl FromStr for WalletDirection {
    type Err = CanteenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "add" => Ok(WalletDirection::Add),
            "sub" | "subtract" => Ok(WalletDirection::Subtract),
            other => Err(CanteenError::invalid_argument(format!(
                "unknown wallet action '{}'",
                other
            ))),
        }
    }
}

/// Outcome of a successful checkout
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub method: PaymentMethod,
    pub summary: String,
    pub total: Decimal,

    /// Wallet balance after the debit (wallet payments only)
    pub remaining_balance: Option<Decimal>,

    /// Number to present at the counter (cash payments only, never stored)
    pub queue_number: Option<u32>,

    /// False when the bill could not be appended to the history
    pub history_recorded: bool,
}

/// The four record repositories of one data directory
#[derive(Debug)]
pub struct Canteen {
    catalog: Catalog,
    ledger: AccountLedger,
    identities: IdentityStore,
    orders: OrderLedger,
}

impl Canteen {
    /// Build the repositories for the files named by `config`
    ///
    /// No file is touched until an operation runs.
    pub fn open(config: &StoreConfig) -> Self {
        Canteen {
            catalog: Catalog::new(config.food_items_path()),
            ledger: AccountLedger::new(config.wallet_path()),
            identities: IdentityStore::new(config.users_path(), config.students_path()),
            orders: OrderLedger::new(config.bill_history_path()),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &AccountLedger {
        &self.ledger
    }

    pub fn identities(&self) -> &IdentityStore {
        &self.identities
    }

    pub fn orders(&self) -> &OrderLedger {
        &self.orders
    }

    /// Authenticate and open the session matching the user's role
    pub fn login(&self, username: &str, password: &str) -> Result<Session<'_>> {
        let session = match self.identities.authenticate(username, password)? {
            Identity::Admin {
                username,
                canteen_name,
            } => Session::Admin(AdminSession {
                canteen: self,
                username,
                canteen_name,
            }),
            Identity::Student {
                username,
                student_id,
            } => Session::Student(StudentSession {
                canteen: self,
                username,
                student_id,
                cart: Cart::new(),
            }),
        };
        Ok(session)
    }

    /// Register a student; see [`IdentityStore::register`]
    pub fn register(
        &self,
        username: &str,
        password: &str,
        wallet_password: &str,
    ) -> Result<StudentId> {
        self.identities
            .register(username, password, wallet_password, &self.ledger)
    }
}

/// A logged-in user, tagged by role
#[derive(Debug)]
pub enum Session<'a> {
    Admin(AdminSession<'a>),
    Student(StudentSession<'a>),
}

/// Session of a logged-in student; owns the cart
#[derive(Debug)]
pub struct StudentSession<'a> {
    canteen: &'a Canteen,
    username: String,
    student_id: StudentId,
    cart: Cart,
}

impl StudentSession<'_> {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    /// End the session, discarding the cart
    pub fn logout(mut self) {
        self.cart.clear();
        info!(username = %self.username, "student logged out");
    }
}

impl Shopper for StudentSession<'_> {
    fn browse_menu(&self) -> Result<Vec<FoodItem>> {
        self.canteen.catalog.list_items()
    }

    fn add_to_cart(&mut self, item_id: ItemId, quantity: u32) -> Result<CartLine> {
        let item = self.canteen.catalog.get_item(item_id)?;
        self.cart.add_line(&item, quantity).cloned()
    }

    fn cart(&self) -> &Cart {
        &self.cart
    }

    fn checkout(
        &mut self,
        method: PaymentMethod,
        wallet_password: Option<&str>,
    ) -> Result<Receipt> {
        if self.cart.is_empty() {
            return Err(CanteenError::invalid_argument("cart is empty"));
        }
        let total = self.cart.total();

        let (remaining_balance, queue_number) = match method {
            PaymentMethod::Wallet => {
                let provided = wallet_password.ok_or(CanteenError::InvalidPassword)?;
                let remaining = self.canteen.ledger.debit(
                    &self.student_id,
                    total,
                    DebitAuth::WalletPassword {
                        credentials: &self.canteen.identities,
                        provided,
                    },
                )?;
                (Some(remaining), None)
            }
            PaymentMethod::Cash => (None, Some(rand::rng().random_range(QUEUE_NUMBERS))),
        };

        let summary = self.cart.summary();
        let history_recorded =
            match self
                .canteen
                .orders
                .record_order(&self.student_id, self.cart.lines(), total)
            {
                Ok(_) => true,
                Err(e) => {
                    warn!(
                        student_id = %self.student_id,
                        error = %e,
                        "order paid but not written to history"
                    );
                    false
                }
            };
        self.cart.clear();

        info!(student_id = %self.student_id, %method, %total, "checkout completed");
        Ok(Receipt {
            method,
            summary,
            total,
            remaining_balance,
            queue_number,
            history_recorded,
        })
    }
}

impl WalletViewer for StudentSession<'_> {
    fn wallet_balance(&self) -> Result<Decimal> {
        self.canteen.ledger.balance(&self.student_id)
    }

    fn order_history(&self) -> Result<Vec<BillRecord>> {
        self.canteen.orders.history_for(&self.student_id)
    }
}

/// Session of a logged-in admin
#[derive(Debug)]
pub struct AdminSession<'a> {
    canteen: &'a Canteen,
    username: String,
    canteen_name: String,
}

impl AdminSession<'_> {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn canteen_name(&self) -> &str {
        &self.canteen_name
    }

    fn ensure_student(&self, student_id: &str) -> Result<()> {
        if !self.canteen.identities.student_exists(student_id)? {
            return Err(CanteenError::not_found("Student", student_id));
        }
        Ok(())
    }
}

impl CatalogAdmin for AdminSession<'_> {
    fn list_items(&self) -> Result<Vec<FoodItem>> {
        self.canteen.catalog.list_items()
    }

    fn add_item(&self, name: &str, description: &str, price: Decimal) -> Result<FoodItem> {
        self.canteen.catalog.add_item(name, description, price)
    }

    fn update_price(&self, item_id: ItemId, new_price: Decimal) -> Result<FoodItem> {
        self.canteen.catalog.update_price(item_id, new_price)
    }

    fn remove_item(&self, item_id: ItemId) -> Result<FoodItem> {
        self.canteen.catalog.remove_item(item_id)
    }

    fn set_availability(&self, item_id: ItemId, available: bool) -> Result<FoodItem> {
        self.canteen.catalog.set_availability(item_id, available)
    }
}

impl WalletAdmin for AdminSession<'_> {
    fn wallet_balance_of(&self, student_id: &str) -> Result<Decimal> {
        self.ensure_student(student_id)?;
        self.canteen.ledger.balance(student_id)
    }

    fn adjust_wallet(
        &self,
        student_id: &str,
        amount: Decimal,
        direction: WalletDirection,
    ) -> Result<Decimal> {
        self.ensure_student(student_id)?;

        let balance = match direction {
            WalletDirection::Add => self.canteen.ledger.credit(student_id, amount)?,
            WalletDirection::Subtract => {
                self.canteen
                    .ledger
                    .debit(student_id, amount, DebitAuth::Admin)?
            }
        };

        info!(admin = %self.username, student_id, ?direction, %amount, "wallet adjusted by admin");
        Ok(balance)
    }
}
