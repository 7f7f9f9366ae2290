//! Wallet ledger module
//!
//! This module provides the `AccountLedger` which maintains the stored-value
//! balance of every student in the wallet file.
//!
//! The AccountLedger is responsible for:
//! - Treating a student without a wallet row as a valid empty account
//! - Creating wallet rows on first credit or at registration
//! - Checking sufficiency (and, for student checkout, the wallet password)
//!   before any debit
//! - Keeping at most one row per student id
//!
//! Every mutation loads the whole ledger, changes it in memory and rewrites
//! the whole file while holding the ledger's write lock.

use crate::core::traits::CredentialLookup;
use crate::io::record_format::WalletRow;
use crate::io::record_store::{self, WriteLock};
use crate::types::{CanteenError, Result, WalletBalance};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Authorization presented with a debit
#[derive(Clone, Copy)]
pub enum DebitAuth<'a> {
    /// Admin override: only sufficiency is checked
    Admin,

    /// Student checkout: the provided wallet password must equal the stored
    /// one. A student without a stored wallet password can never pay by
    /// wallet.
    WalletPassword {
        credentials: &'a dyn CredentialLookup,
        provided: &'a str,
    },
}

/// Manages all student wallets and their balances
#[derive(Debug)]
pub struct AccountLedger {
    path: PathBuf,
    write_lock: WriteLock,
}

impl AccountLedger {
    /// Create a ledger backed by the given wallet file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        AccountLedger {
            path: path.into(),
            write_lock: WriteLock::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All wallets in file order
    ///
    /// Duplicate rows for one student are collapsed: the first position is
    /// kept and the last balance wins. The next rewrite drops the duplicate.
    pub fn accounts(&self) -> Result<Vec<WalletBalance>> {
        let rows: Vec<WalletBalance> = record_store::load::<WalletRow, _>(&self.path)?;
        let mut accounts: Vec<WalletBalance> = Vec::with_capacity(rows.len());

        for row in rows {
            match accounts
                .iter_mut()
                .find(|account| account.student_id == row.student_id)
            {
                Some(existing) => {
                    warn!(
                        student_id = %row.student_id,
                        "duplicate wallet row collapsed"
                    );
                    existing.balance = row.balance;
                }
                None => accounts.push(row),
            }
        }

        Ok(accounts)
    }

    /// Current balance of a student
    ///
    /// A student without a wallet row has a balance of zero.
    pub fn balance(&self, student_id: &str) -> Result<Decimal> {
        Ok(self
            .accounts()?
            .into_iter()
            .find(|account| account.student_id == student_id)
            .map_or(Decimal::ZERO, |account| account.balance))
    }

    /// Whether a wallet row exists for the student
    pub fn has_account(&self, student_id: &str) -> Result<bool> {
        Ok(self
            .accounts()?
            .iter()
            .any(|account| account.student_id == student_id))
    }

    /// Create an empty wallet row if none exists
    ///
    /// Returns `true` when a row was created.
    pub fn open_account(&self, student_id: &str) -> Result<bool> {
        let _guard = self.write_lock.hold();
        let mut accounts = self.accounts()?;

        if accounts
            .iter()
            .any(|account| account.student_id == student_id)
        {
            return Ok(false);
        }

        accounts.push(WalletBalance::new(student_id));
        self.store(&accounts)?;

        info!(student_id, "wallet opened");
        Ok(true)
    }

    /// Credit funds into a student's wallet
    ///
    /// Creates the wallet row if absent. Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `amount` is zero or negative
    /// - Adding the amount would overflow
    pub fn credit(&self, student_id: &str, amount: Decimal) -> Result<Decimal> {
        ensure_positive_amount(amount)?;

        let _guard = self.write_lock.hold();
        let mut accounts = self.accounts()?;

        let account = match accounts
            .iter()
            .position(|account| account.student_id == student_id)
        {
            Some(index) => &mut accounts[index],
            None => {
                accounts.push(WalletBalance::new(student_id));
                let last = accounts.len() - 1;
                &mut accounts[last]
            }
        };

        let new_balance = account
            .balance
            .checked_add(amount)
            .ok_or_else(|| CanteenError::arithmetic_overflow("credit"))?;
        account.balance = new_balance;

        self.store(&accounts)?;

        info!(student_id, %amount, balance = %new_balance, "wallet credited");
        Ok(new_balance)
    }

    /// Debit funds from a student's wallet
    ///
    /// Checks run in this order: positive amount, sufficiency, then the
    /// wallet password when `auth` requires one. On any failure the ledger
    /// file is left untouched. Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `amount` is zero or negative (`InvalidArgument`)
    /// - `amount` exceeds the current balance (`InsufficientBalance`)
    /// - The wallet password is wrong or unset (`InvalidPassword`)
    pub fn debit(&self, student_id: &str, amount: Decimal, auth: DebitAuth<'_>) -> Result<Decimal> {
        ensure_positive_amount(amount)?;

        let _guard = self.write_lock.hold();
        let mut accounts = self.accounts()?;

        let index = accounts
            .iter()
            .position(|account| account.student_id == student_id);
        let available = index.map_or(Decimal::ZERO, |i| accounts[i].balance);

        if amount > available {
            return Err(CanteenError::insufficient_balance(
                student_id, available, amount,
            ));
        }

        if let DebitAuth::WalletPassword {
            credentials,
            provided,
        } = auth
        {
            let stored = credentials.wallet_password(student_id)?;
            if stored.as_deref() != Some(provided) {
                return Err(CanteenError::InvalidPassword);
            }
        }

        // amount > 0 and amount <= available, so a row exists here
        let Some(index) = index else {
            return Err(CanteenError::insufficient_balance(
                student_id, available, amount,
            ));
        };
        let account = &mut accounts[index];
        let new_balance = account
            .balance
            .checked_sub(amount)
            .ok_or_else(|| CanteenError::arithmetic_overflow("debit"))?;
        account.balance = new_balance;

        self.store(&accounts)?;

        info!(student_id, %amount, balance = %new_balance, "wallet debited");
        Ok(new_balance)
    }

    fn store(&self, accounts: &[WalletBalance]) -> Result<()> {
        record_store::rewrite_all::<WalletRow, _>(&self.path, accounts)
    }
}

fn ensure_positive_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(CanteenError::invalid_argument(
            "amount must be greater than 0",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    struct FixedCredentials(HashMap<String, String>);

    impl CredentialLookup for FixedCredentials {
        fn wallet_password(&self, student_id: &str) -> Result<Option<String>> {
            Ok(self.0.get(student_id).cloned())
        }
    }

    fn credentials() -> FixedCredentials {
        FixedCredentials(HashMap::from([(
            "STD101".to_string(),
            "wallet123".to_string(),
        )]))
    }

    fn ledger_with(content: &str) -> (TempDir, AccountLedger) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wallet.txt");
        fs::write(&path, content).unwrap();
        (dir, AccountLedger::new(path))
    }

    #[test]
    fn test_balance_of_unknown_student_is_zero() {
        let (_dir, ledger) = ledger_with("STD101|500.0\n");
        assert_eq!(ledger.balance("STD999").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_balance_with_missing_file_is_zero() {
        let dir = TempDir::new().unwrap();
        let ledger = AccountLedger::new(dir.path().join("wallet.txt"));
        assert_eq!(ledger.balance("STD101").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_credit_existing_wallet() {
        let (_dir, ledger) = ledger_with("STD101|500.0\nSTD102|10\n");

        let balance = ledger.credit("STD102", dec!(15.25)).unwrap();

        assert_eq!(balance, dec!(25.25));
        assert_eq!(ledger.balance("STD102").unwrap(), dec!(25.25));
        assert_eq!(ledger.balance("STD101").unwrap(), dec!(500.0));
    }

    #[test]
    fn test_credit_creates_missing_wallet() {
        let (_dir, ledger) = ledger_with("STD101|500.0\n");

        ledger.credit("STD105", dec!(40)).unwrap();

        assert_eq!(
            fs::read_to_string(ledger.path()).unwrap(),
            "STD101|500.0\nSTD105|40\n"
        );
    }

    #[rstest]
    #[case::zero(dec!(0))]
    #[case::negative(dec!(-1))]
    fn test_credit_rejects_non_positive_amount(#[case] amount: Decimal) {
        let (_dir, ledger) = ledger_with("STD101|500.0\n");

        let result = ledger.credit("STD101", amount);

        assert!(matches!(result, Err(CanteenError::InvalidArgument { .. })));
    }

    #[rstest]
    #[case::partial(dec!(500.0), dec!(400), dec!(100.0))]
    #[case::exact(dec!(500.0), dec!(500), dec!(0.0))]
    #[case::cents(dec!(0.30), dec!(0.10), dec!(0.20))]
    fn test_debit_is_decimal_exact(
        #[case] start: Decimal,
        #[case] amount: Decimal,
        #[case] expected: Decimal,
    ) {
        let (_dir, ledger) = ledger_with(&format!("STD101|{}\n", start));

        let balance = ledger.debit("STD101", amount, DebitAuth::Admin).unwrap();

        assert_eq!(balance, expected);
        assert_eq!(ledger.balance("STD101").unwrap(), expected);
    }

    #[test]
    fn test_debit_insufficient_balance_leaves_file_untouched() {
        let (_dir, ledger) = ledger_with("STD101|300.0\n");
        let before = fs::read(ledger.path()).unwrap();

        let result = ledger.debit("STD101", dec!(400), DebitAuth::Admin);

        assert_eq!(
            result,
            Err(CanteenError::insufficient_balance(
                "STD101",
                dec!(300.0),
                dec!(400)
            ))
        );
        assert_eq!(fs::read(ledger.path()).unwrap(), before);
    }

    #[test]
    fn test_debit_unknown_student_is_insufficient() {
        let (_dir, ledger) = ledger_with("STD101|300.0\n");

        let result = ledger.debit("STD200", dec!(1), DebitAuth::Admin);

        assert!(matches!(
            result,
            Err(CanteenError::InsufficientBalance { .. })
        ));
        assert!(!ledger.has_account("STD200").unwrap());
    }

    #[test]
    fn test_debit_with_correct_wallet_password() {
        let (_dir, ledger) = ledger_with("STD101|500.0\n");
        let credentials = credentials();

        let balance = ledger
            .debit(
                "STD101",
                dec!(400),
                DebitAuth::WalletPassword {
                    credentials: &credentials,
                    provided: "wallet123",
                },
            )
            .unwrap();

        assert_eq!(balance, dec!(100.0));
    }

    #[rstest]
    #[case::wrong_password("STD101", "nope")]
    #[case::unset_password("STD102", "")]
    fn test_debit_rejects_bad_wallet_password(#[case] student_id: &str, #[case] provided: &str) {
        let (_dir, ledger) = ledger_with("STD101|500.0\nSTD102|500.0\n");
        let credentials = credentials();

        let result = ledger.debit(
            student_id,
            dec!(10),
            DebitAuth::WalletPassword {
                credentials: &credentials,
                provided,
            },
        );

        assert_eq!(result, Err(CanteenError::InvalidPassword));
        assert_eq!(ledger.balance(student_id).unwrap(), dec!(500.0));
    }

    #[test]
    fn test_insufficiency_is_reported_before_password() {
        let (_dir, ledger) = ledger_with("STD101|5\n");
        let credentials = credentials();

        let result = ledger.debit(
            "STD101",
            dec!(10),
            DebitAuth::WalletPassword {
                credentials: &credentials,
                provided: "nope",
            },
        );

        assert!(matches!(
            result,
            Err(CanteenError::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn test_open_account_is_idempotent() {
        let (_dir, ledger) = ledger_with("STD101|500.0\n");

        assert!(ledger.open_account("STD102").unwrap());
        assert!(!ledger.open_account("STD102").unwrap());
        assert!(!ledger.open_account("STD101").unwrap());

        assert_eq!(
            fs::read_to_string(ledger.path()).unwrap(),
            "STD101|500.0\nSTD102|0\n"
        );
    }

    #[test]
    fn test_duplicate_rows_collapse_on_next_rewrite() {
        let (_dir, ledger) = ledger_with("STD101|500.0\nSTD102|1\nSTD101|70\n");

        assert_eq!(ledger.balance("STD101").unwrap(), dec!(70));
        ledger.credit("STD102", dec!(1)).unwrap();

        assert_eq!(
            fs::read_to_string(ledger.path()).unwrap(),
            "STD101|70\nSTD102|2\n"
        );
    }

    #[test]
    fn test_concurrent_credits_are_not_lost() {
        let (_dir, ledger) = ledger_with("STD101|0\n");

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..10 {
                        ledger.credit("STD101", dec!(1)).unwrap();
                    }
                });
            }
        });

        assert_eq!(ledger.balance("STD101").unwrap(), dec!(40));
    }
}
