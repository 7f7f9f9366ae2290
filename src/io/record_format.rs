//! Record format handling for the pipe-delimited store files
//!
//! This module centralizes all on-disk format concerns, providing:
//! - Row structures for serialization/deserialization, one per file layout
//! - Conversion from rows to domain types and back
//! - The field guard that keeps the reserved delimiter out of stored values
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{
    BillRecord, CanteenError, FoodItem, ItemId, Role, StudentCredentials, UserRecord,
    WalletBalance,
};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Field delimiter shared by every store file
pub const DELIMITER: u8 = b'|';

/// A row layout stored one-per-line in a record file
///
/// `FIELD_COUNT` is checked before deserialization so that a record with too
/// many or too few fields is reported as a parse error.
pub trait Record: Serialize + DeserializeOwned {
    const FIELD_COUNT: usize;
}

/// `username|password|role|student_id_or_canteen_name`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserRow {
    pub username: String,
    pub password: String,
    pub role: String,
    pub detail: String,
}

/// `student_id|wallet_password`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CredentialsRow {
    pub student_id: String,
    pub wallet_password: String,
}

/// `student_id|balance`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WalletRow {
    pub student_id: String,
    pub balance: String,
}

/// `item_id|name|description|price|availability`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FoodItemRow {
    pub item_id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub available: String,
}

/// `student_id|summary|total`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BillRow {
    pub student_id: String,
    pub summary: String,
    pub total: String,
}

impl Record for UserRow {
    const FIELD_COUNT: usize = 4;
}

impl Record for CredentialsRow {
    const FIELD_COUNT: usize = 2;
}

impl Record for WalletRow {
    const FIELD_COUNT: usize = 2;
}

impl Record for FoodItemRow {
    const FIELD_COUNT: usize = 5;
}

impl Record for BillRow {
    const FIELD_COUNT: usize = 3;
}

/// Parse a decimal amount
///
/// Accepts plain decimal text (`"100"`, `"99.50"`) as well as the scientific
/// notation some float writers produce (`"1e3"`).
pub fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| format!("Invalid amount '{}'", raw))
}

/// Parse availability text, case-insensitively
pub fn parse_availability(raw: &str) -> Result<bool, String> {
    match raw.trim().to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(format!("Invalid availability '{}'", raw)),
    }
}

/// Availability text as written to the food items file
pub fn format_availability(available: bool) -> &'static str {
    if available {
        "True"
    } else {
        "False"
    }
}

/// Reject values that would corrupt the line-oriented encoding
///
/// There is no escaping in the store format, so a value containing the
/// delimiter or a line break can never be stored.
pub fn ensure_field(label: &str, value: &str) -> Result<(), CanteenError> {
    if value.contains(['|', '\n', '\r']) {
        return Err(CanteenError::invalid_argument(format!(
            "{} must not contain '|' or line breaks",
            label
        )));
    }
    Ok(())
}

/// Like [`ensure_field`], also rejecting empty or whitespace-only values
pub fn ensure_non_empty_field(label: &str, value: &str) -> Result<(), CanteenError> {
    if value.trim().is_empty() {
        return Err(CanteenError::invalid_argument(format!(
            "{} must not be empty",
            label
        )));
    }
    ensure_field(label, value)
}

impl TryFrom<UserRow> for UserRecord {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::from_str(row.role.trim())?;
        let record = match role {
            Role::Admin => UserRecord::admin(row.username, row.password, row.detail),
            Role::Student => UserRecord::student(row.username, row.password, row.detail),
        };
        Ok(record)
    }
}

impl From<&UserRecord> for UserRow {
    fn from(record: &UserRecord) -> Self {
        let detail = match record.role {
            Role::Admin => record.canteen_name.clone(),
            Role::Student => record.student_id.clone(),
        };
        UserRow {
            username: record.username.clone(),
            password: record.password.clone(),
            role: record.role.as_str().to_string(),
            detail: detail.unwrap_or_default(),
        }
    }
}

impl TryFrom<CredentialsRow> for StudentCredentials {
    type Error = String;

    fn try_from(row: CredentialsRow) -> Result<Self, Self::Error> {
        Ok(StudentCredentials {
            student_id: row.student_id,
            wallet_password: row.wallet_password,
        })
    }
}

impl From<&StudentCredentials> for CredentialsRow {
    fn from(credentials: &StudentCredentials) -> Self {
        CredentialsRow {
            student_id: credentials.student_id.clone(),
            wallet_password: credentials.wallet_password.clone(),
        }
    }
}

impl TryFrom<WalletRow> for WalletBalance {
    type Error = String;

    fn try_from(row: WalletRow) -> Result<Self, Self::Error> {
        let balance = parse_decimal(&row.balance)?;
        Ok(WalletBalance {
            student_id: row.student_id,
            balance,
        })
    }
}

impl From<&WalletBalance> for WalletRow {
    fn from(wallet: &WalletBalance) -> Self {
        WalletRow {
            student_id: wallet.student_id.clone(),
            balance: wallet.balance.to_string(),
        }
    }
}

impl TryFrom<FoodItemRow> for FoodItem {
    type Error = String;

    fn try_from(row: FoodItemRow) -> Result<Self, Self::Error> {
        let item_id = row
            .item_id
            .trim()
            .parse::<ItemId>()
            .map_err(|_| format!("Invalid item id '{}'", row.item_id))?;
        let price = parse_decimal(&row.price)?;
        let available = parse_availability(&row.available)?;

        Ok(FoodItem {
            item_id,
            name: row.name,
            description: row.description,
            price,
            available,
        })
    }
}

impl From<&FoodItem> for FoodItemRow {
    fn from(item: &FoodItem) -> Self {
        FoodItemRow {
            item_id: item.item_id.to_string(),
            name: item.name.clone(),
            description: item.description.clone(),
            price: item.price.to_string(),
            available: format_availability(item.available).to_string(),
        }
    }
}

impl TryFrom<BillRow> for BillRecord {
    type Error = String;

    fn try_from(row: BillRow) -> Result<Self, Self::Error> {
        let total = parse_decimal(&row.total)?;
        Ok(BillRecord {
            student_id: row.student_id,
            summary: row.summary,
            total,
        })
    }
}

impl From<&BillRecord> for BillRow {
    fn from(bill: &BillRecord) -> Self {
        BillRow {
            student_id: bill.student_id.clone(),
            summary: bill.summary.clone(),
            total: bill.total.to_string(),
        }
    }
}
