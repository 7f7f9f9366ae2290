//! Explicit seeding of a fresh data directory
//!
//! Nothing in the core calls [`initialize_store`] implicitly; the binary does
//! so at startup unless told otherwise. Only files that do not exist yet are
//! written, so an existing store is never overwritten.

use crate::config::StoreConfig;
use crate::io::record_format::{
    BillRow, CredentialsRow, FoodItemRow, Record, UserRow, WalletRow,
};
use crate::io::record_store::rewrite_all;
use crate::types::{
    BillRecord, CanteenError, FoodItem, Result, StudentCredentials, UserRecord, WalletBalance,
};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Files written by [`initialize_store`]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SeedReport {
    pub created: Vec<PathBuf>,
}

/// Create the base directory and write seed data into every missing file
pub fn initialize_store(config: &StoreConfig) -> Result<SeedReport> {
    fs::create_dir_all(&config.base_dir)
        .map_err(|e| CanteenError::store_unavailable(&config.base_dir, e))?;

    let mut report = SeedReport::default();

    seed_file::<UserRow, _>(&config.users_path(), &seed_users(), &mut report)?;
    seed_file::<CredentialsRow, _>(&config.students_path(), &seed_credentials(), &mut report)?;
    seed_file::<WalletRow, _>(&config.wallet_path(), &seed_wallets(), &mut report)?;
    seed_file::<FoodItemRow, _>(&config.food_items_path(), &seed_food_items(), &mut report)?;
    seed_file::<BillRow, BillRecord>(&config.bill_history_path(), &[], &mut report)?;

    Ok(report)
}

fn seed_file<'a, R, T>(path: &Path, records: &'a [T], report: &mut SeedReport) -> Result<()>
where
    R: Record + From<&'a T>,
{
    if path.exists() {
        return Ok(());
    }
    rewrite_all::<R, T>(path, records)?;
    info!(path = %path.display(), count = records.len(), "seeded store file");
    report.created.push(path.to_path_buf());
    Ok(())
}

fn seed_users() -> Vec<UserRecord> {
    vec![
        UserRecord::admin("admin1", "admin123", "Main Canteen"),
        UserRecord::student("student1", "pass123", "STD101"),
    ]
}

fn seed_credentials() -> Vec<StudentCredentials> {
    vec![StudentCredentials {
        student_id: "STD101".to_string(),
        wallet_password: "wallet123".to_string(),
    }]
}

fn seed_wallets() -> Vec<WalletBalance> {
    vec![WalletBalance {
        student_id: "STD101".to_string(),
        balance: Decimal::new(5000, 1),
    }]
}

fn seed_food_items() -> Vec<FoodItem> {
    vec![
        FoodItem::new(1, "Burger", "Delicious burger", Decimal::from(100)),
        FoodItem::new(2, "Pizza", "Cheesy pizza", Decimal::from(200)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_store_writes_seed_files() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::with_base_dir(dir.path().join("data"));

        let report = initialize_store(&config).unwrap();

        assert_eq!(report.created.len(), 5);
        assert_eq!(
            fs::read_to_string(config.users_path()).unwrap(),
            "admin1|admin123|admin|Main Canteen\nstudent1|pass123|student|STD101\n"
        );
        assert_eq!(
            fs::read_to_string(config.students_path()).unwrap(),
            "STD101|wallet123\n"
        );
        assert_eq!(
            fs::read_to_string(config.wallet_path()).unwrap(),
            "STD101|500.0\n"
        );
        assert_eq!(
            fs::read_to_string(config.food_items_path()).unwrap(),
            "1|Burger|Delicious burger|100|True\n2|Pizza|Cheesy pizza|200|True\n"
        );
        assert_eq!(fs::read_to_string(config.bill_history_path()).unwrap(), "");
    }

    #[test]
    fn test_initialize_store_keeps_existing_files() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::with_base_dir(dir.path());
        fs::write(config.wallet_path(), "STD101|7\n").unwrap();

        let report = initialize_store(&config).unwrap();

        assert_eq!(report.created.len(), 4);
        assert!(!report.created.contains(&config.wallet_path()));
        assert_eq!(fs::read_to_string(config.wallet_path()).unwrap(), "STD101|7\n");
    }
}
