//! Order history storage
//!
//! This module provides the OrderLedger component that keeps an append-only
//! history of completed checkouts. Records are never updated or deleted.

use crate::core::cart::CartLine;
use crate::io::record_format::{ensure_field, BillRow};
use crate::io::record_store::{self, WriteLock};
use crate::types::{BillRecord, Result};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tracing::info;

/// Append-only bill history
#[derive(Debug)]
pub struct OrderLedger {
    path: PathBuf,
    write_lock: WriteLock,
}

impl OrderLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        OrderLedger {
            path: path.into(),
            write_lock: WriteLock::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one bill built from a cart snapshot
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the history file cannot be written, or
    /// `InvalidArgument` if an item name would corrupt the record.
    pub fn record_order(
        &self,
        student_id: &str,
        lines: &[CartLine],
        total: Decimal,
    ) -> Result<BillRecord> {
        let bill = BillRecord {
            student_id: student_id.to_string(),
            summary: summarize(lines),
            total,
        };
        ensure_field("Order summary", &bill.summary)?;

        let _guard = self.write_lock.hold();
        record_store::append::<BillRow, _>(&self.path, &bill)?;

        info!(student_id, summary = %bill.summary, %total, "order recorded");
        Ok(bill)
    }

    /// Every bill of one student in chronological (file) order
    pub fn history_for(&self, student_id: &str) -> Result<Vec<BillRecord>> {
        let bills: Vec<BillRecord> = record_store::load::<BillRow, _>(&self.path)?;
        Ok(bills
            .into_iter()
            .filter(|bill| bill.student_id == student_id)
            .collect())
    }
}

/// `"qty x name"` entries joined with `"; "`
pub fn summarize(lines: &[CartLine]) -> String {
    lines
        .iter()
        .map(|line| format!("{}x {}", line.quantity, line.item.name))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FoodItem;
    use rust_decimal_macros::dec;
    use std::fs;
    use tempfile::TempDir;

    fn lines() -> Vec<CartLine> {
        vec![
            CartLine {
                item: FoodItem::new(1, "Burger", "Delicious burger", dec!(100)),
                quantity: 2,
            },
            CartLine {
                item: FoodItem::new(2, "Pizza", "Cheesy pizza", dec!(200)),
                quantity: 1,
            },
        ]
    }

    #[test]
    fn test_summarize() {
        assert_eq!(summarize(&lines()), "2x Burger; 1x Pizza");
        assert_eq!(summarize(&[]), "");
    }

    #[test]
    fn test_record_order_appends() {
        let dir = TempDir::new().unwrap();
        let ledger = OrderLedger::new(dir.path().join("bill_history.txt"));

        ledger.record_order("STD101", &lines(), dec!(400)).unwrap();
        ledger.record_order("STD102", &lines()[..1], dec!(200)).unwrap();

        assert_eq!(
            fs::read_to_string(ledger.path()).unwrap(),
            "STD101|2x Burger; 1x Pizza|400\nSTD102|2x Burger|200\n"
        );
    }

    #[test]
    fn test_history_for_filters_by_student_in_file_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bill_history.txt");
        fs::write(
            &path,
            "STD101|1x Burger|100.0\nSTD102|1x Pizza|200.0\nSTD101|2x Pizza|400.0\n",
        )
        .unwrap();
        let ledger = OrderLedger::new(path);

        let history = ledger.history_for("STD101").unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].summary, "1x Burger");
        assert_eq!(history[1].total, dec!(400.0));
        assert!(ledger.history_for("STD999").unwrap().is_empty());
    }

    #[test]
    fn test_history_with_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let ledger = OrderLedger::new(dir.path().join("bill_history.txt"));
        assert!(ledger.history_for("STD101").unwrap().is_empty());
    }
}
