//! Wallet-related types for the canteen ledger

use super::user::StudentId;
use rust_decimal::Decimal;

/// Stored-value balance of one student
///
/// At most one record exists per student id. The balance never drops below
/// zero between operations because every debit is checked for sufficiency
/// first.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletBalance {
    /// The owning student
    pub student_id: StudentId,

    /// Current balance
    pub balance: Decimal,
}

impl WalletBalance {
    /// Create an empty wallet for the student
    pub fn new(student_id: impl Into<StudentId>) -> Self {
        WalletBalance {
            student_id: student_id.into(),
            balance: Decimal::ZERO,
        }
    }
}
