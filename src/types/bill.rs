//! Completed-order history records

use super::user::StudentId;
use rust_decimal::Decimal;

/// One completed checkout
///
/// Items are referenced by name in `summary` (e.g. `"2x Burger; 1x Pizza"`),
/// so renaming a food item later does not rewrite history.
#[derive(Debug, Clone, PartialEq)]
pub struct BillRecord {
    /// Student who placed the order
    pub student_id: StudentId,

    /// Semicolon-joined `"qty x name"` list
    pub summary: String,

    /// Amount charged for the order
    pub total: Decimal,
}
