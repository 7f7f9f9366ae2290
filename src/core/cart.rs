//! Session-scoped shopping cart
//!
//! A Cart is owned by exactly one student session and never persisted. Each
//! line keeps a snapshot of the food item as it was when added, so a price
//! change in the catalog does not alter a cart already being built.

use crate::core::order_ledger::summarize;
use crate::types::{CanteenError, FoodItem, Result};
use rust_decimal::Decimal;

/// One selected item and its quantity
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub item: FoodItem,
    pub quantity: u32,
}

impl CartLine {
    /// `price × quantity`
    pub fn subtotal(&self) -> Result<Decimal> {
        self.item
            .price
            .checked_mul(Decimal::from(self.quantity))
            .ok_or_else(|| CanteenError::arithmetic_overflow("cart subtotal"))
    }
}

/// Ordered cart lines with a running total
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
    total: Decimal,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line and add its subtotal to the running total
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `quantity` is zero or the item is
    /// unavailable, and `ArithmeticOverflow` if the total would overflow.
    pub fn add_line(&mut self, item: &FoodItem, quantity: u32) -> Result<&CartLine> {
        if quantity == 0 {
            return Err(CanteenError::invalid_argument(
                "quantity must be greater than 0",
            ));
        }
        if !item.available {
            return Err(CanteenError::invalid_argument(format!(
                "'{}' is currently unavailable",
                item.name
            )));
        }

        let line = CartLine {
            item: item.clone(),
            quantity,
        };
        let total = self
            .total
            .checked_add(line.subtotal()?)
            .ok_or_else(|| CanteenError::arithmetic_overflow("cart total"))?;

        self.total = total;
        self.lines.push(line);
        Ok(&self.lines[self.lines.len() - 1])
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// `"2x Burger; 1x Pizza"`
    pub fn summary(&self) -> String {
        summarize(&self.lines)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.total = Decimal::ZERO;
    }
}
