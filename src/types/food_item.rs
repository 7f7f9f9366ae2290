//! Catalog entry types
//!
//! This module defines the FoodItem structure sold at the canteen counter.

use rust_decimal::Decimal;

/// Food item identifier
///
/// Assigned as one plus the largest identifier in the catalog.
pub type ItemId = u32;

/// A purchasable menu entry
#[derive(Debug, Clone, PartialEq)]
pub struct FoodItem {
    /// Unique identifier, never zero
    pub item_id: ItemId,

    /// Display name, also used in bill summaries
    pub name: String,

    /// Free-text description
    pub description: String,

    /// Unit price, always greater than zero
    pub price: Decimal,

    /// Whether the item can currently be added to a cart
    pub available: bool,
}

impl FoodItem {
    /// Create a new, available food item
    pub fn new(
        item_id: ItemId,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
    ) -> Self {
        FoodItem {
            item_id,
            name: name.into(),
            description: description.into(),
            price,
            available: true,
        }
    }
}
