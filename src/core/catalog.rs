//! Menu catalog repository
//!
//! This module provides the `Catalog` which owns the food items file. Every
//! mutation loads the full catalog, changes it in memory and rewrites the
//! whole file; there is no partial update.
//!
//! The Catalog is responsible for:
//! - Listing items in file (insertion) order
//! - Assigning item ids as one plus the largest existing id
//! - Enforcing strictly positive prices
//! - Leaving the file untouched when a lookup fails

use crate::io::record_format::{ensure_field, ensure_non_empty_field, FoodItemRow};
use crate::io::record_store::{self, WriteLock};
use crate::types::{CanteenError, FoodItem, ItemId, Result};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tracing::info;

/// Repository of purchasable food items
#[derive(Debug)]
pub struct Catalog {
    path: PathBuf,
    write_lock: WriteLock,
}

impl Catalog {
    /// Create a catalog backed by the given food items file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Catalog {
            path: path.into(),
            write_lock: WriteLock::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All items in insertion order
    pub fn list_items(&self) -> Result<Vec<FoodItem>> {
        record_store::load::<FoodItemRow, _>(&self.path)
    }

    /// Look up one item by id
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no item has `item_id`.
    pub fn get_item(&self, item_id: ItemId) -> Result<FoodItem> {
        self.list_items()?
            .into_iter()
            .find(|item| item.item_id == item_id)
            .ok_or_else(|| CanteenError::not_found("Food item", item_id))
    }

    /// Add a new, available item and persist the catalog
    ///
    /// The new id is one plus the largest existing id, or 1 for an empty
    /// catalog.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if:
    /// - `price` is zero or negative
    /// - `name` is empty
    /// - `name` or `description` contains `|` or a line break
    pub fn add_item(&self, name: &str, description: &str, price: Decimal) -> Result<FoodItem> {
        ensure_non_empty_field("Item name", name)?;
        ensure_field("Description", description)?;
        ensure_positive_price(price)?;

        let _guard = self.write_lock.hold();
        let mut items = self.list_items()?;

        let item_id = next_item_id(&items)?;
        let item = FoodItem::new(item_id, name.trim(), description.trim(), price);
        items.push(item.clone());
        record_store::rewrite_all::<FoodItemRow, _>(&self.path, &items)?;

        info!(item_id, name = %item.name, price = %item.price, "food item added");
        Ok(item)
    }

    /// Change the price of an existing item and persist the catalog
    ///
    /// Returns the updated item.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `new_price` is zero or negative
    /// - `NotFound` if no item has `item_id`
    pub fn update_price(&self, item_id: ItemId, new_price: Decimal) -> Result<FoodItem> {
        ensure_positive_price(new_price)?;

        let _guard = self.write_lock.hold();
        let mut items = self.list_items()?;

        let item = items
            .iter_mut()
            .find(|item| item.item_id == item_id)
            .ok_or_else(|| CanteenError::not_found("Food item", item_id))?;
        let previous = item.price;
        item.price = new_price;
        let updated = item.clone();

        record_store::rewrite_all::<FoodItemRow, _>(&self.path, &items)?;

        info!(item_id, %previous, price = %new_price, "food item price updated");
        Ok(updated)
    }

    /// Hard-delete an item and persist the catalog
    ///
    /// Returns the removed item. When the id is unknown the file is not
    /// rewritten.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no item has `item_id`.
    pub fn remove_item(&self, item_id: ItemId) -> Result<FoodItem> {
        let _guard = self.write_lock.hold();
        let mut items = self.list_items()?;

        let position = items
            .iter()
            .position(|item| item.item_id == item_id)
            .ok_or_else(|| CanteenError::not_found("Food item", item_id))?;
        let removed = items.remove(position);

        record_store::rewrite_all::<FoodItemRow, _>(&self.path, &items)?;

        info!(item_id, name = %removed.name, "food item removed");
        Ok(removed)
    }

    /// Mark an item as available or unavailable and persist the catalog
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no item has `item_id`.
    pub fn set_availability(&self, item_id: ItemId, available: bool) -> Result<FoodItem> {
        let _guard = self.write_lock.hold();
        let mut items = self.list_items()?;

        let item = items
            .iter_mut()
            .find(|item| item.item_id == item_id)
            .ok_or_else(|| CanteenError::not_found("Food item", item_id))?;
        item.available = available;
        let updated = item.clone();

        record_store::rewrite_all::<FoodItemRow, _>(&self.path, &items)?;

        info!(item_id, available, "food item availability changed");
        Ok(updated)
    }
}

fn next_item_id(items: &[FoodItem]) -> Result<ItemId> {
    items
        .iter()
        .map(|item| item.item_id)
        .max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| CanteenError::arithmetic_overflow("item id assignment"))
}

fn ensure_positive_price(price: Decimal) -> Result<()> {
    if price <= Decimal::ZERO {
        return Err(CanteenError::invalid_argument(
            "price must be greater than 0",
        ));
    }
    Ok(())
}
