//! Inventory item model.
//!
//! Items are the only record kind in the inventory. A stored [`Item`] is
//! read back from a [`Row`]; new items and edits travel to the provider as
//! [`ContentValues`] built from an [`ItemDraft`] or [`ItemChanges`].

use crate::contract::{
    COLUMN_ID, COLUMN_IMAGE, COLUMN_NAME, COLUMN_PRICE, COLUMN_QUANTITY, COLUMN_SUPPLIER,
};
use crate::error::Result;
use crate::storage::Row;
use crate::values::ContentValues;
use serde::{Deserialize, Serialize};

/// A stored inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Primary key, assigned on insert and never reused
    pub id: i64,

    pub name: String,

    /// Units in stock (never negative)
    pub quantity: i64,

    /// Unit price as entered, e.g. "5" or "12.99"
    pub price: String,

    /// Supplier contact, used when ordering more
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    /// Opaque reference to the item's picture
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<String>,
}

impl Item {
    /// Read an item from a full-projection row.
    ///
    /// # Errors
    ///
    /// Returns `ColumnNotFound` if the row lacks a column, or a database
    /// error if a value has the wrong type.
    pub fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.get(COLUMN_ID)?,
            name: row.get(COLUMN_NAME)?,
            quantity: row.get(COLUMN_QUANTITY)?,
            price: row.get(COLUMN_PRICE)?,
            supplier: row.get(COLUMN_SUPPLIER)?,
            image_reference: row.get(COLUMN_IMAGE)?,
        })
    }

    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// Fields of an item that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub quantity: i64,
    pub price: String,
    pub supplier: Option<String>,
    pub image_reference: Option<String>,
}

impl ItemDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: 0,
            price: price.into(),
            supplier: None,
            image_reference: None,
        }
    }

    /// The demo item used to populate an empty inventory.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            quantity: 45,
            ..Self::new("Headphones", "5")
        }
    }

    #[must_use]
    pub fn to_values(&self) -> ContentValues {
        let mut values = ContentValues::new()
            .with(COLUMN_NAME, self.name.clone())
            .with(COLUMN_QUANTITY, self.quantity)
            .with(COLUMN_PRICE, self.price.clone());
        if let Some(supplier) = &self.supplier {
            values.put(COLUMN_SUPPLIER, supplier.clone());
        }
        if let Some(image) = &self.image_reference {
            values.put(COLUMN_IMAGE, image.clone());
        }
        values
    }
}

/// A partial edit. `None` leaves a field unchanged; for the optional
/// fields `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<String>,
    pub supplier: Option<Option<String>>,
    pub image_reference: Option<Option<String>>,
}

impl ItemChanges {
    #[must_use]
    pub fn to_values(&self) -> ContentValues {
        let mut values = ContentValues::new();
        if let Some(name) = &self.name {
            values.put(COLUMN_NAME, name.clone());
        }
        if let Some(quantity) = self.quantity {
            values.put(COLUMN_QUANTITY, quantity);
        }
        if let Some(price) = &self.price {
            values.put(COLUMN_PRICE, price.clone());
        }
        if let Some(supplier) = &self.supplier {
            values.put_opt(COLUMN_SUPPLIER, supplier.clone());
        }
        if let Some(image) = &self.image_reference {
            values.put_opt(COLUMN_IMAGE, image.clone());
        }
        values
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_values().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InventoryStore;
    use crate::values::Selection;
    use rusqlite::types::Value;

    #[test]
    fn test_sample_item() {
        let sample = ItemDraft::sample();
        assert_eq!(sample.name, "Headphones");
        assert_eq!(sample.quantity, 45);
        assert_eq!(sample.price, "5");
        assert!(!sample.to_values().contains(COLUMN_SUPPLIER));
    }

    #[test]
    fn test_from_row() {
        let mut store = InventoryStore::open_memory().unwrap();
        let mut draft = ItemDraft::new("Cable", "3");
        draft.supplier = Some("cables@example.com".to_string());
        let id = store.insert_row(&draft.to_values()).unwrap().unwrap();

        let row = store
            .query_rows(None, &Selection::by_id(id), None)
            .unwrap()
            .next()
            .unwrap();
        let item = Item::from_row(&row).unwrap();
        assert_eq!(item.id, id);
        assert_eq!(item.quantity, 0);
        assert!(!item.in_stock());
        assert_eq!(item.supplier.as_deref(), Some("cables@example.com"));
        assert_eq!(item.image_reference, None);
    }

    #[test]
    fn test_changes_clear_optional_fields() {
        let changes = ItemChanges {
            quantity: Some(4),
            supplier: Some(None),
            ..ItemChanges::default()
        };
        let values = changes.to_values();
        assert_eq!(values.columns().collect::<Vec<_>>(), [COLUMN_QUANTITY, COLUMN_SUPPLIER]);
        assert_eq!(values.get(COLUMN_SUPPLIER), Some(&Value::Null));

        assert!(ItemChanges::default().is_empty());
    }

    #[test]
    fn test_item_json_omits_missing_optionals() {
        let item = Item {
            id: 1,
            name: "Cable".to_string(),
            quantity: 2,
            price: "3".to_string(),
            supplier: None,
            image_reference: None,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("supplier").is_none());
        assert_eq!(json["quantity"], 2);
    }
}
