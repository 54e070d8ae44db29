//! Inventory contract: names shared by the provider, the storage layer and callers.
//!
//! Resource identifiers take the form
//! `content://com.example.android.inventory/inventory` for the whole
//! collection and `content://com.example.android.inventory/inventory/<id>`
//! for a single item.

use crate::uri::ContentUri;

/// Scheme of every resource identifier.
pub const SCHEME: &str = "content";

/// Authority naming this provider. Unique per application instance.
pub const CONTENT_AUTHORITY: &str = "com.example.android.inventory";

/// Path segment of the item collection.
pub const PATH_INVENTORY: &str = "inventory";

/// Database file name used under the data directory.
pub const DATABASE_NAME: &str = "inventory.db";

/// Schema version. Bumping it drops and recreates the table on next open.
pub const DATABASE_VERSION: i32 = 1;

/// Name of the single table.
pub const TABLE_NAME: &str = "Inventory";

pub const COLUMN_ID: &str = "id";
pub const COLUMN_NAME: &str = "name";
pub const COLUMN_QUANTITY: &str = "quantity";
pub const COLUMN_PRICE: &str = "price";
pub const COLUMN_SUPPLIER: &str = "supplier";
pub const COLUMN_IMAGE: &str = "image_reference";

/// Every column in declaration order.
pub const ALL_COLUMNS: [&str; 6] = [
    COLUMN_ID,
    COLUMN_NAME,
    COLUMN_QUANTITY,
    COLUMN_PRICE,
    COLUMN_IMAGE,
    COLUMN_SUPPLIER,
];

/// MIME type for a list of items.
pub const CONTENT_LIST_TYPE: &str =
    "vnd.android.cursor.dir/com.example.android.inventory/inventory";

/// MIME type for one item.
pub const CONTENT_ITEM_TYPE: &str =
    "vnd.android.cursor.item/com.example.android.inventory/inventory";

/// URI of the whole item collection.
#[must_use]
pub fn content_uri() -> ContentUri {
    ContentUri::new(SCHEME, CONTENT_AUTHORITY, [PATH_INVENTORY])
}

/// URI of the item with the given id.
#[must_use]
pub fn item_uri(id: i64) -> ContentUri {
    content_uri().with_appended_id(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uris_render() {
        assert_eq!(
            content_uri().to_string(),
            "content://com.example.android.inventory/inventory"
        );
        assert_eq!(
            item_uri(12).to_string(),
            "content://com.example.android.inventory/inventory/12"
        );
    }

    #[test]
    fn test_mime_types_name_the_collection() {
        assert!(CONTENT_LIST_TYPE.ends_with(&format!("{CONTENT_AUTHORITY}/{PATH_INVENTORY}")));
        assert!(CONTENT_ITEM_TYPE.ends_with(&format!("{CONTENT_AUTHORITY}/{PATH_INVENTORY}")));
        assert_ne!(CONTENT_LIST_TYPE, CONTENT_ITEM_TYPE);
    }
}
