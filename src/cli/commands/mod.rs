//! Command implementations.

pub mod completions;
pub mod init;
pub mod item;
pub mod resource;
pub mod stock;
pub mod version;

use crate::config::{resolve_db_path, ProviderConfig};
use crate::contract::item_uri;
use crate::error::{Error, Result};
use crate::model::Item;
use crate::provider::InventoryProvider;
use crate::values::Selection;
use std::path::PathBuf;

/// Open the provider for an initialized database.
///
/// # Errors
///
/// Returns `NotInitialized` if the database file does not exist yet.
pub(crate) fn open_provider(db_path: Option<&PathBuf>) -> Result<InventoryProvider> {
    let db_path = resolve_db_path(db_path.map(|p| p.as_path())).ok_or(Error::NotInitialized)?;

    if !db_path.exists() {
        return Err(Error::NotInitialized);
    }

    let mut provider = InventoryProvider::from_config(&ProviderConfig::new(db_path));
    provider.store_mut().open()?;
    Ok(provider)
}

/// Read one item by id.
///
/// # Errors
///
/// Returns `ItemNotFound` if no item has this id.
pub(crate) fn fetch_item(provider: &mut InventoryProvider, id: i64) -> Result<Item> {
    let row = provider
        .query(&item_uri(id), None, &Selection::all(), None)?
        .next()
        .ok_or(Error::ItemNotFound { id })?;
    Item::from_row(&row)
}
