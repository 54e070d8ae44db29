//! Data access gateway.
//!
//! [`InventoryProvider`] is the only entry point callers use. Every request
//! names a [`ContentUri`]; the provider classifies it, runs the matching
//! storage operation and, after a successful mutation, notifies observers.
//!
//! For a single-item URI the caller's selection is discarded and replaced by
//! an `id = ?` filter on the id taken from the URI.

use crate::config::ProviderConfig;
use crate::contract::{
    self, CONTENT_AUTHORITY, CONTENT_ITEM_TYPE, CONTENT_LIST_TYPE, COLUMN_QUANTITY,
    PATH_INVENTORY, SCHEME,
};
use crate::error::{Error, Result};
use crate::notify::{ChangeCallback, ChangeNotifier, ObserverId};
use crate::storage::{Cursor, InventoryStore};
use crate::uri::{ContentUri, Dispatch, RouteCode, UriMatcher};
use crate::values::{ContentValues, Selection};
use tracing::{debug, error};

/// Routes inventory requests to storage and broadcasts changes.
#[derive(Debug)]
pub struct InventoryProvider {
    store: InventoryStore,
    matcher: UriMatcher,
    notifier: ChangeNotifier,
}

impl InventoryProvider {
    /// Provider over an existing store.
    #[must_use]
    pub fn new(store: InventoryStore) -> Self {
        let matcher = UriMatcher::builder(SCHEME)
            .route(CONTENT_AUTHORITY, PATH_INVENTORY, RouteCode::Collection)
            .route(
                CONTENT_AUTHORITY,
                &format!("{PATH_INVENTORY}/#"),
                RouteCode::SingleItem,
            )
            .build();

        Self {
            store,
            matcher,
            notifier: ChangeNotifier::new(),
        }
    }

    /// Provider over the database described by `config`. The file is
    /// opened on first use.
    #[must_use]
    pub fn from_config(config: &ProviderConfig) -> Self {
        let store = InventoryStore::new(&config.db_path).with_busy_timeout(config.busy_timeout());
        Self::new(store)
    }

    /// Provider over a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_memory() -> Result<Self> {
        Ok(Self::new(InventoryStore::open_memory()?))
    }

    /// Query rows under `uri`.
    ///
    /// The returned cursor carries `uri` as its notification URI.
    ///
    /// # Errors
    ///
    /// Returns `UnrecognizedResource` if `uri` does not route, or an error
    /// from the storage engine.
    pub fn query(
        &mut self,
        uri: &ContentUri,
        columns: Option<&[&str]>,
        selection: &Selection,
        sort_order: Option<&str>,
    ) -> Result<Cursor> {
        let selection = self.scoped_selection(uri, selection)?;

        let mut cursor = self.store.query_rows(columns, &selection, sort_order)?;
        cursor.set_notification_uri(uri.clone());
        debug!(uri = %uri, rows = cursor.len(), "query");
        Ok(cursor)
    }

    /// Insert one item into the collection.
    ///
    /// Returns the new item's URI, or `None` if the storage engine refused
    /// the row (the refusal is logged).
    ///
    /// # Errors
    ///
    /// Returns `UnrecognizedResource` if `uri` does not route,
    /// `UnsupportedOperation` for an item URI and `NegativeQuantity` if the
    /// values carry a quantity below zero.
    pub fn insert(&mut self, uri: &ContentUri, values: &ContentValues) -> Result<Option<ContentUri>> {
        match self.matcher.match_uri(uri)? {
            Dispatch::Collection => {}
            Dispatch::SingleItem(_) => {
                return Err(Error::UnsupportedOperation {
                    operation: "insert",
                    uri: uri.to_string(),
                })
            }
        }
        check_quantity(values)?;

        let Some(id) = self.store.insert_row(values)? else {
            error!(uri = %uri, "Failed to insert row");
            return Ok(None);
        };

        let item = uri.with_appended_id(id);
        debug!(uri = %item, "insert");
        self.notifier.notify_change(&item);
        Ok(Some(item))
    }

    /// Apply `values` to the rows under `uri`. Returns the number changed.
    ///
    /// Observers are notified only when at least one row changed.
    ///
    /// # Errors
    ///
    /// Returns `UnrecognizedResource` if `uri` does not route,
    /// `NegativeQuantity` for a quantity below zero, or an error from the
    /// storage engine.
    pub fn update(
        &mut self,
        uri: &ContentUri,
        values: &ContentValues,
        selection: &Selection,
    ) -> Result<usize> {
        let selection = self.scoped_selection(uri, selection)?;
        check_quantity(values)?;

        let changed = self.store.update_rows(values, &selection)?;
        debug!(uri = %uri, rows = changed, "update");
        if changed > 0 {
            self.notifier.notify_change(uri);
        }
        Ok(changed)
    }

    /// Delete the rows under `uri`. Returns the number deleted.
    ///
    /// Observers are notified only when at least one row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `UnrecognizedResource` if `uri` does not route, or an error
    /// from the storage engine.
    pub fn delete(&mut self, uri: &ContentUri, selection: &Selection) -> Result<usize> {
        let selection = self.scoped_selection(uri, selection)?;

        let deleted = self.store.delete_rows(&selection)?;
        debug!(uri = %uri, rows = deleted, "delete");
        if deleted > 0 {
            self.notifier.notify_change(uri);
        }
        Ok(deleted)
    }

    /// MIME type of the data under `uri`.
    ///
    /// # Errors
    ///
    /// Returns `UnrecognizedResource` if `uri` does not route.
    pub fn get_type(&self, uri: &ContentUri) -> Result<&'static str> {
        Ok(match self.matcher.match_uri(uri)? {
            Dispatch::Collection => CONTENT_LIST_TYPE,
            Dispatch::SingleItem(_) => CONTENT_ITEM_TYPE,
        })
    }

    /// Register `callback` for changes to `uri`. Observing the collection
    /// covers every item in it.
    pub fn observe(&self, uri: &ContentUri, callback: ChangeCallback) -> ObserverId {
        self.notifier.observe(uri, callback)
    }

    pub fn stop_observing(&self, id: ObserverId) -> bool {
        self.notifier.stop_observing(id)
    }

    /// Handle onto the observer registry.
    #[must_use]
    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// Drop and recreate the table, then notify collection observers.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the DDL fails.
    pub fn reset(&mut self) -> Result<()> {
        self.store.reset()?;
        self.notifier.notify_change(&contract::content_uri());
        Ok(())
    }

    /// The underlying store, for lifecycle operations such as opening the
    /// file eagerly or reading the schema version.
    pub fn store_mut(&mut self) -> &mut InventoryStore {
        &mut self.store
    }

    /// Route `uri` and pick the effective selection.
    fn scoped_selection(&self, uri: &ContentUri, selection: &Selection) -> Result<Selection> {
        Ok(match self.matcher.match_uri(uri)? {
            Dispatch::Collection => selection.clone(),
            Dispatch::SingleItem(id) => Selection::by_id(id),
        })
    }
}

/// Rejects any quantity SQLite would store as a negative number, including
/// reals and numeric text.
#[allow(clippy::cast_possible_truncation)]
fn check_quantity(values: &ContentValues) -> Result<()> {
    match values.get_as_f64(COLUMN_QUANTITY) {
        Some(quantity) if quantity < 0.0 => Err(Error::NegativeQuantity {
            quantity: quantity.floor() as i64,
        }),
        _ => Ok(()),
    }
}
