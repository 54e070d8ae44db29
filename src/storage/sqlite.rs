//! SQLite storage implementation.
//!
//! [`InventoryStore`] owns the database file and translates row-level
//! requests into SQL against the single inventory table. The connection is
//! opened lazily on first use; every operation runs to completion on the
//! calling thread.

use crate::contract::{DATABASE_VERSION, TABLE_NAME};
use crate::error::{Error, Result};
use crate::storage::cursor::Cursor;
use crate::storage::schema;
use crate::values::{ContentValues, Selection};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error};

/// Default busy timeout for a contended database.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Location {
    File(PathBuf),
    Memory,
}

/// SQLite-backed store for inventory rows.
#[derive(Debug)]
pub struct InventoryStore {
    location: Location,
    busy_timeout: Duration,
    conn: Option<Connection>,
}

impl InventoryStore {
    /// Store backed by the file at `path`. Nothing is opened until first use.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            location: Location::File(path.to_path_buf()),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            conn: None,
        }
    }

    /// Override the busy timeout used when the file is opened.
    #[must_use]
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Open a database at the given path immediately.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the file cannot be opened or created.
    pub fn open_path(path: &Path) -> Result<Self> {
        let mut store = Self::new(path);
        store.open()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::apply_schema(&conn)?;
        Ok(Self {
            location: Location::Memory,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            conn: Some(conn),
        })
    }

    /// Backing file, or `None` for an in-memory store.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            Location::File(path) => Some(path),
            Location::Memory => None,
        }
    }

    /// Open the database and make sure the table exists.
    ///
    /// Idempotent: later calls return the already open connection.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the file cannot be opened, created,
    /// or initialised.
    pub fn open(&mut self) -> Result<&Connection> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => self.connect()?,
        };
        Ok(self.conn.insert(conn))
    }

    fn connect(&self) -> Result<Connection> {
        let Location::File(path) = &self.location else {
            let conn = Connection::open_in_memory()?;
            schema::apply_schema(&conn)?;
            return Ok(conn);
        };

        let unavailable = |reason: String| Error::StorageUnavailable {
            path: path.clone(),
            reason,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| unavailable(e.to_string()))?;
        }

        let conn = Connection::open(path).map_err(|e| unavailable(e.to_string()))?;
        conn.busy_timeout(self.busy_timeout)
            .map_err(|e| unavailable(e.to_string()))?;
        schema::apply_schema(&conn).map_err(|e| unavailable(e.to_string()))?;

        debug!(path = %path.display(), "Opened inventory database");
        Ok(conn)
    }

    /// Insert one row and return its id.
    ///
    /// Returns `Ok(None)` when SQLite refuses the row (a NOT NULL column is
    /// missing, an unknown column is named, the database is busy). The
    /// refusal is logged, not returned as an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` only if the database cannot be opened.
    pub fn insert_row(&mut self, values: &ContentValues) -> Result<Option<i64>> {
        let sql = if values.is_empty() {
            format!("INSERT INTO {TABLE_NAME} DEFAULT VALUES")
        } else {
            let columns: Vec<String> = values.columns().map(quote_ident).collect();
            let placeholders = vec!["?"; values.len()].join(", ");
            format!(
                "INSERT INTO {TABLE_NAME} ({}) VALUES ({placeholders})",
                columns.join(", ")
            )
        };

        let conn = self.open()?;
        match conn.execute(&sql, params_from_iter(values.values())) {
            Ok(_) => {
                let id = conn.last_insert_rowid();
                debug!(id, "Inserted row");
                Ok(Some(id))
            }
            Err(e) => {
                error!(error = %e, "Error inserting row");
                Ok(None)
            }
        }
    }

    /// Query rows.
    ///
    /// `columns` of `None` selects every column; otherwise the projection is
    /// used exactly as given. `sort_order` is an `ORDER BY` body such as
    /// `"quantity DESC"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement cannot be prepared or executed.
    pub fn query_rows(
        &mut self,
        columns: Option<&[&str]>,
        selection: &Selection,
        sort_order: Option<&str>,
    ) -> Result<Cursor> {
        let projection = match columns {
            Some(cols) if !cols.is_empty() => cols.join(", "),
            _ => "*".to_string(),
        };
        let order_by = sort_order
            .filter(|s| !s.trim().is_empty())
            .map(|s| format!(" ORDER BY {s}"))
            .unwrap_or_default();
        let sql = format!(
            "SELECT {projection} FROM {TABLE_NAME}{}{order_by}",
            selection.where_sql()
        );

        let conn = self.open()?;
        let mut stmt = conn.prepare(&sql)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query(params_from_iter(selection.args()))?;
        let mut collected = Vec::new();
        while let Some(row) = rows.next()? {
            let values = (0..names.len())
                .map(|i| row.get::<_, Value>(i))
                .collect::<rusqlite::Result<Vec<_>>>()?;
            collected.push(values);
        }

        debug!(rows = collected.len(), "Queried rows");
        Ok(Cursor::new(names, collected))
    }

    /// Apply `values` to every row matching `selection`.
    ///
    /// Returns the number of rows changed. Empty `values` returns 0 without
    /// touching the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails (e.g. a NOT NULL column set to NULL).
    pub fn update_rows(&mut self, values: &ContentValues, selection: &Selection) -> Result<usize> {
        if values.is_empty() {
            return Ok(0);
        }

        let assignments: Vec<String> = values
            .columns()
            .map(|c| format!("{} = ?", quote_ident(c)))
            .collect();
        let sql = format!(
            "UPDATE {TABLE_NAME} SET {}{}",
            assignments.join(", "),
            selection.where_sql()
        );

        let conn = self.open()?;
        let changed = conn.execute(
            &sql,
            params_from_iter(values.values().chain(selection.args())),
        )?;

        debug!(rows = changed, "Updated rows");
        Ok(changed)
    }

    /// Delete every row matching `selection`. Returns the number deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub fn delete_rows(&mut self, selection: &Selection) -> Result<usize> {
        let mut where_sql = selection.where_sql();
        if where_sql.is_empty() {
            // Keep the per-row count for an unfiltered delete.
            where_sql = " WHERE 1".to_string();
        }
        let sql = format!("DELETE FROM {TABLE_NAME}{where_sql}");

        let conn = self.open()?;
        let deleted = conn.execute(&sql, params_from_iter(selection.args()))?;

        debug!(rows = deleted, "Deleted rows");
        Ok(deleted)
    }

    /// Drop and recreate the table, discarding all rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the DDL fails.
    pub fn upgrade(&mut self, old_version: i32, new_version: i32) -> Result<()> {
        let conn = self.open()?;
        schema::upgrade(conn, old_version, new_version)?;
        Ok(())
    }

    /// Drop and recreate the table at the current schema version.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the DDL fails.
    pub fn reset(&mut self) -> Result<()> {
        let conn = self.open()?;
        schema::recreate_table(conn, DATABASE_VERSION)?;
        Ok(())
    }

    /// Schema version stored in the database file.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn version(&mut self) -> Result<i32> {
        let conn = self.open()?;
        Ok(schema::schema_version(conn)?)
    }

    /// Number of rows in the table.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn row_count(&mut self) -> Result<i64> {
        let conn = self.open()?;
        Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {TABLE_NAME}"), [], |row| {
            row.get(0)
        })?)
    }
}

/// Double-quote an identifier, escaping embedded quotes.
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
