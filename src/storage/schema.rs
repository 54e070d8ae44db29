//! Database schema definition and version handling.
//!
//! The schema version lives in SQLite's `user_version` header field. Any
//! mismatch between the stored version and [`DATABASE_VERSION`] drops the
//! table and recreates it empty; there is no migration path.

use crate::contract::{DATABASE_VERSION, TABLE_NAME};
use rusqlite::{Connection, Result};
use tracing::{debug, info, warn};

/// DDL for the inventory table.
///
/// `AUTOINCREMENT` keeps ids monotonic: an id freed by a delete is never
/// handed out again.
pub const CREATE_TABLE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS Inventory (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    quantity INTEGER NOT NULL DEFAULT 0,
    price TEXT NOT NULL,
    image_reference TEXT,
    supplier TEXT
);
";

/// Apply pragmas, create the table if absent and reconcile the schema version.
///
/// Idempotent: safe to call on every open.
///
/// # Errors
///
/// Returns an error if a pragma or DDL statement fails.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;

    if !table_exists(conn)? {
        create_table(conn)?;
        set_schema_version(conn, DATABASE_VERSION)?;
        info!(table = TABLE_NAME, version = DATABASE_VERSION, "Created table");
        return Ok(());
    }

    let stored = schema_version(conn)?;
    if stored != DATABASE_VERSION {
        upgrade(conn, stored, DATABASE_VERSION)?;
    }

    Ok(())
}

/// Drop and recreate the table, discarding every row.
///
/// A no-op when both versions are equal. Downgrades are treated the same
/// way as upgrades.
///
/// # Errors
///
/// Returns an error if the drop/create fails; the transaction is rolled back.
pub fn upgrade(conn: &Connection, old_version: i32, new_version: i32) -> Result<()> {
    if old_version == new_version {
        debug!(version = old_version, "Schema version unchanged, nothing to upgrade");
        return Ok(());
    }

    warn!(
        from = old_version,
        to = new_version,
        "Schema version changed, dropping all inventory data"
    );
    recreate_table(conn, new_version)
}

/// Drop the table and create it empty, stamping `version`.
///
/// # Errors
///
/// Returns an error if the drop/create fails; the transaction is rolled back.
pub fn recreate_table(conn: &Connection, version: i32) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(&format!("DROP TABLE IF EXISTS {TABLE_NAME};"))?;
    create_table(&tx)?;
    set_schema_version(&tx, version)?;
    tx.commit()?;

    info!(table = TABLE_NAME, version, "Recreated table");
    Ok(())
}

/// Read the stored schema version (0 for a brand-new file).
///
/// # Errors
///
/// Returns an error if the pragma cannot be read.
pub fn schema_version(conn: &Connection) -> Result<i32> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.pragma_update(None, "user_version", version)
}

fn create_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLE_SQL)
}

fn table_exists(conn: &Connection) -> Result<bool> {
    conn.prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1")?
        .exists([TABLE_NAME])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ALL_COLUMNS;

    fn columns(conn: &Connection) -> Vec<(String, String, bool)> {
        conn.prepare("SELECT name, type, \"notnull\" FROM pragma_table_info('Inventory') ORDER BY cid")
            .unwrap()
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_apply_schema() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).expect("Failed to apply schema");

        let cols = columns(&conn);
        let names: Vec<&str> = cols.iter().map(|(n, _, _)| n.as_str()).collect();
        assert_eq!(names, ALL_COLUMNS);

        let not_null: Vec<&str> = cols
            .iter()
            .filter(|(_, _, nn)| *nn)
            .map(|(n, _, _)| n.as_str())
            .collect();
        assert_eq!(not_null, ["name", "quantity", "price"]);

        assert_eq!(schema_version(&conn).unwrap(), DATABASE_VERSION);
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        apply_schema(&conn).expect("First apply failed");
        conn.execute(
            "INSERT INTO Inventory (name, price) VALUES ('Cable', '3')",
            [],
        )
        .unwrap();
        apply_schema(&conn).expect("Second apply failed");

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM Inventory", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_quantity_defaults_to_zero() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();

        conn.execute("INSERT INTO Inventory (name, price) VALUES ('Cable', '3')", [])
            .unwrap();
        let quantity: i64 = conn
            .query_row("SELECT quantity FROM Inventory", [], |row| row.get(0))
            .unwrap();
        assert_eq!(quantity, 0);
    }

    #[test]
    fn test_upgrade_discards_rows() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        conn.execute("INSERT INTO Inventory (name, price) VALUES ('Cable', '3')", [])
            .unwrap();

        upgrade(&conn, DATABASE_VERSION, DATABASE_VERSION + 1).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM Inventory", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
        assert_eq!(schema_version(&conn).unwrap(), DATABASE_VERSION + 1);
    }

    #[test]
    fn test_upgrade_same_version_keeps_rows() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        conn.execute("INSERT INTO Inventory (name, price) VALUES ('Cable', '3')", [])
            .unwrap();

        upgrade(&conn, DATABASE_VERSION, DATABASE_VERSION).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM Inventory", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_stale_version_is_reset_on_apply() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        conn.execute("INSERT INTO Inventory (name, price) VALUES ('Cable', '3')", [])
            .unwrap();
        set_schema_version(&conn, DATABASE_VERSION + 7).unwrap();

        apply_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM Inventory", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
        assert_eq!(schema_version(&conn).unwrap(), DATABASE_VERSION);
    }
}
