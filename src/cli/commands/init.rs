//! Initialize the inventory database.
//!
//! Creates the database file and the `Inventory` table at the resolved
//! location (`--db`, `INV_TEST_DB`, `INVENTORY_DB`, or
//! `~/.inventory/data/inventory.db`).

use crate::config::resolve_db_path;
use crate::error::{Error, Result};
use crate::storage::InventoryStore;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Serialize)]
struct InitOutput {
    database: PathBuf,
    schema_version: i32,
}

/// Execute the init command.
///
/// # Errors
///
/// Returns `AlreadyInitialized` if the database exists and `force` is not
/// set, or an error if the file cannot be created.
pub fn execute(db_path: Option<&PathBuf>, force: bool, json: bool) -> Result<()> {
    let db_path = resolve_db_path(db_path.map(|p| p.as_path())).ok_or_else(|| {
        Error::Config("Could not determine a location for the database".to_string())
    })?;

    if db_path.exists() {
        if !force {
            return Err(Error::AlreadyInitialized { path: db_path });
        }
        remove_database(&db_path)?;
    }

    let mut store = InventoryStore::open_path(&db_path)?;
    let schema_version = store.version()?;
    info!(path = %db_path.display(), "Initialized inventory database");

    if json {
        let output = InitOutput {
            database: db_path,
            schema_version,
        };
        let payload = serde_json::to_string(&output)?;
        println!("{payload}");
    } else {
        println!("Initialized inventory database");
        println!("  Database: {}", db_path.display());
        println!();
        println!("Next: Run 'inv add <name> --price <price>' or 'inv sample' to add items.");
    }

    Ok(())
}

/// Remove the database file and its WAL side files.
fn remove_database(db_path: &Path) -> Result<()> {
    fs::remove_file(db_path)?;
    for suffix in ["-wal", "-shm"] {
        let mut side = db_path.as_os_str().to_owned();
        side.push(suffix);
        let side = PathBuf::from(side);
        if side.exists() {
            fs::remove_file(side)?;
        }
    }
    Ok(())
}
