//! SQLite storage layer for the inventory.
//!
//! This module provides the persistence layer using SQLite with:
//! - WAL mode for concurrent reads
//! - A single `Inventory` table created on first open
//! - Destructive schema upgrades keyed on `PRAGMA user_version`
//!
//! # Submodules
//!
//! - [`cursor`] - Forward-only query results with by-name column access
//! - [`schema`] - Table definition and version handling
//! - [`sqlite`] - Row-level insert/query/update/delete

pub mod cursor;
pub mod schema;
pub mod sqlite;

pub use cursor::{Cursor, Row};
pub use sqlite::InventoryStore;
