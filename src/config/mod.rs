//! Configuration management.
//!
//! This module resolves where the inventory database lives and assembles
//! the settings a provider is constructed from.
//!
//! # Layout
//!
//! - **Database**: `~/.inventory/data/inventory.db`
//! - **Test database**: `~/.inventory/test/inventory.db` (when `INV_TEST_DB` is set)

use crate::contract::DATABASE_NAME;
use crate::error::{Error, Result};
use crate::storage::sqlite::DEFAULT_BUSY_TIMEOUT;

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the database location.
pub const DB_ENV: &str = "INVENTORY_DB";

/// Environment variable enabling the isolated test database.
pub const TEST_DB_ENV: &str = "INV_TEST_DB";

/// Get the global inventory directory location: `~/.inventory/`.
#[must_use]
pub fn global_inventory_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".inventory"))
}

/// Check if test mode is enabled.
///
/// Test mode is enabled by setting `INV_TEST_DB=1` (or any value other
/// than empty, `0` or `false`).
#[must_use]
pub fn is_test_mode() -> bool {
    std::env::var(TEST_DB_ENV).is_ok_and(|v| is_truthy(&v))
}

fn is_truthy(value: &str) -> bool {
    !value.is_empty() && value != "0" && !value.eq_ignore_ascii_case("false")
}

/// Get the test database path: `~/.inventory/test/inventory.db`.
#[must_use]
pub fn test_db_path() -> Option<PathBuf> {
    global_inventory_dir().map(|dir| dir.join("test").join(DATABASE_NAME))
}

/// Resolve the database path.
///
/// Priority:
/// 1. If `explicit_path` is provided, use it directly
/// 2. `INV_TEST_DB` environment variable → uses test database
/// 3. `INVENTORY_DB` environment variable
/// 4. Global location: `~/.inventory/data/inventory.db`
///
/// # Returns
///
/// Returns the path to the database file, or `None` if no home directory
/// could be determined.
#[must_use]
pub fn resolve_db_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if is_test_mode() {
        return test_db_path();
    }

    if let Ok(db_path) = std::env::var(DB_ENV) {
        if !db_path.trim().is_empty() {
            return Some(PathBuf::from(db_path));
        }
    }

    global_inventory_dir().map(|dir| dir.join("data").join(DATABASE_NAME))
}

/// Settings an [`InventoryProvider`](crate::provider::InventoryProvider) is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub db_path: PathBuf,
    pub busy_timeout_ms: u64,
}

impl ProviderConfig {
    /// Config for the database at `db_path` with the default busy timeout.
    #[must_use]
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            busy_timeout_ms: u64::try_from(DEFAULT_BUSY_TIMEOUT.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Resolve the database location via [`resolve_db_path`].
    ///
    /// # Errors
    ///
    /// Returns `Config` if no location can be determined.
    pub fn resolve(explicit_path: Option<&Path>) -> Result<Self> {
        resolve_db_path(explicit_path).map(Self::new).ok_or_else(|| {
            Error::Config("Could not determine a home directory for the database".to_string())
        })
    }

    #[must_use]
    pub fn with_busy_timeout_ms(mut self, ms: u64) -> Self {
        self.busy_timeout_ms = ms;
        self
    }

    #[must_use]
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_db_path_with_explicit() {
        let explicit = PathBuf::from("/custom/path/inventory.db");
        let result = resolve_db_path(Some(&explicit));
        assert_eq!(result, Some(explicit));
    }

    #[test]
    fn test_resolve_db_path_default_file_name() {
        let path = resolve_db_path(None).unwrap();
        assert!(path.ends_with(DATABASE_NAME) || std::env::var(DB_ENV).is_ok());
    }

    #[test]
    fn test_test_db_path_is_separate() {
        let global = global_inventory_dir().unwrap();
        let test = test_db_path().unwrap();

        assert!(test.to_string_lossy().contains("test"));
        assert!(test.ends_with(DATABASE_NAME));
        assert_ne!(global.join("data").join(DATABASE_NAME), test);
    }

    #[test]
    fn test_is_truthy() {
        for falsy in ["", "0", "false", "FALSE"] {
            assert!(!is_truthy(falsy), "{falsy:?} should be falsy");
        }
        for truthy in ["1", "true", "yes"] {
            assert!(is_truthy(truthy), "{truthy:?} should be truthy");
        }
    }

    #[test]
    fn test_provider_config_defaults() {
        let config = ProviderConfig::new("/tmp/inventory.db");
        assert_eq!(config.busy_timeout(), DEFAULT_BUSY_TIMEOUT);

        let config = config.with_busy_timeout_ms(250);
        assert_eq!(config.busy_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_provider_config_resolve_explicit() {
        let config = ProviderConfig::resolve(Some(Path::new("/tmp/x.db"))).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/x.db"));
    }
}
