//! Resource-level commands: MIME type lookup and table reset.

use super::open_provider;
use crate::config::ProviderConfig;
use crate::contract::DATABASE_VERSION;
use crate::error::{Error, Result};
use crate::provider::InventoryProvider;
use crate::uri::ContentUri;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Serialize)]
struct TypeOutput<'a> {
    uri: &'a ContentUri,
    mime_type: &'a str,
}

#[derive(Serialize)]
struct ResetOutput {
    reset: bool,
    removed: i64,
    schema_version: i32,
}

/// Execute the type command.
///
/// Routing only; the database is never opened.
///
/// # Errors
///
/// Returns `UnrecognizedResource` if the URI does not route.
pub fn type_of(uri: &str, json: bool) -> Result<()> {
    let uri = ContentUri::parse(uri)?;
    // The path is never touched: get_type does not open the store.
    let provider = InventoryProvider::from_config(&ProviderConfig::new(PathBuf::new()));
    let mime_type = provider.get_type(&uri)?;

    if json {
        let output = TypeOutput {
            uri: &uri,
            mime_type,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{mime_type}");
    }

    Ok(())
}

/// Execute the reset command: drop and recreate the table.
///
/// # Errors
///
/// Returns `InvalidArgument` without `--yes`, or `NotInitialized`.
pub fn reset(yes: bool, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    if !yes {
        return Err(Error::InvalidArgument(
            "Refusing to discard all items without --yes".to_string(),
        ));
    }

    let mut provider = open_provider(db_path)?;
    let removed = provider.store_mut().row_count()?;
    provider.reset()?;
    info!(removed, "Inventory table reset");

    if crate::is_silent() {
        println!("{removed}");
        return Ok(());
    }

    if json {
        let output = ResetOutput {
            reset: true,
            removed,
            schema_version: DATABASE_VERSION,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("Inventory reset ({removed} item(s) removed)");
    }

    Ok(())
}
