//! Inventory provider - URI-routed item storage with change notifications
//!
//! This crate provides the data-access layer and the `inv` CLI built on it.
//!
//! # Architecture
//!
//! - [`provider`] - Gateway: routes requests, runs them, notifies observers
//! - [`uri`] - Resource identifiers and the routing table
//! - [`storage`] - SQLite database layer
//! - [`notify`] - Change observer registry
//! - [`contract`] - Table, column and URI names
//! - [`values`] - Field values and row selections
//! - [`model`] - Item types
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Configuration management
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod contract;
pub mod error;
pub mod model;
pub mod notify;
pub mod provider;
pub mod storage;
pub mod uri;
pub mod validate;
pub mod values;

pub use error::{Error, Result};
pub use provider::InventoryProvider;
pub use uri::ContentUri;
pub use values::{ContentValues, Selection};

/// Global silent mode flag for `--silent` output.
///
/// When set, mutating commands print only the item URI or count
/// instead of full output.
pub static SILENT: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Global CSV output flag (set when `--format csv`).
pub static CSV_OUTPUT: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Check if silent mode is active.
#[inline]
pub fn is_silent() -> bool {
    SILENT.load(std::sync::atomic::Ordering::Relaxed)
}

/// Check if CSV output is requested.
#[inline]
pub fn is_csv() -> bool {
    CSV_OUTPUT.load(std::sync::atomic::Ordering::Relaxed)
}

/// Escape a value for CSV output (quoted if it contains a comma, quote or newline).
#[must_use]
pub fn csv_escape(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_escape() {
        assert_eq!(csv_escape("Headphones"), "Headphones");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
