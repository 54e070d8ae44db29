//! Error types for the inventory provider.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=storage, 3=not_found, 4=validation, 5=routing, etc.)
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for inventory operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Scripts match on the string or on the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Storage (exit 2)
    NotInitialized,
    AlreadyInitialized,
    StorageUnavailable,
    DatabaseError,

    // Not Found (exit 3)
    ItemNotFound,
    ColumnNotFound,

    // Validation (exit 4)
    InvalidArgument,
    NegativeQuantity,

    // Routing (exit 5)
    UnrecognizedResource,
    UnsupportedOperation,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
            Self::StorageUnavailable => "STORAGE_UNAVAILABLE",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::ItemNotFound => "ITEM_NOT_FOUND",
            Self::ColumnNotFound => "COLUMN_NOT_FOUND",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::NegativeQuantity => "NEGATIVE_QUANTITY",
            Self::UnrecognizedResource => "UNRECOGNIZED_RESOURCE",
            Self::UnsupportedOperation => "UNSUPPORTED_OPERATION",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-8).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::NotInitialized
            | Self::AlreadyInitialized
            | Self::StorageUnavailable
            | Self::DatabaseError => 2,
            Self::ItemNotFound | Self::ColumnNotFound => 3,
            Self::InvalidArgument | Self::NegativeQuantity => 4,
            Self::UnrecognizedResource | Self::UnsupportedOperation => 5,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether retrying with corrected input can succeed.
    ///
    /// True for validation errors and transient database failures
    /// (a busy database under a concurrent writer).
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument | Self::NegativeQuantity | Self::DatabaseError
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in inventory operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not initialized: run `inv init` first")]
    NotInitialized,

    #[error("Already initialized at {path}")]
    AlreadyInitialized { path: PathBuf },

    #[error("Storage unavailable at {path}: {reason}")]
    StorageUnavailable { path: PathBuf, reason: String },

    #[error("Unrecognized resource: {uri}")]
    UnrecognizedResource { uri: String },

    #[error("{operation} is not supported for {uri}")]
    UnsupportedOperation { operation: &'static str, uri: String },

    #[error("Column not found: {column}")]
    ColumnNotFound { column: String },

    #[error("Quantity cannot be negative: {quantity}")]
    NegativeQuantity { quantity: i64 },

    #[error("Item not found: {id}")]
    ItemNotFound { id: i64 },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotInitialized => ErrorCode::NotInitialized,
            Self::AlreadyInitialized { .. } => ErrorCode::AlreadyInitialized,
            Self::StorageUnavailable { .. } => ErrorCode::StorageUnavailable,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::UnrecognizedResource { .. } => ErrorCode::UnrecognizedResource,
            Self::UnsupportedOperation { .. } => ErrorCode::UnsupportedOperation,
            Self::ColumnNotFound { .. } => ErrorCode::ColumnNotFound,
            Self::NegativeQuantity { .. } => ErrorCode::NegativeQuantity,
            Self::ItemNotFound { .. } => ErrorCode::ItemNotFound,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::NotInitialized => Some("Run `inv init` to create the database".to_string()),

            Self::AlreadyInitialized { path } => Some(format!(
                "Database already exists at {}. Use `--force` to reinitialize.",
                path.display()
            )),

            Self::StorageUnavailable { path, .. } => Some(format!(
                "Check that {} is writable, or pass a different location with `--db`.",
                path.display()
            )),

            Self::UnrecognizedResource { .. } => Some(format!(
                "Expected {} or {}/<id>",
                crate::contract::content_uri(),
                crate::contract::content_uri()
            )),

            Self::UnsupportedOperation { operation, .. } => {
                if *operation == "insert" {
                    Some("Insert against the collection URI instead of an item URI".to_string())
                } else {
                    None
                }
            }

            Self::ItemNotFound { id } => Some(format!(
                "No item with ID {id}. Use `inv list` to see available items."
            )),

            Self::NegativeQuantity { .. } => {
                Some("Stock can be reduced to 0 but not below".to_string())
            }

            Self::InvalidArgument(msg) => {
                if msg.contains("sort") {
                    Some(
                        "Valid sort keys: id, name, quantity, price. \
                         Synonyms: qty/stock→quantity, cost→price, title→name"
                            .to_string(),
                    )
                } else if msg.contains("order more") {
                    Some("Restock with `inv adjust <id> <amount>`".to_string())
                } else {
                    None
                }
            }

            Self::ColumnNotFound { .. }
            | Self::Database(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Config(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    ///
    /// Includes error code, message, retryability, exit code, and
    /// optional recovery hint.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_errors_share_exit_code() {
        let unknown = Error::UnrecognizedResource {
            uri: "content://x/y".to_string(),
        };
        let unsupported = Error::UnsupportedOperation {
            operation: "insert",
            uri: "content://x/y/1".to_string(),
        };
        assert_eq!(unknown.exit_code(), 5);
        assert_eq!(unsupported.exit_code(), 5);
        assert!(unsupported.hint().is_some());
    }

    #[test]
    fn test_structured_json_includes_hint() {
        let err = Error::ItemNotFound { id: 7 };
        let json = err.to_structured_json();
        assert_eq!(json["error"]["code"], "ITEM_NOT_FOUND");
        assert_eq!(json["error"]["exit_code"], 3);
        assert_eq!(json["error"]["retryable"], false);
        assert!(json["error"]["hint"].as_str().unwrap().contains("inv list"));
    }

    #[test]
    fn test_column_not_found_has_no_hint() {
        let err = Error::ColumnNotFound {
            column: "colour".to_string(),
        };
        assert_eq!(err.error_code(), ErrorCode::ColumnNotFound);
        assert!(err.hint().is_none());
        assert!(err.to_structured_json()["error"].get("hint").is_none());
    }
}
