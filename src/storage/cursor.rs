//! Query results.
//!
//! A [`Cursor`] is a forward-only sequence of [`Row`]s. Rows look columns up
//! by name and fail with `ColumnNotFound` instead of returning a sentinel
//! index.

use crate::error::{Error, Result};
use crate::uri::ContentUri;
use rusqlite::types::{FromSql, FromSqlError, Value, ValueRef};
use std::sync::Arc;

/// Forward-only sequence of query rows.
///
/// Rows are read from the statement up front when the query runs.
#[derive(Debug)]
pub struct Cursor {
    columns: Arc<[String]>,
    rows: std::vec::IntoIter<Vec<Value>>,
    notification_uri: Option<ContentUri>,
}

impl Cursor {
    pub(crate) fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns: columns.into(),
            rows: rows.into_iter(),
            notification_uri: None,
        }
    }

    /// Column names in projection order.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Position of `column` in the projection.
    ///
    /// # Errors
    ///
    /// Returns `ColumnNotFound` if the projection does not include it.
    pub fn column_index(&self, column: &str) -> Result<usize> {
        column_index(&self.columns, column)
    }

    /// The resource this cursor was produced for. Changes to it (or to
    /// anything underneath it) mean the cursor is stale.
    #[must_use]
    pub fn notification_uri(&self) -> Option<&ContentUri> {
        self.notification_uri.as_ref()
    }

    pub fn set_notification_uri(&mut self, uri: ContentUri) {
        self.notification_uri = Some(uri);
    }
}

impl Iterator for Cursor {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.rows.next().map(|values| Row {
            columns: Arc::clone(&self.columns),
            values,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for Cursor {}

/// One result row.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    /// Read `column` as `T`. Use `Option<T>` for nullable columns.
    ///
    /// # Errors
    ///
    /// Returns `ColumnNotFound` for a column outside the projection, or a
    /// database error if the stored value cannot be converted to `T`.
    pub fn get<T: FromSql>(&self, column: &str) -> Result<T> {
        let idx = column_index(&self.columns, column)?;
        let value = ValueRef::from(&self.values[idx]);

        T::column_result(value).map_err(|e| {
            let err = match e {
                FromSqlError::InvalidType => {
                    rusqlite::Error::InvalidColumnType(idx, column.to_string(), value.data_type())
                }
                FromSqlError::OutOfRange(i) => rusqlite::Error::IntegralValueOutOfRange(idx, i),
                other => rusqlite::Error::FromSqlConversionFailure(
                    idx,
                    value.data_type(),
                    Box::new(other),
                ),
            };
            Error::Database(err)
        })
    }

    /// Raw value of `column`.
    ///
    /// # Errors
    ///
    /// Returns `ColumnNotFound` for a column outside the projection.
    pub fn value(&self, column: &str) -> Result<&Value> {
        let idx = column_index(&self.columns, column)?;
        Ok(&self.values[idx])
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }
}

fn column_index(columns: &[String], column: &str) -> Result<usize> {
    columns
        .iter()
        .position(|c| c.eq_ignore_ascii_case(column))
        .ok_or_else(|| Error::ColumnNotFound {
            column: column.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor() -> Cursor {
        Cursor::new(
            vec!["id".to_string(), "name".to_string(), "supplier".to_string()],
            vec![
                vec![
                    Value::Integer(1),
                    Value::Text("Headphones".to_string()),
                    Value::Null,
                ],
                vec![
                    Value::Integer(2),
                    Value::Text("Cable".to_string()),
                    Value::Text("Acme".to_string()),
                ],
            ],
        )
    }

    #[test]
    fn test_rows_are_forward_only() {
        let mut cursor = cursor();
        assert_eq!(cursor.len(), 2);

        let first = cursor.next().unwrap();
        assert_eq!(first.get::<i64>("id").unwrap(), 1);
        assert_eq!(first.get::<Option<String>>("supplier").unwrap(), None);
        assert_eq!(cursor.len(), 1);

        let second = cursor.next().unwrap();
        assert_eq!(second.get::<String>("NAME").unwrap(), "Cable");
        assert!(cursor.next().is_none());
    }

    #[test]
    fn test_unknown_column_is_an_error() {
        let cursor = cursor();
        assert!(matches!(
            cursor.column_index("price"),
            Err(Error::ColumnNotFound { column }) if column == "price"
        ));

        let row = cursor.into_iter().next().unwrap();
        assert!(matches!(
            row.get::<String>("quantity"),
            Err(Error::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_type_mismatch_is_a_database_error() {
        let row = cursor().next().unwrap();
        assert!(matches!(
            row.get::<i64>("name"),
            Err(Error::Database(rusqlite::Error::InvalidColumnType(1, _, _)))
        ));
    }
}
