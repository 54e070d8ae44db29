//! Field values and row predicates passed across the provider boundary.

use rusqlite::types::Value;

/// Ordered column → value pairs for an insert or update.
///
/// Putting a column that is already present replaces its value in place,
/// so column order is the order of first insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentValues {
    entries: Vec<(String, Value)>,
}

impl ContentValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `column` to `value`.
    pub fn put(&mut self, column: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(c, _)| c == column) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((column.to_string(), value)),
        }
    }

    /// Set `column` to `value`, or to NULL when `value` is `None`.
    pub fn put_opt(&mut self, column: &str, value: Option<impl Into<Value>>) {
        match value {
            Some(v) => self.put(column, v),
            None => self.put_null(column),
        }
    }

    pub fn put_null(&mut self, column: &str) {
        self.put(column, Value::Null);
    }

    /// Builder-style [`put`](Self::put).
    #[must_use]
    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.put(column, value);
        self
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        let idx = self.entries.iter().position(|(c, _)| c == column)?;
        Some(self.entries.remove(idx).1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Numeric view of a column, converting the way SQLite's numeric
    /// affinity does: integers and reals as stored, text that reads as an
    /// integer or a real.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn get_as_f64(&self, column: &str) -> Option<f64> {
        match self.get(column)? {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(f) => Some(*f),
            Value::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .map(|i| i as f64)
                    .ok()
                    .or_else(|| s.parse::<f64>().ok())
            }
            _ => None,
        }
    }
}

/// A row filter: an optional SQL predicate with positional `?` arguments.
///
/// No predicate selects every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    clause: Option<String>,
    args: Vec<Value>,
}

impl Selection {
    /// Select every row.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Select rows matching `clause`, binding `args` to its `?` placeholders in order.
    pub fn new<I, V>(clause: &str, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            clause: Some(clause.to_string()),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Select the single row with the given primary key.
    #[must_use]
    pub fn by_id(id: i64) -> Self {
        Self::new(&format!("{} = ?", crate::contract::COLUMN_ID), [id])
    }

    #[must_use]
    pub fn clause(&self) -> Option<&str> {
        self.clause.as_deref()
    }

    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// ` WHERE <clause>`, or an empty string when selecting every row.
    pub(crate) fn where_sql(&self) -> String {
        self.clause
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .map(|c| format!(" WHERE {c}"))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_replaces_in_place() {
        let mut values = ContentValues::new()
            .with("name", "Headphones".to_string())
            .with("quantity", 45);
        values.put("name", "Speakers".to_string());

        assert_eq!(values.len(), 2);
        assert_eq!(values.columns().collect::<Vec<_>>(), ["name", "quantity"]);
        assert_eq!(values.get("name"), Some(&Value::Text("Speakers".to_string())));
    }

    #[test]
    fn test_put_opt_none_is_null() {
        let mut values = ContentValues::new();
        values.put_opt("supplier", None::<String>);
        assert_eq!(values.get("supplier"), Some(&Value::Null));
        assert!(values.remove("supplier").is_some());
        assert!(values.is_empty());
    }

    #[test]
    fn test_get_as_f64_follows_numeric_affinity() {
        let values = ContentValues::new()
            .with("quantity", "-3".to_string())
            .with("real", -2.5)
            .with("float_text", " -3.0 ".to_string())
            .with("exponent", "-1e0".to_string())
            .with("price", "five".to_string())
            .with("image", Value::Blob(vec![1]));
        assert_eq!(values.get_as_f64("quantity"), Some(-3.0));
        assert_eq!(values.get_as_f64("real"), Some(-2.5));
        assert_eq!(values.get_as_f64("float_text"), Some(-3.0));
        assert_eq!(values.get_as_f64("exponent"), Some(-1.0));
        assert_eq!(values.get_as_f64("price"), None);
        assert_eq!(values.get_as_f64("image"), None);
        assert_eq!(values.get_as_f64("missing"), None);
    }

    #[test]
    fn test_selection_where_sql() {
        assert_eq!(Selection::all().where_sql(), "");
        assert_eq!(Selection::new("  ", Vec::<i64>::new()).where_sql(), "");
        let by_id = Selection::by_id(4);
        assert_eq!(by_id.where_sql(), " WHERE id = ?");
        assert_eq!(by_id.args(), [Value::Integer(4)]);
    }
}
