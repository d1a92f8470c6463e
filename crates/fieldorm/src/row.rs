//! Rows returned by an engine and the mapping into Rust types.

use crate::error::{OrmError, OrmResult};
use crate::value::{ColumnValue, Value};
use serde::Serialize;

/// A result row: ordered `(column, value)` cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Row {
    cells: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self { cells: Vec::new() }
    }

    /// Builder-style cell append.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column, value);
        self
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.cells.push((column.into(), value.into()));
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| c.as_str())
    }

    /// Raw cell lookup; the first cell wins on duplicate column names.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    /// Decode a column, failing when it is absent.
    pub fn try_get<T: ColumnValue>(&self, column: &str) -> OrmResult<T> {
        let value = self
            .get(column)
            .ok_or_else(|| OrmError::decode(column, "column not found in row"))?;
        T::from_value(value.clone()).map_err(|e| OrmError::decode(column, e))
    }

    /// Decode a column; absent or NULL becomes `None`.
    pub fn try_get_opt<T: ColumnValue>(&self, column: &str) -> OrmResult<Option<T>> {
        match self.get(column) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::from_value(value.clone())
                .map(Some)
                .map_err(|e| OrmError::decode(column, e)),
        }
    }

    /// Decode a column; an absent column yields `T::default()`.
    pub fn get_or_default<T: ColumnValue>(&self, column: &str) -> OrmResult<T> {
        match self.get(column) {
            None => Ok(T::default()),
            Some(value) => T::from_value(value.clone()).map_err(|e| OrmError::decode(column, e)),
        }
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Trait for converting a result row into a Rust struct.
///
/// This trait should typically be derived using `#[derive(FromRow)]`, or
/// comes for free with `#[derive(Record)]`.
///
/// # Example
///
/// ```ignore
/// use fieldorm::FromRow;
///
/// #[derive(FromRow)]
/// struct UserPosts {
///     user_id: i64,
///     post_count: i64,
///     nickname: Option<String>,
/// }
/// ```
pub trait FromRow: Sized {
    /// Convert a result row into Self
    fn from_row(row: &Row) -> OrmResult<Self>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> OrmResult<Self> {
        Ok(row.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Row {
        Row::new()
            .with("id", 7i64)
            .with("name", "alice")
            .with("nickname", Value::Null)
    }

    #[test]
    fn strict_get_requires_column() {
        let row = row();
        assert_eq!(row.try_get::<i64>("id").unwrap(), 7);
        let err = row.try_get::<i64>("missing").unwrap_err();
        assert!(matches!(err, OrmError::Decode { ref column, .. } if column == "missing"));
    }

    #[test]
    fn optional_get_maps_null_and_missing_to_none() {
        let row = row();
        assert_eq!(row.try_get_opt::<String>("nickname").unwrap(), None);
        assert_eq!(row.try_get_opt::<String>("missing").unwrap(), None);
        assert_eq!(
            row.try_get_opt::<String>("name").unwrap(),
            Some("alice".to_string())
        );
    }

    #[test]
    fn default_get_tolerates_missing_but_not_mismatch() {
        let row = row();
        assert_eq!(row.get_or_default::<i64>("count").unwrap(), 0);
        let err = row.get_or_default::<i64>("name").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Decode error on column 'name': expected int64, got string"
        );
    }

    #[test]
    fn collects_from_pairs() {
        let row: Row = vec![("a".to_string(), Value::Int32(1))].into_iter().collect();
        assert_eq!(row.columns().collect::<Vec<_>>(), ["a"]);
        assert_eq!(row.len(), 1);
    }
}
