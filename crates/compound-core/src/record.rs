//! Result records: one row as an ordered column-name to value mapping.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One row of a query result.
///
/// Column names are shared between all records produced by the same
/// statement, so cloning a record does not copy the header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Record {
    /// Creates a record from a shared header and the row values.
    ///
    /// Panics if the lengths differ; callers build both from the same
    /// statement metadata.
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        assert_eq!(
            columns.len(),
            values.len(),
            "record header and values must have the same width"
        );
        Self { columns, values }
    }

    /// Column names in projection order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values in projection order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the record has no columns
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Looks up a value by column name.
    ///
    /// Names are matched case-insensitively since engines differ in how
    /// they fold unquoted identifiers. The first match wins.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(column))
            .map(|i| &self.values[i])
    }

    /// Looks up a text value by column name.
    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_str)
    }

    /// Value at a column position.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Iterates over `(column, value)` pairs in projection order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Consumes the record and returns its values.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}
