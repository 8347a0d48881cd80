//! Result rows.

use crate::error::{Error, Result};
use crate::types::SqlField;
use crate::value::Value;

/// One row returned by a query: column names plus values, in select order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    /// Create a row. `columns` and `values` must have the same length.
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Column names in select order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All values in select order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Value at a position.
    pub fn get(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    /// Value by column name.
    pub fn get_named(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Typed value at a position.
    pub fn get_as<T: SqlField>(&self, idx: usize) -> Result<T> {
        let value = self.get(idx).ok_or_else(|| {
            Error::Custom(format!(
                "column index {} out of range for a row of {} columns",
                idx,
                self.len()
            ))
        })?;
        T::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Row {
        Row::new(
            vec!["name".to_string(), "age".to_string()],
            vec![Value::Text("Tom".to_string()), Value::BigInt(18)],
        )
    }

    #[test]
    fn test_positional_and_named_access() {
        let row = sample();
        assert_eq!(row.len(), 2);
        assert_eq!(row.get_named("age"), Some(&Value::BigInt(18)));
        assert_eq!(row.get_as::<String>(0).unwrap(), "Tom");
        assert_eq!(row.get_as::<i32>(1).unwrap(), 18);
    }

    #[test]
    fn test_out_of_range_index_is_error() {
        assert!(sample().get_as::<i64>(5).is_err());
        assert!(sample().get_named("missing").is_none());
    }
}
