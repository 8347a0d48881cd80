//! SQLite dialect.

use minorm_core::{SqlType, Value};

use super::Dialect;

/// Dialect for SQLite 3.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite3Dialect;

impl Dialect for Sqlite3Dialect {
    fn name(&self) -> &'static str {
        "sqlite3"
    }

    fn data_type_of(&self, sql_type: SqlType) -> &'static str {
        match sql_type {
            SqlType::Bool => "bool",
            SqlType::Integer => "integer",
            SqlType::BigInt => "bigint",
            SqlType::Real => "real",
            SqlType::Text => "text",
            SqlType::Blob => "blob",
            SqlType::DateTime => "datetime",
        }
    }

    fn table_exist_sql(&self, table: &str) -> (String, Vec<Value>) {
        (
            "SELECT name FROM sqlite_master WHERE type = ? AND name = ?".to_string(),
            vec![Value::from("table"), Value::from(table)],
        )
    }
}
