//! SQL dialects.
//!
//! A dialect is injected into the engine and every session it creates; there
//! is no process-wide registry.

mod sqlite;

pub use sqlite::Sqlite3Dialect;

use minorm_core::{SqlType, Value};

/// Database-specific pieces the schema mapper and session need.
pub trait Dialect: std::fmt::Debug {
    /// Short name, e.g. `"sqlite3"`.
    fn name(&self) -> &'static str;

    /// Column type name for a field classification.
    fn data_type_of(&self, sql_type: SqlType) -> &'static str;

    /// A query returning one row holding the table name when `table` exists,
    /// and no row otherwise, plus its bind values.
    fn table_exist_sql(&self, table: &str) -> (String, Vec<Value>);
}
