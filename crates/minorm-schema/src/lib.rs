//! Schema mapping, dialects and migration planning for minorm.
//!
//! - [`Dialect`] maps field classifications to column type names and
//!   provides the table-existence query. [`Sqlite3Dialect`] is the built-in one.
//! - [`Schema::parse`] derives a table description from a `Model` type.
//! - [`ddl`] renders table DDL; [`diff`] compares a schema with the columns of a
//!   live table and plans the operations that bring the table in line.

pub mod ddl;
pub mod dialect;
pub mod diff;
pub mod schema;

pub use dialect::{Dialect, Sqlite3Dialect};
pub use diff::{MigrationPlan, SchemaOperation, plan};
pub use schema::{Field, Schema};
