//! The `Model` trait implemented by mapped record types.

use crate::error::Result;
use crate::field::FieldInfo;
use crate::row::Row;
use crate::value::Value;

/// A record type that maps to one table.
///
/// Usually implemented with `#[derive(Model)]`:
///
/// ```ignore
/// #[derive(Model)]
/// #[orm(table = "users")]
/// struct User {
///     #[orm(tag = "PRIMARY KEY")]
///     name: String,
///     age: i32,
/// }
/// ```
pub trait Model: Sized + 'static {
    /// The Rust type name.
    const TYPE_NAME: &'static str;

    /// The table name: the `#[orm(table = "...")]` override, or `TYPE_NAME`.
    const TABLE_NAME: &'static str;

    /// Mapped fields in declaration order.
    fn fields() -> &'static [FieldInfo];

    /// Field values in the same order as `fields()`.
    fn to_values(&self) -> Vec<Value>;

    /// Build a record from a row whose columns are in `fields()` order.
    fn from_row(row: &Row) -> Result<Self>;
}
