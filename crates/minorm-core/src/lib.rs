//! Core types and traits for minorm.
//!
//! `minorm-core` is the **foundation layer** of the workspace. It defines the
//! traits and data types every other crate builds on.
//!
//! # Role In The Architecture
//!
//! - **Contract layer**: `Model` and `Connection` are the primary traits implemented by
//!   user records (usually through `#[derive(Model)]`) and database drivers.
//! - **Data model**: `Row`, `Value`, `SqlType` and `FieldInfo` describe statement inputs,
//!   query outputs and the compile-time field descriptors of a record type.
//!
//! # Who Uses This Crate
//!
//! - `minorm-macros` generates `Model` implementations defined here.
//! - `minorm-query` turns `Value`s into bind parameters for generated clauses.
//! - `minorm-schema` maps `FieldInfo` descriptors to table schemas through a dialect.
//! - `minorm-session` drives a `Connection` and scans `Row`s back into models.
//! - `minorm-sqlite` implements `Connection` on top of SQLite.
//!
//! Most applications should use the `minorm` facade instead of this crate directly.

pub mod connection;
pub mod error;
pub mod field;
pub mod identifiers;
pub mod model;
pub mod row;
pub mod types;
pub mod value;

pub use connection::Connection;
pub use error::{
    ConnectionError, Error, QueryError, QueryErrorKind, Result, TypeError,
};
pub use field::FieldInfo;
pub use identifiers::{is_valid_identifier, validate_identifier};
pub use model::Model;
pub use row::Row;
pub use types::{SqlField, SqlType};
pub use value::Value;
