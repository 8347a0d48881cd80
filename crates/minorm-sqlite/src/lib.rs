//! SQLite driver for minorm.
//!
//! Implements the `Connection` trait from `minorm-core` on top of `rusqlite`
//! with a bundled SQLite, so no system library is needed.
//!
//! Value mapping:
//!
//! | minorm `Value` | SQLite storage |
//! |----------------|----------------|
//! | `Bool`, `Int`, `BigInt` | INTEGER |
//! | `Double` | REAL |
//! | `Text` | TEXT |
//! | `Bytes` | BLOB |
//! | `Timestamp` | TEXT, `%Y-%m-%d %H:%M:%S%.f` |
//!
//! Values read back are `BigInt`, `Double`, `Text`, `Bytes` or `Null`; the
//! `SqlField` impls convert them to the record's field types.

pub mod connection;

pub use connection::SqliteConnection;
