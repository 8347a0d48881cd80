//! minorm: map structs to tables and work with them through sessions.
//!
//! This is the facade crate. It re-exports the pieces most applications need
//! and adds the [`Engine`], which owns a connection and hands out sessions.
//!
//! # Crates
//!
//! - `minorm-core`: `Value`, `Row`, `Model`, `Connection` and the error type
//! - `minorm-macros`: `#[derive(Model)]`
//! - `minorm-query`: SQL clause generators and the clause assembler
//! - `minorm-schema`: dialects, table schemas and migration diffing
//! - `minorm-session`: sessions, lifecycle hooks and transactions
//! - `minorm-sqlite`: the SQLite driver (feature `sqlite`, on by default)
//!
//! # Example
//!
//! ```ignore
//! use minorm::prelude::*;
//!
//! #[derive(Model, Debug)]
//! #[orm(table = "users")]
//! struct User {
//!     #[orm(tag = "PRIMARY KEY")]
//!     Name: String,
//!     Age: i32,
//! }
//!
//! let engine = Engine::open(&EngineConfig::sqlite("app.db"))?;
//! engine.migrate::<User>()?;
//!
//! let mut session = engine.new_session();
//! session.insert(&mut [User { Name: "Tom".into(), Age: 18 }])?;
//! let tom: User = session.filter("Name = ?", ["Tom"]).first()?;
//! ```

// Lets `#[derive(Model)]` output, which names `::minorm`, compile inside this crate.
extern crate self as minorm;

pub mod engine;
pub mod migrate;

pub use engine::{Engine, EngineConfig};
pub use migrate::MigrationReport;

pub use minorm_core::{
    Connection, ConnectionError, Error, FieldInfo, Model, QueryError, QueryErrorKind, Result,
    Row, SqlField, SqlType, TypeError, Value,
};
pub use minorm_macros::Model;
pub use minorm_query::{Clause, ClauseArgs, ClauseKind};
pub use minorm_schema::{Dialect, Field, MigrationPlan, Schema, SchemaOperation, Sqlite3Dialect};
pub use minorm_session::{
    AfterDelete, AfterInsert, AfterQuery, AfterUpdate, BeforeDelete, BeforeInsert, BeforeQuery,
    BeforeQueryFn, BeforeUpdate, HookPoint, Hooks, Session,
};

#[cfg(feature = "sqlite")]
pub use minorm_sqlite::SqliteConnection;

/// Everything needed to declare records and run sessions.
pub mod prelude {
    pub use crate::{
        AfterDelete, AfterInsert, AfterQuery, AfterUpdate, BeforeDelete, BeforeInsert,
        BeforeQuery, BeforeUpdate, Connection, Engine, EngineConfig, Error, Hooks,
        MigrationReport, Model, Result, Row, Session, SqlField, Value,
    };

    #[cfg(feature = "sqlite")]
    pub use crate::SqliteConnection;
}
