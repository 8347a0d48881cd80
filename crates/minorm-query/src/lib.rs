//! Clause builder for minorm.
//!
//! Statements are assembled from a fixed set of clause kinds. Each kind has
//! exactly one generator turning its arguments into a SQL fragment plus the
//! bind values for that fragment's `?` placeholders. A [`Clause`] stores the
//! generated fragment per kind and [`Clause::build`] joins a caller-chosen
//! sequence of kinds into one statement:
//!
//! ```
//! use minorm_core::Value;
//! use minorm_query::{Clause, ClauseArgs, ClauseKind};
//!
//! let (sql, vars) = Clause::new()
//!     .with(ClauseKind::Select, ClauseArgs::select("users", ["name", "age"]))
//!     .with(ClauseKind::Where, ClauseArgs::filter("name = ?", [Value::from("Tom")]))
//!     .with(ClauseKind::Limit, ClauseArgs::Limit(3))
//!     .build(&[ClauseKind::Select, ClauseKind::Where, ClauseKind::OrderBy, ClauseKind::Limit]);
//!
//! assert_eq!(sql, "SELECT name, age FROM users WHERE name = ? LIMIT ?");
//! assert_eq!(vars, vec![Value::from("Tom"), Value::BigInt(3)]);
//! ```

pub mod clause;
pub mod generator;

pub use clause::{Clause, ClauseArgs, ClauseKind};
pub use generator::{Generator, generator};
