//! Session orchestration for minorm.
//!
//! A [`Session`] is one unit of interaction with a database. It borrows a
//! connection and a dialect, binds a record type to act on, stages query
//! parameters between calls, fires lifecycle hooks around record operations,
//! and brackets work in transactions.
//!
//! Sessions are short-lived and single-threaded. Staged parameters apply to
//! the next statement built from them and are cleared when that statement is
//! built, whether or not it then succeeds.
//!
//! # Example
//!
//! ```ignore
//! let mut session = Session::new(&conn, &Sqlite3Dialect);
//! session.model::<User>().create_table()?;
//! session.insert(&mut [tom, sam])?;
//!
//! let mut adults = Vec::new();
//! session.filter("Age > ?", [Value::Int(18)]).order_by("Age DESC").find(&mut adults)?;
//! ```

pub mod hooks;
pub mod record;
pub mod table;

pub use hooks::{
    AfterDelete, AfterInsert, AfterQuery, AfterUpdate, BeforeDelete, BeforeInsert, BeforeQuery,
    BeforeQueryFn, BeforeUpdate, HookPoint, Hooks,
};

use minorm_core::{Connection, Error, Model, Result, Row, Value};
use minorm_query::Clause;
use minorm_schema::{Dialect, Schema};

/// One unit of interaction with a database.
pub struct Session<'a> {
    conn: &'a dyn Connection,
    dialect: &'a dyn Dialect,
    /// Schema of the bound record type.
    table: Option<Schema>,
    /// Parameters staged for the next statement.
    pending: Clause,
    in_transaction: bool,
}

impl std::fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("dialect", &self.dialect.name())
            .field("table", &self.table.as_ref().map(|t| t.name.as_str()))
            .field("pending", &!self.pending.is_empty())
            .field("in_transaction", &self.in_transaction)
            .finish()
    }
}

impl<'a> Session<'a> {
    /// Create a session over `conn` speaking `dialect`.
    pub fn new(conn: &'a dyn Connection, dialect: &'a dyn Dialect) -> Self {
        Self {
            conn,
            dialect,
            table: None,
            pending: Clause::new(),
            in_transaction: false,
        }
    }

    pub fn connection(&self) -> &'a dyn Connection {
        self.conn
    }

    pub fn dialect(&self) -> &'a dyn Dialect {
        self.dialect
    }

    /// Whether a transaction opened by this session is active.
    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    // ========================================================================
    // Model binding
    // ========================================================================

    /// Bind `M` as the record type subsequent operations act on.
    ///
    /// Re-binding the type that is already bound keeps the existing schema.
    pub fn model<M: Model>(&mut self) -> &mut Self {
        if !self.table.as_ref().is_some_and(Schema::is_for::<M>) {
            tracing::debug!(model = M::TYPE_NAME, table = M::TABLE_NAME, "Binding model");
            self.table = Some(Schema::parse::<M>(self.dialect));
        }
        self
    }

    /// Schema of the bound record type.
    pub fn ref_table(&self) -> Result<&Schema> {
        self.table.as_ref().ok_or(Error::ModelNotSet)
    }

    /// Take the staged parameters, leaving none behind.
    pub(crate) fn take_pending(&mut self) -> Clause {
        std::mem::take(&mut self.pending)
    }

    // ========================================================================
    // Raw statements
    // ========================================================================

    /// Execute a statement, returning the number of affected rows.
    pub fn exec(&self, sql: &str, params: &[Value]) -> Result<u64> {
        tracing::debug!(sql = %sql, params = params.len(), "Executing statement");
        self.conn.execute(sql, params).map_err(|e| e.with_sql(sql))
    }

    /// Run a query and return every row.
    pub fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        tracing::debug!(sql = %sql, params = params.len(), "Running query");
        let rows = self.conn.query(sql, params).map_err(|e| e.with_sql(sql))?;
        tracing::trace!(rows = rows.len(), "Query returned");
        Ok(rows)
    }

    /// Run a query and return its first row, if any.
    pub fn query_one(&self, sql: &str, params: &[Value]) -> Result<Option<Row>> {
        tracing::debug!(sql = %sql, params = params.len(), "Running single-row query");
        self.conn.query_one(sql, params).map_err(|e| e.with_sql(sql))
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Open a transaction.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn begin(&mut self) -> Result<()> {
        if self.in_transaction {
            return Err(Error::Transaction(
                "a transaction is already in progress".to_string(),
            ));
        }
        tracing::info!("Beginning transaction");
        self.conn.begin()?;
        self.in_transaction = true;
        Ok(())
    }

    /// Commit the open transaction.
    ///
    /// On failure the transaction stays open so the caller can roll it back.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn commit(&mut self) -> Result<()> {
        if !self.in_transaction {
            return Err(Error::Transaction("no transaction to commit".to_string()));
        }
        tracing::info!("Committing transaction");
        self.conn.commit()?;
        self.in_transaction = false;
        Ok(())
    }

    /// Roll back the open transaction.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn rollback(&mut self) -> Result<()> {
        if !self.in_transaction {
            return Err(Error::Transaction(
                "no transaction to roll back".to_string(),
            ));
        }
        tracing::info!("Rolling back transaction");
        self.in_transaction = false;
        self.conn.rollback()
    }

    /// Run `f` inside a transaction.
    ///
    /// Commits when `f` succeeds. Rolls back and returns the error when `f`
    /// fails or the commit fails. If `f` already committed or rolled back
    /// itself, its result is returned as is.
    pub fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Session<'a>) -> Result<T>,
    {
        self.begin()?;
        let outcome = f(self).and_then(|value| {
            if self.in_transaction {
                self.commit()?;
            }
            Ok(value)
        });
        if let Err(e) = &outcome {
            tracing::warn!(error = %e, "Transaction failed");
            self.rollback_quietly();
        }
        outcome
    }

    fn rollback_quietly(&mut self) {
        if !self.in_transaction {
            return;
        }
        if let Err(e) = self.rollback() {
            tracing::error!(error = %e, "Rollback failed");
        }
    }
}

#[cfg(test)]
pub(crate) mod testing;
