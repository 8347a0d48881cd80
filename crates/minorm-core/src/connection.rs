//! The driver contract.

use crate::error::Result;
use crate::row::Row;
use crate::value::Value;

/// A blocking database connection.
///
/// Placeholders in `sql` are positional `?` markers, one per element of
/// `params`. The trait is object safe; sessions hold a `&dyn Connection`.
pub trait Connection {
    /// Execute a statement and return the number of affected rows.
    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64>;

    /// Run a query and collect every row.
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>>;

    /// Run a query and return its first row, if any.
    fn query_one(&self, sql: &str, params: &[Value]) -> Result<Option<Row>> {
        Ok(self.query(sql, params)?.into_iter().next())
    }

    /// Result column names of a query, without fetching any row.
    fn describe(&self, sql: &str) -> Result<Vec<String>>;

    /// Start a transaction.
    fn begin(&self) -> Result<()> {
        self.execute("BEGIN", &[]).map(|_| ())
    }

    /// Commit the open transaction.
    fn commit(&self) -> Result<()> {
        self.execute("COMMIT", &[]).map(|_| ())
    }

    /// Roll back the open transaction.
    fn rollback(&self) -> Result<()> {
        self.execute("ROLLBACK", &[]).map(|_| ())
    }

    /// Check that the database answers.
    fn ping(&self) -> Result<()> {
        self.query_one("SELECT 1", &[]).map(|_| ())
    }
}
