//! `Connection` implementation over `rusqlite`.

use std::path::Path;

use minorm_core::types::TIMESTAMP_FORMAT;
use minorm_core::{Connection, ConnectionError, Error, QueryErrorKind, Result, Row, Value};
use rusqlite::ErrorCode;
use rusqlite::types::{Value as SqliteValue, ValueRef};

/// A single SQLite database handle.
pub struct SqliteConnection {
    conn: rusqlite::Connection,
    source: String,
}

impl std::fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl SqliteConnection {
    /// Open (or create) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let conn = rusqlite::Connection::open(path).map_err(|e| connection_error(&source, &e))?;
        tracing::info!(source = %source, "Opened SQLite database");
        Ok(Self { conn, source })
    }

    /// Open a private in-memory database.
    pub fn open_memory() -> Result<Self> {
        let source = ":memory:".to_string();
        let conn =
            rusqlite::Connection::open_in_memory().map_err(|e| connection_error(&source, &e))?;
        tracing::info!("Opened in-memory SQLite database");
        Ok(Self { conn, source })
    }

    /// Where this connection points, as given when opening.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The wrapped `rusqlite` connection.
    pub fn inner(&self) -> &rusqlite::Connection {
        &self.conn
    }
}

impl Connection for SqliteConnection {
    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        tracing::trace!(sql = %sql, params = params.len(), "sqlite execute");
        let affected = self
            .conn
            .execute(sql, rusqlite::params_from_iter(params.iter().map(to_sqlite)))
            .map_err(|e| query_error(sql, &e))?;
        Ok(affected as u64)
    }

    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        tracing::trace!(sql = %sql, params = params.len(), "sqlite query");
        let mut stmt = self.conn.prepare(sql).map_err(|e| query_error(sql, &e))?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt
            .query(rusqlite::params_from_iter(params.iter().map(to_sqlite)))
            .map_err(|e| query_error(sql, &e))?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(|e| query_error(sql, &e))? {
            let mut values = Vec::with_capacity(columns.len());
            for idx in 0..columns.len() {
                let value = row.get_ref(idx).map_err(|e| query_error(sql, &e))?;
                values.push(from_sqlite(value));
            }
            out.push(Row::new(columns.clone(), values));
        }
        Ok(out)
    }

    fn describe(&self, sql: &str) -> Result<Vec<String>> {
        let stmt = self.conn.prepare(sql).map_err(|e| query_error(sql, &e))?;
        Ok(stmt.column_names().into_iter().map(String::from).collect())
    }

    fn begin(&self) -> Result<()> {
        self.conn
            .execute_batch("BEGIN")
            .map_err(|e| query_error("BEGIN", &e))
    }

    fn commit(&self) -> Result<()> {
        self.conn
            .execute_batch("COMMIT")
            .map_err(|e| query_error("COMMIT", &e))
    }

    fn rollback(&self) -> Result<()> {
        self.conn
            .execute_batch("ROLLBACK")
            .map_err(|e| query_error("ROLLBACK", &e))
    }
}

fn to_sqlite(value: &Value) -> SqliteValue {
    match value {
        Value::Null => SqliteValue::Null,
        Value::Bool(b) => SqliteValue::Integer(i64::from(*b)),
        Value::Int(v) => SqliteValue::Integer(i64::from(*v)),
        Value::BigInt(v) => SqliteValue::Integer(*v),
        Value::Double(v) => SqliteValue::Real(*v),
        Value::Text(s) => SqliteValue::Text(s.clone()),
        Value::Bytes(b) => SqliteValue::Blob(b.clone()),
        Value::Timestamp(ts) => SqliteValue::Text(ts.format(TIMESTAMP_FORMAT).to_string()),
    }
}

fn from_sqlite(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::BigInt(v),
        ValueRef::Real(v) => Value::Double(v),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Bytes(bytes.to_vec()),
    }
}

fn connection_error(source: &str, err: &rusqlite::Error) -> Error {
    Error::Connection(ConnectionError {
        message: format!("failed to open {source}: {err}"),
    })
}

fn query_error(sql: &str, err: &rusqlite::Error) -> Error {
    let message = err.to_string();
    let kind = match err.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => QueryErrorKind::Constraint,
        _ if message.contains("syntax error") => QueryErrorKind::Syntax,
        _ => QueryErrorKind::Database,
    };
    Error::query(kind, message).with_sql(sql)
}
