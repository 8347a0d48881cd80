//! The engine: a long-lived connection plus its dialect.

use serde::{Deserialize, Serialize};

use minorm_core::{Connection, Error, Result};
use minorm_schema::Dialect;
use minorm_session::Session;

/// Where and how to connect.
///
/// ```
/// use minorm::EngineConfig;
///
/// let config = EngineConfig::from_json(r#"{"driver": "sqlite3", "source": "gee.db"}"#).unwrap();
/// assert_eq!(config.driver, "sqlite3");
/// assert_eq!(config.source, "gee.db");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Driver name, e.g. `"sqlite3"`
    pub driver: String,
    /// Driver-specific data source, e.g. a database file path
    pub source: String,
}

impl EngineConfig {
    pub fn new(driver: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            source: source.into(),
        }
    }

    /// SQLite at `source`; `":memory:"` opens a private in-memory database.
    pub fn sqlite(source: impl Into<String>) -> Self {
        Self::new("sqlite3", source)
    }

    /// Parse a JSON object with `driver` and `source` keys.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(format!("invalid engine config: {e}")))
    }
}

/// Owns a connection and the dialect spoken over it.
pub struct Engine {
    conn: Box<dyn Connection>,
    dialect: Box<dyn Dialect>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("dialect", &self.dialect.name())
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Wrap an open connection.
    pub fn new(conn: impl Connection + 'static, dialect: impl Dialect + 'static) -> Self {
        Self {
            conn: Box::new(conn),
            dialect: Box::new(dialect),
        }
    }

    /// Open the database named by `config` and check that it answers.
    #[tracing::instrument(level = "debug")]
    pub fn open(config: &EngineConfig) -> Result<Self> {
        let engine = match config.driver.as_str() {
            #[cfg(feature = "sqlite")]
            "sqlite3" | "sqlite" => {
                let conn = if config.source == ":memory:" {
                    minorm_sqlite::SqliteConnection::open_memory()?
                } else {
                    minorm_sqlite::SqliteConnection::open(&config.source)?
                };
                Self::new(conn, minorm_schema::Sqlite3Dialect)
            }
            other => {
                tracing::error!(driver = other, "Unsupported driver");
                return Err(Error::Config(format!("unsupported driver `{other}`")));
            }
        };

        engine.conn.ping().inspect_err(|e| {
            tracing::error!(error = %e, "Database did not answer ping");
        })?;
        tracing::info!(driver = %config.driver, "Connected to database");
        Ok(engine)
    }

    /// Release the connection.
    pub fn close(self) {
        tracing::info!(dialect = self.dialect.name(), "Closed database");
    }

    pub fn connection(&self) -> &dyn Connection {
        &*self.conn
    }

    pub fn dialect(&self) -> &dyn Dialect {
        &*self.dialect
    }

    /// A fresh session with no bound model and nothing staged.
    pub fn new_session(&self) -> Session<'_> {
        Session::new(&*self.conn, &*self.dialect)
    }

    /// Run `f` in a transaction on a fresh session.
    ///
    /// Commits when `f` returns `Ok`; otherwise rolls back and returns the error.
    pub fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Session<'_>) -> Result<T>,
    {
        self.new_session().transaction(f)
    }
}
