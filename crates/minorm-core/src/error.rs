//! Error types shared by every minorm crate.

use std::fmt;

/// Result alias used throughout minorm.
pub type Result<T> = std::result::Result<T, Error>;

/// The primary error type.
#[derive(Debug)]
pub enum Error {
    /// The driver could not open or reach the database.
    Connection(ConnectionError),
    /// A statement failed to execute.
    Query(QueryError),
    /// A column value could not be converted into the requested Rust type.
    Type(TypeError),
    /// An operation needed a bound model but none was set on the session.
    ModelNotSet,
    /// `first` matched no rows.
    NotFound,
    /// The caller passed arguments the operation cannot use.
    InvalidArgument(String),
    /// Transaction control was used out of order.
    Transaction(String),
    /// Engine configuration could not be parsed or is unsupported.
    Config(String),
    /// Anything else.
    Custom(String),
}

impl Error {
    /// Shorthand for a statement failure without driver detail.
    pub fn query(kind: QueryErrorKind, message: impl Into<String>) -> Self {
        Error::Query(QueryError {
            kind,
            message: message.into(),
            sql: None,
        })
    }

    /// Attach the SQL text that produced this error, if it is a query error.
    #[must_use]
    pub fn with_sql(self, sql: &str) -> Self {
        match self {
            Error::Query(mut e) => {
                e.sql.get_or_insert_with(|| sql.to_string());
                Error::Query(e)
            }
            other => other,
        }
    }

    /// True for the `NotFound` outcome of `first`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Connection(e) => write!(f, "connection error: {}", e),
            Error::Query(e) => write!(f, "{}", e),
            Error::Type(e) => write!(f, "{}", e),
            Error::ModelNotSet => write!(f, "model is not set"),
            Error::NotFound => write!(f, "record not found"),
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            Error::Transaction(msg) => write!(f, "transaction error: {}", msg),
            Error::Config(msg) => write!(f, "configuration error: {}", msg),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Connection(e) => Some(e),
            Error::Query(e) => Some(e),
            Error::Type(e) => Some(e),
            _ => None,
        }
    }
}

/// Failure to open or reach a database.
#[derive(Debug, Clone)]
pub struct ConnectionError {
    pub message: String,
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ConnectionError {}

/// Broad classification of statement failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// The statement text was rejected by the database.
    Syntax,
    /// A constraint (primary key, unique, not null, ...) was violated.
    Constraint,
    /// Any other database-side failure.
    Database,
}

/// A statement that failed to execute.
#[derive(Debug, Clone)]
pub struct QueryError {
    pub kind: QueryErrorKind,
    pub message: String,
    /// The SQL text, when known.
    pub sql: Option<String>,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sql {
            Some(sql) => write!(f, "query error ({:?}): {} [sql: {}]", self.kind, self.message, sql),
            None => write!(f, "query error ({:?}): {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for QueryError {}

/// A value that could not be converted to the requested type.
#[derive(Debug, Clone)]
pub struct TypeError {
    pub expected: &'static str,
    pub actual: String,
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type error: expected {}, found {}", self.expected, self.actual)
    }
}

impl std::error::Error for TypeError {}
