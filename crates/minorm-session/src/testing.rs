//! A recording connection and sample records for session tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use minorm_core::{Connection, Error, FieldInfo, Model, Result, Row, SqlField, SqlType, Value};

use crate::{AfterDelete, AfterInsert, AfterQuery, AfterUpdate, BeforeDelete, BeforeInsert};
use crate::{BeforeQuery, BeforeQueryFn, BeforeUpdate, Hooks, Session};

thread_local! {
    static EVENTS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

pub fn record(event: impl Into<String>) {
    EVENTS.with(|e| e.borrow_mut().push(event.into()));
}

/// Everything recorded on this thread since the last `Recording::new`.
pub fn events() -> Vec<String> {
    EVENTS.with(|e| e.borrow().clone())
}

/// A connection that logs statements and answers queries from a script.
#[derive(Default)]
pub struct Recording {
    results: RefCell<VecDeque<Vec<Row>>>,
    fail_on: Option<&'static str>,
}

impl Recording {
    pub fn new() -> Self {
        EVENTS.with(|e| e.borrow_mut().clear());
        Self::default()
    }

    /// Queue the rows returned by the next query.
    pub fn returning(self, rows: Vec<Row>) -> Self {
        self.results.borrow_mut().push_back(rows);
        self
    }

    /// Fail any statement starting with `prefix`.
    pub fn fail_on(mut self, prefix: &'static str) -> Self {
        self.fail_on = Some(prefix);
        self
    }

    fn check(&self, sql: &str) -> Result<()> {
        match self.fail_on {
            Some(prefix) if sql.starts_with(prefix) => Err(Error::Custom(format!("{prefix} failed"))),
            _ => Ok(()),
        }
    }
}

impl Connection for Recording {
    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        record(format!("exec {sql} [{}]", params.len()));
        self.check(sql)?;
        Ok(1)
    }

    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        record(format!("query {sql} [{}]", params.len()));
        self.check(sql)?;
        Ok(self.results.borrow_mut().pop_front().unwrap_or_default())
    }

    fn describe(&self, sql: &str) -> Result<Vec<String>> {
        record(format!("describe {sql}"));
        Ok(Vec::new())
    }
}

pub fn user_row(name: &str, age: i32) -> Row {
    Row::new(
        vec!["Name".into(), "Age".into()],
        vec![Value::from(name), Value::Int(age)],
    )
}

/// Every hook except `BeforeQuery`, each logging its firing.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub name: String,
    pub age: i32,
}

impl User {
    pub fn new(name: &str, age: i32) -> Self {
        Self {
            name: name.to_string(),
            age,
        }
    }
}

impl Model for User {
    const TYPE_NAME: &'static str = "User";
    const TABLE_NAME: &'static str = "User";

    fn fields() -> &'static [FieldInfo] {
        static FIELDS: [FieldInfo; 2] = [
            FieldInfo::new("Name", SqlType::Text).tag("PRIMARY KEY"),
            FieldInfo::new("Age", SqlType::Integer),
        ];
        &FIELDS
    }

    fn to_values(&self) -> Vec<Value> {
        vec![self.name.to_value(), self.age.to_value()]
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            name: row.get_as(0)?,
            age: row.get_as(1)?,
        })
    }
}

macro_rules! logging_hook {
    ($trait:ident, $method:ident) => {
        impl $trait for User {
            fn $method(&mut self, _session: &mut Session<'_>) -> Result<()> {
                record(format!(concat!(stringify!($method), " {}"), self.name));
                Ok(())
            }
        }
    };
}

logging_hook!(BeforeInsert, before_insert);
logging_hook!(AfterInsert, after_insert);
logging_hook!(AfterQuery, after_query);
logging_hook!(BeforeUpdate, before_update);
logging_hook!(AfterUpdate, after_update);
logging_hook!(BeforeDelete, before_delete);
logging_hook!(AfterDelete, after_delete);

impl Hooks for User {
    fn as_after_query(&mut self) -> Option<&mut dyn AfterQuery> {
        Some(self)
    }

    fn as_before_update(&mut self) -> Option<&mut dyn BeforeUpdate> {
        Some(self)
    }

    fn as_after_update(&mut self) -> Option<&mut dyn AfterUpdate> {
        Some(self)
    }

    fn as_before_delete(&mut self) -> Option<&mut dyn BeforeDelete> {
        Some(self)
    }

    fn as_after_delete(&mut self) -> Option<&mut dyn AfterDelete> {
        Some(self)
    }

    fn as_before_insert(&mut self) -> Option<&mut dyn BeforeInsert> {
        Some(self)
    }

    fn as_after_insert(&mut self) -> Option<&mut dyn AfterInsert> {
        Some(self)
    }
}

/// Stages a default filter and redacts passwords after scanning.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: i64,
    pub password: String,
}

impl Model for Account {
    const TYPE_NAME: &'static str = "Account";
    const TABLE_NAME: &'static str = "Account";

    fn fields() -> &'static [FieldInfo] {
        static FIELDS: [FieldInfo; 2] = [
            FieldInfo::new("ID", SqlType::BigInt).tag("PRIMARY KEY"),
            FieldInfo::new("Password", SqlType::Text),
        ];
        &FIELDS
    }

    fn to_values(&self) -> Vec<Value> {
        vec![self.id.to_value(), self.password.to_value()]
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.get_as(0)?,
            password: row.get_as(1)?,
        })
    }
}

impl BeforeQuery for Account {
    fn before_query(session: &mut Session<'_>) -> Result<()> {
        session.filter("ID > ?", [Value::BigInt(0)]);
        Ok(())
    }
}

impl AfterQuery for Account {
    fn after_query(&mut self, _session: &mut Session<'_>) -> Result<()> {
        self.password = "******".to_string();
        Ok(())
    }
}

impl Hooks for Account {
    fn before_query_hook() -> Option<BeforeQueryFn> {
        Some(<Self as BeforeQuery>::before_query)
    }

    fn as_after_query(&mut self) -> Option<&mut dyn AfterQuery> {
        Some(self)
    }
}

/// Rejects every insert.
#[derive(Debug, Clone, Default)]
pub struct Locked {
    pub id: i64,
}

impl Model for Locked {
    const TYPE_NAME: &'static str = "Locked";
    const TABLE_NAME: &'static str = "Locked";

    fn fields() -> &'static [FieldInfo] {
        static FIELDS: [FieldInfo; 1] = [FieldInfo::new("ID", SqlType::BigInt)];
        &FIELDS
    }

    fn to_values(&self) -> Vec<Value> {
        vec![self.id.to_value()]
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.get_as(0)?,
        })
    }
}

impl BeforeInsert for Locked {
    fn before_insert(&mut self, _session: &mut Session<'_>) -> Result<()> {
        Err(Error::InvalidArgument("table is locked".to_string()))
    }
}

impl Hooks for Locked {
    fn as_before_insert(&mut self) -> Option<&mut dyn BeforeInsert> {
        Some(self)
    }
}
