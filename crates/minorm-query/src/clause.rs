//! Clause kinds, clause arguments and the per-statement clause set.

use std::collections::HashMap;

use minorm_core::Value;

use crate::generator::generator;

/// The fixed set of statement fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    Insert,
    Values,
    Select,
    Limit,
    Where,
    OrderBy,
    Update,
    Delete,
    Count,
}

impl ClauseKind {
    /// Every kind, in declaration order.
    pub const ALL: [ClauseKind; 9] = [
        ClauseKind::Insert,
        ClauseKind::Values,
        ClauseKind::Select,
        ClauseKind::Limit,
        ClauseKind::Where,
        ClauseKind::OrderBy,
        ClauseKind::Update,
        ClauseKind::Delete,
        ClauseKind::Count,
    ];
}

/// Arguments for one clause generator.
///
/// Each variant is the argument shape of the kind with the same name.
#[derive(Debug, Clone, PartialEq)]
pub enum ClauseArgs {
    Insert { table: String, fields: Vec<String> },
    /// One inner vector per row; all rows have the same length.
    Values(Vec<Vec<Value>>),
    Select { table: String, fields: Vec<String> },
    Limit(i64),
    /// A raw boolean predicate with its own `?` placeholders, and their values.
    Where { expr: String, args: Vec<Value> },
    OrderBy(String),
    /// Column assignments, emitted in the given order.
    Update {
        table: String,
        assignments: Vec<(String, Value)>,
    },
    Delete { table: String },
    Count { table: String },
}

fn strings<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

impl ClauseArgs {
    /// `INSERT INTO table (fields)`
    pub fn insert<I, S>(table: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ClauseArgs::Insert {
            table: table.into(),
            fields: strings(fields),
        }
    }

    /// `SELECT fields FROM table`
    pub fn select<I, S>(table: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ClauseArgs::Select {
            table: table.into(),
            fields: strings(fields),
        }
    }

    /// `WHERE expr`
    pub fn filter<I>(expr: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        ClauseArgs::Where {
            expr: expr.into(),
            args: args.into_iter().collect(),
        }
    }

    /// The kind these arguments belong to.
    pub const fn kind(&self) -> ClauseKind {
        match self {
            ClauseArgs::Insert { .. } => ClauseKind::Insert,
            ClauseArgs::Values(_) => ClauseKind::Values,
            ClauseArgs::Select { .. } => ClauseKind::Select,
            ClauseArgs::Limit(_) => ClauseKind::Limit,
            ClauseArgs::Where { .. } => ClauseKind::Where,
            ClauseArgs::OrderBy(_) => ClauseKind::OrderBy,
            ClauseArgs::Update { .. } => ClauseKind::Update,
            ClauseArgs::Delete { .. } => ClauseKind::Delete,
            ClauseArgs::Count { .. } => ClauseKind::Count,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Fragment {
    sql: String,
    vars: Vec<Value>,
}

/// Generated fragments for one statement, keyed by kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clause {
    fragments: HashMap<ClauseKind, Fragment>,
}

impl Clause {
    /// An empty clause set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the fragment for `kind`, replacing any earlier one.
    ///
    /// # Panics
    ///
    /// Panics if `args` is not the argument shape of `kind`; see [`generator`].
    pub fn set(&mut self, kind: ClauseKind, args: ClauseArgs) {
        let (sql, vars) = generator(kind)(args);
        tracing::trace!(?kind, sql = %sql, vars = vars.len(), "Generated clause");
        self.fragments.insert(kind, Fragment { sql, vars });
    }

    /// By-value form of [`Clause::set`].
    #[must_use]
    pub fn with(mut self, kind: ClauseKind, args: ClauseArgs) -> Self {
        self.set(kind, args);
        self
    }

    /// Whether a fragment is stored for `kind`.
    pub fn is_set(&self, kind: ClauseKind) -> bool {
        self.fragments.contains_key(&kind)
    }

    /// True if no fragment is stored.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Join the fragments of `kinds`, in that order, into one statement.
    ///
    /// Kinds without a stored fragment are skipped. Fragments are separated by
    /// one space and bind values are concatenated in the same order.
    pub fn build(&self, kinds: &[ClauseKind]) -> (String, Vec<Value>) {
        let mut parts = Vec::with_capacity(kinds.len());
        let mut vars = Vec::new();
        for kind in kinds {
            if let Some(fragment) = self.fragments.get(kind) {
                parts.push(fragment.sql.as_str());
                vars.extend(fragment.vars.iter().cloned());
            }
        }
        (parts.join(" "), vars)
    }
}
