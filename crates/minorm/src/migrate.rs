//! Bring a table in line with its record type.

use minorm_core::{Model, Result};
use minorm_schema::{ddl, diff};
use minorm_session::Session;

use crate::engine::Engine;

/// What a migration changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub table: String,
    /// The table did not exist and was created.
    pub created: bool,
    /// Columns added, in schema order.
    pub added: Vec<String>,
    /// Columns removed, in their former table order.
    pub dropped: Vec<String>,
}

impl MigrationReport {
    /// True when the table already matched.
    pub fn is_noop(&self) -> bool {
        !self.created && self.added.is_empty() && self.dropped.is_empty()
    }
}

impl Engine {
    /// Make `M`'s table match `M`, inside one transaction.
    ///
    /// A missing table is created. Otherwise new fields become new columns,
    /// and columns without a field are dropped by rebuilding the table from
    /// the surviving columns. Running it again changes nothing.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn migrate<M: Model>(&self) -> Result<MigrationReport> {
        self.transaction(|session| migrate_in::<M>(session))
    }
}

fn migrate_in<M: Model>(session: &mut Session<'_>) -> Result<MigrationReport> {
    session.model::<M>();
    let schema = session.ref_table()?.clone();
    let mut report = MigrationReport {
        table: schema.name.clone(),
        ..MigrationReport::default()
    };

    if !session.has_table()? {
        for sql in ddl::generate(&diff::create(&schema)) {
            session.exec(&sql, &[])?;
        }
        report.created = true;
        tracing::info!(table = %schema.name, "Created table");
        return Ok(report);
    }

    let live = session
        .connection()
        .describe(&format!("SELECT * FROM {} LIMIT 1", schema.name))?;
    let plan = diff::plan(&schema, &live);
    if plan.is_empty() {
        tracing::debug!(table = %schema.name, "Table is up to date");
        return Ok(report);
    }

    tracing::info!(
        table = %schema.name,
        added = ?plan.added.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
        dropped = ?plan.dropped,
        "Migrating table"
    );

    for op in plan.operations(&schema) {
        for sql in ddl::generate(&op) {
            session.exec(&sql, &[])?;
        }
    }

    report.added = plan.added.into_iter().map(|f| f.name).collect();
    report.dropped = plan.dropped;
    Ok(report)
}
