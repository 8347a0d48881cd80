//! Record operations and query staging.
//!
//! Staging setters ([`Session::filter`], [`Session::limit`],
//! [`Session::order_by`]) record parameters for the next statement. Every
//! statement-building operation takes them, so nothing staged survives into a
//! later statement.

use minorm_core::{Error, Model, QueryErrorKind, Result, Value, validate_identifier};
use minorm_query::{Clause, ClauseArgs, ClauseKind};

use crate::{HookPoint, Hooks, Session};

/// Table and column names of the record type an operation acts on.
struct Target {
    model: &'static str,
    table: String,
    fields: Vec<String>,
    primary_key: Option<usize>,
}

impl Target {
    fn primary_key(&self) -> Result<usize> {
        self.primary_key.ok_or_else(|| {
            Error::InvalidArgument(format!("{} has no primary key field", self.model))
        })
    }
}

impl Session<'_> {
    fn target<M: Model>(&mut self) -> Result<Target> {
        let schema = self.model::<M>().ref_table()?;
        Ok(Target {
            model: schema.model_name(),
            table: schema.name.clone(),
            fields: schema.field_names().to_vec(),
            primary_key: schema
                .primary_key()
                .and_then(|field| schema.position(&field.name)),
        })
    }

    fn reset_pending(&mut self) {
        self.pending = Clause::new();
    }

    // ========================================================================
    // Staging
    // ========================================================================

    /// Stage a `WHERE` predicate with its `?` bind values.
    pub fn filter<I>(&mut self, expr: impl Into<String>, args: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let args = ClauseArgs::filter(expr, args.into_iter().map(Into::into));
        self.pending.set(ClauseKind::Where, args);
        self
    }

    /// Stage a row limit.
    pub fn limit(&mut self, n: i64) -> &mut Self {
        self.pending.set(ClauseKind::Limit, ClauseArgs::Limit(n));
        self
    }

    /// Stage an ordering expression, e.g. `"Age DESC"`.
    pub fn order_by(&mut self, expr: impl Into<String>) -> &mut Self {
        self.pending
            .set(ClauseKind::OrderBy, ClauseArgs::OrderBy(expr.into()));
        self
    }

    // ========================================================================
    // Insert
    // ========================================================================

    /// Insert `records` in one statement, binding their type as the model.
    ///
    /// `BeforeInsert` fires on every record before the statement runs and
    /// `AfterInsert` on every record after it succeeded. An empty slice is a
    /// no-op returning 0.
    #[tracing::instrument(level = "debug", skip(self, records))]
    pub fn insert<M: Model + Hooks>(&mut self, records: &mut [M]) -> Result<u64> {
        let mut clause = self.take_pending();
        let target = self.target::<M>()?;
        if records.is_empty() {
            return Ok(0);
        }

        tracing::info!(
            model = M::TYPE_NAME,
            table = %target.table,
            count = records.len(),
            "Inserting records"
        );

        let mut rows = Vec::with_capacity(records.len());
        for record in records.iter_mut() {
            self.call_method(HookPoint::BeforeInsert, record)?;
            rows.push(self.ref_table()?.record_values(record));
        }

        clause.set(
            ClauseKind::Insert,
            ClauseArgs::Insert {
                table: target.table,
                fields: target.fields,
            },
        );
        clause.set(ClauseKind::Values, ClauseArgs::Values(rows));
        let (sql, vars) = clause.build(&[ClauseKind::Insert, ClauseKind::Values]);
        let affected = self.exec(&sql, &vars)?;

        for record in records.iter_mut() {
            self.call_method(HookPoint::AfterInsert, record)?;
        }
        Ok(affected)
    }

    /// Insert a single record.
    pub fn insert_one<M: Model + Hooks>(&mut self, record: &mut M) -> Result<u64> {
        self.insert(std::slice::from_mut(record))
    }

    // ========================================================================
    // Query
    // ========================================================================

    /// Append every row matching the staged parameters to `dest`.
    ///
    /// `BeforeQuery` of `M` runs first and may stage parameters of its own.
    /// `AfterQuery` fires on each record. `dest` is left untouched unless every
    /// row scans and passes its hook.
    #[tracing::instrument(level = "debug", skip(self, dest))]
    pub fn find<M: Model + Hooks>(&mut self, dest: &mut Vec<M>) -> Result<()> {
        let target = self.target::<M>().inspect_err(|_| self.reset_pending())?;
        self.call_before_query::<M>()
            .inspect_err(|_| self.reset_pending())?;

        let mut clause = self.take_pending();
        clause.set(
            ClauseKind::Select,
            ClauseArgs::Select {
                table: target.table,
                fields: target.fields,
            },
        );
        let (sql, vars) = clause.build(&[
            ClauseKind::Select,
            ClauseKind::Where,
            ClauseKind::OrderBy,
            ClauseKind::Limit,
        ]);

        let rows = self.query(&sql, &vars)?;
        let mut found = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut record = M::from_row(row)?;
            self.call_method(HookPoint::AfterQuery, &mut record)?;
            found.push(record);
        }
        dest.append(&mut found);

        tracing::debug!(model = M::TYPE_NAME, rows = rows.len(), "Found records");
        Ok(())
    }

    /// The first record matching the staged parameters.
    ///
    /// Returns [`Error::NotFound`] when nothing matches.
    pub fn first<M: Model + Hooks>(&mut self) -> Result<M> {
        let mut found = Vec::with_capacity(1);
        self.limit(1).find(&mut found)?;
        found.pop().ok_or(Error::NotFound)
    }

    /// Number of rows of the bound table matching the staged filter.
    pub fn count(&mut self) -> Result<i64> {
        let mut clause = self.take_pending();
        let table = self.ref_table()?.name.clone();
        clause.set(ClauseKind::Count, ClauseArgs::Count { table });
        let (sql, vars) = clause.build(&[ClauseKind::Count, ClauseKind::Where]);

        let row = self.query_one(&sql, &vars)?.ok_or_else(|| {
            Error::query(QueryErrorKind::Database, "count returned no row").with_sql(&sql)
        })?;
        row.get_as(0)
    }

    // ========================================================================
    // Update / delete
    // ========================================================================

    /// Update rows of the bound table matching the staged filter.
    ///
    /// Columns are assigned in the order given. Column names must be plain
    /// identifiers.
    #[tracing::instrument(level = "debug", skip(self, assignments))]
    pub fn update<I, K, V>(&mut self, assignments: I) -> Result<u64>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut clause = self.take_pending();
        let table = self.ref_table()?.name.clone();

        let assignments: Vec<(String, Value)> = assignments
            .into_iter()
            .map(|(column, value)| (column.into(), value.into()))
            .collect();
        if assignments.is_empty() {
            return Err(Error::InvalidArgument(
                "update needs at least one column".to_string(),
            ));
        }
        for (column, _) in &assignments {
            validate_identifier(column)?;
        }

        clause.set(
            ClauseKind::Update,
            ClauseArgs::Update { table, assignments },
        );
        let (sql, vars) = clause.build(&[ClauseKind::Update, ClauseKind::Where]);
        self.exec(&sql, &vars)
    }

    /// [`Session::update`] from an alternating column/value list.
    ///
    /// The list must have even length and every column entry must be text.
    pub fn update_flat(&mut self, kv: Vec<Value>) -> Result<u64> {
        let pairs = flat_pairs(kv).inspect_err(|_| self.reset_pending())?;
        self.update(pairs)
    }

    /// Delete rows of the bound table matching the staged filter.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn delete(&mut self) -> Result<u64> {
        let mut clause = self.take_pending();
        let table = self.ref_table()?.name.clone();
        tracing::info!(table = %table, filtered = clause.is_set(ClauseKind::Where), "Deleting rows");

        clause.set(ClauseKind::Delete, ClauseArgs::Delete { table });
        let (sql, vars) = clause.build(&[ClauseKind::Delete, ClauseKind::Where]);
        self.exec(&sql, &vars)
    }

    /// Write every non-key column of `record` to the row with its primary key.
    ///
    /// Fires `BeforeUpdate` and `AfterUpdate` around the statement.
    #[tracing::instrument(level = "debug", skip(self, record))]
    pub fn update_record<M: Model + Hooks>(&mut self, record: &mut M) -> Result<u64> {
        self.reset_pending();
        let target = self.target::<M>()?;
        let pk = target.primary_key()?;

        self.call_method(HookPoint::BeforeUpdate, record)?;

        let mut key = Value::Null;
        let mut assignments = Vec::with_capacity(target.fields.len().saturating_sub(1));
        let values = self.ref_table()?.record_values(record);
        for (idx, (column, value)) in target.fields.iter().zip(values).enumerate() {
            if idx == pk {
                key = value;
            } else {
                assignments.push((column.clone(), value));
            }
        }
        if assignments.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "{} has no columns besides its primary key",
                target.model
            )));
        }

        let (sql, vars) = Clause::new()
            .with(
                ClauseKind::Update,
                ClauseArgs::Update {
                    table: target.table,
                    assignments,
                },
            )
            .with(
                ClauseKind::Where,
                ClauseArgs::filter(format!("{} = ?", target.fields[pk]), [key]),
            )
            .build(&[ClauseKind::Update, ClauseKind::Where]);
        let affected = self.exec(&sql, &vars)?;

        self.call_method(HookPoint::AfterUpdate, record)?;
        Ok(affected)
    }

    /// Delete the row with `record`'s primary key.
    ///
    /// Fires `BeforeDelete` and `AfterDelete` around the statement.
    #[tracing::instrument(level = "debug", skip(self, record))]
    pub fn delete_record<M: Model + Hooks>(&mut self, record: &mut M) -> Result<u64> {
        self.reset_pending();
        let target = self.target::<M>()?;
        let pk = target.primary_key()?;

        self.call_method(HookPoint::BeforeDelete, record)?;

        let key = self.ref_table()?.record_values(record).swap_remove(pk);
        let (sql, vars) = Clause::new()
            .with(
                ClauseKind::Delete,
                ClauseArgs::Delete {
                    table: target.table,
                },
            )
            .with(
                ClauseKind::Where,
                ClauseArgs::filter(format!("{} = ?", target.fields[pk]), [key]),
            )
            .build(&[ClauseKind::Delete, ClauseKind::Where]);
        let affected = self.exec(&sql, &vars)?;

        self.call_method(HookPoint::AfterDelete, record)?;
        Ok(affected)
    }
}

fn flat_pairs(kv: Vec<Value>) -> Result<Vec<(String, Value)>> {
    if kv.len() % 2 != 0 {
        return Err(Error::InvalidArgument(format!(
            "update expects column/value pairs, got {} values",
            kv.len()
        )));
    }

    let mut pairs = Vec::with_capacity(kv.len() / 2);
    let mut iter = kv.into_iter();
    while let (Some(column), Some(value)) = (iter.next(), iter.next()) {
        match column {
            Value::Text(column) => pairs.push((column, value)),
            other => {
                return Err(Error::InvalidArgument(format!(
                    "update column name must be text, found {}",
                    other.type_name()
                )));
            }
        }
    }
    Ok(pairs)
}
