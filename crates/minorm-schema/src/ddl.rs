//! DDL text generation.
//!
//! The rebuild strategy for dropped columns targets SQLite, which has no
//! `DROP COLUMN` before 3.35: the old table is renamed aside, recreated from
//! the full column definitions, refilled from the renamed copy and dropped.

use crate::diff::SchemaOperation;
use crate::schema::{Field, Schema};

fn column_def(field: &Field) -> String {
    if field.tag.is_empty() {
        format!("{} {}", field.name, field.sql_type)
    } else {
        format!("{} {} {}", field.name, field.sql_type, field.tag)
    }
}

/// `CREATE TABLE t (c1 type tag, c2 type);`
pub fn generate_create_table(table: &str, fields: &[Field]) -> String {
    let columns: Vec<String> = fields.iter().map(column_def).collect();
    format!("CREATE TABLE {} ({});", table, columns.join(", "))
}

/// `CREATE TABLE` for a parsed schema.
pub fn create_table_sql(schema: &Schema) -> String {
    generate_create_table(&schema.name, schema.fields())
}

/// `DROP TABLE IF EXISTS t;`
pub fn drop_table_sql(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {};", table)
}

/// `ALTER TABLE t ADD COLUMN c type;`
pub fn generate_add_column(table: &str, field: &Field) -> String {
    format!(
        "ALTER TABLE {} ADD COLUMN {} {};",
        table, field.name, field.sql_type
    )
}

/// Name of the temporary table used while rebuilding `table`.
pub fn temp_table_name(table: &str) -> String {
    format!("tmp_{}", table)
}

fn generate_rebuild_table(table: &str, fields: &[Field]) -> Vec<String> {
    let tmp = temp_table_name(table);
    let columns = fields
        .iter()
        .map(|f| f.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    vec![
        format!("ALTER TABLE {} RENAME TO {};", table, tmp),
        generate_create_table(table, fields),
        format!(
            "INSERT INTO {} ({}) SELECT {} FROM {};",
            table, columns, columns, tmp
        ),
        format!("DROP TABLE {};", tmp),
    ]
}

/// Render one schema operation as the statements that perform it, in order.
pub fn generate(op: &SchemaOperation) -> Vec<String> {
    tracing::debug!(op = ?op, "Generating DDL");

    let statements = match op {
        SchemaOperation::CreateTable { table, fields } => {
            vec![generate_create_table(table, fields)]
        }
        SchemaOperation::AddColumn { table, field } => vec![generate_add_column(table, field)],
        SchemaOperation::RebuildTable { table, fields } => generate_rebuild_table(table, fields),
    };

    for stmt in &statements {
        tracing::trace!(sql = %stmt, "Generated DDL statement");
    }

    statements
}
