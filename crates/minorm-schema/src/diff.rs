//! Schema diffing for migrations.

use std::collections::HashSet;

use crate::schema::{Field, Schema};

/// A change to apply to the database schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaOperation {
    CreateTable { table: String, fields: Vec<Field> },
    AddColumn { table: String, field: Field },
    /// Recreate `table` with exactly `fields`, copying their data over.
    RebuildTable { table: String, fields: Vec<Field> },
}

/// Differences between a schema and the columns of its live table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationPlan {
    /// Fields present only in the schema, in schema order
    pub added: Vec<Field>,
    /// Columns present only in the live table, in table order
    pub dropped: Vec<String>,
}

impl MigrationPlan {
    /// True when the table already matches the schema.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.dropped.is_empty()
    }

    /// The operations that apply this plan to `schema`'s table.
    ///
    /// One `AddColumn` per added field, then a single `RebuildTable` if any
    /// column has to go.
    pub fn operations(&self, schema: &Schema) -> Vec<SchemaOperation> {
        let mut ops: Vec<SchemaOperation> = self
            .added
            .iter()
            .map(|field| SchemaOperation::AddColumn {
                table: schema.name.clone(),
                field: field.clone(),
            })
            .collect();

        if !self.dropped.is_empty() {
            ops.push(SchemaOperation::RebuildTable {
                table: schema.name.clone(),
                fields: schema.fields().to_vec(),
            });
        }
        ops
    }
}

/// The operation creating `schema`'s table from scratch.
pub fn create(schema: &Schema) -> SchemaOperation {
    SchemaOperation::CreateTable {
        table: schema.name.clone(),
        fields: schema.fields().to_vec(),
    }
}

/// Compare `schema` with the column names of the live table.
pub fn plan(schema: &Schema, live_columns: &[String]) -> MigrationPlan {
    let live: HashSet<&str> = live_columns.iter().map(String::as_str).collect();
    let wanted: HashSet<&str> = schema.field_names().iter().map(String::as_str).collect();

    let added = schema
        .fields()
        .iter()
        .filter(|f| !live.contains(f.name.as_str()))
        .cloned()
        .collect();
    let dropped = live_columns
        .iter()
        .filter(|c| !wanted.contains(c.as_str()))
        .cloned()
        .collect();

    MigrationPlan { added, dropped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Sqlite3Dialect;
    use minorm_core::{FieldInfo, Model, Result, Row, SqlType, Value};

    struct User;

    impl Model for User {
        const TYPE_NAME: &'static str = "User";
        const TABLE_NAME: &'static str = "User";

        fn fields() -> &'static [FieldInfo] {
            static FIELDS: [FieldInfo; 3] = [
                FieldInfo::new("Name", SqlType::Text).tag("PRIMARY KEY"),
                FieldInfo::new("Age", SqlType::Integer),
                FieldInfo::new("Email", SqlType::Text),
            ];
            &FIELDS
        }

        fn to_values(&self) -> Vec<Value> {
            Vec::new()
        }

        fn from_row(_row: &Row) -> Result<Self> {
            Ok(User)
        }
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unchanged_table_plans_nothing() {
        let schema = Schema::parse::<User>(&Sqlite3Dialect);
        let plan = plan(&schema, &cols(&["Name", "Age", "Email"]));
        assert!(plan.is_empty());
        assert!(plan.operations(&schema).is_empty());
    }

    #[test]
    fn test_added_and_dropped_columns() {
        let schema = Schema::parse::<User>(&Sqlite3Dialect);
        let plan = plan(&schema, &cols(&["Name", "XXX", "Age"]));
        assert_eq!(
            plan.added.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
            vec!["Email"]
        );
        assert_eq!(plan.dropped, vec!["XXX".to_string()]);

        let ops = plan.operations(&schema);
        assert_eq!(ops.len(), 2);
        assert!(matches!(&ops[0], SchemaOperation::AddColumn { field, .. } if field.name == "Email"));
        assert_eq!(
            ops[1],
            SchemaOperation::RebuildTable {
                table: "User".into(),
                fields: schema.fields().to_vec(),
            }
        );
    }

    #[test]
    fn test_only_additions_need_no_rebuild() {
        let schema = Schema::parse::<User>(&Sqlite3Dialect);
        let ops = plan(&schema, &cols(&["Name"])).operations(&schema);
        assert_eq!(ops.len(), 2);
        assert!(
            ops.iter()
                .all(|op| matches!(op, SchemaOperation::AddColumn { .. }))
        );
    }

    #[test]
    fn test_create_carries_every_field() {
        let schema = Schema::parse::<User>(&Sqlite3Dialect);
        match create(&schema) {
            SchemaOperation::CreateTable { table, fields } => {
                assert_eq!(table, "User");
                assert_eq!(fields, schema.fields());
            }
            other => panic!("unexpected operation {other:?}"),
        }
    }
}
