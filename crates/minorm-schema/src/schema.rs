//! Table descriptions derived from `Model` types.

use std::any::TypeId;
use std::collections::HashMap;

use minorm_core::{Model, Value};

use crate::dialect::Dialect;

/// One mapped column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// Dialect column type, e.g. `"text"`
    pub sql_type: String,
    /// Raw constraint text, e.g. `"PRIMARY KEY"`; empty when absent
    pub tag: String,
}

impl Field {
    /// Whether the tag declares a primary key.
    pub fn is_primary_key(&self) -> bool {
        self.tag.to_ascii_uppercase().contains("PRIMARY KEY")
    }
}

/// The table description of one record type under one dialect.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Table name
    pub name: String,
    model: TypeId,
    model_name: &'static str,
    fields: Vec<Field>,
    field_names: Vec<String>,
    field_index: HashMap<String, usize>,
}

impl Schema {
    /// Derive the schema of `M`.
    ///
    /// Fields keep declaration order, so the same type and dialect always yield
    /// the same schema.
    pub fn parse<M: Model>(dialect: &dyn Dialect) -> Self {
        let fields: Vec<Field> = M::fields()
            .iter()
            .map(|info| Field {
                name: info.name.to_string(),
                sql_type: dialect.data_type_of(info.sql_type).to_string(),
                tag: info.tag.to_string(),
            })
            .collect();
        let field_names: Vec<String> = fields.iter().map(|f| f.name.clone()).collect();
        let field_index = field_names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();

        tracing::debug!(
            model = M::TYPE_NAME,
            table = M::TABLE_NAME,
            dialect = dialect.name(),
            fields = fields.len(),
            "Parsed schema"
        );

        Self {
            name: M::TABLE_NAME.to_string(),
            model: TypeId::of::<M>(),
            model_name: M::TYPE_NAME,
            fields,
            field_names,
            field_index,
        }
    }

    /// Whether this schema was derived from `M`.
    pub fn is_for<M: Model>(&self) -> bool {
        self.model == TypeId::of::<M>()
    }

    /// Rust type name of the model.
    pub fn model_name(&self) -> &'static str {
        self.model_name
    }

    /// Fields in column order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Field names in column order.
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.field_index.get(name).map(|&idx| &self.fields[idx])
    }

    /// The first field tagged as primary key.
    pub fn primary_key(&self) -> Option<&Field> {
        self.fields.iter().find(|f| f.is_primary_key())
    }

    /// Position of a field in column order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.field_index.get(name).copied()
    }

    /// A record's values in column order.
    pub fn record_values<M: Model>(&self, record: &M) -> Vec<Value> {
        debug_assert!(self.is_for::<M>());
        record.to_values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Sqlite3Dialect;
    use minorm_core::{FieldInfo, Result, Row, SqlField, SqlType};

    struct User {
        name: String,
        age: i32,
    }

    impl Model for User {
        const TYPE_NAME: &'static str = "User";
        const TABLE_NAME: &'static str = "users";

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

    struct Other;

    impl Model for Other {
        const TYPE_NAME: &'static str = "Other";
        const TABLE_NAME: &'static str = "Other";

        fn fields() -> &'static [FieldInfo] {
            &[]
        }

        fn to_values(&self) -> Vec<Value> {
            Vec::new()
        }

        fn from_row(_row: &Row) -> Result<Self> {
            Ok(Other)
        }
    }

    #[test]
    fn test_parse_users_example() {
        let schema = Schema::parse::<User>(&Sqlite3Dialect);
        assert_eq!(schema.name, "users");
        assert_eq!(schema.model_name(), "User");
        assert_eq!(
            schema.fields(),
            &[
                Field {
                    name: "Name".into(),
                    sql_type: "text".into(),
                    tag: "PRIMARY KEY".into()
                },
                Field {
                    name: "Age".into(),
                    sql_type: "integer".into(),
                    tag: String::new()
                },
            ]
        );
        assert_eq!(schema.field("Name").map(|f| f.tag.as_str()), Some("PRIMARY KEY"));
        assert_eq!(schema.primary_key().map(|f| f.name.as_str()), Some("Name"));
        assert_eq!(schema.position("Age"), Some(1));
        assert!(schema.field("Missing").is_none());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let a = Schema::parse::<User>(&Sqlite3Dialect);
        let b = Schema::parse::<User>(&Sqlite3Dialect);
        assert_eq!(a.fields(), b.fields());
        assert_eq!(a.field_names(), b.field_names());
    }

    #[test]
    fn test_schema_identity() {
        let schema = Schema::parse::<User>(&Sqlite3Dialect);
        assert!(schema.is_for::<User>());
        assert!(!schema.is_for::<Other>());
        assert!(Schema::parse::<Other>(&Sqlite3Dialect).primary_key().is_none());
    }

    #[test]
    fn test_record_values_follow_field_order() {
        let schema = Schema::parse::<User>(&Sqlite3Dialect);
        let user = User {
            name: "Tom".into(),
            age: 18,
        };
        assert_eq!(
            schema.record_values(&user),
            vec![Value::from("Tom"), Value::Int(18)]
        );
    }
}
