//! Field descriptors.

use crate::types::SqlType;

/// Compile-time metadata about one mapped field of a model.
///
/// `#[derive(Model)]` emits one of these per mapped field, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    /// Column name (the Rust field name unless renamed with `#[orm(column = "...")]`)
    pub name: &'static str,
    /// Classification of the field's Rust type
    pub sql_type: SqlType,
    /// Raw constraint text spliced after the column type in CREATE TABLE,
    /// e.g. `"PRIMARY KEY"`. Empty when absent.
    pub tag: &'static str,
}

impl FieldInfo {
    /// Create a field descriptor with no constraint tag.
    pub const fn new(name: &'static str, sql_type: SqlType) -> Self {
        Self {
            name,
            sql_type,
            tag: "",
        }
    }

    /// Set the constraint tag.
    pub const fn tag(mut self, tag: &'static str) -> Self {
        self.tag = tag;
        self
    }

    /// Whether the tag declares this field as the primary key.
    pub fn is_primary_key(&self) -> bool {
        self.tag.to_ascii_uppercase().contains("PRIMARY KEY")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_key_detection_is_case_insensitive() {
        let f = FieldInfo::new("id", SqlType::BigInt).tag("primary key autoincrement");
        assert!(f.is_primary_key());
        assert!(!FieldInfo::new("name", SqlType::Text).is_primary_key());
        assert!(!FieldInfo::new("name", SqlType::Text).tag("NOT NULL").is_primary_key());
    }
}
