use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Row count used when a generate request omits `count`.
pub const DEFAULT_COUNT: i64 = 10;

/// Declaration of one output column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldSpec {
    /// Column name; must be non-empty.
    pub name: String,
    /// Value type id (see the type catalog). Resolved by the generator registry.
    #[serde(rename = "type")]
    pub field_type: String,
    /// Generator-specific options.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            options: Map::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }
}

/// One table of a relational request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TableSpec {
    /// Table name, unique among the request's tables.
    pub name: String,
    /// Columns in declaration order. The first one is conventionally the key.
    pub fields: Vec<FieldSpec>,
    /// Number of rows to generate; must be positive.
    #[serde(rename = "rowCount", alias = "count")]
    pub row_count: i64,
}

impl TableSpec {
    pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>, row_count: i64) -> Self {
        Self {
            name: name.into(),
            fields,
            row_count,
        }
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field.name == name)
    }
}

/// Cardinality of a relation between two tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum RelationType {
    OneToOne,
    OneToMany,
    ManyToMany,
}

impl RelationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::OneToOne => "one-to-one",
            RelationType::OneToMany => "one-to-many",
            RelationType::ManyToMany => "many-to-many",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Foreign-key-like link: `targetTable.targetColumn` takes values from
/// `sourceTable.sourceColumn`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelationSpec {
    pub source_table: String,
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,
    pub relation_type: RelationType,
}

impl RelationSpec {
    pub fn new(
        source: (&str, &str),
        target: (&str, &str),
        relation_type: RelationType,
    ) -> Self {
        Self {
            source_table: source.0.to_string(),
            source_column: source.1.to_string(),
            target_table: target.0.to_string(),
            target_column: target.1.to_string(),
            relation_type,
        }
    }
}

/// Single-table generation request: `{fields, count}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GenerateRequest {
    pub fields: Vec<FieldSpec>,
    /// Number of records; defaults to 10.
    #[serde(default = "default_count")]
    pub count: i64,
}

/// Multi-table generation request: `{tables, relations}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RelationalRequest {
    pub tables: Vec<TableSpec>,
    #[serde(default)]
    pub relations: Vec<RelationSpec>,
}

fn default_count() -> i64 {
    DEFAULT_COUNT
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_spec_uses_type_key() {
        let field: FieldSpec =
            serde_json::from_value(json!({"id": 3, "name": "id", "type": "uuid"}))
                .expect("parse field");
        assert_eq!(field, FieldSpec::new("id", "uuid"));
        let value = serde_json::to_value(&field).expect("serialize field");
        assert_eq!(value, json!({"name": "id", "type": "uuid"}));
    }

    #[test]
    fn table_spec_accepts_count_alias() {
        let table: TableSpec = serde_json::from_value(json!({
            "name": "users",
            "count": 3,
            "fields": [{"name": "id", "type": "uuid"}]
        }))
        .expect("parse table");
        assert_eq!(table.row_count, 3);
        assert!(table.has_field("id"));
        assert!(!table.has_field("user_id"));
    }

    #[test]
    fn relation_type_uses_kebab_case() {
        let relation: RelationSpec = serde_json::from_value(json!({
            "sourceTable": "users",
            "sourceColumn": "id",
            "targetTable": "orders",
            "targetColumn": "user_id",
            "relationType": "one-to-many"
        }))
        .expect("parse relation");
        assert_eq!(relation.relation_type, RelationType::OneToMany);
        assert_eq!(RelationType::ManyToMany.to_string(), "many-to-many");
    }

    #[test]
    fn generate_request_defaults_count() {
        let request: GenerateRequest =
            serde_json::from_value(json!({"fields": []})).expect("parse request");
        assert_eq!(request.count, DEFAULT_COUNT);
    }
}
