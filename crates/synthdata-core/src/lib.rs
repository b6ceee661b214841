//! Core contracts for synthdata.
//!
//! This crate defines the request documents (field, table and relation
//! specs), the closed catalog of semantic value types, and structural
//! validation of request JSON shared by the engine and the CLI.

pub mod error;
pub mod json_schema;
pub mod schema;
pub mod types;
pub mod validation;

pub use error::{Error, Result};
pub use json_schema::{generate_request_json_schema, relational_request_json_schema};
pub use schema::{
    DEFAULT_COUNT, FieldSpec, GenerateRequest, RelationSpec, RelationType, RelationalRequest,
    TableSpec,
};
pub use types::{Category, ParseTypeIdError, TypeId, TypeInfo, catalog, categories};
pub use validation::{
    ValidationIssue, ValidationReport, parse_generate_request,
    parse_relational_request, validate_request_json,
};

/// Default table name used by single-table SQL exports.
pub const DEFAULT_TABLE_NAME: &str = "test_data";
