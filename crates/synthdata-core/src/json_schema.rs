use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::schema::{GenerateRequest, RelationalRequest};

/// Emit the JSON Schema for single-table request documents.
pub fn generate_request_json_schema() -> RootSchema {
    schema_for!(GenerateRequest)
}

/// Emit the JSON Schema for relational request documents.
pub fn relational_request_json_schema() -> RootSchema {
    schema_for!(RelationalRequest)
}
