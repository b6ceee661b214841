use jsonschema::JSONSchema;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::json_schema::{generate_request_json_schema, relational_request_json_schema};
use crate::schema::{GenerateRequest, RelationalRequest};

/// Structured validation issue located by JSON pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub code: String,
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(
        code: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Schema violations found in a request document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Returns true when there are no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push_error(&mut self, issue: ValidationIssue) {
        self.errors.push(issue);
    }
}

/// Validate a request JSON document against a JSON Schema.
pub fn validate_request_json(request: &Value, schema: &Value) -> Result<ValidationReport> {
    let compiled = JSONSchema::compile(schema).map_err(|err| Error::Schema(err.to_string()))?;

    let mut report = ValidationReport::default();

    if let Err(errors) = compiled.validate(request) {
        for error in errors {
            let path = normalized_json_pointer(&error.instance_path.to_string());
            report.push_error(ValidationIssue::new(
                "schema_violation",
                path,
                error.to_string(),
            ));
        }
    }

    Ok(report)
}

/// Structurally validate and parse a single-table request document.
pub fn parse_generate_request(request: &Value) -> Result<GenerateRequest> {
    let schema = serde_json::to_value(generate_request_json_schema())?;
    let report = validate_request_json(request, &schema)?;
    if !report.is_ok() {
        return Err(Error::InvalidRequest(report));
    }
    Ok(serde_json::from_value(request.clone())?)
}

/// Structurally validate and parse a relational request document.
///
/// Tables may use the legacy `count` key instead of `rowCount`.
pub fn parse_relational_request(request: &Value) -> Result<RelationalRequest> {
    let request = normalize_relational_request(request);
    let schema = serde_json::to_value(relational_request_json_schema())?;
    let report = validate_request_json(&request, &schema)?;
    if !report.is_ok() {
        return Err(Error::InvalidRequest(report));
    }
    Ok(serde_json::from_value(request)?)
}

fn normalize_relational_request(request: &Value) -> Value {
    let mut request = request.clone();
    let Some(tables) = request.get_mut("tables").and_then(Value::as_array_mut) else {
        return request;
    };
    for table in tables {
        let Some(table) = table.as_object_mut() else {
            continue;
        };
        if !table.contains_key("rowCount")
            && let Some(count) = table.remove("count")
        {
            table.insert("rowCount".to_string(), count);
        }
    }
    request
}

fn normalized_json_pointer(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}
