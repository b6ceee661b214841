use thiserror::Error;

use crate::validation::ValidationReport;

/// Core error type shared across synthdata crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The request document does not match its JSON Schema.
    #[error("invalid request: {} issue(s), first: {}", .0.errors.len(), first_issue(.0))]
    InvalidRequest(ValidationReport),
    /// The JSON Schema used for validation failed to compile.
    #[error("schema error: {0}")]
    Schema(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results returned by synthdata crates.
pub type Result<T> = std::result::Result<T, Error>;

fn first_issue(report: &ValidationReport) -> String {
    report
        .errors
        .first()
        .map(|issue| format!("{} ({})", issue.message, issue.path))
        .unwrap_or_else(|| "none".to_string())
}
