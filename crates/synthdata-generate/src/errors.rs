use thiserror::Error;

/// Errors emitted by the generation engine.
///
/// All variants are request-scoped: the engine never retries and never
/// returns partial results.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("unknown type '{0}'")]
    UnknownType(String),
    #[error("relation {relation}: table '{table}' is not declared")]
    UnresolvedTableReference { relation: usize, table: String },
    #[error("relation {relation}: column '{table}.{column}' is not declared")]
    UnresolvedColumnReference {
        relation: usize,
        table: String,
        column: String,
    },
    #[error("relation {relation}: {message}")]
    CardinalityError { relation: usize, message: String },
    #[error("invalid count: {0}")]
    InvalidCount(String),
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("invalid spec: {0}")]
    InvalidSpec(String),
    #[error("deadline exceeded after {rows_generated} rows")]
    DeadlineExceeded { rows_generated: u64 },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl GenerationError {
    /// Stable, machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::UnknownType(_) => "unknown_type",
            GenerationError::UnresolvedTableReference { .. } => "unresolved_table_reference",
            GenerationError::UnresolvedColumnReference { .. } => "unresolved_column_reference",
            GenerationError::CardinalityError { .. } => "cardinality_error",
            GenerationError::InvalidCount(_) => "invalid_count",
            GenerationError::InvalidOptions(_) => "invalid_options",
            GenerationError::InvalidSpec(_) => "invalid_spec",
            GenerationError::DeadlineExceeded { .. } => "deadline_exceeded",
            GenerationError::Io(_) => "io",
            GenerationError::Json(_) => "json",
            GenerationError::Csv(_) => "csv",
        }
    }
}
