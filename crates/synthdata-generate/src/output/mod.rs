//! Text exports of generated tables and datasets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dataset::{GeneratedTable, RelationalDataset};
use crate::errors::GenerationError;

pub mod csv;
pub mod json;
pub mod sql;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    Sql,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Sql => "sql",
        }
    }

    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "sql" => Ok(ExportFormat::Sql),
            other => Err(format!("unsupported format '{other}'")),
        }
    }
}

/// Render one table; `table_name` is only used by SQL.
pub fn export_table(
    table: &GeneratedTable,
    format: ExportFormat,
    table_name: &str,
) -> Result<String, GenerationError> {
    match format {
        ExportFormat::Json => json::table_to_json(table),
        ExportFormat::Csv => csv::table_to_csv(table),
        ExportFormat::Sql => Ok(sql::table_to_sql(table, table_name)),
    }
}

/// Render a whole dataset as a single document.
///
/// CSV has no multi-table form, so it yields one document per table.
pub fn export_dataset(
    dataset: &RelationalDataset,
    format: ExportFormat,
) -> Result<Vec<(String, String)>, GenerationError> {
    match format {
        ExportFormat::Json => Ok(vec![(
            "dataset".to_string(),
            json::dataset_to_json(dataset)?,
        )]),
        ExportFormat::Sql => Ok(vec![("dataset".to_string(), sql::dataset_to_sql(dataset))]),
        ExportFormat::Csv => dataset
            .iter()
            .map(|(name, table)| Ok((name.to_string(), csv::table_to_csv(table)?)))
            .collect(),
    }
}
