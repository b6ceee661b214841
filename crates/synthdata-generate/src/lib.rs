//! Synthetic record generation engine for synthdata.
//!
//! The crate turns field schemas into tables of plausible fake values and
//! assembles multi-table datasets whose foreign-key columns reference values
//! actually generated for their source tables. Generated tables can then be
//! masked column by column and checked against per-column record rules.

pub mod dataset;
pub mod engine;
pub mod errors;
pub mod foreign;
pub mod generators;
pub mod masking;
pub mod model;
pub mod output;
pub mod params;
pub mod planner;
pub mod record_validation;

pub use dataset::{GeneratedRecord, GeneratedTable, RelationalDataset};
pub use engine::{GenerationEngine, GenerationResult};
pub use errors::GenerationError;
pub use generators::{GeneratedValue, Generator, GeneratorRegistry};
pub use masking::{MaskPreset, MaskRule, MaskRules, MaskStrategy, mask_table};
pub use model::{GenerateOptions, GenerationReport, RelationReport, TableReport};
pub use output::ExportFormat;
pub use record_validation::{
    FieldRule, FieldRules, RecordValidation, ValidationSummary, validate_table,
    validation_summary,
};
