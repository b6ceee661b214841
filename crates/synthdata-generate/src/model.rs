use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Options for the generation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Base seed. Seeded runs produce identical data for any worker count.
    pub seed: Option<u64>,
    /// Worker threads; defaults to the available parallelism.
    pub workers: Option<usize>,
    /// Rows a worker claims at a time; the deadline is checked per batch.
    pub batch_size: usize,
    /// Largest row count accepted for a single table.
    pub max_rows: Option<u64>,
    /// Wall-clock budget for the whole run.
    pub timeout_ms: Option<u64>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            seed: None,
            workers: None,
            batch_size: 1000,
            max_rows: None,
            timeout_ms: None,
        }
    }
}

impl GenerateOptions {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn worker_count(&self) -> usize {
        self.workers
            .filter(|workers| *workers > 0)
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
    }
}

/// Summary of a generated table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    pub table: String,
    pub rows_requested: u64,
    pub rows_generated: u64,
    pub batches: u64,
    pub workers: usize,
    pub duration_ms: u64,
}

/// Summary of one applied relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationReport {
    pub source_table: String,
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,
    pub relation_type: String,
    pub rows_updated: u64,
    pub distinct_keys_used: u64,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub seed: u64,
    pub tables: Vec<TableReport>,
    pub relations: Vec<RelationReport>,
    pub generator_usage: BTreeMap<String, u64>,
    pub rows_total: u64,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String, seed: u64) -> Self {
        Self {
            run_id,
            seed,
            tables: Vec::new(),
            relations: Vec::new(),
            generator_usage: BTreeMap::new(),
            rows_total: 0,
            duration_ms: 0,
        }
    }

    pub fn record_generator_usage(&mut self, id: &str, values: u64) {
        *self.generator_usage.entry(id.to_string()).or_insert(0) += values;
    }

    pub fn record_table(&mut self, table: TableReport) {
        self.rows_total += table.rows_generated;
        self.tables.push(table);
    }
}
