use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use synthdata_core::{DEFAULT_TABLE_NAME, FieldSpec, RelationSpec, TableSpec};

use crate::dataset::{GeneratedRecord, GeneratedTable, RelationalDataset};
use crate::errors::GenerationError;
use crate::foreign::apply_relation;
use crate::generators::GeneratorRegistry;
use crate::model::{GenerateOptions, GenerationReport, TableReport};
use crate::planner::{TablePlan, plan_relational, plan_table};

/// Generated data together with the run report.
#[derive(Debug, Clone)]
pub struct GenerationResult<T> {
    pub data: T,
    pub report: GenerationReport,
}

/// Entry point for generating tables and relational datasets.
#[derive(Debug)]
pub struct GenerationEngine {
    options: GenerateOptions,
    registry: GeneratorRegistry,
}

impl Default for GenerationEngine {
    fn default() -> Self {
        Self::new(GenerateOptions::default())
    }
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self::with_registry(options, GeneratorRegistry::new())
    }

    pub fn with_registry(options: GenerateOptions, registry: GeneratorRegistry) -> Self {
        Self { options, registry }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    pub fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }

    /// `count` records, each holding one value per declared field name.
    pub fn generate_table(
        &self,
        fields: &[FieldSpec],
        count: i64,
    ) -> Result<GeneratedTable, GenerationError> {
        self.run_table(fields, count).map(|result| result.data)
    }

    /// Every table of the request with relation columns filled from their
    /// source columns.
    pub fn generate_relational(
        &self,
        tables: &[TableSpec],
        relations: &[RelationSpec],
    ) -> Result<RelationalDataset, GenerationError> {
        self.run_relational(tables, relations)
            .map(|result| result.data)
    }

    pub fn run_table(
        &self,
        fields: &[FieldSpec],
        count: i64,
    ) -> Result<GenerationResult<GeneratedTable>, GenerationError> {
        let start = Instant::now();
        let deadline = self.options.timeout().map(|timeout| start + timeout);
        let seed = self.base_seed();
        let mut report = GenerationReport::new(uuid::Uuid::new_v4().to_string(), seed);

        let plan = plan_table(
            &self.registry,
            DEFAULT_TABLE_NAME,
            fields,
            count,
            self.options.max_rows,
        )
        .inspect_err(|err| warn!(error = %err, kind = err.kind(), "table rejected"))?;

        let workers = self.options.worker_count();
        let table_seed = hash_seed(seed, plan.name);
        let (table, table_report) = generate_planned_table(
            &plan,
            table_seed,
            workers,
            self.options.batch_size,
            deadline,
        )?;

        record_usage(&mut report, &plan);
        report.record_table(table_report);
        report.duration_ms = start.elapsed().as_millis() as u64;
        Ok(GenerationResult {
            data: table,
            report,
        })
    }

    pub fn run_relational(
        &self,
        tables: &[TableSpec],
        relations: &[RelationSpec],
    ) -> Result<GenerationResult<RelationalDataset>, GenerationError> {
        let start = Instant::now();
        let deadline = self.options.timeout().map(|timeout| start + timeout);
        let seed = self.base_seed();
        let run_id = uuid::Uuid::new_v4().to_string();
        let mut report = GenerationReport::new(run_id.clone(), seed);

        let plan = plan_relational(&self.registry, tables, relations, self.options.max_rows)
            .inspect_err(|err| warn!(error = %err, kind = err.kind(), "request rejected"))?;

        info!(
            run_id = %run_id,
            tables = plan.tables.len(),
            relations = plan.relations.len(),
            seed,
            "relational generation started"
        );

        let generated = self.generate_tables(&plan.tables, seed, deadline)?;
        let mut dataset = RelationalDataset::new();
        for (table_plan, (table, table_report)) in plan.tables.iter().zip(generated) {
            record_usage(&mut report, table_plan);
            report.record_table(table_report);
            dataset.insert(table_plan.name, table);
        }

        for relation in &plan.relations {
            let relation_start = Instant::now();
            let mut rng =
                ChaCha8Rng::seed_from_u64(hash_seed(seed, &format!("relation.{}", relation.index)));
            let relation_report = apply_relation(&mut dataset, relation, &mut rng)
                .inspect_err(|err| {
                    warn!(relation = relation.index, error = %err, "relation failed")
                })?;
            info!(
                relation = relation.index,
                source = %format!("{}.{}", relation.spec.source_table, relation.spec.source_column),
                target = %format!("{}.{}", relation.spec.target_table, relation.spec.target_column),
                relation_type = %relation.spec.relation_type,
                rows = relation_report.rows_updated,
                duration_ms = relation_start.elapsed().as_millis() as u64,
                "relation applied"
            );
            report.relations.push(relation_report);
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            run_id = %run_id,
            rows = report.rows_total,
            duration_ms = report.duration_ms,
            "relational generation completed"
        );
        Ok(GenerationResult {
            data: dataset,
            report,
        })
    }

    /// Generate tables concurrently, sharing the worker budget between the
    /// tables in flight. Results come back in plan order.
    fn generate_tables(
        &self,
        plans: &[TablePlan<'_>],
        seed: u64,
        deadline: Option<Instant>,
    ) -> Result<Vec<(GeneratedTable, TableReport)>, GenerationError> {
        if plans.is_empty() {
            return Ok(Vec::new());
        }
        let total_workers = self.options.worker_count();
        let concurrent = total_workers.min(plans.len()).max(1);
        let per_table = (total_workers / concurrent).max(1);
        let batch_size = self.options.batch_size;

        let next = AtomicUsize::new(0);
        let stop = AtomicBool::new(false);
        let slots: Mutex<Vec<Option<(GeneratedTable, TableReport)>>> =
            Mutex::new((0..plans.len()).map(|_| None).collect());

        let outcome: Result<(), GenerationError> = thread::scope(|scope| {
            let handles: Vec<_> = (0..concurrent)
                .map(|_| {
                    scope.spawn(|| -> Result<(), GenerationError> {
                        loop {
                            if stop.load(Ordering::Relaxed) {
                                return Ok(());
                            }
                            let index = next.fetch_add(1, Ordering::Relaxed);
                            let Some(plan) = plans.get(index) else {
                                return Ok(());
                            };
                            let table_seed = hash_seed(seed, plan.name);
                            match generate_planned_table(
                                plan, table_seed, per_table, batch_size, deadline,
                            ) {
                                Ok(result) => {
                                    if let Ok(mut slots) = slots.lock() {
                                        slots[index] = Some(result);
                                    }
                                }
                                Err(err) => {
                                    stop.store(true, Ordering::Relaxed);
                                    return Err(err);
                                }
                            }
                        }
                    })
                })
                .collect();

            let mut first_error = None;
            for handle in handles {
                let result = handle
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload));
                if let Err(err) = result
                    && first_error.is_none()
                {
                    first_error = Some(err);
                }
            }
            first_error.map_or(Ok(()), Err)
        });
        outcome?;

        let slots = slots
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        slots
            .into_iter()
            .zip(plans)
            .map(|(slot, plan)| {
                slot.ok_or_else(|| {
                    GenerationError::InvalidSpec(format!("table '{}' was not generated", plan.name))
                })
            })
            .collect()
    }

    fn base_seed(&self) -> u64 {
        self.options.seed.unwrap_or_else(|| rand::rng().random())
    }
}

/// Rows of one table, generated in batches claimed by `workers` threads.
fn generate_planned_table(
    plan: &TablePlan<'_>,
    table_seed: u64,
    workers: usize,
    batch_size: usize,
    deadline: Option<Instant>,
) -> Result<(GeneratedTable, TableReport), GenerationError> {
    let start = Instant::now();
    let batch_size = batch_size.max(1) as u64;
    let batches = plan.rows.div_ceil(batch_size);
    let workers = workers.clamp(1, batches.max(1) as usize);

    info!(
        table = %plan.name,
        rows = plan.rows,
        workers,
        batches,
        "generating table"
    );

    let next = AtomicU64::new(0);
    let produced = AtomicU64::new(0);
    let stop = AtomicBool::new(false);

    let results: Vec<Result<Vec<(u64, Vec<GeneratedRecord>)>, GenerationError>> =
        thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    scope.spawn(|| -> Result<Vec<(u64, Vec<GeneratedRecord>)>, GenerationError> {
                        let mut chunks = Vec::new();
                        loop {
                            if stop.load(Ordering::Relaxed) {
                                return Ok(chunks);
                            }
                            let batch = next.fetch_add(1, Ordering::Relaxed);
                            if batch >= batches {
                                return Ok(chunks);
                            }
                            if let Some(deadline) = deadline
                                && Instant::now() >= deadline
                            {
                                stop.store(true, Ordering::Relaxed);
                                return Err(GenerationError::DeadlineExceeded {
                                    rows_generated: produced.load(Ordering::Relaxed),
                                });
                            }

                            let first = batch * batch_size;
                            let last = (first + batch_size).min(plan.rows);
                            let mut rows = Vec::with_capacity((last - first) as usize);
                            for row_index in first..last {
                                match build_row(plan, table_seed, row_index) {
                                    Ok(row) => rows.push(row),
                                    Err(err) => {
                                        stop.store(true, Ordering::Relaxed);
                                        return Err(err);
                                    }
                                }
                            }
                            produced.fetch_add(last - first, Ordering::Relaxed);
                            chunks.push((batch, rows));
                        }
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                })
                .collect()
        });

    let mut chunks = Vec::with_capacity(batches as usize);
    for result in results {
        match result {
            Ok(worker_chunks) => chunks.extend(worker_chunks),
            Err(err) => {
                warn!(table = %plan.name, error = %err, kind = err.kind(), "table generation failed");
                return Err(err);
            }
        }
    }
    chunks.sort_by_key(|(batch, _)| *batch);
    let rows: Vec<GeneratedRecord> = chunks.into_iter().flat_map(|(_, rows)| rows).collect();

    let duration_ms = start.elapsed().as_millis() as u64;
    info!(
        table = %plan.name,
        rows_generated = rows.len(),
        duration_ms,
        "table generated"
    );

    let report = TableReport {
        table: plan.name.to_string(),
        rows_requested: plan.rows,
        rows_generated: rows.len() as u64,
        batches,
        workers,
        duration_ms,
    };
    Ok((GeneratedTable::new(plan.columns(), rows), report))
}

/// One record; later fields overwrite earlier ones with the same name.
fn build_row(
    plan: &TablePlan<'_>,
    table_seed: u64,
    row_index: u64,
) -> Result<GeneratedRecord, GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(hash_row_seed(table_seed, row_index));
    let mut row = GeneratedRecord::with_capacity(plan.fields.len());
    for field in &plan.fields {
        let value = field.generator.generate(&field.params, &mut rng)?;
        row.insert(field.name.to_string(), value);
    }
    Ok(row)
}

fn record_usage(report: &mut GenerationReport, plan: &TablePlan<'_>) {
    for field in &plan.fields {
        report.record_generator_usage(field.type_id.as_str(), plan.rows);
    }
}

fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

fn hash_row_seed(table_seed: u64, row_index: u64) -> u64 {
    let hash = table_seed ^ row_index.wrapping_mul(0x9e3779b97f4a7c15);
    hash.wrapping_mul(0x100000001b3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_seeds_differ_per_row() {
        let table_seed = hash_seed(42, "users");
        assert_ne!(hash_row_seed(table_seed, 0), hash_row_seed(table_seed, 1));
        assert_ne!(hash_seed(42, "users"), hash_seed(42, "orders"));
    }

    #[test]
    fn zero_rows_spawn_no_batches() {
        let engine = GenerationEngine::new(GenerateOptions {
            seed: Some(1),
            ..GenerateOptions::default()
        });
        let result = engine
            .run_table(&[FieldSpec::new("id", "uuid")], 0)
            .expect("empty table");
        assert!(result.data.is_empty());
        assert_eq!(result.report.tables[0].batches, 0);
        assert_eq!(result.data.columns(), ["id".to_string()]);
    }
}
