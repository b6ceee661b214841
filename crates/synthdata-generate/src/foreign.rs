use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use synthdata_core::RelationType;

use crate::dataset::RelationalDataset;
use crate::errors::GenerationError;
use crate::generators::GeneratedValue;
use crate::model::RelationReport;
use crate::planner::ResolvedRelation;

/// Realized values of a source column, in source row order.
#[derive(Debug, Clone, Default)]
pub struct KeyPool {
    values: Vec<GeneratedValue>,
}

impl KeyPool {
    pub fn from_dataset(
        dataset: &RelationalDataset,
        table: &str,
        column: &str,
    ) -> Option<Self> {
        dataset.get(table).map(|table| Self {
            values: table.column_values(column),
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `count` values drawn with replacement.
    pub fn sample(&self, count: usize, rng: &mut dyn RngCore) -> Vec<GeneratedValue> {
        if self.values.is_empty() {
            return Vec::new();
        }
        (0..count)
            .map(|_| self.values[rng.random_range(0..self.values.len())].clone())
            .collect()
    }

    /// `count` values drawn without replacement, or `None` when the pool is
    /// too small.
    pub fn sample_distinct(
        &self,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Option<Vec<GeneratedValue>> {
        if count > self.values.len() {
            return None;
        }
        let mut shuffled = self.values.clone();
        shuffled.shuffle(rng);
        shuffled.truncate(count);
        Some(shuffled)
    }
}

/// Overwrite the target column of a relation with values taken from its
/// source column.
pub fn apply_relation(
    dataset: &mut RelationalDataset,
    relation: &ResolvedRelation<'_>,
    rng: &mut dyn RngCore,
) -> Result<RelationReport, GenerationError> {
    let spec = relation.spec;
    let pool = KeyPool::from_dataset(dataset, &spec.source_table, &spec.source_column)
        .ok_or_else(|| GenerationError::UnresolvedTableReference {
            relation: relation.index,
            table: spec.source_table.clone(),
        })?;

    let target = dataset.get_mut(&spec.target_table).ok_or_else(|| {
        GenerationError::UnresolvedTableReference {
            relation: relation.index,
            table: spec.target_table.clone(),
        }
    })?;
    let rows = target.len();
    if rows > 0 && pool.is_empty() {
        return Err(GenerationError::CardinalityError {
            relation: relation.index,
            message: format!(
                "'{}.{}' has no values to reference",
                spec.source_table, spec.source_column
            ),
        });
    }

    let values = match spec.relation_type {
        RelationType::OneToOne => pool.sample_distinct(rows, rng).ok_or_else(|| {
            GenerationError::CardinalityError {
                relation: relation.index,
                message: format!(
                    "one-to-one needs {rows} distinct values, '{}.{}' has {}",
                    spec.source_table,
                    spec.source_column,
                    pool.len()
                ),
            }
        })?,
        // Many-to-many fills the target like one-to-many; no junction table.
        RelationType::OneToMany | RelationType::ManyToMany => pool.sample(rows, rng),
    };

    let distinct: HashSet<&GeneratedValue> = values.iter().collect();
    let distinct_keys_used = distinct.len() as u64;

    for (row, value) in target.rows_mut().iter_mut().zip(values) {
        row.insert(spec.target_column.clone(), value);
    }

    Ok(RelationReport {
        source_table: spec.source_table.clone(),
        source_column: spec.source_column.clone(),
        target_table: spec.target_table.clone(),
        target_column: spec.target_column.clone(),
        relation_type: spec.relation_type.to_string(),
        rows_updated: rows as u64,
        distinct_keys_used,
    })
}
