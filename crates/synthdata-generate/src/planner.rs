use std::collections::HashSet;

use synthdata_core::{FieldSpec, RelationSpec, RelationType, TableSpec, TypeId};

use crate::errors::GenerationError;
use crate::generators::{Generator, GeneratorRegistry};
use crate::params::{ParamMap, validate_params};

/// Field bound to its generator with validated options.
pub struct FieldPlan<'a> {
    pub name: &'a str,
    pub type_id: TypeId,
    pub generator: &'a dyn Generator,
    pub params: ParamMap<'a>,
}

/// Table ready for row generation.
pub struct TablePlan<'a> {
    pub name: &'a str,
    pub fields: Vec<FieldPlan<'a>>,
    pub rows: u64,
}

impl TablePlan<'_> {
    pub fn columns(&self) -> Vec<String> {
        self.fields.iter().map(|field| field.name.to_string()).collect()
    }
}

/// Relation whose endpoints were found among the planned tables.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedRelation<'a> {
    pub index: usize,
    pub spec: &'a RelationSpec,
    pub source: usize,
    pub target: usize,
}

pub struct RelationalPlan<'a> {
    pub tables: Vec<TablePlan<'a>>,
    pub relations: Vec<ResolvedRelation<'a>>,
}

/// Resolve every field of a single table. Nothing is generated here, so an
/// unknown type or bad option fails the table before any row exists.
pub fn plan_table<'a>(
    registry: &'a GeneratorRegistry,
    name: &'a str,
    fields: &'a [FieldSpec],
    count: i64,
    max_rows: Option<u64>,
) -> Result<TablePlan<'a>, GenerationError> {
    if count < 0 {
        return Err(GenerationError::InvalidCount(format!(
            "table '{name}': count must be >= 0, got {count}"
        )));
    }
    let rows = count as u64;
    if let Some(max_rows) = max_rows
        && rows > max_rows
    {
        return Err(GenerationError::InvalidCount(format!(
            "table '{name}': count {rows} exceeds the limit of {max_rows}"
        )));
    }

    let fields = fields
        .iter()
        .map(|field| plan_field(registry, name, field))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TablePlan { name, fields, rows })
}

fn plan_field<'a>(
    registry: &'a GeneratorRegistry,
    table: &str,
    field: &'a FieldSpec,
) -> Result<FieldPlan<'a>, GenerationError> {
    if field.name.trim().is_empty() {
        return Err(GenerationError::InvalidSpec(format!(
            "table '{table}': field names must not be empty"
        )));
    }
    let generator = registry.resolve(&field.field_type)?;
    let ctx = format!("{table}.{}", field.name);
    let params = validate_params(&field.options, generator.params(), &ctx)?;
    generator.check(&params)?;
    Ok(FieldPlan {
        name: &field.name,
        type_id: generator.id(),
        generator,
        params,
    })
}

/// Validate a relational request and resolve its relations to table indices.
///
/// Every table, reference and cardinality is checked before the caller
/// generates anything.
pub fn plan_relational<'a>(
    registry: &'a GeneratorRegistry,
    tables: &'a [TableSpec],
    relations: &'a [RelationSpec],
    max_rows: Option<u64>,
) -> Result<RelationalPlan<'a>, GenerationError> {
    let mut seen = HashSet::new();
    let mut planned = Vec::with_capacity(tables.len());
    for table in tables {
        if table.name.trim().is_empty() {
            return Err(GenerationError::InvalidSpec(
                "table names must not be empty".to_string(),
            ));
        }
        if !is_plain_name(&table.name) {
            return Err(GenerationError::InvalidSpec(format!(
                "table name '{}' must not contain path separators",
                table.name
            )));
        }
        if !seen.insert(table.name.as_str()) {
            return Err(GenerationError::InvalidSpec(format!(
                "duplicate table name '{}'",
                table.name
            )));
        }
        if table.fields.is_empty() {
            return Err(GenerationError::InvalidSpec(format!(
                "table '{}' declares no fields",
                table.name
            )));
        }
        if table.row_count <= 0 {
            return Err(GenerationError::InvalidCount(format!(
                "table '{}': rowCount must be > 0, got {}",
                table.name, table.row_count
            )));
        }
        planned.push(plan_table(
            registry,
            &table.name,
            &table.fields,
            table.row_count,
            max_rows,
        )?);
    }

    let relations = relations
        .iter()
        .enumerate()
        .map(|(index, spec)| resolve_relation(tables, index, spec))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RelationalPlan {
        tables: planned,
        relations,
    })
}

/// Table names double as export file stems.
fn is_plain_name(name: &str) -> bool {
    name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}

fn resolve_relation<'a>(
    tables: &[TableSpec],
    index: usize,
    spec: &'a RelationSpec,
) -> Result<ResolvedRelation<'a>, GenerationError> {
    let source = find_column(tables, index, &spec.source_table, &spec.source_column)?;
    let target = find_column(tables, index, &spec.target_table, &spec.target_column)?;

    if spec.relation_type == RelationType::OneToOne {
        let source_rows = tables[source].row_count;
        let target_rows = tables[target].row_count;
        if target_rows > source_rows {
            return Err(GenerationError::CardinalityError {
                relation: index,
                message: format!(
                    "one-to-one needs at least {target_rows} rows in '{}', found {source_rows}",
                    spec.source_table
                ),
            });
        }
    }

    Ok(ResolvedRelation {
        index,
        spec,
        source,
        target,
    })
}

fn find_column(
    tables: &[TableSpec],
    relation: usize,
    table: &str,
    column: &str,
) -> Result<usize, GenerationError> {
    let position = tables
        .iter()
        .position(|spec| spec.name == table)
        .ok_or_else(|| GenerationError::UnresolvedTableReference {
            relation,
            table: table.to_string(),
        })?;
    if !tables[position].has_field(column) {
        return Err(GenerationError::UnresolvedColumnReference {
            relation,
            table: table.to_string(),
            column: column.to_string(),
        });
    }
    Ok(position)
}
