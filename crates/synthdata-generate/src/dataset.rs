use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::generators::GeneratedValue;

/// One generated row keyed by column name.
pub type GeneratedRecord = HashMap<String, GeneratedValue>;

/// Rows of one table plus the column order they were declared in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedTable {
    columns: Vec<String>,
    rows: Vec<GeneratedRecord>,
}

impl GeneratedTable {
    /// Build a table; repeated column names keep their first position.
    pub fn new(columns: Vec<String>, rows: Vec<GeneratedRecord>) -> Self {
        let mut ordered: Vec<String> = Vec::with_capacity(columns.len());
        for column in columns {
            if !ordered.contains(&column) {
                ordered.push(column);
            }
        }
        Self {
            columns: ordered,
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[GeneratedRecord] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [GeneratedRecord] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }

    /// Values of `name` in row order, skipping rows that lack the column.
    pub fn column_values(&self, name: &str) -> Vec<GeneratedValue> {
        self.rows
            .iter()
            .filter_map(|row| row.get(name).cloned())
            .collect()
    }
}

struct OrderedRecord<'a> {
    columns: &'a [String],
    record: &'a GeneratedRecord,
}

impl Serialize for OrderedRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for column in self.columns {
            if let Some(value) = self.record.get(column) {
                map.serialize_entry(column, value)?;
            }
        }
        map.end()
    }
}

impl Serialize for GeneratedTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for record in &self.rows {
            seq.serialize_element(&OrderedRecord {
                columns: &self.columns,
                record,
            })?;
        }
        seq.end()
    }
}

/// Tables of a relational run, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationalDataset {
    tables: Vec<(String, GeneratedTable)>,
}

impl RelationalDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a table, replacing an existing one with the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, table: GeneratedTable) {
        let name = name.into();
        match self.tables.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = table,
            None => self.tables.push((name, table)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&GeneratedTable> {
        self.tables
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, table)| table)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut GeneratedTable> {
        self.tables
            .iter_mut()
            .find(|(existing, _)| existing == name)
            .map(|(_, table)| table)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GeneratedTable)> {
        self.tables
            .iter()
            .map(|(name, table)| (name.as_str(), table))
    }

    pub fn names(&self) -> Vec<&str> {
        self.tables.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl Serialize for RelationalDataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tables.len()))?;
        for (name, table) in &self.tables {
            map.serialize_entry(name, table)?;
        }
        map.end()
    }
}
