use crate::dataset::{GeneratedTable, RelationalDataset};
use crate::errors::GenerationError;

/// Pretty-printed array of records, keys in declared column order.
pub fn table_to_json(table: &GeneratedTable) -> Result<String, GenerationError> {
    Ok(serde_json::to_string_pretty(table)?)
}

/// Pretty-printed object mapping table names to their records.
pub fn dataset_to_json(dataset: &RelationalDataset) -> Result<String, GenerationError> {
    Ok(serde_json::to_string_pretty(dataset)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::GeneratedRecord;
    use crate::generators::GeneratedValue;

    #[test]
    fn table_json_is_pretty_and_ordered() {
        let mut row = GeneratedRecord::new();
        row.insert("b".into(), GeneratedValue::Bool(false));
        row.insert("a".into(), GeneratedValue::Text("中文".into()));
        let table = GeneratedTable::new(vec!["b".into(), "a".into()], vec![row]);
        let json = table_to_json(&table).expect("json");
        assert_eq!(json, "[\n  {\n    \"b\": false,\n    \"a\": \"中文\"\n  }\n]");
    }
}
