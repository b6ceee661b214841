use crate::dataset::{GeneratedTable, RelationalDataset};
use crate::generators::GeneratedValue;

/// Single-quote a value, doubling embedded quotes.
pub fn quote_sql(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// One multi-row `INSERT` statement; empty for a table without rows or columns.
/// Masked-out values render as a bare `NULL`.
pub fn table_to_sql(table: &GeneratedTable, table_name: &str) -> String {
    if table.is_empty() || table.columns().is_empty() {
        return String::new();
    }

    let columns = table.columns().join(", ");
    let values: Vec<String> = table
        .rows()
        .iter()
        .map(|row| {
            let cells: Vec<String> = table
                .columns()
                .iter()
                .map(|column| match row.get(column) {
                    Some(GeneratedValue::Null) => "NULL".to_string(),
                    Some(value) => quote_sql(&value.to_string()),
                    None => quote_sql(""),
                })
                .collect();
            format!("({})", cells.join(", "))
        })
        .collect();

    format!(
        "INSERT INTO {table_name} ({columns}) VALUES\n{};",
        values.join(",\n")
    )
}

/// One statement per non-empty table, in dataset order, separated by a blank line.
pub fn dataset_to_sql(dataset: &RelationalDataset) -> String {
    dataset
        .iter()
        .map(|(name, table)| table_to_sql(table, name))
        .filter(|statement| !statement.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::GeneratedRecord;

    #[test]
    fn quotes_are_doubled() {
        assert_eq!(quote_sql("O'Brien"), "'O''Brien'");
    }

    #[test]
    fn statement_lists_every_row() {
        let rows = (1..=2)
            .map(|id| {
                let mut row = GeneratedRecord::new();
                row.insert("id".into(), GeneratedValue::Int(id));
                row.insert("ok".into(), GeneratedValue::Bool(id == 1));
                row
            })
            .collect();
        let table = GeneratedTable::new(vec!["id".into(), "ok".into()], rows);
        assert_eq!(
            table_to_sql(&table, "test_data"),
            "INSERT INTO test_data (id, ok) VALUES\n('1', 'true'),\n('2', 'false');"
        );
    }

    #[test]
    fn null_cells_are_not_quoted() {
        let mut row = GeneratedRecord::new();
        row.insert("id".into(), GeneratedValue::Int(1));
        row.insert("email".into(), GeneratedValue::Null);
        let table = GeneratedTable::new(vec!["id".into(), "email".into()], vec![row]);
        assert_eq!(
            table_to_sql(&table, "users"),
            "INSERT INTO users (id, email) VALUES\n('1', NULL);"
        );
    }
}
