use std::io::Write;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::dataset::GeneratedTable;
use crate::errors::GenerationError;

/// Header row as-is, then one row per record with every cell quoted.
/// Records are separated by `\n`; a table without rows or columns is empty.
pub fn table_to_csv(table: &GeneratedTable) -> Result<String, GenerationError> {
    if table.is_empty() || table.columns().is_empty() {
        return Ok(String::new());
    }

    let mut buffer = Vec::new();
    write_header(&mut buffer, table.columns())?;
    write_rows(&mut buffer, table)?;
    if buffer.last() == Some(&b'\n') {
        buffer.pop();
    }
    String::from_utf8(buffer)
        .map_err(|err| GenerationError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err)))
}

fn write_header<W: Write>(out: W, columns: &[String]) -> Result<(), csv::Error> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);
    writer.write_record(columns)?;
    writer.flush()?;
    Ok(())
}

fn write_rows<W: Write>(out: W, table: &GeneratedTable) -> Result<(), csv::Error> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);
    for row in table.rows() {
        let record: Vec<String> = table
            .columns()
            .iter()
            .map(|column| row.get(column).map(ToString::to_string).unwrap_or_default())
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
