//! CSV ingest and export
//!
//! The ingestion contract: UTF-8 text, the first record is a header of
//! column names, fields are comma-separated with surrounding whitespace
//! trimmed. Column types are inferred per column (Int unless any cell fails
//! the all-digits test, in which case Varchar); the literal `null` denotes a
//! null cell. Empty files, ragged rows and unreadable files are errors.

use crate::error::{Error, Result};
use crate::storage::table::Table;
use crate::types::{Column, DataType, Tuple, Value};
use log::info;
use std::path::Path;

/// Reads a CSV file into a new table with the given name.
pub fn import_table(path: &Path, table_name: &str) -> Result<Table> {
    let text = std::fs::read_to_string(path).map_err(|error| {
        Error::unpositioned(format!(
            "Failed to open CSV file '{}': {}",
            path.display(),
            error
        ))
    })?;

    let mut records = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            line.split(',')
                .map(|field| field.trim().to_string())
                .collect::<Vec<String>>()
        });

    let Some(header) = records.next() else {
        return Err(Error::unpositioned("CSV file contains no columns"));
    };

    let mut rows = Vec::new();
    for record in records {
        if record.len() != header.len() {
            return Err(Error::unpositioned(format!(
                "Not enough columns in row, expected {}, got {}",
                header.len(),
                record.len()
            )));
        }
        rows.push(record);
    }

    // Infer each column's type across all rows: Int holds only as long as
    // every non-null cell stays numeric.
    let mut table = Table::new(table_name);
    for (index, name) in header.iter().enumerate() {
        let mut datatype = None;
        for row in &rows {
            match infer_type(&row[index]) {
                None => {}
                Some(DataType::Int) => {
                    datatype.get_or_insert(DataType::Int);
                }
                Some(other) => datatype = Some(other),
            }
        }
        table.add_column(Column::new(name.clone(), datatype.unwrap_or(DataType::Varchar)))?;
    }

    let columns = table.columns().to_vec();
    for record in rows {
        let mut values = Vec::with_capacity(columns.len());
        for (field, column) in record.iter().zip(columns.iter()) {
            values.push(parse_field(field, column.datatype)?);
        }
        table.push_row(Tuple::new(values))?;
    }

    info!(
        "imported {} rows into table '{}' from {}",
        table.len(),
        table_name,
        path.display()
    );
    Ok(table)
}

/// Writes a table out as CSV: header of column names, then one record per
/// row in the table's textual value forms.
pub fn export_table(table: &Table, path: &Path) -> Result<()> {
    let mut out = String::new();
    let names: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
    out.push_str(&names.join(","));
    out.push('\n');
    for row in table.rows() {
        let mut fields = Vec::with_capacity(row.len());
        for value in row.values() {
            fields.push(value.to_text()?);
        }
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    std::fs::write(path, out).map_err(|error| {
        Error::unpositioned(format!(
            "Failed to write CSV file '{}': {}",
            path.display(),
            error
        ))
    })
}

/// The type a lone CSV field suggests: None for `null`, Int for all-digit
/// fields, Varchar otherwise.
fn infer_type(field: &str) -> Option<DataType> {
    if field == "null" {
        return None;
    }
    if !field.is_empty() && field.chars().all(|c| c.is_ascii_digit()) {
        return Some(DataType::Int);
    }
    Some(DataType::Varchar)
}

fn parse_field(field: &str, datatype: DataType) -> Result<Value> {
    if field == "null" {
        return Ok(Value::Null);
    }
    match datatype {
        DataType::Int => field
            .parse()
            .map(Value::Int)
            .map_err(|_| Error::unpositioned(format!("'{}' is not a valid int", field))),
        _ => Ok(Value::Varchar(field.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn imports_header_and_rows() {
        let file = write_csv("id, name\n1, alice\n2, bob\n");
        let table = import_table(file.path(), "people").unwrap();
        assert_eq!(table.columns().len(), 2);
        assert_eq!(table.columns()[0].datatype, DataType::Int);
        assert_eq!(table.columns()[1].datatype, DataType::Varchar);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].get(0), Some(&Value::Int(1)));
        assert_eq!(table.rows()[1].get(1), Some(&Value::Varchar("bob".into())));
    }

    #[test]
    fn int_column_downgrades_to_varchar() {
        let file = write_csv("x\n1\ntwo\n3\n");
        let table = import_table(file.path(), "t").unwrap();
        assert_eq!(table.columns()[0].datatype, DataType::Varchar);
        assert_eq!(table.rows()[0].get(0), Some(&Value::Varchar("1".into())));
    }

    #[test]
    fn null_literal_and_all_null_column() {
        let file = write_csv("a, b\nnull, 1\nnull, null\n");
        let table = import_table(file.path(), "t").unwrap();
        // A column with no typed cells defaults to Varchar.
        assert_eq!(table.columns()[0].datatype, DataType::Varchar);
        assert_eq!(table.columns()[1].datatype, DataType::Int);
        assert_eq!(table.rows()[0].get(0), Some(&Value::Null));
    }

    #[test]
    fn ragged_rows_are_an_error() {
        let file = write_csv("a, b\n1\n");
        assert!(import_table(file.path(), "t").is_err());
    }

    #[test]
    fn empty_file_is_an_error() {
        let file = write_csv("");
        assert!(import_table(file.path(), "t").is_err());
    }

    #[test]
    fn export_round_trips() {
        let file = write_csv("id, name\n1, alice\n");
        let table = import_table(file.path(), "people").unwrap();
        let out = tempfile::NamedTempFile::new().unwrap();
        export_table(&table, out.path()).unwrap();
        let round_tripped = import_table(out.path(), "people").unwrap();
        assert_eq!(round_tripped.rows(), table.rows());
    }
}
