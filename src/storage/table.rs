//! In-memory tables
//!
//! A table is an ordered list of columns plus append-only row storage; every
//! row's arity equals the column count. Schema evolution rewrites each row
//! to match. Constraint *checking* lives in the executors, which can see the
//! whole database; the table only enforces structural invariants.

use crate::error::{Error, Result};
use crate::types::{Column, TableConstraints, Tuple, Value};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    rows: Vec<Tuple>,
    constraints: TableConstraints,
    auto_increment: BTreeMap<String, i64>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Table {
        Table {
            name: name.into(),
            ..Table::default()
        }
    }

    pub fn with_columns(name: impl Into<String>, columns: Vec<Column>) -> Result<Table> {
        let mut table = Table::new(name);
        for column in columns {
            table.add_column(column)?;
        }
        Ok(table)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Tuple] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn constraints(&self) -> &TableConstraints {
        &self.constraints
    }

    pub fn constraints_mut(&mut self) -> &mut TableConstraints {
        &mut self.constraints
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    pub fn get_column(&self, name: &str) -> Option<(usize, &Column)> {
        self.columns
            .iter()
            .enumerate()
            .find(|(_, column)| column.name == name)
    }

    /// Appends a column, extending every existing row with the column's
    /// default value (or Null).
    pub fn add_column(&mut self, column: Column) -> Result<()> {
        if self.column_index(&column.name).is_some() {
            return Err(Error::unpositioned(format!(
                "Duplicate column '{}'",
                column.name
            )));
        }
        let fill = column.default.clone().unwrap_or(Value::Null);
        for row in &mut self.rows {
            row.push(fill.clone());
        }
        self.columns.push(column);
        Ok(())
    }

    /// Replaces a column's declaration, coercing every stored cell to the
    /// new declared type.
    pub fn alter_column(&mut self, column: Column) -> Result<()> {
        let Some(index) = self.column_index(&column.name) else {
            return Err(Error::unpositioned(format!(
                "Couldn't find column '{}'",
                column.name
            )));
        };
        for row in &mut self.rows {
            let cell = row.get(index).cloned().unwrap_or(Value::Null);
            row.set(index, cell.cast(column.datatype)?);
        }
        self.columns[index] = column;
        Ok(())
    }

    /// Removes a column and its slot from every row.
    pub fn drop_column(&mut self, name: &str) -> Result<()> {
        let Some(index) = self.column_index(name) else {
            return Err(Error::unpositioned(format!(
                "Couldn't find column '{}'",
                name
            )));
        };
        for row in &mut self.rows {
            row.remove(index);
        }
        self.columns.remove(index);
        Ok(())
    }

    /// Appends a row; its arity must match the column count.
    pub fn push_row(&mut self, row: Tuple) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::unpositioned(format!(
                "Row has {} values, table '{}' has {} columns",
                row.len(),
                self.name,
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn replace_row(&mut self, index: usize, row: Tuple) {
        self.rows[index] = row;
    }

    pub fn delete_row(&mut self, index: usize) {
        self.rows.remove(index);
    }

    /// Deletes all rows, preserving the schema and counters.
    pub fn truncate(&mut self) {
        self.rows.clear();
    }

    /// Bumps and returns the auto-increment counter for a column.
    pub fn next_auto_increment(&mut self, column: &str) -> i64 {
        let counter = self.auto_increment.entry(column.to_string()).or_insert(0);
        *counter += 1;
        *counter
    }
}
