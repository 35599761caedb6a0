//! The database catalog

use crate::error::{Error, Result};
use crate::execution;
use crate::parsing;
use crate::storage::table::Table;
use crate::types::Value;
use std::collections::BTreeMap;

/// A database: a catalog of named in-memory tables, plus the entry points
/// that parse and execute SQL against it. Single-threaded; callers serialize
/// access.
#[derive(Clone, Debug, Default)]
pub struct Database {
    tables: BTreeMap<String, Table>,
}

impl Database {
    pub fn new() -> Database {
        Database::default()
    }

    /// Parses and executes a single statement, returning its result value.
    /// SELECT returns a ResultSet value; DML and DDL return Null.
    pub fn execute(&mut self, sql: &str) -> Result<Value> {
        let statement = parsing::parse_sql(sql)?;
        execution::execute_statement(self, &statement)
    }

    /// Parses and executes a semicolon-separated statement list, returning
    /// one value per statement. Execution stops at the first error; earlier
    /// statements stay applied.
    pub fn execute_all(&mut self, sql: &str) -> Result<Vec<Value>> {
        let statements = parsing::parse_statements(sql)?;
        let mut results = Vec::with_capacity(statements.len());
        for statement in &statements {
            results.push(execution::execute_statement(self, statement)?);
        }
        Ok(results)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| Error::unpositioned(format!("Table '{}' does not exist", name)))
    }

    pub fn table_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| Error::unpositioned(format!("Table '{}' does not exist", name)))
    }

    pub fn create_table(&mut self, table: Table) -> Result<()> {
        if self.exists(table.name()) {
            return Err(Error::unpositioned(format!(
                "Table '{}' already exists",
                table.name()
            )));
        }
        self.tables.insert(table.name().to_string(), table);
        Ok(())
    }

    /// Creates or replaces a table (SELECT INTO, IMPORT).
    pub fn replace_table(&mut self, table: Table) {
        self.tables.insert(table.name().to_string(), table);
    }

    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        if self.tables.remove(name).is_none() {
            return Err(Error::unpositioned(format!(
                "Table '{}' does not exist",
                name
            )));
        }
        Ok(())
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Writes a table out as CSV, the inverse of `IMPORT CSV`.
    pub fn export_csv(&self, table: &str, path: &std::path::Path) -> Result<()> {
        crate::storage::csv::export_table(self.table(table)?, path)
    }
}
