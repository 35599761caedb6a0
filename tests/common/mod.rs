//! Common test utilities for the SQL integration tests
#![allow(dead_code)]

use hearthdb::{Database, Error, ResultSet, Value};

/// Test context owning a database, with panicking helpers so tests read as
/// straight-line SQL.
pub struct TestContext {
    pub db: Database,
}

impl TestContext {
    pub fn new() -> Self {
        TestContext {
            db: Database::new(),
        }
    }

    /// Executes SQL, panicking on error.
    pub fn exec(&mut self, sql: &str) {
        if let Err(error) = self.db.execute(sql) {
            panic!("SQL execution failed: {} - {}", sql, error);
        }
    }

    /// Executes SQL and returns the raw result.
    pub fn try_exec(&mut self, sql: &str) -> Result<Value, Error> {
        self.db.execute(sql)
    }

    /// Executes a query and returns its result set.
    pub fn query(&mut self, sql: &str) -> ResultSet {
        match self.db.execute(sql) {
            Ok(Value::ResultSet(result)) => result,
            Ok(other) => panic!("expected a result set from {}, got {:?}", sql, other),
            Err(error) => panic!("SQL execution failed: {} - {}", sql, error),
        }
    }

    /// Executes SQL that must fail, returning the error.
    pub fn error(&mut self, sql: &str) -> Error {
        match self.db.execute(sql) {
            Ok(value) => panic!("expected an error from {}, got {:?}", sql, value),
            Err(error) => error,
        }
    }
}

/// Builder for creating and seeding test tables.
pub struct TableBuilder<'a> {
    ctx: &'a mut TestContext,
    name: String,
}

impl<'a> TableBuilder<'a> {
    pub fn new(ctx: &'a mut TestContext, name: &str) -> Self {
        TableBuilder {
            ctx,
            name: name.to_string(),
        }
    }

    /// Creates the table from a bare column list, e.g. "id INT, name VARCHAR".
    pub fn create_simple(self, columns: &str) -> Self {
        let sql = format!("CREATE TABLE {} ({})", self.name, columns);
        self.ctx.exec(&sql);
        self
    }

    /// Inserts rows given as a VALUES body, e.g. "(1, 'a'), (2, 'b')".
    pub fn insert_values(self, values: &str) -> Self {
        let sql = format!("INSERT INTO {} VALUES {}", self.name, values);
        self.ctx.exec(&sql);
        self
    }
}

/// Returns the value at (row, column-name) in a result set.
pub fn cell<'a>(result: &'a ResultSet, row: usize, column: &str) -> &'a Value {
    let index = result
        .column_names()
        .iter()
        .position(|name| name == column)
        .unwrap_or_else(|| panic!("no column '{}' in {:?}", column, result.column_names()));
    result.rows()[row].get(index).unwrap()
}

/// Collects one column of a result set.
pub fn column_values(result: &ResultSet, column: &str) -> Vec<Value> {
    (0..result.rows().len())
        .map(|row| cell(result, row, column).clone())
        .collect()
}

/// Shorthand constructors.
pub fn int(i: i64) -> Value {
    Value::Int(i)
}

pub fn varchar(s: &str) -> Value {
    Value::Varchar(s.to_string())
}
