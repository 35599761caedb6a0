//! DDL execution: CREATE, ALTER, DROP, TRUNCATE, IMPORT, SELECT INTO

use crate::error::{Error, Result};
use crate::parsing::ast::{AlterTable, CreateTable, EngineSpec, ImportStatement};
use crate::storage::{csv, Database, Table};
use crate::types::{Column, ResultSet, DataType, Value};
use std::path::Path;

pub fn execute_create_table(db: &mut Database, statement: &CreateTable) -> Result<Value> {
    reject_edb_engine(statement.engine, statement.offset)?;
    if db.exists(&statement.name) {
        if statement.if_not_exists {
            return Ok(Value::Null);
        }
        return Err(Error::new(
            format!("Table '{}' already exists", statement.name),
            statement.offset,
        ));
    }
    let mut table = Table::with_columns(&statement.name, statement.columns.clone())
        .map_err(|e| e.at(statement.offset))?;
    *table.constraints_mut() = statement.constraints.clone();
    db.create_table(table).map_err(|e| e.at(statement.offset))?;
    Ok(Value::Null)
}

pub fn execute_drop_table(
    db: &mut Database,
    name: &str,
    if_exists: bool,
    offset: usize,
) -> Result<Value> {
    if !db.exists(name) && if_exists {
        return Ok(Value::Null);
    }
    db.drop_table(name).map_err(|e| e.at(offset))?;
    Ok(Value::Null)
}

pub fn execute_truncate_table(
    db: &mut Database,
    name: &str,
    if_exists: bool,
    offset: usize,
) -> Result<Value> {
    if !db.exists(name) && if_exists {
        return Ok(Value::Null);
    }
    db.table_mut(name).map_err(|e| e.at(offset))?.truncate();
    Ok(Value::Null)
}

/// Applies ALTER TABLE actions in ADD -> ALTER -> DROP order, over columns,
/// the table CHECK, and named constraints.
pub fn execute_alter_table(db: &mut Database, statement: &AlterTable) -> Result<Value> {
    if !db.exists(&statement.name) && statement.if_exists {
        return Ok(Value::Null);
    }
    let table = db.table_mut(&statement.name).map_err(|e| e.at(statement.offset))?;

    for column in &statement.add_columns {
        table.add_column(column.clone()).map_err(|e| e.at(statement.offset))?;
    }
    for column in &statement.alter_columns {
        table.alter_column(column.clone()).map_err(|e| e.at(statement.offset))?;
    }
    for column in &statement.drop_columns {
        table.drop_column(column).map_err(|e| e.at(statement.offset))?;
    }

    let constraints = table.constraints_mut();
    if let Some(check) = &statement.add_check {
        if constraints.check.is_some() {
            return Err(Error::new("Default rule already exists", statement.offset));
        }
        constraints.check = Some(check.clone());
    }
    if let Some(check) = &statement.alter_check {
        constraints.check = Some(check.clone());
    }
    if statement.drop_check {
        constraints.check = None;
    }

    for (name, check) in &statement.add_constraints {
        if constraints.has_named(name) {
            return Err(Error::new(
                format!("Constraint with name '{}' already exists", name),
                statement.offset,
            ));
        }
        constraints.named.push((name.clone(), check.clone()));
    }
    for (name, check) in &statement.alter_constraints {
        match constraints.named.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = check.clone(),
            None => {
                return Err(Error::new(
                    format!("No constraint named '{}'", name),
                    statement.offset,
                ));
            }
        }
    }
    for name in &statement.drop_constraints {
        let before = constraints.named.len();
        constraints.named.retain(|(n, _)| n != name);
        if constraints.named.len() == before {
            return Err(Error::new(
                format!("No constraint named '{}'", name),
                statement.offset,
            ));
        }
    }

    Ok(Value::Null)
}

/// IMPORT CSV: reads the file into a table, creating it or replacing its
/// contents.
pub fn execute_import(db: &mut Database, statement: &ImportStatement) -> Result<Value> {
    reject_edb_engine(statement.engine, statement.offset)?;
    let table = csv::import_table(Path::new(&statement.filename), &statement.table)
        .map_err(|e| e.at(statement.offset))?;
    db.replace_table(table);
    Ok(Value::Null)
}

/// SHOW TABLES: one row per table name.
pub fn execute_show_tables(db: &Database) -> Result<Value> {
    let rows = db
        .table_names()
        .map(|name| crate::types::Tuple::new(vec![Value::Varchar(name.to_string())]))
        .collect();
    Ok(Value::ResultSet(ResultSet::new(vec!["name".to_string()], rows)))
}

/// SELECT INTO: materializes a result set as a new table, replacing any
/// existing table of that name. Column types are inferred from the first
/// row; an empty result defaults every column to VARCHAR.
pub fn materialize_into(
    db: &mut Database,
    name: &str,
    result: &ResultSet,
    offset: usize,
) -> Result<Value> {
    let mut table = Table::new(name);
    for (index, column_name) in result.column_names().iter().enumerate() {
        let datatype = result
            .rows()
            .first()
            .and_then(|row| row.get(index))
            .and_then(Value::data_type)
            .unwrap_or(DataType::Varchar);
        table
            .add_column(Column::new(column_name.clone(), datatype))
            .map_err(|e| e.at(offset))?;
    }
    for row in result.rows() {
        table.push_row(row.clone()).map_err(|e| e.at(offset))?;
    }
    db.replace_table(table);
    Ok(Value::Null)
}

fn reject_edb_engine(engine: Option<EngineSpec>, offset: usize) -> Result<()> {
    if engine == Some(EngineSpec::Edb) {
        return Err(Error::new(
            "The on-disk engine (EDB) is not supported",
            offset,
        ));
    }
    Ok(())
}
