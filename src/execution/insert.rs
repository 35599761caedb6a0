//! INSERT execution
//!
//! Every source row is evaluated before the table is touched, so an
//! evaluation error leaves the table unchanged. Rows are then validated and
//! appended one at a time; a constraint violation stops the statement
//! without rolling back rows it already inserted.

use crate::error::{Error, Result};
use crate::execution::context::{EvaluationContext, SourceRelation, TupleWithSource};
use crate::execution::expression::evaluate;
use crate::execution::select;
use crate::parsing::ast::{InsertSource, InsertStatement};
use crate::storage::Database;
use crate::types::{evaluator, KeyRole, Tuple, Value};
use std::cmp::Ordering;
use std::collections::HashMap;

pub fn execute_insert(db: &mut Database, statement: &InsertStatement) -> Result<Value> {
    // Evaluate the full source first.
    let source_rows: Vec<Vec<Value>> = match &statement.source {
        InsertSource::Values(rows) => {
            let ctx = EvaluationContext::constant(db);
            let empty = TupleWithSource::default();
            let mut evaluated = Vec::with_capacity(rows.len());
            for row in rows {
                let mut values = Vec::with_capacity(row.len());
                for expr in row {
                    // A scalar subquery collapses to its single cell here.
                    let value = evaluate(expr, &ctx, &empty)?
                        .into_scalar()
                        .map_err(|e| e.at(expr.offset))?;
                    values.push(value);
                }
                evaluated.push(values);
            }
            evaluated
        }
        InsertSource::Select(query) => select::subquery_result(db, query)?
            .into_rows()
            .into_iter()
            .map(Tuple::into_values)
            .collect(),
    };

    let table = db.table(&statement.table).map_err(|e| e.at(statement.offset))?;
    let column_names: Vec<String> = match &statement.columns {
        Some(names) => names.clone(),
        None => table.columns().iter().map(|c| c.name.clone()).collect(),
    };
    for name in &column_names {
        if table.column_index(name).is_none() {
            return Err(Error::new(
                format!("No such column: '{}'", name),
                statement.offset,
            ));
        }
    }

    for values in source_rows {
        if values.len() != column_names.len() {
            return Err(Error::new(
                "Values don't have corresponding columns",
                statement.offset,
            ));
        }
        let mut provided: HashMap<&str, Value> = column_names
            .iter()
            .map(String::as_str)
            .zip(values)
            .collect();

        // Fill the full row in table column order: provided value, then
        // auto-increment, then the declared default, then Null.
        let columns = db.table(&statement.table)?.columns().to_vec();
        let mut row_values = Vec::with_capacity(columns.len());
        for column in &columns {
            let value = if let Some(value) = provided.remove(column.name.as_str()) {
                value
            } else if column.auto_increment {
                let counter = db
                    .table_mut(&statement.table)?
                    .next_auto_increment(&column.name);
                Value::Int(counter)
            } else if let Some(default) = &column.default {
                default.clone()
            } else {
                Value::Null
            };
            row_values.push(value);
        }

        let row = Tuple::new(row_values);
        validate_row(db, &statement.table, &row, None, statement.offset)?;
        db.table_mut(&statement.table)?.push_row(row)?;
    }

    Ok(Value::Null)
}

/// Validates a candidate row against the table's constraints: NOT NULL,
/// declared type, UNIQUE, FOREIGN KEY, and the table's CHECK rules.
/// `skip_row` excludes a row (the one being updated) from the UNIQUE scan.
pub(super) fn validate_row(
    db: &Database,
    table_name: &str,
    row: &Tuple,
    skip_row: Option<usize>,
    offset: usize,
) -> Result<()> {
    let table = db.table(table_name).map_err(|e| e.at(offset))?;

    for (index, column) in table.columns().iter().enumerate() {
        let value = row.get(index).cloned().unwrap_or(Value::Null);

        if value.is_null() {
            if column.not_null {
                return Err(Error::new(
                    format!("NOT NULL constraint violated in column '{}'", column.name),
                    offset,
                ));
            }
            continue;
        }

        value.check_type(column.datatype).map_err(|e| e.at(offset))?;

        if column.unique {
            for (row_index, existing) in table.rows().iter().enumerate() {
                if skip_row == Some(row_index) {
                    continue;
                }
                let existing_value = existing.get(index).cloned().unwrap_or(Value::Null);
                if !existing_value.is_null()
                    && evaluator::compare(&value, &existing_value).map_err(|e| e.at(offset))?
                        == Ordering::Equal
                {
                    let constraint = match column.key {
                        KeyRole::Primary => "PRIMARY KEY",
                        _ => "UNIQUE",
                    };
                    return Err(Error::new(
                        format!(
                            "{} constraint violated in column '{}'",
                            constraint, column.name
                        ),
                        offset,
                    ));
                }
            }
        }

        if let KeyRole::Foreign {
            referenced_table,
            referenced_column,
        } = &column.key
        {
            let referenced = db.table(referenced_table).map_err(|e| e.at(offset))?;
            let Some(referenced_index) = referenced.column_index(referenced_column) else {
                return Err(Error::new(
                    format!(
                        "No such column: '{}' in table '{}'",
                        referenced_column, referenced_table
                    ),
                    offset,
                ));
            };
            let mut found = false;
            for existing in referenced.rows() {
                let existing_value = existing.get(referenced_index).cloned().unwrap_or(Value::Null);
                if !existing_value.is_null()
                    && evaluator::compare(&value, &existing_value).map_err(|e| e.at(offset))?
                        == Ordering::Equal
                {
                    found = true;
                    break;
                }
            }
            if !found {
                return Err(Error::new(
                    format!(
                        "FOREIGN KEY constraint violated: value not present in {}({})",
                        referenced_table, referenced_column
                    ),
                    offset,
                ));
            }
        }
    }

    // CHECK rules evaluate against the candidate row in table-column
    // binding.
    let constraints = table.constraints().clone();
    if !constraints.is_empty() {
        let schema = SourceRelation::schema_of(table);
        let ctx = EvaluationContext::over_table(db, &schema);
        let row_ctx = TupleWithSource::from_table_row(row);
        if let Some(check) = &constraints.check {
            if !evaluate(check, &ctx, &row_ctx)?.to_bool().map_err(|e| e.at(check.offset))? {
                return Err(Error::new("CHECK constraint violated", check.offset));
            }
        }
        for (name, check) in &constraints.named {
            if !evaluate(check, &ctx, &row_ctx)?.to_bool().map_err(|e| e.at(check.offset))? {
                return Err(Error::new(
                    format!("Constraint '{}' violated", name),
                    check.offset,
                ));
            }
        }
    }

    Ok(())
}
