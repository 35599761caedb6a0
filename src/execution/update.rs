//! UPDATE execution
//!
//! All new cell values are computed against the original rows first, then
//! validated and written in place row by row.

use crate::error::{Error, Result};
use crate::execution::context::{EvaluationContext, SourceRelation, TupleWithSource};
use crate::execution::expression::evaluate;
use crate::execution::insert::validate_row;
use crate::parsing::ast::UpdateStatement;
use crate::storage::Database;
use crate::types::{Tuple, Value};

pub fn execute_update(db: &mut Database, statement: &UpdateStatement) -> Result<Value> {
    let table = db.table(&statement.table).map_err(|e| e.at(statement.offset))?;

    // Resolve target columns up front.
    let mut target_indexes = Vec::with_capacity(statement.set.len());
    for (column, _) in &statement.set {
        let Some(index) = table.column_index(column) else {
            return Err(Error::new(
                format!("No such column: '{}'", column),
                statement.offset,
            ));
        };
        target_indexes.push(index);
    }

    // Compute every write against the original rows.
    let source = SourceRelation::from_table(table, None);
    let ctx = EvaluationContext::over_table(db, &source);
    let mut writes: Vec<(usize, Tuple)> = Vec::new();
    for (row_index, row) in source.rows.iter().enumerate() {
        let row_ctx = TupleWithSource::from_table_row(row);
        if let Some(predicate) = &statement.r#where {
            let keep = evaluate(predicate, &ctx, &row_ctx)?
                .to_bool()
                .map_err(|e| e.at(predicate.offset))?;
            if !keep {
                continue;
            }
        }
        let mut updated = row.clone();
        for ((_, expr), index) in statement.set.iter().zip(&target_indexes) {
            let value = evaluate(expr, &ctx, &row_ctx)?
                .into_scalar()
                .map_err(|e| e.at(expr.offset))?;
            updated.set(*index, value);
        }
        writes.push((row_index, updated));
    }

    // Validate and apply per row; a violation stops the statement with the
    // earlier writes kept.
    for (row_index, row) in writes {
        validate_row(db, &statement.table, &row, Some(row_index), statement.offset)?;
        db.table_mut(&statement.table)?.replace_row(row_index, row);
    }

    Ok(Value::Null)
}
